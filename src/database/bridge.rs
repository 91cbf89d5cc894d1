use crate::import::Value;
use duckdb::types::{ToSql, ToSqlOutput, Value as DuckValue, ValueRef};

/// Binds row values as DuckDB statement parameters.
impl ToSql for Value {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Value::Integer(value) => ToSqlOutput::Owned(DuckValue::BigInt(*value)),
            Value::Float(value) => ToSqlOutput::Owned(DuckValue::Double(*value)),
        })
    }
}
