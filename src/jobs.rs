//! Built-in import jobs for the insurance catalogs.
//!
//! Each job is a declarative [`ImportSpec`]: header mapping, derived fields
//! and the upsert target. Operator name and status come from [`Defaults`].
use crate::config::{Config, Defaults};
use crate::database::{self, TargetTable};
use crate::error::Result;
use crate::import::{run, DerivedRule, ImportResult, ImportSpec};
use std::fmt::Display;
use std::path::Path;

/// Label of the note kept when a price cell holds no number.
pub const PRICE_NOTE_LABEL: &str = "价格字段原值";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Job {
    /// ICD-10 disease codes
    Disease,
    /// Medical service items and prices
    MedicalService,
    /// Insurance drug catalog
    Drug,
}

impl Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::Disease => write!(f, "disease"),
            Job::MedicalService => write!(f, "medical-service"),
            Job::Drug => write!(f, "drug"),
        }
    }
}

impl Job {
    /// Builds the import spec of this job for a source file.
    pub fn spec(&self, source: &Path, defaults: &Defaults) -> ImportSpec {
        let spec = match self {
            Job::Disease => disease(source),
            Job::MedicalService => medical_service(source),
            Job::Drug => drug(source),
        };
        spec.rule(DerivedRule::constant("status", defaults.status))
            .rule(DerivedRule::constant("create_by", defaults.operator.as_str()))
            .rule(DerivedRule::constant("update_by", defaults.operator.as_str()))
    }
}

/// Runs a job against the database and defaults named in the configuration.
///
/// The connection lives for this call only.
pub fn run_with_config(job: Job, source: &Path, config: &Config) -> Result<ImportResult> {
    let spec = job.spec(source, &config.defaults).with_criteria(config.criteria()?);
    let mut connection = database::open(&config.database.path)?;
    run(&spec, &mut connection)
}

fn disease(source: &Path) -> ImportSpec {
    let table = TargetTable::new(
        "disease",
        &[
            "icd_code",
            "disease_code",
            "disease_name",
            "disease_category",
            "description",
            "status",
            "create_by",
            "update_by",
            "remark",
        ],
        &["icd_code", "disease_code"],
    )
    .with_preserved(&["create_by"]);
    ImportSpec::new("disease", source, table)
        .map_column("国际ICD编码", "icd_code")
        .map_column("疾病编码", "disease_code")
        .map_column("疾病名称", "disease_name")
        .map_column("疾病分类", "disease_category")
        .map_column("描述", "description")
        .rule(DerivedRule::default_value("description", ""))
        .rule(DerivedRule::constant("remark", ""))
}

fn medical_service(source: &Path) -> ImportSpec {
    let table = TargetTable::new(
        "medical_service",
        &[
            "service_code",
            "national_code",
            "service_name",
            "service_content",
            "exclude_content",
            "unit_type",
            "price",
            "category",
            "status",
            "create_by",
            "update_by",
            "remark",
        ],
        &["service_code"],
    );
    ImportSpec::new("medical-service", source, table)
        .map_column("财务分类", "category")
        .map_column("项目编码", "service_code")
        .map_column("国家编码", "national_code")
        .map_column("项目名称", "service_name")
        .map_column("项目内涵", "service_content")
        .map_column("除外内容", "exclude_content")
        .map_column("计价单位", "unit_type")
        .map_column("价格", "price")
        .map_column("说明", "remark")
        .rule(DerivedRule::numeric_annotated("price", "remark", PRICE_NOTE_LABEL))
}

fn drug(source: &Path) -> ImportSpec {
    let table = TargetTable::new(
        "drug",
        &[
            "drug_code",
            "drug_name",
            "trade_name",
            "drug_type",
            "self_pay_ratio",
            "specification",
            "unit",
            "price",
            "manufacturer",
            "status",
            "create_by",
            "update_by",
            "remark",
        ],
        &["drug_code"],
    );
    ImportSpec::new("drug", source, table)
        .map_column("分类", "drug_type")
        .map_column("医保中文名称", "drug_name")
        .map_column("商品名", "trade_name")
        .map_column("规格", "specification")
        .map_column("单位", "unit")
        .map_column("生产企业", "manufacturer")
        .map_column("支付标准", "price")
        .map_column("备注", "remark")
        .rule(DerivedRule::sequence("drug_code", "DRUG", 5))
        .rule(DerivedRule::constant("self_pay_ratio", 0.0))
        .rule(DerivedRule::numeric_annotated("price", "remark", PRICE_NOTE_LABEL))
}
