use plannercell_domain::MonthKey;
use serde::Serialize;

use crate::{aggregation::MonthlyRecord, format, CoreError};

/// Downloadable report: the record plus a readable `period` label.
#[derive(Debug, Serialize)]
pub struct MonthExport<'a> {
    pub period: String,
    #[serde(flatten)]
    pub record: &'a MonthlyRecord,
}

/// Serialized export ready to be written wherever the caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub contents: String,
}

pub fn export_file_name(month: MonthKey) -> String {
    format!("relatorio-financeiro-{month}.json")
}

impl ExportDocument {
    pub fn from_record(record: &MonthlyRecord, locale: &str) -> Result<Self, CoreError> {
        let export = MonthExport {
            period: format::month_label(record.month_key(), locale),
            record,
        };
        Ok(Self {
            file_name: export_file_name(record.month_key()),
            contents: serde_json::to_string_pretty(&export)?,
        })
    }
}
