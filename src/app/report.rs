use crate::core::controller::Rendered;
use crate::domain::model::{EccLevel, OutputFormat};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// `--json` 輸出的生成摘要
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,
    pub payload: String,
    pub format: OutputFormat,
    pub size: u32,
    pub ecc: EccLevel,
    pub foreground: String,
    pub background: String,
    pub filename: String,
    pub mime_type: &'static str,
    pub saved_to: Option<String>,
    pub copied: Option<String>,
}

impl GenerationReport {
    pub fn new(rendered: &Rendered) -> Self {
        let request = &rendered.request;
        Self {
            generated_at: Utc::now(),
            payload: request.payload.clone(),
            format: request.format,
            size: request.size,
            ecc: request.ecc,
            foreground: request.foreground.to_hex(),
            background: request.background.to_hex(),
            filename: rendered.link.filename.clone(),
            mime_type: rendered.link.mime_type,
            saved_to: None,
            copied: None,
        }
    }

    pub fn to_json(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
