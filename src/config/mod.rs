#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::controller::ControllerConfig;
use crate::domain::model::{FormState, MAX_MARGIN, MAX_SIZE};
use crate::utils::error::{QrError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// 合併預設值、TOML 與命令列之後的最終設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub form: FormState,
    pub controller: ControllerConfig,
    pub output_path: String,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            controller: ControllerConfig::default(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            json_logs: false,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_range("qr.size", self.form.size, 1, MAX_SIZE)?;
        validate_range("qr.margin", self.controller.margin, 0, MAX_MARGIN)?;
        validate_positive_number(
            "regeneration.debounce_ms",
            self.controller.debounce.as_millis() as u64,
            1,
        )?;
        validate_path("output.directory", &self.output_path)?;
        validate_non_empty_string("output.filename_stem", &self.controller.filename_stem)?;
        if self.controller.filename_stem.contains(['/', '\\']) {
            return Err(QrError::InvalidConfigValueError {
                field: "output.filename_stem".to_string(),
                value: self.controller.filename_stem.clone(),
                reason: "File name must not contain path separators".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.form.size = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.controller.debounce = Duration::ZERO;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.controller.filename_stem = "a/b".to_string();
        assert!(settings.validate().is_err());
    }
}
