use crate::config::Settings;
use crate::domain::model::{Color, EccLevel, InputMode, OutputFormat};
use crate::utils::error::{QrError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub qr: Option<QrSection>,
    pub input: Option<InputSection>,
    pub regeneration: Option<RegenerationSection>,
    pub output: Option<OutputSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QrSection {
    pub size: Option<u32>,
    pub margin: Option<u32>,
    pub ecc: Option<EccLevel>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSection {
    pub mode: Option<InputMode>,
    /// 啟動時預先填入的文字
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerationSection {
    pub auto: Option<bool>,
    pub debounce_ms: Option<u64>,
    pub discard_stale: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub directory: Option<String>,
    pub filename_stem: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QrError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| QrError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QR_OUTPUT_DIR})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 將設定檔內容套用到既有設定上
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(qr) = &self.qr {
            if let Some(size) = qr.size {
                settings.form.size = size;
            }
            if let Some(margin) = qr.margin {
                settings.controller.margin = margin;
            }
            if let Some(ecc) = qr.ecc {
                settings.form.ecc = ecc;
            }
            if let Some(foreground) = qr.foreground {
                settings.form.foreground = foreground;
            }
            if let Some(background) = qr.background {
                settings.form.background = background;
            }
            if let Some(format) = qr.format {
                settings.form.format = format;
            }
        }

        if let Some(input) = &self.input {
            if let Some(mode) = input.mode {
                settings.form.mode = mode;
            }
            if let Some(text) = &input.text {
                settings.form.text = text.clone();
            }
        }

        if let Some(regeneration) = &self.regeneration {
            if let Some(auto) = regeneration.auto {
                settings.form.auto_generate = auto;
            }
            if let Some(ms) = regeneration.debounce_ms {
                settings.controller.debounce = Duration::from_millis(ms);
            }
            if let Some(discard_stale) = regeneration.discard_stale {
                settings.controller.discard_stale = discard_stale;
            }
        }

        if let Some(output) = &self.output {
            if let Some(directory) = &output.directory {
                settings.output_path = directory.clone();
            }
            if let Some(stem) = &output.filename_stem {
                settings.controller.filename_stem = stem.clone();
            }
        }

        if let Some(json) = self.logging.as_ref().and_then(|l| l.json) {
            settings.json_logs = json;
        }
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}
