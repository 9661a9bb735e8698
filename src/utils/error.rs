use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrError {
    #[error("Enter some text or URL to generate a QR code.")]
    EmptyInput,

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Invalid size {size}: must be between 1 and {max}")]
    InvalidSize { size: u32, max: u32 },

    #[error("Invalid color '{value}': expected #rrggbb or #rgb")]
    InvalidColor { value: String },

    #[error("QR encoder unavailable: {message}")]
    EncoderUnavailable { message: String },

    #[error("Failed to generate QR: {message}")]
    EncodeFailure { message: String },

    #[error("Copy failed: {message}")]
    ExportFailure { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤嚴重程度，CLI 以此決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 使用者輸入問題，修正後即可重試
    Low,
    /// 單次請求失敗，下一次觸發即可恢復
    Medium,
    /// 設定錯誤
    High,
    /// 編碼器或系統資源不可用
    Critical,
}

impl QrError {
    pub fn encode_failure(message: impl Into<String>) -> Self {
        Self::EncodeFailure {
            message: message.into(),
        }
    }

    pub fn export_failure(message: impl Into<String>) -> Self {
        Self::ExportFailure {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyInput
            | Self::InvalidUrl { .. }
            | Self::InvalidSize { .. }
            | Self::InvalidColor { .. } => ErrorSeverity::Low,
            Self::EncodeFailure { .. } | Self::ExportFailure { .. } => ErrorSeverity::Medium,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::EncoderUnavailable { .. } | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// CLI 退出碼：輸入錯誤代表沒有產生任何輸出，也不能回傳 0
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 4,      // 輸入問題，沒有輸出
            ErrorSeverity::Medium => 2,   // 重試即可
            ErrorSeverity::High => 1,     // 設定錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyInput => self.to_string(),
            Self::InvalidUrl { input, .. } => format!("'{}' is not a valid URL.", input),
            Self::EncoderUnavailable { .. } => {
                "QR library not loaded. Generation is disabled.".to_string()
            }
            Self::IoError(e) => format!("Could not read or write a file: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.severity() {
            ErrorSeverity::Low => "Check the input text, size and colors, then try again.",
            ErrorSeverity::Medium => "Change a parameter or submit again.",
            ErrorSeverity::High => "Check the configuration file and command line flags.",
            ErrorSeverity::Critical => {
                "Check that the encoder and output directory are available, then restart."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, QrError>;
