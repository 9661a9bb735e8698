use crate::utils::error::{QrError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 尺寸上限（像素）
pub const MAX_SIZE: u32 = 4096;
pub const DEFAULT_SIZE: u32 = 512;
pub const DEFAULT_MARGIN: u32 = 2;
pub const MAX_MARGIN: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Svg => "SVG",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(QrError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: png, svg".to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EccLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl FromStr for EccLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(QrError::InvalidConfigValueError {
                field: "ecc".to_string(),
                value: other.to_string(),
                reason: "Valid levels: L, M, Q, H".to_string(),
            }),
        }
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(level)
    }
}

/// 輸入模式：僅接受 URL，或任意文字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    #[serde(alias = "freetext")]
    Text,
    Url,
}

impl FromStr for InputMode {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "freetext" | "free-text" => Ok(Self::Text),
            "url" | "url-only" => Ok(Self::Url),
            other => Err(QrError::InvalidConfigValueError {
                field: "mode".to_string(),
                value: other.to_string(),
                reason: "Valid modes: url, text".to_string(),
            }),
        }
    }
}

/// RGB 顏色，以 `#rrggbb` 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const DEFAULT_FOREGROUND: Self = Self::rgb(0x11, 0x11, 0x11);
    pub const DEFAULT_BACKGROUND: Self = Self::rgb(0xff, 0xff, 0xff);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || QrError::InvalidColor {
            value: s.to_string(),
        };
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #rgb 簡寫：每個位數重複一次
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                expanded.parse()
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 表單目前的參數快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub text: String,
    pub size: u32,
    pub ecc: EccLevel,
    pub foreground: Color,
    pub background: Color,
    pub format: OutputFormat,
    pub mode: InputMode,
    pub auto_generate: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            size: DEFAULT_SIZE,
            ecc: EccLevel::default(),
            foreground: Color::DEFAULT_FOREGROUND,
            background: Color::DEFAULT_BACKGROUND,
            format: OutputFormat::default(),
            mode: InputMode::default(),
            auto_generate: true,
        }
    }
}

/// 表單上單一欄位的變更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamChange {
    Text(String),
    Size(u32),
    Ecc(EccLevel),
    Foreground(Color),
    Background(Color),
    Format(OutputFormat),
    Mode(InputMode),
    AutoGenerate(bool),
}

impl FormState {
    pub fn apply(&mut self, change: ParamChange) {
        match change {
            ParamChange::Text(text) => self.text = text,
            ParamChange::Size(size) => self.size = size,
            ParamChange::Ecc(ecc) => self.ecc = ecc,
            ParamChange::Foreground(color) => self.foreground = color,
            ParamChange::Background(color) => self.background = color,
            ParamChange::Format(format) => self.format = format,
            ParamChange::Mode(mode) => self.mode = mode,
            ParamChange::AutoGenerate(enabled) => self.auto_generate = enabled,
        }
    }
}

/// 送往編碼器的請求，建構時即驗證
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeRequest {
    pub payload: String,
    pub format: OutputFormat,
    pub size: u32,
    pub ecc: EccLevel,
    pub foreground: Color,
    pub background: Color,
    pub margin: u32,
}

impl EncodeRequest {
    pub fn new(payload: String, form: &FormState, margin: u32) -> Result<Self> {
        if payload.trim().is_empty() {
            return Err(QrError::EmptyInput);
        }
        if form.size == 0 || form.size > MAX_SIZE {
            return Err(QrError::InvalidSize {
                size: form.size,
                max: MAX_SIZE,
            });
        }

        Ok(Self {
            payload,
            format: form.format,
            size: form.size,
            ecc: form.ecc,
            foreground: form.foreground,
            background: form.background,
            margin: margin.min(MAX_MARGIN),
        })
    }

    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            width: self.size,
            margin: self.margin,
            ecc: self.ecc,
            dark: self.foreground,
            light: self.background,
        }
    }

    pub fn vector_options(&self) -> VectorOptions {
        VectorOptions {
            ecc: self.ecc,
            dark: self.foreground,
            light: self.background,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub width: u32,
    pub margin: u32,
    pub ecc: EccLevel,
    pub dark: Color,
    pub light: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorOptions {
    pub ecc: EccLevel,
    pub dark: Color,
    pub light: Color,
}

const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

// encodeURIComponent 不跳脫的標點，urlencoding 會跳脫
const URI_COMPONENT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// 與瀏覽器 `encodeURIComponent` 相同的百分比編碼
fn encode_uri_component(text: &str) -> String {
    URI_COMPONENT_MARKS
        .iter()
        .fold(urlencoding::encode(text).into_owned(), |encoded, (escaped, mark)| {
            encoded.replace(escaped, mark)
        })
}

/// 編碼器產出的影像
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrImage {
    /// PNG，以 data URL 表示
    Raster { data_url: String },
    /// SVG 標記
    Vector { markup: String },
}

impl QrImage {
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Raster { .. } => OutputFormat::Png,
            Self::Vector { .. } => OutputFormat::Svg,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format().mime_type()
    }

    pub fn data_url(&self) -> String {
        match self {
            Self::Raster { data_url } => data_url.clone(),
            Self::Vector { markup } => {
                format!("{}{}", SVG_DATA_URL_PREFIX, encode_uri_component(markup))
            }
        }
    }

    /// 下載用的原始位元組
    pub fn bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Vector { markup } => Ok(markup.as_bytes().to_vec()),
            Self::Raster { data_url } => decode_base64_data_url(data_url),
        }
    }
}

fn decode_base64_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (header, body) = data_url
        .split_once(',')
        .ok_or_else(|| QrError::export_failure("data URL has no payload"))?;
    if !header.ends_with(";base64") {
        return Err(QrError::export_failure("data URL is not base64 encoded"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|e| QrError::export_failure(format!("invalid base64 payload: {}", e)))
}

pub const DEFAULT_FILENAME_STEM: &str = "qrcode";

/// 下載連結：data URL、建議檔名與 MIME 類型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
    pub mime_type: &'static str,
}

impl DownloadLink {
    pub fn for_image(image: &QrImage, filename_stem: &str) -> Self {
        Self {
            href: image.data_url(),
            filename: format!("{}.{}", filename_stem, image.format().extension()),
            mime_type: image.mime_type(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeResult {
    Success(QrImage),
    Failure { reason: String },
}

impl EncodeResult {
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::Success(image) => Some(image.mime_type()),
            Self::Failure { .. } => None,
        }
    }
}

/// URL 候選的分類結果，每次驗證時建立
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCandidate {
    pub has_scheme: bool,
    pub normalized: String,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub payload: String,
    pub mode: InputMode,
    /// 是否自動補上了 `https://`
    pub scheme_added: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl From<&QrError> for Status {
    fn from(err: &QrError) -> Self {
        Self::error(err.to_string())
    }
}

/// 單次生成週期的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GenerationState {
    #[default]
    Idle,
    Validating,
    Rejected,
    Encoding,
    Rendered,
    Failed,
}
