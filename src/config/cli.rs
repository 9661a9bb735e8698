use crate::config::Settings;
use crate::domain::model::{Color, EccLevel, InputMode, OutputFormat};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "small-qr")]
#[command(about = "Generate QR codes (PNG or SVG) from text or URLs")]
pub struct CliConfig {
    /// Text or URL to encode
    pub text: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Image width in pixels (PNG)
    #[arg(long)]
    pub size: Option<u32>,

    /// Quiet zone in modules (PNG)
    #[arg(long)]
    pub margin: Option<u32>,

    /// Error correction level: L, M, Q or H
    #[arg(long)]
    pub ecc: Option<EccLevel>,

    /// Foreground (dark module) color, e.g. #111111
    #[arg(long)]
    pub fg: Option<Color>,

    /// Background color, e.g. #ffffff
    #[arg(long)]
    pub bg: Option<Color>,

    /// Output format: png or svg
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Input mode: url (adds https:// when missing) or text
    #[arg(short, long)]
    pub mode: Option<InputMode>,

    /// Disable auto-generation on parameter changes (interactive mode)
    #[arg(long)]
    pub no_auto: bool,

    /// Quiescence window for auto-generation, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Apply every completed result instead of only the latest request
    #[arg(long)]
    pub keep_stale: bool,

    /// Directory the download file is written to
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// File name stem of the download (default: qrcode)
    #[arg(long)]
    pub filename: Option<String>,

    /// Read edits and commands from stdin, one per line
    #[arg(short, long)]
    pub interactive: bool,

    /// Copy the result to the system clipboard
    #[arg(long)]
    pub copy: bool,

    /// Print a JSON report of the generated code
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(text) = &self.text {
            settings.form.text = text.clone();
        }
        if let Some(size) = self.size {
            settings.form.size = size;
        }
        if let Some(margin) = self.margin {
            settings.controller.margin = margin;
        }
        if let Some(ecc) = self.ecc {
            settings.form.ecc = ecc;
        }
        if let Some(fg) = self.fg {
            settings.form.foreground = fg;
        }
        if let Some(bg) = self.bg {
            settings.form.background = bg;
        }
        if let Some(format) = self.format {
            settings.form.format = format;
        }
        if let Some(mode) = self.mode {
            settings.form.mode = mode;
        }
        if self.no_auto {
            settings.form.auto_generate = false;
        }
        if let Some(ms) = self.debounce_ms {
            settings.controller.debounce = Duration::from_millis(ms);
        }
        if self.keep_stale {
            settings.controller.discard_stale = false;
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }
        if let Some(stem) = &self.filename {
            settings.controller.filename_stem = stem.clone();
        }
        if self.json_logs {
            settings.json_logs = true;
        }
    }
}
