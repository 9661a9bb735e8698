use crate::domain::model::{DownloadLink, QrImage, Status, StatusKind};
use crate::domain::ports::Presenter;
use std::io::Write;

/// 終端機版的 UI：狀態列與輸出摘要寫到同一個 writer
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    showing: Option<DownloadLink>,
    last_status: Option<Status>,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            showing: None,
            last_status: None,
        }
    }

    /// 目前顯示中的下載連結
    pub fn showing(&self) -> Option<&DownloadLink> {
        self.showing.as_ref()
    }

    pub fn last_status(&self) -> Option<&Status> {
        self.last_status.as_ref()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// 不屬於狀態列的輸出，例如說明文字
    pub fn note(&mut self, text: &str) {
        self.write_line(text);
    }

    fn write_line(&mut self, line: &str) {
        // 終端機寫入失敗不影響生成流程
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|()| self.out.flush()) {
            tracing::warn!("⚠️ Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn show(&mut self, image: &QrImage, link: &DownloadLink) {
        let detail = match image {
            QrImage::Raster { data_url } => format!("{} chars data URL", data_url.len()),
            QrImage::Vector { markup } => format!("{} bytes of markup", markup.len()),
        };
        self.write_line(&format!(
            "🖼️  {} ready: {} ({})",
            image.format().label(),
            link.filename,
            detail
        ));
        self.showing = Some(link.clone());
    }

    fn clear(&mut self) {
        if self.showing.take().is_some() {
            self.write_line("🧹 Output cleared");
        }
    }

    fn status(&mut self, status: &Status) {
        let icon = match status.kind {
            StatusKind::Info => "⏳",
            StatusKind::Success => "✅",
            StatusKind::Error => "❌",
        };
        self.write_line(&format!("{} {}", icon, status.message));
        self.last_status = Some(status.clone());
    }
}
