use crate::domain::ports::Clipboard;
use crate::utils::error::{QrError, Result};
use async_trait::async_trait;

/// 作業系統剪貼簿（arboard）。寫入在阻塞執行緒上進行，避免卡住事件迴圈。
#[cfg(feature = "clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "clipboard")]
fn clipboard_error(e: arboard::Error) -> QrError {
    QrError::export_failure(e.to_string())
}

#[cfg(feature = "clipboard")]
async fn run_blocking<F>(job: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| QrError::export_failure(format!("clipboard task failed: {}", e)))?
}

#[cfg(feature = "clipboard")]
#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        run_blocking(move || {
            let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
            clipboard.set_text(text).map_err(clipboard_error)
        })
        .await
    }

    async fn write_image(&self, png: &[u8]) -> Result<()> {
        let png = png.to_vec();
        run_blocking(move || {
            // arboard 只接受 RGBA 像素，先把 PNG 解開
            let rgba = image::load_from_memory(&png)
                .map_err(|e| QrError::export_failure(format!("invalid PNG: {}", e)))?
                .to_rgba8();
            let (width, height) = rgba.dimensions();
            let image = arboard::ImageData {
                width: width as usize,
                height: height as usize,
                bytes: std::borrow::Cow::Owned(rgba.into_raw()),
            };

            let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
            clipboard.set_image(image).map_err(clipboard_error)
        })
        .await
    }
}

/// 沒有剪貼簿可用時的替代品（無頭環境或未啟用 `clipboard` feature）
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedClipboard;

#[async_trait]
impl Clipboard for UnsupportedClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(QrError::export_failure("clipboard is not available"))
    }

    async fn write_image(&self, _png: &[u8]) -> Result<()> {
        Err(QrError::export_failure("clipboard is not available"))
    }
}
