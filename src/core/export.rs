use crate::domain::model::{QrImage, Status};
use crate::domain::ports::{Clipboard, Storage};
use crate::utils::error::{QrError, Result};
use crate::utils::validation::validate_file_name;

/// 複製動作實際走的路徑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// SVG 標記以文字複製
    Markup,
    /// PNG 以影像物件複製
    Image,
    /// 影像寫入失敗，改以 data URL 文字複製
    DataUrlFallback,
    /// 「複製 data URL」動作
    DataUrl,
}

impl CopyOutcome {
    pub fn status(self, image: &QrImage) -> Status {
        let message = match self {
            Self::Markup => "SVG markup copied to clipboard.".to_string(),
            Self::Image => "PNG image copied to clipboard.".to_string(),
            Self::DataUrlFallback => "Image data URL copied to clipboard (fallback).".to_string(),
            Self::DataUrl => format!("{} data URL copied to clipboard.", image.format().label()),
        };
        Status::success(message)
    }
}

/// 主要的複製動作：SVG 複製標記；PNG 先試影像，失敗則退回 data URL 文字
pub async fn copy_image<C: Clipboard + ?Sized>(clipboard: &C, image: &QrImage) -> Result<CopyOutcome> {
    match image {
        QrImage::Vector { markup } => {
            clipboard.write_text(markup).await?;
            Ok(CopyOutcome::Markup)
        }
        QrImage::Raster { data_url } => {
            let png = image.bytes()?;
            match clipboard.write_image(&png).await {
                Ok(()) => Ok(CopyOutcome::Image),
                Err(e) => {
                    tracing::warn!("⚠️ Image copy unsupported, falling back to data URL: {}", e);
                    clipboard.write_text(data_url).await?;
                    Ok(CopyOutcome::DataUrlFallback)
                }
            }
        }
    }
}

pub async fn copy_data_url<C: Clipboard + ?Sized>(clipboard: &C, image: &QrImage) -> Result<CopyOutcome> {
    clipboard.write_text(&image.data_url()).await?;
    Ok(CopyOutcome::DataUrl)
}

/// 將複製結果轉成狀態訊息；失敗一律以 `Copy failed: ...` 呈現
pub fn copy_status(outcome: &Result<CopyOutcome>, image: &QrImage) -> Status {
    match outcome {
        Ok(outcome) => outcome.status(image),
        Err(QrError::ExportFailure { message }) => {
            Status::error(QrError::export_failure(message.clone()).to_string())
        }
        Err(e) => Status::error(QrError::export_failure(e.to_string()).to_string()),
    }
}

/// 把目前影像存成下載檔，回傳完整路徑
pub async fn save_download<S: Storage>(
    storage: &S,
    image: &QrImage,
    filename: &str,
) -> Result<String> {
    validate_file_name("filename", filename, image.format().extension())?;
    let bytes = image.bytes()?;

    tracing::debug!("Writing {} ({} bytes)", filename, bytes.len());
    let path = storage.write_file(filename, &bytes).await.map_err(|e| match e {
        QrError::IoError(io) => QrError::export_failure(format!("could not save {}: {}", filename, io)),
        other => other,
    })?;

    tracing::info!("📁 Download saved to: {}", path);
    Ok(path)
}
