use crate::domain::model::{EncodeRequest, EncodeResult, OutputFormat, QrImage};
use crate::domain::ports::QrEncoder;
use crate::utils::error::QrError;

/// 依格式呼叫編碼器，將任何錯誤轉為 `EncodeResult::Failure`
pub async fn encode<E: QrEncoder + ?Sized>(encoder: &E, request: &EncodeRequest) -> EncodeResult {
    tracing::debug!(
        "Encoding {} chars as {} (size={}, ecc={})",
        request.payload.chars().count(),
        request.format,
        request.size,
        request.ecc
    );

    let outcome = match request.format {
        OutputFormat::Png => encoder
            .encode_raster(&request.payload, &request.raster_options())
            .await
            .map(|data_url| QrImage::Raster { data_url }),
        OutputFormat::Svg => encoder
            .encode_vector(&request.payload, &request.vector_options())
            .await
            .map(|markup| QrImage::Vector { markup }),
    };

    match outcome {
        Ok(image) => EncodeResult::Success(image),
        Err(e) => {
            tracing::warn!("⚠️ Encoder rejected request: {}", e);
            EncodeResult::Failure {
                reason: failure_reason(e),
            }
        }
    }
}

// 編碼失敗只保留原因本身，避免狀態列出現重複前綴
fn failure_reason(err: QrError) -> String {
    match err {
        QrError::EncodeFailure { message } => message,
        other => other.to_string(),
    }
}
