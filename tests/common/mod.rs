#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use small_qr::domain::model::{DownloadLink, QrImage, RasterOptions, Status, VectorOptions};
use small_qr::domain::ports::{Clipboard, Presenter, QrEncoder};
use small_qr::utils::error::{QrError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 記錄每次呼叫的假編碼器；`timeout` 一律失敗，`panic` 會讓任務 panic，可替個別內容設定延遲
#[derive(Default)]
pub struct MockEncoder {
    calls: Mutex<Vec<String>>,
    delays: HashMap<String, Duration>,
}

impl MockEncoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(payload: &str, delay: Duration) -> Arc<Self> {
        let mut encoder = Self::default();
        encoder.delays.insert(payload.to_string(), delay);
        Arc::new(encoder)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, payload: &str) -> Result<()> {
        self.calls.lock().unwrap().push(payload.to_string());
        if let Some(delay) = self.delays.get(payload) {
            tokio::time::sleep(*delay).await;
        }
        if payload == "panic" {
            panic!("encoder crashed");
        }
        if payload == "timeout" {
            return Err(QrError::encode_failure("timeout"));
        }
        Ok(())
    }
}

#[async_trait]
impl QrEncoder for MockEncoder {
    async fn encode_raster(&self, payload: &str, _options: &RasterOptions) -> Result<String> {
        self.record(payload).await?;
        let body = base64::engine::general_purpose::STANDARD.encode(payload);
        Ok(format!("data:image/png;base64,{}", body))
    }

    async fn encode_vector(&self, payload: &str, _options: &VectorOptions) -> Result<String> {
        self.record(payload).await?;
        Ok(format!("<svg data-payload=\"{}\"/>", payload))
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub shown: Vec<(QrImage, DownloadLink)>,
    pub clears: usize,
    pub statuses: Vec<Status>,
}

impl RecordingPresenter {
    pub fn last_status(&self) -> &Status {
        self.statuses.last().expect("no status was reported")
    }

    pub fn messages(&self) -> Vec<&str> {
        self.statuses.iter().map(|s| s.message.as_str()).collect()
    }
}

impl Presenter for RecordingPresenter {
    fn show(&mut self, image: &QrImage, link: &DownloadLink) {
        self.shown.push((image.clone(), link.clone()));
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn status(&mut self, status: &Status) {
        self.statuses.push(status.clone());
    }
}

/// 記錄寫入內容的剪貼簿；可設定為不支援影像
#[derive(Default)]
pub struct RecordingClipboard {
    pub reject_images: bool,
    pub texts: Mutex<Vec<String>>,
    pub images: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn write_image(&self, png: &[u8]) -> Result<()> {
        if self.reject_images {
            return Err(QrError::export_failure("images are not supported"));
        }
        self.images.lock().unwrap().push(png.to_vec());
        Ok(())
    }
}
