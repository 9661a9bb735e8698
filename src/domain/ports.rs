use crate::domain::model::{DownloadLink, QrImage, RasterOptions, Status, VectorOptions};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 外部 QR 編碼器。核心只依賴這個介面，不關心實際編碼方式。
#[async_trait]
pub trait QrEncoder: Send + Sync + 'static {
    /// 啟動時檢查一次編碼器是否可用
    fn probe(&self) -> Result<()> {
        Ok(())
    }

    /// 產生 PNG，回傳 data URL
    async fn encode_raster(&self, payload: &str, options: &RasterOptions) -> Result<String>;

    /// 產生 SVG 標記
    async fn encode_vector(&self, payload: &str, options: &VectorOptions) -> Result<String>;
}

/// UI 邊界：顯示影像、清除輸出、更新狀態列
pub trait Presenter: Send {
    fn show(&mut self, image: &QrImage, link: &DownloadLink);
    fn clear(&mut self);
    fn status(&mut self, status: &Status);
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;

    /// 以影像物件寫入剪貼簿；平台不支援時回傳錯誤
    async fn write_image(&self, png: &[u8]) -> Result<()>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
