// Adapters layer: concrete implementations of the domain ports.

pub mod clipboard;
pub mod qrcode_encoder;
pub mod storage;

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::UnsupportedClipboard;
pub use qrcode_encoder::QrCodeEncoder;
pub use storage::LocalStorage;
