pub mod controller;
pub mod debounce;
pub mod encode;
pub mod export;
pub mod normalizer;

pub use crate::domain::model::{EncodeRequest, EncodeResult, FormState, QrImage, Status};
pub use crate::domain::ports::{Clipboard, Presenter, QrEncoder, Storage};
pub use crate::utils::error::Result;
