pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{Settings, TomlConfig};

pub use adapters::{LocalStorage, QrCodeEncoder};
pub use core::controller::{ControllerConfig, RegenerationController, TriggerSource};
pub use utils::error::{QrError, Result};
