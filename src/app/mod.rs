// App layer: terminal front-end wiring the controller to stdin/stdout.

pub mod commands;
pub mod presenter;
pub mod report;
pub mod session;

pub use commands::{parse_command, Command};
pub use presenter::TerminalPresenter;
pub use report::GenerationReport;
pub use session::{Flow, Session};
