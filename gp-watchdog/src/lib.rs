pub mod cli;
pub mod console;
pub mod error;
pub mod logger;
pub mod presenter;
pub mod watchdog;


pub use cli::Cli;
pub use console::OperatorCommand;
pub use error::{Result as WatchdogResult, WatchdogError};
