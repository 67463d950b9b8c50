use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchdogError {
    #[error("Config error: {0}")]
    Config(#[from] gp_config::ConfigError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Signal handling error: {message}")]
    Signal { message: String },
}

pub type Result<T> = std::result::Result<T, WatchdogError>;
