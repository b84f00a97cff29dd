use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Client error: {0}")]
    Client(String),

    #[error("Memory error: {0}")]
    Memory(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, DialogError>;
