use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeilError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("image fingerprinting unavailable")]
    FingerprintUnavailable,
    #[error("structure mismatch after redaction: {0}")]
    StructureMismatch(&'static str),
    #[error("invalid document: {0}")]
    InvalidDocument(&'static str),
    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VeilError>;

impl From<anyhow::Error> for VeilError {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(value.to_string())
    }
}
