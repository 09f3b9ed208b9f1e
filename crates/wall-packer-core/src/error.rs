use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Invalid wall geometry: {reason}")]
    InvalidWall { reason: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
