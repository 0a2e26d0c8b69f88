use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to determine token directory")]
    DirResolution(#[source] std::io::Error),

    #[error("Failed to create token directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read token file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write token file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete token file '{0}'")]
    Delete(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode token data from '{0}'")]
    Decode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode token data")]
    Encode(#[source] Box<bincode::error::EncodeError>),
}
