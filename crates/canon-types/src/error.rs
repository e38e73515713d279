use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unexpected end of descriptor")]
    UnexpectedEof,
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}
