use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The container the app was asked to mount into does not exist.
    #[error("render host `#{0}` not found")]
    HostNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
