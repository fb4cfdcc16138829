use thiserror::Error;

/// The full set of outcomes the core reports to the transport layer.
/// Everything except `Store` is a normal negative outcome; `Store` means
/// the backing database failed and is logged with context at the boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found")]
    NotFound,

    #[error("no valid session")]
    Unauthorized,

    #[error("not the owner of this resource")]
    Forbidden,

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("{0} already taken")]
    DuplicateKey(&'static str),

    #[error("no active session")]
    NoActiveSession,

    #[error("backing store unavailable")]
    Store(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
