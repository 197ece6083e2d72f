use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
