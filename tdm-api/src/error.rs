use std::fmt;

use crate::{CommentId, DisasterId};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target {
    Comment(CommentId),
    Disaster(DisasterId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Comment(id) => write!(f, "comment {id}"),
            Target::Disaster(id) => write!(f, "disaster {id}"),
        }
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Name already used {0}")]
    DuplicateUser(String),

    #[error("Password is required")]
    MissingPassword,

    #[error("Invalid user name or password")]
    InvalidCredentials,

    #[error("Must be logged in")]
    NotAuthenticated,

    #[error("Comment text is empty")]
    EmptyText,

    #[error("Parent comment {0} not found")]
    ParentNotFound(CommentId),

    #[error("{0} not found")]
    NotFound(Target),

    #[error("Disaster has no location")]
    InvalidLocation,
}

impl Error {
    /// Stable identifier of the error kind, for the UI to pick a message
    pub fn code(&self) -> &'static str {
        match self {
            Error::DuplicateUser(_) => "duplicate-user",
            Error::MissingPassword => "missing-password",
            Error::InvalidCredentials => "invalid-credentials",
            Error::NotAuthenticated => "not-authenticated",
            Error::EmptyText => "empty-text",
            Error::ParentNotFound(_) => "parent-not-found",
            Error::NotFound(_) => "not-found",
            Error::InvalidLocation => "invalid-location",
        }
    }
}
