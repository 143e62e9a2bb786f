use crate::paginate::Cancelled;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed id {id:?}: {reason}")]
    MalformedId { id: String, reason: &'static str },
    #[error("malformed qualified name {name:?}: {reason}")]
    MalformedQualifiedName { name: String, reason: String },
    #[error("pagination cancelled")]
    Cancelled,
    #[error("aws error {0}")]
    Aws(String),
}

impl Error {
    pub(crate) fn malformed_id(id: &str, reason: &'static str) -> Self {
        Error::MalformedId {
            id: id.to_string(),
            reason,
        }
    }

    pub(crate) fn malformed_name(name: &str, reason: impl Into<String>) -> Self {
        Error::MalformedQualifiedName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Error::Cancelled
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
