// Typed errors for quote store operations

use thiserror::Error;

/// Every way a store operation can fail.
///
/// All variants are terminal for the attempted action: nothing is retried,
/// and the caller surfaces the message to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was empty after trimming.
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    /// A record identical in all five fields already exists.
    #[error("an identical quote already exists")]
    Duplicate,

    /// No record with the given id. The target may have been deleted by an
    /// earlier action.
    #[error("no quote with id `{0}`")]
    NotFound(String),

    /// The server answered 401. The caller must re-authenticate before
    /// retrying anything.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// Network failure, unreadable response, or a server-rejected mutation.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The local blob could not be read or written.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            StoreError::SessionExpired
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            StoreError::MissingField("bookTitle").to_string(),
            "required field `bookTitle` is empty"
        );
        assert_eq!(
            StoreError::Duplicate.to_string(),
            "an identical quote already exists"
        );
        assert_eq!(
            StoreError::NotFound("q-1".to_string()).to_string(),
            "no quote with id `q-1`"
        );
        assert_eq!(
            StoreError::SessionExpired.to_string(),
            "session expired, please log in again"
        );
    }

    #[test]
    fn test_io_errors_map_to_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::from(io);
        assert!(matches!(err, StoreError::Persistence(_)));
        assert!(err.to_string().contains("denied"));
    }
}
