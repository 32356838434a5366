use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The endpoint could not be reached, or answered with a non-success
    /// status.
    Transport,
    /// The request did not settle within the allotted time.
    Timeout,
    /// The endpoint answered, but the body is not what we expect.
    Protocol,
}

impl ErrorKind {
    /// Returns `true` if this error happened before a usable response
    /// was received.
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::Timeout)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport failure"),
            ErrorKind::Timeout => write!(f, "Timed out"),
            ErrorKind::Protocol => write!(f, "Protocol failure"),
        }
    }
}
