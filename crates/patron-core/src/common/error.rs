//! Error types for the patron client.
//!
//! This module defines the central `Error` enum. Everything the remote `Waiter`
//! service (or the connection to it) signals is carried unchanged in
//! [`Error::Remote`]; the remaining variants cover local failures that happen
//! before or around a call.
//!
//! ## Error Cases
//! - `Remote`: Any failure signaled by the channel: a refused connection, a
//!   mid-stream error or a malformed response.
//! - `Transport`: The endpoint could not be built from the configured address.
//! - `InvalidRequest`: Client input was malformed (pacing, meal batches).
//! - `ChannelError`: An internal task feeding an outbound stream failed.

use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the patron client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The remote service, or the connection to it, reported a failure.
    #[error("Remote error: {:?}: {}", .0.code(), .0.message())]
    Remote(#[from] Status),

    /// The server endpoint could not be built.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The client request was malformed.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Internal task communication failure.
    #[error("Channel error: {context}")]
    ChannelError { context: String },
}

impl Error {
    /// Returns `true` if the failure was signaled by the remote channel.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_))
    }

    /// The gRPC status code of a remote failure.
    pub fn code(&self) -> Option<Code> {
        match self {
            Error::Remote(status) => Some(status.code()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_keep_their_status() {
        let err = Error::from(Status::not_found("no such meal"));
        assert!(err.is_remote());
        assert_eq!(err.code(), Some(Code::NotFound));
        assert_eq!(err.to_string(), "Remote error: NotFound: no such meal");
    }

    #[test]
    fn local_errors_have_no_code() {
        let err = Error::InvalidRequest {
            reason: "empty batch".to_string(),
        };
        assert!(!err.is_remote());
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "Invalid request: empty batch");
    }
}
