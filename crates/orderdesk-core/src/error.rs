//! Core error types.

use thiserror::Error;

/// Errors raised while serving `get_orders`.
#[derive(Debug, Error)]
pub enum Error {
    /// Filter/sort payload or paging parameters could not be decoded.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The store rejected a compiled query.
    #[error("query error: {0}")]
    Query(String),

    /// A result row does not have the expected shape.
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

impl From<orderdesk_proto::Error> for Error {
    fn from(err: orderdesk_proto::Error) -> Self {
        match err {
            orderdesk_proto::Error::MalformedInput(msg) => Error::MalformedInput(msg),
        }
    }
}
