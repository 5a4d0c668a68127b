//! Error types for deployment transactions and queries.
//!
//! No `anyhow` leakage. Explicit, typed errors. Network failures and ledger
//! rejections are different variants and stay that way.

/// Failure on the write path (build, sign, broadcast).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    #[error("creator address is missing")]
    MissingCreator,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transaction rejected: code={code}, log={raw_log}")]
    Rejected { code: u32, raw_log: String },
}

impl TxError {
    /// Whether the ledger was never reached (as opposed to reached and said no).
    pub fn is_transport(&self) -> bool {
        matches!(self, TxError::Connection(_))
    }

    /// Remote diagnostic text, if the ledger supplied one.
    pub fn raw_log(&self) -> Option<&str> {
        match self {
            TxError::Rejected { raw_log, .. } => Some(raw_log),
            _ => None,
        }
    }
}

/// Failure on the read path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query unavailable: {0}")]
    Unavailable(String),

    #[error("malformed query response: {0}")]
    Decode(String),

    #[error("no signed-in address: {0}")]
    NotSignedIn(String),
}

impl QueryError {
    pub fn is_transport(&self) -> bool {
        matches!(self, QueryError::Unavailable(_))
    }
}

/// Failure while reading client configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
