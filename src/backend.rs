//! The seams: signing and querying.
//!
//! Everything that talks to the network sits behind these traits. The
//! executor, query client and session are pure logic over them, which is
//! what lets the whole flow run against an in-memory ledger in tests.

use crate::error::{QueryError, TxError};
use crate::message::EncodedMessage;
use crate::types::{DeploymentMeta, Fee, Filter, TxResult};
use std::future::Future;

/// Holder of key material.
///
/// Hands out an address and a signing capability, never the key itself.
pub trait KeyedSigner: Send + Sync {
    type Connection: SigningConnection;

    /// Ledger address derived from the key and the configured prefix.
    ///
    /// Fails with [`TxError::SignerUnavailable`] if no key is configured.
    fn address(&self) -> Result<String, TxError>;

    /// Open a connection that signs with this key and broadcasts to `endpoint`.
    ///
    /// Fails with [`TxError::Connection`] if the endpoint is unreachable.
    fn signing_connection(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Self::Connection, TxError>> + Send;
}

/// A connection bound to one key that can sign and broadcast.
pub trait SigningConnection: Send + Sync {
    /// Sign `messages` as a single transaction and broadcast it.
    ///
    /// Returns the ledger's response as-is, including non-zero codes.
    /// Only transport or signing failures are errors here.
    fn broadcast(
        &self,
        messages: Vec<EncodedMessage>,
        fee: &Fee,
        memo: Option<&str>,
    ) -> impl Future<Output = Result<TxResult, TxError>> + Send;
}

/// Read-only, unauthenticated access to deployment metadata.
pub trait MetaQuerier: Send + Sync {
    /// Fetch every meta matching all `filters`.
    fn query_metas(
        &self,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<DeploymentMeta>, QueryError>> + Send;
}
