//! Transaction execution: sign, broadcast, classify, invalidate.

use crate::backend::{KeyedSigner, SigningConnection};
use crate::cache::{MetaCache, METAS};
use crate::error::TxError;
use crate::message::Message;
use crate::types::{Fee, TxResult};

/// Runs message batches through a signer and keeps the cache honest.
///
/// Only a transaction the ledger accepted (code 0) invalidates cached
/// listings. Connection failures and rejections leave the cache untouched.
pub struct TxExecutor<'a, S: KeyedSigner> {
    signer: &'a S,
    endpoint: &'a str,
    cache: &'a MetaCache,
}

impl<'a, S: KeyedSigner> TxExecutor<'a, S> {
    pub fn new(signer: &'a S, endpoint: &'a str, cache: &'a MetaCache) -> Self {
        Self {
            signer,
            endpoint,
            cache,
        }
    }

    /// Sign and broadcast `messages` as one atomic transaction.
    pub async fn execute(
        &self,
        messages: Vec<Message>,
        fee: &Fee,
        memo: Option<&str>,
    ) -> Result<TxResult, TxError> {
        if messages.is_empty() {
            return Err(TxError::InvalidRequest("no messages to broadcast".into()));
        }

        let creator = self.signer.address()?;
        if creator.trim().is_empty() {
            return Err(TxError::MissingCreator);
        }
        if let Some(foreign) = messages.iter().find(|m| m.creator() != creator) {
            return Err(TxError::InvalidRequest(format!(
                "{} for {:?} is not signed by {}",
                foreign.kind(),
                foreign.name(),
                creator
            )));
        }

        let connection = self.signer.signing_connection(self.endpoint).await?;

        let kinds: Vec<&'static str> = messages.iter().map(Message::kind).collect();
        let encoded = messages.iter().map(Message::encode).collect();
        let memo = memo.filter(|m| !m.is_empty());

        let result = connection.broadcast(encoded, fee, memo).await?;

        if !result.is_success() {
            tracing::warn!(
                code = result.code,
                raw_log = %result.raw_log,
                hash = %result.hash,
                messages = ?kinds,
                "transaction rejected"
            );
            return Err(TxError::Rejected {
                code: result.code,
                raw_log: result.raw_log,
            });
        }

        tracing::info!(
            hash = %result.hash,
            height = result.height,
            messages = ?kinds,
            "transaction committed"
        );
        self.cache.invalidate(METAS);

        Ok(result)
    }
}
