//! Per-user session: the operation surface presentation code calls.
//!
//! A session owns the signer, the querier and the read cache for one
//! signed-in user. Nothing here is global; two sessions never share state.
//!
//! ```ignore
//! let session = DeploymentSession::new(signer, querier, config, fee);
//!
//! let hash = session
//!     .create_deployment(DeploymentRequest::new("site1").with_domain("example.com"))
//!     .await?;
//!
//! let page = session.my_deployments(1).await?;
//! for meta in &page.items {
//!     println!("{}", session.deployment_url(&meta.name)?);
//! }
//! ```

use crate::backend::{KeyedSigner, MetaQuerier};
use crate::cache::MetaCache;
use crate::config::ClientConfig;
use crate::error::{QueryError, TxError};
use crate::executor::TxExecutor;
use crate::message::{build_create, build_remove, build_update, Message};
use crate::query::{Page, QueryClient};
use crate::types::{compose_url, DeploymentRequest, Fee, Filter, TxHash};

pub struct DeploymentSession<S: KeyedSigner, Q: MetaQuerier> {
    signer: Option<S>,
    querier: Q,
    cache: MetaCache,
    config: ClientConfig,
    fee: Fee,
}

impl<S: KeyedSigner, Q: MetaQuerier> DeploymentSession<S, Q> {
    pub fn new(signer: S, querier: Q, config: ClientConfig, fee: Fee) -> Self {
        Self {
            signer: Some(signer),
            querier,
            cache: MetaCache::new(),
            config,
            fee,
        }
    }

    /// A session that can read but has nobody signed in.
    pub fn read_only(querier: Q, config: ClientConfig, fee: Fee) -> Self {
        Self {
            signer: None,
            querier,
            cache: MetaCache::new(),
            config,
            fee,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &MetaCache {
        &self.cache
    }

    pub fn fee(&self) -> &Fee {
        &self.fee
    }

    pub fn set_fee(&mut self, fee: Fee) {
        self.fee = fee;
    }

    pub fn is_signed_in(&self) -> bool {
        self.signer.is_some()
    }

    /// Address of the signed-in user.
    pub fn address(&self) -> Result<String, TxError> {
        self.signer()?.address()
    }

    pub async fn create_deployment(&self, request: DeploymentRequest) -> Result<TxHash, TxError> {
        let creator = self.creator()?;
        let msg = build_create(&request, &creator)?;
        self.submit(msg, &request.memo).await
    }

    pub async fn update_deployment(&self, request: DeploymentRequest) -> Result<TxHash, TxError> {
        let creator = self.creator()?;
        let msg = build_update(&request, &creator)?;
        self.submit(msg, &request.memo).await
    }

    pub async fn remove_deployment(&self, name: &str) -> Result<TxHash, TxError> {
        let creator = self.creator()?;
        let msg = build_remove(name, &creator)?;
        self.submit(msg, "").await
    }

    /// Page `page` (1-based, clamped) of deployments created by `creator`.
    pub async fn list_deployments(&self, creator: &str, page: i64) -> Result<Page, QueryError> {
        let filters = [Filter::creator(creator)];
        QueryClient::new(&self.querier, &self.cache, self.config.page_size)
            .list(&filters, page)
            .await
    }

    /// Page `page` of the signed-in user's own deployments.
    pub async fn my_deployments(&self, page: i64) -> Result<Page, QueryError> {
        let address = self
            .address()
            .map_err(|e| QueryError::NotSignedIn(e.to_string()))?;
        self.list_deployments(&address, page).await
    }

    /// Externally reachable URL of one of the signed-in user's deployments.
    pub fn deployment_url(&self, name: &str) -> Result<String, TxError> {
        let address = self.address()?;
        Ok(compose_url(
            name,
            &address,
            &self.config.url_scheme,
            &self.config.url_domain,
        ))
    }

    /// Forget the key and everything read on its behalf.
    pub fn sign_out(&mut self) {
        self.signer = None;
        self.cache.clear();
        tracing::info!("signed out");
    }

    fn signer(&self) -> Result<&S, TxError> {
        self.signer
            .as_ref()
            .ok_or_else(|| TxError::SignerUnavailable("no key configured for this session".into()))
    }

    fn creator(&self) -> Result<String, TxError> {
        let creator = self.address()?;
        if creator.trim().is_empty() {
            return Err(TxError::MissingCreator);
        }
        Ok(creator)
    }

    async fn submit(&self, msg: Message, memo: &str) -> Result<TxHash, TxError> {
        let signer = self.signer()?;
        let memo = (!memo.is_empty()).then_some(memo);
        TxExecutor::new(signer, &self.config.rpc_endpoint, &self.cache)
            .execute(vec![msg], &self.fee, memo)
            .await
            .map(TxHash::from)
    }
}
