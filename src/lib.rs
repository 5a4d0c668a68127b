//! Ledger Deploy Library
//!
//! Client-side create/update/remove of deployments on a ledger, with
//! filtered, paginated reads kept consistent with the writes.
//!
//! # Design
//!
//! Signing and querying sit behind two traits, [`KeyedSigner`] and
//! [`MetaQuerier`]. Everything else is pure logic on top:
//!
//! - [`message`] builds create/update/remove messages from a request
//! - [`TxExecutor`] signs, broadcasts and classifies the ledger response
//! - [`QueryClient`] fetches the filtered set and pages it locally
//! - [`MetaCache`] is marked stale by every committed write
//! - [`DeploymentSession`] ties them together for one signed-in user
//!
//! The `default-client` feature provides [`MnemonicSigner`] and
//! [`GrpcQuerier`] on top of layer-climb and tonic.
//!
//! # Usage
//!
//! ```ignore
//! use ledger_deploy_rs::{connect, ClientConfig, DeploymentRequest, Fee, TxError};
//!
//! let config = ClientConfig::from_env()?;
//! let fee = Fee::new(5_000, config.gas_denom.clone(), 200_000);
//! let session = connect(&mnemonic, config, fee).await?;
//!
//! match session.create_deployment(DeploymentRequest::new("site1")).await {
//!     Ok(hash) => println!("committed in {}", hash),
//!     Err(TxError::Rejected { code, raw_log }) => println!("ledger said no ({}): {}", code, raw_log),
//!     Err(e) if e.is_transport() => println!("network problem: {}", e),
//!     Err(e) => println!("{}", e),
//! }
//!
//! // The cache was invalidated by the commit; this refetches.
//! let page = session.my_deployments(1).await?;
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod gen;
pub mod message;
pub mod query;
pub mod session;
pub mod types;

#[cfg(feature = "default-client")]
pub mod client;

// Re-export the main types at crate root for convenience
pub use backend::{KeyedSigner, MetaQuerier, SigningConnection};
pub use cache::{CacheEntry, CacheKey, MetaCache, METAS};
pub use config::ClientConfig;
pub use error::{ConfigError, QueryError, TxError};
pub use executor::TxExecutor;
pub use message::{build_create, build_remove, build_update, EncodedMessage, Message};
pub use query::{Page, QueryClient, DEFAULT_PAGE_SIZE};
pub use session::DeploymentSession;
pub use types::*;

#[cfg(feature = "default-client")]
pub use client::{connect, ClimbConnection, GrpcQuerier, LedgerSession, MnemonicSigner};
