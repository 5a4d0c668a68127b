//! Default network implementation using layer-climb and tonic.
//!
//! * [`MnemonicSigner`]: [`KeyedSigner`] over a layer-climb `KeySigner`.
//!   Broadcasts through a layer-climb `SigningClient`.
//! * [`GrpcQuerier`]: [`MetaQuerier`] over a tonic channel, draining
//!   server-side pagination so callers always see the full filtered set.
//!
//! # Quick Start
//!
//! ```ignore
//! use ledger_deploy_rs::{connect, ClientConfig, DeploymentRequest, Fee};
//!
//! let config = ClientConfig::from_env()?;
//! let fee = Fee::new(5_000, config.gas_denom.clone(), 200_000);
//! let session = connect("your mnemonic words here", config, fee).await?;
//!
//! session.create_deployment(DeploymentRequest::new("site1")).await?;
//! let page = session.my_deployments(1).await?;
//! ```

use crate::backend::{KeyedSigner, MetaQuerier, SigningConnection};
use crate::config::ClientConfig;
use crate::error::{QueryError, TxError};
use crate::gen::cosmos::base::query::v1beta1::PageRequest;
use crate::gen::deployer::deployment::v1 as proto;
use crate::message::EncodedMessage;
use crate::session::DeploymentSession;
use crate::types::{DeploymentMeta, Fee, Filter, TxResult};

use layer_climb::prelude::*;
use std::fmt;
use std::time::Duration;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

/// Gas price put in the chain config. Broadcasts set an explicit fee coin,
/// so this only matters if layer-climb falls back to its own estimate.
const DEFAULT_GAS_PRICE: f32 = 0.025;

/// Metas requested per gRPC round-trip.
const QUERY_PAGE_LIMIT: u64 = 100;

/// Upper bound on round-trips when draining server-side pagination.
const MAX_QUERY_PAGES: usize = 1_000;

const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Session over the default network implementation.
pub type LedgerSession = DeploymentSession<MnemonicSigner, GrpcQuerier>;

/// Build a ready session from a mnemonic and configuration.
pub async fn connect(
    mnemonic: &str,
    config: ClientConfig,
    fee: Fee,
) -> Result<LedgerSession, TxError> {
    let signer = MnemonicSigner::new(mnemonic, &config).await?;
    let querier = GrpcQuerier::new(&config.grpc_endpoint)
        .map_err(|e| TxError::Connection(e.to_string()))?;
    tracing::info!(address = %signer.address, chain_id = %config.chain_id, "session opened");
    Ok(DeploymentSession::new(signer, querier, config, fee))
}

fn chain_config(config: &ClientConfig) -> ChainConfig {
    ChainConfig {
        chain_id: ChainId::new(config.chain_id.clone()),
        address_kind: AddrKind::Cosmos {
            prefix: config.address_prefix.clone(),
        },
        gas_price: DEFAULT_GAS_PRICE,
        gas_denom: config.gas_denom.clone(),
        rpc_endpoint: Some(config.rpc_endpoint.clone()),
        grpc_endpoint: Some(config.grpc_endpoint.clone()),
        grpc_web_endpoint: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
// SIGNING
// ═══════════════════════════════════════════════════════════════════

/// Signer holding a BIP39 mnemonic.
///
/// The mnemonic never leaves this struct. Each connection gets its own
/// layer-climb `KeySigner` derived from it.
pub struct MnemonicSigner {
    mnemonic: String,
    chain_config: ChainConfig,
    address: String,
}

impl MnemonicSigner {
    /// Derive the key and its address under the configured prefix.
    pub async fn new(mnemonic: &str, config: &ClientConfig) -> Result<Self, TxError> {
        let key = key_signer(mnemonic)?;
        let chain_config = chain_config(config);

        let public_key = key
            .public_key()
            .await
            .map_err(|e| TxError::SignerUnavailable(format!("failed to derive public key: {}", e)))?;
        let address = chain_config
            .address_from_pub_key(&public_key)
            .map_err(|e| TxError::SignerUnavailable(format!("failed to derive address: {}", e)))?;

        Ok(Self {
            mnemonic: mnemonic.to_string(),
            chain_config,
            address: address.to_string(),
        })
    }
}

fn key_signer(mnemonic: &str) -> Result<KeySigner, TxError> {
    KeySigner::new_mnemonic_str(mnemonic, None)
        .map_err(|e| TxError::SignerUnavailable(format!("invalid mnemonic: {}", e)))
}

impl fmt::Debug for MnemonicSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicSigner")
            .field("address", &self.address)
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

impl KeyedSigner for MnemonicSigner {
    type Connection = ClimbConnection;

    fn address(&self) -> Result<String, TxError> {
        Ok(self.address.clone())
    }

    async fn signing_connection(&self, endpoint: &str) -> Result<ClimbConnection, TxError> {
        let mut chain_config = self.chain_config.clone();
        chain_config.rpc_endpoint = Some(endpoint.to_string());

        let key = key_signer(&self.mnemonic)?;
        let client = SigningClient::new(chain_config, key, None::<Connection>)
            .await
            .map_err(|e| {
                TxError::Connection(format!("failed to create signing client for {}: {}", endpoint, e))
            })?;

        Ok(ClimbConnection { client })
    }
}

/// Signing client bound to one key and one endpoint.
pub struct ClimbConnection {
    client: SigningClient,
}

impl SigningConnection for ClimbConnection {
    async fn broadcast(
        &self,
        messages: Vec<EncodedMessage>,
        fee: &Fee,
        memo: Option<&str>,
    ) -> Result<TxResult, TxError> {
        // Hand layer-climb pre-encoded bytes so its prost version never has
        // to agree with ours.
        let any_msgs: Vec<layer_climb::proto::Any> = messages
            .into_iter()
            .map(|m| layer_climb::proto::Any {
                type_url: m.type_url,
                value: m.value,
            })
            .collect();

        let mut builder = self.client.tx_builder();
        builder
            .set_gas_coin(layer_climb::proto::Coin {
                denom: fee.denom.clone(),
                amount: fee.amount.to_string(),
            })
            .set_gas_units_or_simulate(Some(fee.gas_limit));
        if let Some(memo) = memo {
            builder.set_memo(memo);
        }

        let response = match builder.broadcast(any_msgs).await {
            Ok(response) => response,
            Err(e) => return broadcast_failure(&format!("{:#}", e)),
        };

        Ok(TxResult {
            hash: response.txhash,
            code: response.code,
            raw_log: response.raw_log,
            height: response.height as u64,
        })
    }
}

const REJECTION_PREFIX: &str = "tx failed with code: ";
const RAW_LOG_PREFIX: &str = ", raw_log: ";

/// Classify a layer-climb broadcast error.
///
/// layer-climb turns a non-zero result code into an error reading
/// `tx failed with code: N, codespace: C, raw_log: L`. That is the ledger
/// answering, so it comes back as a [`TxResult`] carrying `N` and `L` for the
/// executor to reject. Anything else never got an answer.
fn broadcast_failure(message: &str) -> Result<TxResult, TxError> {
    match parse_rejection(message) {
        Some((code, raw_log)) => Ok(TxResult {
            hash: String::new(),
            code,
            raw_log,
            height: 0,
        }),
        None => Err(TxError::Connection(format!(
            "failed to broadcast transaction: {}",
            message
        ))),
    }
}

fn parse_rejection(message: &str) -> Option<(u32, String)> {
    let start = message.find(REJECTION_PREFIX)? + REJECTION_PREFIX.len();
    let rest = &message[start..];
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let code: u32 = rest[..digits].parse().ok()?;
    if code == 0 {
        return None;
    }
    let raw_log = rest
        .find(RAW_LOG_PREFIX)
        .map(|at| rest[at + RAW_LOG_PREFIX.len()..].to_string())
        .unwrap_or_default();
    Some((code, raw_log))
}

// ═══════════════════════════════════════════════════════════════════
// QUERYING
// ═══════════════════════════════════════════════════════════════════

/// gRPC querier for deployment metadata. Needs no key.
#[derive(Debug, Clone)]
pub struct GrpcQuerier {
    channel: Channel,
    endpoint: String,
}

impl GrpcQuerier {
    /// Prepare a channel to `endpoint`. The connection is made on first use,
    /// so an unreachable endpoint surfaces as [`QueryError::Unavailable`]
    /// from the query, not here.
    pub fn new(endpoint: &str) -> Result<Self, QueryError> {
        let mut builder = Endpoint::from_shared(endpoint.to_string())
            .map_err(|e| QueryError::Unavailable(format!("invalid endpoint {}: {}", endpoint, e)))?
            .timeout(QUERY_TIMEOUT);

        if endpoint.starts_with("https://") {
            builder = builder
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| QueryError::Unavailable(format!("TLS setup failed: {}", e)))?;
        }

        Ok(Self {
            channel: builder.connect_lazy(),
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn metas_page(
        &self,
        request: proto::QueryMetasRequest,
    ) -> Result<proto::QueryMetasResponse, QueryError> {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready().await.map_err(|e| {
            QueryError::Unavailable(format!("{} not ready: {}", self.endpoint, e))
        })?;

        let codec: ProstCodec<proto::QueryMetasRequest, proto::QueryMetasResponse> =
            ProstCodec::default();
        let path = PathAndQuery::from_static(proto::QUERY_METAS_PATH);

        let response = grpc
            .unary(tonic::Request::new(request), path, codec)
            .await
            .map_err(|status| {
                QueryError::Unavailable(format!(
                    "metas query failed ({:?}): {}",
                    status.code(),
                    status.message()
                ))
            })?;

        Ok(response.into_inner())
    }
}

impl MetaQuerier for GrpcQuerier {
    async fn query_metas(&self, filters: &[Filter]) -> Result<Vec<DeploymentMeta>, QueryError> {
        let wire_filters: Vec<proto::Filter> = filters.iter().map(proto::Filter::from).collect();
        let mut metas = Vec::new();
        let mut key = Vec::new();

        for _ in 0..MAX_QUERY_PAGES {
            let response = self
                .metas_page(proto::QueryMetasRequest {
                    filters: wire_filters.clone(),
                    pagination: Some(PageRequest {
                        key: std::mem::take(&mut key),
                        limit: QUERY_PAGE_LIMIT,
                        ..Default::default()
                    }),
                })
                .await?;

            metas.extend(response.metas.into_iter().map(DeploymentMeta::from));

            match response.pagination {
                Some(page) if !page.next_key.is_empty() => key = page.next_key,
                _ => return Ok(metas),
            }
        }

        Err(QueryError::Decode(format!(
            "metas listing did not end after {} pages",
            MAX_QUERY_PAGES
        )))
    }
}
