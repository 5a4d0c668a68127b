//! Client configuration read from the environment.
//!
//! `.env` is loaded first if present; real environment variables win.
//!
//! | Variable                | Default                 |
//! |-------------------------|-------------------------|
//! | `DEPLOY_RPC_ENDPOINT`   | required                |
//! | `DEPLOY_GRPC_ENDPOINT`  | `DEPLOY_RPC_ENDPOINT`   |
//! | `DEPLOY_CHAIN_ID`       | required                |
//! | `DEPLOY_ADDRESS_PREFIX` | required                |
//! | `DEPLOY_GAS_DENOM`      | required                |
//! | `DEPLOY_URL_SCHEME`     | `https`                 |
//! | `DEPLOY_URL_DOMAIN`     | required                |
//! | `DEPLOY_PAGE_SIZE`      | `10`                    |

use crate::error::ConfigError;
use crate::query::DEFAULT_PAGE_SIZE;

pub const RPC_ENDPOINT: &str = "DEPLOY_RPC_ENDPOINT";
pub const GRPC_ENDPOINT: &str = "DEPLOY_GRPC_ENDPOINT";
pub const CHAIN_ID: &str = "DEPLOY_CHAIN_ID";
pub const ADDRESS_PREFIX: &str = "DEPLOY_ADDRESS_PREFIX";
pub const GAS_DENOM: &str = "DEPLOY_GAS_DENOM";
pub const URL_SCHEME: &str = "DEPLOY_URL_SCHEME";
pub const URL_DOMAIN: &str = "DEPLOY_URL_DOMAIN";
pub const PAGE_SIZE: &str = "DEPLOY_PAGE_SIZE";

const DEFAULT_URL_SCHEME: &str = "https";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint transactions are signed against and broadcast to.
    pub rpc_endpoint: String,
    /// Endpoint read-only queries go to.
    pub grpc_endpoint: String,
    pub chain_id: String,
    /// Bech32 prefix of account addresses.
    pub address_prefix: String,
    pub gas_denom: String,
    /// Scheme and domain of composed deployment URLs.
    pub url_scheme: String,
    pub url_domain: String,
    pub page_size: usize,
}

impl ClientConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let rpc_endpoint = require(RPC_ENDPOINT)?;
        validate_endpoint(RPC_ENDPOINT, &rpc_endpoint)?;

        let grpc_endpoint = get(GRPC_ENDPOINT).unwrap_or_else(|| rpc_endpoint.clone());
        validate_endpoint(GRPC_ENDPOINT, &grpc_endpoint)?;

        let page_size = match get(PAGE_SIZE) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: PAGE_SIZE,
                        reason: "must be positive".into(),
                    })
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: PAGE_SIZE,
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            rpc_endpoint,
            grpc_endpoint,
            chain_id: require(CHAIN_ID)?,
            address_prefix: require(ADDRESS_PREFIX)?,
            gas_denom: require(GAS_DENOM)?,
            url_scheme: get(URL_SCHEME).unwrap_or_else(|| DEFAULT_URL_SCHEME.to_string()),
            url_domain: require(URL_DOMAIN)?,
            page_size,
        })
    }
}

fn validate_endpoint(var: &'static str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            var,
            reason: format!("{:?} is not an http(s) URL", endpoint),
        })
    }
}
