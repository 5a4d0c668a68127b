//! Command-line deployment manager.
//!
//! Usage:
//!   cargo run --example deploy -- list [page]
//!   cargo run --example deploy -- create <name> <domain> [description] [archive.zip]
//!   cargo run --example deploy -- update <name> <domain> [description] [archive.zip]
//!   cargo run --example deploy -- remove <name>
//!
//! Environment:
//!   DEPLOY_MNEMONIC     - BIP39 mnemonic (required)
//!   DEPLOY_FEE_AMOUNT   - fee amount in the gas denom (default: 5000)
//!   DEPLOY_GAS_LIMIT    - gas limit (default: 200000)
//!   DEPLOY_*            - see `ClientConfig`

use anyhow::{bail, Context, Result};
use ledger_deploy_rs::{
    connect, ClientConfig, DeploymentRequest, Fee, LedgerSession, Page, TxError, TxHash,
};

const DEFAULT_FEE_AMOUNT: u128 = 5_000;
const DEFAULT_GAS_LIMIT: u64 = 200_000;

fn env_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", var, raw)),
        Err(_) => Ok(default),
    }
}

async fn request_from_args(args: &[String]) -> Result<DeploymentRequest> {
    let (Some(name), Some(domain)) = (args.first(), args.get(1)) else {
        bail!("expected <name> <domain> [description] [archive.zip]");
    };

    let mut request = DeploymentRequest::new(name).with_domain(domain);
    if let Some(description) = args.get(2) {
        request = request.with_description(description);
    }
    if let Some(path) = args.get(3) {
        request = request
            .with_file_path(path)
            .await
            .with_context(|| format!("cannot attach {}", path))?;
    }
    Ok(request)
}

fn print_page(session: &LedgerSession, page: &Page) {
    println!();
    println!(
        "  page {}/{}, {} deployment(s)",
        page.current_page, page.total_pages, page.total_items
    );
    println!();
    for meta in &page.items {
        println!("  {}", meta.name);
        if !meta.description.is_empty() {
            println!("      description: {}", meta.description);
        }
        println!("      domain:      {}", meta.domain);
        if let Ok(url) = session.deployment_url(&meta.name) {
            println!("      url:         {}", url);
        }
    }
    println!();
}

fn report(result: Result<TxHash, TxError>) -> Result<()> {
    match result {
        Ok(hash) => {
            println!("  committed: {}", hash);
            Ok(())
        }
        Err(TxError::Rejected { code, raw_log }) => {
            bail!("ledger rejected the transaction (code {}): {}", code, raw_log)
        }
        Err(e) if e.is_transport() => bail!("could not reach the ledger: {}", e),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG=debug shows message construction and cache activity.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("usage: deploy <list|create|update|remove> ...");
    };

    let mnemonic = std::env::var("DEPLOY_MNEMONIC")
        .context("DEPLOY_MNEMONIC not set; put it in .env or environment")?;
    let config = ClientConfig::from_env()?;
    let fee = Fee::new(
        env_or("DEPLOY_FEE_AMOUNT", DEFAULT_FEE_AMOUNT)?,
        config.gas_denom.clone(),
        env_or("DEPLOY_GAS_LIMIT", DEFAULT_GAS_LIMIT)?,
    );

    let session = connect(&mnemonic, config, fee).await?;
    println!("  address: {}", session.address()?);

    match command.as_str() {
        "list" => {
            let page_number = match args.get(1) {
                Some(raw) => raw.parse().context("page must be a number")?,
                None => 1,
            };
            let page = session.my_deployments(page_number).await?;
            print_page(&session, &page);
        }
        "create" => {
            let request = request_from_args(&args[1..]).await?;
            report(session.create_deployment(request).await)?;
            print_page(&session, &session.my_deployments(1).await?);
        }
        "update" => {
            let request = request_from_args(&args[1..]).await?;
            report(session.update_deployment(request).await)?;
            print_page(&session, &session.my_deployments(1).await?);
        }
        "remove" => {
            let Some(name) = args.get(1) else {
                bail!("expected <name>");
            };
            report(session.remove_deployment(name).await)?;
        }
        other => bail!("unknown command: {}", other),
    }

    Ok(())
}
