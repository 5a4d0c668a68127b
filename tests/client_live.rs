//! Live integration tests for the default client.
//!
//! These need a funded account on a ledger running the deployment module.
//! Set `TEST_MNEMONIC` and the `DEPLOY_*` variables in `.env` or the
//! environment to run them. Without them, tests skip gracefully.

#![cfg(feature = "default-client")]

use ledger_deploy_rs::{connect, ClientConfig, DeploymentRequest, Fee, LedgerSession, TxError};

/// Load .env and return a connected session, or None to skip.
async fn test_session() -> Option<LedgerSession> {
    dotenvy::dotenv().ok();
    let mnemonic = match std::env::var("TEST_MNEMONIC") {
        Ok(m) if !m.is_empty() => m,
        _ => {
            eprintln!("TEST_MNEMONIC not set, skipping integration test");
            return None;
        }
    };
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}; skipping integration test", e);
            return None;
        }
    };

    let fee = Fee::new(5_000, config.gas_denom.clone(), 200_000);
    Some(
        connect(&mnemonic, config, fee)
            .await
            .expect("failed to open session"),
    )
}

/// Remove a deployment. Best-effort: logs errors but doesn't fail.
async fn cleanup_deployment(session: &LedgerSession, name: &str) {
    eprintln!("cleanup: removing {}", name);
    match session.remove_deployment(name).await {
        Ok(hash) => eprintln!("cleanup: remove tx={}", hash),
        Err(e) => eprintln!("cleanup: remove failed (may already be gone): {}", e),
    }
}

#[tokio::test]
async fn test_list_own_deployments() -> Result<(), Box<dyn std::error::Error>> {
    let Some(session) = test_session().await else {
        return Ok(());
    };

    let address = session.address()?;
    eprintln!("address: {}", address);

    let page = session.list_deployments(&address, 1).await?;
    eprintln!("{} deployment(s), {} page(s)", page.total_items, page.total_pages);
    assert!(page.items.iter().all(|m| m.creator == address));
    Ok(())
}

#[tokio::test]
async fn test_create_list_remove() -> Result<(), Box<dyn std::error::Error>> {
    let Some(session) = test_session().await else {
        return Ok(());
    };

    let address = session.address()?;
    let name = format!("it-{}", std::process::id());

    session.my_deployments(1).await?;

    let result: Result<(), Box<dyn std::error::Error>> = async {
        let hash = session
            .create_deployment(
                DeploymentRequest::new(&name)
                    .with_description("integration test")
                    .with_domain(session.config().url_domain.clone()),
            )
            .await?;
        eprintln!("create tx={}", hash);

        let page = session.list_deployments(&address, 1).await?;
        let all_names: Vec<_> = page.items.iter().map(|m| m.name.as_str()).collect();
        eprintln!("listed: {:?}", all_names);
        assert!(page.total_items >= 1);

        eprintln!("url: {}", session.deployment_url(&name)?);
        Ok(())
    }
    .await;

    // Always cleanup, even on failure
    cleanup_deployment(&session, &name).await;
    result?;

    // Removing again must be a ledger rejection, not a network error.
    match session.remove_deployment(&name).await {
        Err(TxError::Rejected { code, raw_log }) => {
            eprintln!("second remove rejected as expected: code={} log={}", code, raw_log)
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    Ok(())
}
