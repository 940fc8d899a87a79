// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

use std::{env, sync::Arc};

use tienda_server::{
    api::router,
    chain::{AccountRoster, ContractArtifact, TxGateway},
    config::AppConfig,
    services::{PayoutService, RegistryService, StoreService},
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Missing or malformed configuration is startup-fatal
    let config = AppConfig::from_env()
        .unwrap_or_else(|err| fatal(&format!("configuration: {err}")));

    let roster = AccountRoster::from_config(&config.keys)
        .unwrap_or_else(|err| fatal(&format!("account roster: {err}")));
    tracing::info!(accounts = roster.len(), rpc = %config.rpc_url, "starting");

    let gateway = Arc::new(
        TxGateway::connect(&config.rpc_url, Arc::new(roster), config.timeouts)
            .await
            .unwrap_or_else(|err| fatal(&format!("RPC endpoint: {err}"))),
    );
    tracing::info!(chain_id = gateway.chain_id(), "connected to chain");

    let store_contract = ContractArtifact::parse(
        "store",
        &config.store_contract,
        include_str!("../abi/store.json"),
    )
    .unwrap_or_else(|err| fatal(&err.to_string()));
    let registry_contract = ContractArtifact::parse(
        "registry",
        &config.registry_contract,
        include_str!("../abi/registry.json"),
    )
    .unwrap_or_else(|err| fatal(&err.to_string()));
    let payout_contract = ContractArtifact::parse(
        "payout",
        &config.payout_contract,
        include_str!("../abi/payout.json"),
    )
    .unwrap_or_else(|err| fatal(&err.to_string()));

    let state = AppState::new(
        Arc::new(StoreService::new(gateway.clone(), store_contract)),
        Arc::new(RegistryService::new(gateway.clone(), registry_contract)),
        Arc::new(PayoutService::new(gateway.clone(), payout_contract)),
    );

    let app = router(state);

    let addr = config
        .bind_addr()
        .unwrap_or_else(|err| fatal(&format!("bind address: {err}")));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|err| fatal(&format!("bind {addr}: {err}")));

    tracing::info!(%addr, "listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|err| fatal(&format!("server: {err}")));
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn fatal(message: &str) -> ! {
    eprintln!("startup failed: {message}");
    std::process::exit(1);
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "could not install the shutdown handler");
        return;
    }
    tracing::info!("shutting down");
}
