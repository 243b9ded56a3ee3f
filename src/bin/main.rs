//! Walletstore CLI
//!
//!   walletstore serve [--port N]   → HTTP server over a devnet ledger
//!   walletstore demo [--amount X]  → connect, fund, print final state as JSON
//!
//! Configuration comes from `WALLETSTORE_*` environment variables (a `.env`
//! file in the working directory is loaded first); flags override them.

use anyhow::Context;
use serde_json::Value;
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;
use walletstore::logging::init_logging;
use walletstore::runtime::install_signal_handlers;
use walletstore::server::{create_router_with_name, paths};
use walletstore::{AppConfig, WalletStore};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }
    if opts.version {
        println!("walletstore {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("serve") => cmd_serve(&opts),
        Some("demo") => cmd_demo(&opts),
        Some(cmd) => Err(anyhow::anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    match result {
        Ok(output) => {
            let formatted = if opts.pretty || std::io::stdout().is_terminal() {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            };
            match formatted {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("{{\"error\": \"{}\"}}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("{}", serde_json::json!({"error": format!("{:#}", e)}));
            std::process::exit(1);
        }
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    port: Option<u16>,
    amount: Option<String>,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        load_dotenv();

        let mut opts = ParsedArgs::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--pretty" => opts.pretty = true,
                "--port" | "-p" => {
                    if let Some(value) = args.get(i + 1) {
                        opts.port = value.parse().ok();
                        i += 1;
                    }
                }
                "--amount" => {
                    if let Some(value) = args.get(i + 1) {
                        opts.amount = Some(value.clone());
                        i += 1;
                    }
                }
                other if opts.command.is_none() && !other.starts_with('-') => {
                    opts.command = Some(other.to_string());
                }
                _ => {}
            }
            i += 1;
        }
        opts
    }
}

fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else { return };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() && env::var(key.trim()).is_err() {
                env::set_var(key.trim(), value);
            }
        }
    }
}

fn print_usage() {
    println!(
        "walletstore - observable wallet state over a ledger client

USAGE:
    walletstore <COMMAND> [OPTIONS]

COMMANDS:
    serve                   Start HTTP server
    demo                    Connect, fund once, print state

OPTIONS:
    --port, -p <port>       Server port (default 8080, env WALLETSTORE_PORT)
    --amount <decimal>      Faucet amount for demo (env WALLETSTORE_FUND_AMOUNT)
    --pretty                Pretty-print JSON
    --help, -h              Show this help
    --version, -V           Show version

ENVIRONMENT:
    WALLETSTORE_APP, WALLETSTORE_NETWORK, WALLETSTORE_DECIMALS,
    WALLETSTORE_FAUCET_CAP, WALLETSTORE_LATENCY_MS, WALLETSTORE_LOG_JSON, RUST_LOG"
    );
}

fn load_config(opts: &ParsedArgs) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_env().context("reading environment")?;
    if let Some(port) = opts.port {
        config.port = port;
    }
    if let Some(amount) = &opts.amount {
        config.store.fund_amount = amount.clone();
    }
    Ok(config)
}

fn cmd_demo(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let config = load_config(opts)?;
    let store = WalletStore::new(config.ledger.build(), config.store.clone());

    let rt = tokio::runtime::Runtime::new().context("creating runtime")?;
    rt.block_on(async {
        let address = store.connect_wallet().await?;
        info!(%address, "connected");
        store.fund_wallet().await?;
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(serde_json::to_value(store.snapshot())?)
}

fn cmd_serve(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let config = load_config(opts)?;
    let store = Arc::new(WalletStore::new(config.ledger.build(), config.store.clone()));

    let rt = tokio::runtime::Runtime::new().context("creating runtime")?;
    rt.block_on(async {
        let router = create_router_with_name(store, &config.app);
        let addr = format!("0.0.0.0:{}", config.port);

        info!(network = %config.ledger.network, "{} listening on http://{}", config.app, addr);
        info!("  GET  {}", paths::WALLET);
        info!("  POST {}", paths::CONNECT);
        info!("  POST {}", paths::REFRESH);
        info!("  POST {}", paths::FUND);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {}", addr))?;

        let shutdown = install_signal_handlers();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await
            .context("server error")?;
        info!("server stopped");
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(serde_json::json!({"status": "stopped"}))
}
