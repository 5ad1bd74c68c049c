use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowkey::app::build_app;
use flowkey::config::Config;
use flowkey::token::{self, EntitlementClaims, SigningSecret};

#[derive(Parser, Debug)]
#[command(name = "flowkey")]
#[command(about = "Premium entitlement service for the Quantum Flow Planner")]
struct Cli {
    /// Print a freshly generated signing secret for PREMIUM_SECRET and exit
    #[arg(long)]
    generate_secret: bool,

    /// Verify a token against the configured secret, print its claims and exit
    #[arg(long, value_name = "TOKEN", conflicts_with = "generate_secret")]
    inspect_token: Option<String>,
}

/// Verify a token offline. Exit code 1 when the token is rejected.
fn inspect_token(config: &Config, token: &str) {
    match token::verify::<EntitlementClaims>(token.trim(), &config.entitlements.secret) {
        Ok(claims) => {
            println!("Token is valid");
            println!("  premium:   {}", claims.premium);
            println!("  issuedAt:  {}", format_timestamp(claims.issued_at));
            println!("  expiresAt: {}", format_timestamp(claims.expires_at));
        }
        Err(e) => {
            eprintln!("Token rejected ({}): {}", e.reason(), e);
            std::process::exit(1);
        }
    }
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| format!("{} ({})", ts, dt.to_rfc3339()))
        .unwrap_or_else(|| ts.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.generate_secret {
        println!("{}", SigningSecret::generate());
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowkey=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing secret or allow-list is fatal to the instance, never per-request
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Some(ref token) = cli.inspect_token {
        inspect_token(&config, token);
        return;
    }

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    tracing::info!(
        "Loaded {} premium code(s); tokens valid for {} days",
        config.entitlements.codes.len(),
        config.entitlements.token_validity.num_days()
    );
    if config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS disabled (same-origin clients only)");
    }

    let app = build_app(&config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Flowkey server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
