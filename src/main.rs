use sign_off_checker::config::Config;
use sign_off_checker::github::GitHubClient;
use sign_off_checker::register::{RegisterConfig, run_scheduler};
use sign_off_checker::server::{AppState, build_router};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sign_off_checker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let github = match GitHubClient::from_token(config.github_token.clone()) {
        Ok(github) => github,
        Err(e) => {
            tracing::error!(error = %e, "Could not construct GitHub client");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();

    if config.auto_register {
        let register_config = RegisterConfig {
            organizations: config.organizations.clone(),
            webhook_url: config.webhook_url.clone(),
            webhook_secret: config.shared_secret.clone(),
            dry_run: config.dry_run,
            interval: config.sweep_interval,
        };
        tokio::spawn(run_scheduler(
            github.clone(),
            register_config,
            shutdown.clone(),
        ));
    }

    let app = build_router(AppState::new(config.shared_secret.into_bytes(), github));

    tracing::info!(addr = %config.listen_addr, "Starting serving /webhook");

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");

    shutdown.cancel();
}
