use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use selecao_api::config::ServerConfig;
use selecao_api::reset_codes::ResetCodeStore;
use selecao_api::router::build_app_router;
use selecao_api::state::AppState;
use selecao_db::DbPool;
use selecao_mailer::{EmailConfig, Mailer};
use selecao_sheets::{SheetsClient, SheetsConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "selecao_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuração carregada");

    let pool = preparar_banco().await;
    let mailer = montar_mailer();
    let sheets = montar_sheets();
    let reset_codes = Arc::new(ResetCodeStore::new(Duration::from_secs(
        config.reset_code_ttl_secs,
    )));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
        sheets,
        reset_codes,
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Servidor iniciando");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Encerramento concluído");
}

/// Connect, verify, and migrate. Any failure here aborts startup.
async fn preparar_banco() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = selecao_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    selecao_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    selecao_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Banco de dados pronto (pool + migrações)");
    pool
}

/// SMTP delivery is optional: without `SMTP_HOST` the server runs and every
/// send is reported as not-sent.
fn montar_mailer() -> Option<Arc<Mailer>> {
    match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "Envio de e-mail configurado");
            Some(Arc::new(Mailer::new(email_config)))
        }
        None => {
            tracing::warn!("SMTP_HOST ausente; convites não serão enviados");
            None
        }
    }
}

/// The Sheets client is optional the same way: no service account, no import.
fn montar_sheets() -> Option<Arc<SheetsClient>> {
    let sheets_config = match SheetsConfig::from_env() {
        Some(c) => c,
        None => {
            tracing::warn!("GOOGLE_SERVICE_ACCOUNT_FILE ausente; importação de planilha desativada");
            return None;
        }
    };
    match SheetsClient::from_config(&sheets_config) {
        Ok(client) => {
            tracing::info!("Importação de planilhas configurada");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Chave de conta de serviço inválida; importação desativada");
            None
        }
    }
}

/// Resolve on SIGINT or SIGTERM so `axum::serve` drains in-flight requests
/// whether the stop comes from a terminal or a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT recebido, encerrando"),
        () = terminate => tracing::info!("SIGTERM recebido, encerrando"),
    }
}
