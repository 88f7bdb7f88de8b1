use std::sync::Arc;

use selecao_mailer::Mailer;
use selecao_sheets::SheetsClient;

use crate::config::ServerConfig;
use crate::reset_codes::ResetCodeStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: selecao_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// SMTP delivery; `None` when `SMTP_HOST` is not configured.
    pub mailer: Option<Arc<Mailer>>,
    /// Google Sheets client; `None` when no service account is configured.
    pub sheets: Option<Arc<SheetsClient>>,
    /// Transient password-reset codes (never persisted).
    pub reset_codes: Arc<ResetCodeStore>,
}
