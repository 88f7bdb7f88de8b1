use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use selecao_core::error::CoreError;
use selecao_sheets::SheetsError;

/// Error type returned by every HTTP handler.
///
/// Domain errors arrive as [`CoreError`]; database and HTTP-specific failures
/// have their own variants. Rendering always yields the same JSON envelope:
/// `{"error": <message>, "code": <machine code>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<SheetsError> for AppError {
    fn from(err: SheetsError) -> Self {
        match err {
            // Bad sheet content is the operator's problem to fix, not ours.
            SheetsError::PlanilhaVazia | SheetsError::ColunaAusente(_) => {
                AppError::Core(CoreError::UpstreamData(err.to_string()))
            }
            outro => AppError::InternalError(outro.to_string()),
        }
    }
}

impl AppError {
    fn resposta(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => resposta_core(core),
            AppError::Database(err) => resposta_sqlx(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                erro_interno()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, mensagem) = self.resposta();
        let corpo = json!({ "error": mensagem, "code": code });
        (status, axum::Json(corpo)).into_response()
    }
}

fn resposta_core(core: &CoreError) -> (StatusCode, &'static str, String) {
    use CoreError::*;
    match core {
        NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD", core.to_string()),
        InvalidFormat(msg) => (StatusCode::BAD_REQUEST, "INVALID_FORMAT", msg.clone()),
        Duplicate(msg) => (StatusCode::CONFLICT, "DUPLICATE", msg.clone()),
        Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        Transport(msg) => (StatusCode::BAD_GATEWAY, "TRANSPORT_FAILURE", msg.clone()),
        UpstreamData(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "UPSTREAM_DATA",
            msg.clone(),
        ),
        Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            erro_interno()
        }
    }
}

/// Database failures reaching the handler boundary.
///
/// Unique-constraint violations on our `uq_`-prefixed indexes become 409s;
/// everything else is logged and sanitized to a generic 500 (error details
/// stay in the logs, not in responses).
fn resposta_sqlx(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Registro não encontrado".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        // 23505 = PostgreSQL unique_violation.
        if db_err.code().as_deref() == Some("23505") {
            if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                return (
                    StatusCode::CONFLICT,
                    "DUPLICATE",
                    format!("Valor duplicado viola a restrição: {constraint}"),
                );
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    erro_interno()
}

fn erro_interno() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Ocorreu um erro interno".to_string(),
    )
}
