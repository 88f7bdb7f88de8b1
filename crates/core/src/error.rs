use crate::types::DbId;

/// Domain-level error taxonomy shared across the workspace.
///
/// The API crate maps each variant to an HTTP status; repositories and pure
/// validation code return these directly.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A required input was blank or absent.
    #[error("Campo obrigatório ausente: {0}")]
    MissingField(&'static str),

    /// An input was present but malformed (e.g. e-mail syntax).
    #[error("Formato inválido: {0}")]
    InvalidFormat(String),

    /// A natural key or ordering rank collided with an existing value.
    #[error("Valor duplicado: {0}")]
    Duplicate(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Outbound delivery (SMTP) failed.
    #[error("Falha de envio: {0}")]
    Transport(String),

    /// An external spreadsheet was empty or missing required columns.
    #[error("Dados de planilha inválidos: {0}")]
    UpstreamData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
