//! Refresh-token session model and DTOs.

use sqlx::FromRow;
use selecao_core::types::{DbId, Timestamp};

/// A session row from the `sessoes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Sessao {
    pub id: DbId,
    pub pessoa_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
pub struct CreateSessao {
    pub pessoa_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
