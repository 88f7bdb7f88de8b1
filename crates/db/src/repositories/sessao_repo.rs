//! Repository for the `sessoes` table.

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::sessao::{CreateSessao, Sessao};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, pessoa_id, refresh_token_hash, expires_at, is_revoked, created_at, updated_at";

/// Provides CRUD operations for refresh-token sessions.
pub struct SessaoRepo;

impl SessaoRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSessao) -> Result<Sessao, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessoes (pessoa_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sessao>(&query)
            .bind(input.pessoa_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an active session by its refresh token hash.
    ///
    /// Only returns sessions that are not revoked and not expired.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<Sessao>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessoes
             WHERE refresh_token_hash = $1
               AND is_revoked = FALSE
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Sessao>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session (token rotation).
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessoes SET is_revoked = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Revoke every session of a person (logout).
    pub async fn revoke_all_for_pessoa(pool: &PgPool, pessoa_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sessoes SET is_revoked = TRUE, updated_at = NOW() WHERE pessoa_id = $1",
        )
        .bind(pessoa_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
