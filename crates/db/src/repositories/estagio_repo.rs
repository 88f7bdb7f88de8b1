//! Repository for the `estagios` table.

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::edital::{CreateEstagio, Estagio, UpdateEstagio};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, edital_id, nome, ordem, created_at, updated_at";

/// Provides CRUD operations for review stages.
pub struct EstagioRepo;

impl EstagioRepo {
    /// Insert a new stage, returning the created row.
    pub async fn create(
        pool: &PgPool,
        edital_id: DbId,
        input: &CreateEstagio,
    ) -> Result<Estagio, sqlx::Error> {
        let query = format!(
            "INSERT INTO estagios (edital_id, nome, ordem)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estagio>(&query)
            .bind(edital_id)
            .bind(&input.nome)
            .bind(input.ordem)
            .fetch_one(pool)
            .await
    }

    /// Find a stage by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Estagio>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM estagios WHERE id = $1");
        sqlx::query_as::<_, Estagio>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a call's stages in rank order.
    pub async fn list_by_edital(
        pool: &PgPool,
        edital_id: DbId,
    ) -> Result<Vec<Estagio>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM estagios WHERE edital_id = $1 ORDER BY ordem");
        sqlx::query_as::<_, Estagio>(&query)
            .bind(edital_id)
            .fetch_all(pool)
            .await
    }

    /// Whether another stage of the same call already holds the given rank.
    pub async fn ordem_em_uso(
        pool: &PgPool,
        edital_id: DbId,
        ordem: i32,
        excluir_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let existe: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM estagios
             WHERE edital_id = $1 AND ordem = $2 AND ($3::bigint IS NULL OR id <> $3)",
        )
        .bind(edital_id)
        .bind(ordem)
        .bind(excluir_id)
        .fetch_optional(pool)
        .await?;
        Ok(existe.is_some())
    }

    /// Rename or re-rank a stage. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEstagio,
    ) -> Result<Option<Estagio>, sqlx::Error> {
        let query = format!(
            "UPDATE estagios SET
                nome = COALESCE($2, nome),
                ordem = COALESCE($3, ordem),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estagio>(&query)
            .bind(id)
            .bind(&input.nome)
            .bind(input.ordem)
            .fetch_optional(pool)
            .await
    }

    /// Delete a stage (questions and roster entries cascade).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM estagios WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
