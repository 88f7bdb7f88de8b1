//! Repository for the `perguntas` table.
//!
//! Question ranks are system-assigned: append puts a question at the end,
//! delete compacts the ranks of later siblings, and reorder renumbers the
//! whole stage from a caller-supplied id permutation.

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::edital::{CreatePergunta, Pergunta, UpdatePergunta};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, estagio_id, ordem, tipo, texto, opcoes, created_at, updated_at";

/// Provides CRUD operations for stage questions.
pub struct PerguntaRepo;

impl PerguntaRepo {
    /// Append a question to the end of a stage (rank = current count + 1).
    pub async fn append(
        pool: &PgPool,
        estagio_id: DbId,
        input: &CreatePergunta,
    ) -> Result<Pergunta, sqlx::Error> {
        let query = format!(
            "INSERT INTO perguntas (estagio_id, ordem, tipo, texto, opcoes)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(ordem), 0) + 1 FROM perguntas WHERE estagio_id = $1),
                $2, $3, $4
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pergunta>(&query)
            .bind(estagio_id)
            .bind(&input.tipo)
            .bind(&input.texto)
            .bind(&input.opcoes)
            .fetch_one(pool)
            .await
    }

    /// Find a question by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Pergunta>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM perguntas WHERE id = $1");
        sqlx::query_as::<_, Pergunta>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a stage's questions in rank order.
    pub async fn list_by_estagio(
        pool: &PgPool,
        estagio_id: DbId,
    ) -> Result<Vec<Pergunta>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM perguntas WHERE estagio_id = $1 ORDER BY ordem");
        sqlx::query_as::<_, Pergunta>(&query)
            .bind(estagio_id)
            .fetch_all(pool)
            .await
    }

    /// The stage's question ids in rank order (reorder permutation check).
    pub async fn ids_do_estagio(
        pool: &PgPool,
        estagio_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM perguntas WHERE estagio_id = $1 ORDER BY ordem")
            .bind(estagio_id)
            .fetch_all(pool)
            .await
    }

    /// Edit a question in place; the rank is unchanged.
    ///
    /// `tipo` and `texto` keep their current value when `None`; `opcoes` is
    /// replaced outright so a type change away from a choice widget clears
    /// the stale option list.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePergunta,
    ) -> Result<Option<Pergunta>, sqlx::Error> {
        let query = format!(
            "UPDATE perguntas SET
                tipo = COALESCE($2, tipo),
                texto = COALESCE($3, texto),
                opcoes = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pergunta>(&query)
            .bind(id)
            .bind(&input.tipo)
            .bind(&input.texto)
            .bind(input.opcoes.as_ref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a question and close the rank gap it leaves behind.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removida: Option<(DbId, i32)> =
            sqlx::query_as("DELETE FROM perguntas WHERE id = $1 RETURNING estagio_id, ordem")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((estagio_id, ordem)) = removida else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE perguntas SET ordem = ordem - 1, updated_at = NOW()
             WHERE estagio_id = $1 AND ordem > $2",
        )
        .bind(estagio_id)
        .bind(ordem)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Renumber a stage's questions 1..N by the position of each id in
    /// `ids`. The caller must pass a permutation of the stage's question ids.
    pub async fn reorder(
        pool: &PgPool,
        estagio_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<Pergunta>, sqlx::Error> {
        let ordens: Vec<i32> = (1..=ids.len() as i32).collect();

        sqlx::query(
            "UPDATE perguntas SET ordem = nova.ordem, updated_at = NOW()
             FROM (SELECT * FROM UNNEST($2::bigint[], $3::int[]) AS t(id, ordem)) nova
             WHERE perguntas.id = nova.id AND perguntas.estagio_id = $1",
        )
        .bind(estagio_id)
        .bind(ids)
        .bind(&ordens)
        .execute(pool)
        .await?;

        Self::list_by_estagio(pool, estagio_id).await
    }
}
