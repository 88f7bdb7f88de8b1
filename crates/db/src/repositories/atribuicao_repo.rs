//! Repository for the `atribuicoes` table (reviewer stage rosters).

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::atribuicao::{Atribuicao, AtribuicaoComNome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, pessoa_id, estagio_id, projetos, created_at, updated_at";

/// Provides roster and distribution operations for review stages.
pub struct AtribuicaoRepo;

impl AtribuicaoRepo {
    /// Make the stage roster match `pessoa_ids` exactly.
    ///
    /// Newly checked reviewers get an empty roster entry (idempotent insert);
    /// unchecked reviewers have their entry deleted, dropping any projects
    /// already distributed to them. The person rows are untouched.
    pub async fn sync_avaliadores(
        pool: &PgPool,
        estagio_id: DbId,
        pessoa_ids: &[DbId],
    ) -> Result<Vec<Atribuicao>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO atribuicoes (pessoa_id, estagio_id)
             SELECT u.pessoa_id, $1 FROM UNNEST($2::bigint[]) AS u(pessoa_id)
             ON CONFLICT (pessoa_id, estagio_id) DO NOTHING",
        )
        .bind(estagio_id)
        .bind(pessoa_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM atribuicoes WHERE estagio_id = $1 AND pessoa_id <> ALL($2)")
            .bind(estagio_id)
            .bind(pessoa_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Self::list_by_estagio(pool, estagio_id).await
    }

    /// List a stage's roster entries.
    pub async fn list_by_estagio(
        pool: &PgPool,
        estagio_id: DbId,
    ) -> Result<Vec<Atribuicao>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM atribuicoes WHERE estagio_id = $1 ORDER BY id");
        sqlx::query_as::<_, Atribuicao>(&query)
            .bind(estagio_id)
            .fetch_all(pool)
            .await
    }

    /// Roster entries joined with reviewer names, for the scoreboards.
    pub async fn list_com_nome(
        pool: &PgPool,
        estagio_id: DbId,
    ) -> Result<Vec<AtribuicaoComNome>, sqlx::Error> {
        sqlx::query_as(
            "SELECT a.pessoa_id, p.nome_completo, a.projetos
             FROM atribuicoes a
             JOIN pessoas p ON p.id = a.pessoa_id
             WHERE a.estagio_id = $1
             ORDER BY p.nome_completo",
        )
        .bind(estagio_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrite a reviewer's project list for the stage with the exact
    /// given set (no merge).
    ///
    /// Returns `None` when the reviewer is not on the stage roster.
    pub async fn set_projetos(
        pool: &PgPool,
        estagio_id: DbId,
        pessoa_id: DbId,
        projetos: &[String],
    ) -> Result<Option<Atribuicao>, sqlx::Error> {
        let query = format!(
            "UPDATE atribuicoes SET projetos = $3, updated_at = NOW()
             WHERE estagio_id = $1 AND pessoa_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Atribuicao>(&query)
            .bind(estagio_id)
            .bind(pessoa_id)
            .bind(projetos)
            .fetch_optional(pool)
            .await
    }
}
