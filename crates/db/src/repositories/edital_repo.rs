//! Repository for the `editais` table.

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::edital::{
    CreateEdital, Edital, EditalDetalhe, EstagioDetalhe, Pergunta,
};
use crate::repositories::EstagioRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, codigo_edital, nome_edital, data_lancamento, id_planilha_recebimento, created_at, updated_at";

/// Provides CRUD operations for calls.
pub struct EditalRepo;

impl EditalRepo {
    /// Insert a new call with an empty stage list, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEdital) -> Result<Edital, sqlx::Error> {
        let query = format!(
            "INSERT INTO editais (codigo_edital, nome_edital, data_lancamento, id_planilha_recebimento)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Edital>(&query)
            .bind(&input.codigo_edital)
            .bind(&input.nome_edital)
            .bind(input.data_lancamento)
            .bind(&input.id_planilha_recebimento)
            .fetch_one(pool)
            .await
    }

    /// Find a call by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Edital>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM editais WHERE id = $1");
        sqlx::query_as::<_, Edital>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a call by its public code.
    pub async fn find_by_codigo(
        pool: &PgPool,
        codigo_edital: &str,
    ) -> Result<Option<Edital>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM editais WHERE codigo_edital = $1");
        sqlx::query_as::<_, Edital>(&query)
            .bind(codigo_edital)
            .fetch_optional(pool)
            .await
    }

    /// List all calls, most recently launched first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Edital>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM editais ORDER BY data_lancamento DESC, codigo_edital");
        sqlx::query_as::<_, Edital>(&query).fetch_all(pool).await
    }

    /// Full replace of the scalar fields (the edit form submits all of them).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateEdital,
    ) -> Result<Option<Edital>, sqlx::Error> {
        let query = format!(
            "UPDATE editais SET
                codigo_edital = $2,
                nome_edital = $3,
                data_lancamento = $4,
                id_planilha_recebimento = $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Edital>(&query)
            .bind(id)
            .bind(&input.codigo_edital)
            .bind(&input.nome_edital)
            .bind(input.data_lancamento)
            .bind(&input.id_planilha_recebimento)
            .fetch_optional(pool)
            .await
    }

    /// Delete a call (stages and questions cascade). Returns `true` if the
    /// row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM editais WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a call with its full stage/question tree in rank order.
    pub async fn detalhe(pool: &PgPool, id: DbId) -> Result<Option<EditalDetalhe>, sqlx::Error> {
        let Some(edital) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let estagios = EstagioRepo::list_by_edital(pool, id).await?;

        let perguntas: Vec<Pergunta> = sqlx::query_as(
            "SELECT p.id, p.estagio_id, p.ordem, p.tipo, p.texto, p.opcoes, p.created_at, p.updated_at
             FROM perguntas p
             JOIN estagios e ON e.id = p.estagio_id
             WHERE e.edital_id = $1
             ORDER BY p.estagio_id, p.ordem",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let estagios = estagios
            .into_iter()
            .map(|estagio| {
                let perguntas = perguntas
                    .iter()
                    .filter(|p| p.estagio_id == estagio.id)
                    .cloned()
                    .collect();
                EstagioDetalhe { estagio, perguntas }
            })
            .collect();

        Ok(Some(EditalDetalhe { edital, estagios }))
    }
}
