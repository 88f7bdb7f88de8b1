//! Repository for the `projetos` table.

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::projeto::{CreateProjeto, Projeto};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, codigo, codigo_edital, sigla, nome_do_projeto, beneficiario_id, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjetoRepo;

impl ProjetoRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProjeto) -> Result<Projeto, sqlx::Error> {
        let query = format!(
            "INSERT INTO projetos (codigo, codigo_edital, sigla, nome_do_projeto, beneficiario_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Projeto>(&query)
            .bind(&input.codigo)
            .bind(&input.codigo_edital)
            .bind(&input.sigla)
            .bind(&input.nome_do_projeto)
            .bind(input.beneficiario_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Projeto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projetos WHERE id = $1");
        sqlx::query_as::<_, Projeto>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by its receipt code within one call.
    pub async fn find_by_codigo(
        pool: &PgPool,
        codigo_edital: &str,
        codigo: &str,
    ) -> Result<Option<Projeto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projetos WHERE codigo_edital = $1 AND codigo = $2");
        sqlx::query_as::<_, Projeto>(&query)
            .bind(codigo_edital)
            .bind(codigo)
            .fetch_optional(pool)
            .await
    }

    /// List projects, optionally restricted to one call.
    pub async fn list(
        pool: &PgPool,
        codigo_edital: Option<&str>,
    ) -> Result<Vec<Projeto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projetos
             WHERE ($1::text IS NULL OR codigo_edital = $1)
             ORDER BY codigo"
        );
        sqlx::query_as::<_, Projeto>(&query)
            .bind(codigo_edital)
            .fetch_all(pool)
            .await
    }

    /// Projects whose receipt codes appear in `codigos` (beneficiary menu).
    pub async fn list_por_codigos(
        pool: &PgPool,
        codigos: &[String],
    ) -> Result<Vec<Projeto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projetos WHERE codigo = ANY($1) ORDER BY codigo");
        sqlx::query_as::<_, Projeto>(&query)
            .bind(codigos)
            .fetch_all(pool)
            .await
    }

    /// Receipt codes of one call, in code order.
    pub async fn codigos_por_edital(
        pool: &PgPool,
        codigo_edital: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT codigo FROM projetos WHERE codigo_edital = $1 ORDER BY codigo")
            .bind(codigo_edital)
            .fetch_all(pool)
            .await
    }

    /// Every receipt code known to the organization (bulk-invite check).
    pub async fn codigos_conhecidos(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT codigo FROM projetos")
            .fetch_all(pool)
            .await
    }

    /// Import receipt codes fetched from a call's intake sheet.
    ///
    /// Codes already present in the call are skipped, not errored. Returns
    /// `(inserted, skipped)`.
    pub async fn import_codigos(
        pool: &PgPool,
        codigo_edital: &str,
        codigos: &[String],
    ) -> Result<(u64, u64), sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO projetos (codigo, codigo_edital)
             SELECT DISTINCT u.codigo, $1 FROM UNNEST($2::text[]) AS u(codigo)
             ON CONFLICT (codigo_edital, codigo) DO NOTHING",
        )
        .bind(codigo_edital)
        .bind(codigos)
        .execute(pool)
        .await?;

        let inseridos = result.rows_affected();
        Ok((inseridos, codigos.len() as u64 - inseridos))
    }
}
