//! Repository for the `pessoas` table.

use sqlx::PgPool;
use selecao_core::types::DbId;

use crate::models::pessoa::{CreatePessoa, Pessoa, PessoaSemSenha, UpdatePessoa};

/// Full column list, used only by the auth flows.
const COLUMNS: &str = "id, nome_completo, e_mail, telefone, tipo_usuario, tipo_beneficiario, \
                        status, senha, codigo_convite, data_convite, projetos, created_at, updated_at";

/// Projection without the credential columns; every listing uses this.
const COLUMNS_SEM_SENHA: &str = "id, nome_completo, e_mail, telefone, tipo_usuario, \
                        tipo_beneficiario, status, data_convite, projetos, created_at, updated_at";

/// Provides CRUD operations for people.
pub struct PessoaRepo;

impl PessoaRepo {
    /// Insert a newly invited person (status `convidado`, no password).
    pub async fn create(pool: &PgPool, input: &CreatePessoa) -> Result<Pessoa, sqlx::Error> {
        let query = format!(
            "INSERT INTO pessoas
                (nome_completo, e_mail, telefone, tipo_usuario, tipo_beneficiario,
                 codigo_convite, data_convite, projetos)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pessoa>(&query)
            .bind(&input.nome_completo)
            .bind(&input.e_mail)
            .bind(&input.telefone)
            .bind(&input.tipo_usuario)
            .bind(&input.tipo_beneficiario)
            .bind(&input.codigo_convite)
            .bind(input.data_convite)
            .bind(&input.projetos)
            .fetch_one(pool)
            .await
    }

    /// Insert a batch of invitations atomically (the bulk-invite commit).
    pub async fn create_many(
        pool: &PgPool,
        inputs: &[CreatePessoa],
    ) -> Result<Vec<Pessoa>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO pessoas
                (nome_completo, e_mail, telefone, tipo_usuario, tipo_beneficiario,
                 codigo_convite, data_convite, projetos)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let mut criadas = Vec::with_capacity(inputs.len());
        for input in inputs {
            let pessoa = sqlx::query_as::<_, Pessoa>(&query)
                .bind(&input.nome_completo)
                .bind(&input.e_mail)
                .bind(&input.telefone)
                .bind(&input.tipo_usuario)
                .bind(&input.tipo_beneficiario)
                .bind(&input.codigo_convite)
                .bind(input.data_convite)
                .bind(&input.projetos)
                .fetch_one(&mut *tx)
                .await?;
            criadas.push(pessoa);
        }
        tx.commit().await?;
        Ok(criadas)
    }

    /// Find a person by internal ID (credentials projected away).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PessoaSemSenha>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS_SEM_SENHA} FROM pessoas WHERE id = $1");
        sqlx::query_as::<_, PessoaSemSenha>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a person by internal ID, including the credential columns.
    /// Auth flows only.
    pub async fn find_by_id_full(pool: &PgPool, id: DbId) -> Result<Option<Pessoa>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pessoas WHERE id = $1");
        sqlx::query_as::<_, Pessoa>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a person by e-mail, case-insensitively. Returns the full row
    /// including credentials; auth flows only.
    pub async fn find_by_email(pool: &PgPool, e_mail: &str) -> Result<Option<Pessoa>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pessoas WHERE LOWER(e_mail) = LOWER($1)");
        sqlx::query_as::<_, Pessoa>(&query)
            .bind(e_mail.trim())
            .fetch_optional(pool)
            .await
    }

    /// List people, optionally filtered by role and/or status, sorted by name.
    pub async fn list(
        pool: &PgPool,
        tipo_usuario: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<PessoaSemSenha>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_SEM_SENHA} FROM pessoas
             WHERE ($1::text IS NULL OR tipo_usuario = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY nome_completo"
        );
        sqlx::query_as::<_, PessoaSemSenha>(&query)
            .bind(tipo_usuario)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Ids of every person with the given role (roster membership check).
    pub async fn ids_por_tipo(pool: &PgPool, tipo_usuario: &str) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM pessoas WHERE tipo_usuario = $1")
            .bind(tipo_usuario)
            .fetch_all(pool)
            .await
    }

    /// All e-mails currently registered, lowercased (bulk-invite step).
    pub async fn list_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT LOWER(e_mail) FROM pessoas")
            .fetch_all(pool)
            .await
    }

    /// Update a person's editable fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePessoa,
    ) -> Result<Option<PessoaSemSenha>, sqlx::Error> {
        let query = format!(
            "UPDATE pessoas SET
                nome_completo = COALESCE($2, nome_completo),
                e_mail = COALESCE($3, e_mail),
                telefone = COALESCE($4, telefone),
                tipo_usuario = COALESCE($5, tipo_usuario),
                tipo_beneficiario = COALESCE($6, tipo_beneficiario),
                status = COALESCE($7, status),
                projetos = COALESCE($8, projetos),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS_SEM_SENHA}"
        );
        sqlx::query_as::<_, PessoaSemSenha>(&query)
            .bind(id)
            .bind(&input.nome_completo)
            .bind(&input.e_mail)
            .bind(&input.telefone)
            .bind(&input.tipo_usuario)
            .bind(&input.tipo_beneficiario)
            .bind(&input.status)
            .bind(input.projetos.as_ref())
            .fetch_optional(pool)
            .await
    }

    /// Remove the grantee subtype (used when the role changes away from
    /// beneficiario).
    pub async fn clear_tipo_beneficiario(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE pessoas SET tipo_beneficiario = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Complete the first-access flow: set the password hash, activate the
    /// account, and consume the invitation code.
    ///
    /// Guarded by `codigo_convite IS NOT NULL`, so a retry after success
    /// affects zero rows and returns `false`.
    pub async fn ativar_com_senha(
        pool: &PgPool,
        id: DbId,
        senha_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pessoas SET
                senha = $2,
                status = 'ativo',
                codigo_convite = NULL,
                updated_at = NOW()
             WHERE id = $1 AND codigo_convite IS NOT NULL",
        )
        .bind(id)
        .bind(senha_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the password hash (reset flow; status untouched).
    pub async fn update_senha(
        pool: &PgPool,
        id: DbId,
        senha_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE pessoas SET senha = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(senha_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
