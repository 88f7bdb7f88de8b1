//! Project (submitted proposal) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use selecao_core::types::{DbId, Timestamp};

/// A project row from the `projetos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Projeto {
    pub id: DbId,
    /// Receipt code, unique within the call.
    pub codigo: String,
    pub codigo_edital: String,
    pub sigla: Option<String>,
    pub nome_do_projeto: Option<String>,
    pub beneficiario_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a project individually.
#[derive(Debug, Deserialize)]
pub struct CreateProjeto {
    pub codigo: String,
    pub codigo_edital: String,
    pub sigla: Option<String>,
    pub nome_do_projeto: Option<String>,
    pub beneficiario_id: Option<DbId>,
}
