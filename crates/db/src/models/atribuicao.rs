//! Reviewer stage-assignment model.

use serde::Serialize;
use sqlx::FromRow;
use selecao_core::types::{DbId, Timestamp};

/// A roster row from the `atribuicoes` table: one reviewer on one stage,
/// with the project codes distributed to them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Atribuicao {
    pub id: DbId,
    pub pessoa_id: DbId,
    pub estagio_id: DbId,
    pub projetos: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Roster row joined with the reviewer's display name, for the
/// distribution scoreboards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AtribuicaoComNome {
    pub pessoa_id: DbId,
    pub nome_completo: String,
    pub projetos: Vec<String>,
}
