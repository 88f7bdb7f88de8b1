//! Person entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use selecao_core::types::{DbId, Timestamp};

/// Full person row from the `pessoas` table.
///
/// Contains the password hash and pending invitation code -- NEVER serialize
/// this to API responses. Handlers outside the auth flows read
/// [`PessoaSemSenha`], which the queries project without the `senha` column.
#[derive(Debug, Clone, FromRow)]
pub struct Pessoa {
    pub id: DbId,
    pub nome_completo: String,
    pub e_mail: String,
    pub telefone: Option<String>,
    pub tipo_usuario: String,
    pub tipo_beneficiario: Option<String>,
    pub status: String,
    /// Argon2id PHC string; `None` until first access completes.
    pub senha: Option<String>,
    pub codigo_convite: Option<String>,
    pub data_convite: Option<NaiveDate>,
    pub projetos: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Person row with the credential columns projected away. Safe to serialize.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PessoaSemSenha {
    pub id: DbId,
    pub nome_completo: String,
    pub e_mail: String,
    pub telefone: Option<String>,
    pub tipo_usuario: String,
    pub tipo_beneficiario: Option<String>,
    pub status: String,
    pub data_convite: Option<NaiveDate>,
    pub projetos: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Pessoa> for PessoaSemSenha {
    fn from(p: Pessoa) -> Self {
        PessoaSemSenha {
            id: p.id,
            nome_completo: p.nome_completo,
            e_mail: p.e_mail,
            telefone: p.telefone,
            tipo_usuario: p.tipo_usuario,
            tipo_beneficiario: p.tipo_beneficiario,
            status: p.status,
            data_convite: p.data_convite,
            projetos: p.projetos,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// DTO for creating a person through an invitation.
#[derive(Debug, Clone)]
pub struct CreatePessoa {
    pub nome_completo: String,
    pub e_mail: String,
    pub telefone: Option<String>,
    pub tipo_usuario: String,
    pub tipo_beneficiario: Option<String>,
    pub codigo_convite: String,
    pub data_convite: NaiveDate,
    pub projetos: Vec<String>,
}

/// DTO for the administrative edit form. Only non-`None` fields are applied;
/// clearing `tipo_beneficiario` goes through
/// [`PessoaRepo::clear_tipo_beneficiario`](crate::repositories::PessoaRepo::clear_tipo_beneficiario).
#[derive(Debug, Deserialize)]
pub struct UpdatePessoa {
    pub nome_completo: Option<String>,
    pub e_mail: Option<String>,
    pub telefone: Option<String>,
    pub tipo_usuario: Option<String>,
    pub tipo_beneficiario: Option<String>,
    pub status: Option<String>,
    pub projetos: Option<Vec<String>>,
}
