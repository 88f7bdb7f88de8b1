//! Call-for-proposals entity models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use selecao_core::types::{DbId, Timestamp};

/// A call-for-proposals row from the `editais` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Edital {
    pub id: DbId,
    pub codigo_edital: String,
    pub nome_edital: String,
    pub data_lancamento: NaiveDate,
    pub id_planilha_recebimento: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review stage row from the `estagios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Estagio {
    pub id: DbId,
    pub edital_id: DbId,
    pub nome: String,
    pub ordem: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A form question row from the `perguntas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Pergunta {
    pub id: DbId,
    pub estagio_id: DbId,
    pub ordem: i32,
    pub tipo: String,
    pub texto: String,
    pub opcoes: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stage with its questions in rank order.
#[derive(Debug, Clone, Serialize)]
pub struct EstagioDetalhe {
    #[serde(flatten)]
    pub estagio: Estagio,
    pub perguntas: Vec<Pergunta>,
}

/// A call with its full stage/question tree.
#[derive(Debug, Clone, Serialize)]
pub struct EditalDetalhe {
    #[serde(flatten)]
    pub edital: Edital,
    pub estagios: Vec<EstagioDetalhe>,
}

/// DTO for creating or fully updating a call's scalar fields.
#[derive(Debug, Deserialize)]
pub struct CreateEdital {
    pub codigo_edital: String,
    pub nome_edital: String,
    pub data_lancamento: NaiveDate,
    pub id_planilha_recebimento: Option<String>,
}

/// DTO for adding a stage to a call.
#[derive(Debug, Deserialize)]
pub struct CreateEstagio {
    pub nome: String,
    pub ordem: i32,
}

/// DTO for renaming or re-ranking a stage.
#[derive(Debug, Deserialize)]
pub struct UpdateEstagio {
    pub nome: Option<String>,
    pub ordem: Option<i32>,
}

/// DTO for appending a question to a stage. The rank is system-assigned.
#[derive(Debug, Deserialize)]
pub struct CreatePergunta {
    pub tipo: String,
    pub texto: String,
    pub opcoes: Option<Vec<String>>,
}

/// DTO for editing a question in place (rank unchanged).
#[derive(Debug, Deserialize)]
pub struct UpdatePergunta {
    pub tipo: Option<String>,
    pub texto: Option<String>,
    pub opcoes: Option<Vec<String>>,
}
