//! Handlers for review stages and their form questions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use selecao_core::error::CoreError;
use selecao_core::perguntas::{e_tipo_escolha, TIPOS_PERGUNTA};
use selecao_core::types::DbId;
use selecao_db::models::edital::{
    CreateEstagio, CreatePergunta, Estagio, Pergunta, UpdateEstagio, UpdatePergunta,
};
use selecao_db::repositories::{EditalRepo, EstagioRepo, PerguntaRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEquipe;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// POST /api/v1/editais/{edital_id}/estagios
///
/// Add a stage to a call. The rank must be unique within the call.
pub async fn create_estagio(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(edital_id): Path<DbId>,
    Json(input): Json<CreateEstagio>,
) -> AppResult<(StatusCode, Json<Estagio>)> {
    EditalRepo::find_by_id(&state.pool, edital_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Edital",
            id: edital_id,
        }))?;

    if input.nome.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("nome")));
    }

    if EstagioRepo::ordem_em_uso(&state.pool, edital_id, input.ordem, None).await? {
        return Err(AppError::Core(CoreError::Duplicate(format!(
            "Já existe um estágio com a ordem {} neste edital",
            input.ordem
        ))));
    }

    let estagio = EstagioRepo::create(&state.pool, edital_id, &input).await?;
    Ok((StatusCode::CREATED, Json(estagio)))
}

/// PUT /api/v1/estagios/{id}
pub async fn update_estagio(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEstagio>,
) -> AppResult<Json<Estagio>> {
    let atual = EstagioRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estagio",
            id,
        }))?;

    if let Some(nome) = input.nome.as_deref() {
        if nome.trim().is_empty() {
            return Err(AppError::Core(CoreError::MissingField("nome")));
        }
    }

    if let Some(ordem) = input.ordem {
        if EstagioRepo::ordem_em_uso(&state.pool, atual.edital_id, ordem, Some(id)).await? {
            return Err(AppError::Core(CoreError::Duplicate(format!(
                "Já existe um estágio com a ordem {ordem} neste edital"
            ))));
        }
    }

    let estagio = EstagioRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estagio",
            id,
        }))?;
    Ok(Json(estagio))
}

/// DELETE /api/v1/estagios/{id}
pub async fn delete_estagio(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removido = EstagioRepo::delete(&state.pool, id).await?;
    if removido {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Estagio",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// POST /api/v1/estagios/{estagio_id}/perguntas
///
/// Append a question at the end of the stage (rank = count + 1).
pub async fn create_pergunta(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(estagio_id): Path<DbId>,
    Json(mut input): Json<CreatePergunta>,
) -> AppResult<(StatusCode, Json<Pergunta>)> {
    EstagioRepo::find_by_id(&state.pool, estagio_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estagio",
            id: estagio_id,
        }))?;

    input.opcoes = validar_pergunta(&input.tipo, &input.texto, input.opcoes.take())?;

    let pergunta = PerguntaRepo::append(&state.pool, estagio_id, &input).await?;
    Ok((StatusCode::CREATED, Json(pergunta)))
}

/// PUT /api/v1/perguntas/{id}
///
/// Edit a question in place; the rank is unchanged.
pub async fn update_pergunta(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePergunta>,
) -> AppResult<Json<Pergunta>> {
    let atual = PerguntaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pergunta",
            id,
        }))?;

    // Validate against the post-edit shape of the question.
    let tipo_final = input.tipo.clone().unwrap_or(atual.tipo);
    let texto_final = input.texto.clone().unwrap_or(atual.texto);
    let opcoes_finais = input.opcoes.take().or(atual.opcoes);

    input.opcoes = validar_pergunta(&tipo_final, &texto_final, opcoes_finais)?;
    input.tipo = Some(tipo_final);

    let pergunta = PerguntaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pergunta",
            id,
        }))?;
    Ok(Json(pergunta))
}

/// DELETE /api/v1/perguntas/{id}
///
/// Remove a question and compact the ranks of the later siblings.
pub async fn delete_pergunta(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removida = PerguntaRepo::delete(&state.pool, id).await?;
    if removida {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Pergunta",
            id,
        }))
    }
}

/// Request body for the reorder endpoint: the stage's question ids in the
/// desired display order.
#[derive(Debug, Deserialize)]
pub struct ReordenarRequest {
    pub ordem: Vec<DbId>,
}

/// POST /api/v1/estagios/{estagio_id}/perguntas/reordenar
///
/// Renumber the stage's questions 1..N by the position of each id in the
/// submitted sequence. The sequence must be a permutation of the stage's
/// question ids.
pub async fn reordenar_perguntas(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(estagio_id): Path<DbId>,
    Json(input): Json<ReordenarRequest>,
) -> AppResult<Json<Vec<Pergunta>>> {
    EstagioRepo::find_by_id(&state.pool, estagio_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estagio",
            id: estagio_id,
        }))?;

    let mut existentes = PerguntaRepo::ids_do_estagio(&state.pool, estagio_id).await?;
    let mut solicitados = input.ordem.clone();
    existentes.sort_unstable();
    solicitados.sort_unstable();

    if existentes != solicitados {
        return Err(AppError::Core(CoreError::InvalidFormat(
            "A nova ordem deve conter exatamente as perguntas do estágio".into(),
        )));
    }

    let perguntas = PerguntaRepo::reorder(&state.pool, estagio_id, &input.ordem).await?;
    Ok(Json(perguntas))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shared question validation: known type, non-blank prompt, and at least one
/// non-empty option for choice types. Returns the cleaned option list
/// (`None` for non-choice types).
fn validar_pergunta(
    tipo: &str,
    texto: &str,
    opcoes: Option<Vec<String>>,
) -> Result<Option<Vec<String>>, AppError> {
    if !TIPOS_PERGUNTA.contains(&tipo) {
        return Err(AppError::Core(CoreError::InvalidFormat(format!(
            "Tipo de pergunta inválido: '{tipo}'"
        ))));
    }

    if texto.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("texto")));
    }

    if !e_tipo_escolha(tipo) {
        return Ok(None);
    }

    let limpas: Vec<String> = opcoes
        .unwrap_or_default()
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if limpas.is_empty() {
        return Err(AppError::Core(CoreError::MissingField("opcoes")));
    }

    Ok(Some(limpas))
}
