//! Handlers for the `/editais` resource (call-for-proposals CRUD).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use selecao_core::error::CoreError;
use selecao_core::types::DbId;
use selecao_db::models::edital::{CreateEdital, Edital, EditalDetalhe};
use selecao_db::repositories::EditalRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEquipe;
use crate::state::AppState;

/// POST /api/v1/editais
///
/// Register a new call with an empty stage list.
pub async fn create(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Json(input): Json<CreateEdital>,
) -> AppResult<(StatusCode, Json<Edital>)> {
    validar_campos(&input)?;
    verificar_codigo_livre(&state, &input.codigo_edital, None).await?;

    let edital = EditalRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(edital)))
}

/// GET /api/v1/editais
pub async fn list(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
) -> AppResult<Json<Vec<Edital>>> {
    let editais = EditalRepo::list(&state.pool).await?;
    Ok(Json(editais))
}

/// GET /api/v1/editais/{id}
///
/// The call with its full stage/question tree.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
) -> AppResult<Json<EditalDetalhe>> {
    let detalhe = EditalRepo::detalhe(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Edital",
            id,
        }))?;
    Ok(Json(detalhe))
}

/// PUT /api/v1/editais/{id}
///
/// Full replace of the scalar fields, with the same validation as create.
pub async fn update(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
    Json(input): Json<CreateEdital>,
) -> AppResult<Json<Edital>> {
    validar_campos(&input)?;
    verificar_codigo_livre(&state, &input.codigo_edital, Some(id)).await?;

    let edital = EditalRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Edital",
            id,
        }))?;
    Ok(Json(edital))
}

/// DELETE /api/v1/editais/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removido = EditalRepo::delete(&state.pool, id).await?;
    if removido {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Edital",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validar_campos(input: &CreateEdital) -> Result<(), AppError> {
    if input.codigo_edital.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("codigo_edital")));
    }
    if input.nome_edital.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("nome_edital")));
    }
    Ok(())
}

async fn verificar_codigo_livre(
    state: &AppState,
    codigo_edital: &str,
    excluir_id: Option<DbId>,
) -> Result<(), AppError> {
    if let Some(existente) = EditalRepo::find_by_codigo(&state.pool, codigo_edital).await? {
        if excluir_id != Some(existente.id) {
            return Err(AppError::Core(CoreError::Duplicate(format!(
                "Já existe um edital com o código '{codigo_edital}'"
            ))));
        }
    }
    Ok(())
}
