//! Handlers for the `/projetos` resource and the spreadsheet import.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use selecao_core::error::CoreError;
use selecao_core::types::DbId;
use selecao_db::models::projeto::{CreateProjeto, Projeto};
use selecao_db::repositories::{EditalRepo, ProjetoRepo};
use selecao_sheets::coluna;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEquipe;
use crate::state::AppState;

/// Header of the receipt-code column in the intake spreadsheets.
const COLUNA_CODIGO_RECEBIMENTO: &str = "codigo_recebimento";

/// Query parameters for `GET /projetos`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub codigo_edital: Option<String>,
}

/// Result of a spreadsheet import: codes already present are skipped.
#[derive(Debug, Serialize)]
pub struct ImportacaoResponse {
    pub importados: u64,
    pub ignorados: u64,
}

/// POST /api/v1/projetos
///
/// Register a single project.
pub async fn create(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Json(input): Json<CreateProjeto>,
) -> AppResult<(StatusCode, Json<Projeto>)> {
    if input.codigo.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("codigo")));
    }
    if input.codigo_edital.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("codigo_edital")));
    }

    if ProjetoRepo::find_by_codigo(&state.pool, &input.codigo_edital, &input.codigo)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Duplicate(format!(
            "O projeto '{}' já existe no edital '{}'",
            input.codigo, input.codigo_edital
        ))));
    }

    let projeto = ProjetoRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(projeto)))
}

/// GET /api/v1/projetos
pub async fn list(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Projeto>>> {
    let projetos = ProjetoRepo::list(&state.pool, query.codigo_edital.as_deref()).await?;
    Ok(Json(projetos))
}

/// GET /api/v1/projetos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
) -> AppResult<Json<Projeto>> {
    let projeto = ProjetoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Projeto",
            id,
        }))?;
    Ok(Json(projeto))
}

/// POST /api/v1/editais/{id}/projetos/importar
///
/// Fetch the call's linked intake spreadsheet and import the receipt codes
/// from its `codigo_recebimento` column. Codes already present in the call
/// are skipped.
pub async fn importar(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(edital_id): Path<DbId>,
) -> AppResult<Json<ImportacaoResponse>> {
    let edital = EditalRepo::find_by_id(&state.pool, edital_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Edital",
            id: edital_id,
        }))?;

    let Some(id_planilha) = edital.id_planilha_recebimento.as_deref() else {
        return Err(AppError::Core(CoreError::MissingField(
            "id_planilha_recebimento",
        )));
    };

    let Some(sheets) = &state.sheets else {
        return Err(AppError::InternalError(
            "Importação de planilha não configurada (GOOGLE_SERVICE_ACCOUNT_FILE)".into(),
        ));
    };

    let rows = sheets.fetch_rows(id_planilha).await?;
    let codigos = coluna(&rows, COLUNA_CODIGO_RECEBIMENTO)?;

    let (importados, ignorados) =
        ProjetoRepo::import_codigos(&state.pool, &edital.codigo_edital, &codigos).await?;

    tracing::info!(
        edital = %edital.codigo_edital,
        importados,
        ignorados,
        "Importação de projetos concluída"
    );

    Ok(Json(ImportacaoResponse {
        importados,
        ignorados,
    }))
}
