//! Handlers for stage rosters: reviewer selection, project distribution,
//! and the distribution scoreboards.

use std::collections::BTreeMap;
use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use selecao_core::distribuicao::{tally_por_avaliador, tally_por_projeto, AtribuicaoStage};
use selecao_core::error::CoreError;
use selecao_core::roles::TIPO_AVALIADOR;
use selecao_core::types::DbId;
use selecao_db::models::atribuicao::Atribuicao;
use selecao_db::models::edital::Estagio;
use selecao_db::repositories::{
    AtribuicaoRepo, EditalRepo, EstagioRepo, PessoaRepo, ProjetoRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEquipe;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /estagios/{id}/avaliadores`.
#[derive(Debug, Deserialize)]
pub struct SelecionarAvaliadoresRequest {
    pub pessoa_ids: Vec<DbId>,
}

/// Request body for `PUT /estagios/{id}/avaliadores/{pessoa_id}/projetos`.
#[derive(Debug, Deserialize)]
pub struct DistribuirProjetosRequest {
    pub projetos: Vec<String>,
}

/// One reviewer line of the per-reviewer scoreboard.
#[derive(Debug, Serialize)]
pub struct AvaliadorTotal {
    pub avaliador: String,
    pub total: usize,
}

/// Both scoreboards, computed from the last-saved assignments.
#[derive(Debug, Serialize)]
pub struct DistribuicaoResponse {
    pub por_projeto: BTreeMap<String, usize>,
    pub por_avaliador: Vec<AvaliadorTotal>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/estagios/{id}/avaliadores
///
/// The stage's current roster.
pub async fn list(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(estagio_id): Path<DbId>,
) -> AppResult<Json<Vec<Atribuicao>>> {
    buscar_estagio(&state, estagio_id).await?;
    let roster = AtribuicaoRepo::list_by_estagio(&state.pool, estagio_id).await?;
    Ok(Json(roster))
}

/// PUT /api/v1/estagios/{id}/avaliadores
///
/// Make the roster match the submitted reviewer set: newly checked reviewers
/// get an empty entry, unchecked ones are removed (their person record is
/// untouched). Only people with the `avaliador` role are accepted.
pub async fn selecionar(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(estagio_id): Path<DbId>,
    Json(input): Json<SelecionarAvaliadoresRequest>,
) -> AppResult<Json<Vec<Atribuicao>>> {
    buscar_estagio(&state, estagio_id).await?;

    let avaliadores: HashSet<DbId> = PessoaRepo::ids_por_tipo(&state.pool, TIPO_AVALIADOR)
        .await?
        .into_iter()
        .collect();

    let desconhecidos: Vec<DbId> = input
        .pessoa_ids
        .iter()
        .copied()
        .filter(|id| !avaliadores.contains(id))
        .collect();
    if !desconhecidos.is_empty() {
        return Err(AppError::Core(CoreError::InvalidFormat(format!(
            "Apenas pessoas do tipo avaliador podem compor o estágio (ids inválidos: {desconhecidos:?})"
        ))));
    }

    let roster = AtribuicaoRepo::sync_avaliadores(&state.pool, estagio_id, &input.pessoa_ids).await?;
    Ok(Json(roster))
}

/// PUT /api/v1/estagios/{id}/avaliadores/{pessoa_id}/projetos
///
/// Overwrite the reviewer's project list for this stage with the exact
/// submitted set. No merge and no content validation, mirroring the save
/// action of the distribution screen.
pub async fn distribuir(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path((estagio_id, pessoa_id)): Path<(DbId, DbId)>,
    Json(input): Json<DistribuirProjetosRequest>,
) -> AppResult<Json<Atribuicao>> {
    buscar_estagio(&state, estagio_id).await?;

    let atribuicao = AtribuicaoRepo::set_projetos(&state.pool, estagio_id, pessoa_id, &input.projetos)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Atribuicao",
            id: pessoa_id,
        }))?;
    Ok(Json(atribuicao))
}

/// GET /api/v1/estagios/{id}/distribuicao
///
/// Both scoreboards for the stage, recomputed from the saved roster rows:
/// reviewer count per project (every project of the call listed, zeros
/// included) and project count per reviewer in descending order.
pub async fn distribuicao(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(estagio_id): Path<DbId>,
) -> AppResult<Json<DistribuicaoResponse>> {
    let estagio = buscar_estagio(&state, estagio_id).await?;

    let edital = EditalRepo::find_by_id(&state.pool, estagio.edital_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Edital",
            id: estagio.edital_id,
        }))?;

    let projetos = ProjetoRepo::codigos_por_edital(&state.pool, &edital.codigo_edital).await?;

    let atribuicoes: Vec<AtribuicaoStage> = AtribuicaoRepo::list_com_nome(&state.pool, estagio_id)
        .await?
        .into_iter()
        .map(|a| AtribuicaoStage {
            avaliador: a.nome_completo,
            projetos: a.projetos,
        })
        .collect();

    let por_projeto = tally_por_projeto(&projetos, &atribuicoes);
    let por_avaliador = tally_por_avaliador(&atribuicoes)
        .into_iter()
        .map(|(avaliador, total)| AvaliadorTotal { avaliador, total })
        .collect();

    Ok(Json(DistribuicaoResponse {
        por_projeto,
        por_avaliador,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn buscar_estagio(state: &AppState, estagio_id: DbId) -> Result<Estagio, AppError> {
    EstagioRepo::find_by_id(&state.pool, estagio_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estagio",
            id: estagio_id,
        }))
}
