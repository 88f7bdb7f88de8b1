//! Handlers for the `/pessoas` resource: listings, pending invitations, and
//! the administrative edit form.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use selecao_core::email::validar_email;
use selecao_core::error::CoreError;
use selecao_core::roles::{
    normalizar_tipo_beneficiario, STATUS_ATIVO, STATUS_CONVIDADO, STATUS_INATIVO, TIPO_ADMIN,
    TIPO_BENEFICIARIO, TIPO_EQUIPE, TIPOS_USUARIO,
};
use selecao_core::types::DbId;
use selecao_db::models::pessoa::{PessoaSemSenha, UpdatePessoa};
use selecao_db::repositories::PessoaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEquipe;
use crate::state::AppState;

/// Query parameters for `GET /pessoas`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub tipo: Option<String>,
    pub status: Option<String>,
}

/// GET /api/v1/pessoas
///
/// List people sorted by name, optionally filtered by role and/or status.
/// The password column is never selected.
pub async fn list(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PessoaSemSenha>>> {
    let pessoas = PessoaRepo::list(
        &state.pool,
        query.tipo.as_deref(),
        query.status.as_deref(),
    )
    .await?;
    Ok(Json(pessoas))
}

/// GET /api/v1/pessoas/convites/pendentes
///
/// People still waiting to complete their first access.
pub async fn pendentes(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
) -> AppResult<Json<Vec<PessoaSemSenha>>> {
    let pessoas = PessoaRepo::list(&state.pool, None, Some(STATUS_CONVIDADO)).await?;
    Ok(Json(pessoas))
}

/// GET /api/v1/pessoas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    Path(id): Path<DbId>,
) -> AppResult<Json<PessoaSemSenha>> {
    let pessoa = PessoaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pessoa",
            id,
        }))?;
    Ok(Json(pessoa))
}

/// PUT /api/v1/pessoas/{id}
///
/// Administrative edit: name, e-mail, phone, role, grantee subtype, status,
/// and associated project codes. Changing the role away from beneficiario
/// clears the subtype. Equipe cannot touch admin/equipe accounts nor promote
/// anyone into those roles; admin can.
pub async fn update(
    State(state): State<AppState>,
    RequireEquipe(user): RequireEquipe,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePessoa>,
) -> AppResult<Json<PessoaSemSenha>> {
    let atual = PessoaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pessoa",
            id,
        }))?;

    if user.tipo_usuario != TIPO_ADMIN
        && [TIPO_ADMIN, TIPO_EQUIPE].contains(&atual.tipo_usuario.as_str())
    {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "A equipe não pode editar pessoas do tipo '{}'",
            atual.tipo_usuario
        ))));
    }

    if let Some(tipo) = input.tipo_usuario.as_deref() {
        if !TIPOS_USUARIO.contains(&tipo) {
            return Err(AppError::Core(CoreError::InvalidFormat(format!(
                "Tipo de usuário inválido: '{tipo}'"
            ))));
        }
        if user.tipo_usuario != TIPO_ADMIN && [TIPO_ADMIN, TIPO_EQUIPE].contains(&tipo) {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "A equipe não pode atribuir o tipo '{tipo}'"
            ))));
        }
    }

    if let Some(status) = input.status.as_deref() {
        if ![STATUS_CONVIDADO, STATUS_ATIVO, STATUS_INATIVO].contains(&status) {
            return Err(AppError::Core(CoreError::InvalidFormat(format!(
                "Status inválido: '{status}'"
            ))));
        }
    }

    if let Some(e_mail) = input.e_mail.as_deref() {
        if !validar_email(e_mail) {
            return Err(AppError::Core(CoreError::InvalidFormat(
                "E-mail inválido".into(),
            )));
        }
        // The unique index is case-insensitive; surface a friendly message
        // instead of the raw constraint violation.
        if let Some(existente) = PessoaRepo::find_by_email(&state.pool, e_mail).await? {
            if existente.id != id {
                return Err(AppError::Core(CoreError::Duplicate(format!(
                    "O e-mail '{e_mail}' já está cadastrado"
                ))));
            }
        }
    }

    let tipo_final = input
        .tipo_usuario
        .as_deref()
        .unwrap_or(&atual.tipo_usuario)
        .to_string();

    let mut limpar_subtipo = false;
    if tipo_final == TIPO_BENEFICIARIO {
        if let Some(subtipo) = input.tipo_beneficiario.as_deref() {
            let Some(canonico) = normalizar_tipo_beneficiario(subtipo) else {
                return Err(AppError::Core(CoreError::InvalidFormat(format!(
                    "Tipo de beneficiário inválido: '{subtipo}'"
                ))));
            };
            input.tipo_beneficiario = Some(canonico.to_string());
        }
    } else {
        limpar_subtipo = atual.tipo_beneficiario.is_some() || input.tipo_beneficiario.is_some();
        input.tipo_beneficiario = None;
    }

    if limpar_subtipo {
        PessoaRepo::clear_tipo_beneficiario(&state.pool, id).await?;
    }

    let atualizada = PessoaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pessoa",
            id,
        }))?;

    Ok(Json(atualizada))
}
