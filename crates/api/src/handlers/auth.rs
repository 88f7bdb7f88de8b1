//! Handlers for the `/auth` resource: login, refresh, logout, identity,
//! first access, and password recovery.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use selecao_core::error::CoreError;
use selecao_core::roles::{paginas_do_tipo, Pagina, STATUS_ATIVO};
use selecao_core::types::DbId;
use selecao_db::models::pessoa::{Pessoa, PessoaSemSenha};
use selecao_db::models::projeto::Projeto;
use selecao_db::repositories::{PessoaRepo, ProjetoRepo, SessaoRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::one_time_code::gerar_codigo_verificacao;
use crate::auth::password::{hash_password, validar_senha, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Login failure message; deliberately identical for unknown e-mail, missing
/// hash, and wrong password so the response does not leak which accounts exist.
const MSG_CREDENCIAIS_INVALIDAS: &str = "E-mail ou senha inválidos";

const MSG_USUARIO_INATIVO: &str =
    "Usuário inativo. Entre em contato com a equipe da plataforma.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub e_mail: String,
    pub senha: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub pessoa: PessoaInfo,
}

/// Public identity info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct PessoaInfo {
    pub id: DbId,
    pub nome_completo: String,
    pub tipo_usuario: String,
    pub projetos: Vec<String>,
}

/// Response for `GET /auth/me`: identity, page menu, and project details.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub pessoa: PessoaSemSenha,
    pub paginas: Vec<Pagina>,
    pub projetos: Vec<Projeto>,
}

/// Request body for `POST /auth/primeiro-acesso/verificar`.
#[derive(Debug, Deserialize)]
pub struct VerificarConviteRequest {
    pub e_mail: String,
    pub codigo: String,
}

/// Request body for `POST /auth/primeiro-acesso/concluir`.
#[derive(Debug, Deserialize)]
pub struct ConcluirPrimeiroAcessoRequest {
    pub e_mail: String,
    pub codigo: String,
    pub nova_senha: String,
    pub confirmacao: String,
}

/// Request body for `POST /auth/recuperar-senha/enviar-codigo`.
#[derive(Debug, Deserialize)]
pub struct EnviarCodigoRequest {
    pub e_mail: String,
}

/// Response for the code-dispatch endpoint. A transport failure is reported
/// here rather than as an HTTP error, matching the flow's best-effort nature.
#[derive(Debug, Serialize)]
pub struct EnviadoResponse {
    pub enviado: bool,
}

/// Request body for `POST /auth/recuperar-senha/redefinir`.
#[derive(Debug, Deserialize)]
pub struct RedefinirSenhaRequest {
    pub e_mail: String,
    pub codigo: String,
    pub nova_senha: String,
    pub confirmacao: String,
}

// ---------------------------------------------------------------------------
// Login / refresh / logout / me
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with e-mail (case-insensitive) + password. Returns access
/// and refresh tokens. The account status is checked only after the
/// credentials match.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find the person by e-mail.
    let pessoa = PessoaRepo::find_by_email(&state.pool, &input.e_mail)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(MSG_CREDENCIAIS_INVALIDAS.into()))
        })?;

    // 2. Verify the password. A missing hash (pending invitation) fails the
    //    same way as a wrong password.
    let Some(senha_hash) = pessoa.senha.as_deref() else {
        return Err(AppError::Core(CoreError::Unauthorized(
            MSG_CREDENCIAIS_INVALIDAS.into(),
        )));
    };

    let senha_valida = verify_password(&input.senha, senha_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !senha_valida {
        return Err(AppError::Core(CoreError::Unauthorized(
            MSG_CREDENCIAIS_INVALIDAS.into(),
        )));
    }

    // 3. Only now check the account status.
    if pessoa.status != STATUS_ATIVO {
        return Err(AppError::Core(CoreError::Forbidden(
            MSG_USUARIO_INATIVO.into(),
        )));
    }

    // 4. Generate tokens and create a session.
    let response = create_auth_response(&state, &pessoa).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Hash the provided refresh token and find the matching session.
    let token_hash = hash_refresh_token(&input.refresh_token);
    let sessao = SessaoRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Refresh token inválido ou expirado".into(),
            ))
        })?;

    // 2. Revoke the old session (token rotation).
    SessaoRepo::revoke(&state.pool, sessao.id).await?;

    // 3. The person must still exist and be active.
    let pessoa = PessoaRepo::find_by_id_full(&state.pool, sessao.pessoa_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Usuário não existe mais".into()))
        })?;

    if pessoa.status != STATUS_ATIVO {
        return Err(AppError::Core(CoreError::Forbidden(
            MSG_USUARIO_INATIVO.into(),
        )));
    }

    // 4. Generate new tokens and create a new session.
    let response = create_auth_response(&state, &pessoa).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated person. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessaoRepo::revoke_all_for_pessoa(&state.pool, auth_user.pessoa_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The authenticated identity, its page menu, and the detail rows of its
/// associated projects (the beneficiary/reviewer project selector).
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Json<MeResponse>> {
    let pessoa = PessoaRepo::find_by_id(&state.pool, auth_user.pessoa_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pessoa",
            id: auth_user.pessoa_id,
        }))?;

    let paginas = paginas_do_tipo(&pessoa.tipo_usuario).to_vec();

    let projetos = if pessoa.projetos.is_empty() {
        Vec::new()
    } else {
        ProjetoRepo::list_por_codigos(&state.pool, &pessoa.projetos).await?
    };

    Ok(Json(MeResponse {
        pessoa,
        paginas,
        projetos,
    }))
}

// ---------------------------------------------------------------------------
// First access
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/primeiro-acesso/verificar
///
/// Check an invitation code before showing the password form.
pub async fn primeiro_acesso_verificar(
    State(state): State<AppState>,
    Json(input): Json<VerificarConviteRequest>,
) -> AppResult<StatusCode> {
    let pessoa = PessoaRepo::find_by_email(&state.pool, &input.e_mail)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Usuário não encontrado. Entre em contato com o administrador.".into(),
            ))
        })?;

    verificar_codigo_convite(&pessoa, &input.codigo)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/primeiro-acesso/concluir
///
/// Set the first password: activates the account and consumes the
/// invitation code. Retrying after success fails (no pending invitation).
pub async fn primeiro_acesso_concluir(
    State(state): State<AppState>,
    Json(input): Json<ConcluirPrimeiroAcessoRequest>,
) -> AppResult<StatusCode> {
    let pessoa = PessoaRepo::find_by_email(&state.pool, &input.e_mail)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Usuário não encontrado. Entre em contato com o administrador.".into(),
            ))
        })?;

    verificar_codigo_convite(&pessoa, &input.codigo)?;
    validar_nova_senha(&input.nova_senha, &input.confirmacao)?;

    let hash = hash_password(&input.nova_senha)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let ativada = PessoaRepo::ativar_com_senha(&state.pool, pessoa.id, &hash).await?;
    if !ativada {
        // Lost the race with a concurrent completion.
        return Err(AppError::Core(CoreError::Unauthorized(
            "Nenhum convite pendente para este e-mail".into(),
        )));
    }

    tracing::info!(pessoa_id = pessoa.id, "Primeiro acesso concluído");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/recuperar-senha/enviar-codigo
///
/// Generate a 3-digit verification code, keep it in the transient store, and
/// e-mail it. Transport failure yields `{"enviado": false}`, not an error.
pub async fn recuperar_senha_enviar_codigo(
    State(state): State<AppState>,
    Json(input): Json<EnviarCodigoRequest>,
) -> AppResult<Json<EnviadoResponse>> {
    let pessoa = PessoaRepo::find_by_email(&state.pool, &input.e_mail)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "E-mail não encontrado. Tente novamente.".into(),
            ))
        })?;

    if pessoa.status != STATUS_ATIVO {
        return Err(AppError::Core(CoreError::Forbidden(
            MSG_USUARIO_INATIVO.into(),
        )));
    }

    let codigo = gerar_codigo_verificacao();
    state.reset_codes.insert(&pessoa.e_mail, codigo.clone()).await;

    let enviado = match &state.mailer {
        Some(mailer) => match mailer.enviar_codigo_verificacao(&pessoa.e_mail, &codigo).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(e_mail = %pessoa.e_mail, error = %e, "Falha ao enviar código de verificação");
                false
            }
        },
        None => {
            tracing::warn!("SMTP não configurado; código de verificação não enviado");
            false
        }
    };

    Ok(Json(EnviadoResponse { enviado }))
}

/// POST /api/v1/auth/recuperar-senha/redefinir
///
/// Verify the transient code and replace the password hash. The account
/// status is left untouched.
pub async fn recuperar_senha_redefinir(
    State(state): State<AppState>,
    Json(input): Json<RedefinirSenhaRequest>,
) -> AppResult<StatusCode> {
    let pessoa = PessoaRepo::find_by_email(&state.pool, &input.e_mail)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "E-mail não encontrado. Tente novamente.".into(),
            ))
        })?;

    if !state.reset_codes.consume(&pessoa.e_mail, &input.codigo).await {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Código inválido. Tente novamente.".into(),
        )));
    }

    validar_nova_senha(&input.nova_senha, &input.confirmacao)?;

    let hash = hash_password(&input.nova_senha)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    PessoaRepo::update_senha(&state.pool, pessoa.id, &hash).await?;

    tracing::info!(pessoa_id = pessoa.id, "Senha redefinida");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn verificar_codigo_convite(pessoa: &Pessoa, codigo: &str) -> Result<(), AppError> {
    match pessoa.codigo_convite.as_deref() {
        None => Err(AppError::Core(CoreError::Unauthorized(
            "Nenhum convite pendente para este e-mail".into(),
        ))),
        Some(esperado) if esperado != codigo => Err(AppError::Core(CoreError::Unauthorized(
            "Código inválido. Verifique o e-mail enviado.".into(),
        ))),
        Some(_) => Ok(()),
    }
}

fn validar_nova_senha(nova_senha: &str, confirmacao: &str) -> Result<(), AppError> {
    if nova_senha != confirmacao {
        return Err(AppError::Core(CoreError::InvalidFormat(
            "As senhas não coincidem".into(),
        )));
    }
    validar_senha(nova_senha).map_err(|msg| AppError::Core(CoreError::InvalidFormat(msg)))
}

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
async fn create_auth_response(state: &AppState, pessoa: &Pessoa) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(pessoa.id, &pessoa.tipo_usuario, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let sessao_input = selecao_db::models::sessao::CreateSessao {
        pessoa_id: pessoa.id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessaoRepo::create(&state.pool, &sessao_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        pessoa: PessoaInfo {
            id: pessoa.id,
            nome_completo: pessoa.nome_completo.clone(),
            tipo_usuario: pessoa.tipo_usuario.clone(),
            projetos: pessoa.projetos.clone(),
        },
    })
}
