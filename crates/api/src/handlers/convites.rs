//! Handlers for invitations: the individual invite form and the bulk CSV
//! upload with its validate / confirm phases.

use std::collections::HashSet;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use selecao_core::convite_massa::{
    normalizar_cabecalho, parse_projetos, validar_convites, FalhaConviteMassa, LinhaConvite,
    COLUNA_EMAIL, COLUNA_NOME, COLUNA_PROJETOS, COLUNA_TELEFONE, COLUNA_TIPO_BENEFICIARIO,
};
use selecao_core::email::validar_email;
use selecao_core::error::CoreError;
use selecao_core::roles::{
    normalizar_tipo_beneficiario, TIPO_ADMIN, TIPO_BENEFICIARIO, TIPOS_CONVIDAVEIS_EQUIPE,
    TIPOS_USUARIO,
};
use selecao_db::models::pessoa::{CreatePessoa, Pessoa, PessoaSemSenha};
use selecao_db::repositories::{PessoaRepo, ProjetoRepo};

use crate::auth::one_time_code::gerar_codigo_convite;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEquipe;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /pessoas/convites` (individual invite).
#[derive(Debug, Deserialize)]
pub struct ConviteRequest {
    pub nome_completo: String,
    pub tipo_usuario: String,
    pub tipo_beneficiario: Option<String>,
    pub e_mail: String,
    pub telefone: String,
    #[serde(default)]
    pub projetos: Vec<String>,
}

/// Response for the individual invite: the created person plus whether the
/// invitation e-mail went out.
#[derive(Debug, Serialize)]
pub struct ConviteResponse {
    pub pessoa: PessoaSemSenha,
    pub enviado: bool,
}

/// Response for the bulk dry-run.
#[derive(Debug, Serialize)]
pub struct ValidacaoResponse {
    pub valido: bool,
    pub linhas: usize,
}

/// One failed delivery in the bulk confirm phase.
#[derive(Debug, Serialize)]
pub struct FalhaEnvio {
    pub e_mail: String,
    pub erro: String,
}

/// Result of the bulk confirm: inserts always succeed as a whole once
/// validation passes; deliveries are best-effort per row.
#[derive(Debug, Serialize)]
pub struct ConviteMassaResponse {
    pub cadastrados: usize,
    pub enviados: usize,
    pub falhas: Vec<FalhaEnvio>,
}

// ---------------------------------------------------------------------------
// Individual invite
// ---------------------------------------------------------------------------

/// POST /api/v1/pessoas/convites
///
/// Create an invited person and send the invitation e-mail. The e-mail
/// dispatch is best-effort: a transport failure leaves the record in place
/// and is reported via `enviado: false`.
pub async fn criar(
    State(state): State<AppState>,
    RequireEquipe(user): RequireEquipe,
    Json(input): Json<ConviteRequest>,
) -> AppResult<(StatusCode, Json<ConviteResponse>)> {
    if input.nome_completo.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("nome_completo")));
    }
    if input.tipo_usuario.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("tipo_usuario")));
    }
    if input.e_mail.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("e_mail")));
    }
    if input.telefone.trim().is_empty() {
        return Err(AppError::Core(CoreError::MissingField("telefone")));
    }

    if !TIPOS_USUARIO.contains(&input.tipo_usuario.as_str()) {
        return Err(AppError::Core(CoreError::InvalidFormat(format!(
            "Tipo de usuário inválido: '{}'",
            input.tipo_usuario
        ))));
    }

    // Equipe may only invite grantees and visitors; admin may invite any role.
    if user.tipo_usuario != TIPO_ADMIN
        && !TIPOS_CONVIDAVEIS_EQUIPE.contains(&input.tipo_usuario.as_str())
    {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "A equipe não pode convidar pessoas do tipo '{}'",
            input.tipo_usuario
        ))));
    }

    let tipo_beneficiario = if input.tipo_usuario == TIPO_BENEFICIARIO {
        let Some(subtipo) = input.tipo_beneficiario.as_deref() else {
            return Err(AppError::Core(CoreError::MissingField("tipo_beneficiario")));
        };
        let Some(canonico) = normalizar_tipo_beneficiario(subtipo) else {
            return Err(AppError::Core(CoreError::InvalidFormat(format!(
                "Tipo de beneficiário inválido: '{subtipo}'"
            ))));
        };
        Some(canonico.to_string())
    } else {
        None
    };

    if !validar_email(&input.e_mail) {
        return Err(AppError::Core(CoreError::InvalidFormat(
            "E-mail inválido".into(),
        )));
    }

    let e_mail = input.e_mail.trim().to_string();
    if PessoaRepo::find_by_email(&state.pool, &e_mail).await?.is_some() {
        return Err(AppError::Core(CoreError::Duplicate(format!(
            "O e-mail '{e_mail}' já está cadastrado"
        ))));
    }

    let codigo = gerar_codigo_convite();
    let pessoa = PessoaRepo::create(
        &state.pool,
        &CreatePessoa {
            nome_completo: input.nome_completo.trim().to_string(),
            e_mail: e_mail.clone(),
            telefone: Some(input.telefone.trim().to_string()),
            tipo_usuario: input.tipo_usuario.clone(),
            tipo_beneficiario,
            codigo_convite: codigo.clone(),
            data_convite: Utc::now().date_naive(),
            projetos: input.projetos.clone(),
        },
    )
    .await?;

    let enviado = enviar_convite(&state, &pessoa, &codigo).await;

    Ok((
        StatusCode::CREATED,
        Json(ConviteResponse {
            pessoa: pessoa.into(),
            enviado,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Bulk invite
// ---------------------------------------------------------------------------

/// POST /api/v1/pessoas/convites/em-massa/validar
///
/// Dry-run of the bulk pipeline: parses the uploaded CSV and applies every
/// validation step without writing anything.
pub async fn em_massa_validar(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    body: Bytes,
) -> AppResult<Json<ValidacaoResponse>> {
    let linhas = validar_upload(&state, &body).await?;
    Ok(Json(ValidacaoResponse {
        valido: true,
        linhas: linhas.len(),
    }))
}

/// POST /api/v1/pessoas/convites/em-massa/confirmar
///
/// Re-validate the upload, insert every row as an invited grantee, then send
/// the invitation e-mails sequentially. Delivery failures are collected per
/// row and never roll back the committed inserts.
pub async fn em_massa_confirmar(
    State(state): State<AppState>,
    RequireEquipe(_user): RequireEquipe,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ConviteMassaResponse>)> {
    let linhas = validar_upload(&state, &body).await?;

    let hoje = Utc::now().date_naive();
    let inputs: Vec<CreatePessoa> = linhas
        .iter()
        .map(|linha| CreatePessoa {
            nome_completo: linha.nome_completo.trim().to_string(),
            e_mail: linha.e_mail.trim().to_string(),
            telefone: linha.telefone.clone(),
            tipo_usuario: TIPO_BENEFICIARIO.to_string(),
            tipo_beneficiario: normalizar_tipo_beneficiario(&linha.tipo_beneficiario)
                .map(str::to_string),
            codigo_convite: gerar_codigo_convite(),
            data_convite: hoje,
            projetos: linha.projetos.clone(),
        })
        .collect();

    let pessoas = PessoaRepo::create_many(&state.pool, &inputs).await?;
    tracing::info!(cadastrados = pessoas.len(), "Convite em massa inserido");

    let mut falhas = Vec::new();
    for pessoa in &pessoas {
        let codigo = pessoa.codigo_convite.clone().unwrap_or_default();
        if !enviar_convite(&state, pessoa, &codigo).await {
            falhas.push(FalhaEnvio {
                e_mail: pessoa.e_mail.clone(),
                erro: "Falha ao enviar o e-mail de convite".to_string(),
            });
        }
    }

    let cadastrados = pessoas.len();
    let enviados = cadastrados - falhas.len();

    Ok((
        StatusCode::CREATED,
        Json(ConviteMassaResponse {
            cadastrados,
            enviados,
            falhas,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the CSV body and run the full validation pipeline against the
/// current database state.
async fn validar_upload(state: &AppState, body: &Bytes) -> AppResult<Vec<LinhaConvite>> {
    let linhas = parse_planilha(body)?;

    let emails_existentes: HashSet<String> =
        PessoaRepo::list_emails(&state.pool).await?.into_iter().collect();
    let codigos_validos: HashSet<String> = ProjetoRepo::codigos_conhecidos(&state.pool)
        .await?
        .into_iter()
        .collect();

    validar_convites(&linhas, &emails_existentes, &codigos_validos)
        .map_err(|falha| AppError::Core(falha.into()))?;

    Ok(linhas)
}

/// Parse the uploaded template into rows, mapping the long header spellings
/// and skipping fully blank lines. Structural problems (unreadable file,
/// missing required columns) abort here.
fn parse_planilha(body: &Bytes) -> Result<Vec<LinhaConvite>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_ref());

    let cabecalhos: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Core(CoreError::UpstreamData(format!("Erro ao ler o arquivo: {e}"))))?
        .iter()
        .map(|h| normalizar_cabecalho(h).to_string())
        .collect();

    let indice = |coluna: &str| cabecalhos.iter().position(|c| c.as_str() == coluna);

    let obrigatorias = [COLUNA_NOME, COLUNA_EMAIL, COLUNA_TIPO_BENEFICIARIO];
    let faltando: Vec<String> = obrigatorias
        .iter()
        .copied()
        .filter(|c| indice(c).is_none())
        .map(str::to_string)
        .collect();
    if !faltando.is_empty() {
        return Err(AppError::Core(
            FalhaConviteMassa::ColunasFaltando(faltando).into(),
        ));
    }

    let col_nome = indice(COLUNA_NOME).unwrap();
    let col_email = indice(COLUNA_EMAIL).unwrap();
    let col_tipo = indice(COLUNA_TIPO_BENEFICIARIO).unwrap();
    let col_telefone = indice(COLUNA_TELEFONE);
    let col_projetos = indice(COLUNA_PROJETOS);

    let mut linhas = Vec::new();
    for (i, registro) in reader.records().enumerate() {
        let registro = registro.map_err(|e| {
            AppError::Core(CoreError::UpstreamData(format!(
                "Erro ao ler a linha {}: {e}",
                i + 1
            )))
        })?;

        let celula = |idx: usize| registro.get(idx).unwrap_or("").trim().to_string();

        // Skip rows where every cell is blank (trailing filler in templates).
        if registro.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let telefone = col_telefone.map(celula).filter(|t| !t.is_empty());
        let projetos = col_projetos
            .map(|idx| parse_projetos(&celula(idx)))
            .unwrap_or_default();

        linhas.push(LinhaConvite {
            numero: i + 1,
            nome_completo: celula(col_nome),
            e_mail: celula(col_email),
            tipo_beneficiario: celula(col_tipo),
            telefone,
            projetos,
        });
    }

    Ok(linhas)
}

/// Best-effort invitation e-mail. Logs and returns `false` on any failure,
/// including an unconfigured mailer.
async fn enviar_convite(state: &AppState, pessoa: &Pessoa, codigo: &str) -> bool {
    match &state.mailer {
        Some(mailer) => {
            match mailer
                .enviar_convite(&pessoa.nome_completo, &pessoa.e_mail, codigo)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(e_mail = %pessoa.e_mail, error = %e, "Falha ao enviar convite");
                    false
                }
            }
        }
        None => {
            tracing::warn!(e_mail = %pessoa.e_mail, "SMTP não configurado; convite não enviado");
            false
        }
    }
}
