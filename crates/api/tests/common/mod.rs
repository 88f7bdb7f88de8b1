#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use selecao_api::auth::jwt::JwtConfig;
use selecao_api::auth::password::hash_password;
use selecao_api::config::ServerConfig;
use selecao_api::reset_codes::ResetCodeStore;
use selecao_api::router::build_app_router;
use selecao_api::state::AppState;
use selecao_core::types::DbId;
use selecao_db::models::pessoa::CreatePessoa;
use selecao_db::repositories::PessoaRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        reset_code_ttl_secs: 900,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router plus its state, using the given pool.
///
/// No SMTP or Sheets configuration: invitation e-mails report
/// `enviado: false` and sheet import is disabled, which is what the tests
/// expect. Returning the state lets tests reach the transient reset-code
/// store directly.
pub fn build_test_app_with_state(pool: PgPool) -> (Router, AppState) {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
        sheets: None,
        reset_codes: Arc::new(ResetCodeStore::new(Duration::from_secs(
            config.reset_code_ttl_secs,
        ))),
    };
    let app = build_app_router(state.clone(), &config);
    (app, state)
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_state(pool).0
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "POST", uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, "POST", uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, "PUT", uri, Some(token), body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw CSV body (the bulk-invite upload format).
pub async fn post_csv_auth(app: Router, uri: &str, token: &str, csv: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Create an active person with the given role and password, directly in the
/// database.
pub async fn seed_ativo(
    pool: &PgPool,
    nome_completo: &str,
    e_mail: &str,
    tipo_usuario: &str,
    senha: &str,
) -> DbId {
    let pessoa = seed_convidado(pool, nome_completo, e_mail, tipo_usuario).await;
    let hash = hash_password(senha).expect("hashing should succeed");
    let ativada = PessoaRepo::ativar_com_senha(pool, pessoa, &hash)
        .await
        .expect("activation should succeed");
    assert!(ativada, "seeded person should have a pending invitation");
    pessoa
}

/// Create an invited person (status `convidado`, code `000042`).
pub async fn seed_convidado(
    pool: &PgPool,
    nome_completo: &str,
    e_mail: &str,
    tipo_usuario: &str,
) -> DbId {
    let pessoa = PessoaRepo::create(
        pool,
        &CreatePessoa {
            nome_completo: nome_completo.to_string(),
            e_mail: e_mail.to_string(),
            telefone: Some("11 99999-0000".to_string()),
            tipo_usuario: tipo_usuario.to_string(),
            tipo_beneficiario: None,
            codigo_convite: "000042".to_string(),
            data_convite: chrono::Utc::now().date_naive(),
            projetos: Vec::new(),
        },
    )
    .await
    .expect("person creation should succeed");
    pessoa.id
}

/// Log a user in via the API and return the JSON auth response.
pub async fn login_json(app: Router, e_mail: &str, senha: &str) -> serde_json::Value {
    let body = serde_json::json!({ "e_mail": e_mail, "senha": senha });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Seed an active `equipe` member and return a valid access token.
pub async fn token_equipe(pool: &PgPool, app: Router) -> String {
    seed_ativo(pool, "Equipe Teste", "equipe@teste.org", "equipe", "equipe1234").await;
    let json = login_json(app, "equipe@teste.org", "equipe1234").await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Seed an active `admin` and return a valid access token.
pub async fn token_admin(pool: &PgPool, app: Router) -> String {
    seed_ativo(pool, "Admin Teste", "admin@teste.org", "admin", "admin1234").await;
    let json = login_json(app, "admin@teste.org", "admin1234").await;
    json["access_token"].as_str().unwrap().to_string()
}
