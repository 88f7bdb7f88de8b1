//! HTTP-level integration tests for the auth endpoints: login, refresh,
//! logout, identity, first access, and password recovery.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, login_json, post_json, seed_ativo, seed_convidado};
use sqlx::PgPool;
use selecao_db::repositories::PessoaRepo;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns tokens plus the person's role and projects.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let id = seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "teste1234").await;
    let app = common::build_test_app(pool);

    let json = login_json(app, "ana@x.org", "teste1234").await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["pessoa"]["id"], id);
    assert_eq!(json["pessoa"]["nome_completo"], "Ana Silva");
    assert_eq!(json["pessoa"]["tipo_usuario"], "avaliador");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "teste1234").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "e_mail": "ana@x.org", "senha": "wrong1234" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The e-mail lookup is case-insensitive.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_email_case_insensitive(pool: PgPool) {
    seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "teste1234").await;
    let app = common::build_test_app(pool);

    let json = login_json(app, "ANA@X.ORG", "teste1234").await;
    assert_eq!(json["pessoa"]["nome_completo"], "Ana Silva");
}

/// Login with a nonexistent e-mail returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_nonexistent(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "e_mail": "fantasma@x.org", "senha": "whatever1" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A pending invitation (no password yet) cannot log in.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_convidado_sem_senha(pool: PgPool) {
    seed_convidado(&pool, "Bruno Costa", "bruno@x.org", "beneficiario").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "e_mail": "bruno@x.org", "senha": "qualquer1" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// An inactive account is rejected with 403 only after the credentials match.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_inativo(pool: PgPool) {
    let id = seed_ativo(&pool, "Carla Souza", "carla@x.org", "equipe", "senha1234").await;
    let update = selecao_db::models::pessoa::UpdatePessoa {
        nome_completo: None,
        e_mail: None,
        telefone: None,
        tipo_usuario: None,
        tipo_beneficiario: None,
        status: Some("inativo".to_string()),
        projetos: None,
    };
    PessoaRepo::update(&pool, id, &update).await.unwrap();

    let app = common::build_test_app(pool);

    // Wrong password on an inactive account: credentials fail first (401).
    let body = serde_json::json!({ "e_mail": "carla@x.org", "senha": "errada1234" });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Right password: only now the status check fires (403).
    let body = serde_json::json!({ "e_mail": "carla@x.org", "senha": "senha1234" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh / logout / me
// ---------------------------------------------------------------------------

/// A refresh token can be exchanged once; rotation revokes the old one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotation(pool: PgPool) {
    seed_ativo(&pool, "Davi Lima", "davi@x.org", "equipe", "senha1234").await;
    let app = common::build_test_app(pool);

    let login = login_json(app.clone(), "davi@x.org", "senha1234").await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let renewed = body_json(response).await;
    assert!(renewed["access_token"].is_string());
    assert_ne!(renewed["refresh_token"].as_str().unwrap(), refresh_token);

    // The rotated-out token no longer works.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every session of the person.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revoga_sessoes(pool: PgPool) {
    seed_ativo(&pool, "Elisa Prado", "elisa@x.org", "equipe", "senha1234").await;
    let app = common::build_test_app(pool);

    let login = login_json(app.clone(), "elisa@x.org", "senha1234").await;
    let access = login["access_token"].as_str().unwrap();
    let refresh = login["refresh_token"].as_str().unwrap();

    let response = common::post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        access,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// /auth/me returns the identity, the role's page menu, and no password data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me(pool: PgPool) {
    seed_ativo(&pool, "Fabio Reis", "fabio@x.org", "admin", "senha1234").await;
    let app = common::build_test_app(pool);

    let login = login_json(app.clone(), "fabio@x.org", "senha1234").await;
    let access = login["access_token"].as_str().unwrap();

    let response = get_auth(app, "/api/v1/auth/me", access).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["pessoa"]["e_mail"], "fabio@x.org");
    assert!(json["pessoa"].get("senha").is_none());
    let paginas = json["paginas"].as_array().unwrap();
    assert!(paginas.iter().any(|p| p["caminho"] == "/pessoas/convites"));
}

/// Requests without a bearer token are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_sem_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// First access
// ---------------------------------------------------------------------------

/// End-to-end invitation: invited person completes first access, the account
/// activates with a hashed password and the code is consumed, and login works.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_primeiro_acesso_end_to_end(pool: PgPool) {
    let id = seed_convidado(&pool, "Ana Silva", "ana@x.org", "avaliador").await;

    // Invited state: 6-digit code present, no password.
    let antes = PessoaRepo::find_by_id_full(&pool, id).await.unwrap().unwrap();
    assert_eq!(antes.status, "convidado");
    assert!(antes.senha.is_none());
    let codigo = antes.codigo_convite.clone().unwrap();
    assert_eq!(codigo.len(), 6);

    let app = common::build_test_app(pool.clone());

    // Step 1: verify the code.
    let body = serde_json::json!({ "e_mail": "ana@x.org", "codigo": codigo });
    let response = post_json(app.clone(), "/api/v1/auth/primeiro-acesso/verificar", body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Step 2: set the password.
    let body = serde_json::json!({
        "e_mail": "ana@x.org",
        "codigo": codigo,
        "nova_senha": "teste1234",
        "confirmacao": "teste1234",
    });
    let response = post_json(app.clone(), "/api/v1/auth/primeiro-acesso/concluir", body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Activated: hash stored (not the plaintext), code consumed.
    let depois = PessoaRepo::find_by_id_full(&pool, id).await.unwrap().unwrap();
    assert_eq!(depois.status, "ativo");
    let hash = depois.senha.expect("password hash must be set");
    assert_ne!(hash, "teste1234");
    assert!(hash.starts_with("$argon2id$"));
    assert!(depois.codigo_convite.is_none());

    // Retrying the same completion fails: no pending invitation.
    let response = post_json(app.clone(), "/api/v1/auth/primeiro-acesso/concluir", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // And the login now works.
    let json = login_json(app, "ana@x.org", "teste1234").await;
    assert_eq!(json["pessoa"]["tipo_usuario"], "avaliador");
}

/// A wrong invitation code is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_primeiro_acesso_codigo_errado(pool: PgPool) {
    seed_convidado(&pool, "Gil Nunes", "gil@x.org", "beneficiario").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "e_mail": "gil@x.org", "codigo": "999999" });
    let response = post_json(app, "/api/v1/auth/primeiro-acesso/verificar", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Weak or mismatched passwords are rejected before anything is written.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_primeiro_acesso_senha_fraca(pool: PgPool) {
    let id = seed_convidado(&pool, "Heitor Melo", "heitor@x.org", "beneficiario").await;
    let app = common::build_test_app(pool.clone());

    for (nova, confirmacao) in [
        ("abcdefgh", "abcdefgh"), // no digit
        ("1234567", "1234567"),   // too short, no letter
        ("ab1", "ab1"),           // too short
        ("teste1234", "outra1234"), // mismatch
    ] {
        let body = serde_json::json!({
            "e_mail": "heitor@x.org",
            "codigo": "000042",
            "nova_senha": nova,
            "confirmacao": confirmacao,
        });
        let response =
            post_json(app.clone(), "/api/v1/auth/primeiro-acesso/concluir", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "senha: {nova}");
    }

    let pessoa = PessoaRepo::find_by_id_full(&pool, id).await.unwrap().unwrap();
    assert_eq!(pessoa.status, "convidado");
    assert!(pessoa.senha.is_none());
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

/// Without SMTP configured the code is stored but reported as not sent.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_recuperar_senha_enviar_codigo_sem_smtp(pool: PgPool) {
    seed_ativo(&pool, "Iara Dias", "iara@x.org", "equipe", "senha1234").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "e_mail": "iara@x.org" });
    let response = post_json(app, "/api/v1/auth/recuperar-senha/enviar-codigo", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["enviado"], false);
}

/// Recovery codes are only issued for active accounts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_recuperar_senha_convidado_rejeitado(pool: PgPool) {
    seed_convidado(&pool, "Joao Paz", "joao@x.org", "beneficiario").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "e_mail": "joao@x.org" });
    let response = post_json(app, "/api/v1/auth/recuperar-senha/enviar-codigo", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A valid transient code lets the person set a new password; the code is
/// single-use and the account status is untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_recuperar_senha_redefinir(pool: PgPool) {
    let id = seed_ativo(&pool, "Lia Rocha", "lia@x.org", "avaliador", "antiga1234").await;
    let (app, state) = common::build_test_app_with_state(pool.clone());

    // Plant the code the way enviar-codigo would.
    state.reset_codes.insert("lia@x.org", "123".to_string()).await;

    let body = serde_json::json!({
        "e_mail": "lia@x.org",
        "codigo": "123",
        "nova_senha": "nova12345",
        "confirmacao": "nova12345",
    });
    let response = post_json(app.clone(), "/api/v1/auth/recuperar-senha/redefinir", body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let pessoa = PessoaRepo::find_by_id_full(&pool, id).await.unwrap().unwrap();
    assert_eq!(pessoa.status, "ativo");

    // The code was consumed: replaying the request fails.
    let response = post_json(app.clone(), "/api/v1/auth/recuperar-senha/redefinir", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Old password out, new password in.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "e_mail": "lia@x.org", "senha": "antiga1234" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    login_json(app, "lia@x.org", "nova12345").await;
}

/// A wrong recovery code is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_recuperar_senha_codigo_errado(pool: PgPool) {
    seed_ativo(&pool, "Mara Luz", "mara@x.org", "equipe", "senha1234").await;
    let (app, state) = common::build_test_app_with_state(pool);

    state.reset_codes.insert("mara@x.org", "123".to_string()).await;

    let body = serde_json::json!({
        "e_mail": "mara@x.org",
        "codigo": "999",
        "nova_senha": "nova12345",
        "confirmacao": "nova12345",
    });
    let response = post_json(app, "/api/v1/auth/recuperar-senha/redefinir", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
