//! HTTP-level integration tests for people listings and the admin edit form.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, put_json_auth, seed_ativo, seed_convidado, token_equipe};
use sqlx::PgPool;

/// Listings filter by role/status, sort by name, and never expose credentials.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filtros_e_projecao(pool: PgPool) {
    seed_ativo(&pool, "Zeca Mota", "zeca@x.org", "avaliador", "senha1234").await;
    seed_ativo(&pool, "Alice Reis", "alice@x.org", "avaliador", "senha1234").await;
    seed_convidado(&pool, "Bento Luz", "bento@x.org", "beneficiario").await;

    let app = common::build_test_app(pool.clone());
    let token = token_equipe(&pool, app.clone()).await;

    let response = get_auth(app.clone(), "/api/v1/pessoas?tipo=avaliador", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let nomes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nome_completo"].as_str().unwrap())
        .collect();
    assert_eq!(nomes, vec!["Alice Reis", "Zeca Mota"]);
    assert!(json[0].get("senha").is_none());
    assert!(json[0].get("codigo_convite").is_none());

    let response = get_auth(app.clone(), "/api/v1/pessoas/convites/pendentes", &token).await;
    let json = body_json(response).await;
    let pendentes = json.as_array().unwrap();
    assert_eq!(pendentes.len(), 1);
    assert_eq!(pendentes[0]["nome_completo"], "Bento Luz");
    assert_eq!(pendentes[0]["status"], "convidado");
}

/// Listings require a management role.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_rbac(pool: PgPool) {
    seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "senha1234").await;
    let app = common::build_test_app(pool.clone());
    let login = common::login_json(app.clone(), "ana@x.org", "senha1234").await;
    let token = login["access_token"].as_str().unwrap();

    let response = get_auth(app, "/api/v1/pessoas", token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The edit form updates scalar fields and toggles the account status.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_pessoa(pool: PgPool) {
    let id = seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "senha1234").await;
    let app = common::build_test_app(pool.clone());
    let token = token_equipe(&pool, app.clone()).await;

    let body = serde_json::json!({
        "telefone": "21 90000-0000",
        "status": "inativo",
    });
    let response = put_json_auth(app.clone(), &format!("/api/v1/pessoas/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["telefone"], "21 90000-0000");
    assert_eq!(json["status"], "inativo");

    // Toggling back to active works the same way.
    let body = serde_json::json!({ "status": "ativo" });
    let response = put_json_auth(app, &format!("/api/v1/pessoas/{id}"), &token, body).await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "ativo");
}

/// Changing the role away from beneficiario clears the subtype.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_limpa_subtipo(pool: PgPool) {
    let id = seed_convidado(&pool, "Beto Faria", "beto@x.org", "beneficiario").await;
    let app = common::build_test_app(pool.clone());
    let token = token_equipe(&pool, app.clone()).await;

    let body = serde_json::json!({ "tipo_beneficiario": "financeiro" });
    let response = put_json_auth(app.clone(), &format!("/api/v1/pessoas/{id}"), &token, body).await;
    let json = body_json(response).await;
    assert_eq!(json["tipo_beneficiario"], "financeiro");

    let body = serde_json::json!({ "tipo_usuario": "visitante" });
    let response = put_json_auth(app, &format!("/api/v1/pessoas/{id}"), &token, body).await;
    let json = body_json(response).await;
    assert_eq!(json["tipo_usuario"], "visitante");
    assert!(json["tipo_beneficiario"].is_null());
}

/// Updating to an e-mail that belongs to someone else is a conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_email_duplicado(pool: PgPool) {
    seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "senha1234").await;
    let id = seed_ativo(&pool, "Bia Torres", "bia@x.org", "avaliador", "senha1234").await;
    let app = common::build_test_app(pool.clone());
    let token = token_equipe(&pool, app.clone()).await;

    let body = serde_json::json!({ "e_mail": "ANA@x.org" });
    let response = put_json_auth(app.clone(), &format!("/api/v1/pessoas/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Keeping your own e-mail (different case) is not a conflict.
    let body = serde_json::json!({ "e_mail": "BIA@x.org" });
    let response = put_json_auth(app, &format!("/api/v1/pessoas/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Equipe cannot edit admin/equipe accounts nor promote into those roles;
/// admin can.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_equipe_nao_toca_gestao(pool: PgPool) {
    let admin_id = seed_ativo(&pool, "Gustavo Reis", "gustavo@x.org", "admin", "senha1234").await;
    let avaliador_id = seed_ativo(&pool, "Helena Cruz", "helena@x.org", "avaliador", "senha1234").await;
    let app = common::build_test_app(pool.clone());
    let token = token_equipe(&pool, app.clone()).await;

    let body = serde_json::json!({ "telefone": "11 90000-0000" });
    let response =
        put_json_auth(app.clone(), &format!("/api/v1/pessoas/{admin_id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = serde_json::json!({ "tipo_usuario": "equipe" });
    let response =
        put_json_auth(app.clone(), &format!("/api/v1/pessoas/{avaliador_id}"), &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin_token = common::token_admin(&pool, app.clone()).await;
    let response =
        put_json_auth(app, &format!("/api/v1/pessoas/{avaliador_id}"), &admin_token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Unknown role or status values are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_valores_invalidos(pool: PgPool) {
    let id = seed_ativo(&pool, "Ana Silva", "ana@x.org", "avaliador", "senha1234").await;
    let app = common::build_test_app(pool.clone());
    let token = token_equipe(&pool, app.clone()).await;

    let body = serde_json::json!({ "tipo_usuario": "diretor" });
    let response = put_json_auth(app.clone(), &format!("/api/v1/pessoas/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "status": "suspenso" });
    let response = put_json_auth(app, &format!("/api/v1/pessoas/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
