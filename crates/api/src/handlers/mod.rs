//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `selecao_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod avaliadores;
pub mod convites;
pub mod editais;
pub mod estagios;
pub mod pessoas;
pub mod projetos;
