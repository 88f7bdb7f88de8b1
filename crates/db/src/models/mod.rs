//! Row structs and DTOs, one module per entity.

pub mod atribuicao;
pub mod edital;
pub mod pessoa;
pub mod projeto;
pub mod sessao;
