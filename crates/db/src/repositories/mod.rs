//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod atribuicao_repo;
pub mod edital_repo;
pub mod estagio_repo;
pub mod pergunta_repo;
pub mod pessoa_repo;
pub mod projeto_repo;
pub mod sessao_repo;

pub use atribuicao_repo::AtribuicaoRepo;
pub use edital_repo::EditalRepo;
pub use estagio_repo::EstagioRepo;
pub use pergunta_repo::PerguntaRepo;
pub use pessoa_repo::PessoaRepo;
pub use projeto_repo::ProjetoRepo;
pub use sessao_repo::SessaoRepo;
