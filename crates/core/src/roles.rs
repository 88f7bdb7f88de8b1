//! Well-known role and status names, plus the per-role page menu.
//!
//! These must match the CHECK constraints in the `pessoas` migration.

use serde::Serialize;

pub const TIPO_ADMIN: &str = "admin";
pub const TIPO_EQUIPE: &str = "equipe";
pub const TIPO_AVALIADOR: &str = "avaliador";
pub const TIPO_BENEFICIARIO: &str = "beneficiario";
pub const TIPO_VISITANTE: &str = "visitante";

pub const STATUS_CONVIDADO: &str = "convidado";
pub const STATUS_ATIVO: &str = "ativo";
pub const STATUS_INATIVO: &str = "inativo";

pub const BENEFICIARIO_TECNICO: &str = "tecnico";
pub const BENEFICIARIO_FINANCEIRO: &str = "financeiro";

/// All valid user roles, in the order the admin edit form offers them.
pub const TIPOS_USUARIO: &[&str] = &[
    TIPO_ADMIN,
    TIPO_EQUIPE,
    TIPO_AVALIADOR,
    TIPO_BENEFICIARIO,
    TIPO_VISITANTE,
];

/// Roles the `equipe` role is allowed to invite or assign.
pub const TIPOS_CONVIDAVEIS_EQUIPE: &[&str] = &[TIPO_BENEFICIARIO, TIPO_VISITANTE];

/// Normalize a grantee subtype, accepting the accented spellings that appear
/// in uploaded spreadsheets.
///
/// Returns the canonical value or `None` when the input is not a valid
/// subtype.
pub fn normalizar_tipo_beneficiario(valor: &str) -> Option<&'static str> {
    match valor.trim().to_lowercase().as_str() {
        "tecnico" | "técnico" => Some(BENEFICIARIO_TECNICO),
        "financeiro" => Some(BENEFICIARIO_FINANCEIRO),
        _ => None,
    }
}

/// A logical page of the frontend, served to clients as menu data.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagina {
    pub secao: &'static str,
    pub titulo: &'static str,
    pub caminho: &'static str,
}

const PAGINAS_GESTAO: &[Pagina] = &[
    Pagina { secao: "Editais", titulo: "Editais", caminho: "/editais" },
    Pagina { secao: "Editais", titulo: "Gerenciar", caminho: "/editais/gerenciar" },
    Pagina { secao: "Pessoas", titulo: "Equipe", caminho: "/pessoas/equipe" },
    Pagina { secao: "Pessoas", titulo: "Avaliadores", caminho: "/pessoas/avaliadores" },
    Pagina { secao: "Pessoas", titulo: "Visitantes", caminho: "/pessoas/visitantes" },
    Pagina { secao: "Pessoas", titulo: "Convidar pessoas", caminho: "/pessoas/convidar" },
    Pagina { secao: "Pessoas", titulo: "Convites pendentes", caminho: "/pessoas/convites" },
];

const PAGINAS_PROJETO: &[Pagina] = &[
    Pagina { secao: "Projetos", titulo: "Selecione o projeto", caminho: "/projetos/selecionar" },
];

/// The fixed page menu for a role.
///
/// Unknown roles get an empty menu; the client falls back to the login page.
pub fn paginas_do_tipo(tipo_usuario: &str) -> &'static [Pagina] {
    match tipo_usuario {
        TIPO_ADMIN | TIPO_EQUIPE => PAGINAS_GESTAO,
        TIPO_AVALIADOR | TIPO_BENEFICIARIO | TIPO_VISITANTE => PAGINAS_PROJETO,
        _ => &[],
    }
}
