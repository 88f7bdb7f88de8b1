//! Validation pipeline for the bulk-invitation spreadsheet.
//!
//! The uploaded file is parsed by the API layer into [`LinhaConvite`] rows;
//! this module applies the content rules. The pipeline is fail-fast: the
//! first failing step rejects the whole batch and nothing is written, so the
//! operator fixes the file and uploads again. Offending rows are reported by
//! their 1-based data-row number (matching the downloaded template).

use std::collections::{HashMap, HashSet};

use crate::email::validar_email;
use crate::roles::normalizar_tipo_beneficiario;

/// Required columns of the invitation template.
pub const COLUNA_NOME: &str = "nome_completo";
pub const COLUNA_EMAIL: &str = "e_mail";
pub const COLUNA_TIPO_BENEFICIARIO: &str = "tipo_beneficiario";

/// Optional columns; defaulted to empty when absent.
pub const COLUNA_TELEFONE: &str = "telefone";
pub const COLUNA_PROJETOS: &str = "projetos";

/// Map the template's long header spellings to canonical column names.
pub fn normalizar_cabecalho(cabecalho: &str) -> &str {
    match cabecalho.trim() {
        "tipo_beneficiario (técnico ou financeiro)" => COLUNA_TIPO_BENEFICIARIO,
        "projetos (códigos separados por vírgula) (opcional)" => COLUNA_PROJETOS,
        "telefone (opcional)" => COLUNA_TELEFONE,
        outro => outro,
    }
}

/// One parsed data row of the uploaded template.
#[derive(Debug, Clone)]
pub struct LinhaConvite {
    /// 1-based data-row number (header excluded).
    pub numero: usize,
    pub nome_completo: String,
    pub e_mail: String,
    pub tipo_beneficiario: String,
    pub telefone: Option<String>,
    /// Receipt codes parsed from the comma-separated `projetos` cell.
    pub projetos: Vec<String>,
}

fn linhas_texto(numeros: &[usize]) -> String {
    numeros
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A rejected batch. Every variant aborts the whole upload with zero writes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FalhaConviteMassa {
    #[error("O arquivo enviado está vazio")]
    Vazia,

    #[error("Faltam colunas obrigatórias no arquivo: {}", .0.join(", "))]
    ColunasFaltando(Vec<String>),

    #[error("Existem e-mails inválidos nas linhas: {}", linhas_texto(.0))]
    EmailsInvalidos(Vec<usize>),

    #[error(
        "Existem registros com tipo_beneficiario inválido nas linhas: {} (valores válidos: técnico ou financeiro)",
        linhas_texto(.0)
    )]
    TipoBeneficiarioInvalido(Vec<usize>),

    #[error("Existem e-mails duplicados dentro do próprio arquivo nas linhas: {}", linhas_texto(.0))]
    EmailsDuplicados(Vec<usize>),

    #[error("Existem e-mails que já estão cadastrados: {}", .0.join(", "))]
    EmailsJaCadastrados(Vec<String>),

    #[error("Existem projetos com códigos inválidos ou inexistentes nas linhas: {}", linhas_texto(.0))]
    ProjetosDesconhecidos(Vec<usize>),
}

/// Run the content checks over the parsed rows.
///
/// `emails_existentes` and `codigos_validos` are snapshots of the people and
/// project collections (e-mails lowercased). On success the rows are safe to
/// insert as a batch.
pub fn validar_convites(
    linhas: &[LinhaConvite],
    emails_existentes: &HashSet<String>,
    codigos_validos: &HashSet<String>,
) -> Result<(), FalhaConviteMassa> {
    if linhas.is_empty() {
        return Err(FalhaConviteMassa::Vazia);
    }

    let invalidos: Vec<usize> = linhas
        .iter()
        .filter(|l| !validar_email(&l.e_mail))
        .map(|l| l.numero)
        .collect();
    if !invalidos.is_empty() {
        return Err(FalhaConviteMassa::EmailsInvalidos(invalidos));
    }

    let tipos_invalidos: Vec<usize> = linhas
        .iter()
        .filter(|l| normalizar_tipo_beneficiario(&l.tipo_beneficiario).is_none())
        .map(|l| l.numero)
        .collect();
    if !tipos_invalidos.is_empty() {
        return Err(FalhaConviteMassa::TipoBeneficiarioInvalido(tipos_invalidos));
    }

    // In-file duplicates: report every row involved, not just the repeats.
    let mut por_email: HashMap<String, Vec<usize>> = HashMap::new();
    for linha in linhas {
        por_email
            .entry(linha.e_mail.trim().to_lowercase())
            .or_default()
            .push(linha.numero);
    }
    let mut duplicados: Vec<usize> = por_email
        .values()
        .filter(|numeros| numeros.len() > 1)
        .flatten()
        .copied()
        .collect();
    if !duplicados.is_empty() {
        duplicados.sort_unstable();
        return Err(FalhaConviteMassa::EmailsDuplicados(duplicados));
    }

    let ja_cadastrados: Vec<String> = linhas
        .iter()
        .filter(|l| emails_existentes.contains(&l.e_mail.trim().to_lowercase()))
        .map(|l| l.e_mail.trim().to_string())
        .collect();
    if !ja_cadastrados.is_empty() {
        return Err(FalhaConviteMassa::EmailsJaCadastrados(ja_cadastrados));
    }

    let projetos_invalidos: Vec<usize> = linhas
        .iter()
        .filter(|l| l.projetos.iter().any(|c| !codigos_validos.contains(c)))
        .map(|l| l.numero)
        .collect();
    if !projetos_invalidos.is_empty() {
        return Err(FalhaConviteMassa::ProjetosDesconhecidos(projetos_invalidos));
    }

    Ok(())
}

impl From<FalhaConviteMassa> for crate::error::CoreError {
    fn from(falha: FalhaConviteMassa) -> Self {
        use crate::error::CoreError;
        let mensagem = falha.to_string();
        match falha {
            FalhaConviteMassa::Vazia | FalhaConviteMassa::ColunasFaltando(_) => {
                CoreError::UpstreamData(mensagem)
            }
            FalhaConviteMassa::EmailsDuplicados(_)
            | FalhaConviteMassa::EmailsJaCadastrados(_) => CoreError::Duplicate(mensagem),
            FalhaConviteMassa::EmailsInvalidos(_)
            | FalhaConviteMassa::TipoBeneficiarioInvalido(_)
            | FalhaConviteMassa::ProjetosDesconhecidos(_) => CoreError::InvalidFormat(mensagem),
        }
    }
}

/// Split a comma-separated `projetos` cell into trimmed, non-empty codes.
pub fn parse_projetos(celula: &str) -> Vec<String> {
    celula
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linha(numero: usize, e_mail: &str, tipo: &str, projetos: &[&str]) -> LinhaConvite {
        LinhaConvite {
            numero,
            nome_completo: format!("Pessoa {numero}"),
            e_mail: e_mail.to_string(),
            tipo_beneficiario: tipo.to_string(),
            telefone: None,
            projetos: projetos.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn sem_contexto() -> (HashSet<String>, HashSet<String>) {
        (HashSet::new(), HashSet::new())
    }

    #[test]
    fn arquivo_vazio_rejeitado() {
        let (existentes, codigos) = sem_contexto();
        assert_eq!(
            validar_convites(&[], &existentes, &codigos),
            Err(FalhaConviteMassa::Vazia)
        );
    }

    #[test]
    fn email_invalido_lista_exatamente_a_linha_ofensora() {
        let (existentes, codigos) = sem_contexto();
        let linhas = vec![
            linha(1, "ok@x.org", "técnico", &[]),
            linha(2, "quebrado.sem.arroba", "técnico", &[]),
            linha(3, "tambem-ok@x.org", "financeiro", &[]),
        ];

        assert_eq!(
            validar_convites(&linhas, &existentes, &codigos),
            Err(FalhaConviteMassa::EmailsInvalidos(vec![2]))
        );
    }

    #[test]
    fn tipo_beneficiario_em_branco_ou_fora_do_conjunto() {
        let (existentes, codigos) = sem_contexto();
        let linhas = vec![
            linha(1, "a@x.org", "", &[]),
            linha(2, "b@x.org", "juridico", &[]),
            linha(3, "c@x.org", "financeiro", &[]),
        ];

        assert_eq!(
            validar_convites(&linhas, &existentes, &codigos),
            Err(FalhaConviteMassa::TipoBeneficiarioInvalido(vec![1, 2]))
        );
    }

    #[test]
    fn duplicados_no_arquivo_reportam_todas_as_linhas() {
        let (existentes, codigos) = sem_contexto();
        let linhas = vec![
            linha(1, "dup@x.org", "técnico", &[]),
            linha(2, "outra@x.org", "técnico", &[]),
            linha(3, "DUP@x.org", "financeiro", &[]),
        ];

        assert_eq!(
            validar_convites(&linhas, &existentes, &codigos),
            Err(FalhaConviteMassa::EmailsDuplicados(vec![1, 3]))
        );
    }

    #[test]
    fn email_ja_cadastrado_aborta() {
        let mut existentes = HashSet::new();
        existentes.insert("ana@x.org".to_string());
        let codigos = HashSet::new();

        let linhas = vec![linha(1, "Ana@x.org", "técnico", &[])];
        assert_eq!(
            validar_convites(&linhas, &existentes, &codigos),
            Err(FalhaConviteMassa::EmailsJaCadastrados(vec![
                "Ana@x.org".to_string()
            ]))
        );
    }

    #[test]
    fn projeto_desconhecido_aborta() {
        let existentes = HashSet::new();
        let mut codigos = HashSet::new();
        codigos.insert("P1".to_string());

        let linhas = vec![
            linha(1, "a@x.org", "técnico", &["P1"]),
            linha(2, "b@x.org", "técnico", &["P1", "P9"]),
        ];
        assert_eq!(
            validar_convites(&linhas, &existentes, &codigos),
            Err(FalhaConviteMassa::ProjetosDesconhecidos(vec![2]))
        );
    }

    #[test]
    fn lote_valido_passa() {
        let existentes = HashSet::new();
        let mut codigos = HashSet::new();
        codigos.insert("P1".to_string());

        let linhas = vec![
            linha(1, "a@x.org", "técnico", &["P1"]),
            linha(2, "b@x.org", "financeiro", &[]),
        ];
        assert_eq!(validar_convites(&linhas, &existentes, &codigos), Ok(()));
    }

    #[test]
    fn parse_projetos_ignora_vazios() {
        assert_eq!(parse_projetos("P1, P2,,  P3 "), vec!["P1", "P2", "P3"]);
        assert!(parse_projetos("").is_empty());
        assert!(parse_projetos("  ,  ").is_empty());
    }

    #[test]
    fn cabecalhos_longos_sao_normalizados() {
        assert_eq!(
            normalizar_cabecalho("tipo_beneficiario (técnico ou financeiro)"),
            COLUNA_TIPO_BENEFICIARIO
        );
        assert_eq!(
            normalizar_cabecalho("projetos (códigos separados por vírgula) (opcional)"),
            COLUNA_PROJETOS
        );
        assert_eq!(normalizar_cabecalho("telefone (opcional)"), COLUNA_TELEFONE);
        assert_eq!(normalizar_cabecalho("nome_completo"), COLUNA_NOME);
    }
}
