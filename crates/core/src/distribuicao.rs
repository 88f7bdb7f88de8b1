//! Tallies of reviewer/project assignments for one review stage.
//!
//! Pure functions over an in-memory snapshot of the saved assignments. The
//! scoreboards are recomputed on every request from committed rows, so they
//! always reflect the last saved state.

use std::collections::BTreeMap;

/// One reviewer's saved assignment within a stage.
#[derive(Debug, Clone)]
pub struct AtribuicaoStage {
    /// Reviewer display name.
    pub avaliador: String,
    /// Receipt codes of the projects this reviewer must evaluate.
    pub projetos: Vec<String>,
}

/// Reviewer count per project.
///
/// Every known project of the call starts at zero, so projects nobody picked
/// still show up on the scoreboard.
pub fn tally_por_projeto(
    projetos_do_edital: &[String],
    atribuicoes: &[AtribuicaoStage],
) -> BTreeMap<String, usize> {
    let mut contagem: BTreeMap<String, usize> = projetos_do_edital
        .iter()
        .map(|codigo| (codigo.clone(), 0))
        .collect();

    for atribuicao in atribuicoes {
        for codigo in &atribuicao.projetos {
            if let Some(total) = contagem.get_mut(codigo) {
                *total += 1;
            }
        }
    }

    contagem
}

/// Project count per reviewer, sorted descending by count (name ascending on
/// ties) for display.
pub fn tally_por_avaliador(atribuicoes: &[AtribuicaoStage]) -> Vec<(String, usize)> {
    let mut totais: Vec<(String, usize)> = atribuicoes
        .iter()
        .map(|a| (a.avaliador.clone(), a.projetos.len()))
        .collect();

    totais.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totais
}
