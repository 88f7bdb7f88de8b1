//! E-mail address syntax validation.

use std::sync::OnceLock;

use regex::Regex;

/// Basic `local@domain.tld` shape. Intentionally permissive; deliverability
/// is only proven by the invitation e-mail itself.
const EMAIL_PATTERN: &str = r"^[\w\.\-]+@[\w\.\-]+\.\w+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("e-mail pattern is valid"))
}

/// Whether `email` (after trimming) matches the accepted syntax.
pub fn validar_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aceita_enderecos_comuns() {
        assert!(validar_email("ana@x.org"));
        assert!(validar_email("joao.silva@exemplo.com.br"));
        assert!(validar_email("  maria-souza@ong.net  "));
    }

    #[test]
    fn rejeita_enderecos_malformados() {
        assert!(!validar_email(""));
        assert!(!validar_email("sem-arroba.com"));
        assert!(!validar_email("duplo@@x.org"));
        assert!(!validar_email("sem-tld@dominio"));
        assert!(!validar_email("com espaco@x.org"));
    }
}
