//! One-time numeric codes sent by e-mail.
//!
//! The invitation flow uses 6-digit codes; the password-recovery flow uses
//! 3-digit codes (100-999). The asymmetry is inherited behavior and is kept
//! until the security level is revisited with the product owner.

use rand::Rng;

/// A 6-digit invitation code, zero-padded (`"042137"`).
pub fn gerar_codigo_convite() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..=999_999))
}

/// A 3-digit verification code for password recovery (`"100"`-`"999"`).
pub fn gerar_codigo_verificacao() -> String {
    let mut rng = rand::rng();
    rng.random_range(100..=999).to_string()
}
