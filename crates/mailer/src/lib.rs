//! Outbound e-mail delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport to send the platform's
//! HTML messages: invitation codes and password-verification codes.
//! Configuration is loaded from environment variables; if `SMTP_HOST` is not
//! set, [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for e-mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@selecao.local";

/// Default sender display name.
const DEFAULT_FROM_NAME: &str = "Plataforma de Seleção de Projetos";

/// Default platform URL referenced in the invitation body.
const DEFAULT_PLATAFORMA_URL: &str = "https://selecao.example.org";

/// Configuration for the SMTP delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Display name used in the "From" header.
    pub from_name: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Use implicit TLS (port-465 style) instead of STARTTLS.
    pub implicit_tls: bool,
    /// Public URL of the platform, linked from invitation messages.
    pub plataforma_url: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that e-mail
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable            | Required | Default                              |
    /// |---------------------|----------|--------------------------------------|
    /// | `SMTP_HOST`         | yes      | —                                    |
    /// | `SMTP_PORT`         | no       | `587`                                |
    /// | `SMTP_FROM`         | no       | `noreply@selecao.local`              |
    /// | `SMTP_FROM_NAME`    | no       | `Plataforma de Seleção de Projetos`  |
    /// | `SMTP_USER`         | no       | —                                    |
    /// | `SMTP_PASSWORD`     | no       | —                                    |
    /// | `SMTP_IMPLICIT_TLS` | no       | `false` (STARTTLS)                   |
    /// | `PLATAFORMA_URL`    | no       | `https://selecao.example.org`        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            from_name: std::env::var("SMTP_FROM_NAME")
                .unwrap_or_else(|_| DEFAULT_FROM_NAME.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            implicit_tls: std::env::var("SMTP_IMPLICIT_TLS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            plataforma_url: std::env::var("PLATAFORMA_URL")
                .unwrap_or_else(|_| DEFAULT_PLATAFORMA_URL.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends the platform's transactional e-mails via SMTP.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the invitation message with the person's 6-digit first-access code.
    pub async fn enviar_convite(
        &self,
        nome_completo: &str,
        to_email: &str,
        codigo: &str,
    ) -> Result<(), EmailError> {
        let assunto = "Convite para a Plataforma de Seleção de Projetos";
        let corpo = format!(
            "<p>Olá {nome_completo},</p>\
             <p>Você foi convidado(a) para utilizar a <strong>Plataforma de Seleção de \
             Projetos</strong>.</p>\
             <p>Para realizar seu cadastro, acesse o link abaixo e clique no botão \
             <strong>\"Primeiro acesso\"</strong>:</p>\
             <p><a href=\"{url}\">Acesse aqui a Plataforma</a></p>\
             <p>Insira o seu <strong>e-mail</strong> e o <strong>código</strong> que te \
             enviamos abaixo:</p>\
             <h2>{codigo}</h2>\
             <p>Se tiver alguma dúvida, entre em contato com a equipe da plataforma.</p>",
            url = self.config.plataforma_url,
        );
        self.send_html(to_email, assunto, corpo).await
    }

    /// Send the password-recovery message with its 3-digit verification code.
    pub async fn enviar_codigo_verificacao(
        &self,
        to_email: &str,
        codigo: &str,
    ) -> Result<(), EmailError> {
        let assunto = format!("Código de Verificação - Seleção de Projetos: {codigo}");
        let corpo = format!(
            "<p style='font-size: 1.5em;'>\
             Seu código para redefinição é: <strong>{codigo}</strong>\
             </p>"
        );
        self.send_html(to_email, &assunto, corpo).await
    }

    async fn send_html(
        &self,
        to_email: &str,
        assunto: &str,
        corpo_html: String,
    ) -> Result<(), EmailError> {
        let from = Mailbox::new(
            Some(self.config.from_name.clone()),
            self.config.from_address.parse()?,
        );

        let email = Message::builder()
            .from(from)
            .to(to_email.parse()?)
            .subject(assunto)
            .header(ContentType::TEXT_HTML)
            .body(corpo_html)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder = if self.config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
        };

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, assunto, "E-mail enviado");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
