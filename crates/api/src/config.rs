use crate::auth::jwt::JwtConfig;

/// Server configuration, read once at startup.
///
/// Every field has a development-friendly default; production deployments
/// override them through the environment.
///
/// | Env Var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `3000`                  |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
/// | `RESET_CODE_TTL_SECS`  | `900`                   |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins (comma-separated in `CORS_ORIGINS`).
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long a password-recovery code stays valid.
    pub reset_code_ttl_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load the configuration from the environment.
    ///
    /// Panics on unparseable values; a misconfigured server must not come up.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|origem| !origem.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            reset_code_ttl_secs: env_parse("RESET_CODE_TTL_SECS", 900),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or(nome: &str, padrao: &str) -> String {
    std::env::var(nome).unwrap_or_else(|_| padrao.to_string())
}

fn env_parse<T: std::str::FromStr>(nome: &str, padrao: T) -> T {
    match std::env::var(nome) {
        Ok(valor) => valor
            .parse()
            .unwrap_or_else(|_| panic!("{nome} deve ser um valor numérico válido")),
        Err(_) => padrao,
    }
}
