//! Read-only Google Sheets client for the submission-intake spreadsheets.
//!
//! Each call (edital) may link one spreadsheet whose rows carry the receipt
//! codes of submitted projects. [`SheetsClient`] authenticates with a
//! service-account key (RS256 JWT assertion exchanged for an OAuth access
//! token) and fetches the sheet's cell values. Header handling is a pure
//! function ([`coluna`]) so the parsing rules are testable offline.

use serde::Deserialize;

/// OAuth scope for read-only spreadsheet access.
const SCOPE_READONLY: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Cell range fetched from the first sheet (header row + data rows).
const RANGE: &str = "A1:Z";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for spreadsheet access failures.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// The service-account key file could not be read or parsed.
    #[error("Service account key error: {0}")]
    Key(String),

    /// The token exchange was rejected or returned an unexpected payload.
    #[error("Token exchange error: {0}")]
    Token(String),

    /// HTTP-level failure talking to the Google APIs.
    #[error("Sheets HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sheet has no data rows.
    #[error("A planilha está vazia")]
    PlanilhaVazia,

    /// The header row lacks a required column.
    #[error("Coluna obrigatória ausente na planilha: {0}")]
    ColunaAusente(String),
}

// ---------------------------------------------------------------------------
// Service account key
// ---------------------------------------------------------------------------

/// The subset of a Google service-account JSON key the client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Load and parse a service-account key file.
    pub fn from_file(path: &str) -> Result<Self, SheetsError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SheetsError::Key(format!("Failed to read {path}: {e}")))?;
        serde_json::from_str(&contents)
            .map_err(|e| SheetsError::Key(format!("Failed to parse {path}: {e}")))
    }
}

/// Configuration for the sheets client.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Path to the service-account JSON key file.
    pub credentials_path: String,
}

impl SheetsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `GOOGLE_SERVICE_ACCOUNT_FILE` is not set, signalling
    /// that spreadsheet import is not configured.
    pub fn from_env() -> Option<Self> {
        let credentials_path = std::env::var("GOOGLE_SERVICE_ACCOUNT_FILE").ok()?;
        Some(Self { credentials_path })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

// ---------------------------------------------------------------------------
// SheetsClient
// ---------------------------------------------------------------------------

/// Client for one Google service account, shared across requests.
pub struct SheetsClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
}

impl SheetsClient {
    /// Create a client from a loaded service-account key.
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            http: reqwest::Client::new(),
            key,
        }
    }

    /// Load the key from `config` and build the client.
    pub fn from_config(config: &SheetsConfig) -> Result<Self, SheetsError> {
        Ok(Self::new(ServiceAccountKey::from_file(
            &config.credentials_path,
        )?))
    }

    /// Exchange an RS256 JWT assertion for a short-lived access token.
    async fn access_token(&self) -> Result<String, SheetsError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SCOPE_READONLY,
            aud: &self.key.token_uri,
            exp: now + 3600,
            iat: now,
        };

        let encoding_key = jsonwebtoken::EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| SheetsError::Key(format!("Invalid private key: {e}")))?;
        let assertion = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &encoding_key,
        )
        .map_err(|e| SheetsError::Token(format!("Failed to sign assertion: {e}")))?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Token(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the sheet's cell values as strings (first row is the header).
    pub async fn fetch_rows(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let token = self.access_token().await?;
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{spreadsheet_id}/values/{RANGE}"
        );

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let response = response.error_for_status()?;
        let values: ValuesResponse = response.json().await?;

        tracing::debug!(spreadsheet_id, rows = values.values.len(), "Planilha carregada");

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Extract one column from fetched rows by header name.
///
/// The first row is the header; matching is trimmed and case-insensitive.
/// Blank cells are dropped. Fails with [`SheetsError::PlanilhaVazia`] when
/// there are no data rows and [`SheetsError::ColunaAusente`] when the header
/// is missing.
pub fn coluna(rows: &[Vec<String>], nome: &str) -> Result<Vec<String>, SheetsError> {
    let Some((cabecalho, dados)) = rows.split_first() else {
        return Err(SheetsError::PlanilhaVazia);
    };
    if dados.is_empty() {
        return Err(SheetsError::PlanilhaVazia);
    }

    let indice = cabecalho
        .iter()
        .position(|c| c.trim().eq_ignore_ascii_case(nome))
        .ok_or_else(|| SheetsError::ColunaAusente(nome.to_string()))?;

    Ok(dados
        .iter()
        .filter_map(|linha| linha.get(indice))
        .map(|celula| celula.trim().to_string())
        .filter(|celula| !celula.is_empty())
        .collect())
}
