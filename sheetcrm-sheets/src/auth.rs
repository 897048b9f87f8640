//! Google service-account authentication
//!
//! Implements the OAuth 2.0 JWT bearer grant: a short-lived RS256 assertion
//! signed with the service account's private key is exchanged at the key's
//! `token_uri` for an access token. The token is reused until shortly before
//! it expires.

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{SheetsError, SheetsResult};

/// Read-only Sheets scope.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

// ============================================================================
// SERVICE ACCOUNT KEY
// ============================================================================

#[derive(Deserialize)]
struct RawServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// The parts of a Google service-account JSON key used for signing.
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
    private_key: SecretString,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> SheetsResult<Self> {
        let raw: RawServiceAccountKey =
            serde_json::from_str(json).map_err(|e| SheetsError::Credentials {
                reason: format!("malformed service account key: {}", e),
            })?;

        Ok(Self {
            client_email: raw.client_email,
            private_key_id: raw.private_key_id,
            token_uri: raw
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            private_key: SecretString::new(raw.private_key.into()),
        })
    }

    pub fn from_file(path: &Path) -> SheetsResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| SheetsError::Credentials {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    fn encoding_key(&self) -> SheetsResult<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes()).map_err(|e| {
            SheetsError::Credentials {
                reason: format!("invalid private key: {}", e),
            }
        })
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// ASSERTION AND TOKEN EXCHANGE
// ============================================================================

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub(crate) fn new(key: &ServiceAccountKey, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: SHEETS_READONLY_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct AccessToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - TimeDelta::seconds(REFRESH_MARGIN_SECS) > now
    }
}

/// Issues bearer tokens for a service account.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: Client,
    token: Mutex<Option<AccessToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, http: Client) -> SheetsResult<Self> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            key,
            encoding_key,
            http,
            token: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A valid access token, exchanging a fresh assertion when needed.
    pub async fn access_token(&self) -> SheetsResult<String> {
        let mut slot = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = slot.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.expose_secret().to_string());
        }

        let fresh = self.exchange(now).await?;
        let value = fresh.value.expose_secret().to_string();
        *slot = Some(fresh);
        Ok(value)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> SheetsResult<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let claims = AssertionClaims::new(&self.key, now);

        encode(&header, &claims, &self.encoding_key).map_err(|e| SheetsError::Auth {
            reason: format!("failed to sign assertion: {}", e),
        })
    }

    async fn exchange(&self, now: DateTime<Utc>) -> SheetsResult<AccessToken> {
        let assertion = self.sign_assertion(now)?;
        tracing::debug!(client_email = %self.key.client_email, "Requesting access token");

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SheetsError::Auth {
                reason: format!("token request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SheetsError::Auth {
                reason: format!("token endpoint returned {}: {}", status.as_u16(), body),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| SheetsError::Auth {
            reason: format!("malformed token response: {}", e),
        })?;

        Ok(AccessToken {
            value: SecretString::new(token.access_token.into()),
            expires_at: now + TimeDelta::seconds(token.expires_in),
        })
    }
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish()
    }
}
