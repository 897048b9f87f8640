//! Google Sheets v4 client
//!
//! Reads a cell range with `spreadsheets.values.get`. Values are requested
//! row-major and formatted, so cells arrive as the strings a user sees.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sheetcrm_core::SheetRow;

use crate::auth::{ServiceAccountAuth, ServiceAccountKey};
use crate::config::{Credentials, SheetsConfig};
use crate::error::{SheetsError, SheetsResult};
use crate::SpreadsheetClient;

/// Body of a `values.get` response. `values` is omitted for empty ranges.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<SheetRow>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

enum SheetsAuth {
    ServiceAccount(Box<ServiceAccountAuth>),
    ApiKey(SecretString),
}

/// Spreadsheet client backed by the Google Sheets REST API.
pub struct GoogleSheetsClient {
    http: Client,
    base_url: String,
    auth: SheetsAuth,
}

impl GoogleSheetsClient {
    /// Build a client, loading and checking credentials up front so that a bad
    /// key fails at startup rather than on the first lookup.
    pub fn from_config(config: &SheetsConfig) -> SheetsResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SheetsError::Transport {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        let auth = match &config.credentials {
            Credentials::ServiceAccount { path } => {
                let key = ServiceAccountKey::from_file(path)?;
                let auth = ServiceAccountAuth::new(key, http.clone())?;
                tracing::info!(client_email = auth.client_email(), "Using service account credentials");
                SheetsAuth::ServiceAccount(Box::new(auth))
            }
            Credentials::ApiKey(key) => {
                tracing::info!("Using API key credentials");
                SheetsAuth::ApiKey(key.clone())
            }
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// URL of the `values.get` call for `range` in `spreadsheet_id`.
    pub fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> SheetsResult<RequestBuilder> {
        match &self.auth {
            SheetsAuth::ServiceAccount(auth) => {
                let token = auth.access_token().await?;
                Ok(request.bearer_auth(token))
            }
            SheetsAuth::ApiKey(key) => Ok(request.query(&[("key", key.expose_secret())])),
        }
    }

    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> SheetsResult<ValueRange> {
        let request = self
            .http
            .get(self.values_url(spreadsheet_id, range))
            .query(&[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "FORMATTED_VALUE"),
            ]);
        let response = self.authorize(request).await?.send().await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<ValueRange>().await.map_err(|e| {
                SheetsError::InvalidResponse {
                    reason: format!("Failed to parse value range: {}", e),
                }
            });
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<GoogleErrorBody>(&error_text) {
            Ok(body) => body.error.message,
            Err(_) => error_text,
        };
        Err(SheetsError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SpreadsheetClient for GoogleSheetsClient {
    async fn fetch(&self, spreadsheet_id: &str, range: &str) -> SheetsResult<Vec<SheetRow>> {
        let value_range = self.get_values(spreadsheet_id, range).await?;
        tracing::debug!(
            spreadsheet_id,
            range = value_range.range.as_deref().unwrap_or(range),
            rows = value_range.values.len(),
            "Fetched value range"
        );
        Ok(value_range.values)
    }

    fn backend_name(&self) -> &str {
        "google-sheets"
    }
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth = match &self.auth {
            SheetsAuth::ServiceAccount(_) => "service_account",
            SheetsAuth::ApiKey(_) => "api_key",
        };
        f.debug_struct("GoogleSheetsClient")
            .field("base_url", &self.base_url)
            .field("auth", &auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    async fn values(
        Path((spreadsheet_id, range)): Path<(String, String)>,
        Query(query): Query<HashMap<String, String>>,
    ) -> axum::response::Response {
        if query.get("key").map(String::as_str) != Some("test-key") {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}})),
            )
                .into_response();
        }
        match spreadsheet_id.as_str() {
            "contacts" => Json(json!({
                "range": format!("Sheet1!{}", range),
                "majorDimension": query.get("majorDimension"),
                "values": [["Alice", "5551234567"], ["Bob", 5559876543u64]]
            }))
            .into_response(),
            "empty" => Json(json!({"range": range, "majorDimension": "ROWS"})).into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}})),
            )
                .into_response(),
        }
    }

    async fn spawn_backend() -> String {
        let app = Router::new().route("/v4/spreadsheets/:id/values/:range", get(values));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v4", addr)
    }

    fn client(base_url: &str, key: &str) -> GoogleSheetsClient {
        let config = SheetsConfig::new(Credentials::ApiKey(SecretString::new(key.into())))
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5));
        GoogleSheetsClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_values_url_encodes_segments() {
        let client = client("https://sheets.googleapis.com/v4/", "k");
        assert_eq!(
            client.values_url("abc", "My Sheet!A2:B"),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/My%20Sheet%21A2%3AB"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let client = client("https://sheets.googleapis.com/v4", "super-secret");
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[test]
    fn test_missing_key_file() {
        let config = SheetsConfig::new(Credentials::ServiceAccount {
            path: "/nonexistent/sheetcrm/key.json".into(),
        });
        let err = GoogleSheetsClient::from_config(&config).unwrap_err();
        assert!(matches!(err, SheetsError::Credentials { .. }));
    }

    #[tokio::test]
    async fn test_fetch_rows() {
        let base = spawn_backend().await;
        let rows = client(&base, "test-key").fetch("contacts", "A2:B").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_at(0).as_deref(), Some("Alice"));
        assert_eq!(rows[1].display_at(1).as_deref(), Some("5559876543"));
    }

    #[tokio::test]
    async fn test_fetch_empty_range() {
        let base = spawn_backend().await;
        let rows = client(&base, "test-key").fetch("empty", "A2:B").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let base = spawn_backend().await;
        let err = client(&base, "test-key")
            .fetch("missing", "A2:B")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err,
            SheetsError::Status {
                status: 404,
                message: "Requested entity was not found.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_rejected_key() {
        let base = spawn_backend().await;
        let err = client(&base, "wrong").fetch("contacts", "A2:B").await.unwrap_err();
        assert!(matches!(err, SheetsError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_backend() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/v4", addr), "test-key")
            .fetch("contacts", "A2:B")
            .await
            .unwrap_err();
        assert!(matches!(err, SheetsError::Transport { .. }));
    }
}
