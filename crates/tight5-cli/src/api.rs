//! Tight 5 API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Tight 5
pub struct Tight5Client {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JokeResponse {
    pub id: Uuid,
    pub title: String,
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub estimated_time: u32,
    pub energy: String,
    #[serde(rename = "type")]
    pub joke_type: String,
    pub status: String,
    pub performance_rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineResponse {
    pub id: Uuid,
    pub name: String,
    pub joke_ids: Vec<Uuid>,
    pub target_time: u32,
    pub formatted_time: String,
    pub time_status: TimeStatus,
    pub flow_score: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStatus {
    pub percent: f64,
    pub over_time: bool,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
    pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct StructureCatalog {
    pub categories: Vec<StructureCategory>,
    pub structures: Vec<StructureTemplate>,
}

#[derive(Debug, Deserialize)]
pub struct StructureCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StructureTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJokeRequest {
    pub title: String,
    pub setup: String,
    pub punchline: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub content: &'a str,
}

/// Filters for `jokes list`
#[derive(Debug, Default)]
pub struct JokeQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl JokeQuery {
    /// Query string including the leading `?`, or empty
    pub fn to_query_string(&self) -> String {
        let params: Vec<String> = [
            ("status", &self.status),
            ("search", &self.search),
            ("sort", &self.sort),
            ("direction", &self.direction),
        ]
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

impl Tight5Client {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Check that the stored key is accepted
    pub async fn verify_key(&self) -> Result<()> {
        let _: Vec<RoutineResponse> = self.send(self.client.get(self.url("/api/routines"))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        };

        let resp = request
            .send()
            .await
            .context("Failed to connect to Tight 5 API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// List jokes
    pub async fn list_jokes(&self, query: &JokeQuery) -> Result<Vec<JokeResponse>> {
        let url = self.url(&format!("/api/jokes{}", query.to_query_string()));
        self.send(self.client.get(&url)).await
    }

    /// Create a joke
    pub async fn create_joke(&self, request: &CreateJokeRequest) -> Result<JokeResponse> {
        self.send(self.client.post(self.url("/api/jokes")).json(request))
            .await
    }

    /// List routines
    pub async fn list_routines(&self) -> Result<Vec<RoutineResponse>> {
        self.send(self.client.get(self.url("/api/routines"))).await
    }

    /// Ask the assistant for setups or punchlines
    pub async fn generate(&self, kind: &str, content: &str) -> Result<SuggestionsResponse> {
        let request = GenerateRequest { kind, content };
        self.send(
            self.client
                .post(self.url("/api/joke/generate"))
                .json(&request),
        )
        .await
    }

    /// Structure catalog, optionally for one category
    pub async fn list_structures(&self, category: Option<&str>) -> Result<StructureCatalog> {
        let url = match category {
            Some(c) => self.url(&format!("/api/structures?category={}", urlencoding::encode(c))),
            None => self.url("/api/structures"),
        };
        self.send(self.client.get(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_encodes_values() {
        let query = JokeQuery {
            status: Some("draft,working".to_string()),
            search: Some("my cat".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string(),
            "?status=draft%2Cworking&search=my%20cat"
        );
        assert_eq!(JokeQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_generate_request_shape() {
        let json = serde_json::to_value(GenerateRequest {
            kind: "punchline",
            content: "My cat judges me",
        })
        .unwrap();
        assert_eq!(json["type"], "punchline");
        assert_eq!(json["content"], "My cat judges me");
    }
}
