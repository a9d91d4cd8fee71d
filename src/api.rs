use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use crate::feedback::FeedbackPayload;
use crate::models::{Feedback, Report, Role};

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// Thin wrapper over the remote REST API. Every request carries the bearer
/// token when one is present; without a token the header is omitted and the
/// remote side reports any authorization failure. No retries, no caching.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        ApiClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> anyhow::Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .context("request failed to reach the API")?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("API returned {}: {}", status, error_message(&body))
    }

    pub async fn login(&self, email: &str) -> anyhow::Result<LoginResponse> {
        let response = self
            .send(
                self.request(Method::POST, "/auth/login")
                    .json(&json!({ "email": email })),
            )
            .await?;
        response
            .json()
            .await
            .context("failed to decode login response")
    }

    pub async fn reports(&self) -> anyhow::Result<Vec<Report>> {
        let response = self.send(self.request(Method::GET, "/reports")).await?;
        response.json().await.context("failed to decode reports")
    }

    pub async fn feedback(&self, report_id: &str) -> anyhow::Result<Vec<Feedback>> {
        let response = self
            .send(
                self.request(Method::GET, "/feedback")
                    .query(&[("reportId", report_id)]),
            )
            .await?;
        response.json().await.context("failed to decode feedback")
    }

    pub async fn submit_feedback(
        &self,
        report_id: &str,
        payload: &FeedbackPayload,
    ) -> anyhow::Result<()> {
        self.send(self.request(Method::POST, "/feedback").json(&json!({
            "reportId": report_id,
            "userComment": payload.user_comment,
            "flaggedSection": payload.flagged_section,
        })))
        .await?;
        Ok(())
    }

    pub async fn add_user(&self, email: &str, role: Role) -> anyhow::Result<()> {
        self.send(self.request(Method::POST, "/admin/add-user").json(&json!({
            "email": email,
            "role": role.as_str(),
        })))
        .await?;
        Ok(())
    }
}

/// Pulls the structured `{error}` message out of an error response body,
/// falling back to the raw body.
pub fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}
