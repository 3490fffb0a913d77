//! Gemini transport for the narrative advisor.

use super::{parse_advisor_response, AdvisorInsights, AdvisorRequest, NarrativeAdvisor};
use crate::{
    config::AdvisorSettings,
    error::{AnalysisError, AnalysisResult},
};
use serde_json::{json, Value};

pub struct GeminiAdvisor {
    client:   reqwest::blocking::Client,
    endpoint: String,
    model:    String,
    api_key:  String,
}

impl GeminiAdvisor {
    pub fn new(settings: &AdvisorSettings, api_key: String) -> AnalysisResult<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    /// Build from settings, reading the key from the environment.
    /// Returns None when no key is configured.
    pub fn from_settings(settings: &AdvisorSettings) -> AnalysisResult<Option<Self>> {
        match settings.api_key() {
            Some(key) => Ok(Some(Self::new(settings, key)?)),
            None => {
                log::warn!(
                    "advisor: {} not set, AI features are disabled",
                    settings.api_key_env
                );
                Ok(None)
            }
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

impl NarrativeAdvisor for GeminiAdvisor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn summarize(&self, request: &AdvisorRequest) -> AnalysisResult<AdvisorInsights> {
        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt()? }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        log::debug!("advisor: POST {} (model {})", self.url(), self.model);
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|e| {
                log::debug!("advisor: could not read {status} response body: {e}");
                String::new()
            });
            if body.contains("API key not valid") {
                return Err(AnalysisError::AdvisorUnavailable {
                    reason: "API key not valid, check the configured API key variable".into(),
                });
            }
            return Err(AnalysisError::AdvisorRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json()?;
        parse_advisor_response(&response_text(&payload))
    }
}

/// Concatenate the text parts of the first candidate.
/// Missing structure yields "", which parses as an empty response.
fn response_text(payload: &Value) -> String {
    payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_candidate_parts() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"overall" }, { "text": "Summary\":\"ok\"}" }] } }]
        });
        assert_eq!(response_text(&payload), "{\"overallSummary\":\"ok\"}");
    }

    #[test]
    fn response_text_without_candidates_is_empty() {
        assert_eq!(response_text(&json!({ "promptFeedback": {} })), "");
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let settings = AdvisorSettings {
            endpoint: "https://example.test/v1beta/models/".into(),
            model: "gemini-test".into(),
            ..AdvisorSettings::default()
        };
        let advisor = GeminiAdvisor::new(&settings, "key".into()).unwrap();
        assert_eq!(advisor.url(), "https://example.test/v1beta/models/gemini-test:generateContent");
    }
}
