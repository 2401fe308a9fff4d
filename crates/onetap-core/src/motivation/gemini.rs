//! Gemini integration -- ask the model for a congratulation and a fun fact.

use std::time::Duration;

use async_trait::async_trait;
use indoc::formatdoc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use super::{Locale, Motivation, MotivationFetcher};
use crate::error::MotivationError;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for [`GeminiFetcher`].
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    /// `None` or blank means every fetch resolves to the credentials fallback.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
            timeout: Duration::from_secs(15),
        }
    }
}

pub struct GeminiFetcher {
    client: Client,
    url: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiFetcher {
    /// Build a fetcher. Fails only on an unusable endpoint or HTTP client.
    pub fn new(settings: GeminiSettings) -> Result<Self, MotivationError> {
        let base = settings.endpoint.trim_end_matches('/');
        let url = Url::parse(&format!("{base}/models/{}:generateContent", settings.model))?;
        let client = Client::builder().timeout(settings.timeout).build()?;
        let api_key = settings.api_key.filter(|k| !k.trim().is_empty());
        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn prompt(preset_name: &str, locale: Locale) -> String {
        match locale {
            Locale::Sk => formatdoc! {"
                Užívateľ práve dokončil časovač na: \"{preset_name}\".
                Napíš krátku, vtipnú alebo motivujúcu gratuláciu a jeden náhodný
                zaujímavý fakt súvisiaci s časom alebo produktivitou.
            "},
            Locale::En => formatdoc! {"
                User just finished a timer for: \"{preset_name}\".
                Write a short, witty or motivational congratulation and one random
                fun fact related to time or productivity.
            "},
        }
    }

    fn request_body(preset_name: &str, locale: Locale) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": Self::prompt(preset_name, locale) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "message": { "type": "STRING" },
                        "funFact": { "type": "STRING" }
                    },
                    "required": ["message"]
                }
            }
        })
    }

    async fn try_fetch(
        &self,
        preset_name: &str,
        locale: Locale,
    ) -> Result<Motivation, MotivationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MotivationError::MissingCredentials)?;

        let resp = self
            .client
            .post(self.url.clone())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(preset_name, locale))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MotivationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(MotivationError::EmptyResponse)?;

        let mut motivation: Motivation = serde_json::from_str(&text)?;
        if motivation.message.trim().is_empty() {
            return Err(MotivationError::EmptyMessage);
        }
        motivation.fun_fact = motivation.fun_fact.filter(|f| !f.trim().is_empty());
        Ok(motivation)
    }
}

#[async_trait]
impl MotivationFetcher for GeminiFetcher {
    async fn fetch(&self, preset_name: &str, locale: Locale) -> Motivation {
        match self.try_fetch(preset_name, locale).await {
            Ok(motivation) => motivation,
            Err(MotivationError::MissingCredentials) => {
                debug!("no Gemini API key, using canned motivation");
                Motivation::missing_credentials(locale)
            }
            Err(e) => {
                warn!(error = %e, "Gemini request failed, using fallback motivation");
                Motivation::fallback(locale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_endpoint_and_model() {
        let fetcher = GeminiFetcher::new(GeminiSettings {
            endpoint: "http://localhost:1234/v1beta/".into(),
            ..GeminiSettings::default()
        })
        .unwrap();
        assert_eq!(
            fetcher.url().as_str(),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn rejects_relative_endpoint() {
        let result = GeminiFetcher::new(GeminiSettings {
            endpoint: "not a url".into(),
            ..GeminiSettings::default()
        });
        assert!(matches!(result, Err(MotivationError::InvalidEndpoint(_))));
    }

    #[test]
    fn prompt_mentions_preset_in_both_locales() {
        assert!(GeminiFetcher::prompt("Nap", Locale::Sk).contains("\"Nap\""));
        assert!(GeminiFetcher::prompt("Nap", Locale::En).contains("\"Nap\""));
    }

    #[test]
    fn request_body_requires_message() {
        let body = GeminiFetcher::request_body("Nap", Locale::En);
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["message"])
        );
    }

    #[tokio::test]
    async fn blank_key_means_missing_credentials() {
        let fetcher = GeminiFetcher::new(GeminiSettings {
            api_key: Some("   ".into()),
            ..GeminiSettings::default()
        })
        .unwrap();
        let m = fetcher.fetch("Nap", Locale::Sk).await;
        assert_eq!(m, Motivation::missing_credentials(Locale::Sk));
    }
}
