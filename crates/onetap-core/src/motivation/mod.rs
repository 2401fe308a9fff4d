//! Motivation fetcher -- a short congratulation after a completed run.
//!
//! Fetchers never fail from the caller's point of view: whatever goes wrong,
//! the result is a locally generated fallback [`Motivation`]. Replies are
//! tagged with the [`RunId`] they were requested for; the controller decides
//! whether they are still wanted.

mod gemini;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ValidationError;
use crate::timer::RunId;

pub use gemini::{GeminiFetcher, GeminiSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Wire shape of a motivation: `{ "message": ..., "funFact": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motivation {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
}

impl Motivation {
    /// Returned when no API key is configured.
    pub fn missing_credentials(locale: Locale) -> Self {
        match locale {
            Locale::Sk => Self {
                message: "Skvelá práca!".into(),
                fun_fact: Some("Nezabudni na API kľúč pre lepšie hlášky.".into()),
            },
            Locale::En => Self {
                message: "Great job!".into(),
                fun_fact: Some("Don't forget the API key for better quotes.".into()),
            },
        }
    }

    /// Returned when the provider call failed for any other reason.
    pub fn fallback(locale: Locale) -> Self {
        let message = match locale {
            Locale::Sk => "Hotovo! Skvelý výkon.",
            Locale::En => "Done! Great performance.",
        };
        Self {
            message: message.into(),
            fun_fact: None,
        }
    }
}

/// Language the message is requested in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Sk,
    En,
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sk" => Ok(Locale::Sk),
            "en" => Ok(Locale::En),
            other => Err(ValidationError::InvalidValue {
                field: "locale".into(),
                message: format!("unsupported locale '{other}', expected 'sk' or 'en'"),
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Sk => f.write_str("sk"),
            Locale::En => f.write_str("en"),
        }
    }
}

#[async_trait]
pub trait MotivationFetcher: Send + Sync {
    /// Produce a message for a finished `preset_name`. Never fails.
    async fn fetch(&self, preset_name: &str, locale: Locale) -> Motivation;
}

/// Fetcher that never leaves the machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

#[async_trait]
impl MotivationFetcher for OfflineFetcher {
    async fn fetch(&self, _preset_name: &str, locale: Locale) -> Motivation {
        Motivation::missing_credentials(locale)
    }
}

/// What the controller wants fetched, and for which run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotivationRequest {
    pub run_id: RunId,
    pub preset_name: String,
    pub locale: Locale,
}

/// A fetched motivation, tagged with the run it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotivationReply {
    pub run_id: RunId,
    pub motivation: Motivation,
}

/// Run `request` on the current tokio runtime and post the reply to `replies`.
///
/// Fire-and-forget: nothing cancels the task, and a closed channel just means
/// nobody is listening any more.
pub fn spawn_fetch(
    fetcher: Arc<dyn MotivationFetcher>,
    request: MotivationRequest,
    replies: UnboundedSender<MotivationReply>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let motivation = fetcher.fetch(&request.preset_name, request.locale).await;
        let reply = MotivationReply {
            run_id: request.run_id,
            motivation,
        };
        if replies.send(reply).is_err() {
            debug!(run = %request.run_id, "motivation reply dropped, receiver closed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("SK".parse::<Locale>().unwrap(), Locale::Sk);
        assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn motivation_uses_camel_case_fun_fact() {
        let m: Motivation =
            serde_json::from_str(r#"{"message":"Nice","funFact":"Clocks tick."}"#).unwrap();
        assert_eq!(m.fun_fact.as_deref(), Some("Clocks tick."));

        let json = serde_json::to_string(&Motivation::fallback(Locale::En)).unwrap();
        assert_eq!(json, r#"{"message":"Done! Great performance."}"#);
    }

    #[tokio::test]
    async fn spawn_fetch_tags_reply_with_run() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let request = MotivationRequest {
            run_id: RunId(7),
            preset_name: "Nap".into(),
            locale: Locale::En,
        };
        spawn_fetch(Arc::new(OfflineFetcher), request, tx)
            .await
            .unwrap();
        let reply = rx.recv().await.unwrap();
        assert_eq!(reply.run_id, RunId(7));
        assert_eq!(reply.motivation.message, "Great job!");
    }

    #[tokio::test]
    async fn spawn_fetch_tolerates_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let request = MotivationRequest {
            run_id: RunId(1),
            preset_name: "Nap".into(),
            locale: Locale::Sk,
        };
        assert!(spawn_fetch(Arc::new(OfflineFetcher), request, tx)
            .await
            .is_ok());
    }
}
