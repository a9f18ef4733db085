//! Design advice with fixed fallbacks.

use std::sync::Arc;

use roombrief_core::project::Project;

use crate::client::{GeminiClient, GenAiError, TextGenerator};
use crate::config::GenAiConfig;
use crate::prompt::{project_summary_prompt, style_suggestion_prompt};

pub const SUMMARY_UNAVAILABLE: &str = "AI summary is temporarily unavailable.";
pub const SUMMARY_EMPTY: &str = "Could not generate a summary.";
pub const STYLES_UNAVAILABLE: &str = "Style suggestions are temporarily unavailable.";
pub const STYLES_EMPTY: &str = "Could not provide suggestions.";

/// Messages returned instead of model text.
struct Fallbacks {
    unavailable: &'static str,
    empty: &'static str,
}

const SUMMARY_FALLBACKS: Fallbacks = Fallbacks {
    unavailable: SUMMARY_UNAVAILABLE,
    empty: SUMMARY_EMPTY,
};

const STYLE_FALLBACKS: Fallbacks = Fallbacks {
    unavailable: STYLES_UNAVAILABLE,
    empty: STYLES_EMPTY,
};

/// Produces design summaries and style suggestions. Never returns an error.
#[derive(Clone)]
pub struct Advisor {
    generator: Option<Arc<dyn TextGenerator>>,
    reply_language: String,
}

impl Advisor {
    pub fn new(generator: Arc<dyn TextGenerator>, reply_language: impl Into<String>) -> Self {
        Self {
            generator: Some(generator),
            reply_language: reply_language.into(),
        }
    }

    /// An advisor with no backend; every call returns the "unavailable" text.
    pub fn disabled(reply_language: impl Into<String>) -> Self {
        Self {
            generator: None,
            reply_language: reply_language.into(),
        }
    }

    /// Build a Gemini-backed advisor, or a disabled one if no key is set.
    pub fn from_config(config: &GenAiConfig) -> Self {
        match GeminiClient::new(config) {
            Ok(client) => {
                tracing::info!(model = %config.model, "Text generation enabled");
                Self::new(Arc::new(client), config.reply_language.clone())
            }
            Err(GenAiError::MissingApiKey) => {
                tracing::warn!("No Gemini API key configured, AI features will return fallbacks");
                Self::disabled(config.reply_language.clone())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build Gemini client, AI features disabled");
                Self::disabled(config.reply_language.clone())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Key design points of a project, written for a professional designer.
    pub async fn project_summary(&self, project: &Project) -> String {
        let prompt = project_summary_prompt(project, &self.reply_language);
        self.ask(&prompt, &SUMMARY_FALLBACKS).await
    }

    /// Three interior styles suited to a described lifestyle.
    pub async fn suggest_styles(&self, description: &str) -> String {
        let prompt = style_suggestion_prompt(description, &self.reply_language);
        self.ask(&prompt, &STYLE_FALLBACKS).await
    }

    async fn ask(&self, prompt: &str, fallbacks: &Fallbacks) -> String {
        let Some(generator) = &self.generator else {
            return fallbacks.unavailable.to_string();
        };
        match generator.generate(prompt).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!("Text generation returned no text");
                fallbacks.empty.to_string()
            }
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Text generation failed");
                fallbacks.unavailable.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use roombrief_core::project::NewProject;
    use roombrief_core::types::ProjectId;

    use super::*;

    /// Generator returning a canned reply and recording prompts.
    struct Canned {
        reply: fn() -> Result<String, GenAiError>,
        prompts: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(reply: fn() -> Result<String, GenAiError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.reply)()
        }
    }

    fn project() -> Project {
        Project::from_fields(
            ProjectId::new("p"),
            Utc::now(),
            NewProject {
                title: "Loft".into(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn returns_model_text() {
        let canned = Canned::new(|| Ok("1. Light wood".into()));
        let advisor = Advisor::new(canned.clone(), "English");

        assert_eq!(advisor.project_summary(&project()).await, "1. Light wood");
        let prompts = canned.prompts.lock().unwrap();
        assert!(prompts[0].contains("Project: Loft"));
        assert!(prompts[0].contains("Reply in English"));
    }

    #[tokio::test]
    async fn empty_reply_uses_could_not_generate_fallback() {
        let advisor = Advisor::new(Canned::new(|| Ok("  \n".into())), "English");
        assert_eq!(advisor.project_summary(&project()).await, SUMMARY_EMPTY);
        assert_eq!(advisor.suggest_styles("cosy").await, STYLES_EMPTY);
    }

    #[tokio::test]
    async fn failure_uses_unavailable_fallback() {
        let advisor = Advisor::new(
            Canned::new(|| {
                Err(GenAiError::ApiError {
                    status: 503,
                    body: "overloaded".into(),
                })
            }),
            "English",
        );
        assert_eq!(advisor.project_summary(&project()).await, SUMMARY_UNAVAILABLE);
        assert_eq!(advisor.suggest_styles("cosy").await, STYLES_UNAVAILABLE);
    }

    #[tokio::test]
    async fn disabled_advisor_never_calls_out() {
        let advisor = Advisor::from_config(&GenAiConfig::default());
        assert!(!advisor.is_enabled());
        assert_eq!(advisor.suggest_styles("minimal").await, STYLES_UNAVAILABLE);
    }
}
