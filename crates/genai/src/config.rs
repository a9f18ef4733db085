/// Text-generation settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// `None` disables generation; the advisor then answers with fallbacks.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Language the model is asked to reply in.
    pub reply_language: String,
    pub request_timeout_secs: u64,
}

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REPLY_LANGUAGE: &str = "Traditional Chinese";

impl GenAiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                     |
    /// |----------------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`/`API_KEY` | unset                                       |
    /// | `GEMINI_MODEL`             | `gemini-2.0-flash`                          |
    /// | `GEMINI_BASE_URL`          | `https://generativelanguage.googleapis.com` |
    /// | `GENAI_REPLY_LANGUAGE`     | `Traditional Chinese`                       |
    /// | `GENAI_TIMEOUT_SECS`       | `30`                                        |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let reply_language =
            std::env::var("GENAI_REPLY_LANGUAGE").unwrap_or_else(|_| DEFAULT_REPLY_LANGUAGE.into());

        let request_timeout_secs: u64 = std::env::var("GENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("GENAI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            reply_language,
            request_timeout_secs,
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            reply_language: DEFAULT_REPLY_LANGUAGE.into(),
            request_timeout_secs: 30,
        }
    }
}
