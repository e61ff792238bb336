//! Best-effort script translation via a chat-completion API.
//!
//! The translator never fails the pipeline: any error (no backend
//! configured, network failure, non-2xx response, blank completion)
//! is logged and answered with the untranslated input. English targets
//! short-circuit without a request.

use serde::Deserialize;

/// Language tag that never needs translation.
const ENGLISH: &str = "en";

/// Translation backend selection.
///
/// Exactly one contract exists: a remote chat-completion endpoint, or
/// nothing. There is deliberately no local-model variant.
#[derive(Debug, Clone)]
pub enum TranslatorConfig {
    /// No backend; every input passes through unchanged.
    Disabled,
    /// OpenAI-style chat-completion endpoint.
    ChatCompletion {
        /// Base URL, e.g. `https://api.openai.com/v1`.
        api_url: String,
        api_key: String,
        /// Model name sent with each request.
        model: String,
    },
}

/// Errors from the translation backend. Internal: the public
/// [`Translator::translate`] maps all of these to the fallback.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Translation API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Completion contained no usable translation")]
    EmptyCompletion,

    #[error("No translation backend configured")]
    Disabled,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Pull the first non-blank completion out of a response.
fn first_content(response: ChatCompletionResponse) -> Result<String, TranslateError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(TranslateError::EmptyCompletion)
}

/// Chat-completion-backed translator.
pub struct Translator {
    client: reqwest::Client,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a translator reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: TranslatorConfig) -> Self {
        Self { client, config }
    }

    /// Translate `text` into `target_language`, best-effort.
    ///
    /// Returns the translation when the backend delivers one, otherwise
    /// the input unchanged. Never errors.
    pub async fn translate(&self, text: &str, target_language: &str) -> String {
        let target = target_language.trim().to_ascii_lowercase();
        if target.is_empty() || target == ENGLISH {
            return text.to_string();
        }

        match self.request_translation(text, &target).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(
                    target_language = %target,
                    error = %e,
                    "Translation failed, using English script",
                );
                text.to_string()
            }
        }
    }

    async fn request_translation(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        let TranslatorConfig::ChatCompletion {
            api_url,
            api_key,
            model,
        } = &self.config
        else {
            return Err(TranslateError::Disabled);
        };

        let body = serde_json::json!({
            "model": model,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "Translate the user's message into the language with \
                         ISO 639-1 code '{target_language}'. Reply with only \
                         the translation."
                    ),
                },
                { "role": "user", "content": text },
            ],
        });

        let response = self
            .client
            .post(format!("{api_url}/chat/completions"))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TranslateError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        first_content(response.json::<ChatCompletionResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ChatCompletionResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn disabled_backend_returns_input() {
        let translator = Translator::new(TranslatorConfig::Disabled);
        assert_eq!(translator.translate("Hello Raj", "hi").await, "Hello Raj");
    }

    #[tokio::test]
    async fn english_target_short_circuits() {
        let translator = Translator::new(TranslatorConfig::Disabled);
        assert_eq!(translator.translate("Hello Raj", "en").await, "Hello Raj");
        assert_eq!(translator.translate("Hello Raj", " EN ").await, "Hello Raj");
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_to_input() {
        let translator = Translator::new(TranslatorConfig::ChatCompletion {
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: "test".to_string(),
            model: "test-model".to_string(),
        });
        assert_eq!(translator.translate("Hello Raj", "hi").await, "Hello Raj");
    }

    #[test]
    fn first_content_takes_first_choice() {
        let resp = parse(
            r#"{"choices":[{"message":{"content":"नमस्ते राज"}},{"message":{"content":"other"}}]}"#,
        );
        assert_eq!(first_content(resp).unwrap(), "नमस्ते राज");
    }

    #[test]
    fn blank_completion_is_rejected() {
        let resp = parse(r#"{"choices":[{"message":{"content":"   "}}]}"#);
        assert!(matches!(
            first_content(resp),
            Err(TranslateError::EmptyCompletion)
        ));
    }

    #[test]
    fn missing_choices_rejected() {
        let resp = parse(r#"{"choices":[]}"#);
        assert!(matches!(
            first_content(resp),
            Err(TranslateError::EmptyCompletion)
        ));
    }
}
