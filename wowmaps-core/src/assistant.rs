//! Text-generation helper used by the admin panel to draft map descriptions.
//!
//! Generation is best-effort: [`enrich_description`] never fails and hands
//! back the caller's text when the assistant is missing, errors, or answers
//! with nothing.
use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{Value, json};

use crate::config::AssistantConfig;
use crate::rest::{Method, RestCall, RestTransport, TransportError};

const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Persona given to the model for every briefing.
pub const SYSTEM_INSTRUCTION: &str = "You are a tactical military AI embedded in the WOW MAPS \
network. Your goal is to convert simple map descriptions into immersive tactical intelligence \
briefings for professional gamers.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistError {
    #[error("Assistant has no API key configured")]
    Disabled,
    #[error("Assistant request failed: {0}")]
    Network(String),
    #[error("Assistant rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Assistant response malformed: {0}")]
    Decode(String),
    #[error("Assistant returned no text")]
    Empty,
}

impl From<TransportError> for AssistError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.0)
    }
}

#[async_trait::async_trait(?Send)]
pub trait TextAssistant {
    /// Draft a briefing for the map titled `title`, using `context` as the
    /// starting description.
    ///
    /// # Errors
    /// Returns an error when no usable text was produced.
    async fn generate(&self, title: &str, context: &str) -> Result<String, AssistError>;
}

/// User prompt for one briefing.
#[must_use]
pub fn briefing_prompt(title: &str, context: &str, word_limit: u32) -> String {
    format!(
        "Generate a high-tech tactical briefing for a gaming map titled \"{title}\".\n\
         Initial context: {context}.\n\
         Style: Professional military intel, futuristic, concise.\n\
         Limit to {word_limit} words."
    )
}

/// `generateContent` call for `prompt`.
///
/// # Errors
/// Returns [`AssistError::Disabled`] when no API key is configured.
pub fn generate_content_call(cfg: &AssistantConfig, prompt: &str) -> Result<RestCall, AssistError> {
    let key = cfg.api_key.trim();
    if key.is_empty() {
        return Err(AssistError::Disabled);
    }
    Ok(RestCall {
        method: Method::Post,
        url: format!(
            "{GEMINI_HOST}/models/{}:generateContent?key={}",
            urlencoding::encode(&cfg.model),
            urlencoding::encode(key)
        ),
        body: Some(json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        })),
    })
}

/// Concatenated text parts of the first candidate, trimmed.
///
/// # Errors
/// Returns [`AssistError::Empty`] when the candidate carries no text.
pub fn extract_text(response: &Value) -> Result<String, AssistError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or(AssistError::Empty)?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    let text = text.trim();
    if text.is_empty() {
        Err(AssistError::Empty)
    } else {
        Ok(text.to_string())
    }
}

/// Gemini `generateContent` client over any [`RestTransport`].
pub struct GeminiAssistant<T> {
    config: AssistantConfig,
    transport: T,
}

impl<T: RestTransport> GeminiAssistant<T> {
    pub const fn new(config: AssistantConfig, transport: T) -> Self {
        Self { config, transport }
    }
}

#[async_trait::async_trait(?Send)]
impl<T: RestTransport> TextAssistant for GeminiAssistant<T> {
    async fn generate(&self, title: &str, context: &str) -> Result<String, AssistError> {
        let prompt = briefing_prompt(title, context, self.config.word_limit);
        let call = generate_content_call(&self.config, &prompt)?;
        let model = &self.config.model;
        log::debug!("Assistant request for {title:?} on model {model}");
        let reply = self.transport.execute(call).await?;
        if !reply.is_success() {
            return Err(AssistError::Rejected {
                status: reply.status,
                message: reply.error_message(),
            });
        }
        let body = reply
            .json()
            .map_err(|err| AssistError::Decode(err.to_string()))?;
        extract_text(&body)
    }
}

/// Replays canned answers in order; answers [`AssistError::Empty`] once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    answers: RefCell<VecDeque<Result<String, AssistError>>>,
    prompts: RefCell<Vec<(String, String)>>,
}

impl ScriptedAssistant {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = Result<String, AssistError>>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// `(title, context)` pairs received so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl TextAssistant for ScriptedAssistant {
    async fn generate(&self, title: &str, context: &str) -> Result<String, AssistError> {
        self.prompts
            .borrow_mut()
            .push((title.to_string(), context.to_string()));
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(AssistError::Empty))
    }
}

/// Run `assistant` for one briefing, treating a missing assistant as
/// [`AssistError::Disabled`] and blank output as [`AssistError::Empty`].
///
/// # Errors
/// Returns the reason no briefing text is available.
pub async fn briefing<A>(
    assistant: Option<&A>,
    title: &str,
    description: &str,
) -> Result<String, AssistError>
where
    A: TextAssistant + ?Sized,
{
    let assistant = assistant.ok_or(AssistError::Disabled)?;
    let text = assistant.generate(title, description).await?;
    if text.trim().is_empty() {
        Err(AssistError::Empty)
    } else {
        Ok(text)
    }
}

/// Assistant output for `title`, or `description` unchanged when generation
/// is unavailable or fails.
pub async fn enrich_description<A>(assistant: Option<&A>, title: &str, description: &str) -> String
where
    A: TextAssistant + ?Sized,
{
    briefing(assistant, title, description)
        .await
        .unwrap_or_else(|err| {
            log::warn!("Keeping description for {title:?}: {err}");
            description.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::RestReply;
    use futures::executor::block_on;

    struct CannedTransport {
        reply: Result<RestReply, TransportError>,
        seen: RefCell<Vec<RestCall>>,
    }

    impl CannedTransport {
        fn new(reply: Result<RestReply, TransportError>) -> Self {
            Self {
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait(?Send)]
    impl RestTransport for CannedTransport {
        async fn execute(&self, call: RestCall) -> Result<RestReply, TransportError> {
            self.seen.borrow_mut().push(call);
            self.reply.clone()
        }
    }

    fn keyed() -> AssistantConfig {
        AssistantConfig {
            api_key: "secret".into(),
            ..AssistantConfig::default()
        }
    }

    #[test]
    fn prompt_carries_title_context_and_limit() {
        let prompt = briefing_prompt("Lava Run", "jump a lot", 60);
        assert!(prompt.contains("\"Lava Run\""));
        assert!(prompt.contains("Initial context: jump a lot."));
        assert!(prompt.ends_with("Limit to 60 words."));
    }

    #[test]
    fn call_requires_key_and_embeds_instruction() {
        assert_eq!(
            generate_content_call(&AssistantConfig::default(), "p"),
            Err(AssistError::Disabled)
        );
        let call = generate_content_call(&keyed(), "hello").unwrap();
        assert_eq!(call.method, Method::Post);
        assert!(call.url.contains(":generateContent?key=secret"));
        let body = call.body.unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );
    }

    #[test]
    fn extract_joins_parts_of_first_candidate() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Sector " }, { "text": "hot." }] } }]
        });
        assert_eq!(extract_text(&response).unwrap(), "Sector hot.");
        assert_eq!(extract_text(&json!({ "candidates": [] })), Err(AssistError::Empty));
    }

    #[test]
    fn gemini_client_reports_rejections() {
        let transport = CannedTransport::new(Ok(RestReply {
            status: 400,
            body: json!({ "error": { "message": "API key not valid" } }).to_string(),
        }));
        let assistant = GeminiAssistant::new(keyed(), transport);
        assert_eq!(
            block_on(assistant.generate("T", "c")),
            Err(AssistError::Rejected {
                status: 400,
                message: "API key not valid".into()
            })
        );
        assert_eq!(assistant.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn gemini_client_returns_candidate_text() {
        let transport = CannedTransport::new(Ok(RestReply {
            status: 200,
            body: json!({
                "candidates": [{ "content": { "parts": [{ "text": "Hold the ridge." }] } }]
            })
            .to_string(),
        }));
        let assistant = GeminiAssistant::new(keyed(), transport);
        assert_eq!(
            block_on(assistant.generate("T", "c")).unwrap(),
            "Hold the ridge."
        );
    }

    #[test]
    fn enrich_falls_back_to_original_text() {
        let original = "short desc";
        assert_eq!(
            block_on(enrich_description::<ScriptedAssistant>(None, "T", original)),
            original
        );

        let assistant = ScriptedAssistant::new([
            Err(AssistError::Network("offline".into())),
            Ok("   ".into()),
            Ok("Briefing".into()),
        ]);
        assert_eq!(
            block_on(enrich_description(Some(&assistant), "T", original)),
            original
        );
        assert_eq!(
            block_on(enrich_description(Some(&assistant), "T", original)),
            original
        );
        assert_eq!(
            block_on(enrich_description(Some(&assistant), "T", original)),
            "Briefing"
        );
        assert_eq!(
            assistant.prompts()[0],
            ("T".to_string(), original.to_string())
        );
    }

    #[test]
    fn briefing_names_the_failure() {
        assert_eq!(
            block_on(briefing::<ScriptedAssistant>(None, "T", "d")),
            Err(AssistError::Disabled)
        );
        let assistant = ScriptedAssistant::new([Ok(String::new())]);
        assert_eq!(
            block_on(briefing(Some(&assistant), "T", "d")),
            Err(AssistError::Empty)
        );
    }
}
