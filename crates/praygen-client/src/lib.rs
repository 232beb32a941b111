//! Suggestion client: turns a journal entry into a chat-completion request
//! against an OpenAI-compatible endpoint and the response into a
//! displayable, persistable suggestion.
//!
//! The HTTP capability is a trait ([`HttpTransport`]) so dispatch, retry
//! and parsing are testable without a live network. One immutable
//! [`ClientConfig`] is shared read-only across calls; each call owns its
//! timeout and retry budget.

mod error;
mod parse;
mod prompt;
mod transport;

pub use error::ClientError;
pub use parse::{extract_citation, parse_suggestion};
pub use prompt::{SuggestionLength, rephrase_system, suggestion_system, topic_system};
pub use transport::{
    DEFAULT_TIMEOUT, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    ScriptedTransport, TransportError,
};

pub use praygen_config::ClientConfig;
pub use praygen_retry::{CancelToken, RetryError, RetryPolicy};

use serde::{Deserialize, Serialize};

/// A scripture citation attached to a suggestion, tied to the translation
/// the config asked for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureRef {
    pub reference: String,
    pub translation: String,
}

/// A successful suggestion. Persistence is the caller's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The generated prayer/encouragement text.
    pub text: String,
    /// Cited scripture, when the model included one in recognizable form.
    pub citation: Option<ScriptureRef>,
    /// Model that produced the text.
    pub model: String,
    /// Translation the request was biased toward.
    pub translation: String,
}

/// Per-call options.
#[derive(Clone, Debug, Default)]
pub struct SuggestOptions {
    pub length: SuggestionLength,
    pub cancel: CancelToken,
}

/// Prayer-suggestion client over an [`HttpTransport`].
pub struct SuggestionClient<T: HttpTransport> {
    config: ClientConfig,
    transport: T,
    retry: RetryPolicy,
}

impl<T: HttpTransport> SuggestionClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the default retry schedule (3 attempts, 1s/2s backoff).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Suggest a prayer for a journal entry, with default options.
    pub fn suggest(&self, journal_text: &str) -> Result<Suggestion, ClientError> {
        self.suggest_with(journal_text, &SuggestOptions::default())
    }

    /// Suggest a prayer for a journal entry.
    pub fn suggest_with(
        &self,
        journal_text: &str,
        opts: &SuggestOptions,
    ) -> Result<Suggestion, ClientError> {
        let system = suggestion_system(&self.config.translation, opts.length);
        self.dispatch(&system, journal_text, &opts.cancel)
    }

    /// Compose a new prayer keeping the theme of an existing one.
    pub fn rephrase(
        &self,
        prayer_text: &str,
        opts: &SuggestOptions,
    ) -> Result<Suggestion, ClientError> {
        let system = rephrase_system(&self.config.translation, opts.length);
        self.dispatch(&system, prayer_text, &opts.cancel)
    }

    /// Short prayer (50-70 words) for a named topic, seeded with a verse
    /// the caller chose for that topic.
    pub fn topic_prayer(
        &self,
        topic: &str,
        verse_reference: &str,
        verse_text: &str,
        cancel: &CancelToken,
    ) -> Result<Suggestion, ClientError> {
        let system = topic_system(&self.config.translation, verse_reference, verse_text);
        self.dispatch(&system, topic, cancel)
    }

    fn dispatch(
        &self,
        system: &str,
        user_text: &str,
        cancel: &CancelToken,
    ) -> Result<Suggestion, ClientError> {
        // Trimming is only an emptiness check; the user turn itself is
        // sent verbatim.
        if user_text.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "journal text is empty after trimming".to_string(),
            ));
        }

        let url = self.config.completions_url();

        let result = praygen_retry::run(
            &self.retry,
            cancel,
            |e: &ClientError| e.is_transient(),
            || {
                // Fresh request per attempt; nothing survives a failure.
                let req = HttpRequest {
                    url: url.clone(),
                    bearer_token: self.config.api_key.clone(),
                    body: self.request_body(system, user_text),
                };
                let resp = self.transport.execute(&req).map_err(classify_transport)?;
                classify_status(resp.status)?;
                parse_suggestion(&resp.body, &self.config.model, &self.config.translation)
            },
        );

        match result {
            Ok(suggestion) => Ok(suggestion),
            Err(RetryError::Operation { error, .. }) => Err(error),
            Err(RetryError::Cancelled { .. }) => Err(ClientError::Cancelled),
        }
    }

    /// OpenAI-compatible chat-completion body. Model and translation ride
    /// as parameters, never concatenated into the message text.
    fn request_body(&self, system: &str, user_text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user_text }
            ],
            "stream": false,
            "metadata": { "translation": self.config.translation }
        })
    }
}

fn classify_transport(err: TransportError) -> ClientError {
    match err {
        TransportError::TimedOut(msg) => ClientError::Timeout(msg),
        // Connection resets/refusals are transient, like a 5xx.
        TransportError::Io(msg) => ClientError::ServerError(msg),
    }
}

fn classify_status(status: u16) -> Result<(), ClientError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(ClientError::Unauthorized(format!(
            "upstream returned status {status}"
        ))),
        429 => Err(ClientError::RateLimited(format!(
            "upstream returned status {status}"
        ))),
        500..=599 => Err(ClientError::ServerError(format!(
            "upstream returned status {status}"
        ))),
        other => Err(ClientError::MalformedResponse(format!(
            "unexpected status {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            api_key: "sk-test".to_string(),
            base_url: "https://api.example.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            translation: "esv".to_string(),
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            multiplier: 2.0,
        }
    }

    fn client(transport: ScriptedTransport) -> SuggestionClient<ScriptedTransport> {
        SuggestionClient::new(test_config(), transport).with_retry(fast_retry())
    }

    fn ok_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn well_formed_response_yields_suggestion() {
        let c = client(ScriptedTransport::new().respond(200, &ok_body("Peace be with you.")));
        let s = c.suggest("I am worried about my exams").unwrap();
        assert_eq!(s.text, "Peace be with you.");
        assert_eq!(s.translation, "esv");
        assert_eq!(c.transport.calls(), 1);
    }

    #[test]
    fn empty_input_fails_without_network() {
        let c = client(ScriptedTransport::new());
        let err = c.suggest("   \n\t ").unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(c.transport.calls(), 0);
    }

    #[test]
    fn retry_recovers_from_two_server_errors() {
        let c = client(
            ScriptedTransport::new()
                .respond(500, "down")
                .respond(500, "down")
                .respond(200, &ok_body("He restores my soul.")),
        );
        let s = c.suggest("feeling weary").unwrap();
        assert_eq!(s.text, "He restores my soul.");
        assert_eq!(c.transport.calls(), 3);
    }

    #[test]
    fn persistent_server_error_exhausts_three_attempts() {
        let c = client(
            ScriptedTransport::new()
                .respond(500, "down")
                .respond(500, "down")
                .respond(500, "down"),
        );
        let err = c.suggest("anything").unwrap_err();
        assert!(matches!(err, ClientError::ServerError(_)));
        assert_eq!(c.transport.calls(), 3);
    }

    #[test]
    fn unauthorized_fails_after_single_attempt() {
        let c = client(ScriptedTransport::new().respond(401, "bad key"));
        let err = c.suggest("anything").unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert_eq!(c.transport.calls(), 1);
    }

    #[test]
    fn rate_limit_is_retried() {
        let c = client(
            ScriptedTransport::new()
                .respond(429, "slow down")
                .respond(200, &ok_body("Give thanks in all circumstances.")),
        );
        let s = c.suggest("gratitude tonight").unwrap();
        assert!(s.text.contains("thanks"));
        assert_eq!(c.transport.calls(), 2);
    }

    #[test]
    fn timeout_is_retried() {
        let c = client(
            ScriptedTransport::new()
                .fail(TransportError::TimedOut("deadline".into()))
                .respond(200, &ok_body("Be still.")),
        );
        let s = c.suggest("restless night").unwrap();
        assert_eq!(s.text, "Be still.");
        assert_eq!(c.transport.calls(), 2);
    }

    #[test]
    fn empty_choices_is_malformed_and_not_retried() {
        let c = client(ScriptedTransport::new().respond(200, r#"{"choices": []}"#));
        let err = c.suggest("anything").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(c.transport.calls(), 1);
    }

    #[test]
    fn unexpected_4xx_is_malformed_and_not_retried() {
        let c = client(ScriptedTransport::new().respond(404, "nothing here"));
        let err = c.suggest("anything").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(c.transport.calls(), 1);
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let c = client(ScriptedTransport::new());
        let opts = SuggestOptions::default();
        opts.cancel.cancel();
        let err = c.suggest_with("a real entry", &opts).unwrap_err();
        assert_eq!(err, ClientError::Cancelled);
        assert_eq!(c.transport.calls(), 0);
    }

    #[test]
    fn request_carries_model_and_translation_as_parameters() {
        let c = client(ScriptedTransport::new().respond(200, &ok_body("Amen.")));
        c.suggest("guidance for a hard decision").unwrap();

        let reqs = c.transport.requests();
        assert_eq!(reqs.len(), 1);
        let body = &reqs[0].body;
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["metadata"]["translation"], "esv");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "guidance for a hard decision");
        assert_eq!(reqs[0].bearer_token, "sk-test");
        assert_eq!(
            reqs[0].url,
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn suggestion_picks_up_citation() {
        let c = client(ScriptedTransport::new().respond(
            200,
            &ok_body("Cast your anxiety on him. 1 Peter 5:7 holds this promise."),
        ));
        let s = c.suggest("anxious about work").unwrap();
        let citation = s.citation.unwrap();
        assert_eq!(citation.reference, "1 Peter 5:7");
        assert_eq!(citation.translation, "esv");
    }

    #[test]
    fn journal_text_sent_verbatim_including_whitespace() {
        let c = client(ScriptedTransport::new().respond(200, &ok_body("Amen.")));
        c.suggest("  a padded entry\n").unwrap();

        let reqs = c.transport.requests();
        assert_eq!(reqs[0].body["messages"][1]["content"], "  a padded entry\n");
    }

    #[test]
    fn topic_prayer_seeds_instruction_with_verse() {
        let c = client(ScriptedTransport::new().respond(200, &ok_body("A short prayer.")));
        let s = c
            .topic_prayer(
                "Peace and Comfort",
                "John 14:27",
                "Peace I leave with you; my peace I give you.",
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(s.text, "A short prayer.");

        let reqs = c.transport.requests();
        let system = reqs[0].body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(system.contains("50-70 words"));
        assert!(system.contains("John 14:27"));
        assert_eq!(reqs[0].body["messages"][1]["content"], "Peace and Comfort");
    }

    #[test]
    fn topic_prayer_with_blank_topic_fails_without_network() {
        let c = client(ScriptedTransport::new());
        let err = c
            .topic_prayer("  ", "John 14:27", "Peace I leave with you.", &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(c.transport.calls(), 0);
    }

    #[test]
    fn rephrase_uses_rephrase_instruction_and_verbatim_text() {
        let c = client(ScriptedTransport::new().respond(200, &ok_body("A new prayer.")));
        let original = "Lord, watch over my family tonight.";
        c.rephrase(original, &SuggestOptions::default()).unwrap();

        let reqs = c.transport.requests();
        let system = reqs[0].body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(system.contains("different wording"));
        assert_eq!(reqs[0].body["messages"][1]["content"], original);
    }

    proptest! {
        #[test]
        fn whitespace_only_input_never_reaches_transport(input in "[ \\t\\n\\r]{0,12}") {
            let c = client(ScriptedTransport::new());
            let err = c.suggest(&input).unwrap_err();
            prop_assert!(matches!(err, ClientError::InvalidInput(_)));
            prop_assert_eq!(c.transport.calls(), 0);
        }

        #[test]
        fn non_blank_input_with_ok_response_never_errors(entry in "[a-zA-Z][a-zA-Z ]{0,40}") {
            let c = client(ScriptedTransport::new().respond(200, &ok_body("A prayer.")));
            let s = c.suggest(&entry);
            prop_assert!(s.is_ok());
        }
    }
}
