use crate::error::ClientError;
use crate::{ScriptureRef, Suggestion};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// OpenAI-compatible completion body, plus the flat fallback keys some
/// agent backends emit instead of a `choices` array.
#[derive(Deserialize)]
struct WireCompletion {
    choices: Option<Vec<WireChoice>>,
    completion: Option<String>,
    text: Option<String>,
    output: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: Option<WireMessage>,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

/// Parse a 2xx response body into a [`Suggestion`].
///
/// `choices[0].message.content` is authoritative. When the body has no
/// `choices` key at all, flat `completion`/`text`/`output`/`content` keys
/// are accepted in that order. A present-but-empty `choices` array is a
/// malformed response, never an empty suggestion.
pub fn parse_suggestion(
    body: &str,
    model: &str,
    translation: &str,
) -> Result<Suggestion, ClientError> {
    let wire: WireCompletion = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(format!("response is not valid JSON: {e}")))?;

    let text = match wire.choices {
        Some(choices) => choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                ClientError::MalformedResponse(
                    "response has no usable choices[0].message.content".to_string(),
                )
            })?,
        None => [wire.completion, wire.text, wire.output, wire.content]
            .into_iter()
            .flatten()
            .find(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                ClientError::MalformedResponse("response carries no content field".to_string())
            })?,
    };

    let text = text.trim().to_string();
    let citation = extract_citation(&text, translation);

    Ok(Suggestion {
        text,
        citation,
        model: model.to_string(),
        translation: translation.to_string(),
    })
}

// Matches "John 3:16", "Psalm 103:2-3", "1 Thessalonians 5:16-18",
// "Song of Solomon 2:1". A miss just means no citation is attached.
static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[1-3]\s)?[A-Z][a-z]+(?:\s(?:of\s)?[A-Z][a-z]+)*\s\d{1,3}:\d{1,3}(?:-\d{1,3})?")
        .expect("citation regex")
});

/// First scripture reference found in the text, if any.
pub fn extract_citation(text: &str, translation: &str) -> Option<ScriptureRef> {
    CITATION.find(text).map(|m| ScriptureRef {
        reference: m.as_str().to_string(),
        translation: translation.to_string(),
    })
}
