use serde::{Deserialize, Serialize};

/// Requested length of the generated prayer, expressed to the model as a
/// word-range hint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SuggestionLength {
    pub fn word_range(self) -> &'static str {
        match self {
            SuggestionLength::Short => "0-100 words",
            SuggestionLength::Medium => "100-200 words",
            SuggestionLength::Long => "200-500 words",
        }
    }
}

/// System instruction for a fresh suggestion.
///
/// The journal text travels verbatim in the user turn; everything about
/// role, tone, length and translation lives here. The translation is also
/// passed as a request parameter so the upstream can apply it
/// deterministically; naming it in the instruction only biases the wording.
pub fn suggestion_system(translation: &str, length: SuggestionLength) -> String {
    format!(
        "You are a pastoral assistant. The user shares a journal entry \
         describing a need, worry, or thanksgiving. Respond with a \
         comforting, inspirational prayer suggestion of approximately {} \
         addressing what they wrote. Where relevant, include an appropriate \
         Scripture reference, quoting the {} translation.",
        length.word_range(),
        translation.to_uppercase()
    )
}

/// System instruction for rephrasing an existing prayer.
///
/// The existing prayer travels verbatim in the user turn.
pub fn rephrase_system(translation: &str, length: SuggestionLength) -> String {
    format!(
        "You are a pastoral assistant. The user shares an existing prayer. \
         Compose a new, unique prayer that keeps its theme, intention and \
         spirit, but with different wording and structure, approximately {} \
         in length. Where relevant, include an appropriate Scripture \
         reference, quoting the {} translation.",
        length.word_range(),
        translation.to_uppercase()
    )
}

/// System instruction for a short topical prayer.
///
/// Length is fixed (50-70 words) rather than caller-chosen; the seed verse
/// rides in the instruction, the topic name travels as the user turn.
pub fn topic_system(translation: &str, verse_reference: &str, verse_text: &str) -> String {
    format!(
        "You are a pastoral assistant. The user names a prayer topic. \
         Compose a short prayer of 50-70 words for that topic that \
         incorporates the essence of this Bible verse: {} - {}. Quote \
         Scripture from the {} translation.",
        verse_reference,
        verse_text,
        translation.to_uppercase()
    )
}
