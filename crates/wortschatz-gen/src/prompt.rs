//! Listening-comprehension prompt construction.
//!
//! Builds the generation prompt for a batch of listening items: the model
//! is instructed to return a single JSON array of exactly
//! [`ITEM_COUNT`] items, with the retrieved vocabulary embedded as a JSON
//! list so every audio text can include at least one known term.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use wortschatz_core::Level;

/// Number of items requested per generation batch.
pub const ITEM_COUNT: usize = 10;

/// Maximum audio clip length stated in the prompt, in seconds.
pub const MAX_AUDIO_SECONDS: u32 = 12;

/// Preferred listening item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    /// Three options, one correct.
    MultipleChoice,
    /// True/false ("richtig"/"falsch"), two options.
    RichtigFalsch,
}

impl ItemType {
    /// The literal type string used in generated item JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::MultipleChoice => "MultipleChoice",
            ItemType::RichtigFalsch => "RichtigFalsch",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one listening-item generation prompt.
#[derive(Debug, Clone)]
pub struct ListeningPrompt {
    /// Topic the items should revolve around.
    pub topic: String,

    /// Target CEFR level.
    pub level: Level,

    /// First item ID; items increment sequentially from here.
    pub start_id: u32,

    /// Preferred item type; the model may fall back to the other type
    /// when a question does not suit it.
    pub prefer_type: ItemType,
}

impl ListeningPrompt {
    /// Create a prompt for a topic and level with default settings.
    pub fn new(topic: impl Into<String>, level: Level) -> Self {
        Self {
            topic: topic.into(),
            level,
            start_id: 1,
            prefer_type: ItemType::MultipleChoice,
        }
    }

    /// Set the starting item ID.
    pub fn with_start_id(mut self, start_id: u32) -> Self {
        self.start_id = start_id;
        self
    }

    /// Set the preferred item type.
    pub fn with_prefer_type(mut self, prefer_type: ItemType) -> Self {
        self.prefer_type = prefer_type;
        self
    }

    /// Render the full prompt with the retrieved vocabulary embedded.
    pub fn render(&self, vocab: &[String]) -> String {
        let vocab_json =
            serde_json::to_string(vocab).unwrap_or_else(|_| "[]".to_string());
        let level = self.level.as_str();
        let topic = &self.topic;
        let start_id = self.start_id;
        let prefer_type = self.prefer_type;
        let timestamp = Utc::now().to_rfc3339();

        format!(
            r#"Task:
Generate EXACTLY {ITEM_COUNT} listening comprehension items for CEFR {level}.
Each item must be of type "{prefer_type}" unless clearly unsuitable, then use "RichtigFalsch".
The output MUST be a SINGLE JSON ARRAY with {ITEM_COUNT} objects. No text before or after the JSON.

Inputs:
- vocab_list: {vocab_json}
- topic: "{topic}"
- start_id: {start_id}
- max_audio_length: {MAX_AUDIO_SECONDS} seconds

JSON ARRAY STRUCTURE (exact):
[
  {{
    "id": integer,
    "type": "MultipleChoice" | "RichtigFalsch",
    "question": string,
    "translation": string,
    "audioText": string,
    "audioText_translation": string,
    "audioDescription": string,
    "ttsPrompt": string,
    "options": [string],
    "options_translations": [string],
    "correctAnswer": string,
    "imagePlaceholder": string,
    "metadata": {{
        "level": "{level}",
        "skill": "LISTENING",
        "topic": "{topic}",
        "source": "generated",
        "timestamp": "{timestamp}"
    }}
  }},
  ...
]  <-- exactly {ITEM_COUNT} objects

CRITICAL REQUIREMENTS:
- Start IDs at {start_id} and increment sequentially.
- Each audioText must include at least ONE word from vocab_list.
- audioText must be SIMPLE {level} German (max 15 words).
- distractors must be realistic (e.g., similar times, similar places).
- options MUST contain 3 items for MultipleChoice, 2 for RichtigFalsch.
- correctAnswer MUST be EXACTLY one of the options.
- No explanations, no prose, no markdown - ONLY the JSON array.

Content Rules:
- Use daily-life contexts: Bahnhof, Bus, Supermarkt, Cafe, Arbeit, Wetter, Termine.
- Use short, natural, realistic announcements or dialogues.
- Avoid proper nouns except common German cities (Berlin, Hamburg, Muenchen).

Return ONLY the JSON array with {ITEM_COUNT} objects."#
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
