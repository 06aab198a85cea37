/**
 * Page Generation Events
 *
 * Events written to the `POST /api/ai-pages/stream` Server-Sent Events
 * stream. Every event is serialized as a JSON object tagged by `type`:
 *
 * ```json
 * {"type":"start","message":"Starting page creation..."}
 * {"type":"content","content":"<div class=..."}
 * {"type":"done","page":{"id":"...","title":"...","slug":"...", ...}}
 * {"type":"error","error":"..."}
 * ```
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Page summary sent with the final `done` event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamedPage {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub html_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One event on the generation stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// Generation accepted and started
    Start { message: String },
    /// A chunk of generated HTML
    Content { content: String },
    /// Page persisted
    Done { page: StreamedPage },
    /// Generation failed; `details` carries structured context such as the
    /// credit status when the user cannot afford the action
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        code: Option<String>,
        #[serde(flatten)]
        details: Option<serde_json::Map<String, serde_json::Value>>,
    },
}

impl GenerationEvent {
    /// Create a start event
    pub fn start(message: impl Into<String>) -> Self {
        Self::Start {
            message: message.into(),
        }
    }

    /// Create a content chunk event
    pub fn content(content: impl Into<String>) -> Self {
        Self::Content {
            content: content.into(),
        }
    }

    /// Create a completion event
    pub fn done(page: StreamedPage) -> Self {
        Self::Done { page }
    }

    /// Create a plain error event
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
            code: None,
            details: None,
        }
    }

    /// Create an error event carrying a machine-readable code and extra fields
    pub fn error_with_details(
        error: impl Into<String>,
        code: impl Into<String>,
        details: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self::Error {
            error: error.into(),
            code: Some(code.into()),
            details: Some(details),
        }
    }

    /// Whether the stream ends after this event
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

/// Split generated HTML into chunks of at most `chunk_size` characters.
///
/// Splits on character boundaries so multi-byte text is never cut in half.
pub fn chunk_content(content: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_start_event_json() {
        let event = GenerationEvent::start("Starting page creation...");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "start", "message": "Starting page creation..."})
        );
    }

    #[test]
    fn test_plain_error_omits_code() {
        let json = serde_json::to_value(GenerationEvent::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "error", "error": "boom"}));
    }

    #[test]
    fn test_error_with_details_is_flattened() {
        let mut details = serde_json::Map::new();
        details.insert("requiredCredits".into(), serde_json::json!(2.0));
        let event = GenerationEvent::error_with_details("no credits", "INSUFFICIENT_CREDITS", details);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_CREDITS");
        assert_eq!(json["requiredCredits"], 2.0);
        assert!(event.is_terminal());
    }

    #[test]
    fn test_done_event_uses_snake_case_page_fields() {
        let now = Utc::now();
        let event = GenerationEvent::done(StreamedPage {
            id: Uuid::new_v4(),
            title: "Landing".into(),
            slug: "landing".into(),
            html_content: "<div></div>".into(),
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "done");
        assert_eq!(json["page"]["html_content"], "<div></div>");
    }

    #[test]
    fn test_chunk_content_respects_char_boundaries() {
        let chunks = chunk_content("ááá", 2);
        assert_eq!(chunks, vec!["áá".to_string(), "á".to_string()]);
        assert!(chunk_content("", 100).is_empty());
    }
}
