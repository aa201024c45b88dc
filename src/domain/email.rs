use serde::{Deserialize, Serialize};

/// How many stored emails the dashboard keeps (newest first).
pub const EMAIL_PREVIEW_COUNT: usize = 3;

/// A stored email as delivered by the remote service. Every field may be
/// missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    #[serde(default)]
    pub subject: Option<String>,
    /// Stored rows call this `sender`.
    #[serde(default, alias = "sender")]
    pub from: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl EmailRecord {
    pub fn subject_or_placeholder(&self) -> &str {
        non_empty(&self.subject).unwrap_or("No Subject")
    }

    pub fn from_or_placeholder(&self) -> &str {
        non_empty(&self.from).unwrap_or("Unknown Sender")
    }

    pub fn date_or_placeholder(&self) -> &str {
        non_empty(&self.date).unwrap_or("No Date Provided")
    }

    pub fn snippet_or_placeholder(&self) -> &str {
        non_empty(&self.snippet).unwrap_or("No content available.")
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_use_placeholders() {
        let e: EmailRecord = serde_json::from_str(r#"{"subject": null, "from": ""}"#).unwrap();
        assert_eq!(e.subject_or_placeholder(), "No Subject");
        assert_eq!(e.from_or_placeholder(), "Unknown Sender");
        assert_eq!(e.date_or_placeholder(), "No Date Provided");
        assert_eq!(e.snippet_or_placeholder(), "No content available.");
    }

    #[test]
    fn stored_row_sender_fills_from() {
        let e: EmailRecord = serde_json::from_str(
            r#"{"id": "18c2", "user_id": "u", "subject": "Hi", "sender": "boss@corp.com", "date": null, "snippet": "see you", "processed": false}"#,
        )
        .unwrap();
        assert_eq!(e.from_or_placeholder(), "boss@corp.com");
        assert_eq!(e.date_or_placeholder(), "No Date Provided");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let e: EmailRecord = serde_json::from_str(
            r#"{"id": "abc", "subject": "Hi", "from": "a@b.c", "date": "Mon, 1 Jan 2024", "snippet": "hello"}"#,
        )
        .unwrap();
        assert_eq!(e.subject_or_placeholder(), "Hi");
        assert_eq!(e.snippet_or_placeholder(), "hello");
    }
}
