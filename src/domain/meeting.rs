use serde::{Deserialize, Serialize};

/// One meeting as shown on the dashboard: a single display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingRecord(pub String);

impl MeetingRecord {
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Wire shape of a stored meeting.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredMeeting {
    #[serde(default)]
    pub meeting_text: Option<String>,
}

impl From<StoredMeeting> for MeetingRecord {
    fn from(m: StoredMeeting) -> Self {
        MeetingRecord(m.meeting_text.unwrap_or_default())
    }
}
