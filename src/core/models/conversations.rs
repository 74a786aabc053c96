//! Conversation threads

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::emails::{Email, Importance, SortOrder};
use super::pagination::Pagination;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub participant_count: u32,
    #[serde(default)]
    pub email_count: u32,
    #[serde(default)]
    pub latest_email_date: String,
    #[serde(default)]
    pub first_email_date: String,
    #[serde(default)]
    pub has_unread: bool,
    #[serde(default)]
    pub has_attachments: bool,
    #[serde(default)]
    pub importance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub conversations: Vec<Conversation>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ConversationFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_attachments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    /// One of [`ConversationFilters::SORT_FIELDS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ConversationFilters {
    pub const SORT_FIELDS: [&'static str; 5] = [
        "latest_email_date",
        "first_email_date",
        "email_count",
        "subject",
        "participant_count",
    ];

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn active_count(&self) -> usize {
        super::query_pairs(self).len()
    }

    /// Rebuild filters from URL parameters; unknown sort fields are dropped.
    pub fn from_query(get: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| match get(key).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        Self {
            subject_contains: get("subject_contains").filter(|v| !v.trim().is_empty()),
            sender_email: get("sender_email").filter(|v| !v.trim().is_empty()),
            has_unread: flag("has_unread"),
            has_attachments: flag("has_attachments"),
            importance: get("importance").as_deref().and_then(Importance::parse),
            sort_by: get("sort_by").filter(|v| Self::SORT_FIELDS.contains(&v.as_str())),
            sort_order: get("sort_order").as_deref().and_then(SortOrder::parse),
        }
    }
}

/// A conversation participant as the backend happens to encode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Participant {
    Name(String),
    Contact { name: String, email: String },
    Other(serde_json::Value),
}

impl Participant {
    pub fn label(&self) -> String {
        match self {
            Participant::Name(name) => name.clone(),
            Participant::Contact { name, email } => format!("{} ({})", name, email),
            Participant::Other(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetailResponse {
    pub conversation_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub participants: BTreeMap<String, Participant>,
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub total_emails: u64,
    #[serde(default)]
    pub conversation_duration_days: f64,
    #[serde(default)]
    pub latest_email_date: String,
    #[serde(default)]
    pub first_email_date: String,
}

impl ConversationDetailResponse {
    pub fn unread_count(&self) -> usize {
        self.emails.iter().filter(|e| !e.is_read).count()
    }

    pub fn attachment_count(&self) -> usize {
        self.emails.iter().filter(|e| e.has_attachments).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_shapes() {
        let json = r#"{
            "a": "Ana Lee",
            "b": {"name": "Bo", "email": "bo@example.com"},
            "c": {"id": 3},
            "d": 42
        }"#;
        let participants: BTreeMap<String, Participant> = serde_json::from_str(json).unwrap();

        assert_eq!(participants["a"], Participant::Name("Ana Lee".to_string()));
        assert_eq!(participants["b"].label(), "Bo (bo@example.com)");
        assert_eq!(participants["c"].label(), r#"{"id":3}"#);
        assert_eq!(participants["d"].label(), "42");
    }

    #[test]
    fn test_filters_from_url() {
        let filters = ConversationFilters::from_query(|key| match key {
            "has_unread" => Some("true".to_string()),
            "sort_by" => Some("password".to_string()),
            "sort_order" => Some("asc".to_string()),
            _ => None,
        });
        assert_eq!(filters.has_unread, Some(true));
        assert_eq!(filters.sort_by, None);
        assert_eq!(filters.sort_order, Some(SortOrder::Asc));
        assert_eq!(filters.active_count(), 2);
        assert!(ConversationFilters::from_query(|_| None).is_empty());
    }

    #[test]
    fn test_detail_counts() {
        let json = r#"{
            "conversation_id": "c1",
            "subject": "Quote",
            "participants": {},
            "emails": [
                {"id": 1, "is_read": true, "has_attachments": true},
                {"id": 2, "is_read": false}
            ],
            "total_emails": 2,
            "conversation_duration_days": 1.5,
            "latest_email_date": "2025-01-02",
            "first_email_date": "2025-01-01"
        }"#;
        let detail: ConversationDetailResponse = serde_json::from_str(json).unwrap();

        assert_eq!(detail.unread_count(), 1);
        assert_eq!(detail.attachment_count(), 1);
    }
}
