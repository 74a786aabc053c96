//! Mailbox payloads

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::pagination::Pagination;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub recipient_email: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_preview: String,
    #[serde(default)]
    pub received_date: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub has_attachments: bool,
    #[serde(default)]
    pub importance: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Email {
    /// Sender name, or the address when the name is blank.
    pub fn sender_label(&self) -> &str {
        if self.sender_name.trim().is_empty() {
            &self.sender_email
        } else {
            &self.sender_name
        }
    }

    pub fn is_high_importance(&self) -> bool {
        self.importance.eq_ignore_ascii_case("high")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailResponse {
    pub emails: Vec<Email>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    #[display("low")]
    Low,
    #[display("normal")]
    Normal,
    #[display("high")]
    High,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Importance::Low, Importance::Normal, Importance::High];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.to_string() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[display("asc")]
    Asc,
    #[default]
    #[display("desc")]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Mailbox list filters; unset fields are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EmailFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_contains: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_after: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_attachments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl EmailFilters {
    /// Number of filters currently set.
    pub fn active_count(&self) -> usize {
        super::query_pairs(self).len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Rebuild filters from URL parameters. Blank and unrecognised values are dropped.
    pub fn from_query(get: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str| match get(key).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        Self {
            subject_contains: text("subject_contains"),
            sender_email: text("sender_email"),
            sender_name_contains: text("sender_name_contains"),
            body_contains: text("body_contains"),
            received_after: text("received_after"),
            received_before: text("received_before"),
            is_read: flag("is_read"),
            has_attachments: flag("has_attachments"),
            importance: get("importance").as_deref().and_then(Importance::parse),
            search_text: text("search_text"),
            sort_by: text("sort_by"),
            sort_order: get("sort_order").as_deref().and_then(SortOrder::parse),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEmailsRequest {
    pub max_emails: u32,
}

impl Default for SyncEmailsRequest {
    fn default() -> Self {
        Self { max_emails: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEmailsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub emails_fetched: u32,
    #[serde(default)]
    pub emails_saved: u32,
    #[serde(default)]
    pub total_emails: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub sync_timestamp: Option<String>,
}

impl SyncEmailsResponse {
    /// One-line outcome for a toast.
    pub fn summary(&self) -> String {
        fn noun(n: u32) -> &'static str {
            if n <= 1 { "email" } else { "emails" }
        }
        format!(
            "Fetched {} {} and saved {} new {}",
            self.emails_fetched,
            noun(self.emails_fetched),
            self.emails_saved,
            noun(self.emails_saved)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::query_pairs;

    #[test]
    fn test_filters_only_send_set_fields() {
        let filters = EmailFilters {
            subject_contains: Some("invoice".to_string()),
            is_read: Some(false),
            importance: Some(Importance::High),
            sort_order: Some(SortOrder::Asc),
            ..EmailFilters::default()
        };
        let pairs = query_pairs(&filters);

        assert_eq!(
            pairs,
            vec![
                ("importance".to_string(), "high".to_string()),
                ("is_read".to_string(), "false".to_string()),
                ("sort_order".to_string(), "asc".to_string()),
                ("subject_contains".to_string(), "invoice".to_string()),
            ]
        );
        assert_eq!(filters.active_count(), 4);
        assert!(EmailFilters::default().is_empty());
    }

    #[test]
    fn test_email_parses_with_missing_fields() {
        let email: Email = serde_json::from_str(
            r#"{"id": 5, "subject": "Hi", "sender_email": "x@y.z", "sender_name": "", "is_read": true}"#,
        )
        .unwrap();
        assert_eq!(email.sender_label(), "x@y.z");
        assert!(email.is_read);
        assert!(email.categories.is_empty());
    }

    #[test]
    fn test_sync_summary_pluralizes() {
        let response = SyncEmailsResponse {
            success: true,
            user_id: "u".to_string(),
            emails_fetched: 1,
            emails_saved: 3,
            total_emails: 10,
            message: String::new(),
            sync_timestamp: None,
        };
        assert_eq!(response.summary(), "Fetched 1 email and saved 3 new emails");
    }

    #[test]
    fn test_filters_from_url() {
        let params = [
            ("subject_contains", "invoice"),
            ("is_read", "false"),
            ("has_attachments", "maybe"),
            ("importance", "high"),
            ("sort_order", "sideways"),
            ("search_text", "  "),
        ];
        let filters = EmailFilters::from_query(|key| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        });

        assert_eq!(filters.subject_contains.as_deref(), Some("invoice"));
        assert_eq!(filters.is_read, Some(false));
        assert_eq!(filters.has_attachments, None);
        assert_eq!(filters.importance, Some(Importance::High));
        assert_eq!(filters.sort_order, None);
        assert_eq!(filters.search_text, None);
        assert_eq!(filters.active_count(), 3);
    }

    #[test]
    fn test_importance_parse() {
        assert_eq!(Importance::parse("normal"), Some(Importance::Normal));
        assert_eq!(Importance::parse("urgent"), None);
    }
}
