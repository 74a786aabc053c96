//! AI assistant payloads: digests, generated replies, analysis, follow-ups

use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Largest page the responses endpoint accepts.
pub const MAX_RESPONSES_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestType {
    #[default]
    #[display("daily")]
    Daily,
    #[display("real_time")]
    RealTime,
}

impl DigestType {
    pub fn label(&self) -> &'static str {
        match self {
            DigestType::Daily => "Daily",
            DigestType::RealTime => "Real-time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub description: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEmail {
    pub email_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateDigestResponse {
    pub digest_id: String,
    #[serde(default)]
    pub user_id: String,
    pub digest_type: DigestType,
    #[serde(default)]
    pub date_range: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub priority_emails: Vec<PriorityEmail>,
    #[serde(default)]
    pub conversation_summaries: Vec<ConversationSummary>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponseRequest {
    pub conversation_id: String,
    pub force_regenerate: bool,
    pub context: String,
    pub max_tokens: u32,
}

impl GenerateResponseRequest {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            force_regenerate: false,
            context: String::new(),
            max_tokens: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub id: String,
    pub conversation_id: String,
    #[serde(default)]
    pub user_id: String,
    pub response_text: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub tokens_used: u64,
    #[serde(default)]
    pub processing_time_ms: f64,
    #[serde(default)]
    pub is_cached: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesResponse {
    pub responses: Vec<AiResponse>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page_num: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiResponsesFilters {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl AiResponsesFilters {
    /// Clamp the page size into `1..=MAX_RESPONSES_PAGE_SIZE`.
    pub fn normalized(mut self) -> Self {
        self.page_num = self.page_num.max(1);
        self.page_size = self.page_size.clamp(1, MAX_RESPONSES_PAGE_SIZE);
        self
    }
}

impl Default for AiResponsesFilters {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 20,
            conversation_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiUsageStatistics {
    #[serde(default)]
    pub total_responses_generated: u64,
    #[serde(default)]
    pub total_tokens_used: u64,
    #[serde(default)]
    pub average_processing_time_ms: f64,
    #[serde(default)]
    pub cache_hit_rate: f64,
    #[serde(default)]
    pub most_used_model: String,
    #[serde(default)]
    pub responses_by_month: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_cost_estimate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeConversationResponse {
    pub conversation_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub urgency_level: String,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub participants_summary: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEmail {
    pub email_id: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub received_date: String,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub relevance_reason: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEmailsResponse {
    pub conversation_id: String,
    #[serde(default)]
    pub related_emails: Vec<RelatedEmail>,
    #[serde(default)]
    pub total_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpPriority {
    #[display("low")]
    Low,
    #[display("medium")]
    Medium,
    #[default]
    #[display("high")]
    High,
}

impl FollowUpPriority {
    pub const ALL: [FollowUpPriority; 3] = [
        FollowUpPriority::Low,
        FollowUpPriority::Medium,
        FollowUpPriority::High,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.to_string() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowUpFilters {
    pub priority: FollowUpPriority,
    pub page_num: u32,
    pub page_size: u32,
}

impl Default for FollowUpFilters {
    fn default() -> Self {
        Self {
            priority: FollowUpPriority::High,
            page_num: 1,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpEmail {
    pub email_id: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub received_date: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub urgency_reason: String,
    #[serde(default)]
    pub suggested_action: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub days_since_received: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpResponse {
    #[serde(default)]
    pub emails: Vec<FollowUpEmail>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page_num: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub priority_breakdown: BTreeMap<String, u64>,
}

impl FollowUpResponse {
    pub fn pagination(&self) -> super::Pagination {
        super::Pagination::compute(self.page_num.max(1), self.page_size, self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_type_wire_names() {
        assert_eq!(serde_json::to_string(&DigestType::RealTime).unwrap(), r#""real_time""#);
        assert_eq!(DigestType::RealTime.to_string(), "real_time");
        assert_eq!(DigestType::default(), DigestType::Daily);
    }

    #[test]
    fn test_responses_page_size_is_clamped() {
        let filters = AiResponsesFilters {
            page_num: 0,
            page_size: 500,
            conversation_id: None,
        }
        .normalized();
        assert_eq!(filters.page_num, 1);
        assert_eq!(filters.page_size, 100);
    }

    #[test]
    fn test_follow_up_defaults() {
        let filters = FollowUpFilters::default();
        assert_eq!(filters.priority, FollowUpPriority::High);
        assert_eq!(filters.page_size, 10);
        assert_eq!(FollowUpPriority::parse("medium"), Some(FollowUpPriority::Medium));
    }

    #[test]
    fn test_digest_parses() {
        let json = r#"{
            "digest_id": "d1", "user_id": "u1", "digest_type": "daily", "date_range": "today",
            "summary": "Quiet day", "key_insights": ["one"],
            "action_items": [{"description": "Reply", "deadline": null, "priority": "high", "conversation_id": "c1"}],
            "priority_emails": [], "conversation_summaries": [], "created_at": "2025-01-01T00:00:00"
        }"#;
        let digest: GenerateDigestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(digest.action_items[0].description, "Reply");
        assert!(digest.action_items[0].deadline.is_none());
    }
}
