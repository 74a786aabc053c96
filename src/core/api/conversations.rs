//! Conversation endpoints of the email service

use crate::core::http::{ApiClient, ApiError, ApiRequest, DefaultTransport, Transport};
use crate::core::models::conversations::{
    ConversationDetailResponse, ConversationFilters, ConversationResponse,
};
use crate::core::models::emails::EmailResponse;
use crate::core::models::query_pairs;

use super::segment;

#[derive(Debug, Clone)]
pub struct ConversationApi<T: Transport = DefaultTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> ConversationApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        microsoft_user_id: &str,
        page_num: u32,
        page_size: u32,
        filters: &ConversationFilters,
    ) -> Result<ConversationResponse, ApiError> {
        let mut request = ApiRequest::get(format!("/conversations/{}", segment(microsoft_user_id)))
            .query("page_num", page_num.max(1))
            .query("page_size", page_size.max(1));
        request.query.extend(query_pairs(filters));
        self.client.fetch(request).await
    }

    pub async fn detail(
        &self,
        microsoft_user_id: &str,
        conversation_id: &str,
        page_num: u32,
        page_size: u32,
    ) -> Result<ConversationDetailResponse, ApiError> {
        let request = ApiRequest::get(format!(
            "/conversations/{}/{}",
            segment(microsoft_user_id),
            segment(conversation_id)
        ))
        .query("page_num", page_num.max(1))
        .query("page_size", page_size.max(1));
        self.client.fetch(request).await
    }

    pub async fn related_emails(
        &self,
        microsoft_user_id: &str,
        conversation_id: &str,
    ) -> Result<EmailResponse, ApiError> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/conversations/{}/{}/related-emails",
                segment(microsoft_user_id),
                segment(conversation_id)
            )))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::core::http::ApiClientBuilder;
    use crate::core::http::mock::MockTransport;
    use crate::core::models::conversations::Participant;
    use crate::core::session::SessionHandle;

    fn api(mock: &MockTransport) -> ConversationApi<MockTransport> {
        let session = SessionHandle::in_memory();
        ConversationApi::new(
            ApiClientBuilder::new("https://mail.test", Arc::new(session), mock.clone()).build(),
        )
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let mock = MockTransport::new();
        mock.push_json(
            200,
            json!({"conversations": [{"conversation_id": "c1", "subject": "Hi", "email_count": 3}],
                   "pagination": {"page_num": 1, "page_size": 25, "total_items": 1, "total_pages": 1,
                                  "has_next": false, "has_prev": false}}),
        );
        let filters = ConversationFilters {
            has_unread: Some(true),
            sort_by: Some("email_count".to_string()),
            ..ConversationFilters::default()
        };

        let page = api(&mock).list("ms-1", 1, 25, &filters).await.unwrap();

        assert_eq!(page.conversations[0].email_count, 3);
        assert_eq!(
            mock.requests()[0].url,
            "https://mail.test/conversations/ms-1?page_num=1&page_size=25&has_unread=true&sort_by=email_count"
        );
    }

    #[tokio::test]
    async fn test_detail_parses_participants() {
        let mock = MockTransport::new();
        mock.push_json(
            200,
            json!({"conversation_id": "c1", "subject": "Hi",
                   "participants": {"from": {"name": "Bo", "email": "bo@x.io"}},
                   "emails": [], "total_emails": 0, "conversation_duration_days": 0,
                   "latest_email_date": "", "first_email_date": ""}),
        );

        let detail = api(&mock).detail("ms-1", "c1", 1, 50).await.unwrap();

        assert!(matches!(detail.participants["from"], Participant::Contact { .. }));
        assert_eq!(
            mock.requests()[0].url,
            "https://mail.test/conversations/ms-1/c1?page_num=1&page_size=50"
        );
    }

    #[tokio::test]
    async fn test_related_emails_path() {
        let mock = MockTransport::new();
        mock.push_json(
            200,
            json!({"emails": [], "pagination": {"page_num": 1, "page_size": 10, "total_items": 0,
                   "total_pages": 0, "has_next": false, "has_prev": false}}),
        );

        api(&mock).related_emails("ms-1", "c1").await.unwrap();

        assert_eq!(
            mock.requests()[0].url,
            "https://mail.test/conversations/ms-1/c1/related-emails"
        );
    }
}
