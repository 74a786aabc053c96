//! Mailbox endpoints of the email service

use crate::core::http::{ApiClient, ApiError, ApiRequest, DefaultTransport, Transport};
use crate::core::models::auth::{AuthUrlResponse, ConnectionStatusResponse, EmailConnectionResponse};
use crate::core::models::emails::{
    Email, EmailFilters, EmailResponse, SyncEmailsRequest, SyncEmailsResponse,
};
use crate::core::models::query_pairs;

use super::segment;

#[derive(Debug, Clone)]
pub struct EmailApi<T: Transport = DefaultTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> EmailApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    /// Consent URL the browser is sent to for linking a mailbox.
    pub async fn auth_url(&self) -> Result<AuthUrlResponse, ApiError> {
        self.client.fetch(ApiRequest::get("/emails/auth-url")).await
    }

    pub async fn list(
        &self,
        microsoft_user_id: &str,
        page_num: u32,
        page_size: u32,
        filters: &EmailFilters,
    ) -> Result<EmailResponse, ApiError> {
        let mut request = ApiRequest::get(format!("/emails/{}", segment(microsoft_user_id)))
            .query("page_num", page_num.max(1))
            .query("page_size", page_size.max(1));
        request.query.extend(query_pairs(filters));
        self.client.fetch(request).await
    }

    pub async fn get(&self, microsoft_user_id: &str, email_id: &str) -> Result<Email, ApiError> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/emails/{}/{}",
                segment(microsoft_user_id),
                segment(email_id)
            )))
            .await
    }

    pub async fn mark_as_read(&self, microsoft_user_id: &str, email_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::patch(format!(
            "/emails/{}/{}/read",
            segment(microsoft_user_id),
            segment(email_id)
        ))
        .json(&true)?;
        self.client.send(request).await
    }

    /// Pull new messages from the provider into the backend.
    pub async fn sync(&self, microsoft_user_id: &str) -> Result<SyncEmailsResponse, ApiError> {
        let request = ApiRequest::post(format!("/emails/sync/{}", segment(microsoft_user_id)))
            .json(&SyncEmailsRequest::default())?;
        self.client.fetch(request).await
    }

    pub async fn disconnect(&self, microsoft_user_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("/users/{}/disconnect", segment(microsoft_user_id)))
            .json(&serde_json::json!({ "user_id": microsoft_user_id }))?;
        self.client.send(request).await
    }

    pub async fn connect(&self, user_id: &str) -> Result<ConnectionStatusResponse, ApiError> {
        self.client
            .fetch(ApiRequest::post(format!("/users/{}/connect", segment(user_id))))
            .await
    }

    pub async fn connection_status(&self, user_id: &str) -> Result<EmailConnectionResponse, ApiError> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/users/{}/connection-status",
                segment(user_id)
            )))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::core::http::mock::MockTransport;
    use crate::core::http::{ApiClientBuilder, Method};
    use crate::core::models::emails::Importance;
    use crate::core::session::SessionHandle;

    fn api(mock: &MockTransport) -> EmailApi<MockTransport> {
        let session = SessionHandle::in_memory();
        EmailApi::new(
            ApiClientBuilder::new("https://mail.test", Arc::new(session.scoped_to("obwb")), mock.clone())
                .hard_logout()
                .build(),
        )
    }

    fn empty_page() -> serde_json::Value {
        json!({
            "emails": [],
            "pagination": {"page_num": 2, "page_size": 25, "total_items": 0, "total_pages": 0,
                           "has_next": false, "has_prev": true}
        })
    }

    #[tokio::test]
    async fn test_list_sends_page_and_filters() {
        let mock = MockTransport::new();
        mock.push_json(200, empty_page());
        let filters = EmailFilters {
            search_text: Some("quote".to_string()),
            importance: Some(Importance::High),
            ..EmailFilters::default()
        };

        let page = api(&mock).list("ms-1", 2, 25, &filters).await.unwrap();

        assert!(page.emails.is_empty());
        assert!(page.pagination.has_prev);
        assert_eq!(
            mock.requests()[0].url,
            "https://mail.test/emails/ms-1?page_num=2&page_size=25&importance=high&search_text=quote"
        );
    }

    #[tokio::test]
    async fn test_mark_as_read_patches_true() {
        let mock = MockTransport::new();
        mock.push(crate::core::http::RawResponse::new(200, "null"));

        api(&mock).mark_as_read("ms-1", "42").await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.url, "https://mail.test/emails/ms-1/42/read");
        assert_eq!(request.body.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_sync_requests_one_hundred() {
        let mock = MockTransport::new();
        mock.push_json(
            200,
            json!({"success": true, "user_id": "ms-1", "emails_fetched": 3, "emails_saved": 2,
                   "total_emails": 10, "message": "ok", "sync_timestamp": "2025-01-01T00:00:00"}),
        );

        let result = api(&mock).sync("ms-1").await.unwrap();

        assert_eq!(result.emails_saved, 2);
        let request = mock.last_request().unwrap();
        assert_eq!(request.url, "https://mail.test/emails/sync/ms-1");
        assert_eq!(request.body.as_deref(), Some(r#"{"max_emails":100}"#));
    }

    #[tokio::test]
    async fn test_disconnect_and_status_paths() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"ok": true}));
        mock.push_json(
            200,
            json!({"id": 1, "email": "a@b.co", "microsoft_user_id": "ms-1", "connected": true}),
        );
        let api = api(&mock);

        api.disconnect("ms-1").await.unwrap();
        let status = api.connection_status("1").await.unwrap();

        assert!(status.connected);
        let requests = mock.requests();
        assert_eq!(requests[0].url, "https://mail.test/users/ms-1/disconnect");
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"user_id":"ms-1"}"#));
        assert_eq!(requests[1].url, "https://mail.test/users/1/connection-status");
    }

    #[tokio::test]
    async fn test_ids_are_path_encoded() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": 1}));

        api(&mock).get("ms/1", "a b").await.unwrap();

        assert_eq!(mock.requests()[0].url, "https://mail.test/emails/ms%2F1/a%20b");
    }
}
