//! AI assistant endpoints of the email service

use crate::core::http::{ApiClient, ApiError, ApiRequest, DefaultTransport, Transport};
use crate::core::models::ai::{
    AiResponse, AiResponsesFilters, AiUsageStatistics, AnalyzeConversationResponse, DigestType,
    FollowUpFilters, FollowUpResponse, GenerateDigestResponse, GenerateResponseRequest,
    RelatedEmailsResponse, ResponsesResponse,
};
use crate::core::models::query_pairs;

use super::segment;

#[derive(Debug, Clone)]
pub struct AiApi<T: Transport = DefaultTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> AiApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn generate_response(
        &self,
        user_id: &str,
        request: &GenerateResponseRequest,
    ) -> Result<AiResponse, ApiError> {
        let request =
            ApiRequest::post(format!("/ai/{}/generate-response", segment(user_id))).json(request)?;
        self.client.fetch(request).await
    }

    pub async fn responses(
        &self,
        user_id: &str,
        filters: AiResponsesFilters,
    ) -> Result<ResponsesResponse, ApiError> {
        let mut request = ApiRequest::get(format!("/ai/{}/responses", segment(user_id)));
        request.query.extend(query_pairs(&filters.normalized()));
        self.client.fetch(request).await
    }

    pub async fn response(&self, user_id: &str, response_id: &str) -> Result<AiResponse, ApiError> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/ai/{}/responses/{}",
                segment(user_id),
                segment(response_id)
            )))
            .await
    }

    pub async fn delete_response(&self, user_id: &str, response_id: &str) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::delete(format!(
                "/ai/{}/responses/{}",
                segment(user_id),
                segment(response_id)
            )))
            .await
    }

    pub async fn stats(&self, user_id: &str) -> Result<AiUsageStatistics, ApiError> {
        self.client
            .fetch(ApiRequest::get(format!("/ai/{}/stats", segment(user_id))))
            .await
    }

    pub async fn clear_cache(&self, user_id: &str, conversation_id: &str) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::post(format!(
                "/ai/{}/clear-cache/{}",
                segment(user_id),
                segment(conversation_id)
            )))
            .await
    }

    pub async fn analyze_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<AnalyzeConversationResponse, ApiError> {
        self.client
            .fetch(ApiRequest::post(format!(
                "/ai/{}/analyze-conversation/{}",
                segment(user_id),
                segment(conversation_id)
            )))
            .await
    }

    pub async fn generate_digest(
        &self,
        user_id: &str,
        digest_type: DigestType,
        date_range: &str,
    ) -> Result<GenerateDigestResponse, ApiError> {
        let request = ApiRequest::post(format!("/ai/{}/generate-digest", segment(user_id)))
            .query("digest_type", digest_type)
            .query("date_range", date_range);
        self.client.fetch(request).await
    }

    pub async fn related_emails(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: u32,
    ) -> Result<RelatedEmailsResponse, ApiError> {
        let request = ApiRequest::get(format!(
            "/ai/{}/related-emails/{}",
            segment(user_id),
            segment(conversation_id)
        ))
        .query("limit", limit);
        self.client.fetch(request).await
    }

    pub async fn follow_ups(
        &self,
        user_id: &str,
        filters: &FollowUpFilters,
    ) -> Result<FollowUpResponse, ApiError> {
        let mut request = ApiRequest::get(format!("/ai/{}/follow-up-emails/", segment(user_id)));
        request.query.extend(query_pairs(filters));
        self.client.fetch(request).await
    }
}
