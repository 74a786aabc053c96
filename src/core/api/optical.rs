//! Optical analytics reports from the dashboard API

use crate::core::http::{ApiClient, ApiError, ApiRequest, DefaultTransport, Transport};
use crate::core::models::optical::{
    BranchPerformanceData, CustomerData, InventoryData, StaffPerformanceData,
};

#[derive(Debug, Clone)]
pub struct OpticalApi<T: Transport = DefaultTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> OpticalApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn branch_performance(&self) -> Result<BranchPerformanceData, ApiError> {
        self.client
            .fetch(ApiRequest::get("/optical/branch-performance"))
            .await
    }

    pub async fn customer_metrics(&self) -> Result<CustomerData, ApiError> {
        self.client
            .fetch(ApiRequest::get("/optical/customer-metrics"))
            .await
    }

    pub async fn staff_performance(&self) -> Result<StaffPerformanceData, ApiError> {
        self.client
            .fetch(ApiRequest::get("/optical/staff-performance"))
            .await
    }

    pub async fn inventory(&self) -> Result<InventoryData, ApiError> {
        self.client.fetch(ApiRequest::get("/optical/inventory")).await
    }
}
