//! Optical retail analytics datasets
//!
//! The reports are pre-computed by the backend; these types only describe
//! their shape plus a few derived views used by the charts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Branch performance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchData {
    pub name: String,
    pub revenue: f64,
    pub net_revenue: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub return_rate: f64,
    pub transactions: u64,
    pub avg_transaction: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchPerformanceData {
    pub branches: Vec<BranchData>,
    pub total_transactions: u64,
    pub valid_records: u64,
    pub total_revenue: f64,
    pub profit_margin: f64,
    pub return_rate: f64,
    pub active_branches: u32,
    pub return_impact: f64,
    pub revenue_loss: f64,
}

impl BranchPerformanceData {
    /// Branches ordered by revenue, highest first.
    pub fn top_by_revenue(&self, n: usize) -> Vec<&BranchData> {
        let mut branches: Vec<&BranchData> = self.branches.iter().collect();
        branches.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        branches.truncate(n);
        branches
    }

    /// Each branch's share of total revenue, in percent.
    pub fn revenue_contribution(&self) -> Vec<(String, f64)> {
        let total: f64 = self.branches.iter().map(|b| b.revenue).sum();
        if total <= 0.0 {
            return self.branches.iter().map(|b| (b.name.clone(), 0.0)).collect();
        }
        self.branches
            .iter()
            .map(|b| (b.name.clone(), b.revenue / total * 100.0))
            .collect()
    }

    /// Branches whose return rate is at least `threshold` percent, worst first.
    pub fn high_return_branches(&self, threshold: f64) -> Vec<&BranchData> {
        let mut branches: Vec<&BranchData> = self
            .branches
            .iter()
            .filter(|b| b.return_rate >= threshold)
            .collect();
        branches.sort_by(|a, b| b.return_rate.total_cmp(&a.return_rate));
        branches
    }
}

// ============================================================================
// Customer metrics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerSegment {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
    pub revenue: f64,
    pub avg_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopCustomer {
    pub name: String,
    pub spent: f64,
    pub transactions: u64,
    pub avg_transaction: f64,
    pub frequency: f64,
    pub segment: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetentionBucket {
    pub count: u64,
    pub percentage: f64,
    pub revenue: f64,
    pub avg_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerData {
    pub total_customers: u64,
    #[serde(rename = "averageCLV")]
    pub average_clv: f64,
    pub retention_rate: f64,
    pub one_time_buyer_rate: f64,
    pub vip_customers: u64,
    pub segments: Vec<CustomerSegment>,
    pub top_customers: Vec<TopCustomer>,
    pub retention: BTreeMap<String, RetentionBucket>,
}

impl CustomerData {
    /// VIP customers as a percentage of all customers.
    pub fn vip_share(&self) -> f64 {
        if self.total_customers == 0 {
            return 0.0;
        }
        self.vip_customers as f64 / self.total_customers as f64 * 100.0
    }

    pub fn top_customer(&self) -> Option<&TopCustomer> {
        self.top_customers
            .iter()
            .max_by(|a, b| a.spent.total_cmp(&b.spent))
    }
}

// ============================================================================
// Staff performance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffMember {
    #[serde(rename = "Sales_Person")]
    pub sales_person: String,
    #[serde(rename = "Total_Sales")]
    pub total_sales: f64,
    #[serde(rename = "Total_Transactions")]
    pub total_transactions: u64,
    #[serde(rename = "Active_Days")]
    pub active_days: u32,
    #[serde(rename = "Total_Items_Sold")]
    pub total_items_sold: u64,
    #[serde(rename = "Daily_Sales")]
    pub daily_sales: f64,
    #[serde(rename = "Sales_Per_Transaction")]
    pub sales_per_transaction: f64,
    #[serde(rename = "Transactions_Per_Day")]
    pub transactions_per_day: f64,
    #[serde(rename = "Items_Per_Day")]
    pub items_per_day: f64,
    #[serde(rename = "Average_Profit_Percentage")]
    pub average_profit_percentage: f64,
    #[serde(rename = "Revenue_Weighted_Profit_Percentage")]
    pub revenue_weighted_profit_percentage: f64,
    #[serde(rename = "Sales_Rank")]
    pub sales_rank: u32,
    #[serde(rename = "Market_Share_Percentage")]
    pub market_share_percentage: f64,
    #[serde(rename = "Performance_Class")]
    pub performance_class: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductivityLeader {
    #[serde(rename = "Sales_Person")]
    pub sales_person: String,
    #[serde(rename = "Daily_Sales")]
    pub daily_sales: f64,
    #[serde(rename = "Sales_Per_Transaction")]
    pub sales_per_transaction: f64,
    #[serde(rename = "Transactions_Per_Day")]
    pub transactions_per_day: f64,
    #[serde(rename = "Items_Per_Day")]
    pub items_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitabilityLeader {
    #[serde(rename = "Sales_Person")]
    pub sales_person: String,
    #[serde(rename = "Average_Profit_Percentage")]
    pub average_profit_percentage: f64,
    #[serde(rename = "Revenue_Weighted_Profit_Percentage")]
    pub revenue_weighted_profit_percentage: f64,
    #[serde(rename = "Total_Sales")]
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopPerformerSummary {
    pub name: String,
    pub sales: f64,
    pub market_share: f64,
    pub daily_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyTotals {
    pub total_staff: u32,
    pub total_sales: f64,
    pub total_transactions: u64,
    pub average_sales_per_staff: f64,
    pub average_daily_sales: f64,
    pub average_profit_percentage: f64,
    pub revenue_weighted_profit: f64,
    pub performance_gap: f64,
    pub top_performer: TopPerformerSummary,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuartileAnalysis {
    pub count: u32,
    pub percentage: f64,
    pub total_sales: f64,
    pub average_sales: f64,
    pub revenue_share: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopPerformers {
    pub top_sales_performers: Vec<StaffMember>,
    pub top_productivity_leaders: Vec<ProductivityLeader>,
    pub top_profitability_leaders: Vec<ProfitabilityLeader>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffPerformanceData {
    pub company_totals: CompanyTotals,
    pub quartile_analysis: BTreeMap<String, QuartileAnalysis>,
    pub top_performers: TopPerformers,
    pub all_staff_performance: Vec<StaffMember>,
}

impl StaffPerformanceData {
    /// Staff count per performance class.
    pub fn class_distribution(&self) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for member in &self.all_staff_performance {
            *distribution
                .entry(member.performance_class.clone())
                .or_insert(0) += 1;
        }
        distribution
    }
}

// ============================================================================
// Inventory
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCategory {
    pub name: String,
    pub revenue: f64,
    pub quantity: u64,
    pub market_share: f64,
    pub performance_score: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductBrand {
    pub name: String,
    pub revenue: f64,
    pub quantity: u64,
    pub varieties: u32,
    pub brand_score: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricePoint {
    pub range: String,
    pub revenue: f64,
    pub quantity: u64,
    pub market_share: f64,
    pub avg_transaction: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopProduct {
    pub rank: u32,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarginBrand {
    pub name: String,
    pub margin: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryData {
    pub total_product_portfolio: u64,
    pub total_brands: u32,
    pub total_categories: u32,
    pub total_revenue: f64,
    pub total_quantity_sold: u64,
    pub data_quality: f64,
    pub valid_records: u64,
    pub categories: Vec<ProductCategory>,
    pub top_brands: Vec<ProductBrand>,
    pub price_points: Vec<PricePoint>,
    pub top_products: Vec<TopProduct>,
    pub top_margin_brands: Vec<MarginBrand>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_wire_names() {
        let json = r#"{
            "branches": [
                {"name": "North", "revenue": 100.0, "netRevenue": 90.0, "profit": 30.0,
                 "profitMargin": 30.0, "returnRate": 2.0, "transactions": 10, "avgTransaction": 10.0},
                {"name": "South", "revenue": 300.0}
            ],
            "totalTransactions": 40, "activeBranches": 2
        }"#;
        let data: BranchPerformanceData = serde_json::from_str(json).unwrap();

        assert_eq!(data.branches[0].net_revenue, 90.0);
        assert_eq!(data.active_branches, 2);
        assert_eq!(data.top_by_revenue(1)[0].name, "South");

        let shares = data.revenue_contribution();
        assert_eq!(shares[0], ("North".to_string(), 25.0));
        assert_eq!(shares[1], ("South".to_string(), 75.0));
    }

    #[test]
    fn test_staff_wire_names() {
        let json = r#"{
            "company_totals": {"total_staff": 2, "top_performer": {"name": "Ana", "sales": 10.0, "market_share": 60.0, "daily_sales": 1.0}},
            "all_staff_performance": [
                {"Sales_Person": "Ana", "Total_Sales": 10.0, "Performance_Class": "High"},
                {"Sales_Person": "Bo", "Total_Sales": 5.0, "Performance_Class": "High"}
            ]
        }"#;
        let data: StaffPerformanceData = serde_json::from_str(json).unwrap();

        assert_eq!(data.company_totals.top_performer.name, "Ana");
        assert_eq!(data.all_staff_performance[1].sales_person, "Bo");
        assert_eq!(data.class_distribution().get("High"), Some(&2));
    }

    #[test]
    fn test_customer_clv_name() {
        let data: CustomerData =
            serde_json::from_str(r#"{"totalCustomers": 5, "averageCLV": 120.5}"#).unwrap();
        assert_eq!(data.total_customers, 5);
        assert_eq!(data.average_clv, 120.5);
        assert_eq!(data.vip_share(), 0.0);
        assert!(data.top_customer().is_none());
    }

    #[test]
    fn test_vip_share_and_top_customer() {
        let customer = |name: &str, spent: f64| TopCustomer {
            name: name.to_string(),
            spent,
            ..TopCustomer::default()
        };
        let data = CustomerData {
            total_customers: 200,
            vip_customers: 5,
            top_customers: vec![customer("Lina", 900.0), customer("Omar", 1500.0)],
            ..CustomerData::default()
        };
        assert_eq!(data.vip_share(), 2.5);
        assert_eq!(data.top_customer().map(|c| c.name.as_str()), Some("Omar"));
    }

    #[test]
    fn test_high_return_branches() {
        let branch = |name: &str, return_rate: f64| BranchData {
            name: name.to_string(),
            return_rate,
            ..BranchData::default()
        };
        let data = BranchPerformanceData {
            branches: vec![branch("ECOM", 9.97), branch("MALL", 1.2), branch("INSUR", 102.91)],
            ..BranchPerformanceData::default()
        };
        let flagged: Vec<&str> = data
            .high_return_branches(5.0)
            .into_iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(flagged, ["INSUR", "ECOM"]);
    }

    #[test]
    fn test_revenue_contribution_with_zero_total() {
        let data = BranchPerformanceData {
            branches: vec![BranchData {
                name: "Empty".to_string(),
                ..BranchData::default()
            }],
            ..BranchPerformanceData::default()
        };
        assert_eq!(data.revenue_contribution(), vec![("Empty".to_string(), 0.0)]);
    }
}
