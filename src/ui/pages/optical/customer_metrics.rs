use leptos::prelude::*;

use super::{ReportTable, money, report_body, whole};
use crate::core::format::{format_number, format_percent};
use crate::core::models::optical::CustomerData;
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::ui::common::{BarChart, ChartBar, PageHeader, StatsCard};
use crate::ui::icons;
use crate::ui::query::use_query;

#[component]
pub fn CustomerMetricsPage() -> impl IntoView {
    let report = use_query(
        || Some((keys::optical("customer-metrics"), ())),
        LIST_STALE_TIME,
        |api, ()| async move { api.optical.customer_metrics().await },
    );

    view! {
        <div class="flex flex-col gap-6">
            <PageHeader icon=icons::USERS title="Customer Metrics" subtitle="Segments, lifetime value and retention"/>
            {report_body(report, |data| view! { <CustomerReport data=data/> })}
        </div>
    }
}

#[component]
fn CustomerReport(data: CustomerData) -> impl IntoView {
    let (top_value, top_name) = data
        .top_customer()
        .map(|c| (money(c.spent), c.name.clone()))
        .unwrap_or_else(|| ("-".to_string(), "No purchases yet".to_string()));

    let segment_counts = data
        .segments
        .iter()
        .map(|s| ChartBar::new(s.name.clone(), s.count as f64))
        .collect::<Vec<_>>();
    let segment_revenue = data
        .segments
        .iter()
        .map(|s| ChartBar::new(s.name.clone(), s.revenue))
        .collect::<Vec<_>>();
    let retention_bars = data
        .retention
        .iter()
        .map(|(bucket, stats)| ChartBar::new(bucket.clone(), stats.percentage))
        .collect::<Vec<_>>();

    let segment_rows = data
        .segments
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                whole(s.count as f64),
                format_percent(s.percentage),
                money(s.revenue),
                money(s.avg_revenue),
            ]
        })
        .collect::<Vec<_>>();
    let customer_rows = data
        .top_customers
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                money(c.spent),
                whole(c.transactions as f64),
                money(c.avg_transaction),
                format_number(c.frequency, 1),
                c.segment.clone(),
            ]
        })
        .collect::<Vec<_>>();

    view! {
        <div class="grid gap-4 sm:grid-cols-2 xl:grid-cols-3">
            <StatsCard title="Total customers" value=whole(data.total_customers as f64) icon=icons::USERS/>
            <StatsCard
                title="Average CLV"
                value=format!("AED {}", format_number(data.average_clv, 0))
                caption="Customer lifetime value".to_string()
            />
            <StatsCard title="One-time buyers" value=format_percent(data.one_time_buyer_rate) caption="Retention challenge".to_string()/>
            <StatsCard
                title="VIP customers"
                value=whole(data.vip_customers as f64)
                caption=format!("{} of customer base", format_percent(data.vip_share()))
                icon=icons::AWARD
            />
            <StatsCard title="Retention rate" value=format_percent(data.retention_rate) caption="Multiple orders".to_string() icon=icons::REFRESH/>
            <StatsCard title="Top customer" value=top_value caption=top_name/>
        </div>

        <div class="grid gap-6 lg:grid-cols-2">
            <BarChart title="Customers per segment" bars=segment_counts format=whole/>
            <BarChart title="Revenue per segment" bars=segment_revenue format=money/>
        </div>
        <BarChart title="Retention categories" bars=retention_bars format=format_percent/>

        <ReportTable
            title="Value segments"
            headers=&["Segment", "Customers", "Share", "Revenue", "Avg revenue"]
            rows=segment_rows
        />
        <ReportTable
            title="Top customers"
            headers=&["Customer", "Spent", "Transactions", "Avg transaction", "Frequency", "Segment"]
            rows=customer_rows
        />
    }
}
