use leptos::prelude::*;

use super::{ReportTable, money, report_body, whole};
use crate::core::format::{format_compact, format_number, format_percent};
use crate::core::models::optical::BranchPerformanceData;
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::ui::common::{BarChart, ChartBar, PageHeader, StatsCard};
use crate::ui::icons;
use crate::ui::query::use_query;

/// Return rate, in percent, above which a branch is called out.
const HIGH_RETURN_RATE: f64 = 5.0;

#[component]
pub fn BranchPerformancePage() -> impl IntoView {
    let report = use_query(
        || Some((keys::optical("branch-performance"), ())),
        LIST_STALE_TIME,
        |api, ()| async move { api.optical.branch_performance().await },
    );

    view! {
        <div class="flex flex-col gap-6">
            <PageHeader icon=icons::BUILDING title="Branch Performance" subtitle="Revenue, profitability and returns per location"/>
            {report_body(report, |data| view! { <BranchReport data=data/> })}
        </div>
    }
}

#[component]
fn BranchReport(data: BranchPerformanceData) -> impl IntoView {
    let top_revenue = data
        .top_by_revenue(10)
        .into_iter()
        .map(|b| ChartBar::new(b.name.clone(), b.revenue))
        .collect::<Vec<_>>();
    let contribution = data
        .revenue_contribution()
        .into_iter()
        .map(|(name, share)| ChartBar::new(name, share))
        .collect::<Vec<_>>();
    let margins = data
        .branches
        .iter()
        .map(|b| ChartBar::new(b.name.clone(), b.profit_margin))
        .collect::<Vec<_>>();
    let average_ticket = data
        .branches
        .iter()
        .map(|b| ChartBar::new(b.name.clone(), b.avg_transaction))
        .collect::<Vec<_>>();
    let flagged = data
        .high_return_branches(HIGH_RETURN_RATE)
        .into_iter()
        .map(|b| format!("{} ({})", b.name, format_percent(b.return_rate)))
        .collect::<Vec<_>>();
    let rows = data
        .branches
        .iter()
        .map(|b| {
            vec![
                b.name.clone(),
                money(b.revenue),
                money(b.net_revenue),
                money(b.profit),
                format_percent(b.profit_margin),
                format_percent(b.return_rate),
                whole(b.transactions as f64),
                money(b.avg_transaction),
            ]
        })
        .collect::<Vec<_>>();

    view! {
        <div class="grid gap-4 sm:grid-cols-2 xl:grid-cols-3">
            <StatsCard
                title="Total transactions"
                value=whole(data.total_transactions as f64)
                caption=format!("{}% valid records", format_number(data.valid_records as f64, 0))
                icon=icons::PACKAGE
            />
            <StatsCard title="Total revenue" value=money(data.total_revenue) caption="Gross sales revenue".to_string() icon=icons::AWARD/>
            <StatsCard title="Profit margin" value=format_percent(data.profit_margin) caption="Overall company".to_string()/>
            <StatsCard title="Return rate" value=format_percent(data.return_rate) caption="Company-wide average".to_string() icon=icons::REFRESH/>
            <StatsCard title="Active branches" value=data.active_branches.to_string() caption="Locations analyzed".to_string() icon=icons::BUILDING/>
            <StatsCard
                title="Return impact"
                value=format!("AED {}", format_compact(data.return_impact, 2))
                caption=format!("{}% revenue loss", format_number(data.revenue_loss, 2))
                icon=icons::WARNING
            />
        </div>

        {(!flagged.is_empty()).then(|| view! {
            <div class="warning-message">
                <span>
                    <strong>"High return rate branches: "</strong>
                    {flagged.join(", ")}
                </span>
            </div>
        })}

        <div class="grid gap-6 lg:grid-cols-2">
            <BarChart title="Top 10 branches by revenue" bars=top_revenue format=money/>
            <BarChart title="Revenue contribution" bars=contribution format=format_percent/>
            <BarChart title="Profit margin by branch" bars=margins format=format_percent/>
            <BarChart title="Average transaction by branch" bars=average_ticket format=money/>
        </div>

        <ReportTable
            title="All branches"
            headers=&["Branch", "Revenue", "Net revenue", "Profit", "Margin", "Return rate", "Transactions", "Avg transaction"]
            rows=rows
        />
    }
}
