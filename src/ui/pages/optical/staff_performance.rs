use leptos::prelude::*;

use super::{ReportTable, money, report_body, whole};
use crate::core::format::{format_compact, format_number, format_percent};
use crate::core::models::optical::StaffPerformanceData;
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::ui::common::{BarChart, ChartBar, PageHeader, StatsCard};
use crate::ui::icons;
use crate::ui::query::use_query;

/// Rows in the ranking table.
const RANKING_SIZE: usize = 15;

#[component]
pub fn StaffPerformancePage() -> impl IntoView {
    let report = use_query(
        || Some((keys::optical("staff-performance"), ())),
        LIST_STALE_TIME,
        |api, ()| async move { api.optical.staff_performance().await },
    );

    view! {
        <div class="flex flex-col gap-6">
            <PageHeader icon=icons::AWARD title="Staff Performance" subtitle="Sales, productivity and profitability per staff member"/>
            {report_body(report, |data| view! { <StaffReport data=data/> })}
        </div>
    }
}

#[component]
fn StaffReport(data: StaffPerformanceData) -> impl IntoView {
    let totals = &data.company_totals;
    let top = &totals.top_performer;

    let top_sales = data
        .top_performers
        .top_sales_performers
        .iter()
        .take(10)
        .map(|m| ChartBar::new(m.sales_person.clone(), m.total_sales))
        .collect::<Vec<_>>();
    let classes = data
        .class_distribution()
        .into_iter()
        .map(|(class, count)| ChartBar::new(class, count as f64))
        .collect::<Vec<_>>();
    let quartile_share = data
        .quartile_analysis
        .iter()
        .map(|(quartile, q)| ChartBar::new(quartile.clone(), q.revenue_share))
        .collect::<Vec<_>>();
    let productivity = data
        .top_performers
        .top_productivity_leaders
        .iter()
        .take(10)
        .map(|l| ChartBar::new(l.sales_person.clone(), l.daily_sales))
        .collect::<Vec<_>>();
    let profitability = data
        .top_performers
        .top_profitability_leaders
        .iter()
        .take(10)
        .map(|l| ChartBar::new(l.sales_person.clone(), l.revenue_weighted_profit_percentage))
        .collect::<Vec<_>>();

    let mut ranked = data.all_staff_performance.iter().collect::<Vec<_>>();
    ranked.sort_by_key(|m| m.sales_rank);
    let rows = ranked
        .into_iter()
        .take(RANKING_SIZE)
        .map(|m| {
            vec![
                format!("#{} {}", m.sales_rank, m.sales_person),
                money(m.total_sales),
                whole(m.total_transactions as f64),
                money(m.daily_sales),
                money(m.sales_per_transaction),
                format_percent(m.average_profit_percentage),
                format_percent(m.market_share_percentage),
                m.performance_class.clone(),
            ]
        })
        .collect::<Vec<_>>();

    view! {
        <div class="grid gap-4 sm:grid-cols-2 xl:grid-cols-3">
            <StatsCard title="Total staff" value=totals.total_staff.to_string() caption="Sales staff analyzed".to_string() icon=icons::USERS/>
            <StatsCard title="Company sales" value=money(totals.total_sales) caption="Total sales revenue".to_string()/>
            <StatsCard title="Total transactions" value=whole(totals.total_transactions as f64) caption="Transactions processed".to_string()/>
            <StatsCard
                title="Top performer"
                value=top.name.clone()
                caption=format!("AED {} sales", format_compact(top.sales, 2))
                icon=icons::AWARD
            />
            <StatsCard title="Average sales" value=money(totals.average_sales_per_staff) caption="Per staff member".to_string()/>
            <StatsCard
                title="Performance gap"
                value=format!("{}x", format_number(totals.performance_gap, 0))
                caption="Top vs bottom performer".to_string()
                icon=icons::WARNING
            />
        </div>

        <div class="grid gap-6 lg:grid-cols-2">
            <BarChart title="Top 10 staff by sales" bars=top_sales format=money/>
            <BarChart title="Performance classes" bars=classes format=whole/>
        </div>
        <BarChart title="Revenue share by quartile" bars=quartile_share format=format_percent/>
        <div class="grid gap-6 lg:grid-cols-2">
            <BarChart title="Daily sales leaders" bars=productivity format=money/>
            <BarChart title="Profitability leaders" bars=profitability format=format_percent/>
        </div>

        <ReportTable
            title="Sales ranking"
            headers=&["Staff member", "Sales", "Transactions", "Daily sales", "Per transaction", "Avg profit", "Market share", "Class"]
            rows=rows
        />
    }
}
