use leptos::prelude::*;

use super::{ReportTable, money, report_body, whole};
use crate::core::format::{format_number, format_percent};
use crate::core::models::optical::InventoryData;
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::ui::common::{BarChart, ChartBar, PageHeader, StatsCard};
use crate::ui::icons;
use crate::ui::query::use_query;

#[component]
pub fn InventoryPage() -> impl IntoView {
    let report = use_query(
        || Some((keys::optical("inventory"), ())),
        LIST_STALE_TIME,
        |api, ()| async move { api.optical.inventory().await },
    );

    view! {
        <div class="flex flex-col gap-6">
            <PageHeader icon=icons::PACKAGE title="Inventory" subtitle="Categories, brands and price points"/>
            {report_body(report, |data| view! { <InventoryReport data=data/> })}
        </div>
    }
}

#[component]
fn InventoryReport(data: InventoryData) -> impl IntoView {
    let leading_category = data
        .categories
        .iter()
        .max_by(|a, b| a.market_share.total_cmp(&b.market_share));
    let leading_brand = data
        .top_brands
        .iter()
        .max_by(|a, b| a.brand_score.total_cmp(&b.brand_score));

    let (category_name, category_share) = leading_category
        .map(|c| (c.name.clone(), format_percent(c.market_share)))
        .unwrap_or_else(|| ("-".to_string(), "0%".to_string()));
    let (brand_name, brand_score) = leading_brand
        .map(|b| (b.name.clone(), format_number(b.brand_score, 1)))
        .unwrap_or_else(|| ("-".to_string(), "0".to_string()));

    let category_revenue = data
        .categories
        .iter()
        .map(|c| ChartBar::new(c.name.clone(), c.revenue))
        .collect::<Vec<_>>();
    let category_margin = data
        .categories
        .iter()
        .map(|c| ChartBar::new(c.name.clone(), c.margin))
        .collect::<Vec<_>>();
    let brand_revenue = data
        .top_brands
        .iter()
        .map(|b| ChartBar::new(b.name.clone(), b.revenue))
        .collect::<Vec<_>>();
    let price_points = data
        .price_points
        .iter()
        .map(|p| ChartBar::new(p.range.clone(), p.market_share))
        .collect::<Vec<_>>();
    let margin_brands = data
        .top_margin_brands
        .iter()
        .map(|b| ChartBar::new(b.name.clone(), b.margin))
        .collect::<Vec<_>>();

    let product_rows = data
        .top_products
        .iter()
        .map(|p| {
            vec![
                format!("#{} {}", p.rank, p.name),
                p.brand.clone(),
                p.category.clone(),
                whole(p.quantity as f64),
                money(p.revenue),
            ]
        })
        .collect::<Vec<_>>();
    let category_rows = data
        .categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                money(c.revenue),
                whole(c.quantity as f64),
                format_percent(c.market_share),
                format_number(c.performance_score, 1),
                format_percent(c.margin),
            ]
        })
        .collect::<Vec<_>>();

    view! {
        <div class="grid gap-4 sm:grid-cols-2 xl:grid-cols-3">
            <StatsCard
                title="Product portfolio"
                value=whole(data.total_product_portfolio as f64)
                caption=format!("Unique items | {} brands", data.total_brands)
                icon=icons::PACKAGE
            />
            <StatsCard title="Total revenue" value=money(data.total_revenue) caption="Product sales revenue".to_string()/>
            <StatsCard
                title="Data quality"
                value=format_percent(data.data_quality)
                caption=format!("{} valid records", whole(data.valid_records as f64))
            />
            <StatsCard title="Top category" value=category_name.clone() caption=format!("{} market share", category_share)/>
            <StatsCard title="Top brand" value=brand_name caption=format!("{} performance score", brand_score) icon=icons::AWARD/>
            <StatsCard
                title="Market concentration"
                value=category_share
                caption=format!("{} dominance risk", category_name)
                icon=icons::WARNING
            />
        </div>

        <div class="grid gap-6 lg:grid-cols-2">
            <BarChart title="Revenue by category" bars=category_revenue format=money/>
            <BarChart title="Top brands by revenue" bars=brand_revenue format=money/>
        </div>
        <BarChart title="Revenue share by price point" bars=price_points format=format_percent/>
        <div class="grid gap-6 lg:grid-cols-2">
            <BarChart title="Margin by category" bars=category_margin format=format_percent/>
            <BarChart title="Highest margin brands" bars=margin_brands format=format_percent/>
        </div>

        <ReportTable
            title="Top products"
            headers=&["Product", "Brand", "Category", "Quantity", "Revenue"]
            rows=product_rows
        />
        <ReportTable
            title="Category performance"
            headers=&["Category", "Revenue", "Quantity", "Market share", "Score", "Margin"]
            rows=category_rows
        />
    }
}
