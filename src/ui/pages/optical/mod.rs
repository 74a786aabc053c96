//! Optical retail analytics reports

mod branch_performance;
mod customer_metrics;
mod inventory;
mod staff_performance;

pub use branch_performance::BranchPerformancePage;
pub use customer_metrics::CustomerMetricsPage;
pub use inventory::InventoryPage;
pub use staff_performance::StaffPerformancePage;

use leptos::prelude::*;

use crate::core::format::{format_compact, format_number};
use crate::ui::common::{ErrorState, LoadingSpinner};
use crate::ui::query::QueryState;

/// Currency prefix used by every report.
const CURRENCY: &str = "AED";

fn money(value: f64) -> String {
    format!("{} {}", CURRENCY, format_compact(value, 1))
}

fn whole(value: f64) -> String {
    format_number(value, 0)
}

/// Loading and error handling shared by the report pages.
fn report_body<T, V>(state: QueryState<T>, render: impl Fn(T) -> V + Send + Sync + 'static) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
    V: IntoView + 'static,
{
    move || {
        if let Some(error) = state.error.get() {
            return view! {
                <ErrorState
                    title="Failed to load report"
                    message=error
                    on_retry=Callback::new(move |_| state.refetch())
                />
            }
            .into_any();
        }
        match state.data.get() {
            None => view! { <LoadingSpinner message="Loading data..."/> }.into_any(),
            Some(data) => render(data).into_any(),
        }
    }
}

/// Simple table with right-aligned numeric columns after the first.
#[component]
fn ReportTable(
    #[prop(into)]
    title: String,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
) -> impl IntoView {
    view! {
        <div class="card overflow-x-auto">
            <h3 class="title-md text-theme-primary p-5 pb-0">{title}</h3>
            <table class="table-base w-full mt-4">
                <thead>
                    <tr>
                        {headers.iter().enumerate().map(|(i, h)| view! {
                            <th class:text-right={i > 0}>{*h}</th>
                        }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows.into_iter().map(|row| view! {
                        <tr>
                            {row.into_iter().enumerate().map(|(i, cell)| view! {
                                <td class:text-right={i > 0} class:tabular-nums={i > 0}>{cell}</td>
                            }).collect_view()}
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_is_compact() {
        assert_eq!(money(1_340_000.0), "AED 1.3M");
        assert_eq!(money(0.0), "AED 0");
    }

    #[test]
    fn test_whole_groups_thousands() {
        assert_eq!(whole(12345.4), "12,345");
    }
}
