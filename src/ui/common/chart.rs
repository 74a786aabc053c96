//! Horizontal bar chart for report pages

use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

impl ChartBar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Bar length as a percentage of the largest value; negatives and NaN are 0.
pub fn bar_widths(bars: &[ChartBar]) -> Vec<f64> {
    let max = bars
        .iter()
        .map(|b| b.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    bars.iter()
        .map(|b| {
            if max <= 0.0 || !b.value.is_finite() || b.value <= 0.0 {
                0.0
            } else {
                (b.value / max * 100.0).min(100.0)
            }
        })
        .collect()
}

fn compact_label(value: f64) -> String {
    crate::core::format::format_compact(value, 1)
}

#[component]
pub fn BarChart(
    #[prop(into)]
    title: String,
    #[prop(into)]
    bars: Signal<Vec<ChartBar>>,
    /// Formats the value printed next to each bar
    #[prop(default = compact_label)]
    format: fn(f64) -> String,
) -> impl IntoView {
    view! {
        <div class="card p-5">
            <h3 class="title-md text-theme-primary mb-4">{title}</h3>
            {move || {
                let bars = bars.get();
                if bars.is_empty() {
                    return view! { <p class="text-sm text-theme-secondary">"No data available"</p> }.into_any();
                }
                let widths = bar_widths(&bars);
                view! {
                    <ul class="space-y-3">
                        {bars.into_iter().zip(widths).map(|(bar, width)| view! {
                            <li>
                                <div class="flex justify-between text-sm mb-1">
                                    <span class="text-theme-primary truncate">{bar.label}</span>
                                    <span class="text-theme-secondary tabular-nums">{format(bar.value)}</span>
                                </div>
                                <div class="h-2 rounded-full bg-theme-tertiary overflow-hidden">
                                    <div
                                        class="h-full rounded-full bg-accent-primary transition-all"
                                        style=format!("width: {:.1}%", width)
                                    ></div>
                                </div>
                            </li>
                        }).collect_view()}
                    </ul>
                }.into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_widths_scale_to_largest() {
        let bars = vec![
            ChartBar::new("North", 200.0),
            ChartBar::new("South", 50.0),
            ChartBar::new("Closed", -10.0),
        ];
        assert_eq!(bar_widths(&bars), vec![100.0, 25.0, 0.0]);
    }

    #[test]
    fn test_bar_widths_all_zero() {
        let bars = vec![ChartBar::new("A", 0.0), ChartBar::new("B", f64::NAN)];
        assert_eq!(bar_widths(&bars), vec![0.0, 0.0]);
    }
}
