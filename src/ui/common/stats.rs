use leptos::prelude::*;

use crate::ui::icon::Icon;

/// Headline figure with a label, used at the top of report pages
#[component]
pub fn StatsCard(
    #[prop(into)]
    title: String,
    /// Pre-formatted value
    #[prop(into)]
    value: Signal<String>,
    #[prop(optional)]
    icon: Option<&'static str>,
    /// Small line under the value
    #[prop(optional, into)]
    caption: Option<Signal<String>>,
) -> impl IntoView {
    view! {
        <div class="card p-5 flex items-start justify-between gap-4">
            <div class="min-w-0">
                <p class="text-sm font-medium text-theme-secondary">{title}</p>
                <p class="mt-1 text-2xl font-semibold text-theme-primary truncate">{move || value.get()}</p>
                {caption.map(|c| view! { <p class="mt-1 text-xs text-theme-tertiary">{move || c.get()}</p> })}
            </div>
            {icon.map(|name| view! {
                <div class="p-2 rounded-lg bg-accent-primary/10">
                    <Icon name=name class="w-6 h-6"/>
                </div>
            })}
        </div>
    }
}
