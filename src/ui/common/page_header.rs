use leptos::prelude::*;

use crate::ui::icon::Icon;

/// Page heading with an icon and optional controls on the right
#[component]
pub fn PageHeader(
    icon: &'static str,
    #[prop(into)]
    title: String,
    #[prop(optional, into)]
    subtitle: Option<String>,
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-4 md:flex-row md:items-center md:justify-between">
            <div>
                <h1 class="title-xl text-theme-primary flex items-center gap-2">
                    <Icon name=icon class="w-6 h-6"/>
                    {title}
                </h1>
                {subtitle.map(|s| view! { <p class="text-sm text-theme-secondary mt-1">{s}</p> })}
            </div>
            {children.map(|c| view! { <div class="flex flex-wrap items-center gap-2">{c()}</div> })}
        </div>
    }
}
