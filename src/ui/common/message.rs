//! Inline messages and the error and empty states used by data pages

use crate::ui::{Icon, icons};
use leptos::prelude::*;

/// Error message component
/// Displays an error message with an alert icon
#[component]
pub fn ErrorMessage(
    /// Error signal - shows message when Some, hidden when None
    #[prop(into)]
    error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="error-message">
                <Icon name=icons::ALERT_CIRCLE class="icon-text"/>
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// Full-width failure panel with an optional retry button
#[component]
pub fn ErrorState(
    /// Heading, e.g. "Failed to load emails"
    #[prop(into)]
    title: String,
    /// Underlying error text
    #[prop(into)]
    message: Signal<String>,
    /// Shown as a "Try again" button when set
    #[prop(optional)]
    on_retry: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="card p-8 flex flex-col items-center text-center gap-3" role="alert">
            <Icon name=icons::ALERT_CIRCLE class="w-10 h-10"/>
            <h3 class="title-lg text-theme-error">{title}</h3>
            <p class="text-sm text-theme-secondary max-w-md">{move || message.get()}</p>
            {on_retry.map(|retry| view! {
                <button class="btn-base btn-secondary" on:click=move |_| retry.run(())>
                    <Icon name=icons::REFRESH class="icon-btn"/>
                    "Try again"
                </button>
            })}
        </div>
    }
}

/// Placeholder for an empty list
#[component]
pub fn EmptyState(
    #[prop(default = icons::INFORMATION_CIRCLE)]
    icon: &'static str,
    #[prop(into)]
    title: String,
    /// Secondary line below the title
    #[prop(optional, into)]
    message: Option<String>,
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="card p-10 flex flex-col items-center text-center gap-2">
            <Icon name=icon class="w-10 h-10 opacity-60"/>
            <h3 class="title-md text-theme-primary">{title}</h3>
            {message.map(|m| view! { <p class="text-sm text-theme-secondary max-w-md">{m}</p> })}
            {children.map(|c| view! { <div class="mt-3">{c()}</div> })}
        </div>
    }
}
