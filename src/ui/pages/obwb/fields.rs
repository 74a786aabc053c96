//! Bindings between filter structs and form controls, shared by the list pages

use leptos::prelude::*;

use crate::core::models::emails::{Importance, SortOrder};

pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Select value standing for "no filter".
const ANY: &str = "all";

/// Text input bound to one optional field of a draft.
pub fn bind_text<F: Send + Sync + 'static>(
    draft: RwSignal<F>,
    get: fn(&F) -> &Option<String>,
    set: fn(&mut F, Option<String>),
) -> (Signal<String>, Callback<String>) {
    let value = Signal::derive(move || draft.with(|f| get(f).clone().unwrap_or_default()));
    let on_input = Callback::new(move |raw: String| {
        let next = (!raw.trim().is_empty()).then_some(raw);
        draft.update(|f| set(f, next));
    });
    (value, on_input)
}

/// Any/yes/no select bound to one optional flag of a draft.
pub fn bind_flag<F: Send + Sync + 'static>(
    draft: RwSignal<F>,
    get: fn(&F) -> Option<bool>,
    set: fn(&mut F, Option<bool>),
) -> (Signal<String>, Callback<String>) {
    let value = Signal::derive(move || {
        draft.with(|f| get(f).map(|b| b.to_string()).unwrap_or_else(|| ANY.to_string()))
    });
    let on_change = Callback::new(move |raw: String| {
        let next = match raw.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        };
        draft.update(|f| set(f, next));
    });
    (value, on_change)
}

pub fn bind_importance<F: Send + Sync + 'static>(
    draft: RwSignal<F>,
    get: fn(&F) -> Option<Importance>,
    set: fn(&mut F, Option<Importance>),
) -> (Signal<String>, Callback<String>) {
    let value = Signal::derive(move || {
        draft.with(|f| get(f).map(|i| i.to_string()).unwrap_or_else(|| ANY.to_string()))
    });
    let on_change = Callback::new(move |raw: String| draft.update(|f| set(f, Importance::parse(&raw))));
    (value, on_change)
}

pub fn bind_sort_order<F: Send + Sync + 'static>(
    draft: RwSignal<F>,
    get: fn(&F) -> Option<SortOrder>,
    set: fn(&mut F, Option<SortOrder>),
) -> (Signal<String>, Callback<String>) {
    let value = Signal::derive(move || draft.with(|f| get(f).unwrap_or_default().to_string()));
    let on_change = Callback::new(move |raw: String| draft.update(|f| set(f, SortOrder::parse(&raw))));
    (value, on_change)
}

pub fn options(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(v, l)| (v.to_string(), l.to_string())).collect()
}

pub fn importance_options() -> Vec<(String, String)> {
    options(&[
        (ANY, "All importance levels"),
        ("low", "Low"),
        ("normal", "Normal"),
        ("high", "High"),
    ])
}

pub fn sort_order_options() -> Vec<(String, String)> {
    options(&[("desc", "Descending"), ("asc", "Ascending")])
}

/// Options for an any/yes/no filter; `yes` maps to `true`.
pub fn flag_options(any: &str, yes: &str, no: &str) -> Vec<(String, String)> {
    options(&[(ANY, any), ("true", yes), ("false", no)])
}

/// "Show: 25" selector for list pages
#[component]
pub fn PageSizeSelect(
    #[prop(into)]
    value: Signal<u32>,
    #[prop(into)]
    on_change: Callback<u32>,
) -> impl IntoView {
    view! {
        <label class="flex items-center gap-2 text-sm text-theme-secondary">
            "Show:"
            <select
                class="select-base w-20"
                prop:value=move || value.get().to_string()
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                        on_change.run(size);
                    }
                }
            >
                {PAGE_SIZES.iter().map(|size| view! {
                    <option value=size.to_string()>{size.to_string()}</option>
                }).collect_view()}
            </select>
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::emails::EmailFilters;

    #[test]
    fn test_flag_binding() {
        let owner = Owner::new();
        owner.set();

        let draft = RwSignal::new(EmailFilters::default());
        let (value, on_change) = bind_flag(draft, |f| f.is_read, |f, v| f.is_read = v);
        assert_eq!(value.get_untracked(), "all");

        on_change.run("false".to_string());
        assert_eq!(draft.get_untracked().is_read, Some(false));

        on_change.run(ANY.to_string());
        assert_eq!(draft.get_untracked().is_read, None);
    }

    #[test]
    fn test_blank_text_clears_field() {
        let owner = Owner::new();
        owner.set();

        let draft = RwSignal::new(EmailFilters::default());
        let (value, on_input) = bind_text(draft, |f| &f.search_text, |f, v| f.search_text = v);
        on_input.run("invoice".to_string());
        assert_eq!(value.get_untracked(), "invoice");
        on_input.run("   ".to_string());
        assert_eq!(draft.get_untracked().search_text, None);
    }
}
