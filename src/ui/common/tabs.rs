use leptos::prelude::*;

use crate::ui::icon::Icon;

/// Tab item definition
#[derive(Clone, PartialEq)]
pub struct TabItem {
    /// Unique identifier for the tab
    pub id: String,
    /// Display label for the tab
    pub label: String,
    /// Optional icon name
    pub icon: Option<&'static str>,
}

impl TabItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Segmented switch between a few views or filter values
#[component]
pub fn Tabs(
    /// List of tab items
    tabs: Vec<TabItem>,
    /// Currently active tab ID
    #[prop(into)]
    active_tab: Signal<String>,
    /// Callback when tab is changed
    #[prop(into)]
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="tabs-container">
            <div class="tabs-list" role="tablist">
                {tabs.into_iter().map(|tab| {
                    let tab_id = tab.id.clone();
                    let is_active = Signal::derive(move || active_tab.get() == tab_id);
                    let tab_id_for_click = tab.id.clone();

                    view! {
                        <button
                            type="button"
                            class=move || if is_active.get() { "tab-item tab-active" } else { "tab-item" }
                            on:click=move |_| on_change.run(tab_id_for_click.clone())
                            role="tab"
                            aria-selected=move || is_active.get().to_string()
                        >
                            {tab.icon.map(|icon| view! { <Icon name=icon class="w-4 h-4"/> })}
                            <span class="tab-label">{tab.label}</span>
                        </button>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}
