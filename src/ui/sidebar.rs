use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::core::routes::{self, NAVIGATION, NavSection};
use crate::ui::auth::{UserMenu, use_auth_context};
use crate::ui::theme::use_theme_context;
use crate::ui::{Icon, icons};

#[component]
pub fn Sidebar(
    /// Called after a link is followed, to close the mobile drawer
    #[prop(into)]
    on_navigate: Callback<()>,
) -> impl IntoView {
    let auth = use_auth_context();
    let location = use_location();

    // Titles of collapsed groups
    let (collapsed, set_collapsed) = signal(Vec::<&'static str>::new());

    let toggle_group = move |title: &'static str| {
        set_collapsed.update(|groups| {
            if groups.contains(&title) {
                groups.retain(|g| *g != title);
            } else {
                groups.push(title);
            }
        });
    };

    let sections = move || {
        NAVIGATION
            .iter()
            .filter(|section| section.service.is_none_or(|s| auth.has_service_access(s)))
            .copied()
            .collect::<Vec<NavSection>>()
    };

    view! {
        <aside class="h-full w-64 flex flex-col bg-theme-surface border-r border-theme-primary theme-transition">
            <div class="px-5 py-4 border-b border-theme-primary">
                <A href=routes::DASHBOARD attr:class="text-lg font-semibold text-theme-primary">"FinitX"</A>
            </div>

            <nav class="flex-1 overflow-y-auto px-3 py-4 space-y-4" aria-label="Main">
                {move || sections().into_iter().map(|section| {
                    let title = section.title;
                    let is_open = move || !collapsed.get().contains(&title);
                    view! {
                        <div>
                            <button
                                type="button"
                                class="w-full flex items-center justify-between px-2 py-1 text-xs font-semibold uppercase tracking-wide text-theme-tertiary hover:text-theme-primary"
                                on:click=move |_| toggle_group(title)
                                aria-expanded=move || is_open().to_string()
                            >
                                {title}
                                <span class="transition-transform" class=("rotate-90", is_open)>
                                    <Icon name=icons::CHEVRON_RIGHT class="w-3 h-3"/>
                                </span>
                            </button>
                            <Show when=is_open>
                                <ul class="mt-1 space-y-0.5">
                                    {section.items.iter().map(|item| {
                                        let path = item.path;
                                        let active = move || routes::is_active(path, &location.pathname.get());
                                        view! {
                                            <li>
                                                <A
                                                    href=path
                                                    attr:class=move || if active() {
                                                        "flex items-center gap-3 px-3 py-2 rounded-lg text-sm font-medium bg-accent-primary text-white"
                                                    } else {
                                                        "flex items-center gap-3 px-3 py-2 rounded-lg text-sm text-theme-secondary hover:bg-theme-secondary hover:text-theme-primary transition-colors"
                                                    }
                                                    on:click=move |_| on_navigate.run(())
                                                >
                                                    <Icon name=item.icon class="w-4 h-4"/>
                                                    {item.label}
                                                </A>
                                            </li>
                                        }
                                    }).collect_view()}
                                </ul>
                            </Show>
                        </div>
                    }
                }).collect_view()}
            </nav>

            <div class="px-3 py-3 border-t border-theme-primary flex items-center justify-between gap-2">
                <UserMenu/>
                <ThemeToggle/>
            </div>
        </aside>
    }
}

/// Cycles between light and dark
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let theme = use_theme_context();

    view! {
        <button
            type="button"
            class="btn-icon"
            title=move || format!("Theme: {}", theme.mode.get().display_name())
            aria-label="Toggle theme"
            on:click=move |_| theme.toggle()
        >
            {move || view! { <Icon name=if theme.is_dark.get() { icons::SUN } else { icons::MOON } class="w-5 h-5"/> }}
        </button>
    }
}
