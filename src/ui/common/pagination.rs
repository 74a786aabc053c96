//! Pager for paginated lists

use leptos::prelude::*;

use crate::core::models::Pagination;
use crate::ui::icon::{Icon, icons};

/// Number of page buttons shown around the current page
const PAGE_WINDOW: u32 = 5;

#[component]
pub fn Pager(
    /// Metadata of the page being shown
    #[prop(into)]
    pagination: Signal<Pagination>,
    /// Called with the requested 1-based page
    #[prop(into)]
    on_page: Callback<u32>,
    /// Noun used in the "Showing 1-25 of 80 emails" line
    #[prop(default = "items")]
    noun: &'static str,
) -> impl IntoView {
    view! {
        <Show when=move || { pagination.get().total_pages > 1 }>
            <div class="flex flex-col sm:flex-row items-center justify-between gap-3 pt-4">
                <p class="text-sm text-theme-secondary">
                    {move || {
                        let p = pagination.get();
                        format!("Showing {}-{} of {} {}", p.first_item(), p.last_item(), p.total_items, noun)
                    }}
                </p>
                <nav class="flex items-center gap-1" aria-label="Pagination">
                    <button
                        class="btn-base btn-ghost btn-sm"
                        disabled=move || !pagination.get().has_prev
                        on:click=move |_| on_page.run(pagination.get_untracked().page_num.saturating_sub(1).max(1))
                        aria-label="Previous page"
                    >
                        <Icon name=icons::CHEVRON_LEFT class="w-4 h-4"/>
                    </button>
                    {move || {
                        let p = pagination.get();
                        p.visible_pages(PAGE_WINDOW).into_iter().map(|page| {
                            let class = if page == p.page_num {
                                "btn-base btn-primary btn-sm min-w-8"
                            } else {
                                "btn-base btn-ghost btn-sm min-w-8"
                            };
                            view! {
                                <button class=class on:click=move |_| on_page.run(page)>
                                    {page}
                                </button>
                            }
                        }).collect_view()
                    }}
                    <button
                        class="btn-base btn-ghost btn-sm"
                        disabled=move || !pagination.get().has_next
                        on:click=move |_| on_page.run(pagination.get_untracked().page_num + 1)
                        aria-label="Next page"
                    >
                        <Icon name=icons::CHEVRON_RIGHT class="w-4 h-4"/>
                    </button>
                </nav>
            </div>
        </Show>
    }
}
