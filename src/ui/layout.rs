//! Guarded dashboard shell
//!
//! Every `/dashboard` route renders inside [`DashboardLayout`]. It waits for
//! the session to hydrate, validates the stored credentials once, redirects
//! to the landing page when they are missing or rejected, and blocks service
//! pages the user has no access to.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Outlet, Redirect};
use leptos_router::hooks::use_location;

use crate::core::guard::{GuardState, GuardView, RouteGuard, validate_session};
use crate::ui::auth::use_auth_context;
use crate::ui::sidebar::Sidebar;
use crate::ui::{Icon, icons};

#[component]
pub fn DashboardLayout() -> impl IntoView {
    let auth = use_auth_context();
    let location = use_location();
    let guard = RwSignal::new(RouteGuard::new());
    let mobile_open = RwSignal::new(false);

    // Validate stored credentials once persisted state is available.
    Effect::new(move |_| {
        if !auth.hydrated.get() || guard.with_untracked(|g| g.state()) != GuardState::Pending {
            return;
        }
        let has_token = auth.session().read(|s| s.access_token().is_some());
        let mut next = guard.get_untracked();
        let state = next.hydrated(has_token);
        guard.set(next);
        if state != GuardState::Validating {
            return;
        }

        spawn_local(async move {
            let session = auth.session();
            let services = auth.services();
            let outcome = validate_session(&session, &services).await;
            guard.try_update(|g| {
                g.validated(outcome == GuardState::Authorized);
            });
        });
    });

    // Sign-out or a rejected refresh after validation.
    Effect::new(move |_| {
        let authenticated = auth.is_authenticated();
        if !authenticated && guard.with_untracked(|g| g.state() == GuardState::Authorized) {
            leptos::logging::log!("session ended, leaving dashboard");
            guard.update(|g| {
                g.revoke();
            });
        }
    });

    let view_state = Memo::new(move |_| {
        let path = location.pathname.get();
        let current = guard.get();
        auth.read(|store| current.view(store, &path))
    });
    let redirect = Memo::new(move |_| match view_state.get() {
        GuardView::Redirect(path) => Some(path),
        _ => None,
    });
    let ready = Memo::new(move |_| {
        matches!(view_state.get(), GuardView::Render | GuardView::ServiceInactive(_))
    });
    let inactive = Memo::new(move |_| match view_state.get() {
        GuardView::ServiceInactive(service) => Some(service),
        _ => None,
    });

    view! {
        {move || {
            if let Some(path) = redirect.get() {
                return view! { <Redirect path=path/> }.into_any();
            }
            if !ready.get() {
                return view! { <FullPageLoader/> }.into_any();
            }
            view! {
                <div class="flex h-screen bg-theme-primary theme-transition">
                    // Mobile sidebar overlay
                    <div
                        class=move || if mobile_open.get() {
                            "fixed inset-0 bg-black/50 z-40 lg:hidden transition-opacity duration-300 opacity-100"
                        } else {
                            "fixed inset-0 bg-black/50 z-40 lg:hidden transition-opacity duration-300 opacity-0 pointer-events-none"
                        }
                        on:click=move |_| mobile_open.set(false)
                    ></div>

                    <div class=move || if mobile_open.get() {
                        "fixed lg:relative z-50 h-full transform transition-transform duration-300 translate-x-0"
                    } else {
                        "fixed lg:relative z-50 h-full transform transition-transform duration-300 -translate-x-full lg:translate-x-0"
                    }>
                        <Sidebar on_navigate=move |_| mobile_open.set(false)/>
                    </div>

                    <main class="flex-1 overflow-auto">
                        <div class="lg:hidden flex items-center justify-between p-4 border-b border-theme-primary bg-theme-surface">
                            <button class="btn-icon" aria-label="Open menu" on:click=move |_| mobile_open.set(true)>
                                <Icon name=icons::MENU class="w-5 h-5"/>
                            </button>
                            <h1 class="flex-1 text-center text-lg font-semibold text-theme-primary">"Dashboard"</h1>
                            <div class="w-10"></div>
                        </div>

                        <div class="p-4 lg:p-6">
                            {move || match inactive.get() {
                                Some(service) => view! { <ServiceInactive service=service.to_string()/> }.into_any(),
                                None => view! { <Outlet/> }.into_any(),
                            }}
                        </div>
                    </main>
                </div>
            }.into_any()
        }}
    }
}

#[component]
fn FullPageLoader() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-theme-primary">
            <div class="text-center">
                <Icon name=icons::REFRESH class="h-8 w-8 animate-spin mx-auto mb-4"/>
                <p class="mt-2 text-theme-secondary">"Loading..."</p>
            </div>
        </div>
    }
}

#[component]
fn ServiceInactive(service: String) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] px-4 gap-2" role="alert">
            <Icon name=icons::LOCK class="w-10 h-10 opacity-60"/>
            <p class="text-center text-lg font-semibold text-theme-error">"This service is not active for you."</p>
            <p class="text-sm text-theme-secondary">{format!("Ask an administrator to enable {} for your account.", service)}</p>
        </div>
    }
}
