//! Landing page: sign-in and sign-up
//!
//! A signed-in visitor is sent straight to the dashboard.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_navigate;

use crate::core::routes;
use crate::ui::auth::{LoginForm, SignupForm, use_auth_context};
use crate::ui::sidebar::ThemeToggle;
use crate::ui::theme::use_theme_context;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthTab {
    Login,
    Signup,
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = use_auth_context();
    let theme = use_theme_context();
    let navigate = use_navigate();
    let tab = RwSignal::new(AuthTab::Login);

    let signed_in = Memo::new(move |_| {
        auth.is_hydrated() && auth.read(|s| s.is_authenticated() && !s.is_loading())
    });

    Effect::new(move |_| {
        if signed_in.get() {
            navigate(routes::DASHBOARD, Default::default());
        }
    });

    let logo = move || {
        if theme.is_dark.get() {
            "/images/finitx-logo-light.png"
        } else {
            "/images/finitx-logo-dark.png"
        }
    };

    let tab_class = move |which: AuthTab| {
        move || {
            if tab.get() == which {
                "flex-1 py-4 px-6 text-sm font-medium transition-all duration-200 bg-accent-primary/10 text-accent-primary border-b-2 border-accent-primary"
            } else {
                "flex-1 py-4 px-6 text-sm font-medium transition-all duration-200 text-theme-secondary hover:text-theme-primary hover:bg-theme-secondary"
            }
        }
    };

    view! {
        <Title text="FinitX Dashboard - Sign in"/>

        {move || {
            if !auth.is_hydrated() || signed_in.get() {
                return view! {
                    <div class="min-h-screen flex items-center justify-center bg-theme-primary">
                        <div class="text-center">
                            <div class="animate-spin rounded-full h-12 w-12 border-4 border-accent-primary border-t-transparent mx-auto"></div>
                            <p class="mt-4 text-theme-secondary font-medium">"Loading your dashboard..."</p>
                        </div>
                    </div>
                }.into_any();
            }

            view! {
                <div class="min-h-screen flex">
                    <div class="hidden lg:flex lg:w-1/2 relative overflow-hidden bg-accent-primary/10">
                        <div class="relative mx-auto z-10 flex flex-col justify-center px-12">
                            <div class="flex items-center gap-4">
                                <img src=logo alt="FinitX Logo" width="150" height="40"/>
                                <img src="/images/obwb-logo.png" alt="OBWB Logo" width="150" height="40"/>
                            </div>
                        </div>
                    </div>

                    <div class="flex-1 flex items-center justify-center px-4 sm:px-6 lg:px-8 py-12 bg-theme-secondary relative">
                        <div class="absolute top-4 right-4">
                            <ThemeToggle/>
                        </div>
                        <div class="w-full max-w-md">
                            <div class="flex items-center justify-center gap-4 mb-8 lg:hidden">
                                <img src=logo alt="FinitX Logo" class="h-20 w-auto"/>
                                <img src="/images/obwb-logo.png" alt="OBWB Logo" class="h-20 w-auto"/>
                            </div>

                            <div class="bg-theme-primary rounded-2xl shadow-xl border border-theme overflow-hidden">
                                <div class="flex" role="tablist">
                                    <button role="tab" class=tab_class(AuthTab::Login) on:click=move |_| tab.set(AuthTab::Login)>
                                        "Sign In"
                                    </button>
                                    <button role="tab" class=tab_class(AuthTab::Signup) on:click=move |_| tab.set(AuthTab::Signup)>
                                        "Sign Up"
                                    </button>
                                </div>
                                <div class="p-8">
                                    {move || match tab.get() {
                                        AuthTab::Login => view! {
                                            <LoginForm on_signup_click=move |_| tab.set(AuthTab::Signup)/>
                                        }.into_any(),
                                        AuthTab::Signup => view! {
                                            <SignupForm on_login_click=move |_| tab.set(AuthTab::Login)/>
                                        }.into_any(),
                                    }}
                                </div>
                            </div>
                        </div>
                    </div>
                </div>
            }.into_any()
        }}
    }
}
