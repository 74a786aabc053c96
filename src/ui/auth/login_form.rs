//! Login form component
//!
//! Email and password sign-in against the dashboard API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::context::use_auth_context;
use crate::core::models::auth::LoginRequest;
use crate::core::validation::validate_login;
use crate::ui::icon::{Icon, icons};

/// Login form component
#[component]
pub fn LoginForm(
    /// Callback when login is successful
    #[prop(optional, into)]
    on_success: Option<Callback<()>>,
    /// Callback to switch to the signup form
    #[prop(optional, into)]
    on_signup_click: Option<Callback<()>>,
) -> impl IntoView {
    let auth = use_auth_context();

    // Form state
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);

    let email_error = RwSignal::new(None::<String>);
    let password_error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();

        let credentials = LoginRequest {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        let checked = validate_login(&credentials);
        email_error.set(checked.for_field("email").map(ToString::to_string));
        password_error.set(checked.for_field("password").map(ToString::to_string));
        if !checked.is_valid() {
            return;
        }

        spawn_local(async move {
            // Failures are reported through `auth.error`.
            if auth.login(credentials).await.is_ok()
                && let Some(callback) = on_success
            {
                callback.run(());
            }
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-6" novalidate=true>
            <div class="text-center">
                <h2 class="text-2xl font-bold text-theme-primary">"Welcome Back"</h2>
                <p class="mt-2 text-sm text-theme-secondary">"Sign in to your account to continue"</p>
            </div>

            // Global error message
            {move || {
                auth.error.get().map(|error| {
                    view! {
                        <div class="p-3 bg-red-100 dark:bg-red-900/30 border border-red-300 dark:border-red-700 rounded-lg">
                            <p class="text-sm text-red-700 dark:text-red-300">{error}</p>
                        </div>
                    }
                })
            }}

            <div>
                <label for="email" class="block text-sm font-medium text-theme-primary mb-1">"Email"</label>
                <input
                    type="email"
                    id="email"
                    name="email"
                    autocomplete="email"
                    placeholder="you@example.com"
                    class="w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg
                           text-theme-primary placeholder-theme-tertiary
                           focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                           transition-colors"
                    class:border-red-500=move || email_error.get().is_some()
                    prop:value=move || email.get()
                    on:input=move |ev| {
                        email.set(event_target_value(&ev));
                        email_error.set(None);
                    }
                />
                {move || email_error.get().map(|error| view! { <p class="mt-1 text-sm text-red-500">{error}</p> })}
            </div>

            <div>
                <label for="password" class="block text-sm font-medium text-theme-primary mb-1">"Password"</label>
                <div class="relative">
                    <input
                        type=move || if show_password.get() { "text" } else { "password" }
                        id="password"
                        name="password"
                        autocomplete="current-password"
                        placeholder="Enter your password"
                        class="w-full px-3 py-2 pr-10 bg-theme-secondary border border-theme rounded-lg
                               text-theme-primary placeholder-theme-tertiary
                               focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                               transition-colors"
                        class:border-red-500=move || password_error.get().is_some()
                        prop:value=move || password.get()
                        on:input=move |ev| {
                            password.set(event_target_value(&ev));
                            password_error.set(None);
                        }
                    />
                    <button
                        type="button"
                        class="absolute inset-y-0 right-0 pr-3 flex items-center text-theme-tertiary hover:text-theme-secondary"
                        aria-label="Toggle password visibility"
                        on:click=move |_| show_password.update(|v| *v = !*v)
                    >
                        {move || {
                            let name = if show_password.get() { icons::EYE_CLOSED } else { icons::EYE };
                            view! { <Icon name=name class="h-5 w-5" /> }
                        }}
                    </button>
                </div>
                {move || password_error.get().map(|error| view! { <p class="mt-1 text-sm text-red-500">{error}</p> })}
            </div>

            <button
                type="submit"
                class="w-full py-2.5 px-4 bg-accent-primary hover:bg-accent-primary-hover
                       text-white font-medium rounded-lg
                       focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-accent-primary
                       disabled:opacity-50 disabled:cursor-not-allowed
                       transition-colors"
                disabled=move || auth.loading.get()
            >
                {move || {
                    if auth.loading.get() {
                        view! {
                            <span class="flex items-center justify-center">
                                <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4" />
                                "Signing in..."
                            </span>
                        }.into_any()
                    } else {
                        view! { <span class="block">"Sign In"</span> }.into_any()
                    }
                }}
            </button>

            <div class="text-center text-sm text-theme-secondary">
                "Don't have an account? "
                <button
                    type="button"
                    class="text-accent-primary hover:text-accent-primary-hover font-medium"
                    on:click=move |_| {
                        auth.clear_error();
                        if let Some(callback) = on_signup_click {
                            callback.run(());
                        }
                    }
                >
                    "Sign up"
                </button>
            </div>
        </form>
    }
}
