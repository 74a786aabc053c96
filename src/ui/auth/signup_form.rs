//! Signup form component

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::context::use_auth_context;
use crate::core::models::auth::SignupRequest;
use crate::core::validation::{MIN_PASSWORD_LENGTH, validate_signup};
use crate::ui::common::FormField;
use crate::ui::icon::{Icon, icons};

#[component]
pub fn SignupForm(
    /// Callback when the account was created and the user is signed in
    #[prop(optional, into)]
    on_success: Option<Callback<()>>,
    /// Callback to switch to the login form
    #[prop(optional, into)]
    on_login_click: Option<Callback<()>>,
) -> impl IntoView {
    let auth = use_auth_context();

    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());

    let first_name_error = RwSignal::new(None::<String>);
    let last_name_error = RwSignal::new(None::<String>);
    let email_error = RwSignal::new(None::<String>);
    let password_error = RwSignal::new(None::<String>);
    let confirm_error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();

        let details = SignupRequest {
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        let checked = validate_signup(&details, &confirm_password.get_untracked());
        for (field, error) in [
            ("first_name", first_name_error),
            ("last_name", last_name_error),
            ("email", email_error),
            ("password", password_error),
            ("confirm_password", confirm_error),
        ] {
            error.set(checked.for_field(field).map(ToString::to_string));
        }
        if !checked.is_valid() {
            return;
        }

        spawn_local(async move {
            if auth.signup(details).await.is_ok()
                && let Some(callback) = on_success
            {
                callback.run(());
            }
        });
    };

    let input = |signal: RwSignal<String>, error: RwSignal<Option<String>>| {
        Callback::new(move |value: String| {
            signal.set(value);
            error.set(None);
        })
    };

    view! {
        <form on:submit=on_submit class="space-y-5" novalidate=true>
            <div class="text-center">
                <h2 class="text-2xl font-bold text-theme-primary">"Create an Account"</h2>
                <p class="mt-2 text-sm text-theme-secondary">"Get started with your dashboard"</p>
            </div>

            {move || {
                auth.error.get().map(|error| {
                    view! {
                        <div class="p-3 bg-red-100 dark:bg-red-900/30 border border-red-300 dark:border-red-700 rounded-lg">
                            <p class="text-sm text-red-700 dark:text-red-300">{error}</p>
                        </div>
                    }
                })
            }}

            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <FormField
                    label="First name"
                    required=true
                    autocomplete="given-name"
                    value=first_name
                    on_input=input(first_name, first_name_error)
                    error=first_name_error.into()
                />
                <FormField
                    label="Last name"
                    required=true
                    autocomplete="family-name"
                    value=last_name
                    on_input=input(last_name, last_name_error)
                    error=last_name_error.into()
                />
            </div>
            <FormField
                label="Email"
                required=true
                input_type="email"
                autocomplete="email"
                placeholder="you@example.com"
                value=email
                on_input=input(email, email_error)
                error=email_error.into()
            />
            <FormField
                label="Password"
                required=true
                input_type="password"
                autocomplete="new-password"
                placeholder=format!("At least {} characters", MIN_PASSWORD_LENGTH)
                value=password
                on_input=input(password, password_error)
                error=password_error.into()
            />
            <FormField
                label="Confirm password"
                required=true
                input_type="password"
                autocomplete="new-password"
                value=confirm_password
                on_input=input(confirm_password, confirm_error)
                error=confirm_error.into()
            />

            <button
                type="submit"
                class="w-full py-2.5 px-4 bg-accent-primary hover:bg-accent-primary-hover
                       text-white font-medium rounded-lg
                       disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                disabled=move || auth.loading.get()
            >
                {move || {
                    if auth.loading.get() {
                        view! {
                            <span class="flex items-center justify-center">
                                <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4" />
                                "Creating account..."
                            </span>
                        }.into_any()
                    } else {
                        view! { <span class="block">"Sign Up"</span> }.into_any()
                    }
                }}
            </button>

            <div class="text-center text-sm text-theme-secondary">
                "Already have an account? "
                <button
                    type="button"
                    class="text-accent-primary hover:text-accent-primary-hover font-medium"
                    on:click=move |_| {
                        auth.clear_error();
                        if let Some(callback) = on_login_click {
                            callback.run(());
                        }
                    }
                >
                    "Sign in"
                </button>
            </div>
        </form>
    }
}
