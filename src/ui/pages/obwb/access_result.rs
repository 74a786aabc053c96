//! Landing page of the mailbox consent redirect

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{Button, ButtonVariant, PageHeader};
use crate::ui::{Icon, icons};

/// Outcome reported by the backend in the redirect's query string.
#[derive(Debug, Clone, Default, PartialEq)]
struct ConnectionResult {
    succeeded: bool,
    microsoft_user_id: Option<String>,
    synced_emails: Option<String>,
    user_email: Option<String>,
}

impl ConnectionResult {
    fn from_query(get: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        Self {
            succeeded: get("status").as_deref() == Some("success"),
            microsoft_user_id: present("user_id"),
            synced_emails: present("synced_emails"),
            user_email: present("user_email"),
        }
    }

    /// Mailbox to record, only for a successful connection.
    fn linked_mailbox(&self) -> Option<&str> {
        self.microsoft_user_id
            .as_deref()
            .filter(|_| self.succeeded)
    }
}

#[component]
pub fn AccessResultPage() -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();
    let query = use_query_map();
    let result = query.with_untracked(|params| ConnectionResult::from_query(|key| params.get(key)));

    // Recorded once the persisted session is loaded, so hydration can't
    // overwrite it.
    let recorded = StoredValue::new(false);
    let mailbox = result.linked_mailbox().map(str::to_string);
    Effect::new(move |_| {
        if !auth.hydrated.get() || recorded.get_value() {
            return;
        }
        recorded.set_value(true);
        if let Some(id) = mailbox.clone() {
            leptos::logging::log!("mailbox {} linked", id);
            auth.set_microsoft_user_id(Some(id));
        }
    });

    let (title, subtitle, description) = if result.succeeded {
        (
            "Connection Successful",
            "Your email account has been successfully connected!",
            format!(
                "Successfully synced {} emails from your account.",
                result.synced_emails.as_deref().unwrap_or("0")
            ),
        )
    } else {
        (
            "Connection Failed",
            "There was an issue connecting your email account.",
            "Please try connecting your email account again.".to_string(),
        )
    };

    let go_emails = {
        let navigate = navigate.clone();
        move |_| navigate(routes::EMAILS, Default::default())
    };
    let go_dashboard = move |_| navigate(routes::DASHBOARD, Default::default());

    view! {
        <div class="space-y-6">
            <PageHeader icon=icons::MAIL title="Email connection result" subtitle=subtitle/>
            <section class="card p-6 max-w-md space-y-4">
                <div>
                    <h2 class="title-md text-theme-primary flex items-center gap-2">
                        {if result.succeeded {
                            view! { <Icon name=icons::CHECK class="w-5 h-5 text-green-500"/> }
                        } else {
                            view! { <Icon name=icons::X class="w-5 h-5 text-red-500"/> }
                        }}
                        {title}
                    </h2>
                    <p class="text-sm text-theme-secondary mt-1">{description}</p>
                </div>

                {(result.succeeded && result.synced_emails.is_some()).then(|| view! {
                    <div class="space-y-2 text-sm text-theme-secondary">
                        <p class="flex items-center gap-2">
                            <Icon name=icons::MAIL class="w-4 h-4"/>
                            "Email: "{result.user_email.clone().unwrap_or_default()}
                        </p>
                        <p class="flex items-center gap-2">
                            <Icon name=icons::MAIL_OPEN class="w-4 h-4"/>
                            "Synced emails: "{result.synced_emails.clone().unwrap_or_default()}
                        </p>
                    </div>
                })}

                <div class="flex flex-col gap-2">
                    {result.succeeded.then(|| view! {
                        <Button class="w-full" icon=icons::MAIL on_click=go_emails>
                            "View my emails"
                        </Button>
                    })}
                    <Button class="w-full" variant=ButtonVariant::Secondary on_click=go_dashboard>
                        "Back to dashboard"
                    </Button>
                </div>
            </section>
        </div>
    }
}
