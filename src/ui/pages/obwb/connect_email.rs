//! Link, relink or unlink the Microsoft mailbox

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::models::auth::EmailConnectionResponse;
use crate::core::query::{DEFAULT_STALE_TIME, keys};
use crate::core::session::ServiceTag;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Button, ButtonVariant, ConfirmDialog, ErrorMessage, PageHeader, Spinner, SpinnerSize,
};
use crate::ui::notifications::use_notifications;
use crate::ui::query::use_query;
use crate::ui::{Icon, icons};

/// OAuth `state` kept for the consent round trip.
const AUTH_STATE_KEY: &str = "email-auth-state";

/// Leave the app for the Microsoft consent page.
#[cfg(feature = "hydrate")]
fn open_consent_page(auth_url: &str, state: &str) -> Result<(), String> {
    use crate::core::session::{LocalStorage, SessionStorage};

    if let Err(err) = LocalStorage.save(AUTH_STATE_KEY, state) {
        leptos::logging::warn!("could not keep auth state: {}", err);
    }
    let window = web_sys::window().ok_or("No window available")?;
    window
        .location()
        .set_href(auth_url)
        .map_err(|e| format!("{:?}", e))
}

#[cfg(not(feature = "hydrate"))]
fn open_consent_page(_auth_url: &str, _state: &str) -> Result<(), String> {
    Ok(())
}

#[component]
pub fn ConnectEmailPage() -> impl IntoView {
    let auth = use_auth_context();
    let toasts = use_notifications();

    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let confirm_disconnect = RwSignal::new(false);

    // Backend id of the email-service user.
    let user_id = move || {
        auth.read(|store| {
            store
                .user_by_service(ServiceTag::OBWB)
                .or(store.user())
                .map(|u| u.id)
        })
    };

    let status = use_query(
        move || {
            // Re-check whenever the linked mailbox changes.
            let _ = auth.microsoft_user_id();
            user_id().map(|id| (keys::connection_status(id), id))
        },
        DEFAULT_STALE_TIME,
        |api, id: i64| async move { api.emails.connection_status(&id.to_string()).await },
    );

    let connect = move |_| {
        busy.set(true);
        error.set(None);
        let services = auth.services();
        spawn_local(async move {
            let result = match services.emails.auth_url().await {
                Ok(response) => open_consent_page(&response.auth_url, &response.state),
                Err(err) => Err(err.message_or("Failed to connect email")),
            };
            if let Err(message) = result {
                leptos::logging::warn!("starting mailbox consent failed: {}", message);
                error.set(Some(message));
            }
            busy.set(false);
        });
    };

    let reconnect = move |_| {
        let Some(id) = untrack(user_id) else {
            return;
        };
        busy.set(true);
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.emails.connect(&id.to_string()).await {
                Ok(response) if response.connected => {
                    auth.set_microsoft_user_id(Some(response.user_id));
                    queries.invalidate(&keys::connection_status(id));
                    toasts.success("Email connected successfully");
                }
                Ok(response) => {
                    leptos::logging::warn!("reconnect refused: {}", response.message);
                    toasts.error("Failed to connect email");
                }
                Err(err) => toasts.error(err.message_or("Failed to reconnect email")),
            }
            busy.set(false);
        });
    };

    let disconnect = Callback::new(move |_| {
        confirm_disconnect.set(false);
        let Some(ms) = untrack(|| auth.microsoft_user_id()) else {
            return;
        };
        busy.set(true);
        error.set(None);
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.emails.disconnect(&ms).await {
                Ok(()) => {
                    auth.set_microsoft_user_id(None);
                    if let Some(id) = untrack(user_id) {
                        queries.invalidate(&keys::connection_status(id));
                    }
                    toasts.success("Email disconnected successfully");
                }
                Err(err) => toasts.error(err.message_or("Failed to disconnect email")),
            }
            busy.set(false);
        });
    });

    view! {
        <div class="space-y-6">
            <PageHeader icon=icons::LINK title="Connect Email" subtitle="Link your email account to get started"/>

            <section class="card p-6 max-w-md space-y-4">
                <div>
                    <h2 class="title-md text-theme-primary flex items-center gap-2">
                        <Icon name=icons::MAIL class="w-5 h-5"/>
                        "Email connection"
                    </h2>
                    <p class="text-sm text-theme-secondary mt-1">
                        "Connect your email account to access and manage your emails through the dashboard."
                    </p>
                </div>

                <ErrorMessage error=error/>

                {move || {
                    let linked = auth.microsoft_user_id().is_some();
                    let current = status.data.get();
                    if current.is_none() && status.loading.get() {
                        return view! {
                            <Spinner size=SpinnerSize::Small label="Checking connection status..." centered=true/>
                        }.into_any();
                    }
                    if linked {
                        view! { <Connected status=current/> }.into_any()
                    } else {
                        let previous = current.filter(|s| !s.connected && !s.email.is_empty());
                        view! {
                            <div class="space-y-3">
                                <Button
                                    class="w-full"
                                    icon=icons::LINK
                                    loading=busy
                                    on_click=connect
                                >
                                    {move || if busy.get() { "Connecting..." } else { "Connect email account" }}
                                </Button>
                                {previous.map(|s| view! {
                                    <div class="space-y-2">
                                        <div class="warning-message">
                                            <Icon name=icons::MAIL class="icon-text"/>
                                            <span>"Previous connection found for: "<strong>{s.email.clone()}</strong></span>
                                        </div>
                                        <Button
                                            class="w-full"
                                            variant=ButtonVariant::Secondary
                                            icon=icons::REFRESH
                                            disabled=busy
                                            on_click=reconnect
                                        >
                                            {format!("Reconnect to {}", s.email)}
                                        </Button>
                                    </div>
                                })}
                            </div>
                        }.into_any()
                    }
                }}

                <Show when=move || auth.microsoft_user_id().is_some()>
                    <Button
                        class="w-full"
                        variant=ButtonVariant::Danger
                        icon=icons::X
                        loading=busy
                        on_click=move |_| confirm_disconnect.set(true)
                    >
                        {move || if busy.get() { "Disconnecting..." } else { "Disconnect email" }}
                    </Button>
                </Show>
            </section>

            <ConfirmDialog
                title="Disconnect email"
                message="Your synced emails will no longer be available until you connect again."
                is_open=confirm_disconnect
                on_confirm=disconnect
                on_cancel=move |_| confirm_disconnect.set(false)
                confirm_text="Disconnect"
                is_destructive=true
            />
        </div>
    }
}

#[component]
fn Connected(status: Option<EmailConnectionResponse>) -> impl IntoView {
    view! {
        <div class="flex items-start gap-2 p-3 rounded-lg border border-theme bg-theme-secondary">
            <Icon name=icons::CHECK class="w-5 h-5 text-green-600"/>
            <div>
                <p class="text-sm font-medium text-theme-primary">"Your email is already connected"</p>
                {status.filter(|s| !s.email.is_empty()).map(|s| view! {
                    <p class="text-xs text-theme-secondary mt-1">"Connected to: "{s.email}</p>
                })}
            </div>
        </div>
    }
}
