//! Single email view; unread messages are marked read once loaded

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use super::NoMailbox;
use crate::core::format::format_date_time;
use crate::core::models::emails::Email;
use crate::core::query::{DEFAULT_STALE_TIME, keys};
use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{Badge, BadgeVariant, ErrorState, LoadingSpinner};
use crate::ui::query::use_query;
use crate::ui::{Icon, icons};

#[component]
pub fn EmailDetailPage() -> impl IntoView {
    let auth = use_auth_context();
    let params = use_params_map();
    let email_id = Memo::new(move |_| params.get().get("id").unwrap_or_default());

    let email = use_query(
        move || {
            let ms = auth.microsoft_user_id()?;
            let id = email_id.get();
            if id.is_empty() {
                return None;
            }
            Some((keys::email(&id), (ms, id)))
        },
        DEFAULT_STALE_TIME,
        |api, (ms, id): (String, String)| async move { api.emails.get(&ms, &id).await },
    );

    // Mark as read at most once per opened email.
    let marked = StoredValue::new(None::<i64>);
    Effect::new(move |_| {
        let Some(loaded) = email.data.get() else {
            return;
        };
        if loaded.is_read || marked.get_value() == Some(loaded.id) {
            return;
        }
        let Some(ms) = untrack(|| auth.microsoft_user_id()) else {
            return;
        };
        marked.set_value(Some(loaded.id));
        let services = auth.services();
        let queries = auth.queries();
        let id = loaded.id.to_string();
        spawn_local(async move {
            match services.emails.mark_as_read(&ms, &id).await {
                Ok(()) => queries.invalidate(&keys::emails_root(&ms)),
                Err(err) => leptos::logging::warn!("could not mark email {} as read: {}", id, err),
            }
        });
    });

    view! {
        <div class="max-w-3xl mx-auto space-y-4">
            <a href=routes::EMAILS class="btn-base btn-ghost w-fit">
                <Icon name=icons::ARROW_LEFT class="icon-btn"/>
                "Back to emails"
            </a>
            {move || {
                if auth.microsoft_user_id().is_none() {
                    return view! { <NoMailbox/> }.into_any();
                }
                if let Some(error) = email.error.get() {
                    return view! {
                        <ErrorState
                            title="Failed to load email"
                            message=error
                            on_retry=Callback::new(move |_| email.refetch())
                        />
                    }.into_any();
                }
                match email.data.get() {
                    None => view! { <LoadingSpinner message="Loading email..."/> }.into_any(),
                    Some(loaded) => view! { <EmailCard email=loaded/> }.into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn EmailCard(email: Email) -> impl IntoView {
    let subject = if email.subject.trim().is_empty() {
        "(No Subject)".to_string()
    } else {
        email.subject.clone()
    };
    let importance = match email.importance.to_ascii_lowercase().as_str() {
        "high" => Some(("High", BadgeVariant::Danger)),
        "low" => Some(("Low", BadgeVariant::Default)),
        _ => None,
    };
    let body = if email.body.trim().is_empty() {
        email.body_preview.clone()
    } else {
        email.body.clone()
    };

    view! {
        <article class="card p-6 space-y-4">
            <header class="space-y-2">
                <h1 class="title-xl text-theme-primary flex flex-wrap items-center gap-2">
                    <Icon name=icons::MAIL class="w-6 h-6"/>
                    {subject}
                    {importance.map(|(label, variant)| view! { <Badge variant=variant>{label}</Badge> })}
                </h1>
                <p class="text-xs text-theme-secondary">{format_date_time(&email.received_date)}</p>
            </header>
            <div class="flex flex-col border-b border-theme pb-4 min-w-0">
                <span class="font-medium text-theme-primary truncate">{email.sender_label().to_string()}</span>
                <span class="text-xs text-theme-secondary truncate">{email.sender_email.clone()}</span>
                {(!email.recipient_email.is_empty()).then(|| view! {
                    <span class="text-xs text-theme-secondary truncate">"To: "{email.recipient_email.clone()}</span>
                })}
            </div>
            {email.has_attachments.then(|| view! {
                <div class="flex items-center gap-2 text-sm">
                    <Icon name=icons::PAPERCLIP class="w-4 h-4"/>
                    <Badge>"Attachment"</Badge>
                </div>
            })}
            {(!email.categories.is_empty()).then(|| view! {
                <div class="flex flex-wrap gap-1">
                    {email.categories.clone().into_iter().map(|c| view! { <Badge variant=BadgeVariant::Info>{c.clone()}</Badge> }).collect_view()}
                </div>
            })}
            <div class="whitespace-pre-wrap break-words rounded-md border border-theme bg-theme-secondary p-4 text-theme-primary">
                {body}
            </div>
        </article>
    }
}
