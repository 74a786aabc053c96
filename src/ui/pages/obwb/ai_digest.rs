//! AI digest of recent mailbox activity

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::fields::options;
use super::NoMailbox;
use crate::core::format::format_date_time;
use crate::core::models::ai::{DigestType, GenerateDigestResponse};
use crate::core::query::{ANALYSIS_STALE_TIME, keys};
use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Badge, BadgeVariant, Button, ErrorState, LoadingSpinner, PageHeader, SelectField, TabItem,
    Tabs,
};
use crate::ui::notifications::use_notifications;
use crate::ui::query::use_query;
use crate::ui::{Icon, icons};

const DATE_RANGES: [(&str, &str); 5] = [
    ("today", "Today"),
    ("yesterday", "Yesterday"),
    ("this_week", "This week"),
    ("last_week", "Last week"),
    ("this_month", "This month"),
];

fn parse_digest_type(raw: &str) -> DigestType {
    [DigestType::Daily, DigestType::RealTime]
        .into_iter()
        .find(|t| t.to_string() == raw)
        .unwrap_or_default()
}

#[component]
pub fn AiDigestPage() -> impl IntoView {
    let auth = use_auth_context();
    let toasts = use_notifications();

    let digest_type = RwSignal::new(DigestType::Daily);
    let date_range = RwSignal::new(DATE_RANGES[0].0.to_string());
    let generating = RwSignal::new(false);

    let digest = use_query(
        move || {
            let ms = auth.microsoft_user_id()?;
            let (kind, range) = (digest_type.get(), date_range.get());
            Some((keys::digest(&ms, kind, &range), (ms, kind, range)))
        },
        ANALYSIS_STALE_TIME,
        |api, (ms, kind, range): (String, DigestType, String)| async move {
            api.ai.generate_digest(&ms, kind, &range).await
        },
    );

    let generate = move |_| {
        let Some(ms) = untrack(|| auth.microsoft_user_id()) else {
            return;
        };
        let (kind, range) = (digest_type.get_untracked(), date_range.get_untracked());
        generating.set(true);
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.ai.generate_digest(&ms, kind, &range).await {
                Ok(_) => {
                    toasts.success("AI digest generated successfully");
                    queries.invalidate(&keys::digest_root(&ms));
                }
                Err(err) => {
                    leptos::logging::warn!("digest generation failed: {}", err);
                    toasts.error("Failed to generate AI digest");
                }
            }
            generating.set(false);
        });
    };

    let tabs = [DigestType::Daily, DigestType::RealTime]
        .into_iter()
        .map(|t| TabItem::new(t.to_string(), t.label()))
        .collect::<Vec<_>>();

    view! {
        <div class="space-y-6">
            <PageHeader icon=icons::SPARKLES title="AI Digest" subtitle="A summary of what happened in your mailbox">
                <Show when=move || auth.microsoft_user_id().is_some()>
                    <Tabs
                        tabs=tabs.clone()
                        active_tab=Signal::derive(move || digest_type.get().to_string())
                        on_change=move |id: String| digest_type.set(parse_digest_type(&id))
                    />
                    <SelectField
                        label="Date range"
                        value=date_range
                        on_change=move |range: String| date_range.set(range)
                        options=options(&DATE_RANGES)
                    />
                    <Button icon=icons::SPARKLES loading=generating on_click=generate>
                        {move || if generating.get() { "Generating..." } else { "Generate digest" }}
                    </Button>
                </Show>
            </PageHeader>

            {move || {
                if auth.microsoft_user_id().is_none() {
                    return view! { <NoMailbox/> }.into_any();
                }
                if let Some(error) = digest.error.get() {
                    return view! {
                        <ErrorState
                            title="Failed to load digest"
                            message=error
                            on_retry=Callback::new(move |_| digest.refetch())
                        />
                    }.into_any();
                }
                match digest.data.get() {
                    None => view! { <LoadingSpinner message="Generating AI digest..."/> }.into_any(),
                    Some(loaded) => view! { <DigestReport digest=loaded/> }.into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn DigestReport(digest: GenerateDigestResponse) -> impl IntoView {
    view! {
        <div class="space-y-6">
            <section class="card p-6">
                <h2 class="title-md text-theme-primary mb-2">"Summary"</h2>
                <p class="text-sm text-theme-secondary whitespace-pre-wrap">{digest.summary.clone()}</p>
            </section>

            {(!digest.key_insights.is_empty()).then(|| view! {
                <section class="card p-6">
                    <h2 class="title-md text-theme-primary mb-2">"Key insights"</h2>
                    <ul class="list-disc list-inside text-sm text-theme-secondary space-y-1">
                        {digest.key_insights.iter().map(|insight| view! { <li>{insight.clone()}</li> }).collect_view()}
                    </ul>
                </section>
            })}

            {(!digest.action_items.is_empty()).then(|| view! {
                <section class="card p-6 space-y-3">
                    <h2 class="title-md text-theme-primary">"Action items"</h2>
                    {digest.action_items.clone().into_iter().map(|item| view! {
                        <div class="p-3 rounded-lg border border-theme space-y-1">
                            <div class="flex items-center gap-2">
                                <Badge variant=BadgeVariant::for_level(&item.priority)>{item.priority.clone()}</Badge>
                                {item.deadline.clone().map(|d| view! {
                                    <span class="text-xs text-theme-secondary">"Due "{format_date_time(&d)}</span>
                                })}
                            </div>
                            <p class="text-sm text-theme-primary">{item.description.clone()}</p>
                            {item.conversation_id.as_deref().map(|id| view! {
                                <a href=routes::conversation(id) class="text-xs text-accent-primary">"Open conversation"</a>
                            })}
                        </div>
                    }).collect_view()}
                </section>
            })}

            {(!digest.priority_emails.is_empty()).then(|| view! {
                <section class="card p-6 space-y-3">
                    <h2 class="title-md text-theme-primary">"Priority emails"</h2>
                    {digest.priority_emails.clone().into_iter().map(|email| view! {
                        <a href=routes::email(&email.email_id) class="block p-3 rounded-lg border border-theme hover:bg-theme-tertiary">
                            <div class="flex items-center gap-2">
                                <Badge variant=BadgeVariant::for_level(&email.priority)>{email.priority.clone()}</Badge>
                                <span class="font-medium text-theme-primary truncate">{email.subject.clone()}</span>
                            </div>
                            <p class="text-xs text-theme-secondary">{email.sender.clone()}</p>
                            <p class="text-sm text-theme-secondary mt-1">{email.reason.clone()}</p>
                        </a>
                    }).collect_view()}
                </section>
            })}

            {(!digest.conversation_summaries.is_empty()).then(|| view! {
                <section class="card p-6 space-y-3">
                    <h2 class="title-md text-theme-primary">"Conversations"</h2>
                    {digest.conversation_summaries.clone().into_iter().map(|summary| view! {
                        <a href=routes::conversation(&summary.conversation_id) class="block p-3 rounded-lg border border-theme hover:bg-theme-tertiary">
                            <p class="font-medium text-theme-primary">{summary.subject.clone()}</p>
                            <p class="text-sm text-theme-secondary mt-1">{summary.summary.clone()}</p>
                            <div class="flex flex-wrap gap-1 mt-2">
                                {summary.participants.clone().into_iter().map(|p| view! { <Badge>{p.clone()}</Badge> }).collect_view()}
                            </div>
                        </a>
                    }).collect_view()}
                </section>
            })}

            <p class="flex items-center gap-2 text-xs text-theme-tertiary">
                <Icon name=icons::INFORMATION_CIRCLE class="w-4 h-4"/>
                {format!("{} digest generated {}", digest.digest_type.label(), format_date_time(&digest.created_at))}
            </p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digest_type() {
        assert_eq!(parse_digest_type("real_time"), DigestType::RealTime);
        assert_eq!(parse_digest_type("daily"), DigestType::Daily);
        assert_eq!(parse_digest_type("weekly"), DigestType::Daily);
    }
}
