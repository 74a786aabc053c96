//! Emails the assistant flagged as needing a reply

use leptos::prelude::*;

use super::fields::PageSizeSelect;
use super::NoMailbox;
use crate::core::format::format_date;
use crate::core::models::ai::{FollowUpEmail, FollowUpFilters, FollowUpPriority};
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Badge, BadgeVariant, EmptyState, ErrorState, LoadingSpinner, PageHeader, Pager, SelectField,
};
use crate::ui::query::use_query;
use crate::ui::{Icon, icons};

fn priority_label(priority: FollowUpPriority) -> &'static str {
    match priority {
        FollowUpPriority::Low => "Low",
        FollowUpPriority::Medium => "Medium",
        FollowUpPriority::High => "High",
    }
}

#[component]
pub fn FollowUpsPage() -> impl IntoView {
    let auth = use_auth_context();
    let filters = RwSignal::new(FollowUpFilters::default());

    let follow_ups = use_query(
        move || {
            let ms = auth.microsoft_user_id()?;
            let filters = filters.get();
            Some((keys::follow_ups(&ms, &filters), (ms, filters)))
        },
        LIST_STALE_TIME,
        |api, (ms, filters): (String, FollowUpFilters)| async move {
            api.ai.follow_ups(&ms, &filters).await
        },
    );

    let priority_options = FollowUpPriority::ALL
        .iter()
        .map(|p| (p.to_string(), format!("{} priority", priority_label(*p))))
        .collect::<Vec<_>>();

    let on_priority = move |raw: String| {
        if let Some(priority) = FollowUpPriority::parse(&raw) {
            filters.update(|f| {
                f.priority = priority;
                f.page_num = 1;
            });
        }
    };
    let on_page_size = move |size: u32| {
        filters.update(|f| {
            f.page_size = size;
            f.page_num = 1;
        })
    };

    let total = move || follow_ups.data.with(|d| d.as_ref().map(|r| r.total_count));

    view! {
        <div class="space-y-6">
            <PageHeader icon=icons::FLAG title="Follow-up required">
                <Show when=move || auth.microsoft_user_id().is_some()>
                    {move || total().map(|count| view! { <Badge variant=BadgeVariant::Primary>{count}" emails"</Badge> })}
                    <SelectField
                        label="Priority"
                        value=Signal::derive(move || filters.with(|f| f.priority.to_string()))
                        on_change=on_priority
                        options=priority_options.clone()
                    />
                    <PageSizeSelect
                        value=Signal::derive(move || filters.with(|f| f.page_size))
                        on_change=on_page_size
                    />
                </Show>
            </PageHeader>

            {move || {
                if auth.microsoft_user_id().is_none() {
                    return view! { <NoMailbox/> }.into_any();
                }
                if let Some(error) = follow_ups.error.get() {
                    return view! {
                        <ErrorState
                            title="Failed to load follow-up emails"
                            message=error
                            on_retry=Callback::new(move |_| follow_ups.refetch())
                        />
                    }.into_any();
                }
                let Some(response) = follow_ups.data.get() else {
                    return view! { <LoadingSpinner message="Loading follow-up emails..."/> }.into_any();
                };
                let pagination = response.pagination();
                let priority = filters.with_untracked(|f| f.priority);
                view! {
                    <PriorityBreakdown breakdown=response.priority_breakdown.into_iter().collect()/>
                    {if response.emails.is_empty() {
                        view! {
                            <EmptyState
                                icon=icons::FLAG
                                title="Nothing to follow up"
                                message=format!(
                                    "No follow-up required emails found for {} priority.",
                                    priority,
                                )
                            />
                        }.into_any()
                    } else {
                        view! {
                            <div class="space-y-4">
                                {response.emails.into_iter().map(|email| view! { <FollowUpItem email=email/> }).collect_view()}
                            </div>
                        }.into_any()
                    }}
                    <Pager
                        pagination=Signal::derive(move || pagination)
                        on_page=move |p| filters.update(|f| f.page_num = p)
                        noun="emails"
                    />
                }.into_any()
            }}
        </div>
    }
}

#[component]
fn PriorityBreakdown(breakdown: Vec<(String, u64)>) -> impl IntoView {
    (!breakdown.is_empty()).then(|| {
        view! {
            <div class="grid grid-cols-3 gap-3">
                {breakdown.into_iter().map(|(level, count)| view! {
                    <div class="card p-4 text-center">
                        <p class="text-2xl font-semibold text-theme-primary">{count}</p>
                        <Badge variant=BadgeVariant::for_level(&level)>{level.clone()}</Badge>
                    </div>
                }).collect_view()}
            </div>
        }
    })
}

#[component]
fn FollowUpItem(email: FollowUpEmail) -> impl IntoView {
    let sender = if email.sender_name.trim().is_empty() {
        email.sender_email.clone()
    } else {
        format!("{} <{}>", email.sender_name, email.sender_email)
    };
    let age = match email.days_since_received {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    };

    view! {
        <article class="card p-5 space-y-2">
            <div class="flex flex-wrap items-center justify-between gap-2">
                <a href=routes::conversation(&email.conversation_id) class="font-medium text-theme-primary hover:underline">
                    {email.subject.clone()}
                </a>
                <div class="flex items-center gap-2">
                    <Badge variant=BadgeVariant::for_level(&email.priority)>{email.priority.clone()}</Badge>
                    <span class="text-xs text-theme-secondary">{age}</span>
                </div>
            </div>
            <p class="text-xs text-theme-secondary">{sender}</p>
            {(!email.urgency_reason.is_empty()).then(|| view! {
                <p class="text-sm text-theme-secondary">
                    <span class="font-medium text-theme-primary">"Why: "</span>
                    {email.urgency_reason.clone()}
                </p>
            })}
            {(!email.suggested_action.is_empty()).then(|| view! {
                <p class="text-sm text-theme-secondary flex items-center gap-1">
                    <Icon name=icons::INFORMATION_CIRCLE class="w-4 h-4"/>
                    {email.suggested_action.clone()}
                </p>
            })}
            {email.deadline.as_deref().map(|deadline| view! {
                <p class="text-xs text-theme-warning">"Deadline: "{format_date(deadline)}</p>
            })}
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_labels_cover_every_level() {
        let labels = FollowUpPriority::ALL.map(priority_label);
        assert_eq!(labels, ["Low", "Medium", "High"]);
    }
}
