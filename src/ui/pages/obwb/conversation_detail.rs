//! One conversation thread and its AI assistant panels
//!
//! The AI panels stay collapsed until asked for; their queries only run
//! while they are visible.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use super::fields::PageSizeSelect;
use super::NoMailbox;
use crate::core::format::{format_date, format_date_time, format_number};
use crate::core::models::Pagination;
use crate::core::models::ai::{
    AiResponse, AiResponsesFilters, AnalyzeConversationResponse, GenerateResponseRequest,
    RelatedEmailsResponse, ResponsesResponse,
};
use crate::core::models::conversations::ConversationDetailResponse;
use crate::core::query::{ANALYSIS_STALE_TIME, LIST_STALE_TIME, keys};
use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, ConfirmDialog, EmptyState, ErrorState,
    LoadingSpinner, PageHeader, Pager, SelectField, Spinner, SpinnerSize,
};
use crate::ui::notifications::use_notifications;
use crate::ui::query::{QueryState, use_query};
use crate::ui::{Icon, icons};

const EMAILS_PAGE_SIZE: u32 = 50;
const RESPONSES_PAGE_SIZE: u32 = 10;
const RELATED_EMAILS_LIMIT: u32 = 5;
const MAX_TOKEN_CHOICES: [u32; 5] = [100, 250, 500, 1000, 2000];

#[component]
pub fn ConversationDetailPage() -> impl IntoView {
    let auth = use_auth_context();
    let toasts = use_notifications();
    let params = use_params_map();
    let conversation_id = Memo::new(move |_| {
        let raw = params.get().get("id").unwrap_or_default();
        urlencoding::decode(&raw).map(|id| id.into_owned()).unwrap_or(raw)
    });

    let page = RwSignal::new(1u32);
    let page_size = RwSignal::new(EMAILS_PAGE_SIZE);
    let show_ai = RwSignal::new(false);
    let responses_page = RwSignal::new(1u32);
    let responses_page_size = RwSignal::new(RESPONSES_PAGE_SIZE);
    let generating = RwSignal::new(false);
    let pending_delete = RwSignal::new(None::<String>);

    // Mailbox and conversation id, once both are known.
    let target = move || {
        let ms = auth.microsoft_user_id()?;
        let id = conversation_id.get();
        (!id.is_empty()).then_some((ms, id))
    };
    let ai_target = move || if show_ai.get() { target() } else { None };

    let detail = use_query(
        move || {
            let (ms, id) = target()?;
            let (page, size) = (page.get(), page_size.get());
            Some((keys::conversation(&ms, &id, page, size), (ms, id, page, size)))
        },
        LIST_STALE_TIME,
        |api, (ms, id, page, size): (String, String, u32, u32)| async move {
            api.conversations.detail(&ms, &id, page, size).await
        },
    );

    let analysis = use_query(
        move || ai_target().map(|(ms, id)| (keys::ai_analysis(&ms, &id), (ms, id))),
        ANALYSIS_STALE_TIME,
        |api, (ms, id): (String, String)| async move { api.ai.analyze_conversation(&ms, &id).await },
    );

    let related = use_query(
        move || ai_target().map(|(ms, id)| (keys::related_emails(&ms, &id), (ms, id))),
        ANALYSIS_STALE_TIME,
        |api, (ms, id): (String, String)| async move {
            api.ai.related_emails(&ms, &id, RELATED_EMAILS_LIMIT).await
        },
    );

    let responses = use_query(
        move || {
            let (ms, id) = ai_target()?;
            let filters = AiResponsesFilters {
                page_num: responses_page.get(),
                page_size: responses_page_size.get(),
                conversation_id: Some(id.clone()),
            };
            let key = keys::ai_responses(&ms, &id, filters.page_num, filters.page_size);
            Some((key, (ms, filters)))
        },
        LIST_STALE_TIME,
        |api, (ms, filters): (String, AiResponsesFilters)| async move {
            api.ai.responses(&ms, filters).await
        },
    );

    let generate = Callback::new(move |request: GenerateResponseRequest| {
        let Some((ms, id)) = untrack(target) else {
            return;
        };
        generating.set(true);
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.ai.generate_response(&ms, &request).await {
                Ok(_) => {
                    toasts.success("AI response generated successfully");
                    queries.invalidate(&keys::conversation_responses(&ms, &id));
                }
                Err(err) => {
                    leptos::logging::warn!("response generation failed: {}", err);
                    toasts.error("Failed to generate AI response");
                }
            }
            generating.set(false);
        });
    });

    let delete_response = Callback::new(move |_| {
        let Some(response_id) = pending_delete.get_untracked() else {
            return;
        };
        let Some((ms, id)) = untrack(target) else {
            return;
        };
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.ai.delete_response(&ms, &response_id).await {
                Ok(()) => {
                    toasts.success("Response deleted successfully");
                    queries.invalidate(&keys::conversation_responses(&ms, &id));
                }
                Err(err) => {
                    leptos::logging::warn!("deleting response {} failed: {}", response_id, err);
                    toasts.error("Failed to delete response");
                }
            }
        });
    });

    let clear_cache = Callback::new(move |_| {
        let Some((ms, id)) = untrack(target) else {
            return;
        };
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.ai.clear_cache(&ms, &id).await {
                Ok(()) => {
                    toasts.success("AI cache cleared successfully");
                    queries.invalidate(&keys::conversation_responses(&ms, &id));
                    queries.invalidate(&keys::ai_analysis(&ms, &id));
                }
                Err(err) => {
                    leptos::logging::warn!("clearing AI cache failed: {}", err);
                    toasts.error("Failed to clear AI cache");
                }
            }
        });
    });

    let on_page_size = move |size: u32| {
        page_size.set(size);
        page.set(1);
    };
    let on_responses_page_size = move |size: u32| {
        responses_page_size.set(size);
        responses_page.set(1);
    };

    view! {
        <div class="space-y-6">
            <a href=routes::CONVERSATIONS class="btn-base btn-ghost w-fit">
                <Icon name=icons::ARROW_LEFT class="icon-btn"/>
                "Back to conversations"
            </a>
            <PageHeader icon=icons::MESSAGES title="Conversation Details">
                <PageSizeSelect value=page_size on_change=on_page_size/>
                <Button
                    variant=ButtonVariant::Secondary
                    icon=icons::SPARKLES
                    on_click=move |_| show_ai.update(|v| *v = !*v)
                >
                    {move || if show_ai.get() { "Hide AI assistant" } else { "Show AI assistant" }}
                </Button>
            </PageHeader>

            {move || {
                if auth.microsoft_user_id().is_none() {
                    return view! { <NoMailbox/> }.into_any();
                }
                if let Some(error) = detail.error.get() {
                    return view! {
                        <ErrorState
                            title="Error loading conversation"
                            message=error
                            on_retry=Callback::new(move |_| detail.refetch())
                        />
                    }.into_any();
                }
                match detail.data.get() {
                    None => view! {
                        <LoadingSpinner message="Loading conversation..."/>
                    }.into_any(),
                    Some(conversation) if conversation.total_emails == 0 && conversation.emails.is_empty() => view! {
                        <EmptyState
                            icon=icons::MESSAGES
                            title="Conversation not found"
                            message="The requested conversation could not be found."
                        />
                    }.into_any(),
                    Some(conversation) => {
                        let pagination = Pagination::compute(
                            page.get_untracked(),
                            page_size.get_untracked(),
                            conversation.total_emails,
                        );
                        view! {
                            <ConversationOverview conversation=conversation/>
                            <Pager
                                pagination=Signal::derive(move || pagination)
                                on_page=move |p| page.set(p)
                                noun="emails"
                            />
                        }.into_any()
                    }
                }
            }}

            <Show when=move || show_ai.get() && auth.microsoft_user_id().is_some()>
                <GenerateResponsePanel
                    conversation_id=conversation_id
                    loading=generating
                    on_generate=generate
                />
                <AnalysisPanel analysis=analysis/>
                <RelatedEmailsPanel related=related/>
                <ResponsesPanel
                    responses=responses
                    page_size=responses_page_size
                    on_page=move |p| responses_page.set(p)
                    on_page_size=on_responses_page_size
                    on_delete=move |id: String| pending_delete.set(Some(id))
                    on_clear_cache=clear_cache
                />
            </Show>

            <ConfirmDialog
                title="Delete response"
                message="This AI response will be removed permanently."
                is_open=Signal::derive(move || pending_delete.get().is_some())
                on_confirm=delete_response
                on_cancel=move |_| pending_delete.set(None)
                confirm_text="Delete"
                is_destructive=true
            />
        </div>
    }
}

#[component]
fn ConversationOverview(conversation: ConversationDetailResponse) -> impl IntoView {
    let subject = if conversation.subject.trim().is_empty() {
        "No Subject".to_string()
    } else {
        conversation.subject.clone()
    };
    let stats = [
        ("Total emails", conversation.total_emails.to_string()),
        ("Participants", conversation.participants.len().to_string()),
        ("Unread", conversation.unread_count().to_string()),
        ("Attachments", conversation.attachment_count().to_string()),
        ("Duration (days)", format_number(conversation.conversation_duration_days, 1)),
        ("Latest email", format_date(&conversation.latest_email_date)),
    ];

    view! {
        <section class="card p-6 space-y-6">
            <h2 class="title-lg text-theme-primary flex items-center gap-2">
                <Icon name=icons::MESSAGES class="w-5 h-5"/>
                {subject}
            </h2>
            <div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-6 gap-3">
                {stats.into_iter().map(|(label, value)| view! {
                    <div class="p-3 rounded-lg bg-theme-secondary">
                        <p class="text-sm font-medium text-theme-primary">{value}</p>
                        <p class="text-xs text-theme-secondary">{label}</p>
                    </div>
                }).collect_view()}
            </div>
            <div>
                <h3 class="title-md text-theme-primary mb-2 flex items-center gap-2">
                    <Icon name=icons::USERS class="w-4 h-4"/>
                    "Participants"
                </h3>
                <div class="flex flex-wrap gap-2">
                    {conversation.participants.values().cloned().collect::<Vec<_>>().into_iter().map(|p| view! {
                        <Badge>{p.label()}</Badge>
                    }).collect_view()}
                </div>
            </div>
            <div class="space-y-3">
                {conversation.emails.into_iter().map(|email| {
                    let href = routes::email(email.id);
                    let preview = if email.body_preview.is_empty() { email.body.clone() } else { email.body_preview.clone() };
                    view! {
                        <a href=href class="block p-4 rounded-lg border border-theme hover:bg-theme-tertiary">
                            <div class="flex items-center justify-between gap-2">
                                <span class="font-medium text-theme-primary truncate">{email.sender_label().to_string()}</span>
                                <span class="text-xs text-theme-secondary whitespace-nowrap">
                                    {format_date_time(&email.received_date)}
                                </span>
                            </div>
                            <div class="flex items-center gap-2 mt-1">
                                {(!email.is_read).then(|| view! { <Badge variant=BadgeVariant::Info>"New"</Badge> })}
                                {email.has_attachments.then(|| view! { <Icon name=icons::PAPERCLIP class="w-4 h-4"/> })}
                                <span class="text-sm text-theme-primary truncate">{email.subject.clone()}</span>
                            </div>
                            <p class="text-sm text-theme-secondary mt-1 line-clamp-2">{preview}</p>
                        </a>
                    }
                }).collect_view()}
            </div>
        </section>
    }
}

#[component]
fn GenerateResponsePanel(
    conversation_id: Memo<String>,
    #[prop(into)]
    loading: Signal<bool>,
    #[prop(into)]
    on_generate: Callback<GenerateResponseRequest>,
) -> impl IntoView {
    let context = RwSignal::new(String::new());
    let max_tokens = RwSignal::new(500u32);
    let force_regenerate = RwSignal::new(false);

    let token_options = MAX_TOKEN_CHOICES
        .iter()
        .map(|n| (n.to_string(), format!("{} tokens", n)))
        .collect::<Vec<_>>();

    let submit = move |_| {
        let prompt = context.get_untracked().trim().to_string();
        if prompt.is_empty() {
            return;
        }
        let mut request = GenerateResponseRequest::new(conversation_id.get_untracked());
        request.context = prompt;
        request.max_tokens = max_tokens.get_untracked();
        request.force_regenerate = force_regenerate.get_untracked();
        on_generate.run(request);
    };

    view! {
        <section class="card p-6 space-y-4">
            <h3 class="title-md text-theme-primary flex items-center gap-2">
                <Icon name=icons::SPARKLES class="w-5 h-5"/>
                "Generate AI response"
            </h3>
            <div class="space-y-1.5">
                <label class="label">"Context / Prompt"</label>
                <textarea
                    class="input-base resize-none"
                    rows=4
                    placeholder="Enter context or prompt for AI response..."
                    prop:value=move || context.get()
                    on:input=move |ev| context.set(event_target_value(&ev))
                ></textarea>
            </div>
            <div class="grid gap-4 md:grid-cols-2 items-end">
                <SelectField
                    label="Max tokens"
                    value=Signal::derive(move || max_tokens.get().to_string())
                    on_change=move |raw: String| {
                        if let Ok(n) = raw.parse::<u32>() {
                            max_tokens.set(n);
                        }
                    }
                    options=token_options
                />
                <label class="flex items-center gap-2 text-sm text-theme-primary">
                    <input
                        type="checkbox"
                        prop:checked=move || force_regenerate.get()
                        on:change=move |ev| force_regenerate.set(event_target_checked(&ev))
                    />
                    "Force regenerate"
                </label>
            </div>
            <div class="flex justify-end">
                <Button
                    icon=icons::SPARKLES
                    loading=loading
                    disabled=Signal::derive(move || context.with(|c| c.trim().is_empty()))
                    on_click=submit
                >
                    {move || if loading.get() { "Generating..." } else { "Generate response" }}
                </Button>
            </div>
        </section>
    }
}

#[component]
fn AnalysisPanel(analysis: QueryState<AnalyzeConversationResponse>) -> impl IntoView {
    view! {
        <section class="card p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h3 class="title-md text-theme-primary">"AI analysis"</h3>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Small
                    icon=icons::REFRESH
                    on_click=move |_| analysis.refetch()
                >
                    "Analyze again"
                </Button>
            </div>
            {move || {
                if let Some(error) = analysis.error.get() {
                    return view! { <p class="text-sm text-theme-error">{error}</p> }.into_any();
                }
                let Some(result) = analysis.data.get() else {
                    return view! {
                        <div class="flex items-center gap-2 text-sm text-theme-secondary">
                            <Spinner size=SpinnerSize::Small/>
                            "Analyzing conversation..."
                        </div>
                    }.into_any();
                };
                view! {
                    <div class="space-y-4">
                        <div>
                            <h4 class="font-medium text-theme-primary mb-1">"Summary"</h4>
                            <p class="text-sm text-theme-secondary">{result.summary.clone()}</p>
                        </div>
                        <div class="flex flex-wrap gap-6">
                            <div>
                                <h4 class="font-medium text-theme-primary mb-1">"Sentiment"</h4>
                                <Badge variant=BadgeVariant::for_level(&result.sentiment)>{result.sentiment.clone()}</Badge>
                            </div>
                            <div>
                                <h4 class="font-medium text-theme-primary mb-1">"Urgency level"</h4>
                                <Badge variant=BadgeVariant::for_level(&result.urgency_level)>{result.urgency_level.clone()}</Badge>
                            </div>
                        </div>
                        <BulletList title="Key points" items=result.key_points.clone()/>
                        <BulletList title="Suggested actions" items=result.suggested_actions.clone()/>
                        {(!result.participants_summary.is_empty()).then(|| view! {
                            <div>
                                <h4 class="font-medium text-theme-primary mb-1">"Participants"</h4>
                                <dl class="text-sm space-y-1">
                                    {result.participants_summary.iter().map(|(who, role)| view! {
                                        <div class="flex gap-2">
                                            <dt class="font-medium text-theme-primary">{who.clone()}</dt>
                                            <dd class="text-theme-secondary">{role.clone()}</dd>
                                        </div>
                                    }).collect_view()}
                                </dl>
                            </div>
                        })}
                    </div>
                }.into_any()
            }}
        </section>
    }
}

#[component]
fn BulletList(title: &'static str, items: Vec<String>) -> impl IntoView {
    (!items.is_empty()).then(|| {
        view! {
            <div>
                <h4 class="font-medium text-theme-primary mb-1">{title}</h4>
                <ul class="list-disc list-inside text-sm text-theme-secondary space-y-1">
                    {items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
                </ul>
            </div>
        }
    })
}

#[component]
fn RelatedEmailsPanel(related: QueryState<RelatedEmailsResponse>) -> impl IntoView {
    view! {
        <section class="card p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h3 class="title-md text-theme-primary">"Related emails"</h3>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Small
                    icon=icons::REFRESH
                    on_click=move |_| related.refetch()
                >
                    "Refresh"
                </Button>
            </div>
            {move || {
                if let Some(error) = related.error.get() {
                    return view! { <p class="text-sm text-theme-error">{error}</p> }.into_any();
                }
                match related.data.get() {
                    None => view! { <Spinner size=SpinnerSize::Small label="Finding related emails..."/> }.into_any(),
                    Some(found) if found.related_emails.is_empty() => view! {
                        <p class="text-sm text-theme-secondary">"No related emails found."</p>
                    }.into_any(),
                    Some(found) => found.related_emails.into_iter().map(|email| {
                        let relevance = format!("{}% relevant", (email.relevance_score * 100.0).round());
                        view! {
                            <a
                                href=routes::conversation(&email.conversation_id)
                                class="block p-4 rounded-lg border border-theme hover:bg-theme-tertiary space-y-1"
                            >
                                <div class="flex items-center gap-2">
                                    <Badge variant=BadgeVariant::Primary>{relevance}</Badge>
                                    <span class="text-xs text-theme-secondary">{format_date(&email.received_date)}</span>
                                </div>
                                <p class="font-medium text-theme-primary">{email.subject.clone()}</p>
                                <p class="text-xs text-theme-secondary">
                                    {if email.sender_name.is_empty() { email.sender_email.clone() } else { email.sender_name.clone() }}
                                </p>
                                {(!email.relevance_reason.is_empty()).then(|| view! {
                                    <p class="text-sm text-theme-secondary">{email.relevance_reason.clone()}</p>
                                })}
                                {(!email.summary.is_empty()).then(|| view! {
                                    <p class="text-sm text-theme-primary">{email.summary.clone()}</p>
                                })}
                            </a>
                        }
                    }).collect_view().into_any(),
                }
            }}
        </section>
    }
}

#[component]
fn ResponsesPanel(
    responses: QueryState<ResponsesResponse>,
    #[prop(into)]
    page_size: Signal<u32>,
    #[prop(into)]
    on_page: Callback<u32>,
    #[prop(into)]
    on_page_size: Callback<u32>,
    /// Asks to delete the response with this id
    #[prop(into)]
    on_delete: Callback<String>,
    #[prop(into)]
    on_clear_cache: Callback<()>,
) -> impl IntoView {
    view! {
        <section class="card p-6 space-y-4">
            <div class="flex flex-wrap items-center justify-between gap-2">
                <h3 class="title-md text-theme-primary">"AI responses"</h3>
                <div class="flex items-center gap-2">
                    <PageSizeSelect value=page_size on_change=on_page_size/>
                    <Button
                        variant=ButtonVariant::Secondary
                        size=ButtonSize::Small
                        icon=icons::TRASH
                        on_click=move |_| on_clear_cache.run(())
                    >
                        "Clear cache"
                    </Button>
                </div>
            </div>
            {move || {
                if let Some(error) = responses.error.get() {
                    return view! { <p class="text-sm text-theme-error">{error}</p> }.into_any();
                }
                match responses.data.get() {
                    None => view! { <Spinner size=SpinnerSize::Small label="Loading responses..."/> }.into_any(),
                    Some(page) if page.responses.is_empty() => view! {
                        <p class="text-sm text-theme-secondary">"No AI responses generated yet."</p>
                    }.into_any(),
                    Some(page) => {
                        let pagination = Pagination::compute(page.page_num.max(1), page.page_size, page.total_count);
                        view! {
                            <div class="space-y-3">
                                {page.responses.into_iter().map(|response| view! {
                                    <ResponseItem response=response on_delete=on_delete/>
                                }).collect_view()}
                            </div>
                            <Pager pagination=Signal::derive(move || pagination) on_page=on_page noun="responses"/>
                        }.into_any()
                    }
                }
            }}
        </section>
    }
}

#[component]
fn ResponseItem(response: AiResponse, on_delete: Callback<String>) -> impl IntoView {
    let id = response.id.clone();
    view! {
        <article class="p-4 rounded-lg border border-theme space-y-2">
            <div class="flex items-center justify-between gap-2">
                <div class="flex items-center gap-2">
                    <Badge>{response.model_used.clone()}</Badge>
                    {response.is_cached.then(|| view! { <Badge variant=BadgeVariant::Info>"Cached"</Badge> })}
                </div>
                <button
                    class="btn-base btn-ghost btn-sm"
                    aria-label="Delete response"
                    on:click=move |_| on_delete.run(id.clone())
                >
                    <Icon name=icons::TRASH class="w-4 h-4"/>
                </button>
            </div>
            <p class="text-sm text-theme-primary whitespace-pre-wrap">{response.response_text.clone()}</p>
            <div class="flex flex-wrap gap-4 text-xs text-theme-secondary">
                <span>"Tokens: "{response.tokens_used}</span>
                <span>{format!("{} ms", format_number(response.processing_time_ms, 0))}</span>
                <span>{format_date_time(&response.created_at)}</span>
            </div>
        </article>
    }
}
