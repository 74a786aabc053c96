//! Conversation threads of the linked mailbox

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use super::fields::{
    DEFAULT_PAGE_SIZE, PageSizeSelect, bind_flag, bind_importance, bind_sort_order, bind_text,
    flag_options, importance_options, sort_order_options,
};
use super::NoMailbox;
use crate::core::format::format_relative;
use crate::core::models::conversations::{Conversation, ConversationFilters};
use crate::core::models::query_pairs;
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::core::routes;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Badge, BadgeVariant, Button, ButtonVariant, EmptyState, ErrorState, FormField, PageHeader,
    Pager, SelectField, SkeletonGroup,
};
use crate::ui::notifications::use_notifications;
use crate::ui::query::use_query;
use crate::ui::{Icon, icons};

fn sort_label(field: &str) -> &'static str {
    match field {
        "latest_email_date" => "Latest email date",
        "first_email_date" => "First email date",
        "email_count" => "Email count",
        "subject" => "Subject",
        "participant_count" => "Participant count",
        _ => "Default",
    }
}

#[component]
pub fn ConversationsPage() -> impl IntoView {
    let auth = use_auth_context();
    let toasts = use_notifications();
    let navigate = use_navigate();
    let query = use_query_map();

    let (initial_page, initial_filters) = query.with_untracked(|params| {
        let page = params
            .get("page")
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);
        (page, ConversationFilters::from_query(|key| params.get(key)))
    });

    let page = RwSignal::new(initial_page);
    let page_size = RwSignal::new(DEFAULT_PAGE_SIZE);
    let filters = RwSignal::new(initial_filters);
    let show_filters = RwSignal::new(false);
    let syncing = RwSignal::new(false);

    Effect::new(move |_| {
        let mut pairs = vec![("page".to_string(), page.get().to_string())];
        pairs.extend(filters.with(|f| query_pairs(f)));
        navigate(
            &routes::with_query(routes::CONVERSATIONS, &pairs),
            NavigateOptions {
                replace: true,
                scroll: false,
                ..Default::default()
            },
        );
    });

    let conversations = use_query(
        move || {
            let ms = auth.microsoft_user_id()?;
            let (page, size, filters) = (page.get(), page_size.get(), filters.get());
            Some((keys::conversations(&ms, page, size, &filters), (ms, page, size, filters)))
        },
        LIST_STALE_TIME,
        |api, (ms, page, size, filters): (String, u32, u32, ConversationFilters)| async move {
            api.conversations.list(&ms, page, size, &filters).await
        },
    );

    let sync_emails = move |_| {
        let Some(ms) = untrack(|| auth.microsoft_user_id()) else {
            return;
        };
        syncing.set(true);
        let services = auth.services();
        let queries = auth.queries();
        spawn_local(async move {
            match services.emails.sync(&ms).await {
                Ok(response) => {
                    toasts.success(response.summary());
                    queries.invalidate(&keys::conversations_root(&ms));
                }
                Err(err) => {
                    leptos::logging::warn!("email sync failed: {}", err);
                    toasts.error("Failed to sync emails");
                }
            }
            syncing.set(false);
        });
    };

    let on_page_size = move |size: u32| {
        page_size.set(size);
        page.set(1);
    };
    let on_apply = move |next: ConversationFilters| {
        filters.set(next);
        page.set(1);
    };
    let on_clear = move |_| {
        filters.set(ConversationFilters::default());
        page.set(1);
    };

    let has_mailbox = move || auth.microsoft_user_id().is_some();

    view! {
        <div class="space-y-6">
            <PageHeader icon=icons::MESSAGES title="Conversations">
                <Show when=has_mailbox>
                    <PageSizeSelect value=page_size on_change=on_page_size/>
                    <Button
                        variant=ButtonVariant::Secondary
                        icon=icons::FILTER
                        on_click=move |_| show_filters.update(|v| *v = !*v)
                    >
                        "Filters"
                        {move || {
                            let count = filters.with(ConversationFilters::active_count);
                            (count > 0).then(|| view! { <Badge variant=BadgeVariant::Primary>{count}</Badge> })
                        }}
                    </Button>
                    <Button icon=icons::REFRESH loading=syncing on_click=sync_emails>
                        {move || if syncing.get() { "Syncing..." } else { "Sync" }}
                    </Button>
                </Show>
            </PageHeader>

            <Show when=move || has_mailbox() && show_filters.get()>
                <ConversationFiltersPanel
                    applied=filters.read_only()
                    on_apply=on_apply
                    on_clear=on_clear
                />
            </Show>

            {move || {
                if !has_mailbox() {
                    return view! { <NoMailbox/> }.into_any();
                }
                if let Some(error) = conversations.error.get() {
                    return view! {
                        <ErrorState
                            title="Failed to load conversations"
                            message=error
                            on_retry=Callback::new(move |_| conversations.refetch())
                        />
                    }.into_any();
                }
                match conversations.data.get() {
                    None => view! { <div class="card p-6"><SkeletonGroup lines=8/></div> }.into_any(),
                    Some(response) if response.conversations.is_empty() => view! {
                        <EmptyState
                            icon=icons::MESSAGES
                            title="No conversations found"
                            message="Sync your mailbox or adjust the filters."
                        />
                    }.into_any(),
                    Some(response) => {
                        let pagination = response.pagination;
                        view! {
                            <div class="card overflow-hidden">
                                <ConversationTable conversations=response.conversations/>
                            </div>
                            <Pager
                                pagination=Signal::derive(move || pagination)
                                on_page=move |p| page.set(p)
                                noun="conversations"
                            />
                        }.into_any()
                    }
                }
            }}
        </div>
    }
}

#[component]
fn ConversationTable(conversations: Vec<Conversation>) -> impl IntoView {
    let now = Utc::now();
    view! {
        <table class="table-base w-full">
            <thead>
                <tr>
                    <th>"Subject"</th>
                    <th>"From"</th>
                    <th class="text-right">"Emails"</th>
                    <th class="text-right">"Participants"</th>
                    <th>"Latest"</th>
                </tr>
            </thead>
            <tbody>
                {conversations.into_iter().map(|conversation| {
                    let href = routes::conversation(&conversation.conversation_id);
                    let subject = if conversation.subject.trim().is_empty() {
                        "(No Subject)".to_string()
                    } else {
                        conversation.subject.clone()
                    };
                    let sender = if conversation.sender_name.trim().is_empty() {
                        conversation.sender_email.clone()
                    } else {
                        conversation.sender_name.clone()
                    };
                    let high = conversation.importance.eq_ignore_ascii_case("high");
                    view! {
                        <tr class="hover:bg-theme-tertiary" class:font-semibold=conversation.has_unread>
                            <td>
                                <a href=href class="flex items-center gap-2 text-theme-primary">
                                    {subject}
                                    {conversation.has_attachments.then(|| view! { <Icon name=icons::PAPERCLIP class="w-4 h-4"/> })}
                                    {high.then(|| view! { <Badge variant=BadgeVariant::Danger>"High"</Badge> })}
                                    {conversation.has_unread.then(|| view! { <Badge variant=BadgeVariant::Info>"Unread"</Badge> })}
                                </a>
                            </td>
                            <td class="text-sm text-theme-secondary truncate max-w-xs">{sender}</td>
                            <td class="text-right">{conversation.email_count}</td>
                            <td class="text-right">{conversation.participant_count}</td>
                            <td class="text-sm text-theme-secondary whitespace-nowrap">
                                {format_relative(&conversation.latest_email_date, now)}
                            </td>
                        </tr>
                    }
                }).collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn ConversationFiltersPanel(
    applied: ReadSignal<ConversationFilters>,
    #[prop(into)]
    on_apply: Callback<ConversationFilters>,
    #[prop(into)]
    on_clear: Callback<()>,
) -> impl IntoView {
    let draft = RwSignal::new(applied.get_untracked());

    let (subject, on_subject) = bind_text(draft, |f| &f.subject_contains, |f, v| f.subject_contains = v);
    let (sender, on_sender) = bind_text(draft, |f| &f.sender_email, |f, v| f.sender_email = v);
    let (unread, on_unread) = bind_flag(draft, |f| f.has_unread, |f, v| f.has_unread = v);
    let (attachments, on_attachments) =
        bind_flag(draft, |f| f.has_attachments, |f, v| f.has_attachments = v);
    let (importance, on_importance) = bind_importance(draft, |f| f.importance, |f, v| f.importance = v);
    let (sort_order, on_sort_order) = bind_sort_order(draft, |f| f.sort_order, |f, v| f.sort_order = v);
    let sort_by = Signal::derive(move || draft.with(|f| f.sort_by.clone().unwrap_or_default()));
    let on_sort_by = Callback::new(move |raw: String| {
        draft.update(|f| f.sort_by = (!raw.is_empty()).then_some(raw));
    });

    let mut sort_options = vec![(String::new(), sort_label("").to_string())];
    sort_options.extend(
        ConversationFilters::SORT_FIELDS
            .iter()
            .map(|field| (field.to_string(), sort_label(field).to_string())),
    );

    let clear = move |_| {
        draft.set(ConversationFilters::default());
        on_clear.run(());
    };

    view! {
        <div class="card p-6 space-y-6">
            <div class="grid gap-4 md:grid-cols-2">
                <FormField label="Subject contains" placeholder="Search in subject..." value=subject on_input=on_subject/>
                <FormField label="Sender address" placeholder="Filter by sender email..." value=sender on_input=on_sender/>
            </div>
            <div class="grid gap-4 md:grid-cols-3">
                <SelectField
                    label="Unread"
                    value=unread
                    on_change=on_unread
                    options=flag_options("All conversations", "With unread emails", "Fully read")
                />
                <SelectField
                    label="Attachments"
                    value=attachments
                    on_change=on_attachments
                    options=flag_options("All conversations", "With attachments", "Without attachments")
                />
                <SelectField label="Importance" value=importance on_change=on_importance options=importance_options()/>
                <SelectField label="Sort by" value=sort_by on_change=on_sort_by options=sort_options/>
                <SelectField label="Sort order" value=sort_order on_change=on_sort_order options=sort_order_options()/>
            </div>
            <div class="flex justify-end gap-2">
                <Button variant=ButtonVariant::Ghost on_click=clear>"Clear all"</Button>
                <Button icon=icons::CHECK on_click=move |_| on_apply.run(draft.get_untracked())>
                    "Apply filters"
                </Button>
            </div>
        </div>
    }
}
