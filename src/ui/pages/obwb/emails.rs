//! Mailbox list
//!
//! Page and filters live in the address bar so a filtered view can be
//! bookmarked; the page size is local. Changing either the size or the
//! filters goes back to page 1.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use super::fields::{
    DEFAULT_PAGE_SIZE, PageSizeSelect, bind_flag, bind_importance, bind_sort_order, bind_text,
    flag_options, importance_options, options, sort_order_options,
};
use super::NoMailbox;
use crate::core::format::format_relative;
use crate::core::models::emails::{Email, EmailFilters};
use crate::core::models::query_pairs;
use crate::core::query::{LIST_STALE_TIME, keys};
use crate::core::routes;
use crate::core::validation::validate_email_filters;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Badge, BadgeVariant, Button, ButtonVariant, EmptyState, ErrorState, FormField, PageHeader,
    Pager, SelectField, SkeletonGroup,
};
use crate::ui::notifications::use_notifications;
use crate::ui::query::use_query;
use crate::ui::{Icon, icons};

const SORT_FIELDS: [(&str, &str); 4] = [
    ("received_date", "Received date"),
    ("sender_name", "Sender name"),
    ("subject", "Subject"),
    ("importance", "Importance"),
];

#[component]
pub fn EmailsPage() -> impl IntoView {
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
        (page, EmailFilters::from_query(|key| params.get(key)))
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
            &routes::with_query(routes::EMAILS, &pairs),
            NavigateOptions {
                replace: true,
                scroll: false,
                ..Default::default()
            },
        );
    });

    let emails = use_query(
        move || {
            let ms = auth.microsoft_user_id()?;
            let (page, size, filters) = (page.get(), page_size.get(), filters.get());
            Some((keys::emails(&ms, page, size, &filters), (ms, page, size, filters)))
        },
        LIST_STALE_TIME,
        |api, (ms, page, size, filters): (String, u32, u32, EmailFilters)| async move {
            api.emails.list(&ms, page, size, &filters).await
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
                    queries.invalidate(&keys::emails_root(&ms));
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
    let on_apply = move |next: EmailFilters| {
        filters.set(next);
        page.set(1);
    };
    let on_clear = move |_| {
        filters.set(EmailFilters::default());
        page.set(1);
    };

    let has_mailbox = move || auth.microsoft_user_id().is_some();
    let active_filters = move || filters.with(EmailFilters::active_count);

    view! {
        <div class="space-y-6">
            <PageHeader icon=icons::MAIL title="Emails">
                <Show when=has_mailbox>
                    <PageSizeSelect value=page_size on_change=on_page_size/>
                    <Button
                        variant=ButtonVariant::Secondary
                        icon=icons::FILTER
                        on_click=move |_| show_filters.update(|v| *v = !*v)
                    >
                        "Filters"
                        {move || {
                            let count = active_filters();
                            (count > 0).then(|| view! { <Badge variant=BadgeVariant::Primary>{count}</Badge> })
                        }}
                    </Button>
                    <Button icon=icons::REFRESH loading=syncing on_click=sync_emails>
                        {move || if syncing.get() { "Syncing..." } else { "Sync" }}
                    </Button>
                </Show>
            </PageHeader>

            <Show when=move || has_mailbox() && show_filters.get()>
                <EmailFiltersPanel
                    applied=filters.read_only()
                    on_apply=on_apply
                    on_clear=on_clear
                />
            </Show>

            {move || {
                if !has_mailbox() {
                    return view! { <NoMailbox/> }.into_any();
                }
                if let Some(error) = emails.error.get() {
                    return view! {
                        <ErrorState
                            title="Failed to load emails"
                            message=error
                            on_retry=Callback::new(move |_| emails.refetch())
                        />
                    }.into_any();
                }
                match emails.data.get() {
                    None => view! { <div class="card p-6"><SkeletonGroup lines=8/></div> }.into_any(),
                    Some(response) if response.emails.is_empty() => view! {
                        <EmptyState
                            icon=icons::MAIL_OPEN
                            title="No emails found"
                            message="Try syncing your mailbox or relaxing the filters."
                        />
                    }.into_any(),
                    Some(response) => {
                        let pagination = response.pagination;
                        view! {
                            <div class="card overflow-hidden">
                                <EmailTable emails=response.emails/>
                            </div>
                            <Pager
                                pagination=Signal::derive(move || pagination)
                                on_page=move |p| page.set(p)
                                noun="emails"
                            />
                        }.into_any()
                    }
                }
            }}
        </div>
    }
}

#[component]
fn EmailTable(emails: Vec<Email>) -> impl IntoView {
    let now = Utc::now();
    view! {
        <table class="table-base w-full">
            <thead>
                <tr>
                    <th>"From"</th>
                    <th>"Subject"</th>
                    <th>"Date"</th>
                    <th class="w-20">"Status"</th>
                </tr>
            </thead>
            <tbody>
                {emails.into_iter().map(|email| {
                    let href = routes::email(email.id);
                    let subject = if email.subject.trim().is_empty() {
                        "(No Subject)".to_string()
                    } else {
                        email.subject.clone()
                    };
                    view! {
                        <tr class="hover:bg-theme-tertiary" class:font-semibold=!email.is_read>
                            <td>
                                <a href=href.clone() class="block space-y-1">
                                    <span class="block text-theme-primary">{email.sender_label().to_string()}</span>
                                    <span class="block text-xs text-theme-secondary truncate max-w-xs">{email.sender_email.clone()}</span>
                                </a>
                            </td>
                            <td>
                                <a href=href class="block space-y-1">
                                    <span class="flex items-center gap-2 text-theme-primary">
                                        {subject}
                                        {email.has_attachments.then(|| view! { <Icon name=icons::PAPERCLIP class="w-4 h-4"/> })}
                                        {email.is_high_importance().then(|| view! {
                                            <Badge variant=BadgeVariant::Danger>"High"</Badge>
                                        })}
                                    </span>
                                    <span class="block text-xs text-theme-secondary truncate max-w-md">{email.body_preview.clone()}</span>
                                </a>
                            </td>
                            <td class="text-sm text-theme-secondary whitespace-nowrap">
                                {format_relative(&email.received_date, now)}
                            </td>
                            <td>
                                {(!email.is_read).then(|| view! { <Badge variant=BadgeVariant::Info>"New"</Badge> })}
                            </td>
                        </tr>
                    }
                }).collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn EmailFiltersPanel(
    /// Filters currently applied to the list
    applied: ReadSignal<EmailFilters>,
    #[prop(into)]
    on_apply: Callback<EmailFilters>,
    #[prop(into)]
    on_clear: Callback<()>,
) -> impl IntoView {
    let draft = RwSignal::new(applied.get_untracked());
    let after_error = RwSignal::new(None::<String>);
    let before_error = RwSignal::new(None::<String>);

    let (search, on_search) = bind_text(draft, |f| &f.search_text, |f, v| f.search_text = v);
    let (sender, on_sender) = bind_text(draft, |f| &f.sender_email, |f, v| f.sender_email = v);
    let (sender_name, on_sender_name) =
        bind_text(draft, |f| &f.sender_name_contains, |f, v| f.sender_name_contains = v);
    let (subject, on_subject) = bind_text(draft, |f| &f.subject_contains, |f, v| f.subject_contains = v);
    let (body, on_body) = bind_text(draft, |f| &f.body_contains, |f, v| f.body_contains = v);
    let (after, on_after) = bind_text(draft, |f| &f.received_after, |f, v| f.received_after = v);
    let (before, on_before) = bind_text(draft, |f| &f.received_before, |f, v| f.received_before = v);
    let (read, on_read) = bind_flag(draft, |f| f.is_read, |f, v| f.is_read = v);
    let (attachments, on_attachments) =
        bind_flag(draft, |f| f.has_attachments, |f, v| f.has_attachments = v);
    let (importance, on_importance) = bind_importance(draft, |f| f.importance, |f, v| f.importance = v);
    let (sort_order, on_sort_order) = bind_sort_order(draft, |f| f.sort_order, |f, v| f.sort_order = v);
    let sort_by = Signal::derive(move || draft.with(|f| f.sort_by.clone().unwrap_or_default()));
    let on_sort_by = Callback::new(move |raw: String| {
        draft.update(|f| f.sort_by = (!raw.is_empty()).then_some(raw));
    });

    let apply = move |_| {
        let next = draft.get_untracked();
        let checked = validate_email_filters(&next);
        after_error.set(checked.for_field("received_after").map(ToString::to_string));
        before_error.set(checked.for_field("received_before").map(ToString::to_string));
        if checked.is_valid() {
            on_apply.run(next);
        }
    };
    let clear = move |_| {
        draft.set(EmailFilters::default());
        after_error.set(None);
        before_error.set(None);
        on_clear.run(());
    };

    let mut sort_options = vec![(String::new(), "Default".to_string())];
    sort_options.extend(options(&SORT_FIELDS));

    view! {
        <div class="card p-6 space-y-6">
            <FormField
                label="Search"
                placeholder="Search emails..."
                value=search
                on_input=on_search
            />
            <div class="grid gap-4 md:grid-cols-2">
                <FormField label="Sender address" placeholder="sender@example.com" value=sender on_input=on_sender/>
                <FormField label="Sender name contains" placeholder="John Doe" value=sender_name on_input=on_sender_name/>
                <FormField label="Subject contains" placeholder="meeting, report, etc." value=subject on_input=on_subject/>
                <FormField label="Body contains" placeholder="Search in email body..." value=body on_input=on_body/>
                <FormField
                    label="Received after"
                    input_type="date"
                    value=after
                    on_input=on_after
                    error=Signal::from(after_error)
                />
                <FormField
                    label="Received before"
                    input_type="date"
                    value=before
                    on_input=on_before
                    error=Signal::from(before_error)
                />
            </div>
            <div class="grid gap-4 md:grid-cols-3">
                <SelectField
                    label="Read status"
                    value=read
                    on_change=on_read
                    options=flag_options("All emails", "Read only", "Unread only")
                />
                <SelectField
                    label="Attachments"
                    value=attachments
                    on_change=on_attachments
                    options=flag_options("All emails", "With attachments", "Without attachments")
                />
                <SelectField label="Importance" value=importance on_change=on_importance options=importance_options()/>
                <SelectField label="Sort by" value=sort_by on_change=on_sort_by options=sort_options/>
                <SelectField
                    label="Sort order"
                    value=sort_order
                    on_change=on_sort_order
                    options=sort_order_options()
                />
            </div>
            <div class="flex justify-end gap-2">
                <Button variant=ButtonVariant::Ghost on_click=clear>"Clear all"</Button>
                <Button icon=icons::CHECK on_click=apply>"Apply filters"</Button>
            </div>
        </div>
    }
}
