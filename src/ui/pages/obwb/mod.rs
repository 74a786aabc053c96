//! Email service pages: mailbox, conversations and the AI assistant

mod access_result;
mod ai_digest;
mod connect_email;
mod conversation_detail;
mod conversations;
mod email_detail;
mod emails;
mod fields;
mod follow_ups;

pub use access_result::AccessResultPage;
pub use ai_digest::AiDigestPage;
pub use connect_email::ConnectEmailPage;
pub use conversation_detail::ConversationDetailPage;
pub use conversations::ConversationsPage;
pub use email_detail::EmailDetailPage;
pub use emails::EmailsPage;
pub use follow_ups::FollowUpsPage;

use leptos::prelude::*;

use crate::core::routes;
use crate::ui::common::EmptyState;
use crate::ui::{Icon, icons};

/// Shown in place of mailbox data until a mailbox is linked
#[component]
pub(crate) fn NoMailbox() -> impl IntoView {
    view! {
        <EmptyState
            icon=icons::MAIL
            title="No email account connected"
            message="Connect your Microsoft account to see your emails here."
        >
            <a href=routes::CONNECT_EMAIL class="btn-base btn-primary">
                <Icon name=icons::LINK class="icon-btn"/>
                "Connect Email"
            </a>
        </EmptyState>
    }
}
