use leptos::prelude::*;

use crate::notifications::use_notifier;

/// Fixed stack of transient notifications, newest last.
#[component]
pub fn NotificationHost() -> impl IntoView {
    let notifier = use_notifier();
    let queue = notifier.queue();

    view! {
        <div class="notification-stack" aria-live="polite">
            <For
                each=move || queue.with(|q| q.items().to_vec())
                key=|n| n.id
                children=move |n| {
                    let id = n.id;
                    view! {
                        <div class=n.notice.severity.css_class() role="status">
                            <span class="notification-message">{n.notice.message}</span>
                            <button
                                class="notification-close"
                                title="Dismiss"
                                on:click=move |_| notifier.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
