use leptos::ev;
use leptos::prelude::*;

/// Overlay dialog. Clicking the backdrop, the close button or pressing
/// Escape calls `on_close`; clicks inside the dialog do not.
#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    let handle = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == "Escape" {
            on_close.run(());
        }
    });
    on_cleanup(move || handle.remove());

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal-content" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>{move || title.get()}</h3>
                    <button class="btn-icon modal-close" title="Close" on:click=move |_| on_close.run(())>
                        <i class="fas fa-xmark"></i>
                    </button>
                </div>
                {children()}
            </div>
        </div>
    }
}
