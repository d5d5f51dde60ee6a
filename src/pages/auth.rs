use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::app::DASHBOARD_PATH;
use crate::config::AppConfig;
use crate::error::{user_message, Action};
use crate::forms::{LoginForm, RegisterForm};
use crate::notifications::{schedule, use_notifier, Notice};
use crate::session::SessionStore;
use crate::transport::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Login,
    Register,
}

#[component]
pub fn AuthPage() -> impl IntoView {
    if SessionStore::browser().has_session() {
        return view! { <Redirect path=DASHBOARD_PATH /> }.into_any();
    }

    let notifier = use_notifier();
    let navigate = use_navigate();
    let config = AppConfig::load();
    let min_password_len = config.min_password_len;

    let (tab, set_tab) = signal(Tab::Login);
    let login = RwSignal::new(LoginForm::default());
    let register = RwSignal::new(RegisterForm::default());
    let (logging_in, set_logging_in) = signal(false);
    let (registering, set_registering) = signal(false);

    let on_login = move |ev: SubmitEvent| {
        ev.prevent_default();
        if logging_in.get_untracked() {
            return;
        }
        let form = login.get_untracked();
        if let Err(e) = form.validate() {
            notifier.notify(Notice::error(user_message(&e, Action::Login)));
            return;
        }
        set_logging_in.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let client = ApiClient::browser();
            match client.login(form.email.trim(), &form.password).await {
                Ok(profile) => {
                    notifier.notify(Notice::success(format!("Welcome, {}!", profile.name)));
                    schedule(client.config().redirect_delay, move || {
                        navigate(DASHBOARD_PATH, Default::default());
                    });
                }
                Err(e) => {
                    notifier.notify(Notice::error(user_message(&e, Action::Login)));
                    set_logging_in.set(false);
                }
            }
        });
    };

    let on_register = move |ev: SubmitEvent| {
        ev.prevent_default();
        if registering.get_untracked() {
            return;
        }
        let form = register.get_untracked();
        if let Err(e) = form.validate(min_password_len) {
            notifier.notify(Notice::error(user_message(&e, Action::Register)));
            return;
        }
        set_registering.set(true);
        spawn_local(async move {
            let client = ApiClient::browser();
            let result = client
                .register(form.username.trim(), form.email.trim(), &form.password)
                .await;
            set_registering.set(false);
            match result {
                Ok(()) => {
                    notifier.notify(Notice::success("Account created! You can now log in."));
                    register.set(RegisterForm::default());
                    let email = form.email.trim().to_string();
                    schedule(client.config().tab_switch_delay, move || {
                        login.update(|f| f.email = email);
                        set_tab.set(Tab::Login);
                    });
                }
                Err(e) => notifier.notify(Notice::error(user_message(&e, Action::Register))),
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <div class="auth-brand">
                    <i class="fas fa-bolt"></i>
                    <h1>"Flashdeck"</h1>
                    <p>"Create decks, add cards and keep your study on track."</p>
                </div>

                <div class="auth-tabs">
                    <button
                        class="auth-tab"
                        class:active=move || tab.get() == Tab::Login
                        on:click=move |_| set_tab.set(Tab::Login)
                    >
                        "Log in"
                    </button>
                    <button
                        class="auth-tab"
                        class:active=move || tab.get() == Tab::Register
                        on:click=move |_| set_tab.set(Tab::Register)
                    >
                        "Register"
                    </button>
                </div>

                <Show when=move || tab.get() == Tab::Login>
                    <form class="auth-form" on:submit=on_login.clone()>
                        <div class="form-group">
                            <label for="login-email">"Email"</label>
                            <input
                                id="login-email"
                                type="email"
                                class="input"
                                autocomplete="email"
                                prop:value=move || login.with(|f| f.email.clone())
                                on:input=move |ev| login.update(|f| f.email = event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label for="login-password">"Password"</label>
                            <input
                                id="login-password"
                                type="password"
                                class="input"
                                autocomplete="current-password"
                                prop:value=move || login.with(|f| f.password.clone())
                                on:input=move |ev| login.update(|f| f.password = event_target_value(&ev))
                            />
                        </div>
                        <button type="submit" class="btn btn-primary btn-block" disabled=move || logging_in.get()>
                            {move || if logging_in.get() { "Logging in..." } else { "Log in" }}
                        </button>
                    </form>
                </Show>

                <Show when=move || tab.get() == Tab::Register>
                    <form class="auth-form" on:submit=on_register>
                        <div class="form-group">
                            <label for="register-name">"Name"</label>
                            <input
                                id="register-name"
                                type="text"
                                class="input"
                                prop:value=move || register.with(|f| f.username.clone())
                                on:input=move |ev| register.update(|f| f.username = event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label for="register-email">"Email"</label>
                            <input
                                id="register-email"
                                type="email"
                                class="input"
                                autocomplete="email"
                                prop:value=move || register.with(|f| f.email.clone())
                                on:input=move |ev| register.update(|f| f.email = event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label for="register-password">"Password"</label>
                            <input
                                id="register-password"
                                type="password"
                                class="input"
                                autocomplete="new-password"
                                placeholder=format!("At least {} characters", min_password_len)
                                prop:value=move || register.with(|f| f.password.clone())
                                on:input=move |ev| register.update(|f| f.password = event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label for="register-confirm">"Confirm password"</label>
                            <input
                                id="register-confirm"
                                type="password"
                                class="input"
                                autocomplete="new-password"
                                prop:value=move || register.with(|f| f.confirm_password.clone())
                                on:input=move |ev| register.update(|f| f.confirm_password = event_target_value(&ev))
                            />
                        </div>
                        <button type="submit" class="btn btn-primary btn-block" disabled=move || registering.get()>
                            {move || if registering.get() { "Creating account..." } else { "Create account" }}
                        </button>
                    </form>
                </Show>
            </div>
        </div>
    }
    .into_any()
}
