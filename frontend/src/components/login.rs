use crate::auth::use_auth;
use crate::components::google_login::GoogleLoginButton;
use crate::components::icons::Brain;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mindtrack::credentials::{CredentialField, LoginInput};
use mindtrack::ValidationErrors;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (field_errors, set_field_errors) = signal(ValidationErrors::<CredentialField>::new());

    let field_error = move |field| field_errors.with(|e| e.get(field).map(str::to_string));

    // 成功后无需手动跳转：会话进入 Member 后路由服务会重定向到控制面板
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let input = LoginInput {
            email: email.get(),
            password: password.get(),
        };
        if let Err(errors) = input.validate() {
            set_field_errors.set(errors);
            return;
        }
        set_field_errors.set(ValidationErrors::new());
        set_error_msg.set(None);

        let Some(service) = auth.service() else {
            return;
        };
        set_is_submitting.set(true);
        spawn_local(async move {
            if let Err(e) = service.login_with_password(&input.email, &input.password).await {
                tracing::warn!(error = %e, "login failed");
                set_error_msg.try_set(Some(e.user_message()));
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Brain attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Welcome back"</h1>
                        <p class="text-base-content/70">"Sign in to your account"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                            {move || field_error(CredentialField::Email).map(|msg| view! {
                                <span class="text-error text-sm mt-1">{msg}</span>
                            })}
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                            {move || field_error(CredentialField::Password).map(|msg| view! {
                                <span class="text-error text-sm mt-1">{msg}</span>
                            })}
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>

                        <GoogleLoginButton />

                        <p class="text-center text-sm mt-2">
                            "Don't have an account? "
                            <Link to=AppRoute::Register class="link link-primary">"Register"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
