use crate::auth::use_auth;
use crate::components::icons::Brain;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mindtrack::ValidationErrors;
use mindtrack::credentials::{CredentialField, RegisterInput};

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] autocomplete: &'static str,
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                autocomplete=autocomplete
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
            />
            {move || error.get().map(|msg| view! {
                <span class="text-error text-sm mt-1">{msg}</span>
            })}
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let field_errors = RwSignal::new(ValidationErrors::<CredentialField>::new());

    let error_for = move |field: CredentialField| {
        Signal::derive(move || field_errors.with(|e| e.get(field).map(str::to_string)))
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let input = RegisterInput {
            name: name.get(),
            email: email.get(),
            password: password.get(),
            confirm_password: confirm_password.get(),
        };
        if let Err(errors) = input.validate() {
            field_errors.set(errors);
            return;
        }
        field_errors.set(ValidationErrors::new());
        set_error_msg.set(None);

        let Some(service) = auth.service() else {
            return;
        };
        set_is_submitting.set(true);
        spawn_local(async move {
            if let Err(e) = service
                .register(&input.name, &input.email, &input.password)
                .await
            {
                tracing::warn!(error = %e, "registration failed");
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
                        <h1 class="text-3xl font-bold">"Create an account"</h1>
                        <p class="text-base-content/70">"Start tracking your daily wellbeing"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <TextField id="name" label="Name" autocomplete="name" value=name error=error_for(CredentialField::Name) />
                        <TextField id="email" label="Email" kind="email" autocomplete="email" value=email error=error_for(CredentialField::Email) />
                        <TextField id="password" label="Password" kind="password" autocomplete="new-password" value=password error=error_for(CredentialField::Password) />
                        <TextField id="confirm-password" label="Confirm Password" kind="password" autocomplete="new-password" value=confirm_password error=error_for(CredentialField::ConfirmPassword) />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>

                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
