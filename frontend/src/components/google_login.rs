use crate::auth::use_auth;
use crate::components::icons::GoogleMark;
use crate::components::toast::use_toaster;
use crate::config::AppConfig;
use crate::web::google;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 「Continue with Google」按钮；未配置 client id 时不渲染
#[component]
pub fn GoogleLoginButton() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();
    let client_id = expect_context::<AppConfig>().google_client_id;
    let (pending, set_pending) = signal(false);

    client_id.map(|client_id| {
        let on_click = move |_| {
            let Some(service) = auth.service() else {
                return;
            };
            let client_id = client_id.clone();
            set_pending.set(true);
            spawn_local(async move {
                let result = match google::sign_in(&client_id).await {
                    Ok(user) => service.login_with_google(user).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    tracing::warn!(error = %e, "google sign-in failed");
                    toaster.error(e.user_message_or("Failed to login with Google"));
                }
                set_pending.try_set(false);
            });
        };

        view! {
            <div class="divider text-sm text-base-content/50">"or"</div>
            <button type="button" class="btn btn-outline gap-2" on:click=on_click disabled=move || pending.get()>
                <GoogleMark attr:class="h-5 w-5" />
                "Continue with Google"
            </button>
        }
    })
}
