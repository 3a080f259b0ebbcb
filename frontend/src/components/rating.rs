use leptos::prelude::*;
use mindtrack_shared::{SCALE_MAX, SCALE_MIN};

/// 1..=5 评分按钮组
#[component]
pub fn Rating(
    label: &'static str,
    #[prop(into)] value: Signal<Option<f64>>,
    #[prop(into)] on_change: Callback<f64>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(optional)] low_hint: &'static str,
    #[prop(optional)] high_hint: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control gap-2">
            <span class="label-text font-medium">{label}</span>
            <div class="join">
                {(SCALE_MIN..=SCALE_MAX)
                    .map(|n| {
                        let score = n as f64;
                        let class = move || {
                            if value.get() == Some(score) {
                                "join-item btn btn-sm btn-primary"
                            } else {
                                "join-item btn btn-sm"
                            }
                        };
                        view! {
                            <button type="button" class=class on:click=move |_| on_change.run(score)>
                                {n}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="flex justify-between text-xs text-base-content/50 max-w-xs">
                <span>{low_hint}</span>
                <span>{high_hint}</span>
            </div>
            {move || error.get().map(|msg| view! { <span class="text-error text-sm">{msg}</span> })}
        </div>
    }
}
