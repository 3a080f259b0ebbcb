//! 每日自评表单页面
//!
//! 表单状态完全由 [`LogFormModel`] 持有，本组件只负责输入绑定与请求调度。

use crate::auth::use_auth;
use crate::components::rating::Rating;
use crate::components::toast::use_toaster;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mindtrack::{LogDraft, LogField, LogFormModel};

const LOAD_TODAY_FAILED: &str = "Failed to load today's log";
const LOAD_RECORD_FAILED: &str = "Failed to load log";
const SUBMIT_FAILED: &str = "Failed to submit log";

/// 表单打开的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormMode {
    /// 今天的记录：存在则更新，否则新建
    Today,
    /// 按 id 编辑已有记录
    Record(String),
}

#[component]
pub fn LogFormPage(mode: LogFormMode) -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();
    let router = use_router();

    let model = RwSignal::new(LogFormModel::new());
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let record_date = RwSignal::new(None::<chrono::NaiveDate>);

    let errors = Memo::new(move |_| model.with(LogFormModel::errors));
    let error_for = move |field: LogField| {
        Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
    };
    let draft = move || model.with(|m| m.draft().clone());
    // 组件卸载后 owner 释放信号，迟到的响应不再产生提示或跳转
    let mounted = move || model.try_with_untracked(|_| ()).is_some();
    let edit = move |f: fn(&mut LogDraft, f64)| Callback::new(move |v: f64| model.update(|m| m.edit(|d| f(d, v))));

    // --- 加载 ---
    if let Some(channel) = auth.channel() {
        let mode = mode.clone();
        spawn_local(async move {
            let result = match &mode {
                LogFormMode::Today => channel.today().await,
                LogFormMode::Record(id) => channel.get(id).await.map(Some),
            };
            match result {
                Ok(Some(record)) => {
                    record_date.try_set(Some(record.date));
                    model.try_update(|m| m.load_record(&record));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, ?mode, "failed to load daily log");
                    auth.handle_error(&e);
                    if mounted() && !e.is_authentication() {
                        match mode {
                            LogFormMode::Today => toaster.error(e.user_message_or(LOAD_TODAY_FAILED)),
                            LogFormMode::Record(_) => {
                                toaster.error(e.user_message_or(LOAD_RECORD_FAILED));
                                router.navigate_to(AppRoute::Dashboard);
                            }
                        }
                    }
                }
            }
            loading.try_set(false);
        });
    } else {
        tracing::warn!("no authenticated channel, ending session");
        auth.expire();
        loading.set(false);
    }

    // --- 提交 ---
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !model.with_untracked(LogFormModel::is_dirty) {
            return;
        }
        let mut working = model.get_untracked();
        let Ok(submission) = working.submission() else {
            return;
        };
        let Some(channel) = auth.channel() else {
            auth.expire();
            return;
        };
        let updating = working.is_update();
        submitting.set(true);

        spawn_local(async move {
            let result = working.submit(&channel, submission).await;
            if let Err(e) = &result {
                auth.handle_error(e);
            }
            if model.try_set(working).is_some() {
                tracing::debug!("daily log form unmounted before save finished");
                return;
            }
            match result {
                Ok(_) => {
                    toaster.success(if updating {
                        "Log updated successfully!"
                    } else {
                        "Log created successfully!"
                    });
                    router.navigate_to(AppRoute::Dashboard);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to submit daily log");
                    if !e.is_authentication() {
                        toaster.error(e.user_message_or(SUBMIT_FAILED));
                    }
                }
            }
            submitting.try_set(false);
        });
    };

    let heading = move || {
        let date = record_date
            .get()
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        date.format("%A, %B %-d, %Y").to_string()
    };
    let is_update = move || model.with(LogFormModel::is_update);
    let has_symptoms = move || model.with(|m| m.draft().has_symptoms());
    let text_input = move |f: fn(&mut LogDraft, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            model.update(|m| m.edit(|d| f(d, value)));
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-6">
                <div class="border-b pb-4">
                    <h3 class="text-2xl font-semibold">
                        {move || if is_update() { "Update Daily Log" } else { "Daily Log Entry" }}
                    </h3>
                    <p class="mt-2 font-medium text-base-content/70">{heading}</p>
                </div>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                >
                    <form on:submit=on_submit novalidate>
                        <fieldset class="space-y-8" disabled=move || submitting.get()>
                            <section class="grid grid-cols-1 md:grid-cols-2 gap-6">
                                <h4 class="md:col-span-2 text-lg font-medium border-b pb-2">"Mood & Anxiety"</h4>
                                <Rating
                                    label="Mood Level"
                                    value=Signal::derive(move || Some(draft().mood_level))
                                    on_change=edit(|d, v| d.mood_level = v)
                                    error=error_for(LogField::MoodLevel)
                                    low_hint="Very Low"
                                    high_hint="Excellent"
                                />
                                <Rating
                                    label="Anxiety Level"
                                    value=Signal::derive(move || Some(draft().anxiety_level))
                                    on_change=edit(|d, v| d.anxiety_level = v)
                                    error=error_for(LogField::AnxietyLevel)
                                    low_hint="None"
                                    high_hint="Severe"
                                />
                            </section>

                            <section class="grid grid-cols-1 md:grid-cols-2 gap-6">
                                <h4 class="md:col-span-2 text-lg font-medium border-b pb-2">"Sleep"</h4>
                                <div class="form-control gap-2">
                                    <label class="label-text font-medium" for="sleep-hours">"Hours of Sleep"</label>
                                    <input
                                        id="sleep-hours"
                                        type="number"
                                        min="0"
                                        max="24"
                                        step="0.5"
                                        class="input input-bordered max-w-xs"
                                        prop:value=move || draft().sleep_hours.to_string()
                                        on:input=move |ev| {
                                            let hours = event_target_value(&ev).trim().parse::<f64>().unwrap_or(f64::NAN);
                                            model.update(|m| m.edit(|d| d.sleep_hours = hours));
                                        }
                                    />
                                    {move || errors.with(|e| e.get(LogField::SleepHours).map(str::to_string)).map(|msg| view! {
                                        <span class="text-error text-sm">{msg}</span>
                                    })}
                                </div>
                                <Rating
                                    label="Sleep Quality"
                                    value=Signal::derive(move || Some(draft().sleep_quality))
                                    on_change=edit(|d, v| d.sleep_quality = v)
                                    error=error_for(LogField::SleepQuality)
                                    low_hint="Poor"
                                    high_hint="Excellent"
                                />
                            </section>

                            <section class="grid grid-cols-1 md:grid-cols-2 gap-6">
                                <h4 class="md:col-span-2 text-lg font-medium border-b pb-2">"Activity & Stress"</h4>
                                <div class="form-control gap-2">
                                    <label class="label-text font-medium" for="physical-activity">"Physical Activity"</label>
                                    <textarea
                                        id="physical-activity"
                                        class="textarea textarea-bordered"
                                        placeholder="Describe any exercise or physical activity"
                                        prop:value=move || draft().physical_activity
                                        on:input=text_input(|d, v| d.physical_activity = v)
                                    ></textarea>
                                </div>
                                <div class="form-control gap-2">
                                    <label class="label-text font-medium" for="social-interactions">"Social Interactions"</label>
                                    <textarea
                                        id="social-interactions"
                                        class="textarea textarea-bordered"
                                        placeholder="Describe your social interactions today"
                                        prop:value=move || draft().social_interactions
                                        on:input=text_input(|d, v| d.social_interactions = v)
                                    ></textarea>
                                </div>
                                <Rating
                                    label="Stress Level"
                                    value=Signal::derive(move || Some(draft().stress_level))
                                    on_change=edit(|d, v| d.stress_level = v)
                                    error=error_for(LogField::StressLevel)
                                    low_hint="Very Low"
                                    high_hint="Very High"
                                />
                            </section>

                            <section class="grid grid-cols-1 md:grid-cols-2 gap-6">
                                <h4 class="md:col-span-2 text-lg font-medium border-b pb-2">"Symptoms"</h4>
                                <div class="form-control gap-2 md:col-span-2">
                                    <label class="label-text font-medium" for="symptoms">"Symptoms"</label>
                                    <textarea
                                        id="symptoms"
                                        class="textarea textarea-bordered"
                                        placeholder="List any symptoms you experienced (leave empty if none)"
                                        prop:value=move || draft().symptoms
                                        on:input=text_input(|d, v| d.symptoms = v)
                                    ></textarea>
                                </div>
                                <Show when=has_symptoms>
                                    <div class="form-control gap-2">
                                        <label class="label-text font-medium" for="primary-symptom">"Primary Symptom"</label>
                                        <input
                                            id="primary-symptom"
                                            type="text"
                                            class="input input-bordered"
                                            prop:value=move || draft().primary_symptom
                                            on:input=text_input(|d, v| d.primary_symptom = v)
                                        />
                                    </div>
                                    <Rating
                                        label="Symptom Severity"
                                        value=Signal::derive(move || draft().symptom_severity)
                                        on_change=edit(|d, v| d.symptom_severity = Some(v))
                                        error=error_for(LogField::SymptomSeverity)
                                        low_hint="Mild"
                                        high_hint="Severe"
                                    />
                                </Show>
                            </section>

                            <div class="flex justify-end gap-2 border-t pt-6">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| router.navigate_to(AppRoute::Dashboard)
                                >
                                    "Cancel"
                                </button>
                                <button
                                    type="submit"
                                    class="btn btn-primary"
                                    disabled=move || submitting.get() || !model.with(LogFormModel::can_submit)
                                >
                                    {move || match (submitting.get(), is_update()) {
                                        (true, _) => view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any(),
                                        (false, true) => "Update Log".into_any(),
                                        (false, false) => "Submit Log".into_any(),
                                    }}
                                </button>
                            </div>
                        </fieldset>
                    </form>
                </Show>
            </div>
        </div>
    }
}
