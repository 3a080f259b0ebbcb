use crate::auth::use_auth;
use crate::components::icons::{ChartLine, Pencil, Plus};
use crate::components::toast::use_toaster;
use crate::components::trends::TrendsCard;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mindtrack_shared::DailyLogRecord;

/// 今日记录状态
#[derive(Debug, Clone, PartialEq)]
enum TodayStatus {
    Loading,
    Missing,
    Present(DailyLogRecord),
    Unavailable,
}

#[component]
fn Stat(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="stat px-4 py-2">
            <div class="stat-title">{label}</div>
            <div class="stat-value text-2xl">{value}</div>
        </div>
    }
}

#[component]
fn DailyLogCard() -> impl IntoView {
    let auth = use_auth();
    let toaster = use_toaster();
    let status = RwSignal::new(TodayStatus::Loading);

    if let Some(channel) = auth.channel() {
        spawn_local(async move {
            match channel.today().await {
                Ok(Some(record)) => {
                    status.try_set(TodayStatus::Present(record));
                }
                Ok(None) => {
                    status.try_set(TodayStatus::Missing);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load today's log");
                    auth.handle_error(&e);
                    if !e.is_authentication() {
                        toaster.error(e.user_message_or("Failed to load today's log"));
                    }
                    status.try_set(TodayStatus::Unavailable);
                }
            }
        });
    } else {
        auth.expire();
        status.set(TodayStatus::Unavailable);
    }

    let body = move || match status.get() {
        TodayStatus::Loading => view! {
            <div class="flex justify-center py-6">
                <span class="loading loading-spinner loading-md"></span>
            </div>
        }
        .into_any(),
        TodayStatus::Missing | TodayStatus::Unavailable => view! {
            <p class="text-base-content/70">"You haven't logged today yet."</p>
            <div class="card-actions justify-end">
                <Link to=AppRoute::LogEntry class="btn btn-primary gap-2">
                    <Plus attr:class="h-4 w-4" /> "Add Entry"
                </Link>
            </div>
        }
        .into_any(),
        TodayStatus::Present(record) => {
            let edited = record.was_edited().then(|| {
                format!(
                    "Last updated {}",
                    record.updated_at.with_timezone(&chrono::Local).format("%-I:%M %p")
                )
            });
            view! {
                <p class="text-base-content/70">"Today's entry is recorded."</p>
                <div class="stats stats-vertical sm:stats-horizontal bg-base-200 w-full">
                    <Stat label="Mood" value=record.mood_level.to_string() />
                    <Stat label="Anxiety" value=record.anxiety_level.to_string() />
                    <Stat label="Sleep" value=format!("{}h", record.sleep_hours) />
                    <Stat label="Stress" value=record.stress_level.to_string() />
                </div>
                {edited.map(|text| view! { <p class="text-xs text-base-content/50">{text}</p> })}
                <div class="card-actions justify-end">
                    <Link to=AppRoute::LogEntry class="btn btn-primary gap-2">
                        <Pencil attr:class="h-4 w-4" /> "Update Entry"
                    </Link>
                </div>
            }
            .into_any()
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-4">
                <h3 class="card-title">"Daily Log"</h3>
                <p class="text-sm text-base-content/60">
                    {chrono::Local::now().format("%A, %B %-d, %Y").to_string()}
                </p>
                {body}
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <div class="space-y-8">
            <div class="flex items-center gap-2">
                <ChartLine attr:class="h-6 w-6 text-primary" />
                <h2 class="text-2xl font-bold">"Dashboard"</h2>
            </div>
            <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                <div class="lg:col-span-1">
                    <DailyLogCard />
                </div>
                <div class="lg:col-span-2">
                    <TrendsCard />
                </div>
            </div>
        </div>
    }
}
