//! 趋势卡片：时间段选择 + 折线图

use crate::auth::use_auth;
use crate::config::AppConfig;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mindtrack::trends::{ChartLayout, EMPTY_MESSAGE, LOAD_FAILED_MESSAGE, Metric, load_trends};
use mindtrack::{LatestRequest, TrendSeries, TrendsState};
use mindtrack_shared::Period;
use mindtrack_shared::serde_helper::parse_calendar_date;

fn coord(value: f64) -> String {
    format!("{:.1}", value)
}

#[component]
fn TrendsChart(series: TrendSeries) -> impl IntoView {
    let layout = ChartLayout::default();
    let view_box = format!("0 0 {} {}", layout.width, layout.height);
    let left = layout.padding;
    let right = coord(layout.width - layout.padding);
    let baseline = layout.height - layout.padding;

    let grid = layout
        .y_ticks()
        .into_iter()
        .map(|tick| {
            view! {
                <line
                    x1=coord(left)
                    x2=right.clone()
                    y1=coord(tick.position)
                    y2=coord(tick.position)
                    stroke="#e5e7eb"
                    stroke-dasharray="4 4"
                />
                <text x=coord(left - 8.0) y=coord(tick.position + 4.0) text-anchor="end" font-size="12" fill="#6b7280">
                    {tick.label}
                </text>
            }
        })
        .collect_view();

    let labels = layout
        .x_ticks(&series)
        .into_iter()
        .map(|tick| {
            view! {
                <text x=coord(tick.position) y=coord(baseline + 20.0) text-anchor="middle" font-size="12" fill="#6b7280">
                    {tick.label}
                </text>
            }
        })
        .collect_view();

    let count = series.len();
    let lines = Metric::ALL
        .into_iter()
        .map(|metric| {
            let dots = series
                .points()
                .iter()
                .enumerate()
                .map(|(i, point)| {
                    view! {
                        <circle
                            cx=coord(layout.x(i, count))
                            cy=coord(layout.y(point.value(metric)))
                            r="4"
                            fill=metric.color()
                        />
                    }
                })
                .collect_view();
            view! {
                <polyline
                    points=layout.polyline(&series, metric)
                    fill="none"
                    stroke=metric.color()
                    stroke-width="2"
                />
                {dots}
            }
        })
        .collect_view();

    let legend = Metric::ALL
        .into_iter()
        .map(|metric| {
            view! {
                <span class="flex items-center gap-1 text-sm">
                    <span class="inline-block w-3 h-3 rounded-full" style:background-color=metric.color()></span>
                    {metric.label()}
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="w-full">
            <svg viewBox=view_box class="w-full h-auto" role="img" aria-label="Mood, anxiety and stress over time">
                <line x1=coord(left) x2=right y1=coord(baseline) y2=coord(baseline) stroke="#9ca3af" />
                {grid}
                {labels}
                {lines}
            </svg>
            <div class="flex justify-center gap-4 mt-2">{legend}</div>
        </div>
    }
}

#[component]
pub fn TrendsCard() -> impl IntoView {
    let auth = use_auth();
    let week_start = expect_context::<AppConfig>().week_start;

    let period = RwSignal::new(Period::default());
    let custom_start = RwSignal::new(String::new());
    let custom_end = RwSignal::new(String::new());
    let state = RwSignal::new(TrendsState::Loading);
    let latest = StoredValue::new_local(LatestRequest::new());

    let range = Memo::new(move |_| {
        let custom = (
            parse_calendar_date(&custom_start.get()),
            parse_calendar_date(&custom_end.get()),
        );
        let today = chrono::Local::now().date_naive();
        period.get().range(today, week_start, custom)
    });

    // 时间段或自定义日期变化时重新拉取，只保留最新一次请求的结果
    Effect::new(move |_| {
        let Some(range) = range.get() else {
            latest.with_value(LatestRequest::invalidate);
            return;
        };
        let Some(channel) = auth.channel() else {
            latest.with_value(LatestRequest::invalidate);
            auth.expire();
            state.set(TrendsState::Failed(LOAD_FAILED_MESSAGE.to_string()));
            return;
        };
        let ticket = latest.with_value(LatestRequest::issue);
        tracing::debug!(period = %period.get_untracked(), %range, "fetching trends");
        state.set(TrendsState::Loading);

        spawn_local(async move {
            let Some(result) = load_trends(&channel, range, &ticket).await else {
                return;
            };
            if let Err(e) = &result {
                tracing::warn!(error = %e, "failed to load trends");
                auth.handle_error(e);
            }
            state.try_set(TrendsState::from_result(result));
        });
    });

    let awaiting_custom = move || range.get().is_none();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-4">
                <h3 class="card-title">"Mood & Anxiety Trends"</h3>

                <div class="flex flex-wrap gap-2">
                    {Period::ALL
                        .into_iter()
                        .map(|p| {
                            let class = move || {
                                if period.get() == p {
                                    "btn btn-sm btn-primary rounded-full"
                                } else {
                                    "btn btn-sm btn-ghost bg-base-200 rounded-full"
                                }
                            };
                            view! {
                                <button type="button" class=class on:click=move |_| period.set(p)>
                                    {p.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                <Show when=move || period.get() == Period::Custom>
                    <div class="flex flex-wrap gap-4">
                        <input
                            type="date"
                            class="input input-bordered input-sm"
                            prop:value=custom_start
                            on:input=move |ev| custom_start.set(event_target_value(&ev))
                        />
                        <input
                            type="date"
                            class="input input-bordered input-sm"
                            prop:value=custom_end
                            on:input=move |ev| custom_end.set(event_target_value(&ev))
                        />
                    </div>
                </Show>

                <div class="min-h-[320px] flex items-center justify-center">
                    {move || {
                        if awaiting_custom() {
                            return view! {
                                <p class="text-base-content/60">"Select a start and end date"</p>
                            }
                            .into_any();
                        }
                        match state.get() {
                            TrendsState::Loading => view! {
                                <p class="flex items-center gap-2">
                                    <span class="loading loading-spinner loading-sm"></span>
                                    "Loading trends..."
                                </p>
                            }
                            .into_any(),
                            TrendsState::Empty => view! { <p>{EMPTY_MESSAGE}</p> }.into_any(),
                            TrendsState::Failed(message) => view! {
                                <p class="text-error">{message}</p>
                            }
                            .into_any(),
                            TrendsState::Ready(series) => view! { <TrendsChart series=series /> }.into_any(),
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
