//! 趋势视图模型
//!
//! - `TrendSeries`: 按日期排序的数据点
//! - `TrendsState`: 加载 / 无数据 / 就绪 / 失败
//! - `LatestRequest`: 只应用最新一次请求的结果
//! - `ChartLayout`: 1..=5 量表上的折线几何

use crate::api::LogApi;
use crate::error::ClientResult;
use crate::request::HttpClient;
use chrono::NaiveDate;
use mindtrack_shared::{DailyLogRecord, DateRange, SCALE_MAX, SCALE_MIN};
use std::cell::Cell;
use std::rc::Rc;

pub const EMPTY_MESSAGE: &str = "No data available for selected period";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load trends data";

// =========================================================
// Series
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Mood,
    Anxiety,
    Stress,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Mood, Metric::Anxiety, Metric::Stress];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Mood => "Mood",
            Metric::Anxiety => "Anxiety",
            Metric::Stress => "Stress",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Metric::Mood => "#4F46E5",
            Metric::Anxiety => "#EC4899",
            Metric::Stress => "#F59E0B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub mood: u8,
    pub anxiety: u8,
    pub stress: u8,
}

impl TrendPoint {
    pub fn value(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Mood => self.mood,
            Metric::Anxiety => self.anxiety,
            Metric::Stress => self.stress,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn from_records(records: &[DailyLogRecord]) -> Self {
        let mut points: Vec<TrendPoint> = records
            .iter()
            .map(|r| TrendPoint {
                date: r.date,
                mood: r.mood_level,
                anxiety: r.anxiety_level,
                stress: r.stress_level,
            })
            .collect();
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

// =========================================================
// Render state
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TrendsState {
    #[default]
    Loading,
    Empty,
    Ready(TrendSeries),
    Failed(String),
}

impl TrendsState {
    /// 空结果是正常状态，不是错误
    pub fn from_result(result: ClientResult<Vec<DailyLogRecord>>) -> Self {
        match result {
            Ok(records) if records.is_empty() => TrendsState::Empty,
            Ok(records) => TrendsState::Ready(TrendSeries::from_records(&records)),
            Err(err) => TrendsState::Failed(err.user_message_or(LOAD_FAILED_MESSAGE)),
        }
    }
}

// =========================================================
// Latest-request-wins
// =========================================================

/// 请求序号发放器
#[derive(Debug, Clone, Default)]
pub struct LatestRequest {
    current: Rc<Cell<u64>>,
}

#[derive(Debug, Clone)]
pub struct RequestTicket {
    seq: u64,
    current: Rc<Cell<u64>>,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发放新序号，之前的所有票据随即失效
    pub fn issue(&self) -> RequestTicket {
        let seq = self.current.get() + 1;
        self.current.set(seq);
        RequestTicket {
            seq,
            current: self.current.clone(),
        }
    }

    /// 使所有未完成的票据失效（例如选择了不完整的自定义范围）
    pub fn invalidate(&self) {
        self.current.set(self.current.get() + 1);
    }
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.current.get() == self.seq
    }
}

/// 拉取范围内的记录；票据过期时返回 None，结果应被丢弃
pub async fn load_trends<C: HttpClient>(
    channel: &LogApi<C>,
    range: DateRange,
    ticket: &RequestTicket,
) -> Option<ClientResult<Vec<DailyLogRecord>>> {
    tracing::debug!(%range, "loading trends");
    let result = channel.filter(range).await;
    if !ticket.is_current() {
        tracing::debug!(%range, "discarding superseded trends response");
        return None;
    }
    if let Ok(records) = &result {
        tracing::debug!(%range, count = records.len(), "trends loaded");
    }
    Some(result)
}

// =========================================================
// Chart geometry
// =========================================================

/// SVG 折线图布局，纵轴固定为评分量表
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            padding: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

impl ChartLayout {
    fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    /// 数据点按序号均匀分布；单点时居中
    pub fn x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.padding + self.plot_width() / 2.0;
        }
        self.padding + self.plot_width() * index as f64 / (count - 1) as f64
    }

    /// 越界值会被夹到量表范围内
    pub fn y(&self, value: u8) -> f64 {
        let value = value.clamp(SCALE_MIN, SCALE_MAX);
        let span = (SCALE_MAX - SCALE_MIN) as f64;
        let ratio = (value - SCALE_MIN) as f64 / span;
        self.padding + self.plot_height() * (1.0 - ratio)
    }

    /// `points` 属性字符串
    pub fn polyline(&self, series: &TrendSeries, metric: Metric) -> String {
        let count = series.len();
        let mut out = String::new();
        for (i, point) in series.points().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{:.1},{:.1}", self.x(i, count), self.y(point.value(metric))));
        }
        out
    }

    pub fn y_ticks(&self) -> Vec<AxisTick> {
        (SCALE_MIN..=SCALE_MAX)
            .map(|v| AxisTick {
                position: self.y(v),
                label: v.to_string(),
            })
            .collect()
    }

    pub fn x_ticks(&self, series: &TrendSeries) -> Vec<AxisTick> {
        let count = series.len();
        series
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| AxisTick {
                position: self.x(i, count),
                label: p.date.format("%b %-d").to_string(),
            })
            .collect()
    }
}
