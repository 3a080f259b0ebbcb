//! 日期范围模块
//!
//! 提供趋势视图所需的日历计算：
//! - `Period`: 时间段选择器
//! - `WeekStart`: 区域设置的一周起始日
//! - `DateRange`: 闭区间 `[start, end]`，按 `YYYY-MM-DD` 传输

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 查询参数使用的日期格式
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================
// WeekStart
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(format!("unknown week start: {}", other)),
        }
    }
}

// =========================================================
// DateRange
// =========================================================

/// 闭区间日期范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `start > end` 时返回 None
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 包含 `day` 的那一周
    pub fn week_of(day: NaiveDate, week_start: WeekStart) -> Self {
        let week = day.week(week_start.weekday());
        Self {
            start: week.first_day(),
            end: week.last_day(),
        }
    }

    /// 包含 `day` 的那个自然月
    pub fn month_of(day: NaiveDate) -> Self {
        let start = day.with_day(1).unwrap_or(day);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(day);
        Self { start, end }
    }

    pub fn start_param(&self) -> String {
        self.start.format(WIRE_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(WIRE_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}

// =========================================================
// Period
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    #[default]
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Custom,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::ThisWeek,
        Period::LastWeek,
        Period::ThisMonth,
        Period::LastMonth,
        Period::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::ThisWeek => "this-week",
            Period::LastWeek => "last-week",
            Period::ThisMonth => "this-month",
            Period::LastMonth => "last-month",
            Period::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::ThisWeek => "This Week",
            Period::LastWeek => "Last Week",
            Period::ThisMonth => "This Month",
            Period::LastMonth => "Last Month",
            Period::Custom => "Custom Period",
        }
    }

    /// 计算时间段对应的日期范围
    ///
    /// `Custom` 使用用户提供的两个日期，任一缺失或起止颠倒时返回 None（不发请求）。
    pub fn range(
        &self,
        today: NaiveDate,
        week_start: WeekStart,
        custom: (Option<NaiveDate>, Option<NaiveDate>),
    ) -> Option<DateRange> {
        match self {
            Period::ThisWeek => Some(DateRange::week_of(today, week_start)),
            Period::LastWeek => {
                let day = today.checked_sub_days(chrono::Days::new(7))?;
                Some(DateRange::week_of(day, week_start))
            }
            Period::ThisMonth => Some(DateRange::month_of(today)),
            Period::LastMonth => {
                let day = today.checked_sub_months(Months::new(1))?;
                Some(DateRange::month_of(day))
            }
            Period::Custom => match custom {
                (Some(start), Some(end)) => DateRange::new(start, end),
                _ => None,
            },
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown period: {}", s))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sunday_weeks() {
        // 2025-02-09 is a Sunday
        let today = d(2025, 2, 9);
        let none = (None, None);
        assert_eq!(
            Period::ThisWeek.range(today, WeekStart::Sunday, none),
            Some(DateRange { start: d(2025, 2, 9), end: d(2025, 2, 15) })
        );
        assert_eq!(
            Period::LastWeek.range(today, WeekStart::Sunday, none),
            Some(DateRange { start: d(2025, 2, 2), end: d(2025, 2, 8) })
        );
    }

    #[test]
    fn monday_weeks() {
        let today = d(2025, 2, 9);
        let range = Period::ThisWeek
            .range(today, WeekStart::Monday, (None, None))
            .unwrap();
        assert_eq!(range.start, d(2025, 2, 3));
        assert_eq!(range.end, d(2025, 2, 9));
    }

    #[test]
    fn months_including_leap_february() {
        let today = d(2024, 3, 31);
        assert_eq!(
            Period::ThisMonth.range(today, WeekStart::Sunday, (None, None)),
            Some(DateRange { start: d(2024, 3, 1), end: d(2024, 3, 31) })
        );
        assert_eq!(
            Period::LastMonth.range(today, WeekStart::Sunday, (None, None)),
            Some(DateRange { start: d(2024, 2, 1), end: d(2024, 2, 29) })
        );
    }

    #[test]
    fn last_month_across_year_boundary() {
        let range = Period::LastMonth
            .range(d(2025, 1, 15), WeekStart::Sunday, (None, None))
            .unwrap();
        assert_eq!(range.start_param(), "2024-12-01");
        assert_eq!(range.end_param(), "2024-12-31");
    }

    #[test]
    fn custom_needs_both_dates_in_order() {
        let today = d(2025, 2, 9);
        let ws = WeekStart::Sunday;
        assert_eq!(Period::Custom.range(today, ws, (Some(d(2025, 1, 1)), None)), None);
        assert_eq!(
            Period::Custom.range(today, ws, (Some(d(2025, 1, 9)), Some(d(2025, 1, 1)))),
            None
        );
        assert_eq!(
            Period::Custom.range(today, ws, (Some(d(2025, 1, 1)), Some(d(2025, 1, 9)))),
            Some(DateRange { start: d(2025, 1, 1), end: d(2025, 1, 9) })
        );
    }

    #[test]
    fn period_names() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>(), Ok(p));
        }
        assert!("yesterday".parse::<Period>().is_err());
        assert_eq!("Monday".parse::<WeekStart>(), Ok(WeekStart::Monday));
    }
}
