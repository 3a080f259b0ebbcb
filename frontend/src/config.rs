//! 运行时配置
//!
//! 所有配置在编译期通过环境变量注入（`option_env!`），启动时解析一次。
//! 非法值回退到默认值，并在日志初始化后逐条告警。

use mindtrack_shared::WeekStart;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_TOAST_MS: u32 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 后端地址（不含结尾的 `/`）
    pub api_url: String,
    /// 配置后才显示 Google 登录按钮
    pub google_client_id: Option<String>,
    pub week_start: WeekStart,
    pub toast_duration_ms: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            google_client_id: None,
            week_start: WeekStart::default(),
            toast_duration_ms: DEFAULT_TOAST_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// 原始配置值，未经校验
#[derive(Debug, Clone, Copy, Default)]
pub struct RawConfig<'a> {
    pub api_url: Option<&'a str>,
    pub google_client_id: Option<&'a str>,
    pub week_start: Option<&'a str>,
    pub toast_ms: Option<&'a str>,
    pub log_level: Option<&'a str>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// 读取构建时注入的配置
    pub fn load() -> (Self, Vec<String>) {
        Self::from_raw(RawConfig {
            api_url: option_env!("MINDTRACK_API_URL"),
            google_client_id: option_env!("MINDTRACK_GOOGLE_CLIENT_ID"),
            week_start: option_env!("MINDTRACK_WEEK_START"),
            toast_ms: option_env!("MINDTRACK_TOAST_MS"),
            log_level: option_env!("MINDTRACK_LOG_LEVEL"),
        })
    }

    pub fn from_raw(raw: RawConfig<'_>) -> (Self, Vec<String>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        if let Some(url) = non_empty(raw.api_url) {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        config.google_client_id = non_empty(raw.google_client_id).map(str::to_string);

        if let Some(value) = non_empty(raw.week_start) {
            match value.parse::<WeekStart>() {
                Ok(ws) => config.week_start = ws,
                Err(e) => warnings.push(format!("MINDTRACK_WEEK_START: {}, using default", e)),
            }
        }

        if let Some(value) = non_empty(raw.toast_ms) {
            match value.parse::<u32>() {
                Ok(ms) if ms > 0 => config.toast_duration_ms = ms,
                _ => warnings.push(format!(
                    "MINDTRACK_TOAST_MS: invalid value {:?}, using {}",
                    value, DEFAULT_TOAST_MS
                )),
            }
        }

        if let Some(value) = non_empty(raw.log_level) {
            let level = value.to_ascii_lowercase();
            if LOG_LEVELS.contains(&level.as_str()) {
                config.log_level = level;
            } else {
                warnings.push(format!(
                    "MINDTRACK_LOG_LEVEL: unknown level {:?}, using {}",
                    value, DEFAULT_LOG_LEVEL
                ));
            }
        }

        (config, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_uses_defaults() {
        let (config, warnings) = AppConfig::from_raw(RawConfig::default());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn values_are_parsed() {
        let (config, warnings) = AppConfig::from_raw(RawConfig {
            api_url: Some("https://api.example.com/"),
            google_client_id: Some("abc.apps.googleusercontent.com"),
            week_start: Some("Monday"),
            toast_ms: Some("3000"),
            log_level: Some("DEBUG"),
        });
        assert!(warnings.is_empty());
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.toast_duration_ms, 3000);
        assert_eq!(config.log_level, "debug");
        assert!(config.google_client_id.is_some());
    }

    #[test]
    fn invalid_values_fall_back_with_warnings() {
        let (config, warnings) = AppConfig::from_raw(RawConfig {
            google_client_id: Some("  "),
            week_start: Some("friday"),
            toast_ms: Some("0"),
            log_level: Some("loud"),
            ..RawConfig::default()
        });
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 3);
    }
}
