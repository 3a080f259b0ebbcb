use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;
pub mod serde_helper;

pub use date::{DateRange, Period, WeekStart};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 凭据在 LocalStorage 中的存储键
pub const TOKEN_STORAGE_KEY: &str = "token";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 1..=5 评分量表的上下界
pub const SCALE_MIN: u8 = 1;
pub const SCALE_MAX: u8 = 5;

// =========================================================
// 身份模型 (Identity Models)
// =========================================================

/// 当前客户端中已认证的身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

/// 服务端返回的用户资料
///
/// `/api/auth/me` 返回 `userId`，`/api/auth/google` 的 `user` 对象则可能是 `id`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "id", alias = "_id", deserialize_with = "serde_helper::lenient_id")]
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl From<UserProfile> for Session {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id,
            email: profile.email,
            display_name: profile.name,
        }
    }
}

/// 登录/注册成功响应：`{token, userId, email, name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

/// 第三方身份登录响应：`{token, user}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAuthGrant {
    pub token: String,
    pub user: UserProfile,
}

/// 第三方身份提供方已验证的用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleUser {
    pub email: String,
    pub name: String,
    pub google_id: String,
}

// =========================================================
// 日志模型 (Daily Log Models)
// =========================================================

/// 提交到 `POST /api/logs` 与 `PUT /api/logs/{id}` 的字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFields {
    pub mood_level: u8,
    pub anxiety_level: u8,
    pub sleep_hours: f64,
    pub sleep_quality: u8,
    pub stress_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_interactions: Option<String>,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub primary_symptom: String,
    /// 始终序列化（无症状时为 `null`）
    #[serde(default)]
    pub symptom_severity: Option<u8>,
}

/// 某用户某一天的自评记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogRecord {
    #[serde(alias = "_id", deserialize_with = "serde_helper::lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "serde_helper::lenient_id")]
    pub user_id: String,
    #[serde(deserialize_with = "serde_helper::calendar_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "serde_helper::lenient_u8")]
    pub mood_level: u8,
    #[serde(deserialize_with = "serde_helper::lenient_u8")]
    pub anxiety_level: u8,
    #[serde(deserialize_with = "serde_helper::lenient_f64")]
    pub sleep_hours: f64,
    #[serde(deserialize_with = "serde_helper::lenient_u8")]
    pub sleep_quality: u8,
    #[serde(deserialize_with = "serde_helper::lenient_u8")]
    pub stress_level: u8,
    #[serde(default)]
    pub physical_activity: Option<String>,
    #[serde(default)]
    pub social_interactions: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub primary_symptom: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::lenient_opt_u8")]
    pub symptom_severity: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyLogRecord {
    /// 症状非空时严重度才有意义
    pub fn has_symptoms(&self) -> bool {
        self.symptoms
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// 记录是否在创建后被修改过
    pub fn was_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// `GET /api/logs/today` 响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayLog {
    pub exists: bool,
    #[serde(default)]
    pub log: Option<DailyLogRecord>,
}

impl TodayLog {
    pub fn into_record(self) -> Option<DailyLogRecord> {
        if self.exists { self.log } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> &'static str {
        r#"{
            "id": 42,
            "userId": "u-1",
            "date": "2025-02-09T00:00:00.000Z",
            "moodLevel": "4",
            "anxietyLevel": 2,
            "sleepHours": "7.5",
            "sleepQuality": 4,
            "stressLevel": 2,
            "physicalActivity": "None",
            "symptoms": "",
            "primarySymptom": "",
            "symptomSeverity": null,
            "createdAt": "2025-02-09T08:00:00.000Z",
            "updatedAt": "2025-02-09T08:00:00.000Z"
        }"#
    }

    #[test]
    fn record_tolerates_string_numbers_and_timestamp_dates() {
        let record: DailyLogRecord = serde_json::from_str(record_json()).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.mood_level, 4);
        assert_eq!(record.sleep_hours, 7.5);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 2, 9).unwrap());
        assert_eq!(record.symptom_severity, None);
        assert!(!record.has_symptoms());
        assert!(!record.was_edited());
    }

    #[test]
    fn auth_grant_reads_flat_login_response() {
        let grant: AuthGrant = serde_json::from_str(
            r#"{"token":"t0k","userId":"7","email":"a@b.io","name":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(grant.token, "t0k");
        let session = Session::from(grant.profile);
        assert_eq!(session.user_id, "7");
        assert_eq!(session.display_name, "Ada");
    }

    #[test]
    fn external_grant_accepts_id_alias() {
        let grant: ExternalAuthGrant = serde_json::from_str(
            r#"{"token":"g","user":{"id":9,"email":"g@b.io","name":"Grace"}}"#,
        )
        .unwrap();
        assert_eq!(grant.user.user_id, "9");
    }

    #[test]
    fn log_fields_always_send_severity() {
        let fields = LogFields {
            mood_level: 4,
            anxiety_level: 2,
            sleep_hours: 7.5,
            sleep_quality: 4,
            stress_level: 2,
            physical_activity: None,
            social_interactions: None,
            symptoms: String::new(),
            primary_symptom: String::new(),
            symptom_severity: None,
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert!(value.get("symptomSeverity").unwrap().is_null());
        assert!(value.get("physicalActivity").is_none());
        assert_eq!(value["sleepHours"], 7.5);
    }

    #[test]
    fn today_log_without_record() {
        let today: TodayLog = serde_json::from_str(r#"{"exists":false}"#).unwrap();
        assert!(today.into_record().is_none());
    }
}
