//! 每日自评表单模型
//!
//! 模型与渲染无关：UI 只负责把输入写进 [`LogDraft`]，
//! 校验、脏检查以及新建/更新的选择都在这里完成。

use crate::api::{LogApi, Submission};
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::validation::ValidationErrors;
use mindtrack_shared::{DailyLogRecord, LogFields, SCALE_MAX, SCALE_MIN};

pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const SLEEP_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogField {
    MoodLevel,
    AnxietyLevel,
    SleepHours,
    SleepQuality,
    StressLevel,
    PhysicalActivity,
    SocialInteractions,
    Symptoms,
    PrimarySymptom,
    SymptomSeverity,
}

impl LogField {
    pub fn label(&self) -> &'static str {
        match self {
            LogField::MoodLevel => "Mood level",
            LogField::AnxietyLevel => "Anxiety level",
            LogField::SleepHours => "Sleep hours",
            LogField::SleepQuality => "Sleep quality",
            LogField::StressLevel => "Stress level",
            LogField::PhysicalActivity => "Physical activity",
            LogField::SocialInteractions => "Social interactions",
            LogField::Symptoms => "Symptoms",
            LogField::PrimarySymptom => "Primary symptom",
            LogField::SymptomSeverity => "Symptom severity",
        }
    }
}

/// 表单当前的输入值
///
/// 数值字段以 `f64` 保存，这样越界值和空输入（NaN）都能被表示并在校验时报告。
#[derive(Debug, Clone, PartialEq)]
pub struct LogDraft {
    pub mood_level: f64,
    pub anxiety_level: f64,
    pub sleep_hours: f64,
    pub sleep_quality: f64,
    pub stress_level: f64,
    pub physical_activity: String,
    pub social_interactions: String,
    pub symptoms: String,
    pub primary_symptom: String,
    pub symptom_severity: Option<f64>,
}

impl Default for LogDraft {
    fn default() -> Self {
        Self {
            mood_level: 3.0,
            anxiety_level: 3.0,
            sleep_hours: 7.0,
            sleep_quality: 3.0,
            stress_level: 3.0,
            physical_activity: String::new(),
            social_interactions: String::new(),
            symptoms: String::new(),
            primary_symptom: String::new(),
            symptom_severity: None,
        }
    }
}

impl From<&DailyLogRecord> for LogDraft {
    fn from(record: &DailyLogRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            mood_level: record.mood_level as f64,
            anxiety_level: record.anxiety_level as f64,
            sleep_hours: record.sleep_hours,
            sleep_quality: record.sleep_quality as f64,
            stress_level: record.stress_level as f64,
            physical_activity: text(&record.physical_activity),
            social_interactions: text(&record.social_interactions),
            symptoms: text(&record.symptoms),
            primary_symptom: text(&record.primary_symptom),
            symptom_severity: record
                .has_symptoms()
                .then(|| record.symptom_severity.map(f64::from))
                .flatten(),
        }
    }
}

fn scale_value(
    errors: &mut ValidationErrors<LogField>,
    field: LogField,
    value: f64,
) -> u8 {
    let (min, max) = (SCALE_MIN as f64, SCALE_MAX as f64);
    if !value.is_finite() || value.fract() != 0.0 || value < min || value > max {
        errors.add(
            field,
            format!("{} must be between {} and {}", field.label(), SCALE_MIN, SCALE_MAX),
        );
        return SCALE_MIN;
    }
    value as u8
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl LogDraft {
    pub fn has_symptoms(&self) -> bool {
        !self.symptoms.trim().is_empty()
    }

    /// 校验并规整为提交载荷
    pub fn validate(&self) -> Result<LogFields, ValidationErrors<LogField>> {
        let mut errors = ValidationErrors::new();

        let mood_level = scale_value(&mut errors, LogField::MoodLevel, self.mood_level);
        let anxiety_level = scale_value(&mut errors, LogField::AnxietyLevel, self.anxiety_level);
        let sleep_quality = scale_value(&mut errors, LogField::SleepQuality, self.sleep_quality);
        let stress_level = scale_value(&mut errors, LogField::StressLevel, self.stress_level);

        let hours = self.sleep_hours;
        if !hours.is_finite() {
            errors.add(LogField::SleepHours, "Sleep hours must be a number");
        } else if hours < 0.0 {
            errors.add(LogField::SleepHours, "Sleep hours cannot be negative");
        } else if hours > MAX_SLEEP_HOURS {
            errors.add(LogField::SleepHours, "Sleep hours cannot exceed 24");
        } else if (hours / SLEEP_STEP).fract() != 0.0 {
            errors.add(LogField::SleepHours, "Sleep hours must be in increments of 0.5");
        }

        let has_symptoms = self.has_symptoms();
        let symptom_severity = match self.symptom_severity {
            Some(value) if has_symptoms => {
                Some(scale_value(&mut errors, LogField::SymptomSeverity, value))
            }
            _ => None,
        };

        errors.into_result(LogFields {
            mood_level,
            anxiety_level,
            sleep_hours: hours,
            sleep_quality,
            stress_level,
            physical_activity: optional_text(&self.physical_activity),
            social_interactions: optional_text(&self.social_interactions),
            symptoms: self.symptoms.trim().to_string(),
            primary_symptom: if has_symptoms {
                self.primary_symptom.trim().to_string()
            } else {
                String::new()
            },
            symptom_severity,
        })
    }
}

// =========================================================
// LogFormModel
// =========================================================

/// 表单状态：当前草稿、基线（最后一次加载或保存的值）、已存在记录的 id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFormModel {
    draft: LogDraft,
    baseline: Option<LogDraft>,
    record_id: Option<String>,
}

impl LogFormModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &DailyLogRecord) -> Self {
        let mut model = Self::new();
        model.load_record(record);
        model
    }

    pub fn draft(&self) -> &LogDraft {
        &self.draft
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn is_update(&self) -> bool {
        self.record_id.is_some()
    }

    /// 用已有记录预填表单，之后的提交变为更新
    pub fn load_record(&mut self, record: &DailyLogRecord) {
        let draft = LogDraft::from(record);
        self.draft = draft.clone();
        self.baseline = Some(draft);
        self.record_id = Some(record.id.clone());
    }

    /// 修改草稿；症状被清空时连带重置主要症状与严重度
    pub fn edit(&mut self, f: impl FnOnce(&mut LogDraft)) {
        f(&mut self.draft);
        if !self.draft.has_symptoms() {
            self.draft.primary_symptom.clear();
            self.draft.symptom_severity = None;
        }
    }

    /// 没有基线（全新表单）时总视为已修改
    pub fn is_dirty(&self) -> bool {
        match &self.baseline {
            Some(baseline) => baseline != &self.draft,
            None => true,
        }
    }

    pub fn errors(&self) -> ValidationErrors<LogField> {
        self.draft.validate().err().unwrap_or_default()
    }

    pub fn can_submit(&self) -> bool {
        self.is_dirty() && self.draft.validate().is_ok()
    }

    pub fn submission(&self) -> Result<Submission, ValidationErrors<LogField>> {
        let fields = self.draft.validate()?;
        Ok(match &self.record_id {
            Some(id) => Submission::Update {
                id: id.clone(),
                fields,
            },
            None => Submission::Create(fields),
        })
    }

    /// 保存成功后记录 id 并把基线移到当前值
    pub fn mark_saved(&mut self, record: &DailyLogRecord) {
        self.record_id = Some(record.id.clone());
        self.baseline = Some(self.draft.clone());
    }

    /// 采用服务端已存在记录的 id，保留用户当前的输入
    pub fn adopt_existing_id(&mut self, record: &DailyLogRecord) {
        self.record_id = Some(record.id.clone());
    }

    /// 发送已通过 [`LogFormModel::submission`] 校验的请求
    ///
    /// 新建被 409 拒绝时重新查询当天记录并采用其 id，原错误照常返回，用户可再次提交为更新。
    pub async fn submit<C: HttpClient>(
        &mut self,
        channel: &LogApi<C>,
        submission: Submission,
    ) -> ClientResult<DailyLogRecord> {
        let creating = matches!(submission, Submission::Create(_));

        match channel.save(submission).await {
            Ok(record) => {
                tracing::info!(id = %record.id, creating, "daily log saved");
                self.mark_saved(&record);
                Ok(record)
            }
            Err(err) if creating && err.is_conflict() => {
                tracing::info!("daily log already exists, switching to update");
                if let Ok(Some(existing)) = channel.today().await {
                    self.adopt_existing_id(&existing);
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, sample_fields, setup_session};

    fn scenario_draft() -> LogDraft {
        LogDraft {
            mood_level: 4.0,
            anxiety_level: 2.0,
            sleep_hours: 7.5,
            sleep_quality: 4.0,
            stress_level: 2.0,
            ..LogDraft::default()
        }
    }

    async fn member_channel() -> (FakeBackend, LogApi<FakeBackend>) {
        let (backend, _, service) = setup_session();
        service.init().await;
        service
            .login_with_password("ada@example.com", "Secret123")
            .await
            .unwrap();
        (backend, service.channel().unwrap())
    }

    async fn save(model: &mut LogFormModel, channel: &LogApi<FakeBackend>) -> ClientResult<DailyLogRecord> {
        let submission = model.submission().expect("valid draft");
        model.submit(channel, submission).await
    }

    #[test]
    fn defaults_are_valid() {
        let fields = LogDraft::default().validate().unwrap();
        assert_eq!(fields.mood_level, 3);
        assert_eq!(fields.sleep_hours, 7.0);
        assert_eq!(fields.symptom_severity, None);
    }

    #[test]
    fn out_of_range_scales_block_submission() {
        let mut model = LogFormModel::new();
        model.edit(|d| {
            d.mood_level = 6.0;
            d.stress_level = 0.0;
        });
        assert!(!model.can_submit());
        let errors = model.errors();
        assert_eq!(errors.get(LogField::MoodLevel), Some("Mood level must be between 1 and 5"));
        assert!(errors.get(LogField::StressLevel).is_some());

        model.edit(|d| d.anxiety_level = f64::NAN);
        assert!(model.errors().get(LogField::AnxietyLevel).is_some());
    }

    #[test]
    fn sleep_hour_rules() {
        let message = |hours: f64| {
            LogDraft {
                sleep_hours: hours,
                ..LogDraft::default()
            }
            .validate()
            .err()
            .and_then(|e| e.get(LogField::SleepHours).map(str::to_string))
        };
        assert_eq!(message(-0.5).as_deref(), Some("Sleep hours cannot be negative"));
        assert_eq!(message(24.5).as_deref(), Some("Sleep hours cannot exceed 24"));
        assert_eq!(message(7.25).as_deref(), Some("Sleep hours must be in increments of 0.5"));
        assert_eq!(message(0.0), None);
        assert_eq!(message(24.0), None);
    }

    #[test]
    fn clearing_symptoms_resets_dependents() {
        let mut model = LogFormModel::new();
        model.edit(|d| {
            d.symptoms = "headache".into();
            d.primary_symptom = "headache".into();
            d.symptom_severity = Some(4.0);
        });
        assert_eq!(model.draft().symptom_severity, Some(4.0));

        model.edit(|d| d.symptoms = "   ".into());
        assert_eq!(model.draft().primary_symptom, "");
        assert_eq!(model.draft().symptom_severity, None);
    }

    #[test]
    fn payload_is_trimmed_and_optional_text_omitted() {
        let draft = LogDraft {
            physical_activity: "  walk ".into(),
            social_interactions: "   ".into(),
            symptoms: " tired ".into(),
            primary_symptom: " fatigue ".into(),
            symptom_severity: Some(2.0),
            ..LogDraft::default()
        };
        let fields = draft.validate().unwrap();
        assert_eq!(fields.physical_activity.as_deref(), Some("walk"));
        assert_eq!(fields.social_interactions, None);
        assert_eq!(fields.symptoms, "tired");
        assert_eq!(fields.primary_symptom, "fatigue");
        assert_eq!(fields.symptom_severity, Some(2));
    }

    #[test]
    fn severity_ignored_without_symptoms() {
        let draft = LogDraft {
            symptom_severity: Some(9.0),
            ..LogDraft::default()
        };
        assert_eq!(draft.validate().unwrap().symptom_severity, None);
    }

    #[test]
    fn loaded_record_is_clean_until_edited() {
        let backend = FakeBackend::new();
        let today = backend.state.borrow().today;
        let record = backend.insert_record("u-1", today, sample_fields(4));
        let mut model = LogFormModel::from_record(&record);

        assert!(model.is_update());
        assert!(!model.is_dirty());
        assert!(!model.can_submit());

        model.edit(|d| d.mood_level = 5.0);
        assert!(model.can_submit());
        model.edit(|d| d.mood_level = 4.0);
        assert!(!model.is_dirty());
    }

    #[tokio::test]
    async fn create_then_same_day_update_keeps_id() {
        let (backend, channel) = member_channel().await;
        let mut model = LogFormModel::new();
        model.edit(|d| *d = scenario_draft());

        let created = save(&mut model, &channel).await.unwrap();
        assert_eq!(created.symptom_severity, None);
        assert_eq!(created.mood_level, 4);
        assert_eq!(model.record_id(), Some(created.id.as_str()));

        let sent = backend.state.borrow().log.last().cloned().unwrap();
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert!(body["symptomSeverity"].is_null());

        model.edit(|d| d.mood_level = 5.0);
        let updated = save(&mut model, &channel).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.mood_level, 5);
        assert!(updated.was_edited());
        assert_eq!(backend.record_count(), 1);
        assert_eq!(
            backend.paths().last().map(String::as_str),
            Some(format!("PUT /api/logs/{}", created.id).as_str())
        );
    }

    #[tokio::test]
    async fn created_record_round_trips_through_lenient_wire() {
        let (backend, channel) = member_channel().await;
        backend.state.borrow_mut().stringly_numbers = true;
        let mut model = LogFormModel::new();
        model.edit(|d| {
            *d = scenario_draft();
            d.symptoms = "headache".into();
            d.primary_symptom = "headache".into();
            d.symptom_severity = Some(3.0);
        });

        let created = save(&mut model, &channel).await.unwrap();
        let fetched = channel.get(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.sleep_hours, 7.5);
        assert_eq!(fetched.symptom_severity, Some(3));
        assert_eq!(LogFormModel::from_record(&fetched).draft().mood_level, 4.0);
    }

    #[tokio::test]
    async fn conflicting_create_adopts_existing_record() {
        let (backend, channel) = member_channel().await;
        let today = backend.state.borrow().today;
        let existing = backend.insert_record("u-1", today, sample_fields(2));

        let mut model = LogFormModel::new();
        model.edit(|d| *d = scenario_draft());
        let err = save(&mut model, &channel).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(model.record_id(), Some(existing.id.as_str()));
        assert_eq!(model.draft().mood_level, 4.0);

        let updated = save(&mut model, &channel).await.unwrap();
        assert_eq!(updated.id, existing.id);
        assert_eq!(backend.record_count(), 1);
    }

    #[test]
    fn invalid_draft_reports_field_errors_instead_of_submission() {
        let mut model = LogFormModel::new();
        model.edit(|d| {
            d.sleep_hours = 30.0;
            d.mood_level = 0.0;
        });

        let errors = model.submission().unwrap_err();
        assert_eq!(errors.get(LogField::SleepHours), Some("Sleep hours cannot exceed 24"));
        assert_eq!(errors.get(LogField::MoodLevel), Some("Mood level must be between 1 and 5"));
        assert_eq!(errors, model.errors());
    }

    #[tokio::test]
    async fn update_submission_targets_loaded_record() {
        let (backend, channel) = member_channel().await;
        let today = backend.state.borrow().today;
        let record = backend.insert_record("u-1", today, sample_fields(2));
        let mut model = LogFormModel::from_record(&record);
        model.edit(|d| d.stress_level = 5.0);

        let submission = model.submission().unwrap();
        assert!(matches!(&submission, Submission::Update { id, .. } if *id == record.id));
        let updated = model.submit(&channel, submission).await.unwrap();

        assert_eq!(updated.stress_level, 5);
        assert!(!model.is_dirty());
        assert_eq!(
            backend.paths().last().map(String::as_str),
            Some(format!("PUT /api/logs/{}", record.id).as_str())
        );
    }
}
