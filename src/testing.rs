// =========================================================
// Shared Mock Components
// =========================================================

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::session::SessionService;
use crate::storage::MemoryTokenStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mindtrack_shared::protocol::HttpMethod;
use mindtrack_shared::serde_helper::parse_calendar_date;
use mindtrack_shared::{DailyLogRecord, LogFields};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub const BASE_URL: &str = "http://api.test";

pub struct FakeUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

pub struct BackendState {
    pub users: Vec<FakeUser>,
    pub tokens: HashMap<String, String>,
    pub records: Vec<DailyLogRecord>,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    /// Simulate a transport failure for every request
    pub offline: bool,
    /// Serialize numeric fields as strings, like some server versions do
    pub stringly_numbers: bool,
    /// Canned responses returned before normal routing
    pub scripted: VecDeque<HttpResponse>,
    /// Every request received, in order
    pub log: Vec<HttpRequest>,
    next_id: u64,
}

/// In-memory backend implementing the REST surface
#[derive(Clone)]
pub struct FakeBackend {
    pub state: Rc<RefCell<BackendState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let today = NaiveDate::from_ymd_opt(2025, 2, 9).unwrap();
        Self {
            state: Rc::new(RefCell::new(BackendState {
                users: vec![FakeUser {
                    id: "u-1".into(),
                    email: "ada@example.com".into(),
                    name: "Ada".into(),
                    password: "Secret123".into(),
                }],
                tokens: HashMap::new(),
                records: Vec::new(),
                today,
                now: "2025-02-09T08:00:00Z".parse().unwrap(),
                offline: false,
                stringly_numbers: false,
                scripted: VecDeque::new(),
                log: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Issue a valid token for the seeded user
    pub fn issue_token(&self, user_id: &str) -> String {
        let mut state = self.state.borrow_mut();
        let token = format!("token-{}", state.next_id);
        state.next_id += 1;
        state.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    pub fn script(&self, resp: HttpResponse) {
        self.state.borrow_mut().scripted.push_back(resp);
    }

    pub fn paths(&self) -> Vec<String> {
        self.state
            .borrow()
            .log
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.url.trim_start_matches(BASE_URL)))
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.state.borrow().records.len()
    }

    pub fn insert_record(&self, user_id: &str, date: NaiveDate, fields: LogFields) -> DailyLogRecord {
        let mut state = self.state.borrow_mut();
        let record = state.make_record(user_id, date, fields);
        state.records.push(record.clone());
        record
    }
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn error(status: u16, message: &str) -> HttpResponse {
    respond(status, json!({ "error": message }))
}

impl BackendState {
    fn make_record(&mut self, user_id: &str, date: NaiveDate, fields: LogFields) -> DailyLogRecord {
        let id = format!("log-{}", self.next_id);
        self.next_id += 1;
        DailyLogRecord {
            id,
            user_id: user_id.to_string(),
            date,
            mood_level: fields.mood_level,
            anxiety_level: fields.anxiety_level,
            sleep_hours: fields.sleep_hours,
            sleep_quality: fields.sleep_quality,
            stress_level: fields.stress_level,
            physical_activity: fields.physical_activity,
            social_interactions: fields.social_interactions,
            symptoms: Some(fields.symptoms),
            primary_symptom: Some(fields.primary_symptom),
            symptom_severity: fields.symptom_severity,
            created_at: self.now,
            updated_at: self.now,
        }
    }

    fn record_json(&self, record: &DailyLogRecord) -> Value {
        let mut value = serde_json::to_value(record).unwrap();
        if self.stringly_numbers {
            for key in ["moodLevel", "anxietyLevel", "sleepHours", "sleepQuality", "stressLevel"] {
                let text = value[key].to_string();
                value[key] = Value::String(text);
            }
        }
        value
    }

    fn user_for(&self, req: &HttpRequest) -> Option<String> {
        let token = req.header("Authorization")?.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }

    fn grant(&mut self, user_index: usize) -> Value {
        let token = format!("token-{}", self.next_id);
        self.next_id += 1;
        let user = &self.users[user_index];
        self.tokens.insert(token.clone(), user.id.clone());
        json!({ "token": token, "userId": user.id, "email": user.email, "name": user.name })
    }

    fn route(&mut self, req: &HttpRequest) -> HttpResponse {
        let target = req.url.trim_start_matches(BASE_URL).to_string();
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p.to_string(), q.to_string()),
            None => (target.clone(), String::new()),
        };
        let body: Value = req
            .body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(Value::Null);

        match (req.method, path.as_str()) {
            (HttpMethod::Post, "/api/auth/login") => {
                let found = self.users.iter().position(|u| {
                    body["email"] == u.email.as_str() && body["password"] == u.password.as_str()
                });
                match found {
                    Some(i) => respond(200, self.grant(i)),
                    None => error(401, "Invalid email or password"),
                }
            }
            (HttpMethod::Post, "/api/auth/register") => {
                let email = body["email"].as_str().unwrap_or_default().to_string();
                if self.users.iter().any(|u| u.email == email) {
                    return error(400, "Email already registered");
                }
                let id = format!("u-{}", self.users.len() + 1);
                self.users.push(FakeUser {
                    id,
                    email,
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    password: body["password"].as_str().unwrap_or_default().to_string(),
                });
                let index = self.users.len() - 1;
                respond(201, self.grant(index))
            }
            (HttpMethod::Post, "/api/auth/google") => {
                let g = &body["googleUser"];
                let email = g["email"].as_str().unwrap_or_default().to_string();
                let index = match self.users.iter().position(|u| u.email == email) {
                    Some(i) => i,
                    None => {
                        self.users.push(FakeUser {
                            id: format!("u-{}", self.users.len() + 1),
                            email,
                            name: g["name"].as_str().unwrap_or_default().to_string(),
                            password: String::new(),
                        });
                        self.users.len() - 1
                    }
                };
                let grant = self.grant(index);
                respond(
                    200,
                    json!({
                        "token": grant["token"],
                        "user": { "id": grant["userId"], "email": grant["email"], "name": grant["name"] }
                    }),
                )
            }
            (HttpMethod::Get, "/api/auth/me") => match self.user_for(req) {
                Some(id) => {
                    let user = self.users.iter().find(|u| u.id == id).unwrap();
                    respond(200, json!({ "userId": user.id, "email": user.email, "name": user.name }))
                }
                None => error(401, "Invalid token"),
            },
            (method, p) if p.starts_with("/api/logs") => {
                let Some(user_id) = self.user_for(req) else {
                    return error(401, "Authentication required");
                };
                self.route_logs(method, p, &query, body, &user_id)
            }
            _ => error(404, "Not found"),
        }
    }

    fn route_logs(
        &mut self,
        method: HttpMethod,
        path: &str,
        query: &str,
        body: Value,
        user_id: &str,
    ) -> HttpResponse {
        match (method, path) {
            (HttpMethod::Get, "/api/logs/today") => {
                let today = self.today;
                match self.records.iter().find(|r| r.user_id == user_id && r.date == today) {
                    Some(r) => respond(200, json!({ "exists": true, "log": self.record_json(r) })),
                    None => respond(200, json!({ "exists": false })),
                }
            }
            (HttpMethod::Get, "/api/logs/filter") => {
                let params: HashMap<&str, &str> =
                    query.split('&').filter_map(|kv| kv.split_once('=')).collect();
                let (Some(start), Some(end)) = (
                    params.get("startDate").and_then(|s| parse_calendar_date(s)),
                    params.get("endDate").and_then(|s| parse_calendar_date(s)),
                ) else {
                    return error(400, "startDate and endDate are required");
                };
                let items: Vec<Value> = self
                    .records
                    .iter()
                    .filter(|r| r.user_id == user_id && start <= r.date && r.date <= end)
                    .map(|r| self.record_json(r))
                    .collect();
                respond(200, Value::Array(items))
            }
            (HttpMethod::Post, "/api/logs") => {
                let today = self.today;
                if self.records.iter().any(|r| r.user_id == user_id && r.date == today) {
                    return error(409, "A log already exists for today");
                }
                let Ok(fields) = serde_json::from_value::<LogFields>(body) else {
                    return error(400, "Invalid log data");
                };
                let record = self.make_record(user_id, today, fields);
                let value = self.record_json(&record);
                self.records.push(record);
                respond(201, value)
            }
            (HttpMethod::Put, p) | (HttpMethod::Get, p) => {
                let id = p.trim_start_matches("/api/logs/").to_string();
                let Some(index) = self
                    .records
                    .iter()
                    .position(|r| r.id == id && r.user_id == user_id)
                else {
                    return error(404, "Log not found");
                };
                if method == HttpMethod::Put {
                    let Ok(fields) = serde_json::from_value::<LogFields>(body) else {
                        return error(400, "Invalid log data");
                    };
                    let existing = self.records[index].clone();
                    let mut updated = self.make_record(user_id, existing.date, fields);
                    updated.id = existing.id;
                    updated.created_at = existing.created_at;
                    updated.updated_at = self.now + chrono::Duration::minutes(5);
                    self.records[index] = updated;
                }
                let value = self.record_json(&self.records[index]);
                respond(200, value)
            }
            _ => error(404, "Not found"),
        }
    }
}

#[async_trait(?Send)]
impl HttpClient for FakeBackend {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let mut state = self.state.borrow_mut();
        state.log.push(req.clone());
        if state.offline {
            return Err(ClientError::Network("Failed to fetch".into()));
        }
        if let Some(resp) = state.scripted.pop_front() {
            return Ok(resp);
        }
        Ok(state.route(&req))
    }
}

pub type TestSession = SessionService<FakeBackend, MemoryTokenStore>;

/// Build a session service over a fresh in-memory backend
pub fn setup_session() -> (FakeBackend, MemoryTokenStore, TestSession) {
    let backend = FakeBackend::new();
    let tokens = MemoryTokenStore::new();
    let service = SessionService::new(ApiClient::new(BASE_URL, backend.clone()), tokens.clone());
    (backend, tokens, service)
}

pub fn sample_fields(mood: u8) -> LogFields {
    LogFields {
        mood_level: mood,
        anxiety_level: 2,
        sleep_hours: 7.5,
        sleep_quality: 4,
        stress_level: 2,
        physical_activity: None,
        social_interactions: None,
        symptoms: String::new(),
        primary_symptom: String::new(),
        symptom_severity: None,
    }
}
