use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::filter::{Filter, FilterWhereInfo, SortDirection};
use crate::gateway::{AuthSession, AuthUser, BackendGateway, GatewayError};

/// In-memory stand-in for the hosted provider, with switches for failure paths
#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    users: Mutex<HashMap<String, (String, AuthUser)>>,
    failing_tables: Mutex<HashSet<String>>,
    failing_sign_out: Mutex<bool>,
    sign_in_hold: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, table: &str, row: Value) {
        self.tables.lock().unwrap().entry(table.to_string()).or_default().push(row);
    }

    pub fn add_user(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        let user = AuthUser { id, email: Some(email.to_string()) };
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user));
        id
    }

    /// Every select/insert touching `table` fails with a 500
    pub fn fail_table(&self, table: &str) {
        self.failing_tables.lock().unwrap().insert(table.to_string());
    }

    pub fn fail_sign_out(&self) {
        *self.failing_sign_out.lock().unwrap() = true;
    }

    /// Parks every sign-in until released. Returns `(entered, release)`:
    /// `entered` fires when a sign-in is parked, `release` lets it continue.
    pub fn hold_sign_in(&self) -> (Arc<Notify>, Arc<Notify>) {
        let hold = (Arc::new(Notify::new()), Arc::new(Notify::new()));
        *self.sign_in_hold.lock().unwrap() = Some(hold.clone());
        hold
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check_table(&self, table: &str) -> Result<(), GatewayError> {
        if self.failing_tables.lock().unwrap().contains(table) {
            return Err(GatewayError::Status { status: 500, message: format!("{} unavailable", table) });
        }
        Ok(())
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or_default()
            .partial_cmp(&y.as_f64().unwrap_or_default())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn matches(row: &Value, condition: &FilterWhereInfo) -> bool {
    let cell = row.get(&condition.column).unwrap_or(&Value::Null);
    compare(cell, &condition.data) == Ordering::Equal
}

#[async_trait]
impl BackendGateway for MemoryGateway {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        self.record("sign_in");
        let hold = self.sign_in_hold.lock().unwrap().clone();
        if let Some((entered, release)) = hold {
            entered.notify_one();
            release.notified().await;
        }
        let users = self.users.lock().unwrap();
        match users.get(email) {
            Some((stored, user)) if stored == password => Ok(AuthSession {
                access_token: format!("access-{}", user.id),
                refresh_token: Some(format!("refresh-{}", user.id)),
                expires_at: Some(Utc::now().timestamp() + 3600),
                user: Some(user.clone()),
            }),
            _ => Err(GatewayError::Unauthorized("Invalid login credentials".to_string())),
        }
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, GatewayError> {
        self.record("create_user");
        if self.users.lock().unwrap().contains_key(email) {
            return Err(GatewayError::Status { status: 422, message: "User already registered".to_string() });
        }
        let id = self.add_user(email, password);
        Ok(AuthUser { id, email: Some(email.to_string()) })
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), GatewayError> {
        self.record("sign_out");
        if *self.failing_sign_out.lock().unwrap() {
            return Err(GatewayError::Status { status: 503, message: "auth unavailable".to_string() });
        }
        Ok(())
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Value>, GatewayError> {
        self.record(format!("select:{}", filter.table_name()));
        self.check_table(filter.table_name())?;
        for embed in filter.embeds() {
            self.check_table(&embed.table)?;
        }

        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(filter.table_name())
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.conditions().iter().all(|c| matches(row, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for embed in filter.embeds() {
            let related = tables.get(&embed.table).cloned().unwrap_or_default();
            for row in rows.iter_mut() {
                let key = row.get(&embed.foreign_key).cloned().unwrap_or(Value::Null);
                let joined = related
                    .iter()
                    .find(|r| r.get("id") == Some(&key))
                    .cloned()
                    .unwrap_or(Value::Null);
                row[embed.table.as_str()] = joined;
            }
        }

        rows.sort_by(|a, b| {
            filter
                .order_by()
                .iter()
                .map(|o| {
                    let ord = compare(
                        a.get(&o.column).unwrap_or(&Value::Null),
                        b.get(&o.column).unwrap_or(&Value::Null),
                    );
                    if o.sort == SortDirection::Desc { ord.reverse() } else { ord }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        if let Some(limit) = filter.limit_value() {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Vec<Value>, GatewayError> {
        self.record(format!("insert:{}", table));
        self.check_table(table)?;
        if row.get("id").is_none() {
            row["id"] = json!(Uuid::new_v4());
        }
        if row.get("created_at").is_none() {
            row["created_at"] = json!(Utc::now());
        }
        self.seed(table, row.clone());
        Ok(vec![row])
    }

    async fn health_check(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
