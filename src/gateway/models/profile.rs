use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const USERS_PROFILE: &str = "users_profile";

/// Row of `users_profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u8>,
    #[serde(default)]
    pub instruction_category: Option<String>,
    #[serde(default)]
    pub instruction_option: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
}

/// Insert payload for `users_profile`
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    pub instruction_category: String,
    pub instruction_option: Option<String>,
    pub region: String,
    pub province: String,
}

// Older rows stored the wizard's raw text input.
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_and_text_age() {
        let id = Uuid::new_v4();
        let a: ProfileRow = serde_json::from_value(json!({ "id": id, "name": "Ana", "age": 17 })).unwrap();
        let b: ProfileRow = serde_json::from_value(json!({ "id": id, "name": "Ana", "age": "17" })).unwrap();
        let c: ProfileRow = serde_json::from_value(json!({ "id": id, "age": null })).unwrap();
        assert_eq!(a.age, Some(17));
        assert_eq!(b.age, Some(17));
        assert_eq!(c.age, None);
        assert_eq!(c.name, None);
    }
}
