use serde::{de, Deserialize, Deserializer};

// Every field is optional so missing values surface as BadRequest
// instead of a deserialization rejection.

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(i64),
    Text(String),
}

/// Accepts an id as a JSON number or a numeric string. Blank strings and
/// `null` count as missing.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdValue::Number(id)) => Ok(Some(id)),
        Some(IdValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(IdValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer id, got '{}'", text))),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct LoginForm {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskListQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RoleQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CreateTaskForm {
    pub role: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatusUpdateForm {
    #[serde(default, deserialize_with = "optional_id")]
    pub task_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CreateUserForm {
    pub role: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}
