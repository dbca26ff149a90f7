#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    /// Unix seconds.
    pub created_at: i64,
}

impl User {
    pub fn new(username: String) -> Self {
        Self {
            id: None,
            username,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Creation date as `YYYY-MM-DD`, for roster display.
    pub fn created_date(&self) -> String {
        chrono::DateTime::from_timestamp(self.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.created_at.to_string())
    }
}
