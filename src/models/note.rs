#[derive(Debug, Clone)]
pub struct Note {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category_id: i64,
    pub content: String,
    /// Reserved for a future reminder feature; never written.
    pub remind_at: Option<i64>,
    pub is_done: bool,
    /// Unix seconds.
    pub created_at: i64,
}

impl Note {
    pub fn new(user_id: i64, category_id: i64, content: String) -> Self {
        Self {
            id: None,
            user_id,
            category_id,
            content,
            remind_at: None,
            is_done: false,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// One row of the open-note listing: notes joined with the owning user and
/// category names.
#[derive(Debug, Clone)]
pub struct OpenNote {
    pub id: i64,
    pub username: String,
    pub category: String,
    pub content: String,
}
