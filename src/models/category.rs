#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    /// The category seeded at store initialization. Always resolvable;
    /// notes added without an explicit category land here.
    pub const SEED_ID: i64 = 1;
    pub const SEED_NAME: &'static str = "idea";
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
