//! Blog Entity

use chrono::{DateTime, Utc};
use kernel::id::BlogId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub id: BlogId,
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub created_at: DateTime<Utc>,
    /// Memberships are not offered; always `false`
    pub is_membership: bool,
}

/// Editable blog fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogInput {
    pub name: String,
    pub description: String,
    pub website_url: String,
}

impl Blog {
    pub fn new(input: BlogInput, now: DateTime<Utc>) -> Self {
        Self {
            id: BlogId::new(),
            name: input.name,
            description: input.description,
            website_url: input.website_url,
            created_at: now,
            is_membership: false,
        }
    }

    pub fn apply(&mut self, input: BlogInput) {
        self.name = input.name;
        self.description = input.description;
        self.website_url = input.website_url;
    }
}
