mod postgres;
mod runner;
mod sqlite;

pub use runner::{MigrationReport, run, verify};

use crate::database::Dialect;

/// One group of DDL statements and the status line printed once it has
/// been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub summary: &'static str,
    pub statements: &'static [&'static str],
}

/// Tables created by the migration with their columns in declaration order.
pub const TABLES: &[(&str, &[&str])] = &[
    ("conversations", &["id", "user_id", "created_at", "updated_at"]),
    (
        "messages",
        &["id", "user_id", "conversation_id", "role", "content", "created_at"],
    ),
];

/// (table, index name, indexed column) created by the migration.
pub const INDEXES: &[(&str, &str, &str)] = &[
    ("messages", "idx_messages_conversation_id", "conversation_id"),
    ("messages", "idx_messages_user_id", "user_id"),
    ("conversations", "idx_conversations_user_id", "user_id"),
];

/// (table, column, referenced table) foreign keys created by the migration.
pub const FOREIGN_KEYS: &[(&str, &str, &str)] =
    &[("messages", "conversation_id", "conversations")];

// Same text in both dialects
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_messages_conversation_id ON messages(conversation_id);",
    "CREATE INDEX IF NOT EXISTS idx_messages_user_id ON messages(user_id);",
    "CREATE INDEX IF NOT EXISTS idx_conversations_user_id ON conversations(user_id);",
];

pub fn steps(dialect: Dialect) -> &'static [Step] {
    match dialect {
        Dialect::Postgres => postgres::STEPS,
        Dialect::Sqlite => sqlite::STEPS,
    }
}

/// All statements of `dialect` in execution order.
pub fn statements(dialect: Dialect) -> Vec<&'static str> {
    steps(dialect)
        .iter()
        .flat_map(|step| step.statements.iter().copied())
        .collect()
}
