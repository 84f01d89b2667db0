use super::{CREATE_INDEXES, Step};

const CREATE_CONVERSATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id VARCHAR(255) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );
"#;

const CREATE_MESSAGES: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id VARCHAR(255) NOT NULL,
        conversation_id INTEGER NOT NULL,
        role VARCHAR(20) NOT NULL CHECK (role IN ('user', 'assistant')),
        content TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (conversation_id) REFERENCES conversations(id)
    );
"#;

pub(crate) const STEPS: &[Step] = &[
    Step {
        summary: "Created conversations table",
        statements: &[CREATE_CONVERSATIONS],
    },
    Step {
        summary: "Created messages table",
        statements: &[CREATE_MESSAGES],
    },
    Step {
        summary: "Created indexes for performance",
        statements: CREATE_INDEXES,
    },
];
