pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL CHECK (length(username) > 0),
    username_key TEXT NOT NULL,
    password TEXT NOT NULL CHECK (length(password) > 0),
    roles JSON NOT NULL DEFAULT '["Employee"]',
    active INTEGER NOT NULL DEFAULT 1 CHECK (active IN (0, 1)),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Note owners are plain identifiers; integrity is checked before user deletion
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    user TEXT NOT NULL CHECK (length(user) > 0),
    title TEXT NOT NULL CHECK (length(title) > 0),
    title_key TEXT NOT NULL,
    text TEXT NOT NULL CHECK (length(text) > 0),
    completed INTEGER NOT NULL DEFAULT 0 CHECK (completed IN (0, 1)),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notes_user ON notes(user);

-- Case-insensitive uniqueness over the folded key columns
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_key ON users(username_key);
CREATE UNIQUE INDEX IF NOT EXISTS idx_notes_title_key ON notes(title_key);
"#;
