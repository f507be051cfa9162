pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- books table
CREATE TABLE IF NOT EXISTS books (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    title_ch TEXT NOT NULL,
    author TEXT NOT NULL,
    cover_image TEXT,
    category_id TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    slug TEXT NOT NULL UNIQUE,
    affiliate_url TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_books_created_at ON books(created_at);

-- chapters table
CREATE TABLE IF NOT EXISTS chapters (
    id TEXT PRIMARY KEY,
    book_id TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    title_ch TEXT NOT NULL,
    slug TEXT NOT NULL,
    "order" INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(book_id, slug)
);

CREATE INDEX IF NOT EXISTS idx_chapters_book_id ON chapters(book_id, "order");

-- chapter_content table (one row per chapter)
CREATE TABLE IF NOT EXISTS chapter_content (
    id TEXT PRIMARY KEY,
    chapter_id TEXT NOT NULL UNIQUE REFERENCES chapters(id) ON DELETE CASCADE,
    summary_en TEXT NOT NULL,
    summary_ch TEXT NOT NULL,
    vocabulary TEXT NOT NULL DEFAULT '[]',
    key_points TEXT NOT NULL DEFAULT '[]',
    status TEXT NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'published', 'archived')),
    audio_url_en TEXT,
    audio_url_ch TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- chapter_questions table
CREATE TABLE IF NOT EXISTS chapter_questions (
    id TEXT PRIMARY KEY,
    chapter_id TEXT NOT NULL REFERENCES chapters(id) ON DELETE CASCADE,
    position INTEGER NOT NULL DEFAULT 0,
    question TEXT NOT NULL,
    options TEXT NOT NULL DEFAULT '[]',
    correct_answer INTEGER NOT NULL DEFAULT 0,
    explanation_en TEXT NOT NULL DEFAULT '',
    explanation_ch TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (correct_answer >= 0 AND correct_answer < json_array_length(options))
);

CREATE INDEX IF NOT EXISTS idx_chapter_questions_chapter_id ON chapter_questions(chapter_id, position);

-- ad_placements table
CREATE TABLE IF NOT EXISTS ad_placements (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    location TEXT NOT NULL,
    ad_client TEXT NOT NULL,
    ad_slot TEXT NOT NULL,
    format TEXT NOT NULL DEFAULT 'auto'
        CHECK (format IN ('auto', 'horizontal', 'vertical', 'rectangle')),
    status TEXT NOT NULL DEFAULT 'active'
        CHECK (status IN ('active', 'paused', 'archived')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- site_settings table (JSON values)
CREATE TABLE IF NOT EXISTS site_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

INSERT OR IGNORE INTO site_settings (key, value) VALUES ('adsense', '{"enabled":false}');
"#;
