//! Database schema definitions for GemHunter.
//!
//! Table and column names match the database file bundled with the mobile
//! client, so a bundled copy opens without conversion.

/// SQL schema for the base tables (version 1).
pub const SCHEMA: &str = r#"
-- Points of interest, monuments and gems
CREATE TABLE IF NOT EXISTS attractions (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    icon TEXT NOT NULL,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    isGem INTEGER NOT NULL DEFAULT 0,
    isFound INTEGER NOT NULL DEFAULT 0
);

-- Gem submissions awaiting curation
CREATE TABLE IF NOT EXISTS addedGems (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    image TEXT NOT NULL,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    comment TEXT NOT NULL
);
"#;

/// Schema version table
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 2;

/// SQL for migration from v1 to v2 (submission timestamps).
///
/// Only applied when the column is missing.
pub const MIGRATION_V1_TO_V2: &str = r#"
ALTER TABLE addedGems ADD COLUMN created_at TEXT;
"#;

/// Demo attractions around Turin, used when no bundled database is shipped.
///
/// The first three are monuments, the last two are gems; the fixed itinerary
/// lookup relies on that ordering.
pub const SEED_ATTRACTIONS: &str = r#"
INSERT INTO attractions (id, name, icon, lat, lon, description, isGem, isFound) VALUES
    (1, 'Mole Antonelliana', 'mole_icon.jpg', 45.0690, 7.6933,
     'The symbol of Turin, home of the National Cinema Museum.', 0, 0),
    (2, 'Palazzo Madama', 'madama_icon.jpg', 45.0711, 7.6856,
     'Two thousand years of history in one building on Piazza Castello.', 0, 0),
    (3, 'Gran Madre di Dio', 'granmadre_icon.jpg', 45.0624, 7.6990,
     'Neoclassical church across the Po, built for the return of the Savoy king.', 0, 0),
    (4, 'Panchina degli Innamorati', 'innamorati_icon.jpg', 45.0505366, 7.6812146,
     'A quiet bench in the Valentino park where couples leave their names.', 1, 0),
    (5, 'La Testa di Piazza Vittorio', 'testa_icon.jpg', 45.0650, 7.6950,
     'A stone head hidden under the arcades, easy to walk past.', 1, 0);
"#;
