//! SQLite-based ledger implementation

use chrono::{DateTime, NaiveDate, Utc};
use owlet_api::WarningTier;
use owlet_util::ItemId;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::{ItemStats, Ledger, NewWatchEvent, StoreError, StoreResult, WarningEvent, WatchEvent};

/// SQLite-based ledger
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open or create a ledger at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory ledger (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Watch ledger (append-only)
            CREATE TABLE IF NOT EXISTS watch_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id TEXT NOT NULL,
                channel TEXT NOT NULL,
                watched_at TEXT NOT NULL,
                day TEXT NOT NULL,
                seconds_watched INTEGER NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                manual_play INTEGER NOT NULL DEFAULT 0,
                grace_play INTEGER NOT NULL DEFAULT 0
            );

            -- Warning audit trail (write-only)
            CREATE TABLE IF NOT EXISTS warning_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tier TEXT NOT NULL,
                shown_at TEXT NOT NULL
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_watch_day ON watch_events(day);
            CREATE INDEX IF NOT EXISTS idx_watch_item ON watch_events(item_id);
            CREATE INDEX IF NOT EXISTS idx_warning_shown_at ON warning_events(shown_at);
            "#,
        )?;

        debug!("Ledger schema initialized");
        Ok(())
    }

    fn parse_instant(s: &str) -> StoreResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Serialization(format!("bad timestamp '{}': {}", s, e)))
    }

    fn day_key(day: NaiveDate) -> String {
        day.format("%Y-%m-%d").to_string()
    }

    fn row_to_watch_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String, String, i64, bool, bool, bool)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
        ))
    }
}

impl Ledger for SqliteLedger {
    fn append_watch(&self, event: &NewWatchEvent) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap();
        let day = Self::day_key(event.watched_at.date_naive());

        conn.execute(
            r#"
            INSERT INTO watch_events
                (item_id, channel, watched_at, day, seconds_watched, completed, manual_play, grace_play)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                event.item_id.as_str(),
                event.channel,
                event.watched_at.to_rfc3339(),
                day,
                i64::from(event.seconds_watched),
                event.completed,
                event.manual_play,
                event.grace_play,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(
            event_id = id,
            item_id = %event.item_id,
            seconds = event.seconds_watched,
            grace = event.grace_play,
            manual = event.manual_play,
            "Watch event appended"
        );
        Ok(id)
    }

    fn events_for_day(&self, day: NaiveDate) -> StoreResult<Vec<WatchEvent>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, item_id, channel, watched_at, seconds_watched, completed, manual_play, grace_play
            FROM watch_events WHERE day = ? ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([Self::day_key(day)], Self::row_to_watch_event)?;

        let mut events = Vec::new();
        for row in rows {
            let (id, item_id, channel, watched_at, seconds, completed, manual, grace) = row?;
            events.push(WatchEvent {
                id,
                item_id: ItemId::new(item_id),
                channel,
                watched_at: Self::parse_instant(&watched_at)?,
                seconds_watched: seconds.max(0) as u32,
                completed,
                manual_play: manual,
                grace_play: grace,
            });
        }

        Ok(events)
    }

    fn countable_seconds(&self, day: NaiveDate) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap();

        let secs: Option<i64> = conn
            .query_row(
                r#"
                SELECT SUM(seconds_watched) FROM watch_events
                WHERE day = ? AND manual_play = 0 AND grace_play = 0
                "#,
                [Self::day_key(day)],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(secs.unwrap_or(0))
    }

    fn grace_played_on(&self, day: NaiveDate) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let exists: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM watch_events WHERE day = ? AND grace_play = 1 LIMIT 1",
                [Self::day_key(day)],
                |row| row.get(0),
            )
            .optional()?;

        Ok(exists.is_some())
    }

    fn engagement_stats(&self) -> StoreResult<HashMap<ItemId, ItemStats>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT item_id, COUNT(*), SUM(completed), MAX(watched_at)
            FROM watch_events GROUP BY item_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let item_id: String = row.get(0)?;
            let plays: i64 = row.get(1)?;
            let completions: i64 = row.get(2)?;
            let last: Option<String> = row.get(3)?;
            Ok((item_id, plays, completions, last))
        })?;

        let mut stats = HashMap::new();
        for row in rows {
            let (item_id, plays, completions, last) = row?;
            let last_watched_at = match last {
                Some(s) => Some(Self::parse_instant(&s)?),
                None => None,
            };
            stats.insert(
                ItemId::new(item_id),
                ItemStats {
                    plays: plays.max(0) as u32,
                    completions: completions.max(0) as u32,
                    last_watched_at,
                },
            );
        }

        Ok(stats)
    }

    fn append_warning(&self, tier: WarningTier, shown_at: DateTime<Utc>) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO warning_events (tier, shown_at) VALUES (?, ?)",
            params![tier.as_str(), shown_at.to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();
        debug!(event_id = id, tier = tier.as_str(), "Warning display recorded");
        Ok(id)
    }

    fn recent_warnings(&self, limit: usize) -> StoreResult<Vec<WarningEvent>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, tier, shown_at FROM warning_events ORDER BY id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map([limit], |row| {
            let id: i64 = row.get(0)?;
            let tier: String = row.get(1)?;
            let shown_at: String = row.get(2)?;
            Ok((id, tier, shown_at))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, tier_str, shown_at) = row?;
            let tier = WarningTier::from_str_tag(&tier_str).ok_or_else(|| {
                StoreError::Serialization(format!("unknown warning tier in store: {}", tier_str))
            })?;
            events.push(WarningEvent {
                id,
                tier,
                shown_at: Self::parse_instant(&shown_at)?,
            });
        }

        Ok(events)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                tracing::warn!("Ledger lock poisoned");
                false
            }
        }
    }
}
