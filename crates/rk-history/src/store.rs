//! SQLite-backed roll history.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};

use crate::error::{HistoryError, HistoryResult};
use crate::export::{ExportOptions, export};
use crate::filter::HistoryFilter;
use crate::record::{DiceTypeCount, NewRoll, RollFrequency, RollRecord};
use crate::stats::RollStatistics;

/// Rolls returned by [`HistoryStore::recent`] when no limit is given.
pub const DEFAULT_RECENT_LIMIT: u32 = 50;

/// Rolls per page for [`HistoryStore::page`].
pub const DEFAULT_PAGE_SIZE: u32 = 20;

const SELECT_ROLLS: &str = "SELECT id, dice_type, result, modifier, total, timestamp, \
     session_id, context, character_name FROM dice_rolls";

/// Persistent roll history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct RollRow {
    id: i64,
    dice_type: String,
    result: i64,
    modifier: i64,
    total: i64,
    timestamp: i64,
    session_id: Option<String>,
    context: Option<String>,
    character_name: Option<String>,
}

impl From<RollRow> for RollRecord {
    fn from(row: RollRow) -> Self {
        Self {
            id: row.id,
            dice_type: row.dice_type,
            result: row.result,
            modifier: row.modifier,
            total: row.total,
            timestamp: DateTime::from_timestamp_millis(row.timestamp).unwrap_or_default(),
            session_id: row.session_id,
            context: row.context,
            character_name: row.character_name,
        }
    }
}

impl HistoryStore {
    /// Open the history database.
    ///
    /// With a path the file is created if missing; with `None` the history
    /// lives in memory for the lifetime of the store.
    pub async fn open(path: Option<&Path>) -> HistoryResult<Self> {
        let pool = match path {
            Some(p) => {
                if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(p)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal);
                SqlitePoolOptions::new()
                    .max_connections(4)
                    .connect_with(options)
                    .await?
            }
            None => {
                // Every in-memory connection is its own database, so pin one.
                let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await?
            }
        };

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> HistoryResult<()> {
        info!("Running history migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dice_rolls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dice_type TEXT NOT NULL,
                result INTEGER NOT NULL,
                modifier INTEGER NOT NULL DEFAULT 0,
                total INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                session_id TEXT,
                context TEXT,
                character_name TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_dice_rolls_timestamp ON dice_rolls(timestamp)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_dice_rolls_type ON dice_rolls(dice_type)")
            .execute(&self.pool)
            .await?;

        info!("History migrations complete");
        Ok(())
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persist a roll and return its id. The total is always `result + modifier`.
    pub async fn log_roll(&self, roll: NewRoll) -> HistoryResult<i64> {
        let timestamp = roll.timestamp.unwrap_or_else(Utc::now);
        let total = roll.total();
        let id = sqlx::query(
            "INSERT INTO dice_rolls
                (dice_type, result, modifier, total, timestamp, session_id, context, character_name)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&roll.dice_type)
        .bind(roll.result)
        .bind(roll.modifier)
        .bind(total)
        .bind(timestamp.timestamp_millis())
        .bind(&roll.session_id)
        .bind(&roll.context)
        .bind(&roll.character_name)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, dice = %roll.dice_type, result = roll.result, total, "roll logged");
        Ok(id)
    }

    /// The most recent rolls, newest first.
    pub async fn recent(&self, limit: u32) -> HistoryResult<Vec<RollRecord>> {
        let rows: Vec<RollRow> = sqlx::query_as(&format!(
            "{SELECT_ROLLS} ORDER BY timestamp DESC, id DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RollRecord::from).collect())
    }

    /// One page of history, newest first. Pages start at 0.
    pub async fn page(&self, page: u32, page_size: u32) -> HistoryResult<Vec<RollRecord>> {
        let rows: Vec<RollRow> = sqlx::query_as(&format!(
            "{SELECT_ROLLS} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(page_size))
        .bind(i64::from(page) * i64::from(page_size))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RollRecord::from).collect())
    }

    /// Every roll at or after `start`, newest first.
    pub async fn rolls_after(&self, start: DateTime<Utc>) -> HistoryResult<Vec<RollRecord>> {
        let rows: Vec<RollRow> = sqlx::query_as(&format!(
            "{SELECT_ROLLS} WHERE timestamp >= ? ORDER BY timestamp DESC, id DESC"
        ))
        .bind(start.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RollRecord::from).collect())
    }

    /// Every roll of one dice type, newest first.
    pub async fn by_dice_type(&self, dice_type: &str) -> HistoryResult<Vec<RollRecord>> {
        self.by_column("dice_type", dice_type).await
    }

    /// Every roll in one session, newest first.
    pub async fn by_session(&self, session_id: &str) -> HistoryResult<Vec<RollRecord>> {
        self.by_column("session_id", session_id).await
    }

    /// Every roll for one character, newest first.
    pub async fn by_character(&self, character_name: &str) -> HistoryResult<Vec<RollRecord>> {
        self.by_column("character_name", character_name).await
    }

    /// Every roll with one context tag, newest first.
    pub async fn by_context(&self, context: &str) -> HistoryResult<Vec<RollRecord>> {
        self.by_column("context", context).await
    }

    async fn by_column(&self, column: &'static str, value: &str) -> HistoryResult<Vec<RollRecord>> {
        let rows: Vec<RollRow> = sqlx::query_as(&format!(
            "{SELECT_ROLLS} WHERE {column} = ? ORDER BY timestamp DESC, id DESC"
        ))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RollRecord::from).collect())
    }

    /// Rolls matching every criterion in `filter`, newest first.
    ///
    /// `now` anchors relative date ranges; `limit` caps the result.
    pub async fn filtered(
        &self,
        filter: &HistoryFilter,
        now: DateTime<Utc>,
        limit: Option<u32>,
    ) -> HistoryResult<Vec<RollRecord>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_ROLLS);
        qb.push(" WHERE 1 = 1");
        if let Some(dice_type) = &filter.dice_type {
            qb.push(" AND dice_type = ").push_bind(dice_type.clone());
        }
        if let Some(session_id) = &filter.session_id {
            qb.push(" AND session_id = ").push_bind(session_id.clone());
        }
        if let Some(character) = &filter.character_name {
            qb.push(" AND character_name = ").push_bind(character.clone());
        }
        if let Some(context) = &filter.context {
            qb.push(" AND context = ").push_bind(context.clone());
        }
        let (start, end) = filter.date_range.bounds(now);
        if let Some(start) = start {
            qb.push(" AND timestamp >= ").push_bind(start.timestamp_millis());
        }
        if let Some(end) = end {
            qb.push(" AND timestamp < ").push_bind(end.timestamp_millis());
        }
        qb.push(" ORDER BY timestamp DESC, id DESC");
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows: Vec<RollRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(RollRecord::from).collect())
    }

    /// Every roll, oldest first.
    pub async fn all_chronological(&self) -> HistoryResult<Vec<RollRecord>> {
        let rows: Vec<RollRow> =
            sqlx::query_as(&format!("{SELECT_ROLLS} ORDER BY timestamp ASC, id ASC"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(RollRecord::from).collect())
    }

    /// Look up one roll.
    pub async fn get(&self, id: i64) -> HistoryResult<Option<RollRecord>> {
        let row: Option<RollRow> = sqlx::query_as(&format!("{SELECT_ROLLS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(RollRecord::from))
    }

    /// Total number of logged rolls.
    pub async fn count(&self) -> HistoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dice_rolls")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Mean raw result for a dice type, `None` if it was never rolled.
    pub async fn average_for(&self, dice_type: &str) -> HistoryResult<Option<f64>> {
        let avg: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(CAST(result AS REAL)) FROM dice_rolls WHERE dice_type = ?",
        )
        .bind(dice_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }

    /// Highest raw result for a dice type.
    pub async fn max_for(&self, dice_type: &str) -> HistoryResult<Option<i64>> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(result) FROM dice_rolls WHERE dice_type = ?")
                .bind(dice_type)
                .fetch_one(&self.pool)
                .await?;
        Ok(max)
    }

    /// Lowest raw result for a dice type.
    pub async fn min_for(&self, dice_type: &str) -> HistoryResult<Option<i64>> {
        let min: Option<i64> =
            sqlx::query_scalar("SELECT MIN(result) FROM dice_rolls WHERE dice_type = ?")
                .bind(dice_type)
                .fetch_one(&self.pool)
                .await?;
        Ok(min)
    }

    /// Roll counts per dice type, most-rolled first.
    pub async fn dice_type_distribution(&self) -> HistoryResult<Vec<DiceTypeCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT dice_type, COUNT(*) AS count FROM dice_rolls
             GROUP BY dice_type ORDER BY count DESC, dice_type ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(dice_type, count)| DiceTypeCount { dice_type, count })
            .collect())
    }

    /// Result histogram for a dice type, by ascending result.
    pub async fn roll_distribution(&self, dice_type: &str) -> HistoryResult<Vec<RollFrequency>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT result, COUNT(*) AS frequency FROM dice_rolls
             WHERE dice_type = ? GROUP BY result ORDER BY result ASC",
        )
        .bind(dice_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(result, frequency)| RollFrequency { result, frequency })
            .collect())
    }

    /// Statistics over the whole history.
    pub async fn statistics(&self) -> HistoryResult<RollStatistics> {
        let records = self.all_chronological().await?;
        Ok(RollStatistics::from_records(&records))
    }

    /// Export the rolls in `options.date_range`, oldest first.
    ///
    /// Statistics, when requested, cover the exported rolls only.
    pub async fn export(&self, options: &ExportOptions, now: DateTime<Utc>) -> HistoryResult<String> {
        let filter = HistoryFilter::new().date_range(options.date_range);
        let mut records = self.filtered(&filter, now, None).await?;
        records.reverse();
        let stats = options
            .include_statistics
            .then(|| RollStatistics::from_records(&records));
        let out = export(&records, stats.as_ref(), options.format)?;
        info!(rolls = records.len(), format = %options.format, "exported history");
        Ok(out)
    }

    /// Delete every roll logged before `cutoff`. Returns the number removed.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> HistoryResult<u64> {
        let removed = sqlx::query("DELETE FROM dice_rolls WHERE timestamp < ?")
            .bind(cutoff.timestamp_millis())
            .execute(&self.pool)
            .await?
            .rows_affected();
        info!(removed, %cutoff, "pruned old rolls");
        Ok(removed)
    }

    /// Delete every roll. Returns the number removed.
    pub async fn clear(&self) -> HistoryResult<u64> {
        let removed = sqlx::query("DELETE FROM dice_rolls")
            .execute(&self.pool)
            .await?
            .rows_affected();
        info!(removed, "cleared roll history");
        Ok(removed)
    }

    /// Delete one roll. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> HistoryResult<bool> {
        let result = sqlx::query("DELETE FROM dice_rolls WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete one roll, failing with [`HistoryError::NotFound`] if it is absent.
    pub async fn delete_existing(&self, id: i64) -> HistoryResult<()> {
        if self.delete(id).await? {
            Ok(())
        } else {
            Err(HistoryError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use crate::filter::DateRange;
    use chrono::{Duration, TimeZone};

    async fn test_store() -> HistoryStore {
        HistoryStore::open(None).await.unwrap()
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[tokio::test]
    async fn test_migrations_run() {
        let store = test_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        // Idempotent.
        store.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn test_log_roll_computes_total() {
        let store = test_store().await;
        let id = store
            .log_roll(
                NewRoll::new("d20", 15)
                    .with_modifier(2)
                    .in_session("s1")
                    .with_context("attack")
                    .for_character("Mira"),
            )
            .await
            .unwrap();

        let record = store.get(id).await.unwrap().unwrap();
        assert_eq!(record.dice_type, "d20");
        assert_eq!(record.result, 15);
        assert_eq!(record.modifier, 2);
        assert_eq!(record.total, 17);
        assert_eq!(record.session_id.as_deref(), Some("s1"));
        assert_eq!(record.context.as_deref(), Some("attack"));
        assert_eq!(record.character_name.as_deref(), Some("Mira"));
    }

    #[tokio::test]
    async fn test_negative_modifier() {
        let store = test_store().await;
        let id = store
            .log_roll(NewRoll::new("d10", 10).with_modifier(-3))
            .await
            .unwrap();
        assert_eq!(store.get(id).await.unwrap().unwrap().total, 7);
    }

    #[tokio::test]
    async fn test_timestamp_round_trips() {
        let store = test_store().await;
        let id = store.log_roll(NewRoll::new("d6", 3).at(at(5))).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().unwrap().timestamp, at(5));
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let store = test_store().await;
        for i in 0..5 {
            store
                .log_roll(NewRoll::new("d6", i + 1).at(at(i)))
                .await
                .unwrap();
        }
        let recent = store.recent(3).await.unwrap();
        let results: Vec<i64> = recent.iter().map(|r| r.result).collect();
        assert_eq!(results, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn test_paging() {
        let store = test_store().await;
        for i in 0..25 {
            store
                .log_roll(NewRoll::new("d20", (i % 20) + 1).at(at(i)))
                .await
                .unwrap();
        }
        let first = store.page(0, DEFAULT_PAGE_SIZE).await.unwrap();
        let second = store.page(1, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 5);
        assert!(first.last().unwrap().timestamp > second[0].timestamp);
    }

    #[tokio::test]
    async fn test_tag_queries() {
        let store = test_store().await;
        store
            .log_roll(NewRoll::new("d20", 12).in_session("a").for_character("Mira"))
            .await
            .unwrap();
        store
            .log_roll(NewRoll::new("d8", 5).in_session("b").with_context("damage"))
            .await
            .unwrap();

        assert_eq!(store.by_dice_type("d20").await.unwrap().len(), 1);
        assert_eq!(store.by_session("b").await.unwrap()[0].result, 5);
        assert_eq!(store.by_character("Mira").await.unwrap().len(), 1);
        assert_eq!(store.by_context("damage").await.unwrap().len(), 1);
        assert!(store.by_context("attack").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rolls_after() {
        let store = test_store().await;
        store.log_roll(NewRoll::new("d6", 1).at(at(0))).await.unwrap();
        store.log_roll(NewRoll::new("d6", 2).at(at(10))).await.unwrap();
        let after = store.rolls_after(at(10)).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].result, 2);
    }

    #[tokio::test]
    async fn test_aggregates() {
        let store = test_store().await;
        for r in [4, 10, 16] {
            store.log_roll(NewRoll::new("d20", r)).await.unwrap();
        }
        store.log_roll(NewRoll::new("d6", 6)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 4);
        assert_eq!(store.average_for("d20").await.unwrap(), Some(10.0));
        assert_eq!(store.max_for("d20").await.unwrap(), Some(16));
        assert_eq!(store.min_for("d20").await.unwrap(), Some(4));
        assert_eq!(store.average_for("d12").await.unwrap(), None);
        assert_eq!(store.max_for("d12").await.unwrap(), None);

        let dist = store.dice_type_distribution().await.unwrap();
        assert_eq!(
            dist[0],
            DiceTypeCount {
                dice_type: "d20".into(),
                count: 3
            }
        );
        let freq = store.roll_distribution("d20").await.unwrap();
        let results: Vec<i64> = freq.iter().map(|f| f.result).collect();
        assert_eq!(results, vec![4, 10, 16]);
    }

    #[tokio::test]
    async fn test_empty_statistics() {
        let store = test_store().await;
        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total_rolls, 0);
        assert!(stats.dice_type_stats.is_empty());
        assert!(store.dice_type_distribution().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let store = test_store().await;
        for i in 0..4 {
            store.log_roll(NewRoll::new("d4", 1).at(at(i))).await.unwrap();
        }
        let removed = store.delete_older_than(at(2)).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = test_store().await;
        let id = store.log_roll(NewRoll::new("d4", 2)).await.unwrap();
        store.log_roll(NewRoll::new("d4", 3)).await.unwrap();

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(matches!(
            store.delete_existing(id).await,
            Err(HistoryError::NotFound(_))
        ));
        assert!(store.get(id).await.unwrap().is_none());

        assert_eq!(store.clear().await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filtered_combines_criteria() {
        let store = test_store().await;
        let now = at(60 * 24);
        store
            .log_roll(NewRoll::new("d20", 5).at(at(-60 * 24 * 10)).in_session("s1"))
            .await
            .unwrap();
        store
            .log_roll(NewRoll::new("d20", 9).at(at(0)).in_session("s1"))
            .await
            .unwrap();
        store
            .log_roll(NewRoll::new("d8", 4).at(at(1)).in_session("s1"))
            .await
            .unwrap();
        store
            .log_roll(NewRoll::new("d20", 11).at(at(2)).in_session("s2"))
            .await
            .unwrap();

        let filter = HistoryFilter::new()
            .dice_type("d20")
            .session("s1")
            .date_range(DateRange::LastWeek);
        let rolls = store.filtered(&filter, now, None).await.unwrap();
        assert_eq!(rolls.len(), 1);
        assert_eq!(rolls[0].result, 9);

        let all = store.filtered(&HistoryFilter::new(), now, Some(2)).await.unwrap();
        let results: Vec<i64> = all.iter().map(|r| r.result).collect();
        assert_eq!(results, vec![11, 4]);
    }

    #[tokio::test]
    async fn test_export_is_chronological() {
        let store = test_store().await;
        store.log_roll(NewRoll::new("d6", 2).at(at(0))).await.unwrap();
        store.log_roll(NewRoll::new("d6", 5).at(at(1))).await.unwrap();

        let csv = store
            .export(&ExportOptions::new(ExportFormat::Csv), at(10))
            .await
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,d6,2,"));
        assert!(lines[2].starts_with("2,d6,5,"));

        let json = store
            .export(
                &ExportOptions::new(ExportFormat::Json).with_statistics(true),
                at(10),
            )
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["statistics"]["total_rolls"], 2);
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolls.db");
        {
            let store = HistoryStore::open(Some(&path)).await.unwrap();
            store.log_roll(NewRoll::new("d12", 7)).await.unwrap();
            store.pool().close().await;
        }
        let reopened = HistoryStore::open(Some(&path)).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }
}
