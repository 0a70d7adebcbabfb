//! Whole-store export and import as a single JSON document.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::db::{
    models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord},
    repositories::{self, DayRecord},
    Database,
};
use crate::settings::{Configuration, SettingsStore};
use crate::time::Clock;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

pub const BACKUP_APP: &str = "lifeline";
pub const BACKUP_VERSION: u32 = 1;

/// Tables missing from an imported payload are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupTables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance: Option<Vec<FinanceRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Vec<RelationRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career: Option<Vec<CareerRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub app: String,
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub exported_at_local: String,
    #[serde(default)]
    pub configuration: Option<Configuration>,
    #[serde(default)]
    pub tables: BackupTables,
}

impl BackupPayload {
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read backup from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a valid backup file", path.display()))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write backup to {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.app != BACKUP_APP {
            bail!("not a {BACKUP_APP} backup (app tag '{}')", self.app);
        }
        if self.version < 1 {
            bail!("unsupported backup version {}", self.version);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImportMode {
    /// Clear each imported table before writing its rows.
    #[default]
    Replace,
    /// Overwrite matching days and keep the rest.
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub tables_imported: Vec<String>,
}

pub async fn export_backup(
    db: &Database,
    settings: &SettingsStore,
    clock: &Clock,
) -> Result<BackupPayload> {
    let (daily, finance, relation, career) = tokio::try_join!(
        db.list_all::<DailyRecord>(),
        db.list_all::<FinanceRecord>(),
        db.list_all::<RelationRecord>(),
        db.list_all::<CareerRecord>(),
    )?;
    let configuration = settings.get_or_init()?;
    let now = Utc::now();

    Ok(BackupPayload {
        app: BACKUP_APP.into(),
        version: BACKUP_VERSION,
        exported_at: now,
        exported_at_local: clock.format_local(now),
        configuration: Some(configuration),
        tables: BackupTables {
            daily: Some(daily),
            finance: Some(finance),
            relation: Some(relation),
            career: Some(career),
        },
    })
}

fn check_rows<T: DayRecord>(rows: &Option<Vec<T>>) -> Result<()> {
    for row in rows.iter().flatten() {
        row.validate().with_context(|| {
            format!("backup has an invalid {} row for {}", T::TABLE, row.date_key())
        })?;
    }
    Ok(())
}

fn restore<T: DayRecord>(
    conn: &rusqlite::Connection,
    rows: &Option<Vec<T>>,
    mode: ImportMode,
    imported: &mut Vec<String>,
) -> Result<()> {
    let Some(rows) = rows else {
        return Ok(());
    };
    if mode == ImportMode::Replace {
        repositories::clear::<T>(conn)?;
    }
    for row in rows {
        row.write(conn)
            .with_context(|| format!("failed to import {} row {}", T::TABLE, row.date_key()))?;
    }
    imported.push(T::TABLE.to_string());
    Ok(())
}

/// Writes every table present in `payload` inside one transaction, then
/// replaces the configuration when the payload carries one. A single invalid
/// row rejects the whole payload before anything is written.
pub async fn import_backup(
    db: &Database,
    settings: &SettingsStore,
    payload: BackupPayload,
    mode: ImportMode,
) -> Result<ImportSummary> {
    payload.validate()?;
    if let Some(configuration) = &payload.configuration {
        configuration
            .validate()
            .context("backup carries an invalid configuration")?;
    }
    check_rows(&payload.tables.daily)?;
    check_rows(&payload.tables.finance)?;
    check_rows(&payload.tables.relation)?;
    check_rows(&payload.tables.career)?;

    let BackupPayload {
        configuration,
        tables,
        ..
    } = payload;

    let tables_imported = db
        .execute(move |conn| {
            let tx = conn.transaction()?;
            let mut imported = Vec::new();
            restore(&tx, &tables.daily, mode, &mut imported)?;
            restore(&tx, &tables.finance, mode, &mut imported)?;
            restore(&tx, &tables.relation, mode, &mut imported)?;
            restore(&tx, &tables.career, mode, &mut imported)?;
            tx.commit()?;
            Ok(imported)
        })
        .await?;

    match configuration {
        Some(configuration) => settings.replace(configuration)?,
        None => log_warn!("Backup has no configuration; keeping current settings"),
    }

    log_info!(
        "Imported backup ({mode:?}): {}",
        if tables_imported.is_empty() {
            "no tables".to_string()
        } else {
            tables_imported.join(", ")
        }
    );

    Ok(ImportSummary { tables_imported })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CareerPatch, DailyPatch, FinancePatch};
    use crate::db::repositories::tests::open;
    use crate::time::DayKey;

    fn day(raw: &str) -> DayKey {
        raw.parse().unwrap()
    }

    fn settings(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json")).unwrap()
    }

    async fn seed(db: &Database) {
        db.upsert_daily(
            day("2024-06-07"),
            DailyPatch {
                sleep_hours: Some(6.5),
                ritual_done: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        db.upsert_finance(
            day("2024-06-07"),
            FinancePatch {
                income: Some(70_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn export_then_replace_restores_the_store() {
        let (dir, db) = open();
        let store = settings(&dir);
        seed(&db).await;
        let payload = export_backup(&db, &store, &Clock::default()).await.unwrap();
        assert_eq!(payload.app, "lifeline");
        assert_eq!(payload.tables.daily.as_ref().map(Vec::len), Some(1));

        let (other_dir, other_db) = open();
        let other_store = settings(&other_dir);
        other_db
            .upsert_career(day("2024-06-01"), CareerPatch::default())
            .await
            .unwrap();

        let summary = import_backup(&other_db, &other_store, payload.clone(), ImportMode::Replace)
            .await
            .unwrap();
        assert_eq!(
            summary.tables_imported,
            vec!["daily_logs", "finance_logs", "relation_logs", "career_logs"]
        );
        assert!(other_db.list_all::<CareerRecord>().await.unwrap().is_empty());
        assert_eq!(
            other_db.list_all::<DailyRecord>().await.unwrap(),
            payload.tables.daily.unwrap()
        );
        assert_eq!(
            Some(other_store.get_or_init().unwrap()),
            payload.configuration
        );
    }

    #[tokio::test]
    async fn merge_keeps_days_the_backup_does_not_mention() {
        let (dir, db) = open();
        let store = settings(&dir);
        seed(&db).await;
        let mut payload = export_backup(&db, &store, &Clock::default()).await.unwrap();
        payload.tables.finance = None;

        db.upsert_daily(
            day("2024-06-08"),
            DailyPatch {
                meals_count: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let summary = import_backup(&db, &store, payload, ImportMode::Merge)
            .await
            .unwrap();
        assert!(!summary.tables_imported.contains(&"finance_logs".to_string()));
        assert_eq!(db.list_all::<DailyRecord>().await.unwrap().len(), 2);
        assert_eq!(db.list_all::<FinanceRecord>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_rows_reject_the_whole_import() {
        let (dir, db) = open();
        let store = settings(&dir);
        seed(&db).await;
        let before = db.list_all::<DailyRecord>().await.unwrap();
        let mut payload = export_backup(&db, &store, &Clock::default()).await.unwrap();

        let mut daily = before.clone();
        daily[0].sleep_hours = -3.0;
        payload.tables.daily = Some(daily);
        payload.tables.finance = Some(Vec::new());
        let result = import_backup(&db, &store, payload.clone(), ImportMode::Replace).await;
        assert!(result.is_err());
        assert_eq!(db.list_all::<DailyRecord>().await.unwrap(), before);
        assert_eq!(db.list_all::<FinanceRecord>().await.unwrap().len(), 1);

        let mut daily = before.clone();
        daily[0].heaviness = Some(9);
        payload.tables.daily = Some(daily);
        assert!(import_backup(&db, &store, payload, ImportMode::Merge)
            .await
            .is_err());
        assert_eq!(db.list_all::<DailyRecord>().await.unwrap(), before);
    }

    #[tokio::test]
    async fn career_rows_past_the_caps_are_rejected() {
        let (dir, db) = open();
        let store = settings(&dir);
        let mut payload = export_backup(&db, &store, &Clock::default()).await.unwrap();
        let mut record = CareerRecord::empty(day("2024-06-07"), Utc::now());
        record.outreach_sent = 12;
        payload.tables.career = Some(vec![record]);

        assert!(import_backup(&db, &store, payload, ImportMode::Merge)
            .await
            .is_err());
        assert!(db.list_all::<CareerRecord>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_payloads_are_rejected() {
        let (dir, db) = open();
        let store = settings(&dir);
        let mut payload = export_backup(&db, &store, &Clock::default()).await.unwrap();
        payload.app = "someone-else".into();
        assert!(import_backup(&db, &store, payload.clone(), ImportMode::Merge)
            .await
            .is_err());

        payload.app = BACKUP_APP.into();
        payload.version = 0;
        assert!(import_backup(&db, &store, payload, ImportMode::Merge)
            .await
            .is_err());
    }
}
