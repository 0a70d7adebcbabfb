//! The `lifeline` command line.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::assessment::loader::{assess_day, assess_on};
use crate::backup::{export_backup, import_backup, BackupPayload, ImportMode};
use crate::db::{
    models::{CareerPatch, DailyPatch, FinancePatch, RelationPatch},
    Database,
};
use crate::log_info;
use crate::settings::{ConfigPatch, SettingsStore};
use crate::time::{days_to_payday, next_due_date, DayKey};

const ENABLE_LOGS: bool = true;

#[derive(Parser)]
#[command(name = "lifeline", version, about = "Daily self-tracking log and status assessment")]
pub struct Cli {
    /// Directory holding the database and settings.
    #[arg(long, global = true, env = "LIFELINE_DATA_DIR", default_value = ".lifeline")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the assessment for a day as JSON.
    Assess {
        /// Day to assess (YYYY-MM-DD); defaults to today in the configured zone.
        #[arg(long)]
        date: Option<DayKey>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print everything logged for a day as JSON.
    Show {
        /// Defaults to today in the configured zone.
        date: Option<DayKey>,
    },

    /// Record values for a day. Only the given fields change.
    Log {
        #[command(subcommand)]
        record: LogCommand,
    },

    /// Show or update the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Write the whole store to a JSON file.
    Export { file: PathBuf },

    /// Load a JSON backup.
    Import {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = ImportMode::Replace)]
        mode: ImportMode,
    },

    /// Next debt due date and days to payday.
    Due,
}

#[derive(Subcommand)]
enum LogCommand {
    Daily(DailyArgs),
    Finance(FinanceArgs),
    Relation(RelationArgs),
    Career(CareerArgs),
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    /// Merge a partial JSON document, e.g. '{"payday":{"dayOfMonth":25}}'.
    Patch { json: String },
}

#[derive(Args)]
struct DailyArgs {
    #[arg(long)]
    date: Option<DayKey>,
    #[arg(long)]
    sleep_hours: Option<f64>,
    #[arg(long)]
    meals: Option<u32>,
    #[arg(long)]
    breath: Option<u32>,
    #[arg(long)]
    drop: Option<u32>,
    /// 1 (light) to 5 (heavy)
    #[arg(long)]
    heaviness: Option<u8>,
    #[arg(long)]
    morning_practice: Option<bool>,
    #[arg(long)]
    ritual: Option<bool>,
    #[arg(long)]
    freeze_mode: Option<bool>,
    /// JSON object of checklist items, e.g. '{"water":true}'.
    #[arg(long)]
    checklist: Option<String>,
}

#[derive(Args)]
struct FinanceArgs {
    #[arg(long)]
    date: Option<DayKey>,
    #[arg(long)]
    income: Option<u64>,
    #[arg(long)]
    food: Option<u64>,
    #[arg(long)]
    fuel: Option<u64>,
    #[arg(long)]
    topup: Option<u64>,
    #[arg(long)]
    vice: Option<u64>,
    #[arg(long)]
    other: Option<u64>,
    #[arg(long)]
    cash: Option<u64>,
    #[arg(long)]
    freeze_applied: Option<bool>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args)]
struct RelationArgs {
    #[arg(long)]
    date: Option<DayKey>,
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    partner_mood: Option<String>,
    #[arg(long)]
    parent_contacted: Option<bool>,
    #[arg(long)]
    ritual_minutes: Option<u32>,
}

#[derive(Args)]
struct CareerArgs {
    #[arg(long)]
    date: Option<DayKey>,
    #[arg(long)]
    outreach: Option<u32>,
    #[arg(long)]
    practice_minutes: Option<u32>,
}

impl DailyArgs {
    fn into_patch(self) -> Result<DailyPatch> {
        let checklist = self
            .checklist
            .map(|raw| serde_json::from_str::<BTreeMap<String, bool>>(&raw))
            .transpose()
            .context("--checklist must be a JSON object of booleans")?;
        Ok(DailyPatch {
            sleep_hours: self.sleep_hours,
            meals_count: self.meals,
            breath_sessions: self.breath,
            drop_sessions: self.drop,
            heaviness: self.heaviness,
            morning_practice_done: self.morning_practice,
            ritual_done: self.ritual,
            freeze_mode: self.freeze_mode,
            checklist,
        })
    }
}

impl From<FinanceArgs> for FinancePatch {
    fn from(args: FinanceArgs) -> Self {
        FinancePatch {
            income: args.income,
            expense_food: args.food,
            expense_fuel: args.fuel,
            topup_wallet: args.topup,
            vice_spend: args.vice,
            other_expense: args.other,
            cash_on_hand: args.cash,
            freeze_applied: args.freeze_applied,
            note: args.note,
        }
    }
}

impl From<RelationArgs> for RelationPatch {
    fn from(args: RelationArgs) -> Self {
        RelationPatch {
            note: args.note,
            partner_mood: args.partner_mood,
            parent_contacted: args.parent_contacted,
            ritual_minutes: args.ritual_minutes,
        }
    }
}

impl From<CareerArgs> for CareerPatch {
    fn from(args: CareerArgs) -> Self {
        CareerPatch {
            outreach_sent: args.outreach,
            practice_minutes: args.practice_minutes,
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

impl Cli {
    pub async fn dispatch(self) -> Result<()> {
        let db = Database::new(self.data_dir.join("lifeline.db"))?;
        let settings = SettingsStore::new(self.data_dir.join("settings.json"))?;
        let clock = settings.get_or_init()?.clock()?;
        let today = |date: Option<DayKey>| date.unwrap_or_else(|| clock.today());

        match self.command {
            Command::Assess { date, pretty } => {
                let assessment = match date {
                    Some(day) => assess_on(&db, &settings, day).await?,
                    None => assess_day(&db, &settings, &clock, Utc::now()).await?,
                };
                print_json(&assessment, pretty)
            }
            Command::Show { date } => print_json(&db.get_day(today(date)).await?, true),
            Command::Log { record } => match record {
                LogCommand::Daily(args) => {
                    let day = today(args.date);
                    let record = db.upsert_daily(day, args.into_patch()?).await?;
                    print_json(&record, true)
                }
                LogCommand::Finance(args) => {
                    let day = today(args.date);
                    let record = db.upsert_finance(day, args.into()).await?;
                    print_json(&record, true)
                }
                LogCommand::Relation(args) => {
                    let day = today(args.date);
                    let record = db.upsert_relation(day, args.into()).await?;
                    print_json(&record, true)
                }
                LogCommand::Career(args) => {
                    let day = today(args.date);
                    let record = db.upsert_career(day, args.into()).await?;
                    print_json(&record, true)
                }
            },
            Command::Config { action } => match action {
                ConfigAction::Show => print_json(&settings.get_or_init()?, true),
                ConfigAction::Patch { json } => {
                    let patch: ConfigPatch =
                        serde_json::from_str(&json).context("invalid configuration patch")?;
                    print_json(&settings.patch(patch)?, true)
                }
            },
            Command::Export { file } => {
                let payload = export_backup(&db, &settings, &clock).await?;
                payload.write_to(&file)?;
                log_info!("Exported backup to {}", file.display());
                Ok(())
            }
            Command::Import { file, mode } => {
                let payload = BackupPayload::read_from(&file)?;
                let summary = import_backup(&db, &settings, payload, mode).await?;
                print_json(&summary, true)
            }
            Command::Due => {
                let configuration = settings.get_or_init()?;
                let day = clock.today();
                match next_due_date(day, &configuration.debt.due_days) {
                    Some(due) => println!("Next debt due: {} ({} days)", due.date_key, due.days_left),
                    None => println!("No debt due days configured"),
                }
                println!(
                    "Days to payday: {}",
                    days_to_payday(day, configuration.payday.day_of_month)
                );
                Ok(())
            }
        }
    }
}
