//! Command-line front end over a transaction snapshot file.

pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::services::filter_service::sort_newest_first;
use crate::core::services::{
    FilterService, PropertyScope, ReportRequest, ReportService, ServiceError, SummaryService,
    TimelineService, TransactionQuery, TypeFilter, UnitScope,
};
use crate::core::time::{Clock, FixedClock, SystemClock};
use crate::errors::LedgerError;
use crate::ledger::{occurs_on, DateFilter, Transaction};
use crate::utils::{build_info, persistence};

use output::MoneyFormat;

#[derive(Debug, Parser)]
#[command(
    name = "rentease_ledger",
    version,
    about = "Occurrence and aggregation queries over RentEase transactions"
)]
pub struct Cli {
    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List matching transactions, newest first
    List {
        #[command(flatten)]
        snapshot: SnapshotArg,
        #[command(flatten)]
        filters: FilterArgs,
        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<usize>,
    },
    /// Income, expense, and net totals for the selection
    Summary {
        #[command(flatten)]
        snapshot: SnapshotArg,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Income and expenses bucketed for charting
    Timeline {
        #[command(flatten)]
        snapshot: SnapshotArg,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Itemized report with lifetime totals, oldest first
    Report {
        #[command(flatten)]
        snapshot: SnapshotArg,
        /// Restrict to one property
        #[arg(long)]
        property: Option<Uuid>,
        /// this-month, this-year, all-time, YYYY-MM, YYYY or YYYY-MM..YYYY-MM
        #[arg(long)]
        period: Option<DateFilter>,
    },
    /// Report data-quality problems in the snapshot
    Check {
        #[command(flatten)]
        snapshot: SnapshotArg,
    },
    /// List the transactions that occur on a date
    Occurs {
        /// Date to test (YYYY-MM-DD)
        date: NaiveDate,
        #[command(flatten)]
        snapshot: SnapshotArg,
    },
    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Show build information
    Version,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the current configuration
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
    /// Print the configuration file location
    Path,
}

#[derive(Debug, Args)]
struct SnapshotArg {
    /// Transaction snapshot (JSON); defaults to the last one used
    #[arg(long, short = 'f', value_name = "FILE", env = "RENTEASE_SNAPSHOT")]
    file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// all, income or expense
    #[arg(long = "type", value_name = "TYPE", default_value = "all")]
    type_filter: TypeFilter,
    /// Category code such as RENT; needs --type income or expense
    #[arg(long)]
    category: Option<String>,
    /// Restrict to one property
    #[arg(long)]
    property: Option<Uuid>,
    /// all, property-level, all-units or a unit id; needs --property
    #[arg(long, default_value = "all")]
    unit: UnitScope,
    /// Case-insensitive text search
    #[arg(long)]
    search: Option<String>,
    /// this-month, this-year, all-time, YYYY-MM, YYYY or YYYY-MM..YYYY-MM
    #[arg(long)]
    period: Option<DateFilter>,
}

impl FilterArgs {
    fn query(&self, config: &Config) -> Result<TransactionQuery, LedgerError> {
        Ok(TransactionQuery {
            type_filter: self.type_filter,
            category: self.category.clone(),
            search: self.search.clone(),
            property: property_scope(self.property),
            unit: self.unit,
            date_filter: resolve_period(self.period, config)?,
        })
    }
}

fn property_scope(property: Option<Uuid>) -> PropertyScope {
    property.map_or(PropertyScope::AllProperties, PropertyScope::Property)
}

fn resolve_period(period: Option<DateFilter>, config: &Config) -> Result<DateFilter, LedgerError> {
    match period {
        Some(period) => Ok(period),
        None => config.period(),
    }
}

impl From<ServiceError> for LedgerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(inner) => inner,
            ServiceError::Invalid(message) => LedgerError::InvalidInput(message),
        }
    }
}

/// Everything a command needs: configuration, the pinned date, and output mode.
struct Session {
    manager: ConfigManager,
    config: Config,
    today: NaiveDate,
    json: bool,
}

impl Session {
    /// Loads the snapshot named on the command line, or the last one used.
    fn load(&mut self, snapshot: &SnapshotArg) -> Result<Vec<Transaction>, LedgerError> {
        let path = snapshot
            .file
            .clone()
            .or_else(|| self.config.last_snapshot.clone())
            .ok_or_else(|| {
                LedgerError::InvalidInput("no snapshot given; pass --file <FILE>".into())
            })?;
        let transactions = persistence::load_transactions_from_file(&path)?;
        if self.config.last_snapshot.as_ref() != Some(&path) {
            self.config.last_snapshot = Some(path);
            if let Err(err) = self.manager.save(&self.config) {
                warn!(error = %err, "could not remember the snapshot location");
            }
        }
        Ok(transactions)
    }

    fn money(&self) -> MoneyFormat {
        MoneyFormat::new(&self.config.locale, &self.config.currency)
    }
}

pub fn run_cli() -> Result<(), LedgerError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), LedgerError> {
    let manager = ConfigManager::new();
    let config = manager.load()?;
    if cli.no_color || !config.ui_color_enabled {
        colored::control::set_override(false);
    }
    let clock: Box<dyn Clock> = match cli.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    let mut session = Session {
        manager,
        config,
        today: clock.today(),
        json: cli.json,
    };
    debug!(today = %session.today, command = ?cli.command, "running command");

    match cli.command {
        Command::List {
            snapshot,
            filters,
            page,
            per_page,
        } => {
            let transactions = session.load(&snapshot)?;
            let query = filters.query(&session.config)?;
            let filtered = FilterService::apply(&transactions, &query, session.today);
            let per_page = per_page.unwrap_or(session.config.items_per_page);
            let page = FilterService::paginate(&filtered.transactions, page, per_page)?;
            if session.json {
                return output::json(&page);
            }
            output::section(format!("Transactions ({})", query.date_filter));
            print!("{}", output::format_transaction_table(page.items, &session.money()));
            output::info(format!(
                "Page {} of {} ({} transactions)",
                page.page, page.total_pages, page.total_items
            ));
        }
        Command::Summary { snapshot, filters } => {
            let transactions = session.load(&snapshot)?;
            let query = filters.query(&session.config)?;
            let aggregate = SummaryService::aggregate(&transactions, &query, session.today);
            if session.json {
                return output::json(&aggregate.summary);
            }
            match aggregate.window {
                Some(window) => output::section(format!("Summary {window}")),
                None => output::section("Summary (all time)"),
            }
            print!("{}", output::format_summary(&aggregate.summary, &session.money()));
        }
        Command::Timeline { snapshot, filters } => {
            let transactions = session.load(&snapshot)?;
            let query = filters.query(&session.config)?;
            let timeline = TimelineService::build(&transactions, &query, session.today);
            if session.json {
                return output::json(&timeline);
            }
            output::section(format!("Timeline {}", timeline.window));
            print!("{}", output::format_timeline(&timeline, &session.money()));
        }
        Command::Report {
            snapshot,
            property,
            period,
        } => {
            let transactions = session.load(&snapshot)?;
            let request = ReportRequest {
                property: property_scope(property),
                date_filter: resolve_period(period, &session.config)?,
            };
            let report = ReportService::build(&transactions, &request, session.today);
            if session.json {
                return output::json(&report);
            }
            output::section("Financial report");
            print!("{}", output::format_report(&report, &session.money()));
        }
        Command::Check { snapshot } => {
            let transactions = session.load(&snapshot)?;
            let flagged: Vec<_> = transactions
                .iter()
                .map(|txn| (txn, txn.validate()))
                .filter(|(_, issues)| !issues.is_empty())
                .collect();
            if session.json {
                let report: Vec<_> = flagged
                    .iter()
                    .map(|(txn, issues)| {
                        serde_json::json!({
                            "id": txn.id,
                            "issues": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                return output::json(&report);
            }
            if flagged.is_empty() {
                output::success(format!("{} transactions look good", transactions.len()));
            } else {
                output::warning(format!(
                    "{} of {} transactions have problems",
                    flagged.len(),
                    transactions.len()
                ));
                for (txn, issues) in &flagged {
                    print!("{}", output::format_issues(txn, issues));
                }
            }
        }
        Command::Occurs { date, snapshot } => {
            let transactions = session.load(&snapshot)?;
            let mut matching: Vec<Transaction> = transactions
                .into_iter()
                .filter(|txn| occurs_on(txn, date, session.today))
                .collect();
            sort_newest_first(&mut matching);
            if session.json {
                return output::json(&matching);
            }
            output::section(format!("Occurring on {date}"));
            print!("{}", output::format_transaction_table(&matching, &session.money()));
        }
        Command::Config(command) => run_config(&mut session, command)?,
        Command::Version => {
            let build = build_info::current();
            if session.json {
                return output::json(&build);
            }
            output::info(build);
            output::info(format!("rustc: {}", build.rustc));
        }
    }
    Ok(())
}

fn run_config(session: &mut Session, command: ConfigCommand) -> Result<(), LedgerError> {
    match command {
        ConfigCommand::Show => {
            if session.json {
                return output::json(&session.config);
            }
            output::section("Configuration");
            print!("{}", serde_json::to_string_pretty(&session.config)?);
            println!();
        }
        ConfigCommand::Set { key, value } => {
            session.config.set(&key, &value)?;
            session.manager.save(&session.config)?;
            output::success(format!("{key} updated"));
        }
        ConfigCommand::Path => output::info(session.manager.path().display()),
    }
    Ok(())
}
