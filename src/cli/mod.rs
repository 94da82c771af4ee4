//! `plannercell_cli`: command-line front end over [`FinanceApp`].

pub mod output;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use plannercell_config::{default_base_dir, ConfigManager};
use plannercell_core::{ProfileProvider, RolloverOutcome, TransactionDraft, TransactionFilter};
use plannercell_domain::{transaction::date_format, Category, MonthKey, TransactionKind};
use tracing::warn;

use crate::{clock::clock_from_env, notifier::ConsoleNotifier, AppError, FinanceApp};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PLANNERCELL_BUILD_HASH"),
    ", ",
    env!("PLANNERCELL_BUILD_TARGET"),
    ", built ",
    env!("PLANNERCELL_BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "plannercell")]
#[command(about = "Month-by-month household finance ledger")]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Base directory for config, data and exports (default: $PLANNERCELL_HOME or the platform data dir)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Active month for this run, YYYY-MM (default: the current month; future months are refused)
    #[arg(long, global = true)]
    pub active: Option<MonthKey>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record an income or an expense
    Add {
        #[arg(value_enum)]
        kind: KindArg,
        /// Amount such as 1200.50, 1200,50 or 1.200,50
        amount: String,
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        description: String,
        /// Transaction date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Totals and transactions of a month (default: the active month)
    Show { month: Option<MonthKey> },
    /// Every month with recorded activity, newest first
    History,
    /// Category breakdown with shares (paid plans)
    Report { month: Option<MonthKey> },
    /// Find transactions in a month by text or category
    Search {
        term: Option<String>,
        #[arg(long)]
        month: Option<MonthKey>,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        #[arg(short, long, requires = "kind")]
        category: Option<String>,
    },
    /// Write a month report as JSON (paid plans)
    Export {
        month: Option<MonthKey>,
        /// Target directory (default: the configured export directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Detect a change of calendar month and announce the month that closed
    CheckRollover,
    /// Keep checking for a month change at the configured interval
    Watch {
        /// Stop after this many checks
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// List the available categories
    Categories {
        #[arg(value_enum)]
        kind: Option<KindArg>,
    },
    /// Delete every recorded month
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show the subscription plan
    Profile,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    #[value(alias = "receita")]
    Income,
    #[value(alias = "despesa")]
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    let base = cli.home.clone().unwrap_or_else(default_base_dir);
    let config = ConfigManager::with_base_dir(base.clone())?.load()?;
    crate::init_with_directive(config.log_level.as_deref());
    output::set_preferences(output::OutputPreferences {
        plain: !config.ui_color_enabled,
    });

    let (mut app, report) = FinanceApp::with_config(base, config, clock_from_env()?)?;
    for warning in &report.warnings {
        output::warning(warning);
    }
    let notifier = ConsoleNotifier::new(
        app.config().currency.clone(),
        app.config().locale.clone(),
    );

    // Every start is a rollover check; the explicit commands report their own outcome.
    if !matches!(cli.command, Command::CheckRollover | Command::Watch { .. }) {
        if let Err(err) = app.check_rollover(&notifier) {
            warn!(error = %err, "startup rollover check failed");
        }
    }

    if let Some(month) = cli.active {
        let today = app.today();
        if !app.session_mut().set_active_month(month, today) {
            return Err(AppError::InvalidInput(format!(
                "{month} is after the current month and cannot be made active"
            )));
        }
    }

    match cli.command {
        Command::Add {
            kind,
            amount,
            category,
            description,
            date,
        } => add(&mut app, kind, amount, category, description, date),
        Command::Show { month } => {
            show(&app, month);
            Ok(())
        }
        Command::History => {
            history(&app);
            Ok(())
        }
        Command::Report { month } => report_month(&mut app, month),
        Command::Search {
            term,
            month,
            kind,
            category,
        } => search(&app, term, month, kind, category),
        Command::Export { month, out } => {
            let month = month.unwrap_or_else(|| app.session().active_month());
            let path = app.export(month, out)?;
            output::success(format!("Exported {}", path.display()));
            Ok(())
        }
        Command::CheckRollover => {
            let outcome = app.check_rollover(&notifier)?;
            describe_rollover(&app, &outcome);
            Ok(())
        }
        Command::Watch { ticks } => {
            let outcomes = app.watch(ticks, &notifier)?;
            for outcome in &outcomes {
                describe_rollover(&app, outcome);
            }
            if outcomes.is_empty() {
                output::info(format!(
                    "No rollover: still {}",
                    app.month_label(app.session().active_month())
                ));
            }
            Ok(())
        }
        Command::Categories { kind } => {
            categories(kind);
            Ok(())
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(AppError::InvalidInput(
                    "reset deletes every recorded month; pass --yes to confirm".into(),
                ));
            }
            app.session_mut().reset_history()?;
            output::success("History cleared");
            Ok(())
        }
        Command::Profile => {
            profile(&app);
            Ok(())
        }
    }
}

fn add(
    app: &mut FinanceApp,
    kind: KindArg,
    amount: String,
    category: String,
    description: String,
    date: Option<String>,
) -> Result<(), AppError> {
    let date = match date {
        Some(raw) => date_format::parse(&raw)
            .map_err(|err| AppError::InvalidInput(err.to_string()))?,
        None => app.today(),
    };
    let transaction = TransactionDraft::new(kind.into(), date)
        .category(category)
        .amount(amount)
        .description(description)
        .validate()?;
    let label = format!(
        "{} {} ({})",
        transaction.category().label(),
        app.format_amount(transaction.amount()),
        transaction.description()
    );

    let outcome = app.session_mut().add_transaction(transaction)?;
    output::success(format!(
        "Recorded {label} in {}",
        app.month_label(outcome.month_key)
    ));
    if outcome.outside_active_month {
        output::warning(format!(
            "Dated {date}: filed under {}, not the active month {}",
            app.month_label(outcome.month_key),
            app.month_label(app.session().active_month())
        ));
    }
    Ok(())
}

fn show(app: &FinanceApp, month: Option<MonthKey>) {
    let month = month.unwrap_or_else(|| app.session().active_month());
    let record = app.session().store().get_month(month);
    output::section(app.month_label(month));
    for line in render::totals_lines(app, &record) {
        output::info(line);
    }
    if !record.has_transactions() {
        output::info("No transactions recorded");
        return;
    }
    output::info("");
    for txn in record.transactions() {
        output::info(render::transaction_line(app, txn));
    }
}

fn history(app: &FinanceApp) {
    output::section("History");
    for month in app.session().available_months() {
        let record = app.session().store().get_month(month);
        output::info(format!(
            "{month}  {:<16} {:>16} {:>16} {:>16}",
            app.month_label(month),
            app.format_amount(record.total_income()),
            app.format_amount(record.total_expense()),
            app.format_amount(record.balance())
        ));
    }
}

fn report_month(app: &mut FinanceApp, month: Option<MonthKey>) -> Result<(), AppError> {
    app.require_entitlement("report")?;
    let month = month.unwrap_or_else(|| app.session().active_month());
    app.session_mut().select_report_month(month);
    let record = app.session().report();
    output::section(format!("Report {}", app.month_label(month)));
    for line in render::totals_lines(app, &record) {
        output::info(line);
    }
    for (title, kind) in [
        ("Income by category", TransactionKind::Income),
        ("Expenses by category", TransactionKind::Expense),
    ] {
        output::section(title);
        let lines = render::breakdown_lines(app, &record, kind);
        if lines.is_empty() {
            output::info("Nothing recorded");
        }
        for line in lines {
            output::info(line);
        }
    }
    Ok(())
}

fn search(
    app: &FinanceApp,
    term: Option<String>,
    month: Option<MonthKey>,
    kind: Option<KindArg>,
    category: Option<String>,
) -> Result<(), AppError> {
    let month = month.unwrap_or_else(|| app.session().active_month());
    let category = match (kind, category) {
        (Some(kind), Some(label)) => Some(
            Category::parse(kind.into(), &label)
                .map_err(|err| AppError::InvalidInput(err.to_string()))?,
        ),
        _ => None,
    };
    let filter = TransactionFilter { term, category };
    let found: Vec<_> = app
        .session()
        .search(month, &filter)
        .into_iter()
        .filter(|txn| kind.map_or(true, |kind| txn.kind() == TransactionKind::from(kind)))
        .collect();

    output::section(format!("Search {}", app.month_label(month)));
    if found.is_empty() {
        output::info("No matching transactions");
    }
    for txn in &found {
        output::info(render::transaction_line(app, txn));
    }
    Ok(())
}

fn describe_rollover(app: &FinanceApp, outcome: &RolloverOutcome) {
    match outcome {
        RolloverOutcome::Unchanged { month } => {
            output::info(format!("No rollover: still {}", app.month_label(*month)));
        }
        RolloverOutcome::RolledOver {
            month,
            summary,
            notified,
            marker_saved,
            ..
        } => {
            output::success(format!("Now in {}", app.month_label(*month)));
            match summary {
                None => output::info(format!(
                    "{} had no transactions to summarize",
                    app.month_label(month.previous())
                )),
                Some(summary) if !notified => output::warning(format!(
                    "Could not deliver the closing notice for {}",
                    summary.month_label
                )),
                Some(_) => {}
            }
            if !marker_saved {
                output::warning("Month marker could not be saved; the notice may repeat next run");
            }
        }
    }
}

fn categories(kind: Option<KindArg>) {
    let kinds = match kind {
        Some(kind) => vec![TransactionKind::from(kind)],
        None => vec![TransactionKind::Income, TransactionKind::Expense],
    };
    for kind in kinds {
        output::section(kind);
        for category in kind.categories() {
            output::info(category.label());
        }
    }
}

fn profile(app: &FinanceApp) {
    let now = app.today();
    match app.profile().profile() {
        None => output::info("Plan: free"),
        Some(profile) => {
            let plan = profile.plan.as_str();
            match profile.expiration {
                Some(expires) => output::info(format!(
                    "Plan: {plan} (expires {})",
                    expires.format("%Y-%m-%d")
                )),
                None => output::info(format!("Plan: {plan}")),
            }
        }
    }
    if app.require_entitlement("report").is_ok() {
        output::success("Paid features are active");
    } else {
        output::info(format!("Paid features are locked as of {now}"));
    }
}
