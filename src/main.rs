use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use affordability::config::AppConfig;
use affordability::error::AppError;
use affordability::linking::{
    parse_statement, BorrowerId, BorrowerRecord, InMemoryBorrowerRepository, LinkedAccountSummary,
    LinkingError, LoanLinkingService, StatementDirectoryProvider, StatementFormat,
    TracingAuditTrail,
};
use affordability::scoring::{utc_today, AffordabilityEngine, AffordabilityResult};
use affordability::telemetry;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "affordability",
    about = "Score bank statements and derive salary-backed loan limits",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a JSON or CSV statement file
    Score(ScoreArgs),
    /// Link a statement from a directory provider and derive the borrower's loan limit
    Link(LinkArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Statement file; `.csv` is read as CSV, anything else as JSON
    path: PathBuf,
    /// Reference date for the lookback window (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct LinkArgs {
    /// Directory holding `<account>.json` or `<account>.csv` statements
    #[arg(long)]
    statements: PathBuf,
    /// One-time link code (the account name in the statement directory)
    #[arg(long)]
    code: String,
    /// Borrower e-mail recorded as the audit actor
    #[arg(long, default_value = "borrower@example.com")]
    email: String,
    /// Reference date for the lookback window (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(?config.environment, "affordability scoring ready");

    let engine = AffordabilityEngine::new(config.scoring);

    match cli.command {
        Command::Score(args) => run_score(&engine, args),
        Command::Link(args) => run_link(engine, args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn run_score(engine: &AffordabilityEngine, args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        path,
        today,
        format,
    } = args;

    let statement_format =
        StatementFormat::from_extension(path.extension().and_then(|ext| ext.to_str()));
    let file = File::open(&path)?;
    let transactions = parse_statement(file, statement_format)?;

    let today = today.unwrap_or_else(utc_today);
    let result = engine.assess(&transactions, today);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => render_result(&result, transactions.len(), today),
    }

    Ok(())
}

fn run_link(engine: AffordabilityEngine, args: LinkArgs) -> Result<(), AppError> {
    let LinkArgs {
        statements,
        code,
        email,
        today,
        format,
    } = args;

    let borrower_id = BorrowerId("cli-borrower".to_string());
    let repository = Arc::new(InMemoryBorrowerRepository::new());
    repository
        .insert(BorrowerRecord {
            id: borrower_id.clone(),
            email,
            company_id: None,
            linked_account: None,
            max_loan_amount: None,
        })
        .map_err(LinkingError::from)?;

    let mut service = LoanLinkingService::new(
        Arc::new(StatementDirectoryProvider::new(statements)),
        repository,
        Arc::new(TracingAuditTrail),
        engine,
    );
    if let Some(today) = today {
        service = service.with_clock(Arc::new(move || today));
    }

    let summary = service.link_bank_account(&borrower_id, &code)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => render_summary(&summary),
    }

    Ok(())
}

fn render_result(result: &AffordabilityResult, transaction_count: usize, today: NaiveDate) {
    println!("Affordability assessment (as of {today})");
    println!("Transactions read: {transaction_count}");
    println!("Salary transactions: {}", result.salary_transactions_count);
    println!("Average salary: {}", result.average_salary);
    println!(
        "Payday pattern: {}",
        if result.payday_detected {
            "detected"
        } else {
            "not detected"
        }
    );
    println!("Expense ratio: {:.2}", result.expense_ratio);
    println!("Maximum loan amount: {}", result.max_loan_amount);
    println!("\n{}", result.summary());
}

fn render_summary(summary: &LinkedAccountSummary) {
    println!("Linked account {}", summary.account_id);
    println!("Average salary: {}", summary.average_salary);
    println!(
        "Payday pattern: {}",
        if summary.payday_detected {
            "detected"
        } else {
            "not detected"
        }
    );
    println!("Expense ratio: {:.2}", summary.expense_ratio);
    println!("Maximum loan amount: {}", summary.max_loan_amount);
}
