//! CLI binary for operating the payment back office.

use core::time::Duration;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use payment_backoffice::backoffice::BackofficeBlocking;
use payment_backoffice::config::{self, Endpoints};
use payment_backoffice::error::BackofficeError;
use payment_backoffice::models::{
    BillingRecord, BillingStatus, Commission, CommissionId, CommissionType, Merchant,
    MerchantCode, MerchantStatus, NaiveDate, Page, Pagination, RecurringCode, RecurringStatus,
    RecurringTransaction, SortDirection, Transaction, TransactionCode, TransactionStatus,
};
use payment_backoffice::query::{DEFAULT_SORT_FIELD, TransactionFilters};
use payment_backoffice::views::{self, BillingSortField, TransactionSummary};

/// Placeholder for empty cells.
const EMPTY: &str = "\u{2014}";

/// Payment back office CLI: manage merchants, commissions, recurring
/// charges, and browse transactions.
#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about)]
struct Cli {
    /// Global request timeout in seconds (overrides BACKOFFICE_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Overview: counts per resource and the latest merchants.
    Dashboard,
    /// List merchants, optionally searched and filtered by status.
    Merchants {
        /// Case-insensitive search over name, code, and tax ID.
        #[arg(long)]
        search: Option<String>,
        /// Only merchants with this status (ACT or INA).
        #[arg(long, value_parser = parse_merchant_status)]
        status: Option<MerchantStatus>,
    },
    /// Register a new merchant.
    CreateMerchant(MerchantArgs),
    /// List commission rules.
    Commissions {
        /// Case-insensitive search over type and code.
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a commission rule.
    CreateCommission(CommissionArgs),
    /// Replace an existing commission rule.
    UpdateCommission {
        /// Commission identifier.
        id: String,
        /// New rule values.
        #[command(flatten)]
        rule: CommissionArgs,
    },
    /// Delete a commission rule.
    DeleteCommission {
        /// Commission identifier.
        id: String,
    },
    /// List recurring transactions.
    Recurring {
        /// Only schedules with this status (ACT, CAN or PEN).
        #[arg(long, value_parser = parse_recurring_status)]
        status: Option<RecurringStatus>,
    },
    /// Schedule a recurring transaction.
    CreateRecurring(RecurringArgs),
    /// Browse transactions with server-side filters and pagination.
    Transactions(TransactionArgs),
    /// List transactions by card, currency, country, or amount range.
    TransactionsBy {
        /// Lookup key.
        #[command(subcommand)]
        key: LookupKey,
    },
    /// Show one transaction by code or unique code.
    Transaction {
        /// Transaction code.
        #[arg(required_unless_present = "unique_code", conflicts_with = "unique_code")]
        id: Option<String>,
        /// Look up by unique code instead.
        #[arg(long)]
        unique_code: Option<String>,
    },
    /// Review billing records exported to a JSON file.
    Billing(BillingArgs),
}

/// Arguments for `create-merchant`.
#[derive(Debug, Args)]
struct MerchantArgs {
    /// Public trade name.
    #[arg(long)]
    trade_name: String,
    /// Registered legal name.
    #[arg(long)]
    legal_name: String,
    /// Tax identification number (RUC).
    #[arg(long)]
    tax_id: String,
    /// Settlement account (IBAN).
    #[arg(long)]
    iban: String,
    /// SWIFT code of the settlement bank.
    #[arg(long)]
    swift: Option<String>,
}

/// Arguments describing a commission rule.
#[derive(Debug, Args)]
struct CommissionArgs {
    /// Rule type (POR for percentage, FIJ for fixed).
    #[arg(long, value_parser = parse_commission_type)]
    kind: CommissionType,
    /// Percentage or flat fee.
    #[arg(long)]
    amount: f64,
    /// Number of transactions covered by the base amount.
    #[arg(long, default_value_t = 1)]
    transactions: u64,
}

/// Arguments for `create-recurring`.
#[derive(Debug, Args)]
struct RecurringArgs {
    /// Amount charged on every run.
    #[arg(long)]
    amount: f64,
    /// Card brand.
    #[arg(long)]
    brand: String,
    /// First day of the schedule (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,
    /// Last day of the schedule (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    end: NaiveDate,
    /// Day of month the charge runs on.
    #[arg(long)]
    payment_day: u8,
    /// SWIFT code of the paying bank.
    #[arg(long)]
    swift: String,
    /// Destination account (IBAN).
    #[arg(long)]
    iban: String,
    /// ISO currency code.
    #[arg(long)]
    currency: String,
    /// ISO country code.
    #[arg(long)]
    country: String,
    /// Card number.
    #[arg(long)]
    card: u64,
    /// Card expiry (MM/YY).
    #[arg(long)]
    expiry: String,
    /// Card verification value.
    #[arg(long)]
    cvv: String,
    /// Days between charges.
    #[arg(long, default_value_t = 30)]
    frequency: u32,
}

/// Arguments for the `transactions` subcommand.
#[derive(Debug, Args)]
struct TransactionArgs {
    /// Zero-based page index.
    #[arg(long)]
    page: Option<u32>,
    /// Page size.
    #[arg(long)]
    size: Option<u32>,
    /// Sort field.
    #[arg(long, value_name = "FIELD")]
    sort: Option<String>,
    /// Sort ascending instead of descending.
    #[arg(long)]
    asc: bool,
    /// Status code (ACT, INA, PEN or REC).
    #[arg(long, value_parser = parse_transaction_status)]
    status: Option<TransactionStatus>,
    /// Transaction type code.
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,
    /// Card brand.
    #[arg(long)]
    brand: Option<String>,
    /// Currency code.
    #[arg(long)]
    currency: Option<String>,
    /// Country code.
    #[arg(long)]
    country: Option<String>,
    /// Merchant code.
    #[arg(long)]
    merchant: Option<String>,
    /// Card number.
    #[arg(long)]
    card: Option<String>,
    /// Unique transaction code.
    #[arg(long)]
    unique_code: Option<String>,
    /// Minimum amount.
    #[arg(long)]
    min_amount: Option<f64>,
    /// Maximum amount.
    #[arg(long)]
    max_amount: Option<f64>,
    /// Start date (inclusive, YYYY-MM-DD). Requires --to.
    #[arg(long, requires = "to", value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD). Requires --from.
    #[arg(long, requires = "from", value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Print summary statistics under the table.
    #[arg(long)]
    summary: bool,
}

/// Keys for `transactions-by`.
#[derive(Debug, Subcommand)]
enum LookupKey {
    /// Transactions made with one card.
    Card {
        /// Card number.
        number: String,
    },
    /// Transactions settled in one currency.
    Currency {
        /// Currency code.
        code: String,
    },
    /// Transactions from one country.
    Country {
        /// Country code.
        code: String,
    },
    /// Transactions within an amount range.
    Amount {
        /// Minimum amount.
        min: f64,
        /// Maximum amount.
        max: f64,
    },
}

/// Arguments for the `billing` subcommand.
#[derive(Debug, Args)]
struct BillingArgs {
    /// JSON file holding billing records (array or paginated object).
    #[arg(long, value_name = "PATH")]
    file: PathBuf,
    /// Only records with this status (PAG or PEN).
    #[arg(long, value_parser = parse_billing_status)]
    status: Option<BillingStatus>,
    /// Search over billing code, merchant code, and value.
    #[arg(long, default_value = "")]
    search: String,
    /// Sort column (billed-on, paid-on, period-start or value).
    #[arg(long, default_value_t = BillingSortField::BilledOn)]
    sort: BillingSortField,
    /// Sort descending.
    #[arg(long)]
    desc: bool,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a merchant status code.
fn parse_merchant_status(s: &str) -> Result<MerchantStatus, String> {
    match s.to_uppercase().as_str() {
        "ACT" => Ok(MerchantStatus::Active),
        "INA" => Ok(MerchantStatus::Inactive),
        _ => Err(format!("unknown merchant status `{s}` (expected ACT or INA)")),
    }
}

/// Parses a commission type code.
fn parse_commission_type(s: &str) -> Result<CommissionType, String> {
    match s.to_uppercase().as_str() {
        "POR" => Ok(CommissionType::Percentage),
        "FIJ" => Ok(CommissionType::Fixed),
        _ => Err(format!("unknown commission type `{s}` (expected POR or FIJ)")),
    }
}

/// Parses a recurring schedule status code.
fn parse_recurring_status(s: &str) -> Result<RecurringStatus, String> {
    match s.to_uppercase().as_str() {
        "ACT" => Ok(RecurringStatus::Active),
        "CAN" => Ok(RecurringStatus::Cancelled),
        "PEN" => Ok(RecurringStatus::Pending),
        _ => Err(format!("unknown recurring status `{s}` (expected ACT, CAN or PEN)")),
    }
}

/// Parses a transaction status code.
fn parse_transaction_status(s: &str) -> Result<TransactionStatus, String> {
    match s.to_uppercase().as_str() {
        "ACT" => Ok(TransactionStatus::Completed),
        "INA" => Ok(TransactionStatus::Inactive),
        "PEN" => Ok(TransactionStatus::Pending),
        "REC" => Ok(TransactionStatus::Rejected),
        _ => Err(format!(
            "unknown transaction status `{s}` (expected ACT, INA, PEN or REC)"
        )),
    }
}

/// Parses a billing status code.
fn parse_billing_status(s: &str) -> Result<BillingStatus, String> {
    match s.to_uppercase().as_str() {
        "PAG" => Ok(BillingStatus::Paid),
        "PEN" => Ok(BillingStatus::Pending),
        _ => Err(format!("unknown billing status `{s}` (expected PAG or PEN)")),
    }
}

/// Builds the transaction filter patch from CLI arguments.
fn build_filters(args: &TransactionArgs) -> TransactionFilters {
    let (sort, direction) = if args.sort.is_some() || args.asc {
        let direction = if args.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        (
            Some(args.sort.clone().unwrap_or_else(|| DEFAULT_SORT_FIELD.to_owned())),
            Some(direction),
        )
    } else {
        (None, None)
    };
    TransactionFilters {
        page: args.page,
        size: args.size,
        sort,
        direction,
        unique_code: args.unique_code.clone(),
        card_number: args.card.clone(),
        kind: args.kind.clone(),
        currency: args.currency.clone(),
        brand: args.brand.clone(),
        status: args.status,
        country: args.country.clone(),
        merchant: args.merchant.clone(),
        amount_min: args.min_amount,
        amount_max: args.max_amount,
        date_from: args.from,
        date_to: args.to,
    }
}

/// Reads billing records from a JSON file.
fn load_billing(path: &Path) -> Result<Vec<BillingRecord>, String> {
    let body = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    Page::from_body(&body)
        .map(|page| page.content)
        .map_err(|err| format!("cannot parse {}: {err}", path.display()))
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Billing works on local files only.
    let command = match cli.command {
        Command::Billing(args) => return cmd_billing(&args),
        other => other,
    };

    let mut builder = BackofficeBlocking::builder().endpoints(Endpoints::from_env());
    if let Some(timeout) = cli
        .timeout
        .map(Duration::from_secs)
        .or_else(config::timeout_from_env)
    {
        builder = builder.timeout(timeout);
    }
    let backoffice = match builder.build() {
        Ok(backoffice) => backoffice,
        Err(err) => return report("failed to build client", &err),
    };

    dispatch(&backoffice, command)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(backoffice: &BackofficeBlocking, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Dashboard => cmd_dashboard(backoffice),
        Command::Merchants { search, status } => {
            cmd_merchants(backoffice, search.as_deref(), status)
        }
        Command::CreateMerchant(args) => cmd_create_merchant(backoffice, args),
        Command::Commissions { search } => cmd_commissions(backoffice, search.as_deref()),
        Command::CreateCommission(rule) => cmd_create_commission(backoffice, &rule),
        Command::UpdateCommission { id, rule } => cmd_update_commission(backoffice, &id, &rule),
        Command::DeleteCommission { id } => cmd_delete_commission(backoffice, &id),
        Command::Recurring { status } => cmd_recurring(backoffice, status),
        Command::CreateRecurring(args) => cmd_create_recurring(backoffice, args),
        Command::Transactions(args) => cmd_transactions(backoffice, &args),
        Command::TransactionsBy { key } => cmd_transactions_by(backoffice, key),
        Command::Transaction { id, unique_code } => {
            cmd_transaction(backoffice, id.as_deref(), unique_code.as_deref())
        }
        Command::Billing(args) => cmd_billing(&args),
    }
}

/// Prints an error with context and returns a failure exit code.
fn report(context: &str, err: &BackofficeError) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Number of merchants listed on the dashboard.
const DASHBOARD_MERCHANTS: usize = 5;

/// Executes the `dashboard` subcommand.
///
/// Every resource is loaded even if an earlier one fails; the counts come
/// from the container snapshots.
fn cmd_dashboard(backoffice: &BackofficeBlocking) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading overview...");
    let failures = [
        backoffice.fetch_merchants().err(),
        backoffice.fetch_commissions().err(),
        backoffice.fetch_recurring().err(),
    ];
    spinner.finish_and_clear();

    let mut failed = false;
    for err in failures.iter().flatten() {
        failed = true;
        writeln!(io::stderr().lock(), "{} {err}", "error:".red().bold())?;
    }

    let (merchants, commissions, recurring) = match (
        backoffice.merchants(),
        backoffice.commissions(),
        backoffice.recurring(),
    ) {
        (Ok(merchants), Ok(commissions), Ok(recurring)) => (merchants, commissions, recurring),
        (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
            return report("failed to read state", &err);
        }
    };

    let mut table = new_table(&["Resource", "Count"]);
    _ = table.add_row(vec![Cell::new("Merchants"), Cell::new(merchants.items.len())]);
    _ = table.add_row(vec![
        Cell::new("Recurring transactions"),
        Cell::new(recurring.items.len()),
    ]);
    _ = table.add_row(vec![Cell::new("Commissions"), Cell::new(commissions.items.len())]);
    writeln!(io::stdout().lock(), "{}\n{table}", "Overview".green().bold())?;

    let latest: Vec<&Merchant> = merchants.items.iter().take(DASHBOARD_MERCHANTS).collect();
    print_merchants_table(&latest)?;

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Executes the `merchants` subcommand.
fn cmd_merchants(
    backoffice: &BackofficeBlocking,
    search: Option<&str>,
    status: Option<MerchantStatus>,
) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading merchants...");
    let result = backoffice.fetch_merchants();
    spinner.finish_and_clear();

    match result {
        Ok(merchants) => {
            let shown: Vec<&Merchant> = views::search_merchants(&merchants, search.unwrap_or(""))
                .into_iter()
                .filter(|merchant| status.is_none_or(|wanted| merchant.status == wanted))
                .collect();
            print_merchants_table(&shown)?;
            writeln!(
                io::stdout().lock(),
                "{} {}  {} {}",
                "Active:".bold(),
                views::count_merchants(&merchants, MerchantStatus::Active),
                "Inactive:".bold(),
                views::count_merchants(&merchants, MerchantStatus::Inactive)
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load merchants", &err),
    }
}

/// Executes the `create-merchant` subcommand.
fn cmd_create_merchant(backoffice: &BackofficeBlocking, args: MerchantArgs) -> io::Result<ExitCode> {
    let mut merchant = Merchant::draft(args.trade_name, args.legal_name, args.tax_id, args.iban);
    merchant.bank_swift = args.swift;

    match backoffice.create_merchant(&merchant) {
        Ok(created) => {
            print_merchants_table(&[&created])?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to create merchant", &err),
    }
}

/// Executes the `commissions` subcommand.
fn cmd_commissions(backoffice: &BackofficeBlocking, search: Option<&str>) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading commissions...");
    let result = backoffice.fetch_commissions();
    spinner.finish_and_clear();

    match result {
        Ok(commissions) => {
            print_commissions_table(&views::search_commissions(
                &commissions,
                search.unwrap_or(""),
            ))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load commissions", &err),
    }
}

/// Executes the `create-commission` subcommand.
fn cmd_create_commission(
    backoffice: &BackofficeBlocking,
    rule: &CommissionArgs,
) -> io::Result<ExitCode> {
    let commission = Commission::draft(rule.kind, rule.amount, rule.transactions);
    match backoffice.create_commission(&commission) {
        Ok(created) => {
            print_commissions_table(&[&created])?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to create commission", &err),
    }
}

/// Executes the `update-commission` subcommand.
fn cmd_update_commission(
    backoffice: &BackofficeBlocking,
    id: &str,
    rule: &CommissionArgs,
) -> io::Result<ExitCode> {
    let id = CommissionId::new(id);
    let mut commission = Commission::draft(rule.kind, rule.amount, rule.transactions);
    commission.id = Some(id.clone());

    match backoffice.update_commission(&id, &commission) {
        Ok(updated) => {
            print_commissions_table(&[&updated])?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to update commission", &err),
    }
}

/// Executes the `delete-commission` subcommand.
fn cmd_delete_commission(backoffice: &BackofficeBlocking, id: &str) -> io::Result<ExitCode> {
    match backoffice.delete_commission(&CommissionId::new(id)) {
        Ok(()) => {
            writeln!(
                io::stdout().lock(),
                "{} {id}",
                "Deleted commission".green().bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to delete commission", &err),
    }
}

/// Executes the `recurring` subcommand.
fn cmd_recurring(
    backoffice: &BackofficeBlocking,
    status: Option<RecurringStatus>,
) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading recurring transactions...");
    let result = backoffice.fetch_recurring();
    spinner.finish_and_clear();

    match result {
        Ok(recurring) => {
            let shown = match status {
                Some(wanted) => views::filter_recurring(&recurring, wanted),
                None => recurring.iter().collect(),
            };
            print_recurring_table(&shown)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load recurring transactions", &err),
    }
}

/// Executes the `create-recurring` subcommand.
fn cmd_create_recurring(
    backoffice: &BackofficeBlocking,
    args: RecurringArgs,
) -> io::Result<ExitCode> {
    let recurring = RecurringTransaction {
        code: None,
        amount: args.amount,
        brand: args.brand,
        status: RecurringStatus::Active,
        start_date: args.start,
        end_date: args.end,
        payment_day: args.payment_day,
        bank_swift: args.swift,
        iban: args.iban,
        currency: args.currency,
        country: args.country,
        card_number: args.card,
        card_expiry: args.expiry,
        cvv: args.cvv,
        frequency_days: args.frequency,
    };

    match backoffice.create_recurring(&recurring) {
        Ok(created) => {
            print_recurring_table(&[&created])?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to create recurring transaction", &err),
    }
}

/// Executes the `transactions` subcommand.
fn cmd_transactions(backoffice: &BackofficeBlocking, args: &TransactionArgs) -> io::Result<ExitCode> {
    let patch = build_filters(args);
    let spinner = make_spinner("Loading transactions...");
    let result = backoffice.fetch_transactions(Some(&patch));
    spinner.finish_and_clear();

    match result {
        Ok(page) => {
            print_transactions_table(&page.content, &page.pagination)?;
            if args.summary {
                print_summary(&TransactionSummary::of(&page.content))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load transactions", &err),
    }
}

/// Executes the `transactions-by` subcommand.
fn cmd_transactions_by(backoffice: &BackofficeBlocking, key: LookupKey) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading transactions...");
    let result = match key {
        LookupKey::Card { number } => backoffice.fetch_transactions_by_card(&number),
        LookupKey::Currency { code } => backoffice.fetch_transactions_by_currency(&code),
        LookupKey::Country { code } => backoffice.fetch_transactions_by_country(&code),
        LookupKey::Amount { min, max } => backoffice.fetch_transactions_by_amount(min, max),
    };
    spinner.finish_and_clear();

    match result {
        Ok(page) => {
            print_transactions_table(&page.content, &page.pagination)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load transactions", &err),
    }
}

/// Executes the `transaction` subcommand.
fn cmd_transaction(
    backoffice: &BackofficeBlocking,
    id: Option<&str>,
    unique_code: Option<&str>,
) -> io::Result<ExitCode> {
    let result = match (id, unique_code) {
        (_, Some(unique)) => backoffice.fetch_transaction_by_unique_code(unique),
        (Some(code), None) => backoffice.fetch_transaction(&TransactionCode::new(code)),
        (None, None) => {
            writeln!(
                io::stderr().lock(),
                "{} transaction requires an id or --unique-code",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    match result {
        Ok(tx) => {
            print_transaction_detail(&tx)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load transaction", &err),
    }
}

/// Executes the `billing` subcommand.
fn cmd_billing(args: &BillingArgs) -> io::Result<ExitCode> {
    let records = match load_billing(&args.file) {
        Ok(records) => records,
        Err(message) => {
            writeln!(io::stderr().lock(), "{} {message}", "error:".red().bold())?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut shown = views::filter_billing(&records, args.status, &args.search);
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    views::sort_billing(&mut shown, args.sort, direction);
    print_billing_table(&shown)?;

    let totals = views::billing_totals(&records);
    writeln!(
        io::stdout().lock(),
        "{} {:.2}  {} {:.2}",
        "Paid:".bold(),
        totals.paid,
        "Pending:".bold(),
        totals.pending
    )?;
    Ok(ExitCode::SUCCESS)
}

// ── Output formatting ────────────────────────────────────────────────

/// Creates a table with the shared preset and a cyan header.
fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        header
            .iter()
            .map(|title| Cell::new(title).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Writes a titled table, or a dimmed note when there are no rows.
fn write_table(title: &str, rows: usize, table: &Table) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows == 0 {
        writeln!(out, "{}", format!("No {} found.", title.to_lowercase()).dimmed())?;
        return Ok(());
    }
    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format!("({rows})").dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints merchants in a table.
fn print_merchants_table(merchants: &[&Merchant]) -> io::Result<()> {
    let mut table = new_table(&["Code", "Trade name", "Legal name", "Tax ID", "Status", "IBAN"]);
    for merchant in merchants {
        let status_cell = match merchant.status {
            MerchantStatus::Active => Cell::new(merchant.status.label()).fg(Color::Green),
            MerchantStatus::Inactive => Cell::new(merchant.status.label()).fg(Color::Red),
            MerchantStatus::Unknown => Cell::new(merchant.status.label()).fg(Color::DarkGrey),
        };
        _ = table.add_row(vec![
            Cell::new(merchant.code.as_ref().map_or(EMPTY, MerchantCode::as_inner)),
            Cell::new(&merchant.trade_name),
            Cell::new(&merchant.legal_name),
            Cell::new(&merchant.tax_id),
            status_cell,
            Cell::new(&merchant.iban),
        ]);
    }
    write_table("Merchants", merchants.len(), &table)
}

/// Prints commissions in a table.
fn print_commissions_table(commissions: &[&Commission]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Code", "Type", "Base", "Transactions"]);
    for commission in commissions {
        _ = table.add_row(vec![
            Cell::new(commission.id.as_ref().map_or(EMPTY, CommissionId::as_inner)),
            Cell::new(commission.code.as_deref().unwrap_or(EMPTY)),
            Cell::new(commission.kind.label()),
            Cell::new(commission.formatted_base()),
            Cell::new(commission.base_transactions),
        ]);
    }
    write_table("Commissions", commissions.len(), &table)
}

/// Prints recurring transactions in a table.
fn print_recurring_table(recurring: &[&RecurringTransaction]) -> io::Result<()> {
    let mut table = new_table(&["Code", "Amount", "Brand", "Status", "Period", "Day", "Every"]);
    for item in recurring {
        _ = table.add_row(vec![
            Cell::new(item.code.as_ref().map_or(EMPTY, RecurringCode::as_inner)),
            Cell::new(format!("{:.2} {}", item.amount, item.currency)),
            Cell::new(&item.brand),
            Cell::new(item.status.label()),
            Cell::new(format!("{} .. {}", item.start_date, item.end_date)),
            Cell::new(item.payment_day),
            Cell::new(format!("{} d", item.frequency_days)),
        ]);
    }
    write_table("Recurring transactions", recurring.len(), &table)
}

/// Color of a transaction status cell.
const fn status_color(status: TransactionStatus) -> Color {
    match status {
        TransactionStatus::Completed => Color::Green,
        TransactionStatus::Inactive => Color::Red,
        TransactionStatus::Pending => Color::Yellow,
        TransactionStatus::Rejected | TransactionStatus::Unknown => Color::DarkGrey,
    }
}

/// Prints a page of transactions with its position.
fn print_transactions_table(txs: &[Transaction], pagination: &Pagination) -> io::Result<()> {
    let mut table = new_table(&["Code", "Date", "Amount", "Brand", "Status", "Merchant"]);
    for tx in txs {
        let status = tx.status.unwrap_or(TransactionStatus::Unknown);
        let amount = tx.amount.map_or_else(
            || EMPTY.to_owned(),
            |amount| format!("{amount:.2} {}", tx.currency.as_deref().unwrap_or("")),
        );
        _ = table.add_row(vec![
            Cell::new(tx.code.as_ref().map_or(EMPTY, TransactionCode::as_inner)),
            Cell::new(tx.timestamp.as_deref().unwrap_or(EMPTY)),
            Cell::new(amount),
            Cell::new(tx.brand.as_deref().unwrap_or(EMPTY)),
            Cell::new(status.label()).fg(status_color(status)),
            Cell::new(tx.merchant.as_deref().unwrap_or(EMPTY)),
        ]);
    }
    write_table("Transactions", txs.len(), &table)?;
    writeln!(
        io::stdout().lock(),
        "{}",
        format!(
            "page {} of {} ({} records, {} per page)",
            pagination.page_number.saturating_add(1),
            pagination.total_pages.max(1),
            pagination.total_elements,
            pagination.page_size
        )
        .dimmed()
    )?;
    Ok(())
}

/// Prints summary statistics for a page of transactions.
fn print_summary(summary: &TransactionSummary) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out)?;
    writeln!(out, "{}", "Summary".green().bold())?;
    writeln!(out, "  {} {}", "Count:".bold(), summary.count)?;
    writeln!(out, "  {} {:.2}", "Total:".bold(), summary.total_amount)?;
    writeln!(
        out,
        "  {} {} ({:.1}%)",
        "Completed:".bold(),
        summary.completed,
        summary.completion_rate_rounded()
    )?;
    for (status, count) in &summary.by_status {
        writeln!(out, "  {:<12} {count}", status.label())?;
    }
    let busiest = summary
        .by_hour
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .max_by_key(|&(_, &count)| count);
    if let Some((hour, count)) = busiest {
        writeln!(out, "  {} {hour:02}:00 ({count})", "Busiest hour:".bold())?;
    }
    Ok(())
}

/// Prints every field of one transaction.
fn print_transaction_detail(tx: &Transaction) -> io::Result<()> {
    let mut table = new_table(&["Field", "Value"]);
    let number = |value: Option<f64>| value.map_or_else(|| EMPTY.to_owned(), |v| format!("{v:.2}"));
    let text = |value: Option<&str>| value.unwrap_or(EMPTY).to_owned();
    let rows = [
        ("Code", text(tx.code.as_ref().map(TransactionCode::as_inner))),
        ("Unique code", text(tx.unique_code.as_deref())),
        ("Account", text(tx.account_number.as_deref())),
        ("Card", text(tx.card_number.as_deref())),
        ("Type", text(tx.kind.as_deref())),
        ("Amount", number(tx.amount)),
        ("Currency", text(tx.currency.as_deref())),
        ("Exchange rate", number(tx.exchange_rate)),
        ("Origin amount", number(tx.origin_amount)),
        ("Origin currency", text(tx.origin_currency.as_deref())),
        ("Brand", text(tx.brand.as_deref())),
        ("Status", text(tx.status.map(TransactionStatus::label))),
        ("Description", text(tx.description.as_deref())),
        ("Country", text(tx.country.as_deref())),
        ("Merchant", text(tx.merchant.as_deref())),
        ("Site", text(tx.site.as_deref())),
        ("Terminal", text(tx.terminal.as_deref())),
        ("Date", text(tx.timestamp.as_deref())),
        ("Updated", text(tx.updated_at.as_deref())),
    ];
    for (field, value) in rows {
        _ = table.add_row(vec![Cell::new(field).fg(Color::Cyan), Cell::new(value)]);
    }
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Transaction".green().bold())?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints billing records in a table.
fn print_billing_table(records: &[&BillingRecord]) -> io::Result<()> {
    let mut table = new_table(&["Code", "Merchant", "Period", "Txs", "Value", "Status", "Billed", "Paid"]);
    for record in records {
        let status_cell = match record.status {
            BillingStatus::Paid => Cell::new(record.status.label()).fg(Color::Green),
            BillingStatus::Pending => Cell::new(record.status.label()).fg(Color::Yellow),
            BillingStatus::Unknown => Cell::new(record.status.label()).fg(Color::DarkGrey),
        };
        _ = table.add_row(vec![
            Cell::new(&record.code),
            Cell::new(record.merchant.as_inner()),
            Cell::new(format!("{} .. {}", record.period_start, record.period_end)),
            Cell::new(record.processed_transactions),
            Cell::new(format!("{:.2}", record.value)),
            status_cell,
            Cell::new(record.billed_on),
            Cell::new(record.paid_on.map_or_else(|| EMPTY.to_owned(), |date| date.to_string())),
        ]);
    }
    write_table("Billing records", records.len(), &table)
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
