use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Database;
use crate::display::{format_amount, format_signed, truncate};
use crate::models::{format_timestamp, now_local, MonthLabel, Transaction};

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &[
    "--category",
    "--at",
    "--image",
    "--month",
    "--amount",
    "--description",
];

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "show" => cli_show(&args[2..], db),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "summary" | "s" => cli_summary(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "categories" => cli_categories(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Tally — local-only ledger of income and expenses");
    println!();
    println!("Usage: tally [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Summary of the current month");
    println!("  add <amount> <description>      Record a transaction (negative = expense)");
    println!("    --category <name>             Category label");
    println!("    --at <YYYY-MM-DD HH:MM>       When it happened (default: now)");
    println!("    --image <path>                Attach a receipt image (repeatable)");
    println!("  list [--month <\"Mar 2025\">]     List transactions, newest first");
    println!("  show <id>                       Show one transaction with its receipts");
    println!("  edit <id>                       Change a transaction");
    println!("    --amount, --description, --category, --at");
    println!("  delete <id>                     Delete a transaction and its receipts");
    println!("  summary [\"Mar 2025\"]            Income, expenses and profit/loss");
    println!("  export [path]                   Export transactions to CSV");
    println!("    --month <\"Mar 2025\">          Limit to one month (default: all)");
    println!("  categories                      List categories in use");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let (Some(amount), Some(description)) = (pos.first(), pos.get(1)) else {
        anyhow::bail!("Usage: tally add <amount> <description> [--category <name>] [--at <when>] [--image <path>]...");
    };

    let amount = parse_amount(amount)?;
    let description = description.trim();
    if description.is_empty() {
        anyhow::bail!("Description must not be empty");
    }
    let category = flag_value(args, "--category").unwrap_or("").trim();
    let occurred_at = match flag_value(args, "--at") {
        Some(s) => parse_when(s)?,
        None => now_local(),
    };

    let txn = Transaction::new(amount, description.into(), category.into(), occurred_at)
        .with_images(flag_values(args, "--image").into_iter().map(String::from));
    let id = db.create(&txn)?;
    println!(
        "Added #{id}: {} {} ({})",
        format_signed(txn.amount),
        txn.description,
        txn.month()
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let txns = match flag_value(args, "--month") {
        Some(label) => db.list_by_month(&require_month(label)?.to_string())?,
        None => db.list_all()?,
    };
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<16} {:<28} {:<16} {:>14} Img",
        "ID", "When", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(86));
    for txn in &txns {
        println!(
            "{:<5} {:<16} {:<28} {:<16} {:>14} {}",
            txn.id.unwrap_or(0),
            txn.occurred_at.format("%Y-%m-%d %H:%M"),
            truncate(&txn.description, 28),
            truncate(&txn.category, 16),
            format_signed(txn.amount),
            txn.image_paths.len(),
        );
    }
    Ok(())
}

fn cli_show(args: &[String], db: &mut Database) -> Result<()> {
    let id = require_id(args)?;
    let Some(txn) = db.get_by_id(id)? else {
        anyhow::bail!("No transaction with id {id}");
    };

    println!("Transaction #{id}");
    println!("{}", "─".repeat(40));
    println!("  When:        {}", format_timestamp(&txn.occurred_at));
    println!("  Amount:      {}", format_amount(txn.abs_amount()));
    let kind = if txn.is_expense() {
        "Expense"
    } else if txn.is_income() {
        "Income"
    } else {
        "Zero"
    };
    println!("  Kind:        {kind}");
    println!("  Description: {}", txn.description);
    println!("  Category:    {}", txn.category);
    if txn.image_paths.is_empty() {
        println!("  Receipts:    none");
    } else {
        println!("  Receipts:");
        for path in &txn.image_paths {
            println!("    {path}");
        }
    }
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    let id = require_id(args)?;
    let Some(mut txn) = db.get_by_id(id)? else {
        anyhow::bail!("No transaction with id {id}");
    };

    if let Some(amount) = flag_value(args, "--amount") {
        txn.amount = parse_amount(amount)?;
    }
    if let Some(description) = flag_value(args, "--description") {
        let description = description.trim();
        if description.is_empty() {
            anyhow::bail!("Description must not be empty");
        }
        txn.description = description.into();
    }
    if let Some(category) = flag_value(args, "--category") {
        txn.category = category.trim().into();
    }
    if let Some(when) = flag_value(args, "--at") {
        txn.occurred_at = parse_when(when)?;
    }

    if db.update_by_id(&txn)? == 0 {
        println!("Transaction #{id} no longer exists");
    } else {
        println!("Updated #{id}");
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = require_id(args)?;
    db.delete_by_id(id)?;
    println!("Deleted #{id}");
    Ok(())
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let month = match positionals(args).first() {
        Some(label) => require_month(label)?,
        None => MonthLabel::current(),
    };
    print_month_summary(db, month)
}

pub(crate) fn print_month_summary(db: &Database, month: MonthLabel) -> Result<()> {
    let label = month.to_string();
    let income = db.income_for_month(&label)?;
    let expenses = db.expenses_for_month(&label)?;
    let profit_loss = db.balance_for_month(&label)?;

    println!("Tally — {label}");
    println!("{}", "─".repeat(40));
    println!("  Income:       {}", format_amount(income));
    println!("  Expenses:     {}", format_amount(expenses));
    println!("  Profit/Loss:  {}", format_signed(profit_loss));
    let prev = month.prev();
    if prev != month {
        let prev_label = prev.to_string();
        println!(
            "  {:<14}{}",
            format!("{prev_label}:"),
            format_signed(db.balance_for_month(&prev_label)?)
        );
    }
    println!();
    println!("All time");
    println!("  Balance:      {}", format_signed(db.total_balance()?));
    println!("  Income:       {}", format_amount(db.total_income()?));
    println!("  Expenses:     {}", format_amount(db.total_expenses()?));
    println!("  Total Txns:   {}", db.transaction_count()?);
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let month = flag_value(args, "--month").map(require_month).transpose()?;
    let suffix = month
        .map(|m| format!("{:04}-{:02}", m.year(), m.month()))
        .unwrap_or_else(|| "all".into());

    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/tally-export-{suffix}.csv")
        });

    let label = month.map(|m| m.to_string());
    let count = db.export_to_csv(&output_path, label.as_deref())?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

fn cli_categories(db: &mut Database) -> Result<()> {
    let categories = db.categories_in_use()?;
    if categories.is_empty() {
        println!("No categories");
    }
    for name in &categories {
        println!("{name}");
    }
    Ok(())
}

// ── Argument helpers ──────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
        } else if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !(arg.starts_with("--") && arg.len() > 2) {
            out.push(arg.as_str());
        }
    }
    out
}

fn require_id(args: &[String]) -> Result<i64> {
    let raw = positionals(args)
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Missing transaction id"))?;
    raw.trim_start_matches('#')
        .parse()
        .with_context(|| format!("Invalid transaction id: {raw}"))
}

fn require_month(label: &str) -> Result<MonthLabel> {
    MonthLabel::parse(label)
        .ok_or_else(|| anyhow::anyhow!("Invalid month: {label} (expected e.g. \"Mar 2025\")"))
}

pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().replace(['$', ','], "");
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {s}"))
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM` or a bare `YYYY-MM-DD` (midnight).
pub(crate) fn parse_when(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("Invalid date/time: {s} (expected YYYY-MM-DD HH:MM)"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
