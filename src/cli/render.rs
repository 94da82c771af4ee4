//! Text layouts for records, transaction lists and category reports.

use colored::Colorize;
use plannercell_core::{share_of, MonthlyRecord};
use plannercell_domain::{Transaction, TransactionKind};

use crate::FinanceApp;

pub fn totals_lines(app: &FinanceApp, record: &MonthlyRecord) -> Vec<String> {
    let balance = app.format_amount(record.balance());
    let balance = if record.balance().is_sign_negative() {
        balance.bright_red().to_string()
    } else {
        balance.bright_green().to_string()
    };
    vec![
        format!("Income:   {}", app.format_amount(record.total_income())),
        format!("Expenses: {}", app.format_amount(record.total_expense())),
        format!("Balance:  {balance}"),
    ]
}

pub fn transaction_line(app: &FinanceApp, txn: &Transaction) -> String {
    let amount = app.format_amount(txn.amount());
    let amount = match txn.kind() {
        TransactionKind::Income => format!("+{amount}").green().to_string(),
        TransactionKind::Expense => format!("-{amount}").red().to_string(),
    };
    format!(
        "{}  {:<18} {:<28} {}",
        txn.date().format("%Y-%m-%d"),
        txn.category().label(),
        txn.description(),
        amount
    )
}

/// Category lines of one kind with their share of the kind total.
pub fn breakdown_lines(app: &FinanceApp, record: &MonthlyRecord, kind: TransactionKind) -> Vec<String> {
    let total = record.total(kind);
    record
        .by_category(kind)
        .iter()
        .map(|(category, amount)| {
            format!(
                "{:<18} {:>16} {:>9}",
                category.label(),
                app.format_amount(amount),
                format!("{:.2}%", share_of(amount, total))
            )
        })
        .collect()
}
