//! Month-close notice delivery for terminal hosts.

use colored::Colorize;
use plannercell_core::{format, MonthCloseNotifier, MonthCloseSummary, NotifyError};
use tracing::info;

/// Prints the closing summary to stdout and records it in the log.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    currency: String,
    locale: String,
}

impl ConsoleNotifier {
    pub fn new(currency: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            locale: locale.into(),
        }
    }

    /// Notice text, e.g. `Mês encerrado: março/2024 | Receitas R$ 3.000,00 | ...`.
    pub fn render(&self, summary: &MonthCloseSummary) -> String {
        let amount = |value| format::format_amount(value, &self.currency, &self.locale);
        if format::is_portuguese(&self.locale) {
            format!(
                "Mês encerrado: {} | Receitas {} | Despesas {} | Saldo {}",
                summary.month_label,
                amount(summary.total_income),
                amount(summary.total_expense),
                amount(summary.balance)
            )
        } else {
            format!(
                "Month closed: {} | Income {} | Expenses {} | Balance {}",
                summary.month_label,
                amount(summary.total_income),
                amount(summary.total_expense),
                amount(summary.balance)
            )
        }
    }
}

impl MonthCloseNotifier for ConsoleNotifier {
    fn notify(&self, summary: &MonthCloseSummary) -> Result<(), NotifyError> {
        let line = self.render(summary);
        info!(month = %summary.month, "month-close notice delivered");
        let styled = if summary.balance.is_sign_negative() {
            line.bright_red().bold()
        } else {
            line.bright_green().bold()
        };
        println!("{styled}");
        Ok(())
    }
}
