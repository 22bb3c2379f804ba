//! Resource endpoints scoped to the active account

use crate::model::identity::AccountId;

/// Accounting reports exposed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Report {
    /// Invoice details report
    InvoiceDetails,
    /// Expense details report
    ExpenseDetails,
    /// Profit and loss report
    ProfitLoss,
}

impl Report {
    /// Report name as it appears in the path
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Report::InvoiceDetails => "invoice_details",
            Report::ExpenseDetails => "expense_details",
            Report::ProfitLoss => "profitloss_entity",
        }
    }

    /// Path of the report for the given account
    #[must_use]
    pub fn path(self, account_id: &AccountId) -> String {
        format!(
            "/accounting/account/{account_id}/reports/accounting/{}",
            self.slug()
        )
    }
}

/// Path of the currencies system resource
#[must_use]
pub fn currencies_path(account_id: &AccountId) -> String {
    format!("/accounting/account/{account_id}/systems/currencies")
}

/// Key path to the currency codes inside the currencies response
pub const CURRENCY_CODES_PATH: [&str; 4] = ["response", "result", "currencies", "currency_codes"];

/// Path of the client list
#[must_use]
pub fn clients_path(account_id: &AccountId) -> String {
    format!("/accounting/account/{account_id}/users/clients")
}

/// Path of the client autocomplete search
#[must_use]
pub fn autocomplete_clients_path(account_id: &AccountId) -> String {
    format!("/search/account/{account_id}/autocomplete_clients_v2")
}

/// Optional query parameters passed through to resource endpoints
pub type QueryParams<'a> = &'a [(&'a str, &'a str)];
