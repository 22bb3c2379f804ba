use crate::error::AppError;
use crate::model::context::BusinessContext;
use crate::model::identity::Identity;
use crate::model::requests::QueryParams;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Interface for identity resolution and account scoped resources
#[async_trait]
pub trait AccountingService: Send + Sync {
    /// Fetches the authenticated user and caches it on the client
    async fn load_current_user(&self) -> Result<Arc<Identity>, AppError>;

    /// Selects the business subsequent resource calls are scoped to
    ///
    /// Loads the current user first if none is cached.
    async fn set_active_business(&self, business_uuid: &str)
    -> Result<Arc<BusinessContext>, AppError>;

    /// Currency codes enabled on the active account
    async fn get_currencies(&self) -> Result<Vec<String>, AppError>;

    /// Invoice details report of the active account
    async fn get_invoice_details_report(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Expense details report of the active account
    async fn get_expense_report(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Profit and loss report of the active account
    async fn get_profit_loss_report(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Client autocomplete search on the active account
    async fn get_autocomplete_clients(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Clients of the active account
    async fn get_clients(&self, params: QueryParams<'_>) -> Result<Value, AppError>;
}

/// Blocking counterpart of [`AccountingService`]
///
/// Same operations and error contract, implemented by the blocking client.
pub trait BlockingAccountingService: Send + Sync {
    /// Fetches the authenticated user and caches it on the client
    fn load_current_user(&self) -> Result<Arc<Identity>, AppError>;

    /// Selects the business subsequent resource calls are scoped to
    fn set_active_business(&self, business_uuid: &str) -> Result<Arc<BusinessContext>, AppError>;

    /// Currency codes enabled on the active account
    fn get_currencies(&self) -> Result<Vec<String>, AppError>;

    /// Invoice details report of the active account
    fn get_invoice_details_report(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Expense details report of the active account
    fn get_expense_report(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Profit and loss report of the active account
    fn get_profit_loss_report(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Client autocomplete search on the active account
    fn get_autocomplete_clients(&self, params: QueryParams<'_>) -> Result<Value, AppError>;

    /// Clients of the active account
    fn get_clients(&self, params: QueryParams<'_>) -> Result<Value, AppError>;
}
