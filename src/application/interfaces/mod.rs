/// Accounting service interface
pub mod accounting;
