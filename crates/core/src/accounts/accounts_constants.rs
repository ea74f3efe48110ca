/// Default account type for new accounts.
pub const DEFAULT_ACCOUNT_TYPE: &str = "INVESTMENT";

/// Account type constants. Only investment-style accounts are in scope; the
/// manual-holdings path for alternative assets (property, collectibles, ...)
/// is not implemented here.
pub mod account_types {
    pub const INVESTMENT: &str = "INVESTMENT";
    pub const CASH: &str = "CASH";
    pub const RETIREMENT: &str = "RETIREMENT";
    pub const CRYPTOCURRENCY: &str = "CRYPTOCURRENCY";
}

pub fn is_valid_account_type(account_type: &str) -> bool {
    matches!(
        account_type,
        account_types::INVESTMENT
            | account_types::CASH
            | account_types::RETIREMENT
            | account_types::CRYPTOCURRENCY
    )
}
