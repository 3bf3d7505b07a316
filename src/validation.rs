use crate::error::{Error, Result};

pub const MISSING_CHART_IMAGE: &str = "Please upload a chart image";
pub const MISSING_TOKEN_QUERY: &str = "Please enter a token address or symbol";
pub const MISSING_MINT: &str = "Please enter a token mint";
pub const MISSING_WALLET_ADDRESS: &str = "Please enter a wallet address";

/// Trims `value` and fails with `message` when nothing is left.
pub fn require_non_empty<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::ValidationError(message.to_string()));
    }
    Ok(trimmed)
}

pub fn validate_query(query: &str) -> Result<&str> {
    require_non_empty(query, MISSING_TOKEN_QUERY)
}

pub fn validate_mint(mint: &str) -> Result<&str> {
    require_non_empty(mint, MISSING_MINT)
}

pub fn validate_wallet_address(address: &str) -> Result<&str> {
    require_non_empty(address, MISSING_WALLET_ADDRESS)
}
