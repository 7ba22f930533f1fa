//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/accounts/{account_id}/transactions',
//! use [format_endpoint].

/// The route to link and fetch the user's bank.
pub const BANK_API: &str = "/api/bank";
/// The route to list the user's accounts.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route to sync the account list from the remote API.
pub const SYNC_ACCOUNTS_API: &str = "/api/accounts/sync";
/// The route to list an account's stored transactions.
pub const ACCOUNT_TRANSACTIONS_API: &str = "/api/accounts/{account_id}/transactions";
/// The route to sync an account's transactions from the remote API.
pub const SYNC_ACCOUNT_TRANSACTIONS_API: &str = "/api/accounts/{account_id}/transactions/sync";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/accounts/{account_id}/transactions',
/// '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
