//! Remote aggregation provider (Plaid).

mod client;
mod endpoints;
pub mod types;

use crate::error::BuddyError;
use async_trait::async_trait;

pub use client::PlaidClient;
pub use types::{AccountBalances, Balances, ItemAccess, LinkToken, LinkTokenCreateRequest, PlaidAccount};

/// Operations the server needs from the bank-data aggregation service.
#[async_trait]
pub trait AggregationProvider: Send + Sync {
    /// Create a short-lived token the front-end uses to open the linking UI.
    async fn create_link_token(&self, request: LinkTokenCreateRequest)
    -> Result<LinkToken, BuddyError>;

    /// Exchange a public token for a durable access token and item id.
    async fn exchange_public_token(&self, public_token: &str) -> Result<ItemAccess, BuddyError>;

    /// Fetch real-time balances for every account behind `access_token`.
    async fn get_account_balances(&self, access_token: &str)
    -> Result<AccountBalances, BuddyError>;
}
