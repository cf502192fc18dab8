//! Wire types for the Plaid endpoints used by the server.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Transactions,
    Auth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountryCode {
    #[serde(rename = "US")]
    Us,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkTokenUser {
    pub client_user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkTokenCreateRequest {
    pub user: LinkTokenUser,
    pub client_name: String,
    pub products: Vec<Product>,
    pub country_codes: Vec<CountryCode>,
    pub language: String,
}

impl LinkTokenCreateRequest {
    /// Fixed product set {transactions, auth}, US only, English.
    pub fn for_user(client_user_id: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            user: LinkTokenUser {
                client_user_id: client_user_id.into(),
            },
            client_name: client_name.into(),
            products: vec![Product::Transactions, Product::Auth],
            country_codes: vec![CountryCode::Us],
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    pub expiration: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct PublicTokenExchangeRequest<'a> {
    pub public_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemAccess {
    pub access_token: String,
    pub item_id: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct AccessTokenRequest<'a> {
    pub access_token: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub available: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub limit: Option<f64>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
    #[serde(default)]
    pub unofficial_currency_code: Option<String>,
}

impl Balances {
    pub fn currency_code(&self) -> Option<String> {
        self.iso_currency_code
            .clone()
            .or_else(|| self.unofficial_currency_code.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaidAccount {
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub balances: Balances,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountBalances {
    pub accounts: Vec<PlaidAccount>,
    #[serde(default)]
    pub request_id: Option<String>,
}
