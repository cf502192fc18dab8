use super::AggregationProvider;
use super::endpoints::{
    ACCOUNTS_BALANCE_GET, LINK_TOKEN_CREATE, PUBLIC_TOKEN_EXCHANGE, PlaidEndpoints, normalize_base,
};
use super::types::{
    AccessTokenRequest, AccountBalances, ItemAccess, LinkToken, LinkTokenCreateRequest,
    PublicTokenExchangeRequest,
};
use crate::config::Config;
use crate::error::BuddyError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;
use url::Url;

/// reqwest-backed Plaid client. Cheap to clone; built once at startup.
#[derive(Clone)]
pub struct PlaidClient {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
    secret: String,
}

impl PlaidClient {
    pub fn new(cfg: &Config) -> Result<Self, BuddyError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("money-buddy/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let http = builder.build()?;
        Ok(Self::with_http(
            http,
            cfg.plaid_base_url()?,
            cfg.plaid_client_id.clone(),
            cfg.plaid_secret.clone(),
        ))
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: Url,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            client_id: client_id.into(),
            secret: secret.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl AggregationProvider for PlaidClient {
    async fn create_link_token(
        &self,
        request: LinkTokenCreateRequest,
    ) -> Result<LinkToken, BuddyError> {
        let token: LinkToken = PlaidEndpoints::post(
            &self.http,
            &self.base_url,
            LINK_TOKEN_CREATE,
            &self.client_id,
            &self.secret,
            &request,
        )
        .await?;
        info!(request_id = %token.request_id, "Link token created");
        Ok(token)
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<ItemAccess, BuddyError> {
        let access: ItemAccess = PlaidEndpoints::post(
            &self.http,
            &self.base_url,
            PUBLIC_TOKEN_EXCHANGE,
            &self.client_id,
            &self.secret,
            &PublicTokenExchangeRequest { public_token },
        )
        .await?;
        info!(item_id = %access.item_id, "Public token exchanged");
        Ok(access)
    }

    async fn get_account_balances(
        &self,
        access_token: &str,
    ) -> Result<AccountBalances, BuddyError> {
        let balances: AccountBalances = PlaidEndpoints::post(
            &self.http,
            &self.base_url,
            ACCOUNTS_BALANCE_GET,
            &self.client_id,
            &self.secret,
            &AccessTokenRequest { access_token },
        )
        .await?;
        info!(count = balances.accounts.len(), "Fetched account balances");
        Ok(balances)
    }
}
