#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use money_buddy::BuddyError;
use money_buddy::config::PlaidEnvironment;
use money_buddy::db::{AccountRecord, CredentialRecord, LinkStore};
use money_buddy::plaid::{
    AccountBalances, AggregationProvider, Balances, ItemAccess, LinkToken, LinkTokenCreateRequest,
    PlaidAccount,
};
use money_buddy::router::{BuddyState, buddy_router};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub fn plaid_account(account_id: &str, current: f64) -> PlaidAccount {
    PlaidAccount {
        account_id: account_id.to_string(),
        name: format!("Account {account_id}"),
        official_name: None,
        account_type: "depository".to_string(),
        subtype: Some("checking".to_string()),
        mask: Some("0000".to_string()),
        balances: Balances {
            available: Some(current - 10.0),
            current: Some(current),
            limit: None,
            iso_currency_code: Some("USD".to_string()),
            unofficial_currency_code: None,
        },
    }
}

pub fn invalid_token_payload() -> Value {
    json!({
        "error_type": "INVALID_INPUT",
        "error_code": "INVALID_PUBLIC_TOKEN",
        "error_message": "provided public token is in an invalid format",
        "display_message": null,
        "request_id": "req-err",
    })
}

fn provider_error(body: Value) -> BuddyError {
    BuddyError::Provider {
        status: StatusCode::BAD_REQUEST,
        body,
    }
}

#[derive(Default)]
pub struct FakeProvider {
    pub accounts: Vec<PlaidAccount>,
    pub link_error: Option<Value>,
    pub exchange_error: Option<Value>,
    pub balances_error: Option<Value>,
    pub link_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub link_users: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_accounts(accounts: Vec<PlaidAccount>) -> Self {
        Self {
            accounts,
            ..Default::default()
        }
    }

    pub fn remote_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
            + self.exchange_calls.load(Ordering::SeqCst)
            + self.balance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AggregationProvider for FakeProvider {
    async fn create_link_token(
        &self,
        request: LinkTokenCreateRequest,
    ) -> Result<LinkToken, BuddyError> {
        let n = self.link_calls.fetch_add(1, Ordering::SeqCst);
        self.link_users
            .lock()
            .unwrap()
            .push(request.user.client_user_id.clone());
        if let Some(body) = &self.link_error {
            return Err(provider_error(body.clone()));
        }
        Ok(LinkToken {
            link_token: format!("link-sandbox-{n}"),
            expiration: "2026-10-18T16:00:00Z".to_string(),
            request_id: format!("req-link-{n}"),
        })
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<ItemAccess, BuddyError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(body) = &self.exchange_error {
            return Err(provider_error(body.clone()));
        }
        Ok(ItemAccess {
            access_token: format!("access-for-{public_token}"),
            item_id: "item-1".to_string(),
            request_id: None,
        })
    }

    async fn get_account_balances(
        &self,
        _access_token: &str,
    ) -> Result<AccountBalances, BuddyError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(body) = &self.balances_error {
            return Err(provider_error(body.clone()));
        }
        Ok(AccountBalances {
            accounts: self.accounts.clone(),
            request_id: None,
        })
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub fail_credential: bool,
    pub fail_accounts: bool,
    pub credential_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
    pub credentials: Mutex<Vec<CredentialRecord>>,
    pub accounts: Mutex<Vec<AccountRecord>>,
}

impl FakeStore {
    pub fn writes(&self) -> usize {
        self.credential_calls.load(Ordering::SeqCst) + self.account_calls.load(Ordering::SeqCst)
    }
}

fn store_error() -> BuddyError {
    BuddyError::Store {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: json!({ "message": "store unavailable" }),
    }
}

#[async_trait]
impl LinkStore for FakeStore {
    async fn upsert_credential(&self, record: &CredentialRecord) -> Result<(), BuddyError> {
        self.credential_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_credential {
            return Err(store_error());
        }
        self.credentials.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn upsert_accounts(&self, records: &[AccountRecord]) -> Result<(), BuddyError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_accounts {
            return Err(store_error());
        }
        self.accounts.lock().unwrap().extend_from_slice(records);
        Ok(())
    }
}

pub fn app(provider: Arc<FakeProvider>, store: Arc<dyn LinkStore>) -> Router {
    let state = BuddyState::new(provider, store, "Money Buddy", PlaidEnvironment::Sandbox);
    buddy_router(state)
}

/// Send one request through the router and decode the JSON response body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
