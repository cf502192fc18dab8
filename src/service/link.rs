use crate::db::{AccountRecord, CredentialRecord, LinkStore};
use crate::error::BuddyError;
use crate::plaid::{AggregationProvider, LinkToken, LinkTokenCreateRequest};
use crate::types::link::{AccountSummary, ExchangeRequest, ExchangeResponse};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

const REQUIRED_EXCHANGE_FIELDS: &str = "public_token and user_id";

/// Orchestrates the Plaid link flow against an aggregation provider and a store.
#[derive(Clone)]
pub struct LinkService {
    provider: Arc<dyn AggregationProvider>,
    store: Arc<dyn LinkStore>,
    client_name: String,
}

impl LinkService {
    pub fn new(
        provider: Arc<dyn AggregationProvider>,
        store: Arc<dyn LinkStore>,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            client_name: client_name.into(),
        }
    }

    /// Request a link token for `user_id`, or for a freshly generated id when absent.
    pub async fn create_link_token(&self, user_id: Option<String>) -> Result<LinkToken, BuddyError> {
        let user_id = user_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(synthesize_user_id);
        let request = LinkTokenCreateRequest::for_user(user_id.as_str(), self.client_name.as_str());

        self.provider
            .create_link_token(request)
            .await
            .inspect_err(|e| {
                error!(user_id = %user_id, error = %e, detail = %e.detail(), "Error creating link token");
            })
    }

    /// Exchange the public token, fetch balances and persist credential + accounts.
    ///
    /// The steps run strictly in order with no rollback. A failed credential
    /// write is logged and skipped; a failed accounts write fails the call.
    pub async fn exchange_and_persist(
        &self,
        request: ExchangeRequest,
    ) -> Result<ExchangeResponse, BuddyError> {
        let (Some(public_token), Some(user_id)) = (
            request.public_token.as_deref().filter(|s| !s.is_empty()),
            request.user_id.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(BuddyError::MissingFields(REQUIRED_EXCHANGE_FIELDS));
        };

        let access = self
            .provider
            .exchange_public_token(public_token)
            .await
            .inspect_err(|e| {
                error!(user_id, error = %e, detail = %e.detail(), "Error exchanging public token");
            })?;
        info!(user_id, item_id = %access.item_id, "Public token exchanged");

        let balances = self
            .provider
            .get_account_balances(&access.access_token)
            .await
            .inspect_err(|e| {
                error!(user_id, item_id = %access.item_id, error = %e, detail = %e.detail(), "Error fetching account balances");
            })?;

        let now = Utc::now();
        let credential = CredentialRecord {
            user_id: user_id.to_string(),
            access_token: access.access_token.clone(),
            item_id: access.item_id.clone(),
            institution_id: request.institution_id(),
            institution_name: request.institution_name(),
            updated_at: now,
        };
        if let Err(e) = self.store.upsert_credential(&credential).await {
            error!(user_id, item_id = %access.item_id, error = %e, detail = %e.detail(), "Error storing credential; continuing with accounts");
        }

        let records: Vec<AccountRecord> = balances
            .accounts
            .into_iter()
            .map(|account| AccountRecord::from_plaid(account, user_id, &access.item_id, now))
            .collect();
        self.store.upsert_accounts(&records).await.inspect_err(|e| {
            error!(user_id, item_id = %access.item_id, error = %e, detail = %e.detail(), "Error storing accounts");
        })?;
        info!(user_id, item_id = %access.item_id, count = records.len(), "Accounts stored");

        Ok(ExchangeResponse {
            success: true,
            message: "Accounts created successfully".to_string(),
            accounts_created: records.len(),
            item_id: access.item_id,
            institution: request.institution().cloned().unwrap_or(Value::Null),
            accounts: records.iter().map(AccountSummary::from).collect(),
        })
    }
}

fn synthesize_user_id() -> String {
    format!("user-{}", Uuid::new_v4())
}
