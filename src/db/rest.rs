use crate::db::LinkStore;
use crate::db::models::{AccountRecord, CredentialRecord};
use crate::error::BuddyError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const CREDENTIALS_TABLE: &str = "credentials";
const ACCOUNTS_TABLE: &str = "accounts";

/// PostgREST (Supabase) backed store. Upserts are `POST`s that merge on the
/// table's conflict column.
#[derive(Clone)]
pub struct RestStore {
    http: reqwest::Client,
    base_url: Url,
}

impl RestStore {
    pub fn new(base_url: &str, service_key: &str, proxy: Option<&Url>) -> Result<Self, BuddyError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(service_key)
            .map_err(|e| BuddyError::Config(format!("invalid service key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|e| BuddyError::Config(format!("invalid service key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .default_headers(headers);
        if let Some(proxy_url) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        Ok(Self::with_http(builder.build()?, Url::parse(base_url)?))
    }

    /// Use a preconfigured client; it must already carry the auth headers.
    pub fn with_http(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    async fn upsert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        conflict_key: &str,
        rows: &T,
    ) -> Result<(), BuddyError> {
        let mut url = self.base_url.join("rest/v1/")?.join(table)?;
        url.query_pairs_mut().append_pair("on_conflict", conflict_key);

        let resp = self
            .http
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let bytes = resp.bytes().await?;
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(BuddyError::Store { status, body });
        }
        debug!(table, %status, "REST upsert succeeded");
        Ok(())
    }
}

#[async_trait]
impl LinkStore for RestStore {
    async fn upsert_credential(&self, record: &CredentialRecord) -> Result<(), BuddyError> {
        self.upsert(CREDENTIALS_TABLE, "user_id", record).await
    }

    async fn upsert_accounts(&self, records: &[AccountRecord]) -> Result<(), BuddyError> {
        self.upsert(ACCOUNTS_TABLE, "account_id", records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{header, headers, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credential() -> CredentialRecord {
        CredentialRecord {
            user_id: "user-1".to_string(),
            access_token: "access-1".to_string(),
            item_id: "item-1".to_string(),
            institution_id: None,
            institution_name: None,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn credential_upsert_merges_on_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/credentials"))
            .and(query_param("on_conflict", "user_id"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .and(headers(
                "prefer",
                vec!["resolution=merge-duplicates", "return=minimal"],
            ))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let store = RestStore::new(&server.uri(), "service-key", None).unwrap();
        store.upsert_credential(&credential()).await.expect("upsert");
    }

    #[tokio::test]
    async fn accounts_are_sent_as_one_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/accounts"))
            .and(query_param("on_conflict", "account_id"))
            .and(headers(
                "prefer",
                vec!["resolution=merge-duplicates", "return=minimal"],
            ))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let now = Utc::now();
        let record = AccountRecord {
            user_id: "user-1".to_string(),
            account_id: "acc-1".to_string(),
            item_id: "item-1".to_string(),
            name: "Checking".to_string(),
            official_name: None,
            account_type: "depository".to_string(),
            subtype: Some("checking".to_string()),
            balance_available: Some(1.0),
            balance_current: Some(2.0),
            balance_limit: None,
            currency_code: Some("USD".to_string()),
            mask: None,
            created_at: now,
            updated_at: now,
        };
        let store = RestStore::new(&server.uri(), "service-key", None).unwrap();
        store
            .upsert_accounts(&[record.clone(), AccountRecord { account_id: "acc-2".into(), ..record }])
            .await
            .expect("upsert");

        let received = server.received_requests().await.expect("recording enabled");
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        let rows = body.as_array().expect("array body");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["type"], "depository");
    }

    #[tokio::test]
    async fn rejection_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/credentials"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let store = RestStore::new(&server.uri(), "wrong", None).unwrap();
        match store.upsert_credential(&credential()).await.unwrap_err() {
            BuddyError::Store { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body["message"], "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
