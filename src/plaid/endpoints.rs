use crate::error::BuddyError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;
use url::Url;

pub(super) const LINK_TOKEN_CREATE: &str = "link/token/create";
pub(super) const PUBLIC_TOKEN_EXCHANGE: &str = "item/public_token/exchange";
pub(super) const ACCOUNTS_BALANCE_GET: &str = "accounts/balance/get";

/// Stateless Plaid endpoints.
pub(super) struct PlaidEndpoints;

impl PlaidEndpoints {
    /// POST a JSON body to `base/path` with client credentials in headers.
    ///
    /// Non-success responses become [`BuddyError::Provider`] carrying the body
    /// as returned by Plaid; a body that is not JSON is kept as a string.
    pub(super) async fn post<Req, Resp>(
        http_client: &reqwest::Client,
        base: &Url,
        path: &str,
        client_id: &str,
        secret: &str,
        body: &Req,
    ) -> Result<Resp, BuddyError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = base.join(path)?;
        let resp = http_client
            .post(url)
            .header("PLAID-CLIENT-ID", client_id)
            .header("PLAID-SECRET", secret)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(BuddyError::Provider { status, body });
        }
        debug!(path, %status, "Plaid request succeeded");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Ensure the base URL ends with `/` so `Url::join` appends instead of replacing.
pub(super) fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
