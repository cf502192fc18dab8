use crate::db::AccountRecord;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Any present JSON value reads as a string id; `null` and absent read as `None`.
fn lenient_id<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Body of `POST /api/create_link_token`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkTokenRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<String>,
}

/// Body of `POST /api/exchange_and_create_accounts`.
///
/// `metadata` is whatever Plaid Link handed the front-end; it is not validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub public_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl ExchangeRequest {
    /// `metadata.institution`, verbatim.
    pub fn institution(&self) -> Option<&Value> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("institution"))
            .filter(|v| !v.is_null())
    }

    pub fn institution_id(&self) -> Option<String> {
        self.institution_field("institution_id")
    }

    pub fn institution_name(&self) -> Option<String> {
        self.institution_field("name")
    }

    fn institution_field(&self, key: &str) -> Option<String> {
        self.institution()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub balance_available: Option<f64>,
    pub balance_current: Option<f64>,
}

impl From<&AccountRecord> for AccountSummary {
    fn from(r: &AccountRecord) -> Self {
        Self {
            account_id: r.account_id.clone(),
            name: r.name.clone(),
            account_type: r.account_type.clone(),
            subtype: r.subtype.clone(),
            balance_available: r.balance_available,
            balance_current: r.balance_current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub success: bool,
    pub message: String,
    pub accounts_created: usize,
    pub item_id: String,
    pub institution: Value,
    pub accounts: Vec<AccountSummary>,
}
