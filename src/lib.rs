pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod plaid;
pub mod router;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::BuddyError;
pub use plaid::PlaidClient;
pub use service::LinkService;
