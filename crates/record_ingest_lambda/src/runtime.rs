//! Process-level wiring shared by every invocation: environment
//! configuration, the tracing subscriber, and the reused DynamoDB client.

use tokio::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use record_ingest_core::contract;
pub use record_ingest_core::item;

pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
pub const DEFAULT_LOG_FILTER: &str = "info";

static DYNAMODB_CLIENT: OnceCell<aws_sdk_dynamodb::Client> = OnceCell::const_new();

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerConfig {
    pub table_name: Option<String>,
}

impl HandlerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table_name = lookup(TABLE_NAME_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self { table_name }
    }
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .without_time(),
        )
        .init();
}

/// Loads the SDK configuration on first use and hands out the same client
/// for the lifetime of the process.
pub async fn shared_dynamodb_client() -> &'static aws_sdk_dynamodb::Client {
    DYNAMODB_CLIENT
        .get_or_init(|| async {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            aws_sdk_dynamodb::Client::new(&config)
        })
        .await
}
