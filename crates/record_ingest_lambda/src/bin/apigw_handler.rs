use lambda_runtime::{service_fn, Error, LambdaEvent};
use record_ingest_lambda::adapters::dynamodb::DynamoDbRecordStore;
use record_ingest_lambda::adapters::ids::UuidV4Ids;
use record_ingest_lambda::handlers::insert::{handle_insert_event, ApiGatewayResponse};
use record_ingest_lambda::runtime::{init_tracing, shared_dynamodb_client, HandlerConfig};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let (payload, context) = event.into_parts();
    let store = DynamoDbRecordStore::new(shared_dynamodb_client().await.clone());
    let config = HandlerConfig::from_env();

    let span = tracing::info_span!("apigw_request", request_id = %context.request_id);
    let _entered = span.enter();

    Ok(handle_insert_event(
        payload,
        config.table_name.as_deref(),
        &store,
        &UuidV4Ids,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
