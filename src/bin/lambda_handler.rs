//! AWS Lambda handler for quote requests
//!
//! Accepts a tagged quote request as JSON and returns the response envelope.
//! The catalog is loaded once per cold start; `PREMIUM_ENGINE_CONFIG` may point
//! at a JSON configuration file.

use std::path::Path;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use premium_engine::{Catalog, EngineConfig, QuoteEngine, QuoteRequest, QuoteResponse};

const CONFIG_ENV: &str = "PREMIUM_ENGINE_CONFIG";

fn load_config() -> Result<EngineConfig, Error> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => EngineConfig::from_json_path(Path::new(&path)).map_err(|e| Error::from(e.to_string())),
        Err(_) => Ok(EngineConfig::default()),
    }
}

async fn handler(engine: &QuoteEngine<Catalog>, event: LambdaEvent<QuoteRequest>) -> Result<QuoteResponse, Error> {
    let (request, context) = event.into_parts();
    log::info!(
        "Request {}: {} quote for product {}",
        context.request_id,
        request.product_line(),
        match &request {
            QuoteRequest::LifeInsurance(r) => r.product_id.as_str(),
            QuoteRequest::PropertyInsurance(r) => r.product_id.as_str(),
            QuoteRequest::Pension(r) => r.product_id.as_str(),
        }
    );

    let response = engine.respond(&request);
    match &response.data {
        Some(outcome) => log::info!(
            "Request {} finished with {:?}, notification {:?}",
            context.request_id,
            response.status,
            outcome.notification()
        ),
        None => log::info!("Request {} finished with {:?}", context.request_id, response.status),
    }
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = load_config()?;
    let engine = QuoteEngine::from_config(config).map_err(|e| Error::from(e.to_string()))?;
    log::info!("Catalog loaded from {}", engine.config().data_dir.display());

    let engine = &engine;
    run(service_fn(move |event: LambdaEvent<QuoteRequest>| async move {
        handler(engine, event).await
    }))
    .await
}
