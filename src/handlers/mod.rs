//! HTTP handlers for cars and engines.

pub mod car;
pub mod engine;

use crate::error::AppError;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("invalid id: {}", raw)))
}

/// Run a service call under the per-request deadline. On expiry the call is dropped,
/// which cancels the in-flight query and rolls back any open transaction.
async fn within<T, F>(limit: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "service call exceeded deadline");
            Err(AppError::Timeout)
        }
    }
}
