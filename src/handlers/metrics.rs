use axum::response::IntoResponse;
use prometheus::{Encoder, TextEncoder};

use crate::error::AppError;

pub async fn metrics_handler() -> Result<impl IntoResponse, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(anyhow::Error::from)?;
    let body = String::from_utf8(buffer).map_err(anyhow::Error::from)?;
    Ok(body)
}
