use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{Error, Result};

/// Restricts to `origin` when configured, otherwise allows any origin.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin).map_err(|e| {
                Error::Config(format!("Invalid value for CORS_ALLOWED_ORIGIN: {}", e))
            })?;
            Ok(layer.allow_origin(origin))
        }
        None => Ok(layer.allow_origin(Any)),
    }
}
