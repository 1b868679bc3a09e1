use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    adapters::http::{
        app_state::AppState,
        client_meta::{forwarded_ip, peer_addr, real_ip},
    },
    app_error::AppError,
};

pub async fn rate_limit_middleware(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let peer = peer_addr(&parts);

    // Only trust forwarded headers if explicitly configured (when behind a reverse proxy)
    let ip = if app_state.config.trust_proxy {
        forwarded_ip(&parts.headers)
            .or_else(|| real_ip(&parts.headers))
            .or(peer)
    } else {
        peer
    };
    let key = ip.map_or_else(|| "unknown".to_string(), |ip| ip.to_string());

    tracing::debug!(
        trust_proxy = app_state.config.trust_proxy,
        connect_ip = ?peer,
        using_ip = %key,
        "Rate limiting request"
    );

    app_state.rate_limiter.check(&key).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
