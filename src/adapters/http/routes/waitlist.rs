use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, client_meta::ClientInfo},
    app_error::{AppError, AppResult},
    domain::entities::{analytics::AnalyticsSnapshot, waitlist_user::WaitlistUser},
    use_cases::waitlist::SignupInput,
};

#[derive(Deserialize)]
struct SignupPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    age: Option<String>,
}

impl From<SignupPayload> for SignupInput {
    fn from(p: SignupPayload) -> Self {
        SignupInput {
            name: p.name,
            email: p.email,
            phone: p.phone,
            gender: p.gender,
            age: p.age,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupResponse {
    success: bool,
    message: &'static str,
    user_id: i32,
}

#[derive(Serialize)]
struct CountResponse {
    success: bool,
    count: i64,
}

#[derive(Serialize)]
struct DataResponse<T> {
    success: bool,
    data: T,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/count", get(count))
        .route("/signup", post(signup))
        .route("/signups", get(list_signups))
        .route("/stats", get(stats))
}

/// GET /api/count
async fn count(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let count = app_state.waitlist_use_cases.count().await?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

/// POST /api/signup
async fn signup(
    State(app_state): State<AppState>,
    ClientInfo(client): ClientInfo,
    WithRejection(Json(payload), _): WithRejection<Json<SignupPayload>, AppError>,
) -> AppResult<impl IntoResponse> {
    let user_id = app_state
        .waitlist_use_cases
        .signup(payload.into(), client)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: "Successfully joined the waitlist!",
            user_id,
        }),
    ))
}

/// GET /api/signups
/// Development-only listing, most recent first.
async fn list_signups(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data: Vec<WaitlistUser> = app_state.waitlist_use_cases.list_signups().await?;
    Ok(Json(DataResponse {
        success: true,
        data,
    }))
}

/// GET /api/stats
/// Development-only view of the analytics counter next to the live row count.
async fn stats(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data: AnalyticsSnapshot = app_state.waitlist_use_cases.analytics().await?;
    Ok(Json(DataResponse {
        success: true,
        data,
    }))
}
