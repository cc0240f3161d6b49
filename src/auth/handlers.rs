use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        repo_types::{SessionIdentity, User},
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    let username = payload.username.trim();

    if username.is_empty() || payload.password.is_empty() {
        warn!("register with missing fields");
        return Err((StatusCode::BAD_REQUEST, "Fill in both fields".into()));
    }

    let user = services::register(&state.db, username, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(PublicUser {
            username: user.username,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let identity =
        services::authenticate(&state.db, payload.username.trim(), &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    issue_tokens(&keys, identity).map(Json)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| {
            warn!(error = %e, "refresh token rejected");
            (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            )
        })?;

    // The user row must still exist before a new pair is issued.
    let user = User::find_by_username(&state.db, &claims.sub)
        .await?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    issue_tokens(&keys, SessionIdentity::new(user.username)).map(Json)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = User::find_by_username(&state.db, &identity.username)
        .await?
        .ok_or_else(|| {
            error!(username = %identity.username, "user not found");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })?;

    Ok(Json(PublicUser {
        username: user.username,
    }))
}

fn issue_tokens(
    keys: &JwtKeys,
    identity: SessionIdentity,
) -> Result<AuthResponse, (StatusCode, String)> {
    let access_token = keys.sign_access(&identity).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let refresh_token = keys.sign_refresh(&identity).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            username: identity.username,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_app;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let app = build_app(AppState::fake().await);

        let (status, body) = call(
            &app,
            post_json("/api/v1/auth/register", json!({"username": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "alice");

        let (status, _) = call(
            &app,
            post_json("/api/v1/auth/register", json!({"username": "alice", "password": "pw2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(
            &app,
            post_json("/api/v1/auth/login", json!({"username": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Request::get("/api/v1/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let app = build_app(AppState::fake().await);
        call(
            &app,
            post_json("/api/v1/auth/register", json!({"username": "alice", "password": "pw1"})),
        )
        .await;

        let wrong_pw = call(
            &app,
            post_json("/api/v1/auth/login", json!({"username": "alice", "password": "pw2"})),
        )
        .await;
        let unknown = call(
            &app,
            post_json("/api/v1/auth/login", json!({"username": "mallory", "password": "pw1"})),
        )
        .await;
        assert_eq!(wrong_pw.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_pw, unknown);
    }

    #[tokio::test]
    async fn register_requires_both_fields() {
        let app = build_app(AppState::fake().await);
        let (status, _) = call(
            &app,
            post_json("/api/v1/auth/register", json!({"username": "   ", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(
            &app,
            post_json("/api/v1/auth/register", json!({"username": "alice", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_issues_new_pair_and_rejects_access_tokens() {
        let app = build_app(AppState::fake().await);
        call(
            &app,
            post_json("/api/v1/auth/register", json!({"username": "bob", "password": "pw"})),
        )
        .await;
        let (_, body) = call(
            &app,
            post_json("/api/v1/auth/login", json!({"username": "bob", "password": "pw"})),
        )
        .await;
        let access = body["access_token"].as_str().unwrap().to_string();
        let refresh = body["refresh_token"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            post_json("/api/v1/auth/refresh", json!({ "refresh_token": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "bob");

        let (status, body) = call(
            &app,
            post_json("/api/v1/auth/refresh", json!({ "refresh_token": access })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, Value::String("Invalid or expired token".into()));
    }

    #[tokio::test]
    async fn refresh_rejections_share_one_body() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(
            &app,
            post_json("/api/v1/auth/refresh", json!({ "refresh_token": "garbage" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, Value::String("Invalid or expired token".into()));
    }

    #[tokio::test]
    async fn me_requires_bearer_token() {
        let app = build_app(AppState::fake().await);
        let (status, _) = call(
            &app,
            Request::get("/api/v1/me").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
