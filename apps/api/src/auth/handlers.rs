use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password::{hash_password_blocking, verify_password_blocking, MIN_PASSWORD_LEN};
use crate::errors::AppError;
use crate::interview::models::SessionSummary;
use crate::interview::store::list_summaries;
use crate::models::user::UserRow;
use crate::state::AppState;

const RECENT_SESSIONS_LIMIT: i64 = 10;
const DEFAULT_ROLE: &str = "interviewee";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub sessions: Vec<SessionSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration input.
#[derive(Debug, PartialEq)]
struct NewUser {
    name: String,
    email: String,
    password: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let new_user = validate_registration(req)?;

    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&new_user.email)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password_blocking(new_user.password).await?;

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&password_hash)
    .bind(DEFAULT_ROLE)
    .fetch_one(&state.db)
    .await
    // Lost a race with a concurrent registration of the same email.
    .map_err(|e| AppError::conflict_on_unique(e, "User already exists"))?;

    info!("Registered user {}", user.id);

    let response = auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (email, password) = login_credentials(req)?;

    let user: Option<UserRow> = sqlx::query_as(
        "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let user = user.ok_or_else(invalid)?;
    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    info!("User {} logged in", user.id);
    Ok(Json(auth_response(&state, user)?))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user: UserRow = sqlx::query_as(
        "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let sessions = list_summaries(&state.db, user_id, RECENT_SESSIONS_LIMIT).await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        sessions,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn auth_response(state: &AppState, user: UserRow) -> Result<AuthResponse, AppError> {
    let token = state.tokens.issue(user.id)?;
    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    })
}

fn validate_registration(req: RegisterRequest) -> Result<NewUser, AppError> {
    let (Some(name), Some(email), Some(password)) =
        (non_blank(req.name), non_blank(req.email), present(req.password))
    else {
        return Err(AppError::Validation("Please provide all fields".to_string()));
    };

    let email = normalize_email(&email);
    if !looks_like_email(&email) {
        return Err(AppError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(NewUser {
        name,
        email,
        password,
    })
}

fn login_credentials(req: LoginRequest) -> Result<(String, String), AppError> {
    match (non_blank(req.email), present(req.password)) {
        (Some(email), Some(password)) => Ok((normalize_email(&email), password)),
        _ => Err(AppError::Validation(
            "Please provide email and password".to_string(),
        )),
    }
}

/// Passwords are kept verbatim but must contain something besides whitespace.
fn present(password: Option<String>) -> Option<String> {
    password.filter(|p| !p.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
