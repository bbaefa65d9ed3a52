//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | 201; body `{email, password, nickname}` |
//! | `POST` | `/auth/login` | body `{email, password}` |
//! | `GET`  | `/auth/profile` | bearer token |
//! | `PUT`  | `/auth/profile` | body `{nickname?, avatar?}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use vocab_core::{
  store::VocabStore,
  user::{NewUser, ProfileUpdate, User, normalize_email},
};

use crate::{
  AppState,
  auth::{AuthUser, hash_password, verify_password},
  error::ApiError,
  response::{Envelope, Json},
};

pub const MIN_PASSWORD_CHARS: usize = 6;

/// The part of a user returned next to a fresh token.
#[derive(Debug, Serialize)]
pub struct UserSummary {
  pub id:       Uuid,
  pub email:    String,
  pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct Session {
  pub token: String,
  pub user:  UserSummary,
}

fn session<S>(state: &AppState<S>, user: User) -> Session {
  Session {
    token: state.tokens.issue(user.id, state.clock.now()),
    user:  UserSummary { id: user.id, email: user.email, nickname: user.nickname },
  }
}

/// Trimmed, or `None` if nothing is left.
fn present(field: Option<String>) -> Option<String> {
  field
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    Option<String>,
  pub password: Option<String>,
  pub nickname: Option<String>,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VocabStore + 'static,
{
  let (Some(email), Some(password), Some(nickname)) = (
    present(body.email),
    body.password.filter(|p| !p.is_empty()),
    present(body.nickname),
  ) else {
    return Err(ApiError::BadRequest(
      "Email, password and nickname are required".into(),
    ));
  };
  if password.chars().count() < MIN_PASSWORD_CHARS {
    return Err(ApiError::BadRequest(format!(
      "Password must be at least {MIN_PASSWORD_CHARS} characters"
    )));
  }

  let email = normalize_email(&email);
  let taken = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?;
  if taken.is_some() {
    return Err(ApiError::BadRequest("Email is already registered".into()));
  }

  let user = state
    .store
    .create_user(NewUser { email, password_hash: hash_password(&password)?, nickname })
    .await
    .map_err(ApiError::store)?;
  info!(user_id = %user.id, "registered user");

  Ok((
    StatusCode::CREATED,
    Envelope::ok(session(&state, user)).with_message("Registered"),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Envelope<Session>, ApiError>
where
  S: VocabStore + 'static,
{
  let (Some(email), Some(password)) = (present(body.email), body.password) else {
    return Err(ApiError::BadRequest("Email and password are required".into()));
  };

  let invalid = || ApiError::Unauthorized("Invalid email or password".into());
  let user = state
    .store
    .find_user_by_email(&normalize_email(&email))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(invalid)?;
  if !verify_password(&password, &user.password_hash) {
    return Err(invalid());
  }

  Ok(Envelope::ok(session(&state, user)).with_message("Logged in"))
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// `GET /auth/profile`
pub async fn profile<S>(AuthUser(user): AuthUser) -> Envelope<User>
where
  S: VocabStore + 'static,
{
  Envelope::ok(user)
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileBody {
  pub nickname: Option<String>,
  pub avatar:   Option<String>,
}

/// `PUT /auth/profile`. Blank fields are left unchanged.
pub async fn update_profile<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Json(body): Json<ProfileBody>,
) -> Result<Envelope<User>, ApiError>
where
  S: VocabStore + 'static,
{
  let update = ProfileUpdate {
    nickname: present(body.nickname),
    avatar:   present(body.avatar),
  };
  let user = state
    .store
    .update_profile(user.id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

  Ok(Envelope::ok(user).with_message("Profile updated"))
}
