use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::TokenKeys;
use crate::errors::AppError;
use crate::models::user::{NewUser, UserView};
use crate::repository::{UserRepository, USERS_EMAIL_KEY};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Emails are compared case-insensitively everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

pub async fn register(
    users: &dyn UserRepository,
    tokens: &TokenKeys,
    request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let username = request.username.trim().to_string();
    let email = normalize_email(&request.email);

    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if !looks_like_email(&email) {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::EmailExists);
    }

    let password_hash = hash_password(request.password).await?;
    let user = users
        .insert_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration.
            if e.is_conflict_on(USERS_EMAIL_KEY) {
                AppError::EmailExists
            } else {
                e.into()
            }
        })?;

    info!(user_id = user.id, "Registered user");

    Ok(AuthResponse {
        token: tokens.issue(user.id)?,
        user: UserView::from(&user),
    })
}

/// Unknown email and wrong password produce the same error.
pub async fn login(
    users: &dyn UserRepository,
    tokens: &TokenKeys,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&request.email);
    let user = users
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, "User logged in");

    Ok(AuthResponse {
        token: tokens.issue(user.id)?,
        user: UserView::from(&user),
    })
}
