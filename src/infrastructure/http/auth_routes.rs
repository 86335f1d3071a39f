//! Account and profile API routes

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{service_error, ActingUser};
use crate::application::dto::{
    ChangePasswordRequestDto, LoginRequestDto, ProfileResponseDto, RegisterRequestDto,
    RenameRequestDto, VerificationCodeRequestDto,
};
use crate::application::services::AccountService;
use crate::infrastructure::state::AppState;

/// Send a registration code to an email address
pub async fn request_verification_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerificationCodeRequestDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .account_service
        .request_verification_code(&req.email)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::ACCEPTED)
}

/// Create an account using a verification code
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ProfileResponseDto>), (StatusCode, String)> {
    let user = state
        .account_service
        .register(req.into())
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(ProfileResponseDto::from(user))))
}

/// Verify credentials; the gateway issues the session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequestDto>,
) -> Result<Json<ProfileResponseDto>, (StatusCode, String)> {
    let user = state
        .account_service
        .authenticate(&req.email, &req.password)
        .await
        .map_err(service_error)?;

    Ok(Json(ProfileResponseDto::from(user)))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> Result<Json<ProfileResponseDto>, (StatusCode, String)> {
    let user = state
        .account_service
        .get_profile(user)
        .await
        .map_err(service_error)?;

    Ok(Json(ProfileResponseDto::from(user)))
}

pub async fn rename(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(req): Json<RenameRequestDto>,
) -> Result<Json<ProfileResponseDto>, (StatusCode, String)> {
    let user = state
        .account_service
        .rename(user, &req.username)
        .await
        .map_err(service_error)?;

    Ok(Json(ProfileResponseDto::from(user)))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(req): Json<ChangePasswordRequestDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .account_service
        .change_password(user, req.into())
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete the caller's account and every game they own
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .account_service
        .delete_account(user)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}
