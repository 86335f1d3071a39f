use serde::{Deserialize, Serialize};

use crate::application::services::{ChangePasswordRequest, RegisterRequest};
use crate::domain::entities::User;

#[derive(Debug, Deserialize)]
pub struct VerificationCodeRequestDto {
    pub email: String,
}

#[derive(Deserialize)]
pub struct RegisterRequestDto {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(alias = "verification_code")]
    pub code: String,
}

impl From<RegisterRequestDto> for RegisterRequest {
    fn from(dto: RegisterRequestDto) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            password: dto.password,
            password_confirmation: dto.password_confirmation,
            verification_code: dto.code,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequestDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequestDto {
    pub username: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequestDto {
    pub current_password: String,
    pub new_password: String,
    pub password_confirmation: String,
}

impl From<ChangePasswordRequestDto> for ChangePasswordRequest {
    fn from(dto: ChangePasswordRequestDto) -> Self {
        Self {
            current_password: dto.current_password,
            new_password: dto.new_password,
            password_confirmation: dto.password_confirmation,
        }
    }
}

/// Account as shown to its owner; never carries the password hash
#[derive(Debug, Serialize)]
pub struct ProfileResponseDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for ProfileResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
