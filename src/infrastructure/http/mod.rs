//! HTTP REST API routes
//!
//! The caller is identified by the `x-user-id` header, which the auth
//! gateway in front of this service sets after validating the session.

mod auth_routes;
mod character_routes;
mod combat_routes;
mod extract;
mod game_routes;
mod invitation_routes;
mod template_routes;

#[cfg(test)]
mod test_app;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::application::services::{ServiceError, MAX_PHOTO_BYTES};
use crate::domain::aggregates::CombatError;
use crate::infrastructure::state::AppState;
use crate::infrastructure::storage::PHOTO_ROUTE;

pub use extract::{ActingUser, USER_ID_HEADER};

/// The full application: API routes, stored photos and middleware
pub fn build_app(state: Arc<AppState>) -> Router {
    let photos = ServeDir::new(&state.config.photo_dir);

    Router::new()
        .route("/health", get(health_check))
        .merge(create_routes())
        .nest_service(PHOTO_ROUTE, photos)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Account routes
        .route(
            "/api/auth/verification-code",
            post(auth_routes::request_verification_code),
        )
        .route("/api/auth/register", post(auth_routes::register))
        .route("/api/auth/login", post(auth_routes::login))
        .route("/api/profile", get(auth_routes::get_profile))
        .route("/api/profile", put(auth_routes::rename))
        .route("/api/profile", delete(auth_routes::delete_account))
        .route("/api/profile/password", put(auth_routes::change_password))
        // Game routes
        .route("/api/games", get(game_routes::list_games))
        .route("/api/games", post(game_routes::create_game))
        .route("/api/games/{id}", get(game_routes::get_game))
        .route("/api/games/{id}", put(game_routes::update_game))
        .route("/api/games/{id}", delete(game_routes::delete_game))
        .route("/api/games/{id}/members", get(game_routes::list_members))
        .route(
            "/api/games/{id}/members/{user_id}",
            put(game_routes::change_member_role),
        )
        .route(
            "/api/games/{id}/members/{user_id}",
            delete(game_routes::remove_member),
        )
        .route("/api/games/{id}/leave", post(game_routes::leave_game))
        // Invitation routes
        .route(
            "/api/games/{id}/invitations",
            get(invitation_routes::list_game_invitations),
        )
        .route(
            "/api/games/{id}/invitations",
            post(invitation_routes::invite),
        )
        .route("/api/invitations", get(invitation_routes::list_my_invitations))
        .route(
            "/api/invitations/{token}/accept",
            post(invitation_routes::accept_invitation),
        )
        .route(
            "/api/invitations/{token}/decline",
            post(invitation_routes::decline_invitation),
        )
        .route(
            "/api/invitations/{token}",
            delete(invitation_routes::revoke_invitation),
        )
        // Character routes
        .route(
            "/api/games/{id}/characters",
            get(character_routes::list_characters),
        )
        .route(
            "/api/games/{id}/characters",
            post(character_routes::create_character),
        )
        .route(
            "/api/games/{id}/characters/generate",
            post(character_routes::generate_character),
        )
        .route("/api/characters/{id}", get(character_routes::get_character))
        .route(
            "/api/characters/{id}",
            put(character_routes::update_character),
        )
        .route(
            "/api/characters/{id}",
            delete(character_routes::delete_character),
        )
        .route(
            "/api/characters/{id}/photo",
            put(character_routes::upload_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
        .route(
            "/api/characters/{id}/photo",
            delete(character_routes::remove_photo),
        )
        // Templates and dice
        .route("/api/templates", get(template_routes::get_template))
        .route(
            "/api/templates/generate",
            post(template_routes::generate_from_template),
        )
        .route("/api/dice/roll", post(template_routes::roll_dice))
        // Combat routes
        .route("/api/games/{id}/combat", get(combat_routes::get_combat))
        .route(
            "/api/games/{id}/combat/participants",
            post(combat_routes::add_participant),
        )
        .route(
            "/api/games/{id}/combat/participants/{participant_id}",
            delete(combat_routes::remove_participant),
        )
        .route(
            "/api/games/{id}/combat/participants/{participant_id}/health",
            put(combat_routes::update_health),
        )
        .route(
            "/api/games/{id}/combat/initiative",
            post(combat_routes::roll_initiative),
        )
        .route("/api/games/{id}/combat/start", post(combat_routes::start_combat))
        .route("/api/games/{id}/combat/next", post(combat_routes::next_turn))
        .route("/api/games/{id}/combat/reset", post(combat_routes::reset_combat))
}

/// Parse an id taken from the path
pub(crate) fn parse_path_id<T: FromStr>(raw: &str, what: &str) -> Result<T, (StatusCode, String)> {
    raw.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid {} ID", what)))
}

/// Map a service failure onto a status code and message.
///
/// Internal failures are logged here and reported without detail.
pub(crate) fn service_error(e: ServiceError) -> (StatusCode, String) {
    let status = match &e {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Combat(CombatError::ParticipantNotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Combat(_) => StatusCode::BAD_REQUEST,
        ServiceError::Internal(err) => {
            tracing::error!("Request failed: {:#}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong. Please try again.".to_string(),
            );
        }
    };
    (status, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ParticipantId;

    #[test]
    fn test_service_error_status_codes() {
        assert_eq!(
            service_error(ServiceError::validation("bad")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            service_error(ServiceError::NotFound("Game")),
            (StatusCode::NOT_FOUND, "Game not found".to_string())
        );
        assert_eq!(
            service_error(ServiceError::Combat(CombatError::ParticipantNotFound(
                ParticipantId::new()
            )))
            .0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            service_error(ServiceError::Combat(CombatError::NotActive)).0,
            StatusCode::BAD_REQUEST
        );

        let (status, message) = service_error(anyhow::anyhow!("disk on fire").into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("disk"));
    }

    #[test]
    fn test_parse_path_id() {
        use crate::domain::value_objects::GameId;

        let id = GameId::new();
        assert_eq!(parse_path_id::<GameId>(&id.to_string(), "game").unwrap(), id);
        let (status, message) = parse_path_id::<GameId>("nope", "game").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid game ID");
    }
}
