//! Field template, generator and dice API routes
//!
//! These are stateless and need no identity.

use axum::{extract::Query, http::StatusCode, Json};

use crate::application::dto::{
    DiceRollRequestDto, DiceRollResponseDto, FieldDescriptorDto, GenerateFromTemplateRequestDto,
    GeneratedCharacterResponseDto, TemplateQueryDto, TemplateResponseDto,
};
use crate::domain::services::{field_template, generate_character};
use crate::domain::value_objects::{DiceNotation, Mode, Theme};

/// Stat and skill template for a theme and mode
pub async fn get_template(Query(query): Query<TemplateQueryDto>) -> Json<TemplateResponseDto> {
    let theme = Theme::parse_lossy(&query.theme);
    let mode = Mode::parse_lossy(&query.mode);

    Json(TemplateResponseDto {
        theme,
        mode,
        fields: field_template(theme, mode)
            .iter()
            .map(FieldDescriptorDto::from)
            .collect(),
    })
}

/// Generate a character outside of any game
pub async fn generate_from_template(
    Json(req): Json<GenerateFromTemplateRequestDto>,
) -> Json<GeneratedCharacterResponseDto> {
    let generated = generate_character(
        Theme::parse_lossy(&req.theme),
        Mode::parse_lossy(&req.mode),
        req.empty,
        &mut rand::thread_rng(),
    );
    Json(GeneratedCharacterResponseDto::from(generated))
}

pub async fn roll_dice(
    Json(req): Json<DiceRollRequestDto>,
) -> Result<Json<DiceRollResponseDto>, (StatusCode, String)> {
    let notation = DiceNotation::parse(&req.notation)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let roll = notation.roll(&mut rand::thread_rng());

    Ok(Json(DiceRollResponseDto::new(&notation, roll)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::infrastructure::http::test_app::TestApp;

    #[tokio::test]
    async fn test_template_falls_back_to_fantasy_simple() {
        let app = TestApp::new().await;

        let (status, unknown) = app
            .request("GET", "/api/templates?theme=unknown-theme", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (_, fantasy) = app
            .request("GET", "/api/templates?theme=theme-fantasy&mode=simple", None, None)
            .await;
        assert_eq!(unknown, fantasy);
        assert_eq!(unknown["mode"], "simple");
    }

    #[tokio::test]
    async fn test_generate_blank_sheet() {
        let app = TestApp::new().await;

        let (status, generated) = app
            .request(
                "POST",
                "/api/templates/generate",
                None,
                Some(json!({ "theme": "theme-stalker", "empty": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(generated["name"], "");
        let fields = generated["fields"].as_array().unwrap();
        assert!(fields.iter().all(|f| f["value"].is_null()));
        assert!(fields.iter().any(|f| f["name"] == "Habits & Hobbies"));
    }

    #[tokio::test]
    async fn test_roll_dice() {
        let app = TestApp::new().await;

        let (status, roll) = app
            .request("POST", "/api/dice/roll", None, Some(json!({ "notation": "3d6+2" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(roll["rolls"].as_array().unwrap().len(), 3);
        let total = roll["total"].as_i64().unwrap();
        assert!((5..=20).contains(&total));

        let (status, _) = app
            .request("POST", "/api/dice/roll", None, Some(json!({ "notation": "3x6" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
