use utoipa::OpenApi;

/// OpenAPI description of the HTTP surface.
///
/// The WebSocket endpoint (`/ws/game/{session_id}`) is intentionally absent;
/// its envelope contract is documented on the DTO types instead.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Puzzle Rush synchronization engine",
        description = "Realtime session synchronization for timed cooperative puzzle games: \
                       team registration, session lifecycle, puzzle rotation, the shared point \
                       economy, and cursor color assignment.",
    ),
    paths(
        crate::routes::team::register_player,
        crate::routes::team::create_team,
        crate::routes::team::join_team,
        crate::routes::team::list_teams,
        crate::routes::game::create_session,
        crate::routes::game::latest_session,
        crate::routes::game::start_session,
        crate::routes::game::update_state,
        crate::routes::puzzle::create_puzzle,
        crate::routes::puzzle::current_puzzle,
        crate::routes::puzzle::submit_answer,
        crate::routes::puzzle::team_points,
        crate::routes::puzzle::decay_team,
        crate::routes::color::assign_color,
        crate::routes::color::validate_colors,
        crate::routes::color::resolve_colors,
        crate::routes::health::healthcheck,
    ),
    tags(
        (name = "team", description = "Player and team registration"),
        (name = "game", description = "Session lifecycle"),
        (name = "puzzle", description = "Puzzle rotation and point economy"),
        (name = "color", description = "Cursor color assignment"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
