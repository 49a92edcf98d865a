use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, SecurityHeaders};
use crate::handlers::{artists, health_check, index, not_found, shows, venues};
use crate::state::AppState;
use crate::utils::error::normalize_error_pages;

pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        // Venues
        .route("/venues", get(venues::list_venues))
        .route(
            "/venues/search",
            get(venues::search_venues_query).post(venues::search_venues),
        )
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue),
        )
        .route(
            "/venues/:venue_id",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/venues/:venue_id/edit",
            get(venues::edit_venue).post(venues::update_venue),
        )
        // Artists
        .route("/artists", get(artists::list_artists))
        .route(
            "/artists/search",
            get(artists::search_artists_query).post(artists::search_artists),
        )
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist),
        )
        .route(
            "/artists/:artist_id",
            get(artists::show_artist).delete(artists::delete_artist),
        )
        .route(
            "/artists/:artist_id/edit",
            get(artists::edit_artist).post(artists::update_artist),
        )
        // Shows
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show),
        )
        .fallback(not_found)
        .layer(middleware::map_response(normalize_error_pages))
        .with_state(state);

    SecurityHeaders::from_env()
        .apply(router)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
}
