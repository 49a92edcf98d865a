use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Form;

use super::{parse_id, SearchParams};
use crate::db::VenueRepo;
use crate::models::{FormFields, VenueForm};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, page, success};
use crate::views::{group_by_area, FormChoices, SearchResults, VenueDetail, VenueEdit};

const RESOURCE: &str = "venue";

pub async fn list_venues(State(state): State<AppState>) -> Result<Response, AppError> {
    let venues = VenueRepo::new(state.pool())
        .list_with_upcoming(state.now())
        .await?;

    Ok(page(group_by_area(venues)))
}

pub async fn search_venues(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Response, AppError> {
    search(&state, params).await
}

pub async fn search_venues_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    search(&state, params).await
}

async fn search(state: &AppState, params: SearchParams) -> Result<Response, AppError> {
    let term = params.search_term.trim();
    let venues = VenueRepo::new(state.pool())
        .search(term, state.now())
        .await?;

    tracing::debug!(term, matches = venues.len(), "Venue search");
    Ok(page(SearchResults::new(term, venues)))
}

pub async fn show_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &venue_id)?;
    let repo = VenueRepo::new(state.pool());

    let venue = repo.get(id).await?;
    let shows = repo.shows(id).await?;

    Ok(page(VenueDetail::new(venue, shows, state.now())))
}

pub async fn create_venue_form() -> Response {
    page(FormChoices::new())
}

pub async fn create_venue(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = VenueForm::parse(&FormFields::from(pairs))?;

    let venue = VenueRepo::new(state.pool())
        .create(&form)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                format!("An error occurred. Venue {} could not be listed.", form.name),
            )
        })?;

    let message = format!("Venue {} was successfully listed!", venue.name);
    Ok(created(venue, message))
}

pub async fn edit_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &venue_id)?;
    let venue = VenueRepo::new(state.pool()).get(id).await?;

    Ok(page(VenueEdit::from(&venue)))
}

pub async fn update_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &venue_id)?;
    let form = VenueForm::parse(&FormFields::from(pairs))?;

    let venue = VenueRepo::new(state.pool())
        .update(id, &form)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                format!("An error occurred. Venue {} could not be updated.", form.name),
            )
        })?;

    let message = format!("Venue {} was successfully updated!", venue.name);
    Ok(success(venue, message))
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &venue_id)?;

    let venue = VenueRepo::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_write(e, "An error occurred. Venue could not be deleted."))?;

    Ok(empty_success(format!(
        "Venue {} was successfully deleted.",
        venue.name
    )))
}
