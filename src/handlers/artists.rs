use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Form;

use super::{parse_id, SearchParams};
use crate::db::ArtistRepo;
use crate::models::{ArtistForm, FormFields};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, page, success};
use crate::views::{ArtistDetail, ArtistEdit, FormChoices, SearchResults};

const RESOURCE: &str = "artist";

pub async fn list_artists(State(state): State<AppState>) -> Result<Response, AppError> {
    let artists = ArtistRepo::new(state.pool())
        .search("", state.now())
        .await?;

    Ok(page(artists))
}

pub async fn search_artists(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Response, AppError> {
    search(&state, params).await
}

pub async fn search_artists_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    search(&state, params).await
}

async fn search(state: &AppState, params: SearchParams) -> Result<Response, AppError> {
    let term = params.search_term.trim();
    let artists = ArtistRepo::new(state.pool())
        .search(term, state.now())
        .await?;

    tracing::debug!(term, matches = artists.len(), "Artist search");
    Ok(page(SearchResults::new(term, artists)))
}

pub async fn show_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &artist_id)?;
    let repo = ArtistRepo::new(state.pool());

    let artist = repo.get(id).await?;
    let shows = repo.shows(id).await?;

    Ok(page(ArtistDetail::new(artist, shows, state.now())))
}

pub async fn create_artist_form() -> Response {
    page(FormChoices::new())
}

pub async fn create_artist(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = ArtistForm::parse(&FormFields::from(pairs))?;

    let artist = ArtistRepo::new(state.pool())
        .create(&form)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                format!("An error occurred. Artist {} could not be listed.", form.name),
            )
        })?;

    let message = format!("Artist {} was successfully listed!", artist.name);
    Ok(created(artist, message))
}

pub async fn edit_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &artist_id)?;
    let artist = ArtistRepo::new(state.pool()).get(id).await?;

    Ok(page(ArtistEdit::from(&artist)))
}

pub async fn update_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &artist_id)?;
    let form = ArtistForm::parse(&FormFields::from(pairs))?;

    let artist = ArtistRepo::new(state.pool())
        .update(id, &form)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                format!("An error occurred. Artist {} could not be updated.", form.name),
            )
        })?;

    let message = format!("Artist {} was successfully updated!", artist.name);
    Ok(success(artist, message))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(RESOURCE, &artist_id)?;

    let artist = ArtistRepo::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_write(e, "An error occurred. Artist could not be deleted."))?;

    Ok(empty_success(format!(
        "Artist {} was successfully deleted.",
        artist.name
    )))
}
