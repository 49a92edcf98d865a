use axum::extract::State;
use axum::response::Response;
use axum::Form;

use crate::db::ShowRepo;
use crate::models::{FormFields, ShowForm};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, page};
use crate::views::{ShowFormDefaults, ShowListing};

pub async fn list_shows(State(state): State<AppState>) -> Result<Response, AppError> {
    let shows: Vec<ShowListing> = ShowRepo::new(state.pool())
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(page(shows))
}

pub async fn create_show_form(State(state): State<AppState>) -> Response {
    page(ShowFormDefaults::at(state.now()))
}

pub async fn create_show(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = ShowForm::parse(&FormFields::from(pairs))?;

    let show = ShowRepo::new(state.pool())
        .create(&form)
        .await
        .map_err(|e| AppError::from_write(e, "An error occurred. Show could not be listed."))?;

    Ok(created(show, "Show was successfully listed!"))
}
