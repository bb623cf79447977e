//! Event pages and lifecycle actions

use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Form;
use bracket_core::{
    details_path, BannerUpload, CommentService, Confirmation, Error as CoreError, EventAction,
    EventForm, EventService, PermissionMatrix,
};
use serde::Deserialize;

use super::parse_id;
use crate::error::{PageError, WebError};
use crate::flash::Flash;
use crate::session::{redirect_with, referrer, CurrentUser, RequireUser};
use crate::state::AppState;
use crate::views::{EventChoices, EventFormView, EventView, IndexView, Page, ProfileView};

/// Name of the file part on the event form
const BANNER_FIELD: &str = "banner_upload";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmForm {
    pub token: String,
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> WebError {
    WebError::BadRequest(e.to_string())
}

/// Split a multipart event form into its text fields and banner file
async fn read_event_form(
    mut multipart: Multipart,
) -> Result<(EventForm, Option<BannerUpload>), WebError> {
    let mut form = EventForm::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == BANNER_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            upload = Some(BannerUpload::new(filename, bytes.to_vec()));
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "title" => form.title = value,
            "category" => form.category = value,
            "region" => form.region = value,
            "date" => form.date = value,
            "time" => form.time = value,
            "team_size" => form.team_size = value,
            "mode" => form.mode = value,
            "prize" => form.prize = value,
            "description" => form.description = value,
            "banner_url" => form.banner_url = value,
            _ => {}
        }
    }

    Ok((form, upload))
}

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    headers: HeaderMap,
) -> Result<Page<IndexView>, PageError> {
    let events = {
        let db = state.db()?;
        EventService::new(&*db).list_events()
    }
    .map_err(PageError::internal)?;

    Ok(Page::new(&headers, viewer, IndexView { events }))
}

pub async fn details(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Page<EventView>, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let details = {
        let db = state.db()?;
        EventService::new(&*db).event_details(event_id)
    }
    .map_err(PageError::internal)?;

    let is_host = viewer
        .as_ref()
        .map(|v| PermissionMatrix::can_perform(v, &details.event, EventAction::Cancel))
        .unwrap_or(false);
    let can_book = viewer.is_some() && !details.event.is_cancelled();
    let confirmation_token = is_host.then(|| details.event.id.to_string());

    let view = EventView {
        details,
        is_host,
        can_book,
        confirmation_token,
    };
    Ok(Page::new(&headers, viewer, view))
}

pub async fn create_form(RequireUser(user): RequireUser, headers: HeaderMap) -> Page<EventFormView> {
    let view = EventFormView {
        event: None,
        choices: EventChoices::default(),
    };
    Page::new(&headers, Some(user), view)
}

pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let (form, upload) = read_event_form(multipart)
        .await
        .map_err(|e| PageError::new(e, "/create"))?;

    let event_id = {
        let db = state.db()?;
        EventService::new(&*db).create(&user, &form, upload.as_ref(), &*state.banners)
    }
    .map_err(|e| PageError::new(e, "/create"))?;

    Ok(redirect_with(
        &details_path(event_id),
        Flash::success("Tournament created successfully!"),
    ))
}

pub async fn edit_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let details = {
        let db = state.db()?;
        EventService::new(&*db).event_details(event_id)
    }
    .map_err(PageError::internal)?;

    if !PermissionMatrix::can_perform(&user, &details.event, EventAction::Edit) {
        return Ok(redirect_with(
            &details_path(event_id),
            Flash::warning("You can only edit tournaments you host."),
        ));
    }

    let view = EventFormView {
        event: Some(details.event),
        choices: EventChoices::default(),
    };
    Ok(Page::new(&headers, Some(user), view).into_response())
}

pub async fn edit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let edit_page = format!("{}/edit", details_path(event_id));
    let (form, upload) = read_event_form(multipart)
        .await
        .map_err(|e| PageError::new(e, edit_page.clone()))?;

    let result = {
        let db = state.db()?;
        EventService::new(&*db).edit(event_id, &user, &form, upload.as_ref(), &*state.banners)
    };

    match result {
        Ok(_) => Ok(redirect_with("/", Flash::success("Tournament updated successfully!"))),
        Err(e @ CoreError::Authorization(_)) => Err(PageError::new(e, details_path(event_id))),
        Err(e) => Err(PageError::new(e, edit_page)),
    }
}

pub async fn comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let detail = details_path(event_id);

    {
        let db = state.db()?;
        CommentService::new(&*db).post(event_id, &user, &form.body)
    }
    .map_err(|e| PageError::new(e, detail.clone()))?;

    Ok(redirect_with(&detail, Flash::success("Comment posted!")))
}

pub async fn cancel(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let confirmation = Confirmation::new(&form.token, referrer(&headers));

    {
        let db = state.db()?;
        EventService::new(&*db).cancel(event_id, &user, confirmation)
    }
    .map_err(|e| PageError::new(e, details_path(event_id)))?;

    Ok(redirect_with(
        "/",
        Flash::warning("Tournament cancelled successfully!"),
    ))
}

pub async fn reopen(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let detail = details_path(event_id);

    {
        let db = state.db()?;
        EventService::new(&*db).reopen(event_id, &user)
    }
    .map_err(|e| PageError::new(e, detail.clone()))?;

    Ok(redirect_with(
        &detail,
        Flash::success("Tournament is open for booking again."),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;
    let confirmation = Confirmation::new(&form.token, referrer(&headers));

    {
        let db = state.db()?;
        EventService::new(&*db).delete(event_id, &user, confirmation)
    }
    .map_err(|e| PageError::new(e, details_path(event_id)))?;

    Ok(redirect_with("/", Flash::success("Tournament deleted successfully!")))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Page<ProfileView>, PageError> {
    let user_id = parse_id(&raw_id, "User")?;
    let profile = {
        let db = state.db()?;
        EventService::new(&*db).user_profile(user_id)
    }
    .map_err(PageError::internal)?;

    Ok(Page::new(&headers, viewer, ProfileView { profile }))
}
