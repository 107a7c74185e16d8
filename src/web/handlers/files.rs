//! File handlers: upload, metadata, listing, visibility, and content.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::{authenticate, can_read};
use crate::file::{parse_id, FileRecord, FileRepository, ParentRef, UploadPipeline, UploadRequest};
use crate::user::UserRepository;
use crate::web::dto::{DataQuery, ListQuery, UploadBody};
use crate::web::error::ApiError;
use crate::web::handlers::{session_token, AppState};

/// POST /files - create a file, image, or folder.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UploadBody>,
) -> Result<(StatusCode, Json<FileRecord>), ApiError> {
    let users = UserRepository::new(state.db.pool());
    let owner_id = authenticate(&state.sessions, &users, session_token(&headers)).await?;

    let pipeline = UploadPipeline::new(state.db.pool(), &state.blobs, &state.queue);
    let record = pipeline
        .submit(
            owner_id,
            UploadRequest {
                name: body.name,
                kind: body.kind,
                data: body.data,
                parent_id: body.parent_id.map(|p| p.into_string()),
                is_public: body.is_public,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /files/:id - metadata for one of the caller's files.
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>, ApiError> {
    let users = UserRepository::new(state.db.pool());
    let user_id = authenticate(&state.sessions, &users, session_token(&headers)).await?;

    let id = parse_id(&id).ok_or_else(ApiError::not_found)?;
    let repo = FileRepository::new(state.db.pool());
    let entity = repo
        .get_for_owner(id, user_id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(FileRecord::from(&entity)))
}

/// GET /files - page through the children of a parent.
///
/// An unknown, malformed, or non-folder parent yields an empty list rather
/// than an error.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FileRecord>>, ApiError> {
    let users = UserRepository::new(state.db.pool());
    authenticate(&state.sessions, &users, session_token(&headers)).await?;

    let repo = FileRepository::new(state.db.pool());
    let parent = match query.parent_id.as_deref() {
        None | Some("0") | Some("") => ParentRef::Root,
        Some(raw) => {
            let Some(id) = parse_id(raw) else {
                return Ok(Json(Vec::new()));
            };
            match repo.get_by_id(id).await? {
                Some(entity) if entity.kind.is_folder() => ParentRef::Folder(id),
                _ => return Ok(Json(Vec::new())),
            }
        }
    };

    let page = query.page.unwrap_or(0);
    let children = repo.children(parent, page).await?;
    Ok(Json(children.iter().map(FileRecord::from).collect()))
}

/// PUT /files/:id/publish - make a file public.
pub async fn publish(
    state: State<AppState>,
    headers: HeaderMap,
    id: Path<String>,
) -> Result<Json<FileRecord>, ApiError> {
    set_visibility(state, headers, id, true).await
}

/// PUT /files/:id/unpublish - make a file private.
pub async fn unpublish(
    state: State<AppState>,
    headers: HeaderMap,
    id: Path<String>,
) -> Result<Json<FileRecord>, ApiError> {
    set_visibility(state, headers, id, false).await
}

async fn set_visibility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    is_public: bool,
) -> Result<Json<FileRecord>, ApiError> {
    let users = UserRepository::new(state.db.pool());
    let user_id = authenticate(&state.sessions, &users, session_token(&headers)).await?;

    let id = parse_id(&id).ok_or_else(ApiError::not_found)?;
    let repo = FileRepository::new(state.db.pool());

    // One conditional update scoped to (id, owner); no match is Not found
    let entity = repo
        .set_public(id, user_id, is_public)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(FileRecord::from(&entity)))
}

/// GET /files/:id/data - file content, or a derivative when `size` is set.
///
/// Readable by the owner always and by anyone when the file is public;
/// every other case reads as `Not found`, so callers cannot probe for
/// existence.
pub async fn data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<DataQuery>,
) -> Result<Response, ApiError> {
    // Identity is optional here: anonymous readers see public files
    let user_id = match session_token(&headers) {
        Some(token) => state.sessions.resolve(token).await?,
        None => None,
    };

    let id = parse_id(&id).ok_or_else(ApiError::not_found)?;
    let repo = FileRepository::new(state.db.pool());
    let entity = repo.get_by_id(id).await?.ok_or_else(ApiError::not_found)?;

    if !can_read(&entity, user_id) {
        return Err(ApiError::not_found());
    }

    if entity.kind.is_folder() {
        return Err(ApiError::bad_request("A folder doesn't have content"));
    }

    let blob_ref = entity.blob_ref.as_deref().ok_or_else(ApiError::not_found)?;
    let content = match query.size {
        Some(width) => state.blobs.load_derivative(blob_ref, width)?,
        None => state.blobs.load(blob_ref)?,
    };

    let mime = mime_guess::from_path(&entity.name).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], content).into_response())
}
