use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use http::{header, StatusCode};
use workshop_registry_database::models::Workshop;

use crate::catalog::{WorkshopCatalog, WorkshopDetails};
use crate::error::AppError;
use crate::materials::Material;
use crate::routes::extract::{MultipartForm, PathParam};

const MATERIAL_FIELD: &str = "material";

/// Reads the workshop form. Text fields use the same names as the JSON
/// representation (`meetingLink`), the upload is the `material` field.
async fn read_workshop_form(
    mut multipart: Multipart,
) -> Result<(WorkshopDetails, Option<Material>), AppError> {
    let mut fields = HashMap::new();
    let mut material = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if name == MATERIAL_FIELD {
            let file_name = field.file_name().unwrap_or(MATERIAL_FIELD).to_owned();
            let bytes = field.bytes().await?;
            material = Some(Material { file_name, bytes });
        } else {
            fields.insert(name, field.text().await?);
        }
    }

    let mut take = |key: &'static str| fields.remove(key).ok_or(AppError::MissingField(key));
    let details = WorkshopDetails {
        name: take("name")?,
        date: take("date")?,
        time: take("time")?,
        meeting_link: take("meetingLink")?,
        description: take("description")?,
        instructor: take("instructor")?,
    };
    Ok((details, material))
}

pub async fn create(
    State(catalog): State<Arc<WorkshopCatalog>>,
    MultipartForm(multipart): MultipartForm,
) -> Result<(StatusCode, Json<Workshop>), AppError> {
    let (details, material) = read_workshop_form(multipart).await?;
    let workshop = catalog.create_workshop(details, material).await?;
    Ok((StatusCode::CREATED, Json(workshop)))
}

pub async fn list(
    State(catalog): State<Arc<WorkshopCatalog>>,
) -> Result<Json<Vec<Workshop>>, AppError> {
    Ok(Json(catalog.list_workshops().await?))
}

pub async fn get(
    State(catalog): State<Arc<WorkshopCatalog>>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Workshop>, AppError> {
    Ok(Json(catalog.get_workshop_by_id(id).await?))
}

pub async fn update(
    State(catalog): State<Arc<WorkshopCatalog>>,
    PathParam(id): PathParam<i64>,
    MultipartForm(multipart): MultipartForm,
) -> Result<Json<Workshop>, AppError> {
    let (details, material) = read_workshop_form(multipart).await?;
    Ok(Json(catalog.update_workshop(id, details, material).await?))
}

pub async fn delete(
    State(catalog): State<Arc<WorkshopCatalog>>,
    PathParam(id): PathParam<i64>,
) -> Result<StatusCode, AppError> {
    catalog.delete_workshop(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn material(
    State(catalog): State<Arc<WorkshopCatalog>>,
    PathParam(filename): PathParam<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = catalog.material(&filename).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, bytes))
}
