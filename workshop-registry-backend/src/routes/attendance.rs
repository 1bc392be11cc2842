use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use http::StatusCode;
use workshop_registry_database::models::{Attendance, Registration};

use crate::attendance::{AttendanceLedger, MarkAttendance};
use crate::error::AppError;
use crate::registration::RegistrationLedger;
use crate::routes::extract::{JsonBody, PathParam};

pub async fn mark(
    State(attendance): State<Arc<AttendanceLedger>>,
    JsonBody(request): JsonBody<MarkAttendance>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let attendance = attendance.mark_attendance(request).await?;
    Ok((StatusCode::CREATED, Json(attendance)))
}

pub async fn by_workshop(
    State(attendance): State<Arc<AttendanceLedger>>,
    PathParam(workshop_id): PathParam<i64>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    Ok(Json(
        attendance.get_attendance_by_workshop(workshop_id).await?,
    ))
}

pub async fn by_user(
    State(attendance): State<Arc<AttendanceLedger>>,
    PathParam(username): PathParam<String>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    Ok(Json(attendance.get_user_attendance(&username).await?))
}

pub async fn participants(
    State(registrations): State<Arc<RegistrationLedger>>,
    PathParam(workshop_id): PathParam<i64>,
) -> Result<Json<Vec<Registration>>, AppError> {
    Ok(Json(
        registrations
            .get_registered_students_by_workshop(workshop_id)
            .await?,
    ))
}
