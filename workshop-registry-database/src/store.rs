use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::models::{Attendance, NewRegistration, Registration, User, Workshop, WorkshopDraft};

#[async_trait]
pub trait WorkshopStore: Send + Sync + 'static {
    async fn insert_workshop(&self, draft: WorkshopDraft) -> Result<Workshop, DatabaseError>;

    async fn find_workshop(&self, id: i64) -> Result<Option<Workshop>, DatabaseError>;

    /// All workshops ordered by id.
    async fn list_workshops(&self) -> Result<Vec<Workshop>, DatabaseError>;

    /// Returns `None` when no workshop has this id.
    async fn update_workshop(
        &self,
        id: i64,
        draft: WorkshopDraft,
    ) -> Result<Option<Workshop>, DatabaseError>;

    /// Removes the workshop together with its registrations and attendance.
    async fn delete_workshop(&self, id: i64) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync + 'static {
    /// Inserts the registration unless one already exists for the same
    /// `(workshop_id, username)` pair, in which case `None` is returned.
    /// The check and the insert happen atomically.
    async fn insert_registration_if_absent(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<Registration>, DatabaseError>;

    /// Deletes the registration and the attendance row of the same pair.
    async fn delete_registration(
        &self,
        workshop_id: i64,
        username: &str,
    ) -> Result<bool, DatabaseError>;

    async fn registrations_by_workshop(
        &self,
        workshop_id: i64,
    ) -> Result<Vec<Registration>, DatabaseError>;

    async fn workshops_by_username(&self, username: &str) -> Result<Vec<Workshop>, DatabaseError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync + 'static {
    /// Creates or overwrites the attendance row for the pair, but only while a
    /// registration for it exists. Returns `None` otherwise.
    async fn upsert_attendance_if_registered(
        &self,
        workshop_id: i64,
        username: &str,
        present: bool,
    ) -> Result<Option<Attendance>, DatabaseError>;

    async fn attendance_by_workshop(
        &self,
        workshop_id: i64,
    ) -> Result<Vec<Attendance>, DatabaseError>;

    async fn attendance_by_username(&self, username: &str)
        -> Result<Vec<Attendance>, DatabaseError>;
}

pub type DynWorkshopStore = Arc<dyn WorkshopStore>;
pub type DynUserDirectory = Arc<dyn UserDirectory>;
pub type DynRegistrationStore = Arc<dyn RegistrationStore>;
pub type DynAttendanceStore = Arc<dyn AttendanceStore>;
