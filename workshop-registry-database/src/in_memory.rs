use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{DatabaseError, Referenced};
use crate::models::{Attendance, NewRegistration, Registration, User, Workshop, WorkshopDraft};
use crate::store::{AttendanceStore, RegistrationStore, UserDirectory, WorkshopStore};

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    workshops: BTreeMap<i64, Workshop>,
    users: BTreeMap<String, User>,
    registrations: Vec<Registration>,
    attendance: Vec<Attendance>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Store that keeps every table in process memory.
///
/// All tables sit behind a single lock, so each operation observes and
/// mutates a consistent snapshot just like a transaction would.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        Ok(self.tables.lock()?)
    }

    /// Adds or replaces a user of the directory.
    pub fn insert_user(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<(), DatabaseError> {
        let user = User {
            username: username.into(),
            email: email.into(),
        };
        self.tables()?.users.insert(user.username.clone(), user);
        Ok(())
    }
}

#[async_trait]
impl WorkshopStore for InMemoryStore {
    async fn insert_workshop(&self, draft: WorkshopDraft) -> Result<Workshop, DatabaseError> {
        let mut tables = self.tables()?;
        let workshop = draft.into_workshop(tables.next_id());
        tables.workshops.insert(workshop.id, workshop.clone());
        Ok(workshop)
    }

    async fn find_workshop(&self, id: i64) -> Result<Option<Workshop>, DatabaseError> {
        Ok(self.tables()?.workshops.get(&id).cloned())
    }

    async fn list_workshops(&self) -> Result<Vec<Workshop>, DatabaseError> {
        Ok(self.tables()?.workshops.values().cloned().collect())
    }

    async fn update_workshop(
        &self,
        id: i64,
        draft: WorkshopDraft,
    ) -> Result<Option<Workshop>, DatabaseError> {
        let mut tables = self.tables()?;
        let Some(workshop) = tables.workshops.get_mut(&id) else {
            return Ok(None);
        };
        let material = draft.material.or_else(|| workshop.material.take());
        *workshop = WorkshopDraft { material, ..draft }.into_workshop(id);
        Ok(Some(workshop.clone()))
    }

    async fn delete_workshop(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        if tables.workshops.remove(&id).is_none() {
            return Ok(false);
        }
        tables
            .registrations
            .retain(|registration| registration.workshop_id != id);
        tables.attendance.retain(|row| row.workshop_id != id);
        Ok(true)
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables()?.users.get(username).cloned())
    }
}

#[async_trait]
impl RegistrationStore for InMemoryStore {
    async fn insert_registration_if_absent(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<Registration>, DatabaseError> {
        let mut tables = self.tables()?;
        if !tables.workshops.contains_key(&registration.workshop_id) {
            return Err(DatabaseError::MissingReference {
                referenced: Referenced::Workshop,
                message: format!("workshop {}", registration.workshop_id),
            });
        }
        if !tables.users.contains_key(&registration.username) {
            return Err(DatabaseError::MissingReference {
                referenced: Referenced::User,
                message: format!("user {}", registration.username),
            });
        }
        if tables.registrations.iter().any(|existing| {
            existing.workshop_id == registration.workshop_id
                && existing.username == registration.username
        }) {
            return Ok(None);
        }

        let stored = Registration {
            id: tables.next_id(),
            workshop_id: registration.workshop_id,
            username: registration.username,
            email: registration.email,
        };
        tables.registrations.push(stored.clone());
        Ok(Some(stored))
    }

    async fn delete_registration(
        &self,
        workshop_id: i64,
        username: &str,
    ) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        let before = tables.registrations.len();
        tables.registrations.retain(|registration| {
            !(registration.workshop_id == workshop_id && registration.username == username)
        });
        if tables.registrations.len() == before {
            return Ok(false);
        }
        tables
            .attendance
            .retain(|row| !(row.workshop_id == workshop_id && row.username == username));
        Ok(true)
    }

    async fn registrations_by_workshop(
        &self,
        workshop_id: i64,
    ) -> Result<Vec<Registration>, DatabaseError> {
        Ok(self
            .tables()?
            .registrations
            .iter()
            .filter(|registration| registration.workshop_id == workshop_id)
            .cloned()
            .collect())
    }

    async fn workshops_by_username(&self, username: &str) -> Result<Vec<Workshop>, DatabaseError> {
        let tables = self.tables()?;
        Ok(tables
            .registrations
            .iter()
            .filter(|registration| registration.username == username)
            .filter_map(|registration| tables.workshops.get(&registration.workshop_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn upsert_attendance_if_registered(
        &self,
        workshop_id: i64,
        username: &str,
        present: bool,
    ) -> Result<Option<Attendance>, DatabaseError> {
        let mut tables = self.tables()?;
        let registered = tables.registrations.iter().any(|registration| {
            registration.workshop_id == workshop_id && registration.username == username
        });
        if !registered {
            return Ok(None);
        }

        if let Some(row) = tables
            .attendance
            .iter_mut()
            .find(|row| row.workshop_id == workshop_id && row.username == username)
        {
            row.present = present;
            return Ok(Some(row.clone()));
        }

        let row = Attendance {
            id: tables.next_id(),
            workshop_id,
            username: username.to_owned(),
            present,
        };
        tables.attendance.push(row.clone());
        Ok(Some(row))
    }

    async fn attendance_by_workshop(
        &self,
        workshop_id: i64,
    ) -> Result<Vec<Attendance>, DatabaseError> {
        Ok(self
            .tables()?
            .attendance
            .iter()
            .filter(|row| row.workshop_id == workshop_id)
            .cloned()
            .collect())
    }

    async fn attendance_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<Attendance>, DatabaseError> {
        Ok(self
            .tables()?
            .attendance
            .iter()
            .filter(|row| row.username == username)
            .cloned()
            .collect())
    }
}
