use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument, warn};
use workshop_registry_database::models::Attendance;
use workshop_registry_database::store::{DynAttendanceStore, DynUserDirectory};

use crate::catalog::WorkshopCatalog;
use crate::error::RegistryError;

/// Request to record whether a registered student was present.
///
/// The identifiers are optional because clients may omit them; such
/// requests are rejected before anything is looked up.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    pub workshop_id: Option<i64>,
    pub username: Option<String>,
    #[serde(default)]
    pub present: bool,
}

pub struct AttendanceLedger {
    attendance: DynAttendanceStore,
    catalog: Arc<WorkshopCatalog>,
    users: DynUserDirectory,
}

impl AttendanceLedger {
    #[must_use]
    pub fn new(
        attendance: DynAttendanceStore,
        catalog: Arc<WorkshopCatalog>,
        users: DynUserDirectory,
    ) -> Self {
        Self {
            attendance,
            catalog,
            users,
        }
    }

    /// Marking the same pair again overwrites the previous flag.
    #[instrument(skip(self))]
    pub async fn mark_attendance(
        &self,
        request: MarkAttendance,
    ) -> Result<Attendance, RegistryError> {
        let username = request
            .username
            .as_deref()
            .filter(|username| !username.trim().is_empty());
        let (Some(workshop_id), Some(username)) = (request.workshop_id, username) else {
            warn!("invalid input: workshop id or username is missing");
            return Err(RegistryError::InvalidInput(
                "workshopId and username are required",
            ));
        };

        match self
            .attendance
            .upsert_attendance_if_registered(workshop_id, username, request.present)
            .await?
        {
            Some(attendance) => {
                info!(attendance_id = attendance.id, "marked attendance");
                Ok(attendance)
            }
            None => {
                warn!("registration not found");
                Err(RegistryError::RegistrationNotFound {
                    workshop_id,
                    username: username.to_owned(),
                })
            }
        }
    }

    pub async fn get_attendance_by_workshop(
        &self,
        workshop_id: i64,
    ) -> Result<Vec<Attendance>, RegistryError> {
        self.catalog.get_workshop_by_id(workshop_id).await?;
        Ok(self.attendance.attendance_by_workshop(workshop_id).await?)
    }

    pub async fn get_user_attendance(
        &self,
        username: &str,
    ) -> Result<Vec<Attendance>, RegistryError> {
        if self.users.find_by_username(username).await?.is_none() {
            return Err(RegistryError::UserNotFound(username.to_owned()));
        }
        Ok(self.attendance.attendance_by_username(username).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::MarkAttendance;
    use crate::error::RegistryError;
    use crate::test_support::fixture;

    fn mark(workshop_id: i64, username: &str, present: bool) -> MarkAttendance {
        MarkAttendance {
            workshop_id: Some(workshop_id),
            username: Some(username.to_owned()),
            present,
        }
    }

    #[tokio::test]
    async fn missing_identifiers_are_invalid_input() -> Result<(), RegistryError> {
        let fixture = fixture().await?;

        let requests = [
            MarkAttendance::default(),
            MarkAttendance {
                workshop_id: Some(fixture.workshop_id),
                username: None,
                present: true,
            },
            MarkAttendance {
                workshop_id: None,
                username: Some("alice".to_owned()),
                present: true,
            },
            MarkAttendance {
                workshop_id: Some(fixture.workshop_id),
                username: Some("  ".to_owned()),
                present: true,
            },
        ];
        for request in requests {
            assert!(matches!(
                fixture.attendance.mark_attendance(request).await,
                Err(RegistryError::InvalidInput(_))
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn unregistered_pair_cannot_be_marked() -> Result<(), RegistryError> {
        let fixture = fixture().await?;

        for present in [true, false] {
            assert!(matches!(
                fixture
                    .attendance
                    .mark_attendance(mark(fixture.workshop_id, "alice", present))
                    .await,
                Err(RegistryError::RegistrationNotFound { .. })
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn remarking_updates_the_single_row() -> Result<(), RegistryError> {
        let fixture = fixture().await?;
        fixture
            .registrations
            .register_workshop(fixture.workshop_id, "alice")
            .await?;

        let first = fixture
            .attendance
            .mark_attendance(mark(fixture.workshop_id, "alice", true))
            .await?;
        let second = fixture
            .attendance
            .mark_attendance(mark(fixture.workshop_id, "alice", false))
            .await?;
        assert_eq!(first.id, second.id);

        let by_workshop = fixture
            .attendance
            .get_attendance_by_workshop(fixture.workshop_id)
            .await?;
        assert_eq!(by_workshop, [second.clone()]);
        let by_user = fixture.attendance.get_user_attendance("alice").await?;
        assert_eq!(by_user, [second]);
        Ok(())
    }

    #[tokio::test]
    async fn register_mark_unregister_walkthrough() -> Result<(), RegistryError> {
        let fixture = fixture().await?;

        let registration = fixture
            .registrations
            .register_workshop(fixture.workshop_id, "alice")
            .await?;
        assert_eq!(registration.email, "a@x.com");

        let attendance = fixture
            .attendance
            .mark_attendance(mark(fixture.workshop_id, "alice", true))
            .await?;
        assert_eq!(attendance.workshop_id, fixture.workshop_id);
        assert_eq!(attendance.username, "alice");
        assert!(attendance.present);

        fixture
            .registrations
            .unregister_workshop(fixture.workshop_id, "alice")
            .await?;
        assert!(matches!(
            fixture
                .attendance
                .mark_attendance(mark(fixture.workshop_id, "alice", true))
                .await,
            Err(RegistryError::RegistrationNotFound { .. })
        ));
        // the attendance row went away with the registration
        assert!(fixture
            .attendance
            .get_user_attendance("alice")
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn listings_distinguish_empty_from_unknown() -> Result<(), RegistryError> {
        let fixture = fixture().await?;

        assert!(fixture
            .attendance
            .get_attendance_by_workshop(fixture.workshop_id)
            .await?
            .is_empty());
        assert!(fixture
            .attendance
            .get_user_attendance("alice")
            .await?
            .is_empty());
        assert!(matches!(
            fixture
                .attendance
                .get_attendance_by_workshop(fixture.workshop_id + 1000)
                .await,
            Err(RegistryError::WorkshopNotFound(_))
        ));
        assert!(matches!(
            fixture.attendance.get_user_attendance("mallory").await,
            Err(RegistryError::UserNotFound(_))
        ));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn attendance_never_outlives_its_registration() -> Result<(), RegistryError> {
        let fixture = fixture().await?;
        let workshop_id = fixture.workshop_id;
        let registrations = Arc::new(fixture.registrations);
        let attendance = Arc::new(fixture.attendance);

        for _ in 0..32 {
            registrations.register_workshop(workshop_id, "alice").await?;

            let marking = {
                let attendance = Arc::clone(&attendance);
                tokio::spawn(async move {
                    attendance
                        .mark_attendance(mark(workshop_id, "alice", true))
                        .await
                })
            };
            let unregistering = {
                let registrations = Arc::clone(&registrations);
                tokio::spawn(async move {
                    registrations
                        .unregister_workshop(workshop_id, "alice")
                        .await
                })
            };
            let (marked, unregistered) = tokio::join!(marking, unregistering);

            unregistered.expect("unregister task panicked")?;
            match marked.expect("mark task panicked") {
                Ok(_) | Err(RegistryError::RegistrationNotFound { .. }) => {}
                Err(other) => return Err(other),
            }
            assert!(attendance
                .get_attendance_by_workshop(workshop_id)
                .await?
                .is_empty());
            assert!(attendance.get_user_attendance("alice").await?.is_empty());
        }
        Ok(())
    }
}
