use std::sync::Arc;

use tracing::{info, instrument, warn};
use workshop_registry_database::models::{NewRegistration, Registration, Workshop};
use workshop_registry_database::store::{DynRegistrationStore, DynUserDirectory};
use workshop_registry_database::error::Referenced;
use workshop_registry_database::DatabaseError;

use crate::catalog::WorkshopCatalog;
use crate::error::RegistryError;

/// Who is registered for which workshop.
///
/// There is at most one registration per `(workshop, username)` pair and
/// removing it also removes the attendance recorded for that pair.
pub struct RegistrationLedger {
    registrations: DynRegistrationStore,
    catalog: Arc<WorkshopCatalog>,
    users: DynUserDirectory,
}

impl RegistrationLedger {
    #[must_use]
    pub fn new(
        registrations: DynRegistrationStore,
        catalog: Arc<WorkshopCatalog>,
        users: DynUserDirectory,
    ) -> Self {
        Self {
            registrations,
            catalog,
            users,
        }
    }

    #[instrument(skip(self))]
    pub async fn register_workshop(
        &self,
        workshop_id: i64,
        username: &str,
    ) -> Result<Registration, RegistryError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!("user not found");
            return Err(RegistryError::UserNotFound(username.to_owned()));
        };
        self.catalog.get_workshop_by_id(workshop_id).await?;

        let new_registration = NewRegistration {
            workshop_id,
            username: user.username,
            email: user.email,
        };
        match self
            .registrations
            .insert_registration_if_absent(new_registration)
            .await
        {
            Ok(Some(registration)) => {
                info!(registration_id = registration.id, "registered");
                Ok(registration)
            }
            Ok(None) => {
                warn!("already registered");
                Err(RegistryError::AlreadyRegistered {
                    workshop_id,
                    username: username.to_owned(),
                })
            }
            // the workshop or user was deleted between the lookup and the insert
            Err(DatabaseError::MissingReference {
                referenced: Referenced::Workshop,
                ..
            }) => Err(RegistryError::WorkshopNotFound(workshop_id)),
            Err(DatabaseError::MissingReference {
                referenced: Referenced::User,
                ..
            }) => Err(RegistryError::UserNotFound(username.to_owned())),
            Err(error) => Err(error.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn unregister_workshop(
        &self,
        workshop_id: i64,
        username: &str,
    ) -> Result<(), RegistryError> {
        if self
            .registrations
            .delete_registration(workshop_id, username)
            .await?
        {
            info!("unregistered");
            Ok(())
        } else {
            warn!("failed to unregister (not found)");
            Err(RegistryError::RegistrationNotFound {
                workshop_id,
                username: username.to_owned(),
            })
        }
    }

    pub async fn get_registered_workshops(
        &self,
        username: &str,
    ) -> Result<Vec<Workshop>, RegistryError> {
        if self.users.find_by_username(username).await?.is_none() {
            return Err(RegistryError::UserNotFound(username.to_owned()));
        }
        Ok(self.registrations.workshops_by_username(username).await?)
    }

    pub async fn get_registered_students_by_workshop(
        &self,
        workshop_id: i64,
    ) -> Result<Vec<Registration>, RegistryError> {
        self.catalog.get_workshop_by_id(workshop_id).await?;
        Ok(self
            .registrations
            .registrations_by_workshop(workshop_id)
            .await?)
    }
}
