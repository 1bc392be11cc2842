use bytes::Bytes;
use tracing::{info, instrument, warn};
use workshop_registry_database::models::{Workshop, WorkshopDraft};
use workshop_registry_database::store::DynWorkshopStore;

use crate::error::RegistryError;
use crate::materials::{DynMaterialStore, Material};

/// Descriptive fields of a workshop, without its material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopDetails {
    pub name: String,
    pub date: String,
    pub time: String,
    pub meeting_link: String,
    pub description: String,
    pub instructor: String,
}

impl WorkshopDetails {
    fn into_draft(self, material: Option<String>) -> WorkshopDraft {
        WorkshopDraft {
            name: self.name,
            date: self.date,
            time: self.time,
            meeting_link: self.meeting_link,
            description: self.description,
            instructor: self.instructor,
            material,
        }
    }
}

pub struct WorkshopCatalog {
    workshops: DynWorkshopStore,
    materials: DynMaterialStore,
}

impl WorkshopCatalog {
    #[must_use]
    pub fn new(workshops: DynWorkshopStore, materials: DynMaterialStore) -> Self {
        Self {
            workshops,
            materials,
        }
    }

    /// Empty uploads count as "no material".
    async fn store_material(
        &self,
        material: Option<Material>,
    ) -> Result<Option<String>, RegistryError> {
        match material {
            Some(material) if !material.is_empty() => Ok(Some(
                self.materials
                    .store(material.bytes, &material.file_name)
                    .await?,
            )),
            _ => Ok(None),
        }
    }

    #[instrument(skip_all, fields(name = %details.name))]
    pub async fn create_workshop(
        &self,
        details: WorkshopDetails,
        material: Option<Material>,
    ) -> Result<Workshop, RegistryError> {
        let material = self.store_material(material).await?;
        let workshop = self
            .workshops
            .insert_workshop(details.into_draft(material))
            .await?;
        info!(workshop_id = workshop.id, "created workshop");
        Ok(workshop)
    }

    pub async fn list_workshops(&self) -> Result<Vec<Workshop>, RegistryError> {
        Ok(self.workshops.list_workshops().await?)
    }

    pub async fn get_workshop_by_id(&self, id: i64) -> Result<Workshop, RegistryError> {
        self.workshops
            .find_workshop(id)
            .await?
            .ok_or(RegistryError::WorkshopNotFound(id))
    }

    /// Replaces the descriptive fields. The material reference only changes
    /// when a non-empty upload is given.
    #[instrument(skip(self, details, material))]
    pub async fn update_workshop(
        &self,
        id: i64,
        details: WorkshopDetails,
        material: Option<Material>,
    ) -> Result<Workshop, RegistryError> {
        // avoid writing a material file for a workshop that does not exist
        self.get_workshop_by_id(id).await?;
        let material = self.store_material(material).await?;
        let workshop = self
            .workshops
            .update_workshop(id, details.into_draft(material))
            .await?
            .ok_or(RegistryError::WorkshopNotFound(id))?;
        info!("updated workshop");
        Ok(workshop)
    }

    #[instrument(skip(self))]
    pub async fn delete_workshop(&self, id: i64) -> Result<(), RegistryError> {
        if self.workshops.delete_workshop(id).await? {
            info!("deleted workshop");
            Ok(())
        } else {
            warn!("workshop to delete does not exist");
            Err(RegistryError::WorkshopNotFound(id))
        }
    }

    pub async fn material(&self, reference: &str) -> Result<Bytes, RegistryError> {
        self.materials
            .retrieve(reference)
            .await?
            .ok_or_else(|| RegistryError::MaterialNotFound(reference.to_owned()))
    }
}
