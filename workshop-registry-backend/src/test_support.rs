use std::sync::Arc;

use tempfile::TempDir;
use workshop_registry_database::in_memory::InMemoryStore;

use crate::attendance::AttendanceLedger;
use crate::catalog::{WorkshopCatalog, WorkshopDetails};
use crate::error::RegistryError;
use crate::materials::DiskMaterialStore;
use crate::registration::RegistrationLedger;

pub fn details(name: &str) -> WorkshopDetails {
    WorkshopDetails {
        name: name.to_owned(),
        date: "2024-06-01".to_owned(),
        time: "10:00".to_owned(),
        meeting_link: "https://meet.example/rust".to_owned(),
        description: "ownership and borrowing".to_owned(),
        instructor: "ferris".to_owned(),
    }
}

/// In-memory registry with user `alice` (`a@x.com`) and one workshop.
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub catalog: Arc<WorkshopCatalog>,
    pub registrations: RegistrationLedger,
    pub attendance: AttendanceLedger,
    pub workshop_id: i64,
    _materials: TempDir,
}

pub async fn fixture() -> Result<Fixture, RegistryError> {
    let materials = tempfile::tempdir()?;
    let store = Arc::new(InMemoryStore::new());
    store.insert_user("alice", "a@x.com")?;

    let catalog = Arc::new(WorkshopCatalog::new(
        store.clone(),
        Arc::new(DiskMaterialStore::new(materials.path())),
    ));
    let workshop = catalog.create_workshop(details("rust"), None).await?;

    Ok(Fixture {
        registrations: RegistrationLedger::new(store.clone(), catalog.clone(), store.clone()),
        attendance: AttendanceLedger::new(store.clone(), catalog.clone(), store.clone()),
        store,
        catalog,
        workshop_id: workshop.id,
        _materials: materials,
    })
}
