pub mod attendance;
pub mod catalog;
pub mod error;
pub mod materials;
pub mod registration;
pub mod routes;
pub mod telemetry;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::extract::FromRef;
use axum::Router;
use error::AppError;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use workshop_registry_config::Config;
use workshop_registry_database::postgres::PgStore;
use workshop_registry_database::store::{
    AttendanceStore, DynAttendanceStore, DynRegistrationStore, DynUserDirectory,
    DynWorkshopStore, RegistrationStore, UserDirectory, WorkshopStore,
};
use workshop_registry_database::{get_database_connection, run_migrations};

use crate::attendance::AttendanceLedger;
use crate::catalog::WorkshopCatalog;
use crate::materials::{DiskMaterialStore, DynMaterialStore};
use crate::registration::RegistrationLedger;

/// The components every handler may extract.
#[derive(Clone, FromRef)]
pub struct AppState {
    catalog: Arc<WorkshopCatalog>,
    registrations: Arc<RegistrationLedger>,
    attendance: Arc<AttendanceLedger>,
}

impl AppState {
    #[must_use]
    pub fn new(
        workshops: DynWorkshopStore,
        users: DynUserDirectory,
        registrations: DynRegistrationStore,
        attendance: DynAttendanceStore,
        materials: DynMaterialStore,
    ) -> Self {
        let catalog = Arc::new(WorkshopCatalog::new(workshops, materials));
        Self {
            registrations: Arc::new(RegistrationLedger::new(
                registrations,
                Arc::clone(&catalog),
                Arc::clone(&users),
            )),
            attendance: Arc::new(AttendanceLedger::new(
                attendance,
                Arc::clone(&catalog),
                users,
            )),
            catalog,
        }
    }

    /// Wires every component to one store that implements all persistence traits.
    #[must_use]
    pub fn with_store<S>(store: Arc<S>, materials: DynMaterialStore) -> Self
    where
        S: WorkshopStore + UserDirectory + RegistrationStore + AttendanceStore,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            materials,
        )
    }
}

pub async fn setup_server(config: &Config) -> Result<Router, AppError> {
    info!("starting up server...");

    let pool = get_database_connection(&config.database_url)?;
    run_migrations(&pool).await?;

    let state = AppState::with_store(
        Arc::new(PgStore::new(pool)),
        Arc::new(DiskMaterialStore::new(&config.materials_dir)),
    );
    Ok(routes::router(state))
}

pub async fn run_server(config: Config) -> Result<(), AppError> {
    let app = setup_server(&config).await?;

    let listener = TcpListener::bind(&config.listen_address).await?;
    info!(address = %config.listen_address, "started up server...");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    warn!("SHUTDOWN");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
