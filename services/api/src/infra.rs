use metrics_exporter_prometheus::PrometheusHandle;
use puppyhub::config::FormConfig;
use puppyhub::error::AppError;
use puppyhub::workflows::adoption::application::{
    ApplicationFormService, FileStorage, MemoryStorage, PersistenceAdapter, SimulatedEndpoint,
    StorageError, StoragePort,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type FormService = ApplicationFormService<FormStorage, SimulatedEndpoint>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Backing store for saved progress, chosen from configuration.
#[derive(Debug, Clone)]
pub(crate) enum FormStorage {
    Memory(MemoryStorage),
    File(FileStorage),
}

impl FormStorage {
    pub(crate) fn from_config(config: &FormConfig) -> Result<Self, StorageError> {
        match &config.storage_dir {
            Some(dir) => FileStorage::open(dir).map(Self::File),
            None => Ok(Self::Memory(MemoryStorage::default())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            FormStorage::Memory(_) => "memory".to_string(),
            FormStorage::File(storage) => storage.base_path().display().to_string(),
        }
    }
}

impl StoragePort for FormStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            FormStorage::Memory(storage) => storage.get(key),
            FormStorage::File(storage) => storage.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            FormStorage::Memory(storage) => storage.set(key, value),
            FormStorage::File(storage) => storage.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            FormStorage::Memory(storage) => storage.remove(key),
            FormStorage::File(storage) => storage.remove(key),
        }
    }
}

pub(crate) fn build_form_service(config: &FormConfig) -> Result<Arc<FormService>, AppError> {
    let storage = FormStorage::from_config(config)?;
    info!(
        storage = %storage.describe(),
        slot = %config.storage_slot,
        submit_delay_ms = config.submit_delay.as_millis() as u64,
        "opening application form"
    );

    let persistence = PersistenceAdapter::new(Arc::new(storage), config.storage_slot.clone());
    let endpoint = Arc::new(SimulatedEndpoint::new(config.submit_delay));
    Ok(Arc::new(ApplicationFormService::new(persistence, endpoint)))
}
