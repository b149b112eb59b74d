use crate::error::ClassifierError;
use crate::models::classify_types::ModelStatus;
use ort::session::Session;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Owns the inference session. Construction is expensive (the model file
/// is multi-megabyte), so the session is built lazily on first use,
/// reused for the lifetime of the classification session and dropped by
/// `release`.
#[derive(Clone)]
pub struct ModelManager {
    model_path: PathBuf,
    session: Arc<Mutex<Option<Session>>>,
    error: Arc<Mutex<Option<String>>>,
}

impl ModelManager {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            session: Arc::new(Mutex::new(None)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }

    pub fn is_ready(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            ready: self.is_ready(),
            error: self.error.lock().unwrap().clone(),
        }
    }

    /// Run `f` against the live session, loading it first if needed. The
    /// lock is held for the whole call: inference is serial by contract
    /// (one request in flight).
    pub fn with_session<T>(
        &self,
        f: impl FnOnce(&mut Session) -> Result<T, ClassifierError>,
    ) -> Result<T, ClassifierError> {
        let mut guard = self.session.lock().unwrap();
        if guard.is_none() {
            match self.build_session() {
                Ok(session) => {
                    *guard = Some(session);
                    *self.error.lock().unwrap() = None;
                }
                Err(e) => {
                    *self.error.lock().unwrap() = Some(e.to_string());
                    return Err(e);
                }
            }
        }
        match guard.as_mut() {
            Some(session) => f(session),
            None => Err(ClassifierError::Model("session unavailable".to_string())),
        }
    }

    fn build_session(&self) -> Result<Session, ClassifierError> {
        if !self.model_path.exists() {
            return Err(ClassifierError::Model(format!(
                "model file not found: {}",
                self.model_path.display()
            )));
        }

        let _ = ort::init().with_name("recycle-scan").commit();

        let session = Session::builder()
            .map_err(|e| ClassifierError::Model(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| ClassifierError::Model(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(4)
            .map_err(|e| ClassifierError::Model(format!("Failed to set intra threads: {}", e)))?
            .with_execution_providers([
                ort::execution_providers::CPUExecutionProvider::default().build(),
            ])
            .map_err(|e| ClassifierError::Model(format!("Failed to register execution provider: {}", e)))?
            .commit_from_file(&self.model_path)
            .map_err(|e| ClassifierError::Model(format!("Failed to load model: {}", e)))?;

        Ok(session)
    }

    /// Drop the loaded session. The next `with_session` call reloads.
    pub fn release(&self) {
        *self.session.lock().unwrap() = None;
    }
}
