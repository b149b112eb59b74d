pub mod inference;
pub mod model_manager;

use crate::error::ClassifierError;
use crate::models::classify_types::{material_for_class, Material};
use crate::models::flow_types::ImageRef;
use crate::services::scratch_service::ScratchStore;
use model_manager::ModelManager;
use std::path::PathBuf;

/// Seam between the flow and the engine. `classify` is total: whatever the
/// input, one of the five fixed labels comes back.
pub trait ClassifyImage: Send + Sync {
    fn classify(&self, image: &ImageRef) -> Material;

    /// Drop any expensive resources held for the classification session.
    fn release(&self) {}
}

/// The real engine: resolve, decode, resample, tensorize, infer, map.
pub struct WasteClassifier {
    store: ScratchStore,
    manager: ModelManager,
}

impl WasteClassifier {
    pub fn new(store: ScratchStore, model_path: PathBuf) -> Self {
        Self {
            store,
            manager: ModelManager::new(model_path),
        }
    }

    pub fn manager(&self) -> &ModelManager {
        &self.manager
    }

    fn try_classify(&self, image: &ImageRef) -> Result<Material, ClassifierError> {
        let path = self
            .store
            .resolve(image)
            .ok_or_else(|| ClassifierError::Decode(format!("unresolvable reference {}", image.as_uri())))?;

        let decoded = inference::decode_image(&path)?;
        let tensor = inference::preprocess(&decoded)?;
        let scores = self
            .manager
            .with_session(|session| inference::run_model(session, tensor))?;

        let best = inference::argmax(&scores);
        Ok(material_for_class(best))
    }
}

impl ClassifyImage for WasteClassifier {
    fn classify(&self, image: &ImageRef) -> Material {
        match self.try_classify(image) {
            Ok(material) => material,
            Err(e) => {
                eprintln!("Failed to classify {}: {}", image.as_uri(), e);
                Material::Undefined
            }
        }
    }

    fn release(&self) {
        self.manager.release();
    }
}
