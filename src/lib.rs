mod error;
mod models;
mod services;

pub use error::{ClassifierError, StorageError};
pub use models::classify_types::{material_for_class, Material, ModelStatus, FINE_CLASSES, NUM_CLASSES};
pub use models::flow_types::{
    CaptureOutcome, Effect, FlowEvent, FlowState, ImageRef, RefScheme, SelectionOutcome,
};
pub use services::adapters::{CameraAdapter, GalleryAdapter};
pub use services::classifier::model_manager::ModelManager;
pub use services::classifier::{ClassifyImage, WasteClassifier};
pub use services::flow_service::FlowMachine;
pub use services::scratch_service::ScratchStore;
pub use services::session::{FlowHandle, FlowSession, MIN_LOADING};
