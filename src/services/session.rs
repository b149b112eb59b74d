use crate::models::classify_types::Material;
use crate::models::flow_types::{Effect, FlowEvent, FlowState};
use crate::services::adapters::{CameraAdapter, GalleryAdapter};
use crate::services::classifier::ClassifyImage;
use crate::services::flow_service::FlowMachine;
use crate::services::scratch_service::ScratchStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Minimum visible duration of the Classifying state. Purely perceptual:
/// the completion event is held back, never the inference thread.
pub const MIN_LOADING: Duration = Duration::from_millis(1800);

/// Cloneable front door for user intents. Dropping every handle does not
/// stop the session; `shutdown` does.
#[derive(Clone)]
pub struct FlowHandle {
    tx: mpsc::UnboundedSender<FlowEvent>,
}

impl FlowHandle {
    pub fn open_camera(&self) {
        let _ = self.tx.send(FlowEvent::OpenCamera);
    }

    pub fn open_gallery(&self) {
        let _ = self.tx.send(FlowEvent::OpenGallery);
    }

    pub fn back(&self) {
        let _ = self.tx.send(FlowEvent::Back);
    }

    /// The user confirmed the photo ("send").
    pub fn confirm(&self) {
        let _ = self.tx.send(FlowEvent::Send);
    }

    pub fn new_scan(&self) {
        let _ = self.tx.send(FlowEvent::NewScan);
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(FlowEvent::Shutdown);
    }
}

/// Drives one classification session: a single event loop owns the state
/// machine (the interactive-thread equivalent), executes its effects, and
/// publishes every new state on a watch channel. Heavy work (platform
/// adapters, the classifier) runs on blocking threads and reports back
/// through the same event queue.
pub struct FlowSession {
    machine: FlowMachine,
    scratch: ScratchStore,
    classifier: Arc<dyn ClassifyImage>,
    camera: Arc<dyn CameraAdapter>,
    gallery: Arc<dyn GalleryAdapter>,
    min_loading: Duration,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    state_tx: watch::Sender<FlowState>,
}

impl FlowSession {
    pub fn new(
        scratch: ScratchStore,
        classifier: Arc<dyn ClassifyImage>,
        camera: Arc<dyn CameraAdapter>,
        gallery: Arc<dyn GalleryAdapter>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(FlowState::Home);
        Self {
            machine: FlowMachine::new(),
            scratch,
            classifier,
            camera,
            gallery,
            min_loading: MIN_LOADING,
            events_tx,
            events_rx,
            state_tx,
        }
    }

    pub fn with_min_loading(mut self, min_loading: Duration) -> Self {
        self.min_loading = min_loading;
        self
    }

    pub fn handle(&self) -> FlowHandle {
        FlowHandle {
            tx: self.events_tx.clone(),
        }
    }

    pub fn watch_state(&self) -> watch::Receiver<FlowState> {
        self.state_tx.subscribe()
    }

    /// Process events until `Shutdown`, then release the model session.
    pub async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            let stopping = matches!(event, FlowEvent::Shutdown);
            let effects = self.machine.handle(event);
            // Effects run before the state is published, so an observed
            // state already reflects its cleanup.
            for effect in effects {
                self.execute(effect);
            }
            let _ = self.state_tx.send(self.machine.state().clone());
            if stopping {
                break;
            }
        }
        self.classifier.release();
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::LaunchCapture => {
                let scratch = match self.scratch.create_scratch_file() {
                    Ok(image) => image,
                    Err(e) => {
                        eprintln!("Failed to allocate scratch file: {}", e);
                        let _ = self.events_tx.send(FlowEvent::CaptureAborted);
                        return;
                    }
                };
                let camera = self.camera.clone();
                let tx = self.events_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let outcome = camera.request_capture(&scratch);
                    let _ = tx.send(FlowEvent::CaptureReturned { scratch, outcome });
                });
            }
            Effect::LaunchSelection => {
                let gallery = self.gallery.clone();
                let tx = self.events_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let outcome = gallery.request_selection();
                    let _ = tx.send(FlowEvent::SelectionReturned(outcome));
                });
            }
            Effect::StartClassification { image, request } => {
                let classifier = self.classifier.clone();
                let tx = self.events_tx.clone();
                let min_loading = self.min_loading;
                tokio::spawn(async move {
                    let started = Instant::now();
                    let worker =
                        tokio::task::spawn_blocking(move || classifier.classify(&image));
                    // A panicked worker degrades to Undefined.
                    let material = worker.await.unwrap_or(Material::Undefined);

                    let elapsed = started.elapsed();
                    if elapsed < min_loading {
                        tokio::time::sleep(min_loading - elapsed).await;
                    }
                    let _ = tx.send(FlowEvent::ClassificationFinished { request, material });
                });
            }
            Effect::DeleteImage(image) => self.scratch.delete(&image),
        }
    }
}
