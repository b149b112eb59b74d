use crate::models::flow_types::{CaptureOutcome, ImageRef, SelectionOutcome};

/// Platform camera, invoked with a scratch file prepared by the flow. The
/// implementation is the embedder's: it shows the capture UI, writes the
/// photo into `scratch` and reports how the interaction ended. Called on a
/// blocking thread, so it may block for as long as the user takes.
pub trait CameraAdapter: Send + Sync {
    fn request_capture(&self, scratch: &ImageRef) -> CaptureOutcome;
}

/// Platform media picker for an existing image. No scratch file is
/// involved and the returned reference is never owned by the flow.
pub trait GalleryAdapter: Send + Sync {
    fn request_selection(&self) -> SelectionOutcome;
}
