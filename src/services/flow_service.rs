use crate::models::flow_types::{CaptureOutcome, Effect, FlowEvent, FlowState, SelectionOutcome};

/// The flow controller's state machine. One event in, one new state plus
/// the side effects the driver must execute. Events that are not legal in
/// the current state are ignored: state unchanged, no effects.
///
/// Each classification request carries a monotonically increasing ticket;
/// a completion whose ticket does not match the live request is stale and
/// must not move the state.
#[derive(Debug)]
pub struct FlowMachine {
    state: FlowState,
    next_request: u64,
}

impl FlowMachine {
    pub fn new() -> Self {
        Self {
            state: FlowState::Home,
            next_request: 1,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn handle(&mut self, event: FlowEvent) -> Vec<Effect> {
        let current = std::mem::replace(&mut self.state, FlowState::Home);
        let (next, effects) = self.transition(current, event);
        self.state = next;
        effects
    }

    fn transition(&mut self, state: FlowState, event: FlowEvent) -> (FlowState, Vec<Effect>) {
        match (state, event) {
            (FlowState::Home, FlowEvent::OpenCamera) => {
                (FlowState::Capturing, vec![Effect::LaunchCapture])
            }
            (FlowState::Home, FlowEvent::OpenGallery) => {
                (FlowState::Selecting, vec![Effect::LaunchSelection])
            }

            (FlowState::Capturing, FlowEvent::CaptureReturned { scratch, outcome }) => {
                match outcome {
                    CaptureOutcome::Captured(image) => {
                        (FlowState::Confirming { image, owned: true }, vec![])
                    }
                    CaptureOutcome::Cancelled | CaptureOutcome::PermissionDenied => {
                        (FlowState::Home, vec![Effect::DeleteImage(scratch)])
                    }
                }
            }
            // Scratch allocation failed; there is nothing to clean up.
            (FlowState::Capturing, FlowEvent::CaptureAborted) => (FlowState::Home, vec![]),

            (FlowState::Selecting, FlowEvent::SelectionReturned(outcome)) => match outcome {
                SelectionOutcome::Selected(image) => {
                    (FlowState::Confirming { image, owned: false }, vec![])
                }
                SelectionOutcome::Cancelled => (FlowState::Home, vec![]),
            },

            (FlowState::Confirming { image, owned }, FlowEvent::Back) => {
                let effects = if owned {
                    vec![Effect::DeleteImage(image)]
                } else {
                    vec![]
                };
                (FlowState::Home, effects)
            }
            (FlowState::Confirming { image, owned }, FlowEvent::Send) => {
                let request = self.next_request;
                self.next_request += 1;
                // The file is still needed downstream; no cleanup here.
                let effects = vec![Effect::StartClassification {
                    image: image.clone(),
                    request,
                }];
                (FlowState::Classifying { image, owned, request }, effects)
            }

            (
                FlowState::Classifying { image, owned, request },
                FlowEvent::ClassificationFinished { request: finished, material },
            ) => {
                if finished == request {
                    (FlowState::Result { image, owned, material }, vec![])
                } else {
                    (FlowState::Classifying { image, owned, request }, vec![])
                }
            }
            (FlowState::Classifying { image, owned, .. }, FlowEvent::Back) => {
                (FlowState::Confirming { image, owned }, vec![])
            }

            (FlowState::Result { image, owned, .. }, FlowEvent::NewScan)
            | (FlowState::Result { image, owned, .. }, FlowEvent::Back) => {
                let effects = if owned {
                    vec![Effect::DeleteImage(image)]
                } else {
                    vec![]
                };
                (FlowState::Home, effects)
            }

            // Session teardown: release whatever owned reference is still
            // in flight so no scratch file outlives the session.
            (state, FlowEvent::Shutdown) => {
                let effects = match state {
                    FlowState::Confirming { image, owned: true }
                    | FlowState::Classifying { image, owned: true, .. }
                    | FlowState::Result { image, owned: true, .. } => {
                        vec![Effect::DeleteImage(image)]
                    }
                    _ => vec![],
                };
                (FlowState::Home, effects)
            }

            (state, _) => (state, vec![]),
        }
    }
}

impl Default for FlowMachine {
    fn default() -> Self {
        Self::new()
    }
}
