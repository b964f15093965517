use serde::{Deserialize, Serialize};

use crate::models::SessionAssets;

/// The shot a capture flow is currently waiting on.
///
/// Derived from [`CaptureProgress`]; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapturePhase {
    StartWorkspace,
    StartSelfie,
    EndWorkspace,
    EndSelfie,
}

impl CapturePhase {
    pub fn label(&self) -> &'static str {
        match self {
            CapturePhase::StartWorkspace => "Workspace Start",
            CapturePhase::StartSelfie => "Selfie Start",
            CapturePhase::EndWorkspace => "Workspace End",
            CapturePhase::EndSelfie => "Selfie End",
        }
    }

    pub fn is_end_bracket(&self) -> bool {
        matches!(self, CapturePhase::EndWorkspace | CapturePhase::EndSelfie)
    }
}

/// Everything captured so far in the current session, as one tagged union so
/// a stored asset can never disagree with the active phase.
#[derive(Debug, Clone, Default)]
pub enum CaptureProgress {
    #[default]
    Empty,
    HaveWorkspaceStart {
        workspace_start: Vec<u8>,
    },
    StartDone {
        workspace_start: Vec<u8>,
        selfie_start: Vec<u8>,
    },
    HaveWorkspaceEnd {
        workspace_start: Vec<u8>,
        selfie_start: Vec<u8>,
        workspace_end: Vec<u8>,
    },
    Complete(SessionAssets),
}

impl CaptureProgress {
    /// The shot an open bracket is waiting on, or None when no flow is active.
    pub fn active_phase(&self, bracket_open: bool) -> Option<CapturePhase> {
        if !bracket_open {
            return None;
        }
        match self {
            CaptureProgress::Empty => Some(CapturePhase::StartWorkspace),
            CaptureProgress::HaveWorkspaceStart { .. } => Some(CapturePhase::StartSelfie),
            CaptureProgress::StartDone { .. } => Some(CapturePhase::EndWorkspace),
            CaptureProgress::HaveWorkspaceEnd { .. } => Some(CapturePhase::EndSelfie),
            CaptureProgress::Complete(_) => None,
        }
    }

    /// Folds one accepted photo into the next slot. A complete session is
    /// returned unchanged.
    pub fn advanced_with(self, photo: Vec<u8>) -> Self {
        match self {
            CaptureProgress::Empty => CaptureProgress::HaveWorkspaceStart {
                workspace_start: photo,
            },
            CaptureProgress::HaveWorkspaceStart { workspace_start } => {
                CaptureProgress::StartDone {
                    workspace_start,
                    selfie_start: photo,
                }
            }
            CaptureProgress::StartDone {
                workspace_start,
                selfie_start,
            } => CaptureProgress::HaveWorkspaceEnd {
                workspace_start,
                selfie_start,
                workspace_end: photo,
            },
            CaptureProgress::HaveWorkspaceEnd {
                workspace_start,
                selfie_start,
                workspace_end,
            } => CaptureProgress::Complete(SessionAssets {
                workspace_start,
                selfie_start,
                workspace_end,
                selfie_end: photo,
            }),
            complete @ CaptureProgress::Complete(_) => complete,
        }
    }

    /// End-bracket cancel: drops the end pair, keeps the start pair so the
    /// session can resume without retaking the start photos.
    pub fn discard_end_bracket(self) -> Self {
        match self {
            CaptureProgress::HaveWorkspaceEnd {
                workspace_start,
                selfie_start,
                ..
            } => CaptureProgress::StartDone {
                workspace_start,
                selfie_start,
            },
            other => other,
        }
    }
}
