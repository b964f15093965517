use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraFacing {
    Front,
    Back,
}

/// Abstract camera capability consumed by the sequencer.
///
/// The core requests a facing and reads back which one is active; hardware
/// lifecycle, exposure, focus and shutter control live with the implementor.
/// Facing requests are made idempotent by checking `is_current_facing` first.
pub trait CameraCapability: Send + Sync + 'static {
    fn prepare(&self, facing: CameraFacing);
    fn is_current_facing(&self, facing: CameraFacing) -> bool;
    fn reset_to_default_facing(&self);
}
