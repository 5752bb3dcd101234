use thiserror::Error;

use crate::capture::PROBE_LIMIT;
use crate::record::Region;

/// Everything that can go wrong while driving the editor.
///
/// All variants surface synchronously and block the action that raised
/// them; nothing is retried automatically. The only tolerated failures are
/// the best-effort no-ops inside the replay walk, which are by definition
/// not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read, or its contents did not decode to a
    /// usable pixel grid.
    #[error("could not decode image: {reason}")]
    Decode { reason: String },

    /// Frame acquisition failed after the bounded device probe.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// A crop box with non-positive width or height, rejected at record
    /// time before anything is appended to the history.
    #[error("invalid crop bounds {0}: width and height must be positive")]
    InvalidBounds(Region),

    /// The edited image could not be encoded or written.
    #[error("could not save image: {reason}")]
    Encode { reason: String },
}

/// Why a webcam snapshot produced no frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// No device answered anywhere in the probe range.
    #[error("no camera responded on device indices 0..{PROBE_LIMIT}")]
    NoCamera,

    /// A device answered the probe but failed to deliver a frame.
    #[error("camera {index} responded but failed to deliver a frame")]
    NoFrame { index: u32 },
}
