// ============================================================================
// FRAME CAPTURE — bounded device probe for webcam snapshots
// ============================================================================

use image::RgbImage;

use crate::error::CaptureError;

/// Device indices `0..PROBE_LIMIT` are tried, in order, before giving up.
pub const PROBE_LIMIT: u32 = 5;

/// A source of camera frames, addressed by device index.
///
/// Device enumeration and the actual hardware I/O belong to the embedding
/// UI layer; the core only drives the probe policy and consumes whatever
/// frame a source delivers.
pub trait FrameSource {
    /// True when a device answers on `index`.
    fn is_available(&mut self, index: u32) -> bool;

    /// Grab one frame from the device on `index`. `None` when the device
    /// answered the probe but failed to deliver.
    fn grab(&mut self, index: u32) -> Option<RgbImage>;
}

/// Probe device indices `0..PROBE_LIMIT` in order and grab one frame from
/// the first device that answers.
///
/// The linear probe is the only internal retry; any failure past it
/// surfaces immediately as a [`CaptureError`] and is never retried.
pub fn capture_frame<S: FrameSource>(source: &mut S) -> Result<RgbImage, CaptureError> {
    let index = (0..PROBE_LIMIT)
        .find(|&i| source.is_available(i))
        .ok_or(CaptureError::NoCamera)?;
    source.grab(index).ok_or(CaptureError::NoFrame { index })
}
