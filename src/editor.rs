// ============================================================================
// EDITOR — the narrow interface the UI collaborator drives
// ============================================================================

use image::RgbImage;

use crate::engine::{self, Preview, PreviewParams};
use crate::error::Error;
use crate::ops::adjustments;
use crate::record::{ChannelFilter, EditAction, ImageRecord, Region};

/// One loaded photo plus its pending edit history.
///
/// Every successful `record_*` call is a single logical transaction:
/// append to the history, then synchronously recompute the display by
/// replaying from the original (commit mode). The cached replay result
/// only ever holds the geometric actions; the channel filter is applied
/// on the way out, so live previews of a filter change stay cheap and
/// exactly match what a commit would show.
#[derive(Clone)]
pub struct Editor {
    record: ImageRecord,
    /// Cached replay of the geometric history, channel filter not applied.
    base: RgbImage,
    params: PreviewParams,
}

impl Editor {
    /// Adopt a decoded pixel grid as a fresh record with empty history.
    ///
    /// An empty grid means the source produced nothing usable and is
    /// rejected as a decode failure.
    pub fn load(pixels: RgbImage) -> Result<Self, Error> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(Error::Decode {
                reason: "source produced an empty pixel grid".into(),
            });
        }
        let record = ImageRecord::new(pixels);
        let base = record.original().clone();
        Ok(Self {
            record,
            base,
            params: PreviewParams::default(),
        })
    }

    /// Override the preview canvas geometry/fill.
    pub fn with_preview_params(mut self, params: PreviewParams) -> Self {
        self.params = params;
        self
    }

    fn refresh(&mut self) {
        self.base = engine::replay(&self.record);
    }

    /// Record a crop. The box is validated here, before anything is
    /// appended: rejection leaves the history untouched.
    pub fn record_crop(&mut self, region: Region) -> Result<(), Error> {
        if region.is_degenerate() {
            return Err(Error::InvalidBounds(region));
        }
        self.record.push(EditAction::Crop(region));
        self.refresh();
        Ok(())
    }

    /// Record a rotation in degrees (positive = counter-clockwise).
    ///
    /// Consecutive rotations coalesce into one summed entry, so spinning
    /// the dial five times replays as a single resample.
    pub fn record_rotate(&mut self, degrees: i32) {
        if let Some(EditAction::Rotate(previous)) = self.record.last_mut() {
            *previous += degrees;
        } else {
            self.record.push(EditAction::Rotate(degrees));
        }
        self.refresh();
    }

    /// Record a blue rectangle annotation. Corners may arrive in any
    /// order; nothing to validate at record time.
    pub fn record_draw(&mut self, region: Region) {
        self.record.push(EditAction::Draw(region));
        self.refresh();
    }

    /// Record a channel selection (latest entry wins). No geometric work,
    /// so the cached replay stays valid as-is.
    pub fn set_channel(&mut self, filter: ChannelFilter) {
        self.record.push(EditAction::SetChannel(filter));
    }

    /// The channel selection currently in effect.
    pub fn channel(&self) -> ChannelFilter {
        self.record.channel()
    }

    /// The record backing this editor.
    pub fn record(&self) -> &ImageRecord {
        &self.record
    }

    /// Logical (pre-letterbox) size of the displayed image.
    pub fn logical_size(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    /// The current display buffer at logical size: replayed history with
    /// the channel filter applied.
    pub fn displayed(&self) -> RgbImage {
        let mut pixels = self.base.clone();
        adjustments::isolate_channel(&mut pixels, self.record.channel());
        pixels
    }

    /// Letterboxed preview plus the logical size the UI re-bounds its
    /// coordinate inputs with.
    pub fn current_preview(&self) -> Preview {
        let displayed = self.displayed();
        let (logical_width, logical_height) = displayed.dimensions();
        Preview {
            buffer: engine::letterbox(&displayed, self.params),
            logical_width,
            logical_height,
        }
    }

    /// Live-preview mode: apply `action` on top of the current display
    /// without recording it.
    ///
    /// Pixel-identical to what committing the same action would show, with
    /// one documented exception: a rotation peeked over an existing
    /// trailing rotation resamples twice where the commit path coalesces
    /// both angles into a single resample.
    pub fn peek(&self, action: EditAction) -> RgbImage {
        let mut filter = self.record.channel();
        let mut pixels = match action {
            EditAction::SetChannel(selected) => {
                filter = selected;
                self.base.clone()
            }
            geometric => engine::apply_action(self.base.clone(), &geometric),
        };
        adjustments::isolate_channel(&mut pixels, filter);
        pixels
    }

    /// Discard all history: the currently displayed pixels become the new
    /// original, the action list empties, and the channel selection
    /// resets. The preview is unchanged by this call; it merely stops
    /// being derived.
    pub fn reset(&mut self) {
        let displayed = self.displayed();
        self.record = ImageRecord::new(displayed.clone());
        self.base = displayed;
    }
}
