// ============================================================================
// EDIT RECORD — immutable original + ordered action history
// ============================================================================

use std::fmt;

use image::RgbImage;

/// A `(y1, y2, x1, x2)` integer pixel box.
///
/// Crop treats it as the half-open row/column ranges `[y1, y2) × [x1, x2)`;
/// rectangle drawing treats `(x1, y1)` and `(x2, y2)` as opposite corners
/// in whichever order the user supplied them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub y1: u32,
    pub y2: u32,
    pub x1: u32,
    pub x2: u32,
}

impl Region {
    pub fn new(y1: u32, y2: u32, x1: u32, x2: u32) -> Self {
        Self { y1, y2, x1, x2 }
    }

    /// True when the half-open box spans zero rows or zero columns.
    pub fn is_degenerate(&self) -> bool {
        self.y2 <= self.y1 || self.x2 <= self.x1
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y[{}..{}) x[{}..{})",
            self.y1, self.y2, self.x1, self.x2
        )
    }
}

/// Which color channel is visually isolated in the display.
///
/// This is a latest-wins selection, not a history: only the most recent
/// choice has any effect, and it is applied once as the final replay step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelFilter {
    #[default]
    None,
    Red,
    Green,
    Blue,
}

impl ChannelFilter {
    pub fn label(&self) -> &'static str {
        match self {
            ChannelFilter::None => "No effect",
            ChannelFilter::Red => "Red",
            ChannelFilter::Green => "Green",
            ChannelFilter::Blue => "Blue",
        }
    }

    pub fn all() -> &'static [ChannelFilter] {
        &[
            ChannelFilter::None,
            ChannelFilter::Red,
            ChannelFilter::Green,
            ChannelFilter::Blue,
        ]
    }
}

/// One recorded edit.
///
/// The history is a single ordered sequence of these tagged records. The
/// interleaving order and the parameters travel together, so there are no
/// side lists to keep in lock-step and no way for a replay cursor to
/// desynchronize from the order of events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Keep only the pixels inside the box.
    Crop(Region),
    /// Degrees about the image center; positive = counter-clockwise.
    Rotate(i32),
    /// Stroke a 2 px blue rectangle outline.
    Draw(Region),
    /// Select the isolated color channel (latest entry wins).
    SetChannel(ChannelFilter),
}

/// A loaded photo plus everything recorded against it.
///
/// The original pixels are fixed at construction and never touched again;
/// every displayed buffer is derived from them by replaying `actions` in
/// order. A record is replaced wholesale on load, capture, and reset;
/// there is no partial rollback.
#[derive(Clone)]
pub struct ImageRecord {
    original: RgbImage,
    actions: Vec<EditAction>,
}

impl ImageRecord {
    /// Adopt `original` as a fresh record with an empty history.
    pub fn new(original: RgbImage) -> Self {
        Self {
            original,
            actions: Vec::new(),
        }
    }

    /// The pixels everything else is derived from.
    pub fn original(&self) -> &RgbImage {
        &self.original
    }

    /// The recorded history, oldest first.
    pub fn actions(&self) -> &[EditAction] {
        &self.actions
    }

    /// Append one action to the history.
    pub fn push(&mut self, action: EditAction) {
        self.actions.push(action);
    }

    /// Mutable access to the newest entry (rotation coalescing).
    pub fn last_mut(&mut self) -> Option<&mut EditAction> {
        self.actions.last_mut()
    }

    /// The channel selection currently in effect: the newest `SetChannel`
    /// entry, or `None` when nothing was selected yet.
    pub fn channel(&self) -> ChannelFilter {
        self.actions
            .iter()
            .rev()
            .find_map(|action| match action {
                EditAction::SetChannel(filter) => Some(*filter),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// True when nothing has been recorded since construction.
    pub fn is_unedited(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> RgbImage {
        RgbImage::new(4, 4)
    }

    #[test]
    fn fresh_record_is_unedited() {
        let record = ImageRecord::new(blank());
        assert!(record.is_unedited());
        assert_eq!(record.channel(), ChannelFilter::None);
    }

    #[test]
    fn actions_keep_record_order() {
        let mut record = ImageRecord::new(blank());
        record.push(EditAction::Crop(Region::new(0, 2, 0, 2)));
        record.push(EditAction::Rotate(90));
        record.push(EditAction::Draw(Region::new(0, 1, 0, 1)));

        assert_eq!(
            record.actions(),
            &[
                EditAction::Crop(Region::new(0, 2, 0, 2)),
                EditAction::Rotate(90),
                EditAction::Draw(Region::new(0, 1, 0, 1)),
            ]
        );
    }

    #[test]
    fn latest_channel_selection_wins() {
        let mut record = ImageRecord::new(blank());
        record.push(EditAction::SetChannel(ChannelFilter::Red));
        record.push(EditAction::Crop(Region::new(0, 2, 0, 2)));
        record.push(EditAction::SetChannel(ChannelFilter::Blue));
        assert_eq!(record.channel(), ChannelFilter::Blue);
    }

    #[test]
    fn degenerate_boxes_are_detected() {
        assert!(Region::new(5, 5, 0, 10).is_degenerate());
        assert!(Region::new(0, 10, 7, 3).is_degenerate());
        assert!(!Region::new(0, 1, 0, 1).is_degenerate());
    }
}
