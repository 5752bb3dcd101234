// ============================================================================
// REPLAY ENGINE — derive the display from the original + action history
// ============================================================================
//
// The engine never edits in place across calls: every recompute starts from
// a throwaway copy of the record's original and replays the history in
// order. Undo is therefore "discard history", not an inverse transform,
// and edits compose the same way no matter how often the display is
// rebuilt.

use image::{Rgb, RgbImage, imageops, imageops::FilterType};

use crate::ops::{adjustments, shapes, transform};
use crate::record::{EditAction, ImageRecord};

/// Logical size of the fixed preview canvas.
pub const PREVIEW_WIDTH: u32 = 1000;
pub const PREVIEW_HEIGHT: u32 = 500;

/// Geometry and border fill of the letterbox canvas.
#[derive(Clone, Copy, Debug)]
pub struct PreviewParams {
    pub width: u32,
    pub height: u32,
    pub fill: Rgb<u8>,
}

impl Default for PreviewParams {
    fn default() -> Self {
        Self {
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
            fill: Rgb([255, 255, 255]),
        }
    }
}

/// A letterboxed preview plus the logical (pre-letterbox) size the UI uses
/// to label itself and re-bound its coordinate inputs.
#[derive(Clone)]
pub struct Preview {
    pub buffer: RgbImage,
    pub logical_width: u32,
    pub logical_height: u32,
}

/// Apply one action to a working buffer.
///
/// `SetChannel` does no pixel work at its position in the walk: the filter
/// is a latest-wins selection applied once, after all geometric actions.
pub fn apply_action(pixels: RgbImage, action: &EditAction) -> RgbImage {
    match action {
        EditAction::Crop(region) => transform::crop(&pixels, *region),
        EditAction::Rotate(degrees) => transform::rotate_expanded(&pixels, *degrees as f32),
        EditAction::Draw(region) => {
            let mut pixels = pixels;
            shapes::stroke_rect(
                &mut pixels,
                *region,
                shapes::ANNOTATION_BLUE,
                shapes::OUTLINE_THICKNESS,
            );
            pixels
        }
        EditAction::SetChannel(_) => pixels,
    }
}

/// Replay every recorded action, in order, against a copy of the original.
/// Returns the pre-filter buffer; [`render`] applies the channel selection.
pub fn replay(record: &ImageRecord) -> RgbImage {
    let mut pixels = record.original().clone();
    for action in record.actions() {
        pixels = apply_action(pixels, action);
    }
    pixels
}

/// Full commit-mode recompute: replay the history, then apply the latest
/// channel selection as the final step.
pub fn render(record: &ImageRecord) -> RgbImage {
    let mut pixels = replay(record);
    adjustments::isolate_channel(&mut pixels, record.channel());
    pixels
}

/// Scale `pixels` to fit the fixed canvas while preserving aspect ratio,
/// center it at integer offsets, and fill the border.
///
/// The fit mirrors the display routine this replaces: width is fitted
/// first, and only if the resulting height overflows is the scale re-fitted
/// by height, truncating intermediate sizes to whole pixels.
pub fn letterbox(pixels: &RgbImage, params: PreviewParams) -> RgbImage {
    let (w, h) = pixels.dimensions();
    let mut canvas = RgbImage::from_pixel(params.width, params.height, params.fill);
    if w == 0 || h == 0 {
        return canvas;
    }

    let mut scaled_w = params.width;
    let mut scaled_h = (h as f64 * (params.width as f64 / w as f64)) as u32;
    if scaled_h > params.height {
        let ratio = params.height as f64 / scaled_h as f64;
        scaled_h = params.height;
        scaled_w = (scaled_w as f64 * ratio) as u32;
    }
    let scaled_w = scaled_w.max(1);
    let scaled_h = scaled_h.max(1);

    let scaled = imageops::resize(pixels, scaled_w, scaled_h, FilterType::Triangle);
    let off_x = ((params.width - scaled_w) / 2) as i64;
    let off_y = ((params.height - scaled_h) / 2) as i64;
    imageops::replace(&mut canvas, &scaled, off_x, off_y);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ChannelFilter, Region};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn replay_is_deterministic() {
        let mut record = ImageRecord::new(RgbImage::from_fn(8, 8, |x, y| {
            Rgb([(x * 30) as u8, (y * 30) as u8, 77])
        }));
        record.push(EditAction::Crop(Region::new(1, 7, 1, 7)));
        record.push(EditAction::Rotate(45));
        record.push(EditAction::Draw(Region::new(0, 3, 0, 3)));
        record.push(EditAction::SetChannel(ChannelFilter::Green));

        let first = render(&record);
        let second = render(&record);
        let third = render(&record);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn channel_filter_applies_after_the_geometric_walk() {
        // A blue rectangle drawn before red isolation must come out black:
        // the filter acts on the finished buffer, not at its log position.
        let mut record = ImageRecord::new(RgbImage::from_pixel(6, 6, Rgb([200, 200, 200])));
        record.push(EditAction::SetChannel(ChannelFilter::Red));
        record.push(EditAction::Draw(Region::new(0, 5, 0, 5)));

        let out = render(&record);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]); // blue stroke, red kept
        assert_eq!(out.get_pixel(3, 3).0, [200, 0, 0]); // interior, red kept
    }

    #[test]
    fn letterbox_centers_a_wide_image() {
        let src = RgbImage::from_pixel(200, 50, Rgb([10, 20, 30]));
        let out = letterbox(&src, PreviewParams::default());
        assert_eq!(out.dimensions(), (1000, 500));

        // 200×50 fits width exactly: 1000×250, vertically centered.
        assert_eq!(out.get_pixel(0, 0), &WHITE);
        assert_eq!(out.get_pixel(500, 124), &WHITE);
        assert_eq!(out.get_pixel(500, 125).0, [10, 20, 30]);
        assert_eq!(out.get_pixel(500, 374).0, [10, 20, 30]);
        assert_eq!(out.get_pixel(500, 375), &WHITE);
    }

    #[test]
    fn letterbox_refits_a_tall_image_by_height() {
        let src = RgbImage::from_pixel(100, 400, Rgb([40, 50, 60]));
        let out = letterbox(&src, PreviewParams::default());

        // Width fit gives 1000×4000; the height re-fit shrinks to 125×500
        // with offsets ((1000-125)/2, 0).
        assert_eq!(out.get_pixel(436, 250), &WHITE);
        assert_eq!(out.get_pixel(437, 250).0, [40, 50, 60]);
        assert_eq!(out.get_pixel(561, 250).0, [40, 50, 60]);
        assert_eq!(out.get_pixel(562, 250), &WHITE);
        assert_eq!(out.get_pixel(500, 0).0, [40, 50, 60]);
    }

    #[test]
    fn letterbox_fill_is_configurable() {
        let src = RgbImage::from_pixel(200, 50, Rgb([1, 2, 3]));
        let params = PreviewParams {
            fill: Rgb([9, 9, 9]),
            ..PreviewParams::default()
        };
        let out = letterbox(&src, params);
        assert_eq!(out.get_pixel(0, 0).0, [9, 9, 9]);
    }

    #[test]
    fn white_square_crop_then_quarter_turn_end_to_end() {
        // 4×4 all-white → crop to 2×2 → rotate 90°: still 2×2 (square
        // quarter turns preserve dimensions), letterboxed into an all-white
        // 1000×500 canvas.
        let mut record = ImageRecord::new(RgbImage::from_pixel(4, 4, WHITE));
        record.push(EditAction::Crop(Region::new(0, 2, 0, 2)));
        record.push(EditAction::Rotate(90));

        let displayed = render(&record);
        assert_eq!(displayed.dimensions(), (2, 2));

        let preview = letterbox(&displayed, PreviewParams::default());
        assert!(preview.pixels().all(|p| *p == WHITE));
    }
}
