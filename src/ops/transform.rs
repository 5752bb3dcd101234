// ============================================================================
// TRANSFORM OPERATIONS — crop and rotation for the replay pipeline
// ============================================================================

use image::{RgbImage, imageops};

use crate::record::Region;

/// Crop `src` to `region`, clamped to the buffer bounds.
///
/// Replay is best-effort: a box that is degenerate after clamping leaves
/// the buffer unchanged. Rejecting bad boxes is the recorder's job, not
/// the replayer's.
pub fn crop(src: &RgbImage, region: Region) -> RgbImage {
    let (w, h) = src.dimensions();
    let x1 = region.x1.min(w);
    let x2 = region.x2.min(w);
    let y1 = region.y1.min(h);
    let y2 = region.y2.min(h);
    if x2 <= x1 || y2 <= y1 {
        return src.clone();
    }
    imageops::crop_imm(src, x1, y1, x2 - x1, y2 - y1).to_image()
}

/// Rotate `src` about its center by `degrees` (positive = counter-clockwise),
/// expanding the canvas to the rotated bounding box so no corner is clipped.
///
/// Each output pixel is inverse-mapped into source space and bilinearly
/// sampled; anything falling outside the source is filled black. Exact for
/// multiples of 90°, resampled otherwise.
pub fn rotate_expanded(src: &RgbImage, degrees: f32) -> RgbImage {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return src.clone();
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let new_w = ((h as f32 * sin.abs()) + (w as f32 * cos.abs()))
        .round()
        .max(1.0) as u32;
    let new_h = ((h as f32 * cos.abs()) + (w as f32 * sin.abs()))
        .round()
        .max(1.0) as u32;

    // Pixel-centre coordinates of the rotation centres on both canvases.
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let ncx = (new_w as f32 - 1.0) * 0.5;
    let ncy = (new_h as f32 - 1.0) * 0.5;

    let src_w = w as i32;
    let src_h = h as i32;
    let src_stride = w as usize * 3;
    let src_raw = src.as_raw();

    let mut dst = RgbImage::new(new_w, new_h);
    let row_bytes = new_w as usize * 3;

    for (dy, row) in dst.chunks_mut(row_bytes).enumerate() {
        let v = dy as f32 - ncy;
        for dx in 0..new_w as usize {
            let u = dx as f32 - ncx;

            // Inverse rotation back into source space.
            let sx = cx + cos * u - sin * v;
            let sy = cy + sin * u + cos * v;

            let x0 = sx.floor() as i32;
            let y0 = sy.floor() as i32;
            if x0 < -1 || y0 < -1 || x0 >= src_w || y0 >= src_h {
                continue; // outside the source: stays black
            }
            let fx = sx - x0 as f32;
            let fy = sy - y0 as f32;

            let sample = |px: i32, py: i32| -> [f32; 3] {
                if px < 0 || py < 0 || px >= src_w || py >= src_h {
                    [0.0; 3]
                } else {
                    let idx = py as usize * src_stride + px as usize * 3;
                    [
                        src_raw[idx] as f32,
                        src_raw[idx + 1] as f32,
                        src_raw[idx + 2] as f32,
                    ]
                }
            };

            let tl = sample(x0, y0);
            let tr = sample(x0 + 1, y0);
            let bl = sample(x0, y0 + 1);
            let br = sample(x0 + 1, y0 + 1);

            let out = dx * 3;
            for c in 0..3 {
                let top = tl[c] + (tr[c] - tl[c]) * fx;
                let bot = bl[c] + (br[c] - bl[c]) * fx;
                row[out + c] = (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
        })
    }

    #[test]
    fn crop_extracts_the_half_open_box() {
        let src = gradient(4, 4);
        let out = crop(&src, Region::new(1, 3, 0, 2));
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(0, 1));
        assert_eq!(out.get_pixel(1, 1), src.get_pixel(1, 2));
    }

    #[test]
    fn crop_clamps_to_the_buffer() {
        let src = gradient(4, 4);
        let out = crop(&src, Region::new(2, 100, 2, 100));
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 2));
    }

    #[test]
    fn degenerate_crop_is_a_no_op() {
        let src = gradient(4, 4);
        assert_eq!(crop(&src, Region::new(2, 2, 0, 4)), src);
        // Entirely outside: clamping empties the box, buffer passes through.
        assert_eq!(crop(&src, Region::new(10, 20, 10, 20)), src);
    }

    #[test]
    fn rotate_zero_is_identity() {
        let src = gradient(5, 3);
        assert_eq!(rotate_expanded(&src, 0.0), src);
    }

    #[test]
    fn rotate_quarter_turns_match_the_lossless_rotations() {
        let src = gradient(4, 3);
        assert_eq!(rotate_expanded(&src, 90.0), imageops::rotate270(&src));
        assert_eq!(rotate_expanded(&src, -90.0), imageops::rotate90(&src));
        assert_eq!(rotate_expanded(&src, 180.0), imageops::rotate180(&src));
    }

    #[test]
    fn rotation_expands_the_canvas() {
        let src = gradient(16, 16);
        let out = rotate_expanded(&src, 30.0);
        // 16·cos30 + 16·sin30 = 21.86, rounded.
        assert_eq!(out.dimensions(), (22, 22));
    }

    #[test]
    fn rotation_round_trip_is_close_to_the_original() {
        // Two successive warps resample twice, so the comparison is a mean
        // pixel error bound, not equality. Most of the error sits in the
        // outermost content ring, which blends with the black expansion fill
        // in both warps; the interior must come back essentially intact.
        let src = RgbImage::from_pixel(16, 16, Rgb([180, 180, 180]));
        let spun = rotate_expanded(&rotate_expanded(&src, 30.0), -30.0);

        let (sw, sh) = spun.dimensions();
        let restored = crop(
            &spun,
            Region::new(
                (sh - 16) / 2,
                (sh - 16) / 2 + 16,
                (sw - 16) / 2,
                (sw - 16) / 2 + 16,
            ),
        );
        assert_eq!(restored.dimensions(), (16, 16));

        let total: f64 = restored
            .as_raw()
            .iter()
            .zip(src.as_raw())
            .map(|(&a, &b)| (a as f64 - b as f64).abs())
            .sum();
        let mean = total / src.as_raw().len() as f64;
        assert!(mean < 48.0, "mean pixel error too high: {mean}");

        let center = restored.get_pixel(8, 8).0[0] as i32;
        assert!((center - 180).abs() <= 8, "interior drifted: {center}");
    }
}
