// ============================================================================
// ADJUSTMENT OPERATIONS — color-channel isolation
// ============================================================================

use image::RgbImage;

use crate::record::ChannelFilter;

/// Visually isolate one color channel.
///
/// The two unselected channels are zeroed and the selected channel keeps
/// its intensities, so the result is still a 3-channel image (an
/// isolation view, not a single-channel extraction). `ChannelFilter::None`
/// leaves the buffer untouched.
pub fn isolate_channel(img: &mut RgbImage, filter: ChannelFilter) {
    let keep = match filter {
        ChannelFilter::None => return,
        ChannelFilter::Red => 0,
        ChannelFilter::Green => 1,
        ChannelFilter::Blue => 2,
    };
    for pixel in img.pixels_mut() {
        for c in 0..3 {
            if c != keep {
                pixel.0[c] = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn synthetic() -> RgbImage {
        // 3×3 with distinct, known per-channel values.
        RgbImage::from_fn(3, 3, |x, y| {
            let base = (y * 3 + x) as u8;
            Rgb([10 + base, 100 + base, 200 + base])
        })
    }

    #[test]
    fn red_isolation_preserves_red_and_zeroes_the_rest() {
        let src = synthetic();
        let mut img = src.clone();
        isolate_channel(&mut img, ChannelFilter::Red);
        for (x, y, pixel) in img.enumerate_pixels() {
            let original = src.get_pixel(x, y);
            assert_eq!(pixel.0, [original.0[0], 0, 0]);
        }
    }

    #[test]
    fn green_and_blue_keep_their_own_plane() {
        let src = synthetic();

        let mut green = src.clone();
        isolate_channel(&mut green, ChannelFilter::Green);
        assert_eq!(green.get_pixel(1, 1).0, [0, src.get_pixel(1, 1).0[1], 0]);

        let mut blue = src.clone();
        isolate_channel(&mut blue, ChannelFilter::Blue);
        assert_eq!(blue.get_pixel(2, 0).0, [0, 0, src.get_pixel(2, 0).0[2]]);
    }

    #[test]
    fn no_filter_means_no_change() {
        let src = synthetic();
        let mut img = src.clone();
        isolate_channel(&mut img, ChannelFilter::None);
        assert_eq!(img, src);
    }
}
