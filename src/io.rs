// ============================================================================
// IMAGE I/O — decode, encode, and native file dialogs
// ============================================================================

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use rfd::FileDialog;

use crate::error::Error;

/// Quality used when exporting JPEG.
const JPEG_QUALITY: u8 = 90;

/// Read and decode an image file into an RGB pixel grid.
///
/// The whole file is read first and decoded from memory, so the decoder
/// never sees the path itself (non-ASCII paths included).
pub fn load_image(path: &Path) -> Result<RgbImage, Error> {
    let bytes = std::fs::read(path).map_err(|e| Error::Decode {
        reason: format!("{}: {}", path.display(), e),
    })?;
    decode_bytes(&bytes)
}

/// Decode an in-memory PNG/JPEG byte buffer into an RGB pixel grid.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbImage, Error> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::Decode {
        reason: e.to_string(),
    })?;
    Ok(decoded.to_rgb8())
}

/// Encode `pixels` to `path`, choosing the format from the extension
/// (JPEG for `.jpg`/`.jpeg`, PNG for everything else).
pub fn save_image(pixels: &RgbImage, path: &Path) -> Result<(), Error> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            let file = File::create(path).map_err(|e| Error::Encode {
                reason: e.to_string(),
            })?;
            let mut writer = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
                .encode_image(pixels)
                .map_err(|e| Error::Encode {
                    reason: e.to_string(),
                })
        }
        _ => pixels
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| Error::Encode {
                reason: e.to_string(),
            }),
    }
}

/// Native open dialog, filtered to the formats the editor loads.
pub fn pick_image_to_open() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Images (*.png *.jpg)", &["png", "jpg", "jpeg"])
        .pick_file()
}

/// Native save dialog, defaulting to a PNG file name.
pub fn pick_save_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PNG image", &["png"])
        .add_filter("JPEG image", &["jpg", "jpeg"])
        .set_file_name("edited.png")
        .save_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let result = decode_bytes(b"definitely not an image");
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let result = load_image(Path::new("/nonexistent/photo.png"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn png_bytes_decode_back_to_the_same_pixels() {
        let src = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 50, 128]));
        let mut encoded = Vec::new();
        src.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .unwrap();

        let decoded = decode_bytes(&encoded).unwrap();
        assert_eq!(decoded, src);
    }
}
