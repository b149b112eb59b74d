use crate::error::ClassifierError;
use crate::models::classify_types::NUM_CLASSES;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::io::{Cursor, Read};
use std::path::Path;

/// Model input edge length. Both dimensions are forced to this size; the
/// model was trained on stretched squares, not crops.
pub const INPUT_SIZE: u32 = 256;

/// Decode the image at `path`, applying EXIF orientation so the tensor
/// sees the photo the way the user did.
pub fn decode_image(path: &Path) -> Result<DynamicImage, ClassifierError> {
    let img = ImageReader::open(path)
        .map_err(|e| ClassifierError::Decode(format!("Failed to open image {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| ClassifierError::Decode(format!("Failed to decode image {}: {}", path.display(), e)))?;

    let orientation = read_orientation(path);
    Ok(apply_orientation(img, orientation))
}

/// Read EXIF orientation from the file header. Defaults to 1 (upright) on
/// any failure; orientation is cosmetic, never fatal.
fn read_orientation(path: &Path) -> u32 {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return 1,
    };

    // First 128KB covers the EXIF header in practice.
    let mut header_buf = Vec::with_capacity(128 * 1024);
    if file.take(128 * 1024).read_to_end(&mut header_buf).is_err() {
        return 1;
    }

    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(&header_buf)) {
        Ok(e) => e,
        Err(_) => return 1,
    };

    match exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY) {
        Some(field) => match field.value {
            exif::Value::Short(ref v) => *v.first().unwrap_or(&1) as u32,
            exif::Value::Long(ref v) => *v.first().unwrap_or(&1),
            _ => 1,
        },
        None => 1,
    }
}

fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.fliph().rotate90(),
        6 => img.rotate90(),
        7 => img.fliph().rotate270(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Build the model input: shape (1, 256, 256, 3), row-major pixel then
/// channel R,G,B, each sample the raw 0-255 intensity as f32. No
/// normalization here; the model's first layer rescales.
pub fn preprocess(img: &DynamicImage) -> Result<Array4<f32>, ClassifierError> {
    let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    // The rgb8 buffer is already HWC in R,G,B order; the fill is a
    // straight widening copy.
    let raw = rgb.into_raw();
    let data: Vec<f32> = raw.iter().map(|&v| v as f32).collect();

    Array4::from_shape_vec(
        (1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3),
        data,
    )
    .map_err(|e| ClassifierError::Processing(format!("Failed to create tensor: {}", e)))
}

/// Run the model once and return the raw class scores.
pub fn run_model(session: &mut Session, input: Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
    let input_name = session.inputs()[0].name().to_string();

    let input_tensor = Value::from_array(input)
        .map_err(|e| ClassifierError::Processing(format!("Failed to create tensor value: {}", e)))?;

    let outputs = session
        .run(ort::inputs![input_name.as_str() => input_tensor])
        .map_err(|e| ClassifierError::Model(format!("Inference failed: {}", e)))?;

    let output_value = outputs
        .values()
        .next()
        .ok_or_else(|| ClassifierError::Processing("Model produced no outputs".to_string()))?;

    let (_, data) = output_value
        .try_extract_tensor::<f32>()
        .map_err(|e| ClassifierError::Processing(format!("Failed to extract output tensor: {}", e)))?;

    if data.len() < NUM_CLASSES {
        return Err(ClassifierError::Processing(format!(
            "expected {} class scores, got {}",
            NUM_CLASSES,
            data.len()
        )));
    }

    Ok(data[..NUM_CLASSES].to_vec())
}

/// Index of the maximum score. Ties break toward the lowest index: only a
/// strictly greater score displaces the current best.
pub fn argmax(scores: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut best_score = match scores.first() {
        Some(&s) => s,
        None => return 0,
    };
    for (idx, &score) in scores.iter().enumerate().skip(1) {
        if score > best_score {
            best_idx = idx;
            best_score = score;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn argmax_breaks_ties_toward_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[0.1, 0.9, 0.9]), 1);
        assert_eq!(argmax(&[0.0; 10]), 0);
    }

    #[test]
    fn argmax_finds_single_maximum() {
        let mut scores = [0.0f32; 10];
        scores[7] = 3.2;
        assert_eq!(argmax(&scores), 7);
    }

    #[test]
    fn preprocess_emits_raw_rgb_floats_in_nhwc() {
        // Uniform color survives resampling unchanged, which pins down
        // both the channel order and the absence of normalization.
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([10, 120, 250])));
        let tensor = preprocess(&img).unwrap();

        assert_eq!(tensor.shape(), &[1, 256, 256, 3]);
        assert_eq!(tensor[[0, 0, 0, 0]], 10.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 120.0);
        assert_eq!(tensor[[0, 0, 0, 2]], 250.0);
        assert_eq!(tensor[[0, 255, 255, 0]], 10.0);
        assert_eq!(tensor[[0, 128, 37, 2]], 250.0);
    }

    #[test]
    fn preprocess_stretches_without_preserving_aspect() {
        // 4:1 input; left half red, right half blue. After a stretch the
        // left edge must still be red and the right edge blue.
        let mut img = RgbImage::from_pixel(64, 16, Rgb([200, 0, 0]));
        for y in 0..16 {
            for x in 32..64 {
                img.put_pixel(x, y, Rgb([0, 0, 200]));
            }
        }
        let tensor = preprocess(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(tensor[[0, 128, 2, 0]], 200.0);
        assert_eq!(tensor[[0, 128, 2, 2]], 0.0);
        assert_eq!(tensor[[0, 128, 253, 0]], 0.0);
        assert_eq!(tensor[[0, 128, 253, 2]], 200.0);
    }

    #[test]
    fn decode_missing_file_fails() {
        let result = decode_image(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn decode_zero_byte_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        let result = decode_image(&path);
        assert!(matches!(result, Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn decode_reads_real_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }
}
