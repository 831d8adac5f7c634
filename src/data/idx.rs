//! MNIST IDX file parsing.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use log::debug;

use crate::error::{MlpError, Result};

/// Pixel rows scaled to `[0, 1]` paired with one-hot label rows.
pub type IdxPair = (Vec<Vec<f64>>, Vec<Vec<f64>>);

fn dataset_err(msg: String) -> MlpError {
    MlpError::Dataset(msg)
}

fn be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

/// Checks the 4-byte magic prefix and returns the header length.
fn check_magic(bytes: &[u8], file: &str, dims: u8) -> Result<usize> {
    let header_len = 4 + 4 * dims as usize;
    if bytes.len() < header_len {
        return Err(dataset_err(format!(
            "IDX {file} file too short: expected at least {header_len} header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(dataset_err(format!(
            "IDX {file} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(dataset_err(format!(
            "IDX {file} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(dataset_err(format!(
            "IDX {file} file: expected {dims} dimensions, got {}",
            bytes[3]
        )));
    }
    Ok(header_len)
}

/// Parses an IDX3 image buffer and its IDX1 label buffer.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<IdxPair> {
    if n_classes < 2 {
        return Err(dataset_err(format!("n_classes must be at least 2, got {n_classes}")));
    }

    let image_header = check_magic(image_bytes, "image", 3)?;
    let n_items = be_u32(image_bytes, 4);
    let rows = be_u32(image_bytes, 8);
    let cols = be_u32(image_bytes, 12);

    let n_pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| dataset_err(format!("IDX image file: {rows}x{cols} pixels overflows")))?;
    let image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(image_header))
        .ok_or_else(|| dataset_err("IDX image file: data length overflows".to_owned()))?;
    if image_bytes.len() < image_len {
        return Err(dataset_err(format!(
            "IDX image file too short: header declares {n_items} images of {rows}x{cols} pixels \
             but file is only {} bytes",
            image_bytes.len()
        )));
    }

    let label_header = check_magic(label_bytes, "label", 1)?;
    let label_count = be_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(dataset_err(format!(
            "IDX file mismatch: {n_items} images but {label_count} labels"
        )));
    }
    if label_bytes.len() < label_header + n_items {
        return Err(dataset_err(format!(
            "IDX label file too short: header declares {n_items} labels but file is only {} bytes",
            label_bytes.len()
        )));
    }

    let inputs: Vec<Vec<f64>> = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        image_bytes[image_header..image_len]
            .chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
            .collect()
    };

    let labels = label_bytes[label_header..label_header + n_items]
        .iter()
        .enumerate()
        .map(|(i, &class)| {
            let class = class as usize;
            if class >= n_classes {
                return Err(dataset_err(format!(
                    "IDX label {i}: class {class} is out of range for {n_classes} classes"
                )));
            }
            let mut one_hot = vec![0.0; n_classes];
            one_hot[class] = 1.0;
            Ok(one_hot)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((inputs, labels))
}

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(image_path: &Path, label_path: &Path, n_classes: usize) -> Result<IdxPair> {
    let image_bytes = std::fs::read(image_path)?;
    let label_bytes = std::fs::read(label_path)?;
    let pair = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    debug!(
        "loaded {} samples from {}",
        pair.0.len(),
        image_path.display()
    );
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_file(n: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x00, 0x00, 0x08, 0x03];
        for v in [n, rows, cols] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn label_file(labels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x00, 0x00, 0x08, 0x01];
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn parses_pixels_and_one_hot_labels() {
        let images = image_file(2, 1, 2, &[0, 255, 51, 102]);
        let labels = label_file(&[2, 0]);

        let (inputs, targets) = parse_idx_pair(&images, &labels, 3).unwrap();
        assert_eq!(inputs, vec![vec![0.0, 1.0], vec![0.2, 0.4]]);
        assert_eq!(targets, vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]]);
    }

    #[test]
    fn truncated_image_data_is_rejected() {
        let images = image_file(2, 1, 2, &[0, 255, 51]);
        let err = parse_idx_pair(&images, &label_file(&[0, 1]), 2).unwrap_err();
        assert!(matches!(err, MlpError::Dataset(_)));
    }

    #[test]
    fn label_file_is_not_accepted_as_images() {
        let labels = label_file(&[0; 16]);
        assert!(parse_idx_pair(&labels, &labels, 10).is_err());
    }

    #[test]
    fn out_of_range_class_is_rejected() {
        let images = image_file(1, 1, 1, &[7]);
        let err = parse_idx_pair(&images, &label_file(&[10]), 10).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let images = image_file(1, 1, 1, &[7]);
        assert!(parse_idx_pair(&images, &label_file(&[1, 2]), 10).is_err());
    }
}
