//! Graphic field decoding (`^GF`) and the download/recall cache (`~DG`,
//! `^XG`, `^IM`), keyed case-insensitively with drive-prefix stripping.

use std::collections::HashMap;

use zpl_parser::{CompressionType, GraphicFieldData};

use crate::element::Bitmap;

/// Decodes a `^GF`/`~DG` payload into a 1-bit bitmap.
///
/// ASCII-hex and zlib+base64 compressed-binary payloads both decode fully;
/// plain binary compression is recognized but not decoded — it comes back
/// as a blank bitmap of the declared dimensions rather than a crash.
pub fn decode_graphic(data: &GraphicFieldData) -> Bitmap {
    let bytes_per_row = data.bytes_per_row.max(1);
    let height = if data.total_bytes == 0 { 0 } else { data.total_bytes.div_ceil(bytes_per_row) };
    let width = bytes_per_row * 8;

    if width == 0 || height == 0 {
        return Bitmap::blank(0, 0);
    }

    let packed = match data.compression {
        CompressionType::AsciiHex => decode_ascii_hex(&data.hex_data),
        CompressionType::CompressedBinary => match decode_base64_zlib(&data.hex_data) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%err, "could not inflate compressed graphic, drawing blank bitmap");
                Vec::new()
            }
        },
        CompressionType::Binary => {
            tracing::warn!("binary-compression graphic field is not supported, drawing blank bitmap");
            Vec::new()
        }
    };

    expand_monochrome(&packed, width, height, bytes_per_row)
}

fn decode_base64_zlib(s: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    use std::io::Read;

    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let compressed = base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| e.to_string())?;
    let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| e.to_string())?;
    Ok(out)
}

/// Hex digits are consumed in pairs; a trailing odd nibble or missing bytes
/// are treated as white.
fn decode_ascii_hex(s: &str) -> Vec<u8> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let mut bytes = Vec::with_capacity(cleaned.len() / 2);
    let chars: Vec<char> = cleaned.chars().collect();
    for pair in chars.chunks(2) {
        if pair.len() < 2 {
            break;
        }
        let hi = pair[0].to_digit(16);
        let lo = pair[1].to_digit(16);
        match (hi, lo) {
            (Some(hi), Some(lo)) => bytes.push(((hi << 4) | lo) as u8),
            _ => bytes.push(0),
        }
    }
    bytes
}

fn expand_monochrome(packed: &[u8], width: usize, height: usize, bytes_per_row: usize) -> Bitmap {
    let mut pixels = vec![0u8; width * height];
    for row in 0..height {
        let row_start = row * bytes_per_row;
        for col in 0..bytes_per_row {
            let byte = packed.get(row_start + col).copied().unwrap_or(0);
            for bit in 0..8 {
                let x = col * 8 + bit;
                if x >= width {
                    break;
                }
                let value = (byte >> (7 - bit)) & 1;
                pixels[row * width + x] = value;
            }
        }
    }
    Bitmap { width, height, pixels }
}

/// Case-insensitive, drive-prefix-tolerant name → bitmap mapping. Outlives
/// a single label within one execution state; never shared across renders.
#[derive(Debug, Clone, Default)]
pub struct GraphicsCache {
    entries: HashMap<String, Bitmap>,
}

impl GraphicsCache {
    /// Stored under the drive-stripped, uppercased name, so a later lookup
    /// with or without a drive prefix resolves the same entry.
    pub fn insert(&mut self, name: &str, bitmap: Bitmap) {
        let key = normalize_name(name);
        self.entries.insert(strip_drive(&key).to_string(), bitmap);
    }

    /// A miss is a no-op, not an error.
    pub fn get(&self, name: &str) -> Option<&Bitmap> {
        let key = normalize_name(name);
        self.entries.get(strip_drive(&key))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

fn strip_drive(name: &str) -> &str {
    match name.find(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_byte_row() {
        let data = GraphicFieldData {
            compression: CompressionType::AsciiHex,
            total_bytes: 1,
            bytes_per_row: 1,
            hex_data: "80".to_string(),
        };
        let bmp = decode_graphic(&data);
        assert_eq!(bmp.width, 8);
        assert_eq!(bmp.height, 1);
        assert_eq!(bmp.get(0, 0), 1);
        assert_eq!(bmp.get(1, 0), 0);
    }

    #[test]
    fn missing_trailing_data_is_white() {
        let data = GraphicFieldData {
            compression: CompressionType::AsciiHex,
            total_bytes: 2,
            bytes_per_row: 1,
            hex_data: "FF".to_string(),
        };
        let bmp = decode_graphic(&data);
        assert_eq!(bmp.height, 2);
        assert_eq!(bmp.get(0, 0), 1);
        assert_eq!(bmp.get(0, 1), 0);
    }

    #[test]
    fn compressed_binary_inflates_zlib_base64_payload() {
        let data = GraphicFieldData {
            compression: CompressionType::CompressedBinary,
            total_bytes: 1,
            bytes_per_row: 1,
            hex_data: "eJxrAAAAgQCB".to_string(),
        };
        let bmp = decode_graphic(&data);
        assert_eq!(bmp.get(0, 0), 1);
        assert_eq!(bmp.get(1, 0), 0);
    }

    #[test]
    fn cache_lookup_strips_drive_prefix() {
        let mut cache = GraphicsCache::default();
        cache.insert("R:DOT.GRF", Bitmap::blank(1, 1));
        assert!(cache.get("r:dot.grf").is_some());
        assert!(cache.get("DOT.GRF").is_some());
    }

    #[test]
    fn cache_miss_is_none() {
        let cache = GraphicsCache::default();
        assert!(cache.get("missing").is_none());
    }
}
