//! A best-effort, minimal EXIF extractor (spec §4.7): reads a handful of
//! common tags out of a JPEG's APP1 segment. Never panics on malformed
//! input — any parsing failure just yields `None`, since EXIF is advisory
//! and absence is a normal, expected case for non-JPEG images.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExifData {
    pub make: Option<String>,
    pub model: Option<String>,
    pub date_time_original: Option<String>,
    pub orientation: Option<u16>,
    pub gps_present: bool,
}

const TAG_MAKE: u16 = 0x010F;
const TAG_MODEL: u16 = 0x0110;
const TAG_ORIENTATION: u16 = 0x0112;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_GPS_IFD_POINTER: u16 = 0x8825;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

/// Scans `bytes` for a JPEG APP1 EXIF segment and extracts a handful of
/// common tags. Returns `None` for non-JPEG input or any structural
/// mismatch rather than erroring.
pub fn extract_exif(bytes: &[u8]) -> Option<ExifData> {
    if bytes.len() < 4 || bytes[0..2] != [0xFF, 0xD8] {
        return None;
    }

    let tiff = find_exif_tiff_block(bytes)?;
    let little_endian = match &tiff[0..2] {
        b"II" => true,
        b"MM" => false,
        _ => return None,
    };

    let ifd0_offset = read_u32(tiff, 4, little_endian)? as usize;
    let mut data = ExifData::default();
    let mut exif_ifd_offset = None;

    read_ifd(tiff, ifd0_offset, little_endian, |tag, value_offset| {
        match tag {
            TAG_MAKE => data.make = read_ascii(tiff, value_offset),
            TAG_MODEL => data.model = read_ascii(tiff, value_offset),
            TAG_ORIENTATION => data.orientation = read_u16(tiff, value_offset, little_endian),
            TAG_EXIF_IFD_POINTER => {
                exif_ifd_offset = read_u32(tiff, value_offset, little_endian).map(|v| v as usize)
            }
            TAG_GPS_IFD_POINTER => data.gps_present = true,
            _ => {}
        }
    });

    if let Some(offset) = exif_ifd_offset {
        read_ifd(tiff, offset, little_endian, |tag, value_offset| {
            if tag == TAG_DATE_TIME_ORIGINAL {
                data.date_time_original = read_ascii(tiff, value_offset);
            }
        });
    }

    Some(data)
}

/// Locates the `Exif\0\0`-prefixed TIFF block inside a JPEG's APP1 marker
/// segment(s) and returns a slice starting at the TIFF header.
fn find_exif_tiff_block(bytes: &[u8]) -> Option<&[u8]> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            break;
        }
        let marker = bytes[pos + 1];
        if marker == 0xD8 || marker == 0xD9 {
            pos += 2;
            continue;
        }
        if !(0xE0..=0xEF).contains(&marker) && marker != 0xDB && marker != 0xC0 && marker != 0xC4
            && marker != 0xDA
        {
            break;
        }
        let seg_len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if marker == 0xE1 {
            let seg_start = pos + 4;
            let seg_end = (pos + 2 + seg_len).min(bytes.len());
            if seg_start + 6 <= seg_end && &bytes[seg_start..seg_start + 4] == b"Exif" {
                return Some(&bytes[seg_start + 6..seg_end]);
            }
        }
        if marker == 0xDA {
            break;
        }
        pos += 2 + seg_len;
    }
    None
}

fn read_u16(buf: &[u8], offset: usize, little_endian: bool) -> Option<u16> {
    let slice = buf.get(offset..offset + 2)?;
    Some(if little_endian {
        u16::from_le_bytes([slice[0], slice[1]])
    } else {
        u16::from_be_bytes([slice[0], slice[1]])
    })
}

fn read_u32(buf: &[u8], offset: usize, little_endian: bool) -> Option<u32> {
    let slice = buf.get(offset..offset + 4)?;
    Some(if little_endian {
        u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]])
    } else {
        u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]])
    })
}

fn read_ascii(buf: &[u8], value_field_offset: usize) -> Option<String> {
    // The value field itself holds a 4-byte offset to the string for any
    // ASCII value longer than 4 bytes; we only resolve that common case.
    let offset = read_u32(buf, value_field_offset, true)? as usize;
    let slice = buf.get(offset..)?;
    let end = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
    let text = String::from_utf8_lossy(&slice[..end]).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Walks one IFD, invoking `on_entry(tag, value_field_offset)` for each of
/// its 12-byte entries.
fn read_ifd(buf: &[u8], offset: usize, little_endian: bool, mut on_entry: impl FnMut(u16, usize)) {
    let Some(count) = read_u16(buf, offset, little_endian) else {
        return;
    };
    for i in 0..count as usize {
        let entry_offset = offset + 2 + i * 12;
        let Some(tag) = read_u16(buf, entry_offset, little_endian) else {
            break;
        };
        let value_field_offset = entry_offset + 8;
        on_entry(tag, value_field_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_jpeg_bytes_yield_none() {
        assert!(extract_exif(b"not a jpeg").is_none());
    }

    #[test]
    fn jpeg_without_app1_yields_none() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        assert!(extract_exif(&bytes).is_none());
    }
}
