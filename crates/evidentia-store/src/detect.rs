//! Type detector (C2, spec §4.2).
//!
//! Detection order is contractual, not incidental: email extensions look
//! text-like and must be claimed before the document heuristic runs; video
//! MIME types must be checked before the generic binary fallback.

use evidentia_core::EvidenceType;

const EMAIL_EXTENSIONS: &[&str] = &["eml", "msg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "m4a", "ogg"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Classifies a file by its declared MIME type, extension, and leading
/// bytes, following the ordered checks in spec §4.2: email, video, audio,
/// image, document, pdf, otherwise `other`.
pub fn detect_type(extension: Option<&str>, mime_type: Option<&str>, head: &[u8]) -> EvidenceType {
    let extension = extension.map(|e| e.to_ascii_lowercase());
    let ext = extension.as_deref();

    if matches_extension(ext, EMAIL_EXTENSIONS) || looks_like_rfc822(head) {
        return EvidenceType::Email;
    }
    if mime_starts_with(mime_type, "video/") || matches_extension(ext, VIDEO_EXTENSIONS) {
        return EvidenceType::Video;
    }
    if mime_starts_with(mime_type, "audio/") || matches_extension(ext, AUDIO_EXTENSIONS) {
        return EvidenceType::Audio;
    }
    if mime_starts_with(mime_type, "image/") || matches_extension(ext, IMAGE_EXTENSIONS) {
        return EvidenceType::Image;
    }
    if looks_like_pdf(ext, head) {
        return EvidenceType::Pdf;
    }
    if mime_starts_with(mime_type, "text/") || is_mostly_printable(head) {
        return EvidenceType::Document;
    }
    EvidenceType::Other
}

fn matches_extension(ext: Option<&str>, candidates: &[&str]) -> bool {
    ext.is_some_and(|e| candidates.contains(&e))
}

fn mime_starts_with(mime_type: Option<&str>, prefix: &str) -> bool {
    mime_type.is_some_and(|m| m.starts_with(prefix))
}

/// Checks the first 4 KiB for RFC-822-style headers (`From:`, `Subject:`,
/// `Received:`) near the start of the file, the fallback for `.eml` files
/// lacking that extension.
fn looks_like_rfc822(head: &[u8]) -> bool {
    let head = &head[..head.len().min(4096)];
    let text = String::from_utf8_lossy(head);
    let first_lines: Vec<&str> = text.lines().take(20).collect();
    let has_header = |name: &str| {
        first_lines
            .iter()
            .any(|line| line.to_ascii_lowercase().starts_with(name))
    };
    has_header("from:") && (has_header("subject:") || has_header("to:") || has_header("received:"))
}

fn looks_like_pdf(ext: Option<&str>, head: &[u8]) -> bool {
    ext == Some("pdf") || head.starts_with(PDF_MAGIC)
}

/// The spec's "≥90% printable bytes in first 4 KiB" document heuristic.
fn is_mostly_printable(head: &[u8]) -> bool {
    let sample = &head[..head.len().min(4096)];
    if sample.is_empty() {
        return false;
    }
    let printable = sample
        .iter()
        .filter(|&&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7e).contains(&b))
        .count();
    (printable as f64) / (sample.len() as f64) >= 0.90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eml_extension_wins_over_text_heuristic() {
        let body = b"From: a@b.com\nSubject: hi\n\nplain text body";
        assert_eq!(detect_type(Some("eml"), None, body), EvidenceType::Email);
    }

    #[test]
    fn rfc822_headers_detected_without_extension() {
        let body = b"From: a@b.com\nTo: c@d.com\nSubject: hi\n\nbody";
        assert_eq!(detect_type(None, None, body), EvidenceType::Email);
    }

    #[test]
    fn video_mime_wins_over_extensionless_binary() {
        assert_eq!(
            detect_type(None, Some("video/mp4"), &[0u8; 16]),
            EvidenceType::Video
        );
    }

    #[test]
    fn pdf_magic_bytes_detected() {
        let mut head = PDF_MAGIC.to_vec();
        head.extend_from_slice(b"1.7 rest of file");
        assert_eq!(detect_type(None, None, &head), EvidenceType::Pdf);
    }

    #[test]
    fn printable_text_is_a_document() {
        let body = b"This is a perfectly ordinary memo about scheduling.";
        assert_eq!(detect_type(None, None, body), EvidenceType::Document);
    }

    #[test]
    fn binary_noise_falls_back_to_other() {
        let body: Vec<u8> = (0u8..=255).collect();
        assert_eq!(detect_type(None, None, &body), EvidenceType::Other);
    }

    #[test]
    fn image_extension_detected() {
        assert_eq!(detect_type(Some("PNG"), None, &[]), EvidenceType::Image);
    }
}
