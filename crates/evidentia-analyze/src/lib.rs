//! Evidentia-Analyze: analyzer dispatch and the three per-item analyzers
//! (C4–C7) for the Evidentia forensic pipeline.
//!
//! [`dispatch::Dispatcher`] is the entry point: given a case's evidence
//! manifest it routes each item to [`document::analyze_document`],
//! [`email_thread::analyze_email_thread`], or [`image::analyze_image`] by
//! detected type, skipping a fingerprint-matched cache hit and recording
//! every outcome in a [`report::RunReport`].

mod dispatch;
mod document;
mod email_thread;
mod error;
mod exif;
mod image;
mod phash;
mod prompts;
mod report;

pub use dispatch::{is_refusal, Dispatcher};
pub use document::{analyze_document, decode_best_effort, MAX_INPUT_CHARS};
pub use email_thread::{analyze_email_thread, parse_eml, reconstruct_thread, EmailMessage};
pub use error::{AnalyzeError, AnalyzeResult};
pub use exif::{extract_exif, ExifData};
pub use image::{analyze_image, extract_advisory, Page};
pub use phash::compute_phash;
pub use prompts::{document_system_prompt, email_thread_system_prompt, image_system_prompt, ANALYZER_VERSION};
pub use report::{Outcome, RunReport};
