//! Evidentia-Summarize: map-reduce case synthesis and domain enhancement
//! (C10) for the Evidentia forensic pipeline.
//!
//! [`summarizer::summarize_case`] is the entry point: phase A produces a
//! forensic summary directly or via map-reduce depending on evidence
//! count, phase B enhances it with a domain-specific pass that degrades
//! gracefully on failure.

mod enhance;
mod error;
mod mapreduce;
mod summarizer;

pub use enhance::{enhance, enhancement_prompt};
pub use error::{SummarizeError, SummarizeResult};
pub use mapreduce::{chunk_catalog, synthesize, ChunkSummaryResponse, ForensicSynthesis};
pub use summarizer::summarize_case;
