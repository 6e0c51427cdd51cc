//! The system prompts the analyzers compose from (spec §4.5, §4.6, §4.7):
//! a fixed forensic persona plus a domain addendum selected by
//! `case_type`.

use evidentia_core::CaseType;
use evidentia_llm::PromptTemplate;

pub const ANALYZER_VERSION: u32 = 1;

const FORENSIC_PERSONA: &str = "You are a forensic evidence analyst. Read the \
provided material carefully and report only what the material supports. Do \
not speculate beyond the text. Respond with a single JSON object matching \
the requested schema and nothing else.";

fn domain_addendum(case_type: CaseType) -> &'static str {
    match case_type {
        CaseType::Generic => "",
        CaseType::Workplace => "\nPay particular attention to power dynamics, \
policy violations, and retaliation.",
        CaseType::Employment => "\nPay particular attention to termination \
rationale, performance documentation, and statements bearing on discrimination \
or wrongful-termination claims.",
        CaseType::Contract => "\nPay particular attention to obligations, \
breach indicators, and consideration exchanged between parties.",
    }
}

/// The document analyzer's system prompt (C5), templated per `case_type`.
pub fn document_system_prompt(case_type: CaseType) -> PromptTemplate {
    let body = format!("{FORENSIC_PERSONA}{}", domain_addendum(case_type));
    PromptTemplate::new("document_analyzer.system", ANALYZER_VERSION, body)
}

/// The email thread analyzer's system prompt (C6).
pub fn email_thread_system_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "email_thread_analyzer.system",
        ANALYZER_VERSION,
        format!(
            "{FORENSIC_PERSONA}\nYou are reading a reconstructed email thread. \
Assign each participant an authority level from their own words and a \
deference_score reflecting how deferential their tone is relative to the \
others in the thread."
        ),
    )
}

/// The image/vision analyzer's system prompt (C7).
pub fn image_system_prompt() -> PromptTemplate {
    PromptTemplate::new(
        "image_analyzer.system",
        ANALYZER_VERSION,
        format!(
            "{FORENSIC_PERSONA}\nDescribe the scene, transcribe any visible \
text verbatim into detected_text, and list objects you can identify with \
confidence."
        ),
    )
}
