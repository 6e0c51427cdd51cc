//! The email thread analyzer (C6, spec §4.6): `.eml` parsing, thread
//! reconstruction, and the LLM call producing `EmailThreadAnalysis`.

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::prompts::email_thread_system_prompt;
use chrono::{DateTime, FixedOffset};
use evidentia_llm::LlmProvider;
use evidentia_schema::email::EmailThreadAnalysis;
use evidentia_schema::validate::Validate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn angle_address_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([^<>]+)>").unwrap())
}

/// Text this thread's rendered representation is truncated to before being
/// sent to the LLM, mirroring the document analyzer's bound.
const MAX_RENDERED_CHARS: usize = 24_000;

/// A single parsed message from an `.eml`/`.msg` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub message_id: Option<String>,
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub date: Option<String>,
    pub subject: String,
    pub body: String,
    pub in_reply_to: Option<String>,
    pub references: Vec<String>,
}

/// Parses the RFC-822-style headers and body of a single `.eml` file.
///
/// This parses exactly one message, not a thread; multiple messages in a
/// thread are each parsed independently and handed to [`reconstruct_thread`].
pub fn parse_eml(bytes: &[u8]) -> AnalyzeResult<EmailMessage> {
    let text = String::from_utf8_lossy(bytes);
    let (header_block, body) = match text.split_once("\r\n\r\n").or_else(|| text.split_once("\n\n")) {
        Some((h, b)) => (h, b),
        None => (text.as_ref(), ""),
    };

    let headers = parse_headers(header_block);

    let from = headers
        .get("from")
        .cloned()
        .ok_or_else(|| AnalyzeError::MalformedEmail("missing From header".to_string()))?;

    let to = split_addresses(headers.get("to").map(String::as_str).unwrap_or(""));
    let cc = split_addresses(headers.get("cc").map(String::as_str).unwrap_or(""));
    let references = headers
        .get("references")
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(EmailMessage {
        message_id: headers.get("message-id").cloned(),
        from,
        to,
        cc,
        date: headers.get("date").cloned(),
        subject: headers.get("subject").cloned().unwrap_or_default(),
        body: body.trim().to_string(),
        in_reply_to: headers.get("in-reply-to").cloned(),
        references,
    })
}

fn parse_headers(block: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    let mut current_key: Option<String> = None;

    for line in block.lines() {
        if (line.starts_with(' ') || line.starts_with('\t')) && current_key.is_some() {
            let key = current_key.clone().unwrap();
            if let Some(existing) = headers.get_mut(&key) {
                let existing: &mut String = existing;
                existing.push(' ');
                existing.push_str(line.trim());
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_ascii_lowercase();
            headers.insert(key.clone(), value.trim().to_string());
            current_key = Some(key);
        }
    }
    headers
}

/// Splits a comma-separated address list, extracting the bare address from
/// `"Display Name <addr@example.com>"` form when present.
fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match angle_address_pattern().captures(s) {
            Some(caps) => caps[1].trim().to_string(),
            None => s.to_string(),
        })
        .collect()
}

/// Parses an RFC 2822 `Date:` header into a real timestamp, for chronological
/// fallback ordering when threading headers are absent or incomplete.
fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date.trim()).ok()
}

/// Strips leading reply/forward markers for subject-normalized comparisons
/// when thread-linking headers are absent.
fn normalize_subject(subject: &str) -> String {
    let mut s = subject.trim();
    loop {
        let lower = s.to_ascii_lowercase();
        let stripped = ["re:", "fwd:", "fw:"]
            .iter()
            .find_map(|prefix| lower.strip_prefix(prefix).map(|_| s[prefix.len()..].trim_start()));
        match stripped {
            Some(rest) => s = rest,
            None => break,
        }
    }
    s.to_ascii_lowercase()
}

/// Orders messages into a thread. Uses `In-Reply-To`/`References` to chain
/// messages when present; falls back to subject-normalized date ordering
/// (spec §4.6) when threading headers are absent or don't resolve to a
/// full chain.
pub fn reconstruct_thread(mut messages: Vec<EmailMessage>) -> Vec<EmailMessage> {
    let has_threading_headers = messages
        .iter()
        .any(|m| m.in_reply_to.is_some() || !m.references.is_empty());

    if has_threading_headers {
        let by_id: HashMap<String, usize> = messages
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.message_id.clone().map(|id| (id, i)))
            .collect();

        let depth = |m: &EmailMessage| -> usize {
            let mut seen = std::collections::HashSet::new();
            let mut current = m.in_reply_to.clone().or_else(|| m.references.last().cloned());
            let mut d = 0;
            while let Some(id) = current {
                if !seen.insert(id.clone()) {
                    break;
                }
                match by_id.get(&id) {
                    Some(&idx) => {
                        d += 1;
                        current = messages[idx]
                            .in_reply_to
                            .clone()
                            .or_else(|| messages[idx].references.last().cloned());
                    }
                    None => break,
                }
            }
            d
        };
        let depths: Vec<usize> = messages.iter().map(depth).collect();
        let mut indices: Vec<usize> = (0..messages.len()).collect();
        indices.sort_by_key(|&i| (depths[i], messages[i].date.clone()));
        let reordered: Vec<EmailMessage> = indices.into_iter().map(|i| messages[i].clone()).collect();
        return reordered;
    }

    messages.sort_by(|a, b| {
        normalize_subject(&a.subject)
            .cmp(&normalize_subject(&b.subject))
            .then_with(|| {
                match (a.date.as_deref().and_then(parse_date), b.date.as_deref().and_then(parse_date)) {
                    (Some(da), Some(db)) => da.cmp(&db),
                    _ => a.date.cmp(&b.date),
                }
            })
    });
    messages
}

fn render_thread(messages: &[EmailMessage]) -> String {
    let mut rendered = String::new();
    for (i, m) in messages.iter().enumerate() {
        rendered.push_str(&format!(
            "--- message {} ---\nFrom: {}\nTo: {}\nDate: {}\nSubject: {}\n\n{}\n\n",
            i + 1,
            m.from,
            m.to.join(", "),
            m.date.as_deref().unwrap_or("unknown"),
            m.subject,
            m.body,
        ));
    }
    if rendered.chars().count() > MAX_RENDERED_CHARS {
        rendered = rendered.chars().take(MAX_RENDERED_CHARS).collect();
        rendered.push_str("\n\n[... thread truncated ...]");
    }
    rendered
}

/// Runs the email thread analyzer over an already-reconstructed thread.
pub async fn analyze_email_thread<P: LlmProvider>(
    provider: &P,
    messages: &[EmailMessage],
) -> AnalyzeResult<EmailThreadAnalysis> {
    let body = render_thread(messages);
    let system_prompt = email_thread_system_prompt();
    let user_prompt = format!("Analyze this reconstructed email thread:\n\n{body}");

    let analysis: EmailThreadAnalysis = provider
        .generate_structured(&system_prompt.render(&[]), &user_prompt)
        .await?;
    analysis.validate()?;
    Ok(analysis)
}
