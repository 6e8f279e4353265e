use anyhow::{Result, bail};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{BubblePayload, MessageFragment, RawRecord, Role};

/// Key prefix of chat bubbles in the global database
pub const BUBBLE_KEY_PREFIX: &str = "bubbleId";

const KEY_DELIMITER: char = ':';

/// Only the first few decode failures are logged individually
const MAX_REPORTED_ERRORS: usize = 5;

/// Identifiers embedded in a bubble key (`<prefix>:<conversation>:<bubble>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleKey<'a> {
    pub conversation_id: &'a str,
    pub bubble_id: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseDiagnostics {
    pub total: usize,
    pub parsed: usize,
    /// Keys without the expected prefix or with fewer than three segments
    pub skipped_keys: usize,
    pub empty_values: usize,
    pub decode_errors: usize,
    /// Messages of the first [`MAX_REPORTED_ERRORS`] decode failures
    pub reported_errors: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub fragments: Vec<MessageFragment>,
    pub diagnostics: ParseDiagnostics,
}

/// Split a bubble key into its identifiers
///
/// Returns `None` if the key does not start with `prefix:` or has fewer than three segments.
pub fn split_bubble_key<'a>(key: &'a str, prefix: &str) -> Option<BubbleKey<'a>> {
    let mut parts = key.split(KEY_DELIMITER);
    if parts.next()? != prefix {
        return None;
    }
    let conversation_id = parts.next()?;
    let bubble_id = parts.next()?;
    Some(BubbleKey { conversation_id, bubble_id })
}

/// Decode a bubble value; the payload must be a JSON object
pub fn decode_payload(raw: &str) -> Result<BubblePayload> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        bail!("bubble payload is not a JSON object");
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse raw bubble rows into fragments
///
/// Every row with a well-formed key and a decodable payload yields exactly one fragment whose
/// conversation id is the key's second segment. Content is trimmed and may be empty.
pub fn parse_bubbles(records: &[RawRecord], prefix: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let diagnostics = &mut outcome.diagnostics;
    diagnostics.total = records.len();

    for record in records {
        let Some(key) = split_bubble_key(&record.key, prefix) else {
            diagnostics.skipped_keys += 1;
            continue;
        };

        if record.value.trim().is_empty() {
            diagnostics.empty_values += 1;
            continue;
        }

        let payload = match decode_payload(&record.value) {
            Ok(payload) => payload,
            Err(e) => {
                diagnostics.decode_errors += 1;
                if diagnostics.reported_errors.len() < MAX_REPORTED_ERRORS {
                    warn!("Failed to decode bubble {}: {}", record.key, e);
                    diagnostics.reported_errors.push(format!("{}: {}", record.key, e));
                }
                continue;
            }
        };

        if let Some(embedded) = payload.conversation_id.as_deref()
            && embedded != key.conversation_id
        {
            debug!(
                "Bubble {} embeds conversation {} but key says {}; using key",
                record.key, embedded, key.conversation_id
            );
        }

        let role = Role::from_type_code(payload.type_code.as_ref());
        outcome.fragments.push(MessageFragment {
            conversation_id: key.conversation_id.to_string(),
            bubble_id: key.bubble_id.to_string(),
            role,
            content: payload.best_content(role).trim().to_string(),
            timestamp: payload.effective_timestamp(),
        });
        diagnostics.parsed += 1;
    }

    if diagnostics.decode_errors > MAX_REPORTED_ERRORS {
        warn!(
            "{} more bubble decode failures not shown",
            diagnostics.decode_errors - MAX_REPORTED_ERRORS
        );
    }
    debug!(
        "Parsed {} of {} bubbles ({} bad keys, {} empty, {} undecodable)",
        diagnostics.parsed,
        diagnostics.total,
        diagnostics.skipped_keys,
        diagnostics.empty_values,
        diagnostics.decode_errors
    );

    outcome
}
