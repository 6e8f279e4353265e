use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::assembler::assemble_sessions;
use crate::classifier::{Classification, ClassificationSource, classify_session};
use crate::config::ExtractorConfig;
use crate::export::load_mapping;
use crate::mapping::{ProjectMapping, build_path_mapping, mapped_descriptor};
use crate::models::{ChatRecord, ProjectDescriptor, RawRecord};
use crate::parsers::{ParseDiagnostics, parse_bubbles};
use crate::store::sqlite::DISK_KV_TABLE;
use crate::store::{KeyValueStore, SqliteStore, discover_known_projects};

/// What happened during one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub records_read: usize,
    pub parse: ParseDiagnostics,
    pub sessions: usize,
    /// Conversations dropped because they had no non-empty message
    pub empty_sessions: usize,
    /// Sessions exported with a `null` timestamp
    pub sessions_without_timestamp: usize,
    pub known_projects: usize,
    /// How many sessions each classification strategy labelled
    pub sources: BTreeMap<ClassificationSource, usize>,
}

/// Turn raw bubble rows into classified chats, newest first
///
/// `overrides` takes precedence over heuristic classification for the sessions it maps.
/// Sessions without a timestamp sort last; ties keep the assembler's order.
pub fn build_chats(
    records: &[RawRecord],
    known: &[ProjectDescriptor],
    overrides: Option<&ProjectMapping>,
    prefix: &str,
) -> (Vec<ChatRecord>, ExtractionReport) {
    let mut report = ExtractionReport {
        records_read: records.len(),
        known_projects: known.len(),
        ..Default::default()
    };

    let outcome = parse_bubbles(records, prefix);
    report.parse = outcome.diagnostics;

    let assembled = assemble_sessions(outcome.fragments);
    report.sessions = assembled.sessions.len();
    report.empty_sessions = assembled.discarded;

    // Classification only reads the session and the known set, so sessions are independent
    let classifications: Vec<Classification> = assembled
        .sessions
        .par_iter()
        .enumerate()
        .map(|(ordinal, session)| match overrides.and_then(|m| m.get(&session.session_id)) {
            Some(entry) => Classification {
                project: mapped_descriptor(entry),
                source: ClassificationSource::Mapping,
            },
            None => classify_session(session, ordinal, known),
        })
        .collect();

    let mut chats: Vec<ChatRecord> = assembled
        .sessions
        .into_iter()
        .zip(classifications)
        .map(|(session, classification)| {
            *report.sources.entry(classification.source).or_insert(0) += 1;
            if session.timestamp.is_none() {
                report.sessions_without_timestamp += 1;
            }
            ChatRecord {
                session_id: session.session_id,
                project: classification.project,
                messages: session.messages,
                timestamp: session.timestamp,
            }
        })
        .collect();

    chats.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if report.sessions_without_timestamp > 0 {
        warn!("{} sessions have no timestamp and sort last", report.sessions_without_timestamp);
    }
    info!(
        "Built {} chats from {} bubbles ({} undecodable)",
        chats.len(),
        report.records_read,
        report.parse.decode_errors
    );

    (chats, report)
}

/// Read every bubble row from the global database
///
/// An unavailable database is reported and treated as empty.
pub fn read_bubble_records(config: &ExtractorConfig) -> Vec<RawRecord> {
    let db_path = config.global_db_path();
    let records = SqliteStore::open(&db_path, DISK_KV_TABLE)
        .and_then(|store| store.scan_prefix(&config.bubble_scan_prefix()));

    match records {
        Ok(records) => {
            info!("Read {} bubbles from {}", records.len(), db_path.display());
            records
        }
        Err(e) => {
            warn!("No chat data read: {}", e);
            Vec::new()
        }
    }
}

fn known_projects(config: &ExtractorConfig) -> Vec<ProjectDescriptor> {
    match discover_known_projects(&config.workspace_storage_dir(), config.max_workspaces) {
        Ok(projects) => projects,
        Err(e) => {
            warn!("Failed to discover workspace projects: {:#}", e);
            Vec::new()
        }
    }
}

fn mapping_overrides(config: &ExtractorConfig) -> Option<ProjectMapping> {
    if !config.mapping_path.is_file() {
        return None;
    }
    match load_mapping(&config.mapping_path) {
        Ok(mapping) => {
            info!("Using {} path mappings from {}", mapping.len(), config.mapping_path.display());
            Some(mapping)
        }
        Err(e) => {
            warn!("Ignoring path mapping: {:#}", e);
            None
        }
    }
}

/// Run the full pipeline against the configured Cursor data directory
pub fn extract_chats(config: &ExtractorConfig) -> (Vec<ChatRecord>, ExtractionReport) {
    let records = read_bubble_records(config);
    if records.is_empty() {
        return build_chats(&records, &[], None, &config.bubble_prefix);
    }

    let known = known_projects(config);
    let overrides = mapping_overrides(config);
    build_chats(&records, &known, overrides.as_ref(), &config.bubble_prefix)
}

/// Build the attachment-path mapping from the configured global database
pub fn extract_path_mapping(config: &ExtractorConfig) -> ProjectMapping {
    let records = read_bubble_records(config);
    build_path_mapping(&records, &config.bubble_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::parsers::bubble::BUBBLE_KEY_PREFIX;

    #[test]
    fn test_build_chats_scenario() {
        let records = vec![
            RawRecord::new("bubbleId:ABC123:1", r#"{"type":1,"text":"hello"}"#),
            RawRecord::new("bubbleId:ABC123:2", r#"{"type":2,"text":"world","cTime":100}"#),
        ];

        let (chats, report) = build_chats(&records, &[], None, BUBBLE_KEY_PREFIX);

        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].session_id, "ABC123");
        let roles: Vec<Role> = chats[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(chats[0].messages[0].content, "hello");
        assert_eq!(chats[0].messages[1].content, "world");
        assert_eq!(report.sessions, 1);
        assert_eq!(report.parse.parsed, 2);
    }

    #[test]
    fn test_build_chats_empty_input() {
        let (chats, report) = build_chats(&[], &[], None, BUBBLE_KEY_PREFIX);
        assert!(chats.is_empty());
        assert_eq!(report, ExtractionReport::default());
    }

    #[test]
    fn test_build_chats_sorts_newest_first_with_missing_last() {
        let records = vec![
            RawRecord::new("bubbleId:OLD:1", r#"{"type":1,"text":"old","cTime":1000}"#),
            RawRecord::new("bubbleId:NONE:1", r#"{"type":1,"text":"undated"}"#),
            RawRecord::new("bubbleId:NEW:1", r#"{"type":1,"text":"new","cTime":5000}"#),
        ];

        let (chats, report) = build_chats(&records, &[], None, BUBBLE_KEY_PREFIX);

        let ids: Vec<&str> = chats.iter().map(|c| c.session_id.as_str()).collect();
        assert_eq!(ids, vec!["NEW", "OLD", "NONE"]);
        assert_eq!(report.sessions_without_timestamp, 1);
    }

    #[test]
    fn test_build_chats_mapping_overrides_classification() {
        let records = vec![RawRecord::new(
            "bubbleId:M1:1",
            r#"{"type":1,"text":"react hooks useState component"}"#,
        )];
        let mut mapping = ProjectMapping::new();
        mapping.insert("M1".to_string(), ProjectDescriptor::new("x", "/home/me/repos/shop", 3));

        let (chats, report) = build_chats(&records, &[], Some(&mapping), BUBBLE_KEY_PREFIX);

        assert_eq!(chats[0].project, ProjectDescriptor::new("shop", "/home/me/repos/shop", 3));
        assert_eq!(report.sources.get(&ClassificationSource::Mapping), Some(&1));
    }

    #[test]
    fn test_build_chats_drops_sessions_without_content() {
        let records = vec![
            RawRecord::new("bubbleId:BLANK:1", r#"{"type":1,"text":"   "}"#),
            RawRecord::new("bubbleId:REAL:1", r#"{"type":1,"text":"content"}"#),
        ];

        let (chats, report) = build_chats(&records, &[], None, BUBBLE_KEY_PREFIX);

        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].session_id, "REAL");
        assert_eq!(report.empty_sessions, 1);
    }

    #[test]
    fn test_extract_chats_with_missing_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ExtractorConfig::new(dir.path());
        let (chats, report) = extract_chats(&config);
        assert!(chats.is_empty());
        assert_eq!(report.records_read, 0);
    }
}
