//! Conversation -> project mapping derived from file attachments
//!
//! Bubbles carry attachment metadata (attached folders, relevant files, recently viewed files)
//! that is a far stronger project signal than message text. [`build_path_mapping`] turns those
//! into a per-conversation [`ProjectDescriptor`]; [`apply_mapping`] overrides the project of
//! already classified chats with it. [`regroup`] recomputes exported projects from their root
//! paths alone.

pub mod regroup;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;
use tracing::{debug, info};

use crate::models::{ChatRecord, ProjectDescriptor, RawRecord};
use crate::parsers::split_bubble_key;
use crate::utils::{path_separator, project_name_from_path, split_segments, strip_file_uri};

/// Conversation id -> best-guess project
pub type ProjectMapping = BTreeMap<String, ProjectDescriptor>;

/// Bubble fields that may contain file or folder references
pub const PATH_FIELDS: &[&str] = &[
    "attachedFolders",
    "attachedFoldersNew",
    "relevantFiles",
    "attachedCodeChunks",
    "recentlyViewedFiles",
    "context",
];

const PATH_INDICATORS: &[&str] = &[
    "file:///",
    "C:\\",
    "D:\\",
    "/home/",
    "/Users/",
    ".git",
    "package.json",
    "node_modules",
    ".vscode",
];

const PATH_EXTENSIONS: &[&str] = &[".js", ".ts", ".py", ".json", ".md", ".txt", ".html", ".css"];

/// Segment words that mark a directory as a project root
const ROOT_MARKERS: &[&str] = &["project", "repo", "src", "app"];

/// Directories whose child is taken as the project name
const PROJECT_CONTAINERS: &[&str] = &["repos", "projects"];

/// Cleaned paths this short are discarded
const MIN_CLEAN_PATH_LEN: usize = 10;

/// Build the mapping from raw bubble rows
///
/// Rows with malformed keys or payloads are skipped silently; the regular parser reports them.
pub fn build_path_mapping(records: &[RawRecord], prefix: &str) -> ProjectMapping {
    let mut conversation_paths: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for record in records {
        let Some(key) = split_bubble_key(&record.key, prefix) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(&record.value) else {
            continue;
        };

        let paths = paths_from_bubble(&value);
        if !paths.is_empty() {
            conversation_paths.entry(key.conversation_id.to_string()).or_default().extend(paths);
        }
    }

    let mapping: ProjectMapping = conversation_paths
        .into_iter()
        .filter_map(|(conversation_id, paths)| {
            let unique: BTreeSet<&String> = paths.iter().collect();
            let root = most_common(&paths)?;
            let project =
                ProjectDescriptor::new(project_name_from_path(&root), root, unique.len());
            Some((conversation_id, project))
        })
        .collect();

    info!("Mapped {} conversations to attachment paths", mapping.len());
    mapping
}

/// Cleaned, de-duplicated paths referenced by one bubble's attachment fields
pub fn paths_from_bubble(bubble: &Value) -> BTreeSet<String> {
    let mut raw = Vec::new();
    for field in PATH_FIELDS {
        if let Some(value) = bubble.get(field) {
            collect_paths(value, &mut raw);
        }
    }
    raw.iter()
        .filter_map(|path| clean_path(path))
        .filter(|path| path.chars().count() > MIN_CLEAN_PATH_LEN)
        .collect()
}

/// Recursively collect path-looking strings from a JSON value
pub fn collect_paths(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if looks_like_path(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_paths(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_paths(item, out)),
        _ => {}
    }
}

pub fn looks_like_path(text: &str) -> bool {
    if text.chars().count() < 5 {
        return false;
    }
    if PATH_INDICATORS.iter().any(|indicator| text.contains(indicator)) {
        return true;
    }
    text.contains(['/', '\\']) && PATH_EXTENSIONS.iter().any(|ext| text.contains(ext))
}

/// Reduce a file reference to its likely project directory
///
/// Cuts at the deepest segment containing a root marker (project, repo, src, app); without one,
/// drops the last segment.
pub fn clean_path(raw: &str) -> Option<String> {
    let path = strip_file_uri(raw);
    if path.is_empty() {
        return None;
    }

    let separator = path_separator(&path).to_string();
    let segments = split_segments(&path);

    for i in (1..segments.len()).rev() {
        let segment = segments[i].to_lowercase();
        if ROOT_MARKERS.iter().any(|marker| segment.contains(marker)) {
            return Some(segments[..=i].join(&separator));
        }
    }

    if segments.len() >= 2 {
        return Some(segments[..segments.len() - 1].join(&separator));
    }

    Some(path)
}

/// Most frequent path; ties go to the lexicographically smallest
fn most_common(paths: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for path in paths {
        *counts.entry(path.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_path, a_count), (b_path, b_count)| {
            a_count.cmp(b_count).then_with(|| b_path.cmp(a_path))
        })
        .map(|(path, _)| path.to_string())
}

/// Display name for a mapped root: the child of a `repos`/`projects` directory if present,
/// otherwise the last segment
pub fn main_project_name(root: &str) -> String {
    let segments = split_segments(root);
    let container = segments
        .iter()
        .position(|segment| PROJECT_CONTAINERS.contains(&segment.to_lowercase().as_str()));
    if let Some(i) = container
        && let Some(child) = segments.get(i + 1).filter(|child| !child.is_empty())
    {
        return child.to_string();
    }
    project_name_from_path(root)
}

/// The descriptor a mapping entry contributes to an exported chat
pub fn mapped_descriptor(entry: &ProjectDescriptor) -> ProjectDescriptor {
    ProjectDescriptor::new(
        main_project_name(&entry.root_path),
        entry.root_path.clone(),
        entry.file_count,
    )
}

/// Override the project of every chat whose session id is mapped
///
/// Returns the number of chats changed. Unmapped chats keep their project.
pub fn apply_mapping(chats: &mut [ChatRecord], mapping: &ProjectMapping) -> usize {
    let mut applied = 0;
    for chat in chats.iter_mut() {
        if let Some(entry) = mapping.get(&chat.session_id) {
            chat.project = mapped_descriptor(entry);
            debug!("Mapped {} -> {}", chat.session_id, chat.project.name);
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parsers::bubble::BUBBLE_KEY_PREFIX;

    #[test]
    fn test_looks_like_path() {
        assert!(looks_like_path("file:///home/dev/x"));
        assert!(looks_like_path("some/dir/index.ts"));
        assert!(looks_like_path("C:\\work"));
        assert!(!looks_like_path("a/b"));
        assert!(!looks_like_path("plain words here"));
    }

    #[test]
    fn test_clean_path_cuts_at_root_marker() {
        assert_eq!(
            clean_path("file:///home/dev/my-repo/lib/util/strings.ts"),
            Some("/home/dev/my-repo".to_string())
        );
        assert_eq!(
            clean_path("C:\\work\\robot\\src\\main.cpp"),
            Some("C:\\work\\robot\\src".to_string())
        );
    }

    #[test]
    fn test_clean_path_without_marker_drops_file() {
        assert_eq!(clean_path("/home/dev/notes/todo.md"), Some("/home/dev/notes".to_string()));
        assert_eq!(clean_path(""), None);
    }

    #[test]
    fn test_paths_from_bubble_reads_nested_fields() {
        let bubble = json!({
            "text": "/home/dev/ignored/text.md",
            "relevantFiles": ["/home/dev/shop/readme.md"],
            "attachedCodeChunks": [
                {"relativeWorkspacePath": "/home/dev/shop/readme.md", "lines": 3}
            ],
            "context": {"folders": [{"uri": "file:///home/dev/blog/index.html"}]}
        });
        let paths = paths_from_bubble(&bubble);
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["/home/dev/blog", "/home/dev/shop"]);
    }

    #[test]
    fn test_build_path_mapping_picks_most_common() {
        let records = vec![
            RawRecord::new(
                "bubbleId:C1:1",
                json!({"relevantFiles": ["/home/dev/shop/a.md"]}).to_string(),
            ),
            RawRecord::new(
                "bubbleId:C1:2",
                json!({"relevantFiles": ["/home/dev/shop/b.md", "/home/dev/blog/c.md"]})
                    .to_string(),
            ),
            RawRecord::new("bubbleId:C2:1", json!({"text": "no attachments"}).to_string()),
            RawRecord::new("bubbleId:C3:1", "not json"),
        ];

        let mapping = build_path_mapping(&records, BUBBLE_KEY_PREFIX);

        assert_eq!(mapping.len(), 1);
        let project = &mapping["C1"];
        assert_eq!(project.root_path, "/home/dev/shop");
        assert_eq!(project.name, "shop");
        assert_eq!(project.file_count, 2);
    }

    #[test]
    fn test_main_project_name() {
        assert_eq!(main_project_name("C:\\Users\\me\\Repos\\plc-tool\\src"), "plc-tool");
        assert_eq!(main_project_name("/home/me/projects/blog"), "blog");
        assert_eq!(main_project_name("/home/me/code/site"), "site");
    }

    #[test]
    fn test_apply_mapping_overrides_only_mapped() {
        let mut chats = vec![
            ChatRecord {
                session_id: "A".to_string(),
                project: ProjectDescriptor::new("React Project", "C:\\Projects\\React Project", 7),
                messages: Vec::new(),
                timestamp: None,
            },
            ChatRecord {
                session_id: "B".to_string(),
                project: ProjectDescriptor::new("Unclassified Project 2", "C:\\Projects\\x", 6),
                messages: Vec::new(),
                timestamp: None,
            },
        ];
        let mut mapping = ProjectMapping::new();
        mapping.insert(
            "A".to_string(),
            ProjectDescriptor::new("app", "/home/me/Repos/shop/app", 4),
        );

        let applied = apply_mapping(&mut chats, &mapping);

        assert_eq!(applied, 1);
        assert_eq!(chats[0].project, ProjectDescriptor::new("shop", "/home/me/Repos/shop/app", 4));
        assert_eq!(chats[1].project.name, "Unclassified Project 2");
    }
}
