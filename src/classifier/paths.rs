use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::keywords::is_project_indicator;
use crate::utils::{path_separator, split_segments};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    WindowsAbsolute,
    PosixAbsolute,
    ProjectStructure,
    FileName,
    DirectoryDescriptor,
}

/// A path-detecting pattern and how much a match counts towards a root's score
pub struct PathPattern {
    pub kind: PatternKind,
    pub regex: Regex,
    pub weight: u32,
}

/// Applied in order over the raw session text
pub static PATH_PATTERNS: LazyLock<Vec<PathPattern>> = LazyLock::new(|| {
    [
        (PatternKind::WindowsAbsolute, r#"(?i)[A-Z]:\\[^\s<>:"|?*]+(?:\\[^\s<>:"|?*]+)+"#, 3),
        (PatternKind::PosixAbsolute, r"(?i)/(?:[a-z0-9_.-]+/)+[a-z0-9_.-]*", 3),
        (
            PatternKind::ProjectStructure,
            r#"(?i)(?:src|app|components|pages|utils|lib|modules|services|api|public|assets)[/\\][^\s<>:"|?*]+"#,
            2,
        ),
        (PatternKind::FileName, r"(?i)[a-z0-9_.-]+\.[a-z]{2,4}(?:\s|$)", 1),
        (
            PatternKind::DirectoryDescriptor,
            r"(?i)[a-z0-9_-]+(?:-[a-z0-9_-]+)*(?:目录|directory|folder|项目|project)",
            1,
        ),
    ]
    .into_iter()
    .map(|(kind, pattern, weight)| PathPattern {
        kind,
        regex: Regex::new(pattern).expect("path pattern must compile"),
        weight,
    })
    .collect()
});

static EXCLUDED_PREFIXES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:C:\\Windows|C:\\Program Files|C:\\Users\\[^\\]+\\AppData|C:\\temp|/tmp|/var|/usr|/bin|/etc)",
    )
    .expect("exclusion pattern must compile")
});

const PROJECT_PATH_KEYWORDS: &[&str] = &[
    "project", "workspace", "repo", "code", "dev", "src", "app", "web", "api", "frontend",
    "backend",
];

const SYSTEM_DIRS: &[&str] = &["windows", "program files", "appdata", "temp", "system32"];

/// Root truncation depths tried for every candidate path (segments, exclusive upper bound)
const MIN_ROOT_DEPTH: usize = 2;
const MAX_ROOT_DEPTH: usize = 6;

/// Everything the path patterns found in a session's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHints {
    /// Plausible project paths with the weight of the pattern that found them
    pub candidates: Vec<(String, u32)>,
    /// Non-path matches that mention a known technology
    pub indicators: Vec<String>,
}

pub fn extract_path_hints(text: &str) -> PathHints {
    let mut hints = PathHints::default();
    for pattern in PATH_PATTERNS.iter() {
        for found in pattern.regex.find_iter(text) {
            let candidate = found.as_str().trim();
            if is_likely_project_path(candidate) {
                hints.candidates.push((candidate.to_string(), pattern.weight));
            } else if is_project_indicator(candidate) {
                hints.indicators.push(candidate.to_string());
            }
        }
    }
    hints
}

/// Whether a matched string plausibly points into a project
///
/// System and temp locations are rejected. Anything mentioning a project-ish word is accepted;
/// other paths need a depth of 2 to 8 segments.
pub fn is_likely_project_path(path: &str) -> bool {
    if path.chars().count() < 3 || EXCLUDED_PREFIXES.is_match(path) {
        return false;
    }

    let lower = path.to_lowercase();
    if PROJECT_PATH_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return true;
    }

    if path.contains(['/', '\\']) {
        let depth = split_segments(path).len();
        return (2..=8).contains(&depth);
    }

    false
}

/// Whether a truncated path is a sensible project root: 2-5 segments, a last segment longer
/// than one character that is not a system directory
pub fn is_reasonable_project_root(path: &str) -> bool {
    if path.chars().count() < 3 {
        return false;
    }

    let segments = split_segments(path);
    if !(2..=5).contains(&segments.len()) {
        return false;
    }

    let last = segments[segments.len() - 1].to_lowercase();
    if SYSTEM_DIRS.iter().any(|dir| last.contains(dir)) {
        return false;
    }

    last.chars().count() > 1
}

/// Pick the most likely project root among weighted candidate paths
///
/// Every candidate votes its weight for each of its prefixes of 2 to 5 segments that is a
/// reasonable root. The highest total wins; ties prefer the deeper root, then the
/// lexicographically smaller one. Without any reasonable root the shortest candidate is
/// returned as-is.
pub fn find_project_root(candidates: &[(String, u32)]) -> Option<String> {
    let mut scores: HashMap<String, (u32, usize)> = HashMap::new();

    for (path, weight) in candidates {
        let separator = path_separator(path).to_string();
        let segments = split_segments(path);
        for depth in MIN_ROOT_DEPTH..segments.len().min(MAX_ROOT_DEPTH) {
            let root = segments[..depth].join(&separator);
            if is_reasonable_project_root(&root) {
                scores.entry(root).or_insert((0, depth)).0 += weight;
            }
        }
    }

    let best = scores
        .into_iter()
        .max_by(|(a_root, (a_score, a_depth)), (b_root, (b_score, b_depth))| {
            a_score
                .cmp(b_score)
                .then_with(|| a_depth.cmp(b_depth))
                .then_with(|| b_root.cmp(a_root))
        })
        .map(|(root, _)| root);

    best.or_else(|| {
        candidates.iter().map(|(path, _)| path).min_by_key(|path| path.chars().count()).cloned()
    })
}
