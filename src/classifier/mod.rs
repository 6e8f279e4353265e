//! Heuristic project classification of conversations
//!
//! Strategies run in order until one produces a descriptor:
//!
//! 1. [`known`] - score the known-project set against the session text
//! 2. [`paths`] - weighted path patterns, resolved to the most common project root; failing
//!    that, the most frequent technology indicator among the non-path matches
//! 3. [`keywords`] - technology inferred from keyword hits
//! 4. a numbered placeholder
//!
//! Classification is a pure function of the session, its ordinal and the known-project set.

pub mod keywords;
pub mod known;
pub mod paths;

use std::fmt;

use crate::models::{ProjectDescriptor, Session};
use crate::utils::project_name_from_path;

/// Parent directory used for synthesized project roots
pub const PLACEHOLDER_ROOT: &str = "C:\\Projects";

/// Added to the message count to form a synthetic file count
const SYNTHETIC_FILE_BONUS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassificationSource {
    Mapping,
    KnownProject,
    PathHint,
    Indicator,
    Keyword,
    Fallback,
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClassificationSource::Mapping => "path mapping",
            ClassificationSource::KnownProject => "known project",
            ClassificationSource::PathHint => "path hint",
            ClassificationSource::Indicator => "technology indicator",
            ClassificationSource::Keyword => "keyword",
            ClassificationSource::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub project: ProjectDescriptor,
    pub source: ClassificationSource,
}

pub fn placeholder_root(name: &str) -> String {
    format!("{}\\{}", PLACEHOLDER_ROOT, name)
}

/// Whether a root was synthesized by [`placeholder_root`] rather than observed
pub fn is_placeholder_root(path: &str) -> bool {
    path.strip_prefix(PLACEHOLDER_ROOT).is_some_and(|rest| rest.starts_with('\\'))
}

pub fn fallback_name(ordinal: usize) -> String {
    format!("Unclassified Project {}", ordinal + 1)
}

/// Classify one session
///
/// `ordinal` is the session's position in the batch and only affects the placeholder name.
pub fn classify_session(
    session: &Session,
    ordinal: usize,
    known: &[ProjectDescriptor],
) -> Classification {
    let text = session.text();

    if let Some(project) = known::match_known_project(&text.to_lowercase(), known) {
        return Classification {
            project: project.clone(),
            source: ClassificationSource::KnownProject,
        };
    }

    let file_count = session.messages.len() + SYNTHETIC_FILE_BONUS;
    let synthetic = |name: String, source| Classification {
        project: ProjectDescriptor::new(name.clone(), placeholder_root(&name), file_count),
        source,
    };

    let hints = paths::extract_path_hints(&text);
    if let Some(root) = paths::find_project_root(&hints.candidates) {
        let name = project_name_from_path(&root);
        return Classification {
            project: ProjectDescriptor::new(name, root, file_count),
            source: ClassificationSource::PathHint,
        };
    }

    if let Some(name) = keywords::name_from_indicators(&hints.indicators) {
        return synthetic(name, ClassificationSource::Indicator);
    }

    if let Some(tech) = keywords::infer_technology(&text) {
        return synthetic(tech.to_string(), ClassificationSource::Keyword);
    }

    synthetic(fallback_name(ordinal), ClassificationSource::Fallback)
}
