//! Regrouping of exported chats by their real project root
//!
//! A recorded root often points below the project (a `src` folder, a single file) or at a
//! checkout inside a `Repos`/`temp` collection. Regrouping rewrites every chat's project from
//! its current root path so chats of one checkout share one descriptor.

use tracing::debug;

use crate::classifier::is_placeholder_root;
use crate::models::{ChatRecord, ProjectDescriptor};
use crate::utils::{path_separator, split_segments};

/// Directories whose direct child is a project checkout (case-sensitive)
const CHECKOUT_CONTAINERS: &[&str] = &["Repos", "temp"];

/// Segments that sit directly below a project root
const ROOT_CHILDREN: &[&str] = &["src", "app", "lib", "project", "workspace"];

/// Project name for roots that reveal nothing
pub const OTHER_PROJECT: &str = "Other";

/// Real project root and name for a recorded path
///
/// A trailing file name is dropped first. Then, in order:
/// 1. the child of a `Repos` or `temp` directory is the project;
/// 2. the first `src`/`app`/`lib`/`project`/`workspace` segment that has a parent ends the
///    root, and the parent names it;
/// 3. otherwise the parent directory is the root and its last segment the name.
///
/// Returns `None` for paths with fewer than two segments.
///
/// # Examples
///
/// ```
/// use cursor_chat_extractor::mapping::regroup::real_project_root;
///
/// assert_eq!(
///     real_project_root("/Users/me/Repos/shop/src/app.ts"),
///     Some(("/Users/me/Repos/shop".to_string(), "shop".to_string()))
/// );
/// assert_eq!(
///     real_project_root("/home/dev/robot/src/main.rs"),
///     Some(("/home/dev/robot/src".to_string(), "robot".to_string()))
/// );
/// assert_eq!(real_project_root("/home"), None);
/// ```
pub fn real_project_root(path: &str) -> Option<(String, String)> {
    let path = path.trim();
    let separator = path_separator(path).to_string();
    let mut segments = split_segments(path);
    while segments.len() > 1 && segments.last() == Some(&"") {
        segments.pop();
    }
    if segments.last().is_some_and(|last| last.contains('.')) {
        segments.pop();
    }

    for container in CHECKOUT_CONTAINERS {
        if let Some(i) = segments.iter().position(|segment| segment == container)
            && i > 0
            && let Some(child) = segments.get(i + 1).filter(|child| !child.is_empty())
        {
            return Some((segments[..i + 2].join(&separator), child.to_string()));
        }
    }

    let named: Vec<usize> = (0..segments.len()).filter(|&i| !segments[i].is_empty()).collect();
    if named.len() <= 1 {
        return None;
    }

    for (k, &i) in named.iter().enumerate().skip(1) {
        if ROOT_CHILDREN.contains(&segments[i].to_lowercase().as_str()) {
            let name = segments[named[k - 1]].to_string();
            return Some((segments[..=i].join(&separator), name));
        }
    }

    let last = named[named.len() - 1];
    let name = segments[named[named.len() - 2]].to_string();
    Some((segments[..last].join(&separator), name))
}

/// The descriptor a project regroups to; the file count is kept
pub fn regroup_project(project: &ProjectDescriptor) -> ProjectDescriptor {
    match real_project_root(&project.root_path) {
        Some((root, name)) => ProjectDescriptor::new(name, root, project.file_count),
        None => {
            ProjectDescriptor::new(OTHER_PROJECT, project.root_path.clone(), project.file_count)
        }
    }
}

/// Regroup every chat whose root was observed rather than synthesized
///
/// Returns the number of chats whose project changed.
pub fn regroup_chats(chats: &mut [ChatRecord]) -> usize {
    let mut changed = 0;
    for chat in chats.iter_mut() {
        if is_placeholder_root(&chat.project.root_path) {
            continue;
        }
        let project = regroup_project(&chat.project);
        if project != chat.project {
            debug!("Regrouped {}: {} -> {}", chat.session_id, chat.project.name, project.name);
            chat.project = project;
            changed += 1;
        }
    }
    changed
}
