use std::borrow::Cow;
use std::env;
use std::path::Path;

use percent_encoding::percent_decode_str;

const FILE_URI_PREFIX: &str = "file://";

/// Placeholder name for paths that have no usable segment
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Converts a `file://` URI (or a plain path) into a percent-decoded path string
///
/// POSIX URIs keep their leading slash; Windows drive URIs lose it.
///
/// # Examples
///
/// ```
/// use cursor_chat_extractor::utils::paths::strip_file_uri;
///
/// assert_eq!(strip_file_uri("file:///home/dev/my%20app"), "/home/dev/my app");
/// assert_eq!(strip_file_uri("file:///c%3A/Users/dev/app"), "c:/Users/dev/app");
/// assert_eq!(strip_file_uri("/already/plain"), "/already/plain");
/// ```
pub fn strip_file_uri(raw: &str) -> String {
    let decoded = percent_decode_str(raw.trim()).decode_utf8_lossy();
    let Some(rest) = decoded.strip_prefix(FILE_URI_PREFIX) else {
        return decoded.into_owned();
    };

    // file:///c:/... is a Windows drive path; file:///home/... is POSIX
    let without_root = rest.strip_prefix('/').unwrap_or(rest);
    if has_drive_letter(without_root) { without_root.to_string() } else { rest.to_string() }
}

fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Splits a path on both `/` and `\`, keeping empty segments (a leading `/` yields `""`)
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).collect()
}

/// The separator style a path uses: `\` if it contains any backslash, otherwise `/`
pub fn path_separator(path: &str) -> char {
    if path.contains('\\') { '\\' } else { '/' }
}

/// Last non-empty segment of a path, used as a project's display name
///
/// # Examples
///
/// ```
/// use cursor_chat_extractor::utils::paths::project_name_from_path;
///
/// assert_eq!(project_name_from_path("C:\\Users\\dev\\shop-api\\"), "shop-api");
/// assert_eq!(project_name_from_path("/home/dev/notes"), "notes");
/// assert_eq!(project_name_from_path(""), "Unknown Project");
/// ```
pub fn project_name_from_path(path: &str) -> String {
    split_segments(path)
        .into_iter()
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}

/// Longest common directory of a set of file paths
///
/// Each path is treated as a file, so its last segment is dropped before comparing.
/// Returns `None` if the inputs share no directory.
pub fn common_directory(paths: &[String]) -> Option<String> {
    let first = paths.first()?;
    let separator = path_separator(first);

    let mut common: Vec<&str> = split_segments(first);
    common.pop();

    for path in &paths[1..] {
        let mut segments = split_segments(path);
        segments.pop();
        let shared = common.iter().zip(&segments).take_while(|(a, b)| a == b).count();
        common.truncate(shared);
    }

    if common.iter().all(|segment| segment.is_empty()) {
        return None;
    }

    Some(common.join(&separator.to_string()))
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use cursor_chat_extractor::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/Library/Application Support/Cursor");
/// // Returns "~/Library/Application Support/Cursor" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_strip_file_uri_posix() {
        assert_eq!(
            strip_file_uri("file:///Users/dev/project/src/main.ts"),
            "/Users/dev/project/src/main.ts"
        );
    }

    #[test]
    fn test_strip_file_uri_windows_drive() {
        assert_eq!(strip_file_uri("file:///d%3A/work/app/index.js"), "d:/work/app/index.js");
        assert_eq!(strip_file_uri("file:///C:/work/app"), "C:/work/app");
    }

    #[test]
    fn test_strip_file_uri_plain_path_is_decoded() {
        assert_eq!(strip_file_uri("C:\\My%20Projects\\app"), "C:\\My Projects\\app");
    }

    #[test]
    fn test_split_segments_mixed_separators() {
        assert_eq!(split_segments("C:\\a/b\\c"), vec!["C:", "a", "b", "c"]);
        assert_eq!(split_segments("/a/b"), vec!["", "a", "b"]);
    }

    #[test]
    fn test_project_name_from_path() {
        assert_eq!(project_name_from_path("/home/dev/cursor-web/"), "cursor-web");
        assert_eq!(project_name_from_path("/"), UNKNOWN_PROJECT);
    }

    #[test]
    fn test_common_directory_of_sibling_files() {
        let paths = vec![
            "/home/dev/shop/src/app.ts".to_string(),
            "/home/dev/shop/src/lib/util.ts".to_string(),
            "/home/dev/shop/package.json".to_string(),
        ];
        assert_eq!(common_directory(&paths), Some("/home/dev/shop".to_string()));
    }

    #[test]
    fn test_common_directory_single_file_is_parent() {
        let paths = vec!["C:\\work\\game\\main.cpp".to_string()];
        assert_eq!(common_directory(&paths), Some("C:\\work\\game".to_string()));
    }

    #[test]
    fn test_common_directory_disjoint_roots() {
        let paths = vec!["/a/x.txt".to_string(), "/b/y.txt".to_string()];
        assert_eq!(common_directory(&paths), None);
        assert_eq!(common_directory(&[]), None);
    }

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/Users/testuser/Library/Application Support/Cursor");
        let formatted = format_path_with_tilde_internal(&path, Some("/Users/testuser"));
        assert_eq!(formatted, "~/Library/Application Support/Cursor");

        let path2 = PathBuf::from("/opt/cursor");
        let formatted2 = format_path_with_tilde_internal(&path2, Some("/Users/testuser"));
        assert_eq!(formatted2, "/opt/cursor");
    }
}
