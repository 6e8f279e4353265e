use crate::models::ProjectDescriptor;
use crate::utils::split_segments;

const NAME_MATCH_SCORE: u32 = 10;
const SEGMENT_MATCH_SCORE: u32 = 5;

/// Minimum score for a known project to be accepted
pub const MIN_KNOWN_SCORE: u32 = 5;

/// Score a known project against lowercased session text
///
/// +10 if the project name appears in the text, +5 for every path segment longer than two
/// characters that appears in the text.
pub fn score_known_project(text_lower: &str, project: &ProjectDescriptor) -> u32 {
    let mut score = 0;

    let name = project.name.to_lowercase();
    if !name.is_empty() && text_lower.contains(&name) {
        score += NAME_MATCH_SCORE;
    }

    let root = project.root_path.to_lowercase();
    for segment in split_segments(&root) {
        if segment.chars().count() > 2 && text_lower.contains(segment) {
            score += SEGMENT_MATCH_SCORE;
        }
    }

    score
}

/// Best-scoring known project, if it reaches [`MIN_KNOWN_SCORE`]
///
/// Ties keep the project listed first.
pub fn match_known_project<'a>(
    text_lower: &str,
    known: &'a [ProjectDescriptor],
) -> Option<&'a ProjectDescriptor> {
    let mut best: Option<(&ProjectDescriptor, u32)> = None;
    for project in known {
        let score = score_known_project(text_lower, project);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((project, score));
        }
    }
    best.filter(|(_, score)| *score >= MIN_KNOWN_SCORE).map(|(project, _)| project)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<ProjectDescriptor> {
        vec![
            ProjectDescriptor::new("cursor-web", "/home/dev/repos/cursor-web", 0),
            ProjectDescriptor::new("plcopen", "C:\\work\\plcopen", 0),
        ]
    }

    #[test]
    fn test_score_name_and_segments() {
        let project = &known()[0];
        // name (10) + segments "home", "dev", "repos", "cursor-web" (5 each)
        let score = score_known_project("open /home/dev/repos/cursor-web/index.js", project);
        assert_eq!(score, 30);
    }

    #[test]
    fn test_match_known_project_by_name() {
        let projects = known();
        let matched = match_known_project("fix the plcopen parser", &projects);
        assert_eq!(matched.map(|p| p.name.as_str()), Some("plcopen"));
    }

    #[test]
    fn test_match_requires_minimum_score() {
        let projects = known();
        assert!(match_known_project("nothing relevant here", &projects).is_none());
        assert!(match_known_project("anything", &[]).is_none());
    }

    #[test]
    fn test_match_tie_keeps_first_project() {
        let projects = vec![
            ProjectDescriptor::new("alpha", "/x/shared", 0),
            ProjectDescriptor::new("beta", "/y/shared", 0),
        ];
        let matched = match_known_project("the shared folder", &projects);
        assert_eq!(matched.map(|p| p.name.as_str()), Some("alpha"));
    }
}
