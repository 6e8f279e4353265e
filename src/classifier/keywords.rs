use std::collections::HashMap;

/// Technology label and the keywords that vote for it, in tie-break order
pub const TECH_KEYWORDS: &[(&str, &[&str])] = &[
    ("Web Development", &["html", "css", "javascript", "web", "browser", "浏览器", "网页"]),
    ("React Project", &["react", "jsx", "component", "hook", "state"]),
    ("Vue Project", &["vue", "vuex", "router", "template"]),
    ("Node Project", &["node", "npm", "express", "server", "服务器"]),
    ("Python Project", &["python", "pip", "django", "flask", "fastapi"]),
    ("API Project", &["api", "rest", "graphql", "endpoint", "接口"]),
    ("Database Project", &["database", "sql", "mysql", "postgresql", "mongodb", "数据库"]),
    ("Mobile Development", &["mobile", "android", "ios", "react-native", "flutter", "移动"]),
    ("Desktop Application", &["desktop", "electron", "tauri", "qt", "桌面"]),
    ("Game Development", &["game", "unity", "unreal", "godot", "游戏"]),
    (
        "Machine Learning",
        &["ml", "ai", "tensorflow", "pytorch", "sklearn", "机器学习", "人工智能"],
    ),
];

/// Words that mark a non-path match as naming a technology or a project
const PROJECT_INDICATORS: &[&str] = &[
    "cursor-view",
    "cursor-web",
    "react",
    "vue",
    "angular",
    "node",
    "express",
    "webpack",
    "vite",
    "next",
    "nuxt",
    "gatsby",
    "svelte",
    "typescript",
    "javascript",
    "python",
    "django",
    "flask",
    "fastapi",
    "spring",
    "maven",
    "gradle",
    "docker",
    "kubernetes",
    "nginx",
    "apache",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "elasticsearch",
    "rabbitmq",
    "kafka",
];

/// Highest-scoring technology label for `text`
///
/// A technology scores one point per keyword present in the lowercased text. Ties go to the
/// technology listed first in [`TECH_KEYWORDS`]; no hits yields `None`.
pub fn infer_technology(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }
    let text_lower = text.to_lowercase();

    let mut best: Option<(&'static str, usize)> = None;
    for (tech, keywords) in TECH_KEYWORDS {
        let score = keywords.iter().filter(|keyword| text_lower.contains(*keyword)).count();
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((tech, score));
        }
    }
    best.map(|(tech, _)| tech)
}

pub fn is_project_indicator(text: &str) -> bool {
    if text.chars().count() < 2 {
        return false;
    }
    let text_lower = text.to_lowercase();
    PROJECT_INDICATORS.iter().any(|indicator| text_lower.contains(indicator))
}

/// Most frequent indicator after stripping everything but `[a-z0-9_-]`
///
/// Indicators of two characters or fewer after cleaning are ignored. Ties are broken
/// lexicographically.
pub fn name_from_indicators(indicators: &[String]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for indicator in indicators {
        let clean: String = indicator
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if clean.len() > 2 {
            *counts.entry(clean).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(a_name, a_count), (b_name, b_count)| {
            a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
        })
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_react_from_hooks_text() {
        assert_eq!(infer_technology("react hooks useState component"), Some("React Project"));
    }

    #[test]
    fn test_infer_tie_goes_to_first_listed() {
        // one hit each for Web Development ("css") and Python Project ("pip")
        assert_eq!(infer_technology("css pip"), Some("Web Development"));
    }

    #[test]
    fn test_infer_nothing_matches() {
        assert_eq!(infer_technology("zzz qqq"), None);
        assert_eq!(infer_technology(""), None);
    }

    #[test]
    fn test_infer_counts_chinese_keywords() {
        assert_eq!(infer_technology("这个数据库的 sql 查询"), Some("Database Project"));
    }

    #[test]
    fn test_is_project_indicator() {
        assert!(is_project_indicator("Dockerfile.yml"));
        assert!(is_project_indicator("my-react-app project"));
        assert!(!is_project_indicator("notes.txt"));
        assert!(!is_project_indicator("a"));
    }

    #[test]
    fn test_name_from_indicators_most_frequent() {
        let indicators = vec![
            "react.js ".to_string(),
            "vue.js".to_string(),
            "React.js".to_string(),
            "x".to_string(),
        ];
        assert_eq!(name_from_indicators(&indicators), Some("reactjs".to_string()));
    }

    #[test]
    fn test_name_from_indicators_tie_is_lexicographic() {
        let indicators = vec!["vite.ts".to_string(), "nuxt.js".to_string()];
        assert_eq!(name_from_indicators(&indicators), Some("nuxtjs".to_string()));
        assert_eq!(name_from_indicators(&[]), None);
    }
}
