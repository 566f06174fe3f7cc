use std::collections::BTreeSet;

use crate::utils::text::contains_word;

/// 技术方向词汇
const TECH_KEYWORDS: [&str; 10] = [
    "ai",
    "artificial intelligence",
    "generative ai",
    "agentic",
    "machine learning",
    "data",
    "tech",
    "software",
    "engineering",
    "development",
];

/// 项目与机会类词汇
const PROGRAM_KEYWORDS: [&str; 5] = ["internship", "program", "summer", "interview", "opportunity"];

/// 职级类词汇
const ROLE_KEYWORDS: [&str; 8] = [
    "manager",
    "director",
    "lead",
    "senior",
    "coordinator",
    "analyst",
    "engineer",
    "developer",
];

/// 从邮件正文中派生校验用的上下文关键词
///
/// 结果为小写：命中的固定词汇，加上每个非空的实体名称。
pub fn derive_context_keywords(email_content: &str, names: &[&str]) -> BTreeSet<String> {
    let text = email_content.to_lowercase();

    let mut keywords: BTreeSet<String> = TECH_KEYWORDS
        .iter()
        .chain(PROGRAM_KEYWORDS.iter())
        .chain(ROLE_KEYWORDS.iter())
        .filter(|k| matches_phrase(&text, k))
        .map(|k| k.to_string())
        .collect();

    keywords.extend(
        names
            .iter()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty()),
    );

    keywords
}

/// 多词短语按子串匹配，单词按词边界匹配，避免 "ai" 命中 "maintain"
fn matches_phrase(text: &str, phrase: &str) -> bool {
    if phrase.contains(' ') {
        text.contains(phrase)
    } else {
        contains_word(text, phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_vocabulary_and_names() {
        let email = "Hi! We'd like to invite you to interview for our Summer AI Internship. \
                     You will meet Jane Doe, Engineering Manager.";
        let keywords = derive_context_keywords(email, &["Acme", "Data Analyst", "  "]);

        for expected in ["ai", "summer", "internship", "interview", "engineering", "manager"] {
            assert!(keywords.contains(expected), "missing {}", expected);
        }
        assert!(keywords.contains("acme"));
        assert!(keywords.contains("data analyst"));
        assert!(!keywords.contains(""));
    }

    #[test]
    fn test_single_words_respect_boundaries() {
        let keywords = derive_context_keywords("Please maintain the schedule", &[]);
        assert!(!keywords.contains("ai"));
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_phrases_match_as_substrings() {
        let keywords = derive_context_keywords("Work on Generative AI and machine learning", &[]);
        assert!(keywords.contains("generative ai"));
        assert!(keywords.contains("machine learning"));
        assert!(keywords.contains("ai"));
    }
}
