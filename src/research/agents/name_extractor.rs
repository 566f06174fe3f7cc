use regex::Regex;

/// 公司提及前后用于寻找人名的窗口大小（字节）
const CONTEXT_WINDOW: usize = 50;

/// 常见职位与团队称谓，形如人名但不是人名
const NON_PERSON_TERMS: [&str; 22] = [
    "software engineer",
    "senior software",
    "engineering team",
    "development team",
    "tech lead",
    "team lead",
    "project manager",
    "product manager",
    "data scientist",
    "software developer",
    "full stack",
    "front end",
    "back end",
    "machine learning",
    "artificial intelligence",
    "user experience",
    "user interface",
    "quality assurance",
    "business analyst",
    "system administrator",
    "network engineer",
    "security engineer",
];

const NAME_PATTERNS: [&str; 5] = [
    r"([A-Z][a-z]+ [A-Z][a-z]+)'s Post",
    r"([A-Z][a-z]+ [A-Z][a-z]+) - ",
    r"([A-Z][a-z]+ [A-Z][a-z]+) \| ",
    r"\b[Bb]y ([A-Z][a-z]+ [A-Z][a-z]+)",
    r"\bfrom ([A-Z][a-z]+ [A-Z][a-z]+)",
];

/// 从提及目标公司的 LinkedIn 动态中提取候选人名
pub struct NameExtractor {
    patterns: Vec<Regex>,
    capitalized_name: Option<Regex>,
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl NameExtractor {
    pub fn new() -> Self {
        Self {
            patterns: NAME_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
            capitalized_name: Regex::new(r"\b([A-Z][a-z]+ [A-Z][a-z]+)\b").ok(),
        }
    }

    /// 提取候选人名，按首次出现顺序去重后追加到 `names`
    pub fn extract_into(&self, title: &str, content: &str, company: &str, names: &mut Vec<String>) {
        let text = format!("{} {}", title, content);
        let company_words: Vec<String> = company
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut candidates = Vec::new();
        for pattern in &self.patterns {
            candidates.extend(
                pattern
                    .captures_iter(&text)
                    .filter_map(|c| c.get(1).map(|m| m.as_str().to_string())),
            );
        }

        // 公司提及附近出现的大写人名
        if let Some(capitalized) = &self.capitalized_name
            && !company.trim().is_empty()
            && let Ok(mention) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(company.trim())))
        {
            for m in mention.find_iter(&text) {
                let start = floor_boundary(&text, m.start().saturating_sub(CONTEXT_WINDOW));
                let end = ceil_boundary(&text, (m.end() + CONTEXT_WINDOW).min(text.len()));
                candidates.extend(
                    capitalized
                        .captures_iter(&text[start..end])
                        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string())),
                );
            }
        }

        for candidate in candidates {
            if is_plausible_name(&candidate, &company_words) && !names.contains(&candidate) {
                names.push(candidate);
            }
        }
    }
}

fn is_plausible_name(candidate: &str, company_words: &[String]) -> bool {
    let words: Vec<&str> = candidate.split_whitespace().collect();
    if words.len() != 2 || words.iter().any(|w| w.len() < 2) {
        return false;
    }
    if words
        .iter()
        .any(|w| company_words.contains(&w.to_lowercase()))
    {
        return false;
    }
    !NON_PERSON_TERMS.contains(&candidate.to_lowercase().as_str())
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(title: &str, content: &str, company: &str) -> Vec<String> {
        let mut names = Vec::new();
        NameExtractor::new().extract_into(title, content, company, &mut names);
        names
    }

    #[test]
    fn test_extracts_post_author() {
        let names = extract("Sarah Johnson's Post", "so excited to grow the Acme team!", "Acme");
        assert_eq!(names, vec!["Sarah Johnson".to_string()]);
    }

    #[test]
    fn test_extracts_name_near_company_mention() {
        let names = extract(
            "Hiring update",
            "Great chat today with Michael Chen about the Acme summer cohort",
            "Acme",
        );
        assert!(names.contains(&"Michael Chen".to_string()));
    }

    #[test]
    fn test_skips_job_titles_and_company_words() {
        let names = extract(
            "Product Manager - Acme Labs",
            "Posted by Acme Robotics. We are hiring a Software Engineer.",
            "Acme Robotics",
        );
        assert!(names.is_empty(), "unexpected names: {:?}", names);
    }

    #[test]
    fn test_deduplicates_across_patterns() {
        let names = extract(
            "Led by Sarah Johnson",
            "Sarah Johnson | Acme engineering lead",
            "Acme",
        );
        assert_eq!(names, vec!["Sarah Johnson".to_string()]);
    }
}
