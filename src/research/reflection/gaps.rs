use crate::config::SearchDepth;
use crate::search::SearchQuery;
use crate::types::assessment::{GapCategory, ResearchGap};
use crate::types::entity::EntityKind;

/// 补充查询每条的结果数
const SUPPLEMENTAL_MAX_RESULTS: usize = 4;
/// 面试官缺口最多借用的建议查询数
const MAX_BORROWED_SUGGESTIONS: usize = 2;

/// 为一个缺口生成 2-4 条补充查询，统一使用 advanced 深度
///
/// `company` 为所属公司上下文，`suggestions` 为面试官分析推断出的建议查询。
pub fn supplemental_queries(
    gap: &ResearchGap,
    name: &str,
    company: Option<&str>,
    suggestions: &[String],
) -> Vec<SearchQuery> {
    let company = company.unwrap_or_default();

    let texts: Vec<String> = match gap.category {
        GapCategory::CompanyDeepAnalysis => vec![
            format!("\"{}\" mission statement about us", name),
            format!("\"{}\" company culture values vision", name),
            format!("\"{}\" crunchbase company profile funding", name),
            format!("\"{}\" careers page culture benefits", name),
        ],
        GapCategory::RoleRequirements => vec![
            format!("\"{}\" skills requirements {} job posting", name, company),
            format!("\"{}\" interview questions technical preparation", name),
            format!("{} {} interview process questions", name, company),
        ],
        GapCategory::LinkedinDiscovery => {
            let mut texts = vec![
                format!("\"{}\" {} linkedin profile", name, company),
                format!("site:linkedin.com/in \"{}\" {}", name, company),
            ];
            texts.extend(suggestions.iter().take(MAX_BORROWED_SUGGESTIONS).cloned());
            texts
        }
        GapCategory::CitationVolume => match gap.target {
            EntityKind::Company => vec![
                format!("\"{}\" recent news developments", name),
                format!("\"{}\" glassdoor reviews employee experience", name),
            ],
            EntityKind::Role => vec![
                format!("{} {} job posting", name, company),
                format!("{} {} interview experience", name, company),
            ],
            EntityKind::Interviewer => vec![
                format!("{} {} articles talks", name, company),
                format!("{} {} interview", name, company),
            ],
        },
    };

    texts
        .into_iter()
        .map(|text| SearchQuery::new(text, SearchDepth::Advanced, SUPPLEMENTAL_MAX_RESULTS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(category: GapCategory, target: EntityKind) -> ResearchGap {
        ResearchGap {
            category,
            target,
            points: 0,
        }
    }

    #[test]
    fn test_query_counts_and_depth() {
        for (category, target) in [
            (GapCategory::CompanyDeepAnalysis, EntityKind::Company),
            (GapCategory::RoleRequirements, EntityKind::Role),
            (GapCategory::LinkedinDiscovery, EntityKind::Interviewer),
            (GapCategory::CitationVolume, EntityKind::Role),
        ] {
            let queries = supplemental_queries(&gap(category, target), "X", Some("Acme"), &[]);
            assert!((2..=4).contains(&queries.len()), "{} produced {}", category, queries.len());
            assert!(queries.iter().all(|q| q.depth == SearchDepth::Advanced));
            assert!(queries.iter().all(|q| q.max_results == SUPPLEMENTAL_MAX_RESULTS));
        }
    }

    #[test]
    fn test_linkedin_gap_borrows_suggestions() {
        let suggestions = vec![
            "\"Sarah Johnson\" linkedin profile Acme".to_string(),
            "\"Sarah Johnson\" site:linkedin.com/in".to_string(),
            "\"Mark Lee\" linkedin profile Acme".to_string(),
        ];
        let queries = supplemental_queries(
            &gap(GapCategory::LinkedinDiscovery, EntityKind::Interviewer),
            "Jane Doe",
            Some("Acme"),
            &suggestions,
        );
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[0].text, "\"Jane Doe\" Acme linkedin profile");
        assert_eq!(queries[3].text, suggestions[1]);
    }

    #[test]
    fn test_missing_company_leaves_no_gaps_in_text() {
        let queries = supplemental_queries(
            &gap(GapCategory::RoleRequirements, EntityKind::Role),
            "Data Analyst",
            None,
            &[],
        );
        assert_eq!(queries[2].text, "Data Analyst interview process questions");
    }
}
