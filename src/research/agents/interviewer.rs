use async_trait::async_trait;

use crate::research::agents::name_extractor::NameExtractor;
use crate::research::agents::{
    AnalysisTarget, EntityAnalysisAgent, QueryTemplate, validation_ratio,
};
use crate::types::entity::{EntityAnalysisResult, EntityKind};
use crate::types::source::RawSource;

/// 参与生成建议查询的人名上限
const MAX_SUGGESTED_NAMES: usize = 3;

/// 面试官分析智能体：以 LinkedIn 个人主页发现为主
#[derive(Debug, Default, Clone, Copy)]
pub struct InterviewerAnalysisAgent;

#[async_trait]
impl EntityAnalysisAgent for InterviewerAnalysisAgent {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Interviewer
    }

    fn query_battery(&self, target: &AnalysisTarget<'_>) -> Vec<QueryTemplate> {
        let name = target.name;
        let company = target.affiliation.unwrap_or_default();
        vec![
            QueryTemplate::new(format!("\"{}\" linkedin profile", name), 4),
            QueryTemplate::new(format!("{} {} linkedin profile", name, company), 4),
            QueryTemplate::new(format!("{} linkedin {}", name, company), 4),
            QueryTemplate::new(format!("\"{}\" site:linkedin.com", name), 4),
            QueryTemplate::new(format!("{} {} employee linkedin", name, company), 4),
            QueryTemplate::new(format!("{} {} professional background", name, company), 2),
            QueryTemplate::new(format!("{} {} expertise experience", name, company), 2),
        ]
    }

    fn citation_limit(&self) -> usize {
        6
    }

    fn confidence(&self, result: &EntityAnalysisResult) -> f64 {
        let linkedin_boost = (result.linked_profiles_found as f64 * 0.2).min(0.4);
        validation_ratio(result) * 0.4 + linkedin_boost
    }

    fn summarize(&self, result: &EntityAnalysisResult) -> String {
        format!(
            "Conducted LinkedIn-focused analysis with {} citations and {} profiles found",
            result.citations.len(),
            result.linked_profiles_found
        )
    }

    /// 从提及目标公司的 LinkedIn 动态中推断可能的面试官姓名，生成建议查询
    fn post_process(
        &self,
        raw_sources: &[RawSource],
        target: &AnalysisTarget<'_>,
        result: &mut EntityAnalysisResult,
    ) {
        let Some(company) = target.affiliation else {
            return;
        };

        let extractor = NameExtractor::new();
        let company_lower = company.to_lowercase();
        let mut names = Vec::new();

        for source in raw_sources
            .iter()
            .filter(|s| s.is_linkedin() && !is_profile_url(&s.url))
        {
            let mentions_company = source.title.to_lowercase().contains(&company_lower)
                || source.content.to_lowercase().contains(&company_lower);
            if !mentions_company {
                continue;
            }
            result.validation_log.push(format!(
                "🎯 COMPANY-RELEVANT: {} (LinkedIn post mentioning '{}')",
                source.title, company
            ));
            extractor.extract_into(&source.title, &source.content, company, &mut names);
        }

        names.retain(|n| !n.eq_ignore_ascii_case(target.name));
        if names.is_empty() {
            return;
        }

        let shown: Vec<&str> = names
            .iter()
            .take(MAX_SUGGESTED_NAMES)
            .map(String::as_str)
            .collect();
        tracing::info!(
            "   💡 Extracted Names from Company-Relevant Content: {}",
            shown.join(", ")
        );

        result.suggested_queries = shown
            .iter()
            .flat_map(|name| {
                [
                    format!("\"{}\" linkedin profile {}", name, company),
                    format!("\"{}\" site:linkedin.com/in", name),
                ]
            })
            .collect();
    }
}

/// LinkedIn 个人主页链接（而非动态、公司页）
fn is_profile_url(url: &str) -> bool {
    let url = url.to_lowercase();
    url.contains("/in/") || url.contains("/pub/")
}
