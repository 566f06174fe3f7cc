use async_trait::async_trait;

use crate::research::agents::{
    AnalysisTarget, EntityAnalysisAgent, QueryTemplate, validation_ratio,
};
use crate::types::entity::{EntityAnalysisResult, EntityKind};

const OFFICIAL_DOMAIN_EVIDENCE: &str = "official company domain";

/// 公司分析智能体：身份核实 + 行业与市场分析
#[derive(Debug, Default, Clone, Copy)]
pub struct CompanyAnalysisAgent;

#[async_trait]
impl EntityAnalysisAgent for CompanyAnalysisAgent {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Company
    }

    fn query_battery(&self, target: &AnalysisTarget<'_>) -> Vec<QueryTemplate> {
        let company = target.name;
        vec![
            // 身份与官方渠道
            QueryTemplate::new(format!("\"{}\" official website about", company), 3),
            QueryTemplate::new(format!("\"{}\" company overview mission", company), 3),
            QueryTemplate::new(format!("\"{}\" linkedin company page", company), 3),
            QueryTemplate::new(format!("{} internship program careers", company), 3),
            // 行业与市场
            QueryTemplate::new(format!("\"{}\" industry sector business", company), 3),
            QueryTemplate::new(format!("\"{}\" market trends", company), 3),
            QueryTemplate::new(format!("\"{}\" recent news developments", company), 3),
            QueryTemplate::new(format!("\"{}\" technology stack products", company), 3),
        ]
    }

    fn citation_limit(&self) -> usize {
        6
    }

    fn confidence(&self, result: &EntityAnalysisResult) -> f64 {
        let official_bonus = if result
            .validated_sources
            .iter()
            .any(|v| v.has_evidence(OFFICIAL_DOMAIN_EVIDENCE))
        {
            0.2
        } else {
            0.0
        };
        validation_ratio(result) * 0.6 + 0.2 + official_bonus
    }

    fn summarize(&self, result: &EntityAnalysisResult) -> String {
        format!(
            "Validated company identity and analyzed industry position with {} citations",
            result.citations.len()
        )
    }
}
