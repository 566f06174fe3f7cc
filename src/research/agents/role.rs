use async_trait::async_trait;

use crate::research::agents::{
    AnalysisTarget, EntityAnalysisAgent, QueryTemplate, validation_ratio,
};
use crate::types::entity::{EntityAnalysisResult, EntityKind};

/// 职位分析智能体：岗位要求 + 技能与市场
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleAnalysisAgent;

#[async_trait]
impl EntityAnalysisAgent for RoleAnalysisAgent {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Role
    }

    fn query_battery(&self, target: &AnalysisTarget<'_>) -> Vec<QueryTemplate> {
        let role = target.name;
        let company = target.affiliation.unwrap_or_default();
        vec![
            QueryTemplate::new(format!("{} job description requirements {}", role, company), 3),
            QueryTemplate::new(format!("{} skills qualifications {}", role, company), 3),
            QueryTemplate::new(format!("{} responsibilities duties {}", role, company), 3),
            QueryTemplate::new(format!("{} interview questions {}", role, company), 3),
            QueryTemplate::new(format!("{} career progression path", role), 2),
            QueryTemplate::new(format!("{} technology stack tools required", role), 2),
        ]
    }

    fn citation_limit(&self) -> usize {
        5
    }

    fn confidence(&self, result: &EntityAnalysisResult) -> f64 {
        validation_ratio(result) * 0.7 + 0.3
    }

    fn summarize(&self, result: &EntityAnalysisResult) -> String {
        format!(
            "Analyzed {} requirements and responsibilities with {} citations",
            result.entity_name,
            result.citations.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_battery_tolerates_missing_company() {
        let keywords = BTreeSet::new();
        let target = AnalysisTarget::new("Data Analyst", None, &keywords);
        let battery = RoleAnalysisAgent.query_battery(&target);
        assert_eq!(battery.len(), 6);
        assert!(battery[0].text.starts_with("Data Analyst job description"));
    }
}
