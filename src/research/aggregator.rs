use std::collections::BTreeMap;

use crate::research::agents::CONFIDENCE_CEILING;
use crate::types::entity::{EntityAnalysisResult, EntityKind};
use crate::types::state::{QualityTier, ValidationMetrics};

/// 每个 LinkedIn 主页的加成及上限
const LINKEDIN_BONUS_PER_PROFILE: f64 = 0.05;
const LINKEDIN_BONUS_CAP: f64 = 0.1;
/// 每条引用的加成及上限
const CITATION_BONUS_PER_CITATION: f64 = 0.02;
const CITATION_BONUS_CAP: f64 = 0.1;

/// 置信度汇总结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateConfidence {
    pub overall_confidence: f64,
    pub quality_tier: QualityTier,
}

/// 汇总各实体置信度与结构性加成，得到总体置信度与质量等级
pub fn aggregate(
    per_entity: &BTreeMap<EntityKind, EntityAnalysisResult>,
    metrics: &ValidationMetrics,
) -> AggregateConfidence {
    if per_entity.is_empty() {
        return AggregateConfidence {
            overall_confidence: 0.0,
            quality_tier: QualityTier::Low,
        };
    }

    let base = per_entity
        .values()
        .map(|r| r.confidence_score)
        .sum::<f64>()
        / per_entity.len() as f64;
    let linkedin_bonus =
        (metrics.linked_profiles_found as f64 * LINKEDIN_BONUS_PER_PROFILE).min(LINKEDIN_BONUS_CAP);
    let citation_bonus =
        (metrics.citation_count as f64 * CITATION_BONUS_PER_CITATION).min(CITATION_BONUS_CAP);

    let overall_confidence = (base + linkedin_bonus + citation_bonus).clamp(0.0, CONFIDENCE_CEILING);

    AggregateConfidence {
        overall_confidence,
        quality_tier: QualityTier::from_confidence(overall_confidence),
    }
}
