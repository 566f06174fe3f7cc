use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::research::ledger::CitationLedger;
use crate::types::assessment::SufficiencyAssessment;
use crate::types::citation::Citation;
use crate::types::entity::{EntityAnalysisResult, EntityKind};

/// 调研质量等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityTier {
    #[default]
    Low,
    Medium,
    High,
    Excellent,
}

impl QualityTier {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.85 {
            QualityTier::Excellent
        } else if confidence >= 0.70 {
            QualityTier::High
        } else if confidence >= 0.50 {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }
}

impl Display for QualityTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityTier::Low => write!(f, "LOW"),
            QualityTier::Medium => write!(f, "MEDIUM"),
            QualityTier::High => write!(f, "HIGH"),
            QualityTier::Excellent => write!(f, "EXCELLENT"),
        }
    }
}

/// 反思循环状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionState {
    #[default]
    Initial,
    Assessing,
    Supplementing,
    Sufficient,
    Exhausted,
}

impl ReflectionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReflectionState::Sufficient | ReflectionState::Exhausted)
    }
}

/// 校验指标累计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub sources_discovered: usize,
    pub sources_validated: usize,
    /// 账本中去重后的引用数
    pub citation_count: usize,
    pub linked_profiles_found: usize,
    /// 按实体顺序排列的各智能体置信度
    pub confidence_scores: Vec<f64>,
}

/// 一次调研的根聚合
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchState {
    pub episode_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub per_entity: BTreeMap<EntityKind, EntityAnalysisResult>,
    pub ledger: CitationLedger,
    pub validation_metrics: ValidationMetrics,
    pub reflection_loops_completed: u32,
    pub reflection_state: ReflectionState,
    pub final_assessment: Option<SufficiencyAssessment>,
    /// 取值范围 [0, 0.95]
    pub overall_confidence: f64,
    pub quality_tier: QualityTier,
    pub sufficient_for_next_stage: bool,
    pub processing_time_secs: f64,
}

impl Default for ResearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchState {
    pub fn new() -> Self {
        Self {
            episode_id: Uuid::new_v4(),
            started_at: Utc::now(),
            per_entity: BTreeMap::new(),
            ledger: CitationLedger::new(),
            validation_metrics: ValidationMetrics::default(),
            reflection_loops_completed: 0,
            reflection_state: ReflectionState::Initial,
            final_assessment: None,
            overall_confidence: 0.0,
            quality_tier: QualityTier::Low,
            sufficient_for_next_stage: false,
            processing_time_secs: 0.0,
        }
    }

    pub fn entity(&self, kind: EntityKind) -> Option<&EntityAnalysisResult> {
        self.per_entity.get(&kind)
    }

    /// 账本内容，按编号排序
    pub fn citations(&self) -> &[Citation] {
        self.ledger.citations()
    }

    /// 依据当前各实体结果与账本重算指标中的派生字段
    pub fn refresh_metrics(&mut self) {
        self.validation_metrics.sources_discovered = self
            .per_entity
            .values()
            .map(|r| r.sources_processed)
            .sum();
        self.validation_metrics.sources_validated = self
            .per_entity
            .values()
            .map(|r| r.validated_count())
            .sum();
        self.validation_metrics.citation_count = self.ledger.len();
        self.validation_metrics.linked_profiles_found = self
            .per_entity
            .values()
            .map(|r| r.linked_profiles_found)
            .sum();
        self.validation_metrics.confidence_scores = self
            .per_entity
            .values()
            .map(|r| r.confidence_score)
            .collect();
    }

    pub fn summary(&self) -> ResearchSummary {
        ResearchSummary {
            sources_discovered: self.validation_metrics.sources_discovered,
            sources_validated: self.validation_metrics.sources_validated,
            citation_count: self.ledger.len(),
            linked_profiles_found: self.validation_metrics.linked_profiles_found,
            reflection_loops: self.reflection_loops_completed,
            overall_confidence: self.overall_confidence,
            quality_tier: self.quality_tier,
            sufficient: self.sufficient_for_next_stage,
            processing_time_secs: self.processing_time_secs,
        }
    }
}

/// 调研结束时输出的摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub sources_discovered: usize,
    pub sources_validated: usize,
    pub citation_count: usize,
    pub linked_profiles_found: usize,
    pub reflection_loops: u32,
    pub overall_confidence: f64,
    pub quality_tier: QualityTier,
    pub sufficient: bool,
    pub processing_time_secs: f64,
}

impl Display for ResearchSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "🔍 Total Sources Discovered: {}", self.sources_discovered)?;
        writeln!(f, "✅ Sources Validated: {}", self.sources_validated)?;
        writeln!(f, "📝 Citations Generated: {}", self.citation_count)?;
        writeln!(f, "🔗 LinkedIn Profiles Found: {}", self.linked_profiles_found)?;
        writeln!(f, "🔄 Reflection Loops: {}", self.reflection_loops)?;
        writeln!(f, "📈 Overall Confidence: {:.2}", self.overall_confidence)?;
        writeln!(f, "🏆 Research Quality: {}", self.quality_tier)?;
        writeln!(
            f,
            "📚 Sufficient for Prep Guide: {}",
            if self.sufficient { "YES" } else { "NO" }
        )?;
        write!(f, "⏱️ Processing Time: {:.2}s", self.processing_time_secs)
    }
}
