use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::types::entity::EntityKind;

/// 充分性评分的满分
pub const MAX_SUFFICIENCY_SCORE: u32 = 11;

/// 充分性评估的四个维度，同时也是补充调研的缺口类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    CompanyDeepAnalysis,
    RoleRequirements,
    LinkedinDiscovery,
    CitationVolume,
}

impl GapCategory {
    pub fn max_points(self) -> u32 {
        match self {
            GapCategory::CompanyDeepAnalysis => 3,
            GapCategory::RoleRequirements => 2,
            GapCategory::LinkedinDiscovery => 4,
            GapCategory::CitationVolume => 2,
        }
    }
}

impl Display for GapCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GapCategory::CompanyDeepAnalysis => write!(f, "company_deep_analysis"),
            GapCategory::RoleRequirements => write!(f, "role_requirements"),
            GapCategory::LinkedinDiscovery => write!(f, "linkedin_discovery"),
            GapCategory::CitationVolume => write!(f, "citation_volume"),
        }
    }
}

/// 单个维度的得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: GapCategory,
    pub points: u32,
    pub factor: String,
}

impl CategoryScore {
    pub fn ratio(&self) -> f64 {
        self.points as f64 / self.category.max_points() as f64
    }
}

/// 需要补充调研的缺口，`target` 为补充查询所针对的实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchGap {
    pub category: GapCategory,
    pub target: EntityKind,
    pub points: u32,
}

/// 一次充分性评估的结论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SufficiencyAssessment {
    pub score: u32,
    pub max_score: u32,
    pub threshold: u32,
    pub categories: Vec<CategoryScore>,
    pub gaps: Vec<ResearchGap>,
    pub sufficient: bool,
}

impl SufficiencyAssessment {
    /// `|` 连接的评估因素描述
    pub fn describe(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.factor.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
