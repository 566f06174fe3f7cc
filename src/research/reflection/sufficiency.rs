use crate::config::ResearchConfig;
use crate::types::assessment::{
    CategoryScore, GapCategory, MAX_SUFFICIENCY_SCORE, ResearchGap, SufficiencyAssessment,
};
use crate::types::entity::{EntityInput, EntityKind};
use crate::types::state::ResearchState;

/// 公司、职位分析视为高质量的置信度下限
const STRONG_CONFIDENCE: f64 = 0.6;

/// 对当前调研状态做充分性评估
///
/// 四个维度的得分相加后与阈值比较；不充分时，只有对应实体名称可用的缺口才会进入
/// `gaps`，按得分率升序，最多 `max_gaps_per_loop` 个。
pub fn assess_sufficiency(
    state: &ResearchState,
    input: &EntityInput,
    config: &ResearchConfig,
) -> SufficiencyAssessment {
    let categories = vec![
        company_score(state),
        role_score(state),
        interviewer_score(state),
        citation_score(state),
    ];

    let score: u32 = categories.iter().map(|c| c.points).sum();
    let sufficient = score >= config.sufficiency_threshold;

    let gaps = if sufficient {
        Vec::new()
    } else {
        actionable_gaps(&categories, input, config.max_gaps_per_loop)
    };

    SufficiencyAssessment {
        score,
        max_score: MAX_SUFFICIENCY_SCORE,
        threshold: config.sufficiency_threshold,
        categories,
        gaps,
        sufficient,
    }
}

fn company_score(state: &ResearchState) -> CategoryScore {
    let (points, factor) = match state.entity(EntityKind::Company) {
        Some(r) if r.confidence_score >= STRONG_CONFIDENCE => {
            (3, "Company analysis: HIGH quality".to_string())
        }
        Some(_) => (2, "Company analysis: MODERATE quality".to_string()),
        None => (0, "Company analysis: INSUFFICIENT".to_string()),
    };
    CategoryScore {
        category: GapCategory::CompanyDeepAnalysis,
        points,
        factor,
    }
}

fn role_score(state: &ResearchState) -> CategoryScore {
    let (points, factor) = match state.entity(EntityKind::Role) {
        Some(r) if r.confidence_score >= STRONG_CONFIDENCE => {
            (2, "Role analysis: GOOD quality".to_string())
        }
        Some(_) => (1, "Role analysis: BASIC quality".to_string()),
        None => (0, "Role analysis: INSUFFICIENT".to_string()),
    };
    CategoryScore {
        category: GapCategory::RoleRequirements,
        points,
        factor,
    }
}

fn interviewer_score(state: &ResearchState) -> CategoryScore {
    let (points, factor) = match state.entity(EntityKind::Interviewer) {
        Some(r) if r.linked_profiles_found > 0 => (
            4,
            format!(
                "Interviewer analysis: EXCELLENT ({} LinkedIn profiles)",
                r.linked_profiles_found
            ),
        ),
        Some(_) => (2, "Interviewer analysis: MODERATE quality".to_string()),
        None => (0, "Interviewer analysis: INSUFFICIENT".to_string()),
    };
    CategoryScore {
        category: GapCategory::LinkedinDiscovery,
        points,
        factor,
    }
}

fn citation_score(state: &ResearchState) -> CategoryScore {
    let count = state.ledger.len();
    let (points, factor) = if count >= 5 {
        (2, format!("Citations: EXCELLENT ({} citations)", count))
    } else if count >= 2 {
        (1, format!("Citations: ADEQUATE ({} citations)", count))
    } else {
        (0, "Citations: INSUFFICIENT".to_string())
    };
    CategoryScore {
        category: GapCategory::CitationVolume,
        points,
        factor,
    }
}

/// 缺口对应的补充调研目标；引用数量缺口落在第一个可用的实体上
fn gap_target(category: GapCategory, input: &EntityInput) -> Option<EntityKind> {
    let kind = match category {
        GapCategory::CompanyDeepAnalysis => EntityKind::Company,
        GapCategory::RoleRequirements => EntityKind::Role,
        GapCategory::LinkedinDiscovery => EntityKind::Interviewer,
        GapCategory::CitationVolume => {
            return EntityKind::ALL
                .into_iter()
                .find(|k| input.name_of(*k).is_some());
        }
    };
    input.name_of(kind).map(|_| kind)
}

fn actionable_gaps(
    categories: &[CategoryScore],
    input: &EntityInput,
    max_gaps: usize,
) -> Vec<ResearchGap> {
    let mut shortfalls: Vec<&CategoryScore> = categories
        .iter()
        .filter(|c| c.points < c.category.max_points())
        .collect();
    // 稳定排序，得分率相同时保持维度顺序
    shortfalls.sort_by(|a, b| a.ratio().total_cmp(&b.ratio()));

    shortfalls
        .into_iter()
        .filter_map(|c| {
            gap_target(c.category, input).map(|target| ResearchGap {
                category: c.category,
                target,
                points: c.points,
            })
        })
        .take(max_gaps)
        .collect()
}
