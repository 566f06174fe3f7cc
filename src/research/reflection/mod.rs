use crate::research::agents::{
    agent_for, bounded_confidence, count_linked_profiles, record_citations, screen_sources,
};
use crate::research::aggregator::aggregate;
use crate::research::context::ResearchContext;
use crate::research::validator::ValidationTarget;
use crate::types::assessment::ResearchGap;
use crate::types::citation::ContributingAgent;
use crate::types::entity::{EntityAnalysisResult, EntityInput, EntityKind};
use crate::types::source::rank_by_relevance;
use crate::types::state::{ReflectionState, ResearchState};

pub mod gaps;
pub mod sufficiency;

pub use gaps::supplemental_queries;
pub use sufficiency::assess_sufficiency;

/// 反思循环控制器：评估 -> 补充 -> 再评估，直到充分或达到轮次上限
pub struct ReflectionController<'a> {
    context: &'a ResearchContext,
}

impl<'a> ReflectionController<'a> {
    pub fn new(context: &'a ResearchContext) -> Self {
        Self { context }
    }

    /// 驱动状态机到终态（Sufficient 或 Exhausted）
    ///
    /// 调研不充分不是错误：到达轮次上限或没有可补充的缺口时以 Exhausted 结束，
    /// 并保留已达到的最佳状态。
    pub async fn run(&self, state: &mut ResearchState, input: &EntityInput) {
        let config = &self.context.config.research;
        state.reflection_state = ReflectionState::Assessing;

        loop {
            let assessment = assess_sufficiency(state, input, config);
            tracing::info!(
                "🤔 Research sufficiency: {}/{} (threshold {}) | {}",
                assessment.score,
                assessment.max_score,
                assessment.threshold,
                assessment.describe()
            );

            let next = if assessment.sufficient {
                ReflectionState::Sufficient
            } else if state.reflection_loops_completed >= config.max_reflection_loops {
                tracing::info!(
                    "⏹️ Reflection loop cap reached ({} loops), stopping with best state",
                    state.reflection_loops_completed
                );
                ReflectionState::Exhausted
            } else if assessment.gaps.is_empty() {
                tracing::info!("⏹️ No actionable research gaps, stopping with best state");
                ReflectionState::Exhausted
            } else {
                ReflectionState::Supplementing
            };

            if next.is_terminal() {
                state.reflection_state = next;
                state.final_assessment = Some(assessment);
                break;
            }

            state.reflection_state = ReflectionState::Supplementing;
            tracing::info!(
                "🔄 Reflection loop {}: supplementing {} gaps",
                state.reflection_loops_completed + 1,
                assessment.gaps.len()
            );
            for gap in &assessment.gaps {
                self.supplement(state, input, gap).await;
            }

            state.reflection_loops_completed += 1;
            state.refresh_metrics();
            let aggregated = aggregate(&state.per_entity, &state.validation_metrics);
            state.overall_confidence = aggregated.overall_confidence;
            state.quality_tier = aggregated.quality_tier;
            state.reflection_state = ReflectionState::Assessing;
        }

        state.sufficient_for_next_stage = state.reflection_state == ReflectionState::Sufficient;
    }

    /// 针对单个缺口执行补充查询，经同一校验器与账本后合并进对应实体结果
    async fn supplement(&self, state: &mut ResearchState, input: &EntityInput, gap: &ResearchGap) {
        let kind = gap.target;
        let Some(name) = input.name_of(kind) else {
            return;
        };
        let company = input.company();
        let suggestions = state
            .entity(EntityKind::Interviewer)
            .map(|r| r.suggested_queries.clone())
            .unwrap_or_default();

        // 之前处理过的来源（无论是否通过校验）不再重复处理
        let mut seen = state
            .entity(kind)
            .map(|r| r.processed_descriptors.clone())
            .unwrap_or_default();

        let mut raw_sources = Vec::new();
        for query in supplemental_queries(gap, name, company, &suggestions) {
            let sources = self.context.fetcher.fetch(&query).await.into_sources();
            tracing::debug!("   🔍 Supplemental query: '{}' → {} sources", query.text, sources.len());
            for source in sources {
                if seen.insert(source.descriptor()) {
                    raw_sources.push(source);
                }
            }
        }

        let affiliation = match kind {
            EntityKind::Company => None,
            _ => company,
        };
        let target = ValidationTarget::new(name, kind.target_kind(), affiliation);

        let result = state
            .per_entity
            .entry(kind)
            .or_insert_with(|| EntityAnalysisResult::empty(kind, name));

        let mut validated = screen_sources(
            &self.context.validator,
            &raw_sources,
            &target,
            &input.email_keywords,
            &mut result.validation_log,
        );
        rank_by_relevance(&mut validated);

        let recorded = record_citations(
            &mut state.ledger,
            &validated,
            self.context.config.research.supplemental_citation_limit,
            ContributingAgent::Supplemental,
            self.context.snippet_length(),
            &mut result.citations,
        );

        tracing::info!(
            "   🧩 Gap {} ({}): {} new sources, {} validated, {} citations",
            gap.category,
            kind,
            raw_sources.len(),
            validated.len(),
            recorded
        );

        // 合并而非替换，重新排序保持相关度降序
        result.sources_processed += raw_sources.len();
        result.processed_descriptors = seen;
        result.validated_sources.extend(validated);
        rank_by_relevance(&mut result.validated_sources);
        if kind == EntityKind::Interviewer {
            result.linked_profiles_found = count_linked_profiles(&result.validated_sources);
        }

        let agent = agent_for(kind);
        result.confidence_score = bounded_confidence(agent, result);
        result.summary = agent.summarize(result);
    }
}
