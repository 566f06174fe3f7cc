use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Mutex;

use crate::research::agents::{AnalysisError, AnalysisTarget, agent_for};
use crate::research::aggregator::aggregate;
use crate::research::context::ResearchContext;
use crate::research::ledger::CitationLedger;
use crate::research::reflection::ReflectionController;
use crate::types::entity::{EntityAnalysisResult, EntityInput, EntityKind};
use crate::types::state::ResearchState;

/// 多智能体调研编排器
#[derive(Default)]
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 执行一次完整调研：实体分析 -> 置信度汇总 -> 反思循环
    ///
    /// 任何单个实体的失败都不会中止调研，最坏结果是低置信度的 Exhausted 状态。
    pub async fn execute(&self, context: &ResearchContext, input: &EntityInput) -> ResearchState {
        let started = Instant::now();
        let mut state = ResearchState::new();

        tracing::info!("🔬 开始执行深度调研流程 [{}]", state.episode_id);
        tracing::info!(
            "🔍 Research Targets: 🏢 {} | 💼 {} | 👤 {}",
            input.name_of(EntityKind::Company).unwrap_or("-"),
            input.name_of(EntityKind::Role).unwrap_or("-"),
            input.name_of(EntityKind::Interviewer).unwrap_or("-"),
        );

        let planned: Vec<(EntityKind, &str)> = EntityKind::ALL
            .into_iter()
            .filter_map(|kind| input.name_of(kind).map(|name| (kind, name)))
            .collect();
        if planned.is_empty() {
            tracing::warn!("⚠️ 没有可用的实体名称，跳过全部实体分析");
        }

        // 智能体阶段账本由互斥锁保护，结束后放回状态
        let ledger = Mutex::new(std::mem::take(&mut state.ledger));

        let outcomes = if context.config.research.concurrent_agents {
            join_all(
                planned
                    .iter()
                    .map(|&(kind, name)| run_agent(context, input, kind, name, &ledger)),
            )
            .await
        } else {
            let mut outcomes = Vec::with_capacity(planned.len());
            for &(kind, name) in &planned {
                outcomes.push(run_agent(context, input, kind, name, &ledger).await);
            }
            outcomes
        };

        for (kind, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    state.per_entity.insert(kind, result);
                }
                Err(e) => tracing::warn!("⚠️ {} 分析已跳过: {}", kind, e),
            }
        }

        state.ledger = ledger.into_inner();
        state.refresh_metrics();

        let initial = aggregate(&state.per_entity, &state.validation_metrics);
        state.overall_confidence = initial.overall_confidence;
        state.quality_tier = initial.quality_tier;
        tracing::info!(
            "📈 Initial confidence {:.2} ({})",
            state.overall_confidence,
            state.quality_tier
        );

        ReflectionController::new(context)
            .run(&mut state, input)
            .await;

        state.processing_time_secs = started.elapsed().as_secs_f64();
        tracing::info!("✓ 深度调研流程执行完毕\n{}", state.summary());

        report_cache(context).await;

        state
    }
}

async fn run_agent(
    context: &ResearchContext,
    input: &EntityInput,
    kind: EntityKind,
    name: &str,
    ledger: &Mutex<CitationLedger>,
) -> (EntityKind, Result<EntityAnalysisResult, AnalysisError>) {
    let target = AnalysisTarget::new(name, input.company(), &input.email_keywords);
    let outcome = agent_for(kind).analyze(context, &target, ledger).await;
    (kind, outcome)
}

/// 输出缓存命中情况并清理过期条目
async fn report_cache(context: &ResearchContext) {
    let Some(cache) = context.fetcher.cache() else {
        return;
    };
    if !cache.is_enabled() {
        return;
    }

    let report = cache.generate_performance_report();
    tracing::info!(
        "💾 搜索缓存: 命中率 {:.1}% ({} 命中 / {} 未命中)，节省约 ${:.3}",
        report.hit_rate * 100.0,
        report.cache_hits,
        report.cache_misses,
        report.cost_saved
    );

    if let Err(e) = cache.clear_expired().await {
        tracing::warn!("⚠️ 清理过期缓存失败: {}", e);
    }
}
