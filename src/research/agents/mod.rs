use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::research::context::ResearchContext;
use crate::research::ledger::CitationLedger;
use crate::research::validator::{RelevanceValidator, ValidationTarget};
use crate::search::SearchQuery;
use crate::types::citation::{Citation, ContributingAgent};
use crate::types::entity::{EntityAnalysisResult, EntityKind};
use crate::types::source::{RawSource, ValidatedSource, rank_by_relevance};

pub mod company;
pub mod interviewer;
pub mod name_extractor;
pub mod role;

pub use company::CompanyAnalysisAgent;
pub use interviewer::InterviewerAnalysisAgent;
pub use role::RoleAnalysisAgent;

/// 置信度硬上限
pub const CONFIDENCE_CEILING: f64 = 0.95;

/// 实体分析失败的原因；编排器记录警告后跳过该智能体
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("{0} name is blank")]
    BlankName(EntityKind),
}

/// 查询模板展开后的一条查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    pub text: String,
    pub max_results: usize,
}

impl QueryTemplate {
    pub fn new(text: impl Into<String>, max_results: usize) -> Self {
        Self {
            text: text.into(),
            max_results,
        }
    }
}

/// 分析目标：名称、辅助上下文（所属公司）与上下文关键词
#[derive(Debug, Clone, Copy)]
pub struct AnalysisTarget<'a> {
    pub name: &'a str,
    pub affiliation: Option<&'a str>,
    pub keywords: &'a BTreeSet<String>,
}

impl<'a> AnalysisTarget<'a> {
    pub fn new(
        name: &'a str,
        affiliation: Option<&'a str>,
        keywords: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            name: name.trim(),
            affiliation: affiliation.map(str::trim).filter(|a| !a.is_empty()),
            keywords,
        }
    }

    fn validation_target(&self, kind: EntityKind) -> ValidationTarget<'a> {
        // 公司本身不需要所属上下文
        let affiliation = match kind {
            EntityKind::Company => None,
            _ => self.affiliation,
        };
        ValidationTarget::new(self.name, kind.target_kind(), affiliation)
    }
}

/// 实体分析智能体：三类实体共用同一套分析流程，只在查询组合、引用数量与置信度公式上不同
#[async_trait]
pub trait EntityAnalysisAgent: Send + Sync {
    /// 负责的实体类型
    fn entity_kind(&self) -> EntityKind;

    /// 首轮调研的固定查询组合
    fn query_battery(&self, target: &AnalysisTarget<'_>) -> Vec<QueryTemplate>;

    /// 取前多少个已校验来源生成引用
    fn citation_limit(&self) -> usize;

    /// 依据当前结果计算置信度，调用方负责截断到上限
    fn confidence(&self, result: &EntityAnalysisResult) -> f64;

    fn summarize(&self, result: &EntityAnalysisResult) -> String;

    /// 可选的后处理钩子，可读取全部原始来源
    fn post_process(
        &self,
        _raw_sources: &[RawSource],
        _target: &AnalysisTarget<'_>,
        _result: &mut EntityAnalysisResult,
    ) {
    }

    /// 默认实现的分析流程：查询 -> 去重 -> 校验 -> 排序 -> 写入引用账本 -> 置信度
    async fn analyze(
        &self,
        context: &ResearchContext,
        target: &AnalysisTarget<'_>,
        ledger: &Mutex<CitationLedger>,
    ) -> Result<EntityAnalysisResult, AnalysisError> {
        let kind = self.entity_kind();
        if target.name.is_empty() {
            return Err(AnalysisError::BlankName(kind));
        }

        tracing::info!("🤖 {} analysis agent: analyzing '{}'", kind, target.name);

        // 1. 执行查询组合，按描述去重
        let mut seen = BTreeSet::new();
        let mut raw_sources = Vec::new();
        for template in self.query_battery(target) {
            let query = SearchQuery::new(
                template.text,
                context.default_depth(),
                template.max_results,
            );
            let sources = context.fetcher.fetch(&query).await.into_sources();
            tracing::debug!("   🔍 Query: '{}' → {} sources", query.text, sources.len());
            for source in sources {
                if seen.insert(source.descriptor()) {
                    raw_sources.push(source);
                }
            }
        }

        let mut result = EntityAnalysisResult::empty(kind, target.name);
        result.sources_processed = raw_sources.len();
        result.processed_descriptors = seen;

        // 2. 校验并按相关度排序
        let validation_target = target.validation_target(kind);
        let mut validated = screen_sources(
            &context.validator,
            &raw_sources,
            &validation_target,
            target.keywords,
            &mut result.validation_log,
        );
        rank_by_relevance(&mut validated);

        if kind == EntityKind::Interviewer {
            result.linked_profiles_found = count_linked_profiles(&validated);
        }

        // 3. 写入共享账本，整段持锁保证插入或复用的原子性
        {
            let mut ledger = ledger.lock().await;
            record_citations(
                &mut ledger,
                &validated,
                self.citation_limit(),
                ContributingAgent::from(kind),
                context.snippet_length(),
                &mut result.citations,
            );
        }
        result.validated_sources = validated;

        self.post_process(&raw_sources, target, &mut result);

        result.confidence_score = bounded_confidence(self, &result);
        result.summary = self.summarize(&result);

        tracing::info!(
            "📊 {} analysis: {}/{} sources validated, {} citations, confidence {:.2}",
            kind,
            result.validated_count(),
            result.sources_processed,
            result.citations.len(),
            result.confidence_score
        );

        Ok(result)
    }
}

/// 按实体类型获取对应的分析智能体
pub fn agent_for(kind: EntityKind) -> &'static dyn EntityAnalysisAgent {
    match kind {
        EntityKind::Company => &CompanyAnalysisAgent,
        EntityKind::Role => &RoleAnalysisAgent,
        EntityKind::Interviewer => &InterviewerAnalysisAgent,
    }
}

/// 零来源时置信度为 0，否则按智能体公式计算并截断到 [0, 0.95]
pub fn bounded_confidence<A>(agent: &A, result: &EntityAnalysisResult) -> f64
where
    A: EntityAnalysisAgent + ?Sized,
{
    if result.sources_processed == 0 {
        return 0.0;
    }
    agent.confidence(result).clamp(0.0, CONFIDENCE_CEILING)
}

/// 已校验数 / max(1, 来源总数)
pub fn validation_ratio(result: &EntityAnalysisResult) -> f64 {
    result.validated_count() as f64 / result.sources_processed.max(1) as f64
}

/// 逐条校验原始来源，只保留相关的，并把每条结论记入校验日志
pub fn screen_sources(
    validator: &RelevanceValidator,
    sources: &[RawSource],
    target: &ValidationTarget<'_>,
    keywords: &BTreeSet<String>,
    validation_log: &mut Vec<String>,
) -> Vec<ValidatedSource> {
    let mut validated = Vec::new();
    for source in sources {
        let verdict = validator.validate(source, target, keywords);
        let title = log_title(source);
        let reasons = verdict
            .evidence
            .iter()
            .take(2)
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if verdict.is_relevant {
            tracing::debug!(
                "      ✅ VALIDATED: {} (Score: {}, Evidence: {})",
                title,
                verdict.relevance_score,
                reasons
            );
            validation_log.push(format!(
                "✅ VALIDATED: {} (Score: {}, Evidence: {})",
                title, verdict.relevance_score, reasons
            ));
            validated.push(ValidatedSource {
                source: source.clone(),
                relevance_score: verdict.relevance_score,
                evidence: verdict.evidence,
            });
        } else {
            tracing::debug!(
                "      ❌ REJECTED: {} (Score: {})",
                title,
                verdict.relevance_score
            );
            validation_log.push(format!(
                "❌ REJECTED: {} (Score: {})",
                title, verdict.relevance_score
            ));
        }
    }
    validated
}

/// 取前 `limit` 个来源写入账本，并把对应引用追加到 `citations`（同一条目不重复追加）
pub fn record_citations(
    ledger: &mut CitationLedger,
    sources: &[ValidatedSource],
    limit: usize,
    agent: ContributingAgent,
    snippet_length: usize,
    citations: &mut Vec<Citation>,
) -> usize {
    let mut recorded = 0;
    for validated in sources.iter().take(limit) {
        let id = ledger.insert_or_reuse(
            &validated.source.descriptor(),
            &validated.source.snippet(snippet_length),
            agent,
        );
        if citations.iter().any(|c| c.id == id) {
            continue;
        }
        if let Some(citation) = ledger.get(&id) {
            citations.push(citation.clone());
            recorded += 1;
        }
    }
    recorded
}

/// LinkedIn 域名下的已校验来源数
pub fn count_linked_profiles(sources: &[ValidatedSource]) -> usize {
    sources.iter().filter(|v| v.source.is_linkedin()).count()
}

fn log_title(source: &RawSource) -> String {
    let title = if source.title.trim().is_empty() {
        "Unknown"
    } else {
        source.title.trim()
    };
    if title.chars().count() > 40 {
        format!("{}...", title.chars().take(40).collect::<String>())
    } else {
        title.to_string()
    }
}
