use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use interview_research::config::{Config, SearchDepth};
use interview_research::search::{SearchError, SearchProvider};
use interview_research::types::citation::ContributingAgent;
use interview_research::types::source::RawSource;
use interview_research::{EntityInput, EntityKind, ReflectionState, ResearchContext, execute};
use tempfile::TempDir;

/// 按查询中包含的片段返回预设结果，未命中任何规则时返回 `fallback`
struct ScriptedProvider {
    rules: Vec<(&'static str, Vec<RawSource>)>,
    fallback: Vec<RawSource>,
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(fallback: Vec<RawSource>) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    fn rule(mut self, fragment: &'static str, sources: Vec<RawSource>) -> Self {
        self.rules.push((fragment, sources));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search(
        &self,
        query: &str,
        _depth: SearchDepth,
        _max_results: usize,
    ) -> Result<Vec<RawSource>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let sources = self
            .rules
            .iter()
            .find(|(fragment, _)| query.contains(fragment))
            .map(|(_, sources)| sources.clone())
            .unwrap_or_else(|| self.fallback.clone());
        Ok(sources)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.cache.enabled = false;
    config
}

fn acme_about() -> RawSource {
    RawSource::new(
        "About Acme",
        "https://acme.com/about",
        "Acme builds developer tools. Data Analyst job requirements and interview process.",
    )
}

fn jane_linkedin() -> RawSource {
    RawSource::new("Jane Doe - Acme", "https://linkedin.com/in/janedoe", "")
}

#[tokio::test]
async fn test_only_company_agent_runs_when_other_names_missing() {
    let provider = Arc::new(ScriptedProvider::new(vec![acme_about()]));
    let context = ResearchContext::with_provider(test_config(), provider);
    let input = EntityInput::new(Some("Acme"), None, None);

    let state = execute(&context, &input).await;

    assert_eq!(state.per_entity.len(), 1);
    assert!(state.entity(EntityKind::Company).is_some());
    assert!(state.overall_confidence >= 0.0 && state.overall_confidence <= 0.95);
    assert!(state.reflection_state.is_terminal());
}

#[tokio::test]
async fn test_high_signal_interviewer_scenario() {
    let input = EntityInput::new(Some("Acme"), None, Some("Jane Doe"));

    let with_profile = Arc::new(
        ScriptedProvider::new(Vec::new()).rule("Jane Doe", vec![jane_linkedin()]),
    );
    let state = execute(
        &ResearchContext::with_provider(test_config(), with_profile),
        &input,
    )
    .await;

    let interviewer = state.entity(EntityKind::Interviewer).unwrap();
    assert_eq!(interviewer.linked_profiles_found, 1);
    assert_eq!(interviewer.validated_count(), 1);
    assert!(interviewer.validated_sources[0].relevance_score >= 5.0);
    assert!(
        interviewer.validated_sources[0]
            .evidence
            .iter()
            .any(|e| e.as_str() == "LinkedIn profile domain")
    );
    assert_eq!(state.validation_metrics.linked_profiles_found, 1);

    let without_profile = Arc::new(ScriptedProvider::new(Vec::new()).rule(
        "Jane Doe",
        vec![RawSource::new(
            "Jane Doe - Acme",
            "https://acme.com/team/jane",
            "",
        )],
    ));
    let baseline = execute(
        &ResearchContext::with_provider(test_config(), without_profile),
        &input,
    )
    .await;

    let baseline_interviewer = baseline.entity(EntityKind::Interviewer).unwrap();
    assert_eq!(baseline_interviewer.linked_profiles_found, 0);
    assert!(interviewer.confidence_score > baseline_interviewer.confidence_score);
}

#[tokio::test]
async fn test_duplicate_source_across_agents_is_cited_once() {
    let provider = Arc::new(ScriptedProvider::new(vec![acme_about()]));
    let context = ResearchContext::with_provider(test_config(), provider);
    let input = EntityInput::new(Some("Acme"), Some("Data Analyst"), None);

    let state = execute(&context, &input).await;

    let matching: Vec<_> = state
        .citations()
        .iter()
        .filter(|c| c.url() == "https://acme.com/about")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].contributing_agent, ContributingAgent::Company);

    let role = state.entity(EntityKind::Role).unwrap();
    assert!(role.has_citation(&matching[0].id));
}

#[tokio::test]
async fn test_concurrent_agents_keep_ledger_deduplicated() {
    let provider = Arc::new(ScriptedProvider::new(vec![acme_about()]));
    let mut config = test_config();
    config.research.concurrent_agents = true;
    let context = ResearchContext::with_provider(config, provider);
    let input = EntityInput::new(Some("Acme"), Some("Data Analyst"), Some("Jane Doe"));

    let state = execute(&context, &input).await;

    assert_eq!(state.per_entity.len(), 3);
    let urls: Vec<&str> = state.citations().iter().map(|c| c.url()).collect();
    assert_eq!(
        urls.iter().filter(|u| **u == "https://acme.com/about").count(),
        1
    );
}

#[tokio::test]
async fn test_citation_ids_strictly_increase() {
    let company_sources: Vec<RawSource> = (0..4)
        .map(|i| {
            RawSource::new(
                format!("Acme news {}", i),
                format!("https://news.example.com/acme/{}", i),
                "Acme announced a new product",
            )
        })
        .collect();
    let provider = Arc::new(
        ScriptedProvider::new(Vec::new())
            .rule("Jane Doe", vec![jane_linkedin()])
            .rule("Acme", company_sources),
    );
    let context = ResearchContext::with_provider(test_config(), provider);
    let input = EntityInput::new(Some("Acme"), None, Some("Jane Doe"));

    let state = execute(&context, &input).await;

    let ids: Vec<u64> = state
        .citations()
        .iter()
        .map(|c| c.id.parse().unwrap())
        .collect();
    assert!(!ids.is_empty());
    assert_eq!(ids[0], 1);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(state.validation_metrics.citation_count, ids.len());
}

#[tokio::test]
async fn test_unreachable_threshold_exhausts_within_loop_cap() {
    let provider = Arc::new(ScriptedProvider::new(vec![acme_about()]));
    let mut config = test_config();
    config.research.sufficiency_threshold = 11;
    config.research.max_reflection_loops = 3;
    let context = ResearchContext::with_provider(config, provider);
    let input = EntityInput::new(Some("Acme"), Some("Data Analyst"), None);

    let state = execute(&context, &input).await;

    assert_eq!(state.reflection_state, ReflectionState::Exhausted);
    assert!(!state.sufficient_for_next_stage);
    assert!(state.reflection_loops_completed <= 3);
    assert!(state.overall_confidence <= 0.95);
    assert!(state.final_assessment.is_some());
}

#[tokio::test]
async fn test_supplementing_skips_previously_rejected_sources() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        acme_about(),
        RawSource::new(
            "Weather today",
            "https://weather.example.com/today",
            "Sunny skies across the region",
        ),
        RawSource::new(
            "Gardening tips",
            "https://garden.example.org/tips",
            "How to grow tomatoes",
        ),
    ]));
    let mut config = test_config();
    config.research.sufficiency_threshold = 11;
    config.research.max_reflection_loops = 2;
    let context = ResearchContext::with_provider(config, provider.clone());
    let input = EntityInput::new(Some("Acme"), None, None);

    let state = execute(&context, &input).await;

    assert_eq!(state.reflection_loops_completed, 2);
    assert!(provider.calls() > 8);
    let company = state.entity(EntityKind::Company).unwrap();
    assert_eq!(company.sources_processed, 3);
    assert_eq!(company.processed_descriptors.len(), 3);
    assert_eq!(company.validated_count(), 1);
    // 0.6 * 1/3 + 0.2 + 官方域名 0.2
    assert!((company.confidence_score - 0.6).abs() < 1e-9);
    assert_eq!(state.validation_metrics.sources_discovered, 3);
}

#[tokio::test]
async fn test_provider_failure_is_treated_as_absence() {
    let provider = Arc::new(ScriptedProvider::failing());
    let context = ResearchContext::with_provider(test_config(), provider.clone());
    let input = EntityInput::new(Some("Acme"), Some("Data Analyst"), Some("Jane Doe"));

    let state = execute(&context, &input).await;

    assert!(provider.calls() > 0);
    assert_eq!(state.per_entity.len(), 3);
    assert!(state.per_entity.values().all(|r| r.confidence_score == 0.0));
    assert!(state.citations().is_empty());
    assert_eq!(state.overall_confidence, 0.0);
    assert!(state.reflection_state.is_terminal());
}

#[tokio::test]
async fn test_cached_results_skip_provider_on_second_episode() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.cache.cache_dir = temp_dir.path().join("search");

    let provider = Arc::new(ScriptedProvider::new(vec![acme_about()]));
    let context = ResearchContext::with_provider(config, provider.clone());
    let input = EntityInput::new(Some("Acme"), None, None);

    let first = execute(&context, &input).await;
    let calls_after_first = provider.calls();
    assert!(calls_after_first > 0);

    let second = execute(&context, &input).await;
    assert_eq!(provider.calls(), calls_after_first);
    assert_eq!(first.citations().len(), second.citations().len());
    assert_ne!(first.episode_id, second.episode_id);
}
