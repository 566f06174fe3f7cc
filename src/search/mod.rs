use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::SearchCache;
use crate::config::SearchDepth;
use crate::types::source::RawSource;

pub mod tavily;

pub use tavily::TavilyProvider;

/// 搜索提供方调用失败的原因
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },
    #[error("search provider not configured: {0}")]
    NotConfigured(String),
}

/// 外部搜索提供方；相同参数重复调用必须安全
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<RawSource>, SearchError>;

    fn name(&self) -> &str;
}

/// 一条待执行的查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub depth: SearchDepth,
    pub max_results: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, depth: SearchDepth, max_results: usize) -> Self {
        // 模板中缺失的可选部分会留下多余空白
        let text = text
            .into()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            depth,
            max_results,
        }
    }
}

/// 一次抓取的结果；`Unavailable` 一律按零结果处理
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<RawSource>),
    Unavailable { reason: String },
}

impl FetchOutcome {
    pub fn into_sources(self) -> Vec<RawSource> {
        match self {
            FetchOutcome::Success(sources) => sources,
            FetchOutcome::Unavailable { .. } => Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

/// 来源抓取器：提供方 + 可选缓存 + 超时，由调用方显式构造并传入
#[derive(Clone)]
pub struct SourceFetcher {
    provider: Arc<dyn SearchProvider>,
    cache: Option<Arc<SearchCache>>,
    timeout: Duration,
}

impl SourceFetcher {
    pub fn new(provider: Arc<dyn SearchProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            cache: None,
            timeout,
        }
    }

    pub fn with_cache(mut self, cache: Arc<SearchCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<SearchCache>> {
        self.cache.as_ref()
    }

    /// 执行查询，失败与超时都不向上传播
    pub async fn fetch(&self, query: &SearchQuery) -> FetchOutcome {
        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get(&query.text, query.depth, query.max_results).await
        {
            return FetchOutcome::Success(cached);
        }

        let call = self
            .provider
            .search(&query.text, query.depth, query.max_results);
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(sources)) => FetchOutcome::Success(sources),
            Ok(Err(e)) => FetchOutcome::Unavailable {
                reason: e.to_string(),
            },
            Err(_) => FetchOutcome::Unavailable {
                reason: format!("timed out after {:?}", self.timeout),
            },
        };

        match &outcome {
            FetchOutcome::Success(sources) => {
                if let Some(cache) = &self.cache
                    && let Err(e) = cache
                        .set(&query.text, query.depth, query.max_results, sources)
                        .await
                {
                    tracing::warn!("⚠️ 搜索结果缓存写入失败: {}", e);
                }
            }
            FetchOutcome::Unavailable { reason } => {
                tracing::warn!(
                    "❌ 搜索提供方 {} 不可用，按零结果处理 [{}]: {}",
                    self.provider.name(),
                    query.text,
                    reason
                );
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl SearchProvider for CountingProvider {
        async fn search(
            &self,
            query: &str,
            _depth: SearchDepth,
            _max_results: usize,
        ) -> Result<Vec<RawSource>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(SearchError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(vec![RawSource::new(query, "https://example.com", "content")])
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_query_collapses_whitespace() {
        let query = SearchQuery::new("  Engineer  skills  ", SearchDepth::Basic, 3);
        assert_eq!(query.text, "Engineer skills");
    }

    #[tokio::test]
    async fn test_provider_failure_is_unavailable() {
        let fetcher = SourceFetcher::new(Arc::new(CountingProvider::new(true)), Duration::from_secs(5));
        let outcome = fetcher
            .fetch(&SearchQuery::new("acme", SearchDepth::Basic, 3))
            .await;
        assert!(!outcome.is_available());
        assert!(outcome.into_sources().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
            fail: false,
            delay: Some(Duration::from_millis(200)),
        };
        let fetcher = SourceFetcher::new(Arc::new(provider), Duration::from_millis(10));
        let outcome = fetcher
            .fetch(&SearchQuery::new("acme", SearchDepth::Basic, 3))
            .await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_cache_avoids_second_provider_call() {
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(SearchCache::new(CacheConfig {
            enabled: true,
            cache_dir: temp_dir.path().to_path_buf(),
            expire_hours: 24,
        }));
        let provider = Arc::new(CountingProvider::new(false));
        let fetcher = SourceFetcher::new(provider.clone(), Duration::from_secs(5)).with_cache(cache);

        let query = SearchQuery::new("acme about", SearchDepth::Basic, 3);
        let first = fetcher.fetch(&query).await.into_sources();
        let second = fetcher.fetch(&query).await.into_sources();

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
