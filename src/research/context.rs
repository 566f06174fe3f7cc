use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::cache::SearchCache;
use crate::config::{Config, SearchDepth, SearchProviderKind};
use crate::research::validator::RelevanceValidator;
use crate::search::{SearchProvider, SourceFetcher, TavilyProvider};

/// 一次调研所需的全部协作者，由调用方显式构造后传入各组件
#[derive(Clone)]
pub struct ResearchContext {
    /// 配置
    pub config: Config,
    /// 来源抓取器（提供方 + 缓存 + 超时）
    pub fetcher: SourceFetcher,
    /// 相关性校验器
    pub validator: RelevanceValidator,
}

impl ResearchContext {
    /// 按配置创建搜索提供方与缓存
    pub fn new(config: Config) -> Result<Self> {
        let provider: Arc<dyn SearchProvider> = match config.search.provider {
            SearchProviderKind::Tavily => Arc::new(TavilyProvider::new(&config.search)?),
        };
        Ok(Self::with_provider(config, provider))
    }

    /// 使用外部提供的搜索提供方，缓存仍按配置启用
    pub fn with_provider(config: Config, provider: Arc<dyn SearchProvider>) -> Self {
        let timeout = Duration::from_secs(config.search.timeout_seconds);
        let mut fetcher = SourceFetcher::new(provider, timeout);
        if config.cache.enabled {
            fetcher = fetcher.with_cache(Arc::new(SearchCache::new(config.cache.clone())));
        }

        Self {
            config,
            fetcher,
            validator: RelevanceValidator::new(),
        }
    }

    /// 首轮查询的搜索深度
    pub fn default_depth(&self) -> SearchDepth {
        self.config.search.default_depth
    }

    pub fn snippet_length(&self) -> usize {
        self.config.research.snippet_length
    }
}
