use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::types::assessment::MAX_SUFFICIENCY_SCORE;

/// 搜索提供方类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum SearchProviderKind {
    #[serde(rename = "tavily")]
    #[default]
    Tavily,
}

impl std::fmt::Display for SearchProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProviderKind::Tavily => write!(f, "tavily"),
        }
    }
}

impl std::str::FromStr for SearchProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tavily" => Ok(SearchProviderKind::Tavily),
            _ => Err(format!("Unknown search provider: {}", s)),
        }
    }
}

/// 搜索深度
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDepth::Basic => write!(f, "basic"),
            SearchDepth::Advanced => write!(f, "advanced"),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// 调研流程配置
    pub research: ResearchConfig,

    /// 搜索提供方配置
    pub search: SearchConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 调研流程配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 反思循环的最大补充轮次
    pub max_reflection_loops: u32,

    /// 充分性阈值（满分 11）
    pub sufficiency_threshold: u32,

    /// 每轮最多处理的缺口数
    pub max_gaps_per_loop: usize,

    /// 三个实体分析智能体是否并发执行
    pub concurrent_agents: bool,

    /// 引用摘要的截断长度（字符）
    pub snippet_length: usize,

    /// 每个缺口最多写入的补充引用数
    pub supplemental_citation_limit: usize,
}

/// 搜索提供方配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 提供方类型
    pub provider: SearchProviderKind,

    /// API KEY
    pub api_key: String,

    /// API基地址
    pub api_base_url: String,

    /// 首轮查询的搜索深度
    pub default_depth: SearchDepth,

    /// 单次查询超时时间（秒）
    pub timeout_seconds: u64,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置取值是否合理
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.research.sufficiency_threshold <= MAX_SUFFICIENCY_SCORE,
            "sufficiency_threshold {} exceeds the maximum score {}",
            self.research.sufficiency_threshold,
            MAX_SUFFICIENCY_SCORE
        );
        ensure!(
            self.research.snippet_length > 0,
            "snippet_length must be positive"
        );
        ensure!(
            self.search.timeout_seconds > 0,
            "search timeout_seconds must be positive"
        );
        Ok(())
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_reflection_loops: 2,
            sufficiency_threshold: 4,
            max_gaps_per_loop: 2,
            concurrent_agents: false,
            snippet_length: 200,
            supplemental_citation_limit: 4,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::default(),
            api_key: std::env::var("TAVILY_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.tavily.com"),
            default_depth: SearchDepth::Basic,
            timeout_seconds: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".research/cache/search"),
            expire_hours: 24,
        }
    }
}
