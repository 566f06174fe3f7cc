use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// 搜索提供方返回的原始来源记录，缺失字段按空字符串处理
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    /// 提供方给出的相关度分数
    #[serde(default, alias = "score")]
    pub provider_score: Option<f64>,
}

impl RawSource {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            provider_score: None,
        }
    }

    /// 规范化的来源描述 `title - url`，引用账本以此去重
    pub fn descriptor(&self) -> String {
        let title = self.title.trim();
        let title = if title.is_empty() { "Unknown" } else { title };
        format!("{} - {}", title, self.url.trim())
    }

    /// 截断后的内容摘要
    pub fn snippet(&self, max_chars: usize) -> String {
        let content = self.content.trim();
        if content.is_empty() {
            return "No content".to_string();
        }
        if content.chars().count() <= max_chars {
            return content.to_string();
        }
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }

    pub fn is_linkedin(&self) -> bool {
        crate::utils::text::is_linkedin_url(&self.url)
    }
}

/// 一条可读的相关性证据，例如 "company name in title"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(String);

impl Evidence {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Evidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 校验器的判定结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub relevance_score: f64,
    pub evidence: Vec<Evidence>,
    pub is_relevant: bool,
}

/// 通过校验的来源，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedSource {
    pub source: RawSource,
    pub relevance_score: f64,
    pub evidence: Vec<Evidence>,
}

impl ValidatedSource {
    pub fn has_evidence(&self, needle: &str) -> bool {
        self.evidence.iter().any(|e| e.as_str().contains(needle))
    }
}

/// 按分数降序稳定排序，同分保持插入顺序
pub fn rank_by_relevance(sources: &mut [ValidatedSource]) {
    sources.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}
