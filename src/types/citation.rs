use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::types::entity::EntityKind;
use crate::utils::text::host_of;

/// 首次写入引用的智能体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributingAgent {
    Company,
    Role,
    Interviewer,
    Supplemental,
}

impl From<EntityKind> for ContributingAgent {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Company => ContributingAgent::Company,
            EntityKind::Role => ContributingAgent::Role,
            EntityKind::Interviewer => ContributingAgent::Interviewer,
        }
    }
}

impl Display for ContributingAgent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContributingAgent::Company => write!(f, "company_analysis"),
            ContributingAgent::Role => write!(f, "role_analysis"),
            ContributingAgent::Interviewer => write!(f, "interviewer_analysis"),
            ContributingAgent::Supplemental => write!(f, "supplemental_research"),
        }
    }
}

/// 引用来源的类别，供下游报告排版使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    LinkedinProfile,
    LinkedinCompany,
    LinkedinPost,
    CompanyProfile,
    NewsArticle,
    JobListing,
    CompanyInfo,
    General,
}

const NEWS_DOMAINS: [&str; 5] = ["techcrunch", "bloomberg", "reuters", "wsj", "forbes"];
const JOB_DOMAINS: [&str; 3] = ["glassdoor", "indeed", "monster"];
const REPUTABLE_DOMAINS: [&str; 9] = [
    "linkedin.com",
    "crunchbase.com",
    "techcrunch.com",
    "bloomberg.com",
    "reuters.com",
    "wsj.com",
    "forbes.com",
    "glassdoor.com",
    "indeed.com",
];

/// 引用账本中的一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 单调递增分配的编号，不会复用
    pub id: String,
    /// 规范化的 `title - url`
    pub source_descriptor: String,
    pub snippet: String,
    pub contributing_agent: ContributingAgent,
    pub kind: CitationKind,
    /// 0-10
    pub quality_score: u8,
}

impl Citation {
    pub fn new(
        id: impl Into<String>,
        source_descriptor: impl Into<String>,
        snippet: impl Into<String>,
        contributing_agent: ContributingAgent,
    ) -> Self {
        let source_descriptor = source_descriptor.into();
        let snippet = snippet.into();
        let (title, url) = split_descriptor(&source_descriptor);
        let kind = classify(title, url);
        let quality_score = quality_score(title, url, &snippet, contributing_agent);

        Self {
            id: id.into(),
            source_descriptor,
            snippet,
            contributing_agent,
            kind,
            quality_score,
        }
    }

    pub fn title(&self) -> &str {
        split_descriptor(&self.source_descriptor).0
    }

    pub fn url(&self) -> &str {
        split_descriptor(&self.source_descriptor).1
    }

    /// 编号的整数值
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

/// 从 `title - url` 中拆出标题与链接，标题本身可能包含 " - "
fn split_descriptor(descriptor: &str) -> (&str, &str) {
    match descriptor.rsplit_once(" - ") {
        Some((title, url)) if url.contains("://") || url.is_empty() => (title.trim(), url.trim()),
        _ => (descriptor.trim(), ""),
    }
}

fn classify(title: &str, url: &str) -> CitationKind {
    let host = host_of(url);
    let url_lower = url.to_lowercase();
    let title_lower = title.to_lowercase();

    if host.contains("linkedin.com") {
        if url_lower.contains("/company/") {
            CitationKind::LinkedinCompany
        } else if url_lower.contains("/in/") {
            CitationKind::LinkedinProfile
        } else {
            CitationKind::LinkedinPost
        }
    } else if host.contains("crunchbase.com") {
        CitationKind::CompanyProfile
    } else if NEWS_DOMAINS.iter().any(|d| host.contains(d)) {
        CitationKind::NewsArticle
    } else if JOB_DOMAINS.iter().any(|d| host.contains(d)) {
        CitationKind::JobListing
    } else if title_lower.contains("about") || title_lower.contains("company") {
        CitationKind::CompanyInfo
    } else {
        CitationKind::General
    }
}

fn quality_score(title: &str, url: &str, snippet: &str, agent: ContributingAgent) -> u8 {
    let mut score = 0u8;

    if title.chars().count() > 10 {
        score += 2;
    }
    if !title.is_empty() && !title.to_lowercase().starts_with("untitled") && title != "Unknown" {
        score += 1;
    }
    if !url.is_empty() {
        score += 2;
        let host = host_of(url);
        if REPUTABLE_DOMAINS.iter().any(|d| host.ends_with(d)) {
            score += 2;
        }
    }
    if snippet.chars().count() > 50 {
        score += 1;
    }
    if matches!(
        agent,
        ContributingAgent::Company | ContributingAgent::Interviewer
    ) {
        score += 1;
    }

    score.min(10)
}
