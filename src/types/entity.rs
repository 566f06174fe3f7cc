use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::types::citation::Citation;
use crate::types::source::ValidatedSource;

/// 一次调研中的三类目标实体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Company,
    Role,
    Interviewer,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Company, EntityKind::Role, EntityKind::Interviewer];

    /// 校验器使用的目标类型
    pub fn target_kind(self) -> TargetKind {
        match self {
            EntityKind::Company => TargetKind::Company,
            EntityKind::Role => TargetKind::Role,
            EntityKind::Interviewer => TargetKind::Person,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Company => write!(f, "company"),
            EntityKind::Role => write!(f, "role"),
            EntityKind::Interviewer => write!(f, "interviewer"),
        }
    }
}

/// 相关性校验的目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Company,
    Role,
    Person,
}

/// 上游实体抽取的结果；缺失的名称对应的分析智能体不会运行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInput {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub interviewer_name: Option<String>,
    #[serde(default)]
    pub email_keywords: BTreeSet<String>,
}

impl EntityInput {
    pub fn new(
        company_name: Option<&str>,
        role_title: Option<&str>,
        interviewer_name: Option<&str>,
    ) -> Self {
        Self {
            company_name: company_name.map(str::to_string),
            role_title: role_title.map(str::to_string),
            interviewer_name: interviewer_name.map(str::to_string),
            email_keywords: BTreeSet::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.email_keywords
            .extend(keywords.into_iter().map(|k| k.into().to_lowercase()));
        self
    }

    /// 从邮件正文派生上下文关键词并合并
    pub fn with_email_content(mut self, email_content: &str) -> Self {
        let names: Vec<&str> = EntityKind::ALL
            .iter()
            .filter_map(|kind| self.name_of(*kind))
            .collect();
        let derived = crate::research::keywords::derive_context_keywords(email_content, &names);
        self.email_keywords.extend(derived);
        self
    }

    /// 指定实体的名称，空白名称视为缺失
    pub fn name_of(&self, kind: EntityKind) -> Option<&str> {
        let value = match kind {
            EntityKind::Company => self.company_name.as_deref(),
            EntityKind::Role => self.role_title.as_deref(),
            EntityKind::Interviewer => self.interviewer_name.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn company(&self) -> Option<&str> {
        self.name_of(EntityKind::Company)
    }
}

/// 单个实体分析智能体的产出，补充调研轮次会合并进来
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnalysisResult {
    pub entity_kind: EntityKind,
    pub entity_name: String,
    pub summary: String,
    /// 按相关度降序
    pub validated_sources: Vec<ValidatedSource>,
    pub sources_processed: usize,
    /// 取值范围 [0, 0.95]
    pub confidence_score: f64,
    pub citations: Vec<Citation>,
    /// 仅面试官分析使用
    pub linked_profiles_found: usize,
    /// 从公司相关的 LinkedIn 动态中推断出的候选查询
    #[serde(default)]
    pub suggested_queries: Vec<String>,
    #[serde(default)]
    pub validation_log: Vec<String>,
    /// 已处理过的全部原始来源描述（含被拒绝的），补充轮次据此去重
    #[serde(default)]
    pub processed_descriptors: BTreeSet<String>,
}

impl EntityAnalysisResult {
    pub fn empty(entity_kind: EntityKind, entity_name: impl Into<String>) -> Self {
        Self {
            entity_kind,
            entity_name: entity_name.into(),
            summary: String::new(),
            validated_sources: Vec::new(),
            sources_processed: 0,
            confidence_score: 0.0,
            citations: Vec::new(),
            linked_profiles_found: 0,
            suggested_queries: Vec::new(),
            validation_log: Vec::new(),
            processed_descriptors: BTreeSet::new(),
        }
    }

    pub fn validated_count(&self) -> usize {
        self.validated_sources.len()
    }

    pub fn has_citation(&self, id: &str) -> bool {
        self.citations.iter().any(|c| c.id == id)
    }
}
