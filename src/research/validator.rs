use std::collections::BTreeSet;

use crate::types::entity::TargetKind;
use crate::types::source::{Evidence, RawSource, Verdict};
use crate::utils::text::{compact, contains_word, host_has_label, is_linkedin_url};

/// 同名冲突时常见的大型机构
const COMPETING_ORGANIZATIONS: [&str; 8] = [
    "google",
    "amazon",
    "microsoft",
    "meta",
    "apple",
    "netflix",
    "uber",
    "lyft",
];

/// 单类指标表，每命中一个 +1，总加分不超过 `cap`
pub struct IndicatorTable {
    pub label: &'static str,
    pub words: &'static [&'static str],
    pub url_markers: &'static [&'static str],
    pub cap: usize,
}

static COMPANY_INDICATORS: IndicatorTable = IndicatorTable {
    label: "company indicators",
    words: &["about", "careers", "news", "mission", "overview"],
    url_markers: &["linkedin.com/company"],
    cap: 3,
};

static ROLE_INDICATORS: IndicatorTable = IndicatorTable {
    label: "job indicators",
    words: &[
        "job",
        "requirements",
        "interview",
        "responsibilities",
        "skills",
        "qualifications",
        "position",
    ],
    url_markers: &[],
    cap: 3,
};

static PERSON_INDICATORS: IndicatorTable = IndicatorTable {
    label: "profile indicators",
    words: &["profile", "bio", "experience", "background"],
    url_markers: &["/in/", "/pub/"],
    cap: 3,
};

/// 各目标类型的打分权重
struct KindWeights {
    name_in_title: f64,
    name_in_content: f64,
    competitor_penalty: f64,
    threshold: f64,
    indicators: &'static IndicatorTable,
}

fn weights(kind: TargetKind) -> KindWeights {
    match kind {
        TargetKind::Company => KindWeights {
            name_in_title: 3.0,
            name_in_content: 2.0,
            competitor_penalty: 0.5,
            threshold: 2.0,
            indicators: &COMPANY_INDICATORS,
        },
        TargetKind::Role => KindWeights {
            name_in_title: 3.0,
            name_in_content: 2.0,
            competitor_penalty: 0.5,
            threshold: 2.0,
            indicators: &ROLE_INDICATORS,
        },
        // 误认一个人的代价更高，阈值更严
        TargetKind::Person => KindWeights {
            name_in_title: 4.0,
            name_in_content: 2.0,
            competitor_penalty: 1.0,
            threshold: 3.0,
            indicators: &PERSON_INDICATORS,
        },
    }
}

const LINKEDIN_PROFILE_WEIGHT: f64 = 5.0;
const OFFICIAL_DOMAIN_WEIGHT: f64 = 2.0;
const AFFILIATION_WEIGHT: f64 = 2.0;
const KEYWORD_CAP: usize = 2;

/// 校验目标：名称、类型，以及人物与职位所属的公司
#[derive(Debug, Clone, Copy)]
pub struct ValidationTarget<'a> {
    pub name: &'a str,
    pub kind: TargetKind,
    pub affiliation: Option<&'a str>,
}

impl<'a> ValidationTarget<'a> {
    pub fn new(name: &'a str, kind: TargetKind, affiliation: Option<&'a str>) -> Self {
        Self {
            name,
            kind,
            affiliation: affiliation.map(str::trim).filter(|a| !a.is_empty()),
        }
    }
}

/// 相关性校验器，按目标类型查表打分，从不因输入格式问题失败
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceValidator;

impl RelevanceValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn threshold(kind: TargetKind) -> f64 {
        weights(kind).threshold
    }

    pub fn validate(
        &self,
        source: &RawSource,
        target: &ValidationTarget<'_>,
        context_keywords: &BTreeSet<String>,
    ) -> Verdict {
        let weights = weights(target.kind);
        let title = source.title.to_lowercase();
        let content = source.content.to_lowercase();
        let url = source.url.to_lowercase();
        let name = target.name.trim().to_lowercase();
        let affiliation = target.affiliation.map(str::to_lowercase);

        let mut score = 0.0;
        let mut evidence = Vec::new();

        if target.kind == TargetKind::Person && is_linkedin_url(&source.url) {
            score += LINKEDIN_PROFILE_WEIGHT;
            evidence.push(Evidence::new("LinkedIn profile domain"));
        }

        if let Some(location) = name_location(&name, target.kind, &title, &content) {
            match location {
                NameLocation::Title => {
                    score += weights.name_in_title;
                    evidence.push(Evidence::new(format!("{} name in title", noun(target.kind))));
                }
                NameLocation::Content => {
                    score += weights.name_in_content;
                    evidence.push(Evidence::new(format!(
                        "{} name in content",
                        noun(target.kind)
                    )));
                }
            }
        }

        if target.kind == TargetKind::Company && !name.is_empty() {
            let compact_name = compact(&name);
            let host = crate::utils::text::host_of(&source.url);
            if host_has_label(&host, &compact_name) {
                score += OFFICIAL_DOMAIN_WEIGHT;
                evidence.push(Evidence::new("official company domain"));
            }
        }

        if let Some(affiliation) = affiliation.as_deref()
            && (title.contains(affiliation) || content.contains(affiliation))
        {
            score += AFFILIATION_WEIGHT;
            evidence.push(Evidence::new(format!("company '{}' context", affiliation)));
        }

        let indicator_hits = count_indicators(weights.indicators, &title, &content, &url);
        if indicator_hits > 0 {
            score += indicator_hits.min(weights.indicators.cap) as f64;
            evidence.push(Evidence::new(format!(
                "{} {}",
                indicator_hits, weights.indicators.label
            )));
        }

        let keyword_hits = context_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && *k != name && Some(k) != affiliation.as_ref())
            .filter(|k| title.contains(k.as_str()) || content.contains(k.as_str()))
            .count();
        if keyword_hits > 0 {
            score += keyword_hits.min(KEYWORD_CAP) as f64;
            evidence.push(Evidence::new(format!("{} keyword matches", keyword_hits)));
        }

        if let Some(competitor) =
            competing_organization(&name, affiliation.as_deref(), &title, &content)
        {
            score -= weights.competitor_penalty;
            evidence.push(Evidence::new(format!(
                "mentions competing organization '{}'",
                competitor
            )));
        }

        Verdict {
            relevance_score: score,
            is_relevant: score >= weights.threshold,
            evidence,
        }
    }
}

enum NameLocation {
    Title,
    Content,
}

fn name_location(
    name: &str,
    kind: TargetKind,
    title: &str,
    content: &str,
) -> Option<NameLocation> {
    if name.is_empty() {
        return None;
    }

    let mut variants = vec![name.to_string()];
    if kind == TargetKind::Company {
        let compact_name = compact(name);
        if compact_name != name {
            variants.push(compact_name);
        }
    }

    if variants.iter().any(|v| title.contains(v.as_str())) {
        Some(NameLocation::Title)
    } else if variants.iter().any(|v| content.contains(v.as_str())) {
        Some(NameLocation::Content)
    } else {
        None
    }
}

fn noun(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Company => "company",
        TargetKind::Role => "role",
        TargetKind::Person => "person",
    }
}

fn count_indicators(table: &IndicatorTable, title: &str, content: &str, url: &str) -> usize {
    let word_hits = table
        .words
        .iter()
        .filter(|w| contains_word(title, w) || contains_word(content, w))
        .count();
    let url_hits = table
        .url_markers
        .iter()
        .filter(|m| url.contains(*m))
        .count();
    word_hits + url_hits
}

/// 内容提到与目标及其所属公司都无关的大型机构时返回该机构
fn competing_organization(
    name: &str,
    affiliation: Option<&str>,
    title: &str,
    content: &str,
) -> Option<&'static str> {
    let own = |org: &str| {
        contains_word(name, org) || affiliation.is_some_and(|a| contains_word(a, org))
    };

    COMPETING_ORGANIZATIONS
        .iter()
        .copied()
        .filter(|org| !own(org))
        .find(|org| contains_word(content, org) || contains_word(title, org))
}
