use serde::{Deserialize, Serialize};

use crate::types::citation::{Citation, ContributingAgent};

/// 引用账本：一次调研内唯一的去重存储，只追加不删除
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationLedger {
    entries: Vec<Citation>,
    #[serde(default)]
    next_id: u64,
}

impl CitationLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// 插入或复用引用，返回引用编号
    ///
    /// 描述去除首尾空白后精确比较（区分大小写）；命中已有条目时原样返回其编号，
    /// 只记录一条审计日志，不修改任何状态。
    pub fn insert_or_reuse(
        &mut self,
        descriptor: &str,
        snippet: &str,
        agent: ContributingAgent,
    ) -> String {
        let descriptor = descriptor.trim();

        if let Some(existing) = self.find_by_descriptor(descriptor) {
            tracing::debug!(
                "🔗 Reusing Citation [{}]: {} (found by {})",
                existing.id,
                descriptor,
                agent
            );
            return existing.id.clone();
        }

        // Default 构造或缺少 next_id 的反序列化账本从现有最大编号继续
        if self.next_id == 0 {
            self.next_id = self.max_id() + 1;
        }

        let id = self.next_id.to_string();
        self.next_id += 1;
        self.entries
            .push(Citation::new(id.clone(), descriptor, snippet, agent));
        tracing::debug!("📝 Citation [{}]: {} ({})", id, descriptor, agent);
        id
    }

    pub fn get(&self, id: &str) -> Option<&Citation> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn find_by_descriptor(&self, descriptor: &str) -> Option<&Citation> {
        let descriptor = descriptor.trim();
        self.entries
            .iter()
            .find(|c| c.source_descriptor == descriptor)
    }

    /// 按编号升序（即首次插入顺序）
    pub fn citations(&self) -> &[Citation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Citation> {
        self.entries.iter()
    }

    fn max_id(&self) -> u64 {
        self.entries
            .iter()
            .filter_map(Citation::numeric_id)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_descriptor_reuses_id() {
        let mut ledger = CitationLedger::new();
        let first = ledger.insert_or_reuse(
            "Acme - About - https://acme.com/about",
            "Acme makes anvils",
            ContributingAgent::Company,
        );
        let second = ledger.insert_or_reuse(
            "  Acme - About - https://acme.com/about ",
            "a different snippet",
            ContributingAgent::Role,
        );

        assert_eq!(first, second);
        assert_eq!(ledger.len(), 1);
        let citation = ledger.get(&first).unwrap();
        assert_eq!(citation.contributing_agent, ContributingAgent::Company);
        assert_eq!(citation.snippet, "Acme makes anvils");
    }

    #[test]
    fn test_find_by_descriptor_trims_input() {
        let mut ledger = CitationLedger::new();
        let id = ledger.insert_or_reuse("Acme - https://acme.com", "", ContributingAgent::Company);

        let found = ledger.find_by_descriptor("  Acme - https://acme.com  ").unwrap();
        assert_eq!(found.id, id);
        assert!(ledger.find_by_descriptor("Other - https://other.io").is_none());
    }

    #[test]
    fn test_descriptor_match_is_case_sensitive() {
        let mut ledger = CitationLedger::new();
        let a = ledger.insert_or_reuse("Acme - https://acme.com", "", ContributingAgent::Company);
        let b = ledger.insert_or_reuse("ACME - https://acme.com", "", ContributingAgent::Company);
        assert_ne!(a, b);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_ids_increase_in_first_insertion_order() {
        let mut ledger = CitationLedger::new();
        let agents = [
            ContributingAgent::Interviewer,
            ContributingAgent::Company,
            ContributingAgent::Supplemental,
            ContributingAgent::Role,
        ];
        let mut ids = Vec::new();
        for (i, agent) in agents.iter().enumerate() {
            ids.push(ledger.insert_or_reuse(
                &format!("Source {} - https://s{}.io", i, i),
                "",
                *agent,
            ));
            // 中途复用不消耗编号
            ledger.insert_or_reuse("Source 0 - https://s0.io", "", *agent);
        }

        let numeric: Vec<u64> = ids.iter().map(|id| id.parse().unwrap()).collect();
        assert_eq!(numeric, vec![1, 2, 3, 4]);
        let listed: Vec<&str> = ledger.citations().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(listed, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_deserialized_ledger_continues_numbering() {
        let mut ledger = CitationLedger::new();
        ledger.insert_or_reuse("A - https://a.io", "", ContributingAgent::Company);
        ledger.insert_or_reuse("B - https://b.io", "", ContributingAgent::Company);

        let json = serde_json::to_string(&ledger).unwrap();
        let mut restored: CitationLedger = serde_json::from_str(&json).unwrap();
        let id = restored.insert_or_reuse("C - https://c.io", "", ContributingAgent::Role);
        assert_eq!(id, "3");
    }
}
