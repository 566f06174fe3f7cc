use anyhow::Result;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::{CacheConfig, SearchDepth};
use crate::types::source::RawSource;

pub mod performance_monitor;
pub use performance_monitor::{CachePerformanceMonitor, CachePerformanceReport};

/// 搜索结果缓存，按查询参数落盘
pub struct SearchCache {
    config: CacheConfig,
    performance_monitor: CachePerformanceMonitor,
}

/// 缓存条目
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: i64,
    pub query: String,
    pub search_depth: SearchDepth,
    pub max_results: usize,
    pub results: Vec<RawSource>,
}

/// 缓存目录统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_cache_files: usize,
    pub valid_cache_files: usize,
    pub expired_cache_files: usize,
    pub total_cached_results: usize,
    pub cache_directory: PathBuf,
}

impl SearchCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            performance_monitor: CachePerformanceMonitor::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// 生成查询参数的MD5哈希，忽略首尾空白，查询词区分大小写
    pub fn cache_key(&self, query: &str, depth: SearchDepth, max_results: usize) -> String {
        let raw = format!("{}|{}|{}", query.trim(), depth, max_results);
        let mut hasher = Md5::new();
        hasher.update(raw.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// 获取缓存文件路径
    fn get_cache_path(&self, key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{}.json", key))
    }

    /// 检查缓存是否过期
    fn is_expired(&self, timestamp: i64) -> bool {
        let now = chrono::Utc::now().timestamp();
        let expire_seconds = (self.config.expire_hours * 3600) as i64;
        now.saturating_sub(timestamp) > expire_seconds
    }

    /// 获取缓存
    pub async fn get(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Option<Vec<RawSource>> {
        if !self.config.enabled {
            return None;
        }

        let key = self.cache_key(query, depth, max_results);
        let cache_path = self.get_cache_path(&key);

        if !cache_path.exists() {
            self.performance_monitor.record_cache_miss(query);
            return None;
        }

        match fs::read_to_string(&cache_path).await {
            Ok(content) => match serde_json::from_str::<CacheEntry>(&content) {
                Ok(entry) => {
                    if self.is_expired(entry.timestamp) {
                        // 删除过期缓存
                        let _ = fs::remove_file(&cache_path).await;
                        self.performance_monitor.record_cache_miss(query);
                        return None;
                    }
                    self.performance_monitor
                        .record_cache_hit(query, entry.results.len());
                    Some(entry.results)
                }
                Err(e) => {
                    self.performance_monitor
                        .record_cache_error(query, &format!("反序列化失败: {}", e));
                    None
                }
            },
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(query, &format!("读取文件失败: {}", e));
                None
            }
        }
    }

    /// 写入缓存
    pub async fn set(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
        results: &[RawSource],
    ) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let key = self.cache_key(query, depth, max_results);
        let cache_path = self.get_cache_path(&key);

        // 确保目录存在
        fs::create_dir_all(&self.config.cache_dir).await?;

        let entry = CacheEntry {
            timestamp: chrono::Utc::now().timestamp(),
            query: query.to_string(),
            search_depth: depth,
            max_results,
            results: results.to_vec(),
        };

        match serde_json::to_string_pretty(&entry) {
            Ok(content) => match fs::write(&cache_path, content).await {
                Ok(_) => {
                    self.performance_monitor
                        .record_cache_write(query, results.len());
                    Ok(())
                }
                Err(e) => {
                    self.performance_monitor
                        .record_cache_error(query, &format!("写入文件失败: {}", e));
                    Err(e.into())
                }
            },
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(query, &format!("序列化失败: {}", e));
                Err(e.into())
            }
        }
    }

    /// 清理过期与损坏的缓存文件，返回删除数量
    pub async fn clear_expired(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.cache_files().await? {
            let keep = match read_entry(&path).await {
                Some(entry) => !self.is_expired(entry.timestamp),
                None => false,
            };
            if !keep {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!("🧹 清理了 {} 个过期缓存文件", removed);
        }
        Ok(removed)
    }

    /// 统计缓存目录
    pub async fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats {
            cache_directory: self.config.cache_dir.clone(),
            ..Default::default()
        };

        for path in self.cache_files().await? {
            stats.total_cache_files += 1;
            match read_entry(&path).await {
                Some(entry) if !self.is_expired(entry.timestamp) => {
                    stats.valid_cache_files += 1;
                    stats.total_cached_results += entry.results.len();
                }
                _ => stats.expired_cache_files += 1,
            }
        }

        Ok(stats)
    }

    async fn cache_files(&self) -> Result<Vec<PathBuf>> {
        if !self.config.cache_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.config.cache_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// 生成性能报告
    pub fn generate_performance_report(&self) -> CachePerformanceReport {
        self.performance_monitor.generate_report()
    }
}

async fn read_entry(path: &Path) -> Option<CacheEntry> {
    let content = fs::read_to_string(path).await.ok()?;
    serde_json::from_str(&content).ok()
}
