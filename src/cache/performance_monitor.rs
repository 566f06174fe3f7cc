use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 每次搜索调用的估算费用（美元）
const COST_PER_QUERY: f64 = 0.005;

/// 缓存性能监控器
#[derive(Clone, Default)]
pub struct CachePerformanceMonitor {
    metrics: Arc<CacheMetrics>,
}

/// 缓存指标
#[derive(Default)]
pub struct CacheMetrics {
    /// 缓存命中次数
    pub cache_hits: AtomicUsize,
    /// 缓存未命中次数
    pub cache_misses: AtomicUsize,
    /// 缓存写入次数
    pub cache_writes: AtomicUsize,
    /// 缓存错误次数
    pub cache_errors: AtomicUsize,
    /// 命中时复用的结果条数
    pub results_served: AtomicUsize,
}

/// 缓存性能报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePerformanceReport {
    /// 缓存命中率
    pub hit_rate: f64,
    /// 总缓存操作次数
    pub total_operations: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_writes: usize,
    pub cache_errors: usize,
    /// 命中时复用的结果条数
    pub results_served: usize,
    /// 节省的搜索费用（美元，估算）
    pub cost_saved: f64,
}

impl CachePerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录缓存命中
    pub fn record_cache_hit(&self, query: &str, result_count: usize) {
        self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .results_served
            .fetch_add(result_count, Ordering::Relaxed);
        tracing::debug!("🎯 缓存命中 [{}] - {} 条结果", query, result_count);
    }

    /// 记录缓存未命中
    pub fn record_cache_miss(&self, query: &str) {
        self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("⌛ 缓存未命中 [{}] - 需要调用搜索接口", query);
    }

    /// 记录缓存写入
    pub fn record_cache_write(&self, query: &str, result_count: usize) {
        self.metrics.cache_writes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("💾 缓存写入 [{}] - {} 条结果", query, result_count);
    }

    /// 记录缓存错误
    pub fn record_cache_error(&self, query: &str, error: &str) {
        self.metrics.cache_errors.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("❌ 缓存错误 [{}]: {}", query, error);
    }

    /// 生成性能报告
    pub fn generate_report(&self) -> CachePerformanceReport {
        let hits = self.metrics.cache_hits.load(Ordering::Relaxed);
        let misses = self.metrics.cache_misses.load(Ordering::Relaxed);
        let total_operations = hits + misses;

        let hit_rate = if total_operations > 0 {
            hits as f64 / total_operations as f64
        } else {
            0.0
        };

        CachePerformanceReport {
            hit_rate,
            total_operations,
            cache_hits: hits,
            cache_misses: misses,
            cache_writes: self.metrics.cache_writes.load(Ordering::Relaxed),
            cache_errors: self.metrics.cache_errors.load(Ordering::Relaxed),
            results_served: self.metrics.results_served.load(Ordering::Relaxed),
            cost_saved: hits as f64 * COST_PER_QUERY,
        }
    }
}
