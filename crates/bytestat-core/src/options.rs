//! 分析选项、扫描选项与统计信息（模块）
use serde::Serialize;

use crate::autocorr::DEFAULT_MAX_LAG;

/// 单文件分析参数（默认值即标准统计口径）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// most/least common 与模式排行的条目数
    pub top_k: usize,
    /// n-gram 熵的阶数
    pub ngram_order: usize,
    /// 自相关的最大滞后
    pub max_lag: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { top_k: 3, ngram_order: 3, max_lag: DEFAULT_MAX_LAG }
    }
}

/// 扫描选项
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
    pub analysis: AnalysisOptions,
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_analyzed: usize,
    /// 超过大小上限而跳过的文件
    pub files_skipped: usize,
    /// 读取失败的文件
    pub files_failed: usize,
    pub records_written: usize,
}
