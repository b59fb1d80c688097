//! 香农熵（字节分布与 n-gram 分布）
use std::collections::HashMap;

use crate::frequency::FrequencyTable;

/// 由计数序列计算香农熵（比特），只累加非零计数；总数为 0 时返回 0
fn entropy_of_counts<I: IntoIterator<Item = u64>>(counts: I, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let h: f64 = counts
        .into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();
    // 单一符号时各项为 -0.0，统一为 +0.0
    if h <= 0.0 { 0.0 } else { h }
}

/// 字节分布的香农熵，范围 [0, 8]
pub fn shannon_entropy(table: &FrequencyTable) -> f64 {
    entropy_of_counts(table.counts().iter().copied(), table.total())
}

/// 所有重叠 n 字节窗口构成的经验分布的熵；长度不足 n（或 n 为 0）时返回 0
pub fn ngram_entropy(buf: &[u8], n: usize) -> f64 {
    if n == 0 || buf.len() < n {
        return 0.0;
    }
    let mut table: HashMap<&[u8], u64> = HashMap::new();
    for win in buf.windows(n) {
        *table.entry(win).or_insert(0) += 1;
    }
    let windows = (buf.len() - n + 1) as u64;
    // HashMap 迭代顺序随实例变化；排序后再求和，保证浮点结果可复现
    let mut counts: Vec<u64> = table.into_values().collect();
    counts.sort_unstable();
    entropy_of_counts(counts, windows)
}
