//! 有界 Top-K / Bottom-K 选择
//!
//! 排序规则（两个方向一致）：
//! - most-common：计数降序 → 键升序
//! - least-common：仅非零计数，计数升序 → 键升序
//!
//! 键升序的并列规则是显式的，不依赖排序算法本身的稳定性。

use std::cmp::Ordering;

/// 排名条目：键（字节值或打包后的模式）与出现次数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankedEntry<K> {
    pub key: K,
    pub count: u64,
}

fn by_count_desc<K: Ord>(a: &RankedEntry<K>, b: &RankedEntry<K>) -> Ordering {
    match b.count.cmp(&a.count) {
        Ordering::Equal => a.key.cmp(&b.key),
        o => o,
    }
}

fn by_count_asc<K: Ord>(a: &RankedEntry<K>, b: &RankedEntry<K>) -> Ordering {
    match a.count.cmp(&b.count) {
        Ordering::Equal => a.key.cmp(&b.key),
        o => o,
    }
}

/// 取计数最高的 k 项；不足 k 项时返回全部（不过滤零计数）
pub fn most_common<K, I>(entries: I, k: usize) -> Vec<RankedEntry<K>>
where
    K: Ord + Copy,
    I: IntoIterator<Item = (K, u64)>,
{
    select(entries.into_iter().map(|(key, count)| RankedEntry { key, count }), k, by_count_desc)
}

/// 取计数最低的 k 项，只考虑计数非零的条目，从不补零
pub fn least_common<K, I>(entries: I, k: usize) -> Vec<RankedEntry<K>>
where
    K: Ord + Copy,
    I: IntoIterator<Item = (K, u64)>,
{
    select(
        entries
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(key, count)| RankedEntry { key, count }),
        k,
        by_count_asc,
    )
}

/// 先用 select_nth_unstable_by 做部分划分，再对前 k 项完整排序。
/// 比较器是全序（计数 + 键），所以结果与划分方式无关。
fn select<K, I, F>(entries: I, k: usize, cmp: F) -> Vec<RankedEntry<K>>
where
    K: Ord + Copy,
    I: Iterator<Item = RankedEntry<K>>,
    F: Fn(&RankedEntry<K>, &RankedEntry<K>) -> Ordering,
{
    if k == 0 {
        return Vec::new();
    }
    let mut all: Vec<RankedEntry<K>> = entries.collect();
    if all.len() > k {
        all.select_nth_unstable_by(k - 1, &cmp);
        all.truncate(k);
    }
    all.sort_unstable_by(&cmp);
    all
}
