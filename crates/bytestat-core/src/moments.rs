//! 字节值与一阶差分的矩统计
//!
//! 约定：
//! - 标准差为总体标准差（除以 N）。
//! - 偏度为有偏估计 m3 / m2^1.5；峰度为 Fisher 超额峰度 m4 / m2² − 3（正态分布为 0）。
//! - 均值/中位数/标准差对外以截断整数（向零取整）报告，输出端再渲染为十六进制。
//!   这是有损的兼容约定，不要改成四舍五入。
//!
//! 字节与差分的取值范围都很小（256 / 511 种），因此所有统计量都在直方图上计算，
//! 求和与零方差判定均为精确整数运算。
use serde::Serialize;

use crate::frequency::FrequencyTable;

/// 截断为整数的均值/中位数/标准差
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TruncatedSummary {
    pub mean: i64,
    pub median: i64,
    pub std_dev: i64,
}

/// 字节值的分布统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ByteMoments {
    pub summary: TruncatedSummary,
    /// 空缓冲区或零方差时为 None
    pub skewness: Option<f64>,
    /// 同上（Fisher 定义）
    pub kurtosis: Option<f64>,
}

/// 稠密直方图视图：下标 i 对应取值 i + offset
struct Histogram<'a> {
    counts: &'a [u64],
    offset: i64,
}

impl Histogram<'_> {
    fn values(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(move |(i, &c)| (i as i64 + self.offset, c))
    }

    fn len(&self) -> u64 { self.counts.iter().sum() }

    fn distinct(&self) -> usize { self.counts.iter().filter(|&&c| c > 0).count() }

    fn mean(&self, n: u64) -> f64 {
        let sum: i64 = self.values().map(|(v, c)| v * c as i64).sum();
        sum as f64 / n as f64
    }

    /// 按 0 起的秩取值（调用方保证 rank < n）
    fn value_at_rank(&self, rank: u64) -> i64 {
        let mut seen = 0u64;
        let mut last = self.offset;
        for (v, c) in self.values() {
            seen += c;
            last = v;
            if rank < seen {
                break;
            }
        }
        last
    }

    fn median(&self, n: u64) -> f64 {
        if n % 2 == 1 {
            self.value_at_rank(n / 2) as f64
        } else {
            let lo = self.value_at_rank(n / 2 - 1);
            let hi = self.value_at_rank(n / 2);
            (lo + hi) as f64 / 2.0
        }
    }

    fn central_moment(&self, mean: f64, n: u64, k: i32) -> f64 {
        let s: f64 = self.values().map(|(v, c)| c as f64 * (v as f64 - mean).powi(k)).sum();
        s / n as f64
    }

    fn summarize(&self) -> TruncatedSummary {
        let n = self.len();
        if n == 0 {
            return TruncatedSummary::default();
        }
        let mean = self.mean(n);
        let std_dev = self.central_moment(mean, n, 2).sqrt();
        TruncatedSummary {
            mean: truncate(mean),
            median: truncate(self.median(n)),
            std_dev: truncate(std_dev),
        }
    }
}

/// 向零截断（非四舍五入）
fn truncate(x: f64) -> i64 {
    x.trunc() as i64
}

/// 基于字节直方图计算均值、中位数、标准差、偏度与峰度
pub fn byte_moments(table: &FrequencyTable) -> ByteMoments {
    let hist = Histogram { counts: table.counts(), offset: 0 };
    let n = table.total();
    let summary = hist.summarize();

    // 零方差当且仅当只出现过一种取值
    if n == 0 || hist.distinct() < 2 {
        return ByteMoments { summary, skewness: None, kurtosis: None };
    }
    let mean = hist.mean(n);
    let m2 = hist.central_moment(mean, n, 2);
    let m3 = hist.central_moment(mean, n, 3);
    let m4 = hist.central_moment(mean, n, 4);
    ByteMoments {
        summary,
        skewness: Some(m3 / m2.powf(1.5)),
        kurtosis: Some(m4 / (m2 * m2) - 3.0),
    }
}

/// 相邻字节的有符号差分 buf[i+1] - buf[i] 的截断统计；少于 2 字节时全为 0
pub fn rate_of_change(buf: &[u8]) -> TruncatedSummary {
    if buf.len() < 2 {
        return TruncatedSummary::default();
    }
    // 差分取值 -255..=255
    let mut counts = [0u64; 511];
    for w in buf.windows(2) {
        let d = w[1] as i64 - w[0] as i64;
        counts[(d + 255) as usize] += 1;
    }
    Histogram { counts: &counts, offset: -255 }.summarize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moments(buf: &[u8]) -> ByteMoments {
        byte_moments(&FrequencyTable::from_bytes(buf))
    }

    #[test]
    fn empty_buffer_uses_sentinels() {
        let m = moments(&[]);
        assert_eq!(m.summary, TruncatedSummary::default());
        assert_eq!(m.skewness, None);
        assert_eq!(m.kurtosis, None);
        assert_eq!(rate_of_change(&[]), TruncatedSummary::default());
    }

    #[test]
    fn single_byte_has_no_rate_of_change() {
        assert_eq!(rate_of_change(&[200]), TruncatedSummary::default());
        let m = moments(&[200]);
        assert_eq!(m.summary, TruncatedSummary { mean: 200, median: 200, std_dev: 0 });
        assert_eq!(m.skewness, None);
    }

    #[test]
    fn constant_buffer_has_zero_spread() {
        let m = moments(&[0x7f; 33]);
        assert_eq!(m.summary.std_dev, 0);
        assert_eq!(m.summary.mean, 0x7f);
        assert_eq!(m.kurtosis, None);
    }

    #[test]
    fn values_are_truncated_not_rounded() {
        // 均值 = 1.75，中位数 = 1.5，标准差 ≈ 0.83
        let m = moments(&[1, 1, 2, 3]);
        assert_eq!(m.summary, TruncatedSummary { mean: 1, median: 1, std_dev: 0 });
    }

    #[test]
    fn symmetric_distribution_has_zero_skew() {
        let m = moments(&[0, 1, 0, 1, 0, 1]);
        assert!(m.skewness.unwrap().abs() < 1e-12);
        // 两点等概率分布的超额峰度为 -2
        assert!((m.kurtosis.unwrap() + 2.0).abs() < 1e-12);
    }

    #[test]
    fn right_tail_is_positive_skew() {
        let m = moments(&[0, 0, 0, 0, 0, 0, 0, 255]);
        assert!(m.skewness.unwrap() > 0.0);
        assert!(m.kurtosis.unwrap() > 0.0);
    }

    #[test]
    fn differences_are_signed() {
        // 差分：-10, -10, -10
        let r = rate_of_change(&[40, 30, 20, 10]);
        assert_eq!(r, TruncatedSummary { mean: -10, median: -10, std_dev: 0 });
    }

    #[test]
    fn negative_fraction_truncates_toward_zero() {
        // 差分：-1, 0 → 均值 -0.5，中位数 -0.5，截断后均为 0
        let r = rate_of_change(&[1, 0, 0]);
        assert_eq!(r.mean, 0);
        assert_eq!(r.median, 0);
    }

    #[test]
    fn full_range_differences() {
        let r = rate_of_change(&[0, 255, 0]);
        // 差分：255, -255 → 均值 0，标准差 255
        assert_eq!(r, TruncatedSummary { mean: 0, median: 0, std_dev: 255 });
    }
}
