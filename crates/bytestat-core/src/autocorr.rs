//! 滞后 1..=N 的 Pearson 自相关
//!
//! 对每个滞后 L：a = buf[0..n-L]，b = buf[L..n]。
//! - n <= L：数据不足，结果为 None；
//! - a 或 b 方差为 0：相关系数无定义，记为 0.0；
//! - 否则为 a 与 b 的 Pearson 相关系数。
//!
//! 所有累加量用 i128 精确计算，零方差判定不受浮点误差影响。

/// 默认最大滞后
pub const DEFAULT_MAX_LAG: usize = 10;

/// 最大滞后的上限；超过部分被截断，结果长度不超过此值
pub const MAX_LAG_LIMIT: usize = 4096;

/// 计算滞后 1..=max_lag 的自相关，按位置返回（下标 0 对应滞后 1）。
/// `max_lag` 超过 `MAX_LAG_LIMIT` 时按上限计算。
pub fn autocorrelation(buf: &[u8], max_lag: usize) -> Vec<Option<f64>> {
    (1..=max_lag.min(MAX_LAG_LIMIT)).map(|lag| lag_correlation(buf, lag)).collect()
}

/// 单个滞后的相关系数
pub fn lag_correlation(buf: &[u8], lag: usize) -> Option<f64> {
    let n = buf.len();
    if n <= lag {
        return None;
    }
    let a = &buf[..n - lag];
    let b = &buf[lag..];
    let m = a.len() as i128;

    let (mut sa, mut sb, mut saa, mut sbb, mut sab) = (0i128, 0i128, 0i128, 0i128, 0i128);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as i128, y as i128);
        sa += x;
        sb += y;
        saa += x * x;
        sbb += y * y;
        sab += x * y;
    }

    // 以下三项均为 m² 倍的（协）方差
    let var_a = m * saa - sa * sa;
    let var_b = m * sbb - sb * sb;
    if var_a == 0 || var_b == 0 {
        return Some(0.0);
    }
    let cov = m * sab - sa * sb;
    let r = cov as f64 / ((var_a as f64).sqrt() * (var_b as f64).sqrt());
    Some(r.clamp(-1.0, 1.0))
}
