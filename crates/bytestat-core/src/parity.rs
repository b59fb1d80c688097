//! 奇偶字节分布
use serde::Serialize;

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvenOdd {
    pub even: u64,
    pub odd: u64,
    /// even / odd；odd 为 0 时为 None（不产生 inf）
    pub ratio: Option<f64>,
}

pub fn even_odd(table: &FrequencyTable) -> EvenOdd {
    let (mut even, mut odd) = (0u64, 0u64);
    for (b, &c) in table.counts().iter().enumerate() {
        if b % 2 == 0 { even += c } else { odd += c }
    }
    let ratio = if odd > 0 { Some(even as f64 / odd as f64) } else { None };
    EvenOdd { even, odd, ratio }
}
