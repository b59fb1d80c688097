//! 重叠定宽窗口（2 字节 / 4 字节）的模式频次
use serde::Serialize;
use std::collections::HashMap;

use crate::topk::{most_common, RankedEntry};

/// 模式宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternWidth {
    Two,
    Four,
}

impl PatternWidth {
    pub fn bytes(self) -> usize {
        match self {
            PatternWidth::Two => 2,
            PatternWidth::Four => 4,
        }
    }

    /// 渲染所需的十六进制位数
    pub fn hex_digits(self) -> usize { self.bytes() * 2 }
}

/// 大端打包后的窗口值（带宽度，便于定宽渲染）。
/// 同一结果列表中宽度一致，故排序等价于按数值排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    pub width: PatternWidth,
    pub value: u32,
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$x}", self.value, width = self.width.hex_digits())
    }
}

pub type PatternCount = RankedEntry<PatternKey>;

impl Serialize for PatternCount {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = s.serialize_struct("PatternCount", 2)?;
        st.serialize_field("pattern", &self.key.to_string())?;
        st.serialize_field("count", &self.count)?;
        st.end()
    }
}

impl std::fmt::Display for PatternCount {
    /// 渲染为 `0001 (count: 3)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (count: {})", self.key, self.count)
    }
}

/// 将至多 4 字节的窗口按大端打包为整数
pub fn pack_window(window: &[u8]) -> u32 {
    debug_assert!(window.len() <= 4);
    window.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

/// 按给定宽度将打包值还原为字节序列
pub fn unpack_window(value: u32, width: PatternWidth) -> Vec<u8> {
    let be = value.to_be_bytes();
    be[4 - width.bytes()..].to_vec()
}

/// 统计所有重叠窗口并返回出现最多的 k 个；缓冲区短于窗口宽度时为空
pub fn top_patterns(buf: &[u8], width: PatternWidth, k: usize) -> Vec<PatternCount> {
    let w = width.bytes();
    if buf.len() < w {
        return Vec::new();
    }
    let mut counts: HashMap<u32, u64> = HashMap::new();
    for win in buf.windows(w) {
        *counts.entry(pack_window(win)).or_insert(0) += 1;
    }
    most_common(
        counts.into_iter().map(|(value, count)| (PatternKey { width, value }, count)),
        k,
    )
}
