//! 字节频次直方图（256 桶）
use serde::Serialize;

use crate::topk::{least_common, most_common, RankedEntry};

/// 字节频次表：固定 256 个桶，未出现的字节计数为 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
    unique: usize,
    nonzero: u64,
}

impl FrequencyTable {
    /// 单次遍历构建直方图，同时统计非零字节位置数
    pub fn from_bytes(buf: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &b in buf {
            counts[b as usize] += 1;
        }
        let unique = counts.iter().filter(|&&c| c > 0).count();
        // 非零位置数 = 总长度 - 0x00 的出现次数
        let total = buf.len() as u64;
        let nonzero = total - counts[0];
        Self { counts, total, unique, nonzero }
    }

    pub fn counts(&self) -> &[u64; 256] { &self.counts }

    pub fn count(&self, byte: u8) -> u64 { self.counts[byte as usize] }

    /// 总字节数（等于缓冲区长度）
    pub fn total(&self) -> u64 { self.total }

    /// 出现过的不同字节值个数
    pub fn unique(&self) -> usize { self.unique }

    /// 值不为 0x00 的字节位置数
    pub fn nonzero(&self) -> u64 { self.nonzero }

    /// 出现次数最多的 k 个字节（可能包含计数为 0 的桶）
    pub fn most_common(&self, k: usize) -> Vec<ByteCount> {
        most_common(self.entries(), k)
    }

    /// 出现次数最少的 k 个字节（仅限计数非零的桶）
    pub fn least_common(&self, k: usize) -> Vec<ByteCount> {
        least_common(self.entries(), k)
    }

    fn entries(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().enumerate().map(|(b, &c)| (b as u8, c))
    }
}

/// 字节值与计数
pub type ByteCount = RankedEntry<u8>;

impl Serialize for ByteCount {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = s.serialize_struct("ByteCount", 2)?;
        st.serialize_field("byte", &format!("{:#x}", self.key))?;
        st.serialize_field("count", &self.count)?;
        st.end()
    }
}

impl std::fmt::Display for ByteCount {
    /// 渲染为 `0x41 (count: 3)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x} (count: {})", self.key, self.count)
    }
}
