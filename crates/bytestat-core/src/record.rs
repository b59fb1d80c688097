//! 单文件统计记录与组装
use serde::Serialize;

use crate::autocorr::autocorrelation;
use crate::entropy::{ngram_entropy, shannon_entropy};
use crate::frequency::{ByteCount, FrequencyTable};
use crate::moments::{byte_moments, rate_of_change};
use crate::options::AnalysisOptions;
use crate::parity::even_odd;
use crate::patterns::{top_patterns, PatternCount, PatternWidth};
use crate::runs::run_lengths;

/// 每个文件一条，构建后不再修改；字段顺序即输出顺序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsRecord {
    // 文件信息
    pub filename: String,
    pub file_type: String,

    // 字节出现次数
    pub total_bytes: u64,
    pub nonzero_bytes: u64,
    pub unique_bytes: usize,
    pub most_common_bytes: Vec<ByteCount>,
    pub least_common_bytes: Vec<ByteCount>,

    // 字节值统计（均值/中位数/标准差为截断整数）
    pub mean_byte_value: i64,
    pub median_byte_value: i64,
    pub std_dev_byte_value: i64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,

    // 一阶差分
    pub mean_rate_of_change: i64,
    pub median_rate_of_change: i64,
    pub std_dev_rate_of_change: i64,

    // 分布与模式
    pub entropy: f64,
    pub ngram_entropy: f64,
    pub max_run_length: usize,
    pub avg_run_length: f64,
    pub common_2byte_patterns: Vec<PatternCount>,
    pub common_4byte_patterns: Vec<PatternCount>,
    pub autocorrelation: Vec<Option<f64>>,

    // 奇偶分布
    pub even_bytes: u64,
    pub odd_bytes: u64,
    pub even_odd_ratio: Option<f64>,
}

/// 按默认口径分析一个缓冲区
pub fn analyze(buf: &[u8], filename: &str) -> StatisticsRecord {
    analyze_with(buf, filename, &AnalysisOptions::default())
}

/// 纯函数：不做 I/O，任意长度（含空）的缓冲区都有确定结果
pub fn analyze_with(buf: &[u8], filename: &str, opts: &AnalysisOptions) -> StatisticsRecord {
    let table = FrequencyTable::from_bytes(buf);
    let moments = byte_moments(&table);
    let roc = rate_of_change(buf);
    let runs = run_lengths(buf);
    let parity = even_odd(&table);

    StatisticsRecord {
        filename: filename.to_string(),
        file_type: file_type_label(filename).to_string(),

        total_bytes: table.total(),
        nonzero_bytes: table.nonzero(),
        unique_bytes: table.unique(),
        most_common_bytes: table.most_common(opts.top_k),
        least_common_bytes: table.least_common(opts.top_k),

        mean_byte_value: moments.summary.mean,
        median_byte_value: moments.summary.median,
        std_dev_byte_value: moments.summary.std_dev,
        skewness: moments.skewness,
        kurtosis: moments.kurtosis,

        mean_rate_of_change: roc.mean,
        median_rate_of_change: roc.median,
        std_dev_rate_of_change: roc.std_dev,

        entropy: shannon_entropy(&table),
        ngram_entropy: ngram_entropy(buf, opts.ngram_order),
        max_run_length: runs.max_run_length,
        avg_run_length: runs.avg_run_length,
        common_2byte_patterns: top_patterns(buf, PatternWidth::Two, opts.top_k),
        common_4byte_patterns: top_patterns(buf, PatternWidth::Four, opts.top_k),
        autocorrelation: autocorrelation(buf, opts.max_lag),

        even_bytes: parity.even,
        odd_bytes: parity.odd,
        even_odd_ratio: parity.ratio,
    }
}

/// 文件扩展名（含点）；无扩展名时为空串。
/// 隐藏文件的前导点不算扩展名：`.bashrc` → ``，`a.tar.gz` → `.gz`。
pub fn file_type_label(filename: &str) -> &str {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem_start = base.len() - base.trim_start_matches('.').len();
    match base[stem_start..].rfind('.') {
        Some(i) => &base[stem_start + i..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topk::RankedEntry;

    #[test]
    fn empty_buffer_record() {
        let r = analyze(&[], "empty.bin");
        assert_eq!(r.file_type, ".bin");
        assert_eq!(r.total_bytes, 0);
        assert_eq!(r.unique_bytes, 0);
        assert_eq!(r.entropy, 0.0);
        assert_eq!(r.ngram_entropy, 0.0);
        assert_eq!(r.max_run_length, 0);
        assert_eq!(r.avg_run_length, 0.0);
        assert!(r.least_common_bytes.is_empty());
        assert!(r.common_2byte_patterns.is_empty());
        assert!(r.common_4byte_patterns.is_empty());
        assert_eq!(r.autocorrelation, vec![None; 10]);
        assert_eq!(r.even_odd_ratio, None);
        assert_eq!((r.mean_rate_of_change, r.median_rate_of_change, r.std_dev_rate_of_change), (0, 0, 0));
        assert_eq!((r.mean_byte_value, r.median_byte_value, r.std_dev_byte_value), (0, 0, 0));
        assert_eq!(r.skewness, None);
    }

    #[test]
    fn identical_bytes_record() {
        let n = 40usize;
        let r = analyze(&vec![0x41; n], "same.txt");
        assert_eq!(r.unique_bytes, 1);
        assert_eq!(r.max_run_length, n);
        assert_eq!(r.avg_run_length, n as f64);
        assert_eq!(r.entropy, 0.0);
        assert_eq!(r.std_dev_byte_value, 0);
        assert!(r.autocorrelation.iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn alternating_pair_record() {
        let r = analyze(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x01], "alt");
        assert_eq!(r.file_type, "");
        assert_eq!(r.unique_bytes, 2);
        assert_eq!(r.nonzero_bytes, 3);
        assert_eq!(&r.most_common_bytes[..2], &[RankedEntry { key: 0, count: 3 }, RankedEntry { key: 1, count: 3 }]);
        assert!((r.entropy - 1.0).abs() < 1e-12);
        assert_eq!((r.even_bytes, r.odd_bytes), (3, 3));
        assert_eq!(r.even_odd_ratio, Some(1.0));
        assert_eq!(r.max_run_length, 1);
    }

    #[test]
    fn single_byte_record() {
        let r = analyze(&[0x10], "one");
        assert!(r.common_2byte_patterns.is_empty());
        assert!(r.common_4byte_patterns.is_empty());
        assert_eq!((r.mean_rate_of_change, r.median_rate_of_change, r.std_dev_rate_of_change), (0, 0, 0));
        assert!(r.autocorrelation.iter().all(Option::is_none));
    }

    #[test]
    fn analysis_is_idempotent() {
        let buf: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        assert_eq!(analyze(&buf, "x.dat"), analyze(&buf, "x.dat"));
    }

    #[test]
    fn options_shape_the_record() {
        let opts = AnalysisOptions { top_k: 1, ngram_order: 2, max_lag: 3 };
        let r = analyze_with(b"abcabcabc", "t", &opts);
        assert_eq!(r.most_common_bytes.len(), 1);
        assert_eq!(r.common_2byte_patterns.len(), 1);
        assert_eq!(r.autocorrelation.len(), 3);
    }

    #[test]
    fn huge_options_do_not_panic() {
        let opts = AnalysisOptions { top_k: usize::MAX, ngram_order: usize::MAX, max_lag: usize::MAX };
        let r = analyze_with(b"ab", "x", &opts);
        assert_eq!(r.autocorrelation.len(), crate::autocorr::MAX_LAG_LIMIT);
        assert_eq!(r.most_common_bytes.len(), 256);
        assert_eq!(r.least_common_bytes.len(), 2);
        assert_eq!(r.ngram_entropy, 0.0);
    }

    #[test]
    fn serializes_with_hex_keys() {
        let r = analyze(&[0xab, 0xcd], "p.bin");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["common_2byte_patterns"][0]["pattern"], "abcd");
        assert_eq!(v["most_common_bytes"][0]["byte"], "0xab");
        // 两个字节都是奇数
        assert_eq!(v["even_odd_ratio"], 0.0);
        assert!(v["autocorrelation"][1].is_null());
        assert!(analyze(&[2], "q")
            .even_odd_ratio
            .is_none());
    }

    #[test]
    fn file_type_labels() {
        assert_eq!(file_type_label("a.tar.gz"), ".gz");
        assert_eq!(file_type_label(".bashrc"), "");
        assert_eq!(file_type_label("..foo"), "");
        assert_eq!(file_type_label(".config.toml"), ".toml");
        assert_eq!(file_type_label("noext"), "");
        assert_eq!(file_type_label("trailing."), ".");
        assert_eq!(file_type_label("dir.d/readme"), "");
    }
}
