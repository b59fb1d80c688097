//! 字节统计核心库
//!
//! 设计要点：
//! - 统计引擎（frequency/topk/runs/patterns/entropy/moments/autocorr/parity/record）是纯函数：
//!   输入字节切片与文件名，输出一条 `StatisticsRecord`，不做任何 I/O。
//! - 任意缓冲区（含空、1 字节、不足 4 字节）的每个统计量都有确定取值：数值、None 或空列表，
//!   不会泄漏 NaN/inf。
//! - 外围（inputs/scan/report/config）负责收集文件、并行调度、按稳定顺序输出。

mod autocorr;
mod config;
mod entropy;
mod error;
mod frequency;
mod inputs;
mod moments;
mod options;
mod parity;
mod patterns;
mod record;
mod report;
mod runs;
mod scan;
mod topk;

pub use autocorr::{autocorrelation, lag_correlation, DEFAULT_MAX_LAG, MAX_LAG_LIMIT};
pub use config::{load_config, parse_config, validate, ConfigFile};
pub use entropy::{ngram_entropy, shannon_entropy};
pub use error::{ConfigError, InputError};
pub use frequency::{ByteCount, FrequencyTable};
pub use inputs::{collect_inputs, CollectedInputs};
pub use moments::{byte_moments, rate_of_change, ByteMoments, TruncatedSummary};
pub use options::{AnalysisOptions, ScanOptions, ScanStats};
pub use parity::{even_odd, EvenOdd};
pub use patterns::{pack_window, top_patterns, unpack_window, PatternCount, PatternKey, PatternWidth};
pub use record::{analyze, analyze_with, file_type_label, StatisticsRecord};
pub use report::{hex_value, record_cells, Cell, RECORD_COLUMNS, CsvSink, JsonSink, MultiSink, RecordSink, TextSink};
pub use runs::{run_lengths, RunLengths};
pub use scan::{analyze_file, scan_and_write};
pub use topk::{least_common, most_common, RankedEntry};
