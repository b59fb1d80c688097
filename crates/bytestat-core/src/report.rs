//! 输出端：控制台文本、JSON 数组、CSV
//!
//! 统计记录只定义字段与语义；渲染约定集中在这里：
//! - 截断统计量渲染为十六进制（`0x7f`、`-0x3`）；
//! - 字节排行 `0x41 (count: 3)`，模式排行 `0001 (count: 3)`；
//! - 缺失值：文本为 `None`，CSV 为空单元格，JSON 为 `null`。
use anyhow::Result;
use std::io::Write;

use crate::record::StatisticsRecord;

/// 记录写出端（按输入顺序逐条调用 `write_record`）
pub trait RecordSink {
    fn begin(&mut self) -> Result<()> { Ok(()) }
    /// `index` 为记录在本次输出中的 0 起序号
    fn write_record(&mut self, index: usize, record: &StatisticsRecord) -> Result<()>;
    fn finish(&mut self) -> Result<()> { Ok(()) }
}

/// 单元格取值
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    List(Vec<String>),
    Missing,
}

/// 有符号整数的十六进制渲染（负数带前导 `-`）
pub fn hex_value(v: i64) -> String {
    if v < 0 { format!("-{:#x}", v.unsigned_abs()) } else { format!("{:#x}", v) }
}

fn opt_f64(v: Option<f64>) -> Cell {
    v.map_or(Cell::Missing, |x| Cell::Text(x.to_string()))
}

fn list<T: ToString>(items: &[T]) -> Cell {
    Cell::List(items.iter().map(ToString::to_string).collect())
}

/// 输出列序（文本键名、CSV 表头、`record_cells` 共用）
pub const RECORD_COLUMNS: [&str; 25] = [
    "filename",
    "file_type",
    "total_bytes",
    "nonzero_bytes",
    "unique_bytes",
    "most_common_bytes",
    "least_common_bytes",
    "mean_byte_value",
    "median_byte_value",
    "std_dev_byte_value",
    "skewness",
    "kurtosis",
    "mean_rate_of_change",
    "median_rate_of_change",
    "std_dev_rate_of_change",
    "entropy",
    "ngram_entropy",
    "max_run_length",
    "avg_run_length",
    "common_2byte_patterns",
    "common_4byte_patterns",
    "autocorrelation",
    "even_bytes",
    "odd_bytes",
    "even_odd_ratio",
];

/// 按 `RECORD_COLUMNS` 的列序展开一条记录
pub fn record_cells(r: &StatisticsRecord) -> Vec<(&'static str, Cell)> {
    let text = |s: String| Cell::Text(s);
    let values: [Cell; 25] = [
        text(r.filename.clone()),
        text(r.file_type.clone()),
        text(r.total_bytes.to_string()),
        text(r.nonzero_bytes.to_string()),
        text(r.unique_bytes.to_string()),
        list(&r.most_common_bytes),
        list(&r.least_common_bytes),
        text(hex_value(r.mean_byte_value)),
        text(hex_value(r.median_byte_value)),
        text(hex_value(r.std_dev_byte_value)),
        opt_f64(r.skewness),
        opt_f64(r.kurtosis),
        text(hex_value(r.mean_rate_of_change)),
        text(hex_value(r.median_rate_of_change)),
        text(hex_value(r.std_dev_rate_of_change)),
        text(r.entropy.to_string()),
        text(r.ngram_entropy.to_string()),
        text(r.max_run_length.to_string()),
        text(r.avg_run_length.to_string()),
        list(&r.common_2byte_patterns),
        list(&r.common_4byte_patterns),
        Cell::List(
            r.autocorrelation
                .iter()
                .map(|v| v.map_or_else(|| "None".to_string(), |x| x.to_string()))
                .collect(),
        ),
        text(r.even_bytes.to_string()),
        text(r.odd_bytes.to_string()),
        opt_f64(r.even_odd_ratio),
    ];
    RECORD_COLUMNS.into_iter().zip(values).collect()
}

/// CSV：表头 + 每记录一行；列表字段以 `, ` 拼接在同一单元格
pub struct CsvSink<W: Write> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self { Self { out } }
}

/// RFC 4180 转义：含逗号、引号或换行时整体加引号，内部引号加倍
fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn begin(&mut self) -> Result<()> {
        writeln!(self.out, "{}", RECORD_COLUMNS.join(","))?;
        Ok(())
    }

    fn write_record(&mut self, _index: usize, record: &StatisticsRecord) -> Result<()> {
        let row: Vec<String> = record_cells(record)
            .into_iter()
            .map(|(_, cell)| match cell {
                Cell::Text(s) => csv_escape(&s),
                Cell::List(items) => csv_escape(&items.join(", ")),
                Cell::Missing => String::new(),
            })
            .collect();
        writeln!(self.out, "{}", row.join(","))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// 同时写往多个输出端
pub struct MultiSink<'a> {
    sinks: Vec<Box<dyn RecordSink + 'a>>,
}

impl<'a> MultiSink<'a> {
    pub fn new(sinks: Vec<Box<dyn RecordSink + 'a>>) -> Self { Self { sinks } }
}

impl RecordSink for MultiSink<'_> {
    fn begin(&mut self) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|s| s.begin())
    }

    fn write_record(&mut self, index: usize, record: &StatisticsRecord) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|s| s.write_record(index, record))
    }

    fn finish(&mut self) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|s| s.finish())
    }
}
