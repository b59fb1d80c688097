//! 扫描主流程与并行调度
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

use crate::options::{AnalysisOptions, ScanOptions, ScanStats};
use crate::record::{analyze_with, StatisticsRecord};
use crate::report::RecordSink;

/// 单个文件的处理结果
#[derive(Debug)]
pub(crate) enum FileOutcome {
    Analyzed(Box<StatisticsRecord>),
    /// 超过大小上限
    Skipped,
    /// 元数据或读取失败
    Failed,
}

/// 整读一个文件并分析；记录中的文件名取路径的最后一段
pub fn analyze_file(path: &Path, opts: &AnalysisOptions) -> Result<StatisticsRecord> {
    let buf = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let label = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(analyze_with(&buf, &label, opts))
}

fn process_file(path: &Path, opts: &ScanOptions) -> FileOutcome {
    if let Some(max) = opts.max_file_size {
        match std::fs::metadata(path) {
            Ok(md) if md.len() > max => {
                warn!(path = %path.display(), size = md.len(), max, "file exceeds size limit, skipped");
                return FileOutcome::Skipped;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "metadata failed");
                return FileOutcome::Failed;
            }
        }
    }
    let started = Instant::now();
    match analyze_file(path, &opts.analysis) {
        Ok(rec) => {
            debug!(path = %path.display(), bytes = rec.total_bytes, elapsed = ?started.elapsed(), "analyzed");
            FileOutcome::Analyzed(Box::new(rec))
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to analyze file");
            FileOutcome::Failed
        }
    }
}

/// 按输入顺序把处理结果交给输出端并累计统计
fn emit(outcome: FileOutcome, sink: &mut dyn RecordSink, stats: &mut ScanStats) -> Result<()> {
    match outcome {
        FileOutcome::Analyzed(rec) => {
            stats.files_analyzed += 1;
            sink.write_record(stats.records_written, &rec)?;
            stats.records_written += 1;
        }
        FileOutcome::Skipped => stats.files_skipped += 1,
        FileOutcome::Failed => stats.files_failed += 1,
    }
    Ok(())
}

/// 分析给定文件列表并逐条写入 `sink`
/// 稳定性保证：输出顺序与 `files` 顺序一致，与线程数无关
pub fn scan_and_write(files: &[PathBuf], sink: &mut dyn RecordSink, opts: &ScanOptions) -> Result<ScanStats> {
    let mut stats = ScanStats::default();
    sink.begin()?;

    // 决策：线程数>1 且文件不止一个时走并行调度；否则串行
    let threads = opts.threads.unwrap_or_else(num_cpus::get).max(1);
    if threads > 1 && files.len() > 1 {
        scan_parallel(files, sink, opts, &mut stats, threads)?;
    } else {
        for path in files {
            emit(process_file(path, opts), sink, &mut stats)?;
        }
    }

    sink.finish()?;
    Ok(stats)
}

/// 并行调度：
/// - Rayon 线程池并行分析
/// - 单线程 Writer 按 idx 重排后写出，保证稳定顺序
fn scan_parallel(
    files: &[PathBuf],
    sink: &mut dyn RecordSink,
    opts: &ScanOptions,
    stats: &mut ScanStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("build rayon pool")?;

    // 通道用于 worker → writer 传递结果；有界以限制内存中的待写记录
    let (tx, rx) = channel::bounded::<(usize, FileOutcome)>(256);

    // rx 随闭包返回而释放：Writer 出错提前返回时，worker 的 send 立即失败而不会阻塞
    std::thread::scope(move |scope| -> Result<()> {
        scope.spawn(move || {
            pool.install(|| {
                files.par_iter().enumerate().for_each_with(tx, |tx, (idx, path)| {
                    let _ = tx.send((idx, process_file(path, opts)));
                });
            });
            // 结束后 Sender 全部被丢弃，Receiver 将收到关闭信号
        });

        // Writer：维护 next_idx 与缓存，按序输出
        let mut next_idx = 0usize;
        let mut pending: BTreeMap<usize, FileOutcome> = BTreeMap::new();
        while let Ok((idx, outcome)) = rx.recv() {
            pending.insert(idx, outcome);
            while let Some(outcome) = pending.remove(&next_idx) {
                emit(outcome, sink, stats)?;
                next_idx += 1;
            }
        }
        Ok(())
    })
}
