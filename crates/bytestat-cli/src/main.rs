use anyhow::{bail, Context, Result};
use bytestat_core::{
    collect_inputs, load_config, scan_and_write, validate, CsvSink, JsonSink, MultiSink, RecordSink, ScanOptions,
    TextSink,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// `--generate-csv` 的固定输出文件
const CSV_REPORT: &str = "byte_stats.csv";

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "bytestat", version, about = "Analyze files for byte-level statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 分析文件/目录并输出每个文件的统计记录
    Analyze {
        /// 待分析的文件
        #[arg(short = 'f', long = "files", num_args = 1..)]
        files: Vec<PathBuf>,

        /// 待分析的目录（非递归，只取第一层文件）
        #[arg(short = 'd', long = "dirs", num_args = 1..)]
        dirs: Vec<PathBuf>,

        /// 输出格式
        #[arg(long, default_value = "text", value_parser = ["text", "json", "csv"])]
        format: String,

        /// 输出文件；缺省写到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 额外在当前目录生成 byte_stats.csv
        #[arg(long)]
        generate_csv: bool,

        /// 线程数（"auto"=CPU 核心数，或正整数）
        #[arg(long, default_value = "auto", value_parser = parse_threads)]
        threads: Threads,

        /// 最大分析文件大小（单位字节），超过则跳过
        #[arg(long)]
        max_file_size: Option<u64>,

        /// 配置文件路径（TOML）
        #[arg(long)]
        config: Option<PathBuf>,

        /// 排行条目数（默认 3）
        #[arg(long)]
        top_k: Option<usize>,

        /// 自相关最大滞后（默认 10）
        #[arg(long)]
        max_lag: Option<usize>,

        /// n-gram 熵的阶数（默认 3）
        #[arg(long)]
        ngram_order: Option<usize>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            files,
            dirs,
            format,
            output,
            generate_csv,
            threads,
            max_file_size,
            config,
            top_k,
            max_lag,
            ngram_order,
        } => {
            // 配置文件先叠加，命令行参数最后覆盖
            let mut opts = match &config {
                Some(path) => load_config(path)?.apply(ScanOptions::default())?,
                None => ScanOptions::default(),
            };
            if let Threads::Fixed(n) = threads { opts.threads = Some(n); }
            if max_file_size.is_some() { opts.max_file_size = max_file_size; }
            if let Some(v) = top_k { opts.analysis.top_k = v; }
            if let Some(v) = max_lag { opts.analysis.max_lag = v; }
            if let Some(v) = ngram_order { opts.analysis.ngram_order = v; }
            validate(&opts.analysis)?;

            let inputs = collect_inputs(&files, &dirs);
            for err in &inputs.errors {
                error!("{err}");
            }
            if inputs.files.is_empty() {
                bail!("No valid files provided");
            }
            info!(files = inputs.files.len(), ?output, %format, "starting analysis");

            let out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("create output file {}", path.display()))?,
                )),
                None => Box::new(BufWriter::new(std::io::stdout().lock())),
            };
            let mut sinks: Vec<Box<dyn RecordSink>> = vec![primary_sink(&format, out)];
            if generate_csv {
                sinks.push(csv_file_sink(Path::new(CSV_REPORT))?);
            }
            let mut sink = MultiSink::new(sinks);

            let stats = scan_and_write(&inputs.files, &mut sink, &opts).context("analysis failed")?;
            if generate_csv {
                info!("statistics saved to '{CSV_REPORT}'");
            }
            info!(
                files_analyzed = stats.files_analyzed,
                files_skipped = stats.files_skipped,
                files_failed = stats.files_failed,
                records_written = stats.records_written,
                "analysis finished"
            );
        }
    }

    Ok(())
}

fn primary_sink(format: &str, out: Box<dyn Write>) -> Box<dyn RecordSink> {
    match format {
        "json" => Box::new(JsonSink::new(out)),
        "csv" => Box::new(CsvSink::new(out)),
        _ => Box::new(TextSink::new(out)),
    }
}

fn csv_file_sink(path: &Path) -> Result<Box<dyn RecordSink>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(Box::new(CsvSink::new(BufWriter::new(file))))
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，stdout 只留报告本身
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// `--threads` 取值；`Auto` 不覆盖配置文件中的设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Threads {
    Auto,
    Fixed(usize),
}

/// 解析线程参数："auto" 或 >= 1 的整数，其余取值直接报错
fn parse_threads(s: &str) -> Result<Threads, String> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(Threads::Auto);
    }
    match s.parse::<usize>() {
        Ok(0) => Err("thread count must be at least 1".to_string()),
        Ok(n) => Ok(Threads::Fixed(n)),
        Err(_) => Err(format!("expected \"auto\" or a positive integer, got '{s}'")),
    }
}
