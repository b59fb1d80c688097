//! 配置文件加载（TOML）
//!
//! 所有字段可选；缺省项沿用 `ScanOptions::default()`。命令行参数在此之后覆盖。
use serde::Deserialize;
use std::path::Path;

use crate::autocorr::MAX_LAG_LIMIT;
use crate::error::ConfigError;
use crate::options::{AnalysisOptions, ScanOptions};

/// `[analysis]` 段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalysisSection {
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    ngram_order: Option<usize>,
    #[serde(default)]
    max_lag: Option<usize>,
}

/// `[scan]` 段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScanSection {
    #[serde(default)]
    max_file_size: Option<u64>,
    #[serde(default)]
    threads: Option<usize>,
}

/// 顶层配置文件结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    analysis: AnalysisSection,
    #[serde(default)]
    scan: ScanSection,
}

impl ConfigFile {
    /// 将文件中的设置叠加到 `base` 上并校验
    pub fn apply(&self, mut base: ScanOptions) -> Result<ScanOptions, ConfigError> {
        let a = &self.analysis;
        if let Some(v) = a.top_k { base.analysis.top_k = v; }
        if let Some(v) = a.ngram_order { base.analysis.ngram_order = v; }
        if let Some(v) = a.max_lag { base.analysis.max_lag = v; }
        if let Some(v) = self.scan.max_file_size { base.max_file_size = Some(v); }
        if let Some(v) = self.scan.threads {
            if v == 0 {
                return Err(ConfigError::Invalid { field: "threads", reason: "must be at least 1".into() });
            }
            base.threads = Some(v);
        }
        validate(&base.analysis)?;
        Ok(base)
    }
}

/// 分析参数必须全部 >= 1，且 max_lag 不超过 `MAX_LAG_LIMIT`
pub fn validate(opts: &AnalysisOptions) -> Result<(), ConfigError> {
    let checks = [
        ("top_k", opts.top_k),
        ("ngram_order", opts.ngram_order),
        ("max_lag", opts.max_lag),
    ];
    for (field, v) in checks {
        if v == 0 {
            return Err(ConfigError::Invalid { field, reason: "must be at least 1".into() });
        }
    }
    if opts.max_lag > MAX_LAG_LIMIT {
        return Err(ConfigError::Invalid {
            field: "max_lag",
            reason: format!("must not exceed {MAX_LAG_LIMIT}"),
        });
    }
    Ok(())
}

/// 解析 TOML 文本（`path` 仅用于错误信息）
pub fn parse_config(txt: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str(txt).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// 从磁盘加载配置文件
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let txt = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let cfg = parse_config(&txt, path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(txt: &str) -> Result<ConfigFile, ConfigError> {
        parse_config(txt, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let opts = parse("").unwrap().apply(ScanOptions::default()).unwrap();
        assert_eq!(opts.analysis, AnalysisOptions::default());
        assert_eq!(opts.max_file_size, None);
        assert_eq!(opts.threads, None);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = parse(
            "[analysis]\ntop_k = 5\nmax_lag = 4\n\n[scan]\nmax_file_size = 1024\nthreads = 2\n",
        )
        .unwrap();
        let opts = cfg.apply(ScanOptions::default()).unwrap();
        assert_eq!(opts.analysis.top_k, 5);
        assert_eq!(opts.analysis.ngram_order, 3);
        assert_eq!(opts.analysis.max_lag, 4);
        assert_eq!(opts.max_file_size, Some(1024));
        assert_eq!(opts.threads, Some(2));
    }

    #[test]
    fn zero_values_are_rejected() {
        let err = parse("[analysis]\nngram_order = 0\n").unwrap().apply(ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ngram_order", .. }));

        let err = parse("[scan]\nthreads = 0\n").unwrap().apply(ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "threads", .. }));
    }

    #[test]
    fn oversized_max_lag_is_rejected() {
        let txt = format!("[analysis]\nmax_lag = {}\n", MAX_LAG_LIMIT + 1);
        let err = parse(&txt).unwrap().apply(ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_lag", .. }));

        let at_limit = AnalysisOptions { max_lag: MAX_LAG_LIMIT, ..Default::default() };
        assert!(validate(&at_limit).is_ok());
        let huge = AnalysisOptions { max_lag: usize::MAX, ..Default::default() };
        assert!(validate(&huge).is_err());
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        assert!(matches!(parse("[analysis]\ntopk = 3\n"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
