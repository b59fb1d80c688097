//! 输入收集：显式文件 + 目录（非递归）
use std::path::PathBuf;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::InputError;

/// 收集结果：有效文件（已排序去重）与被拒绝的输入
#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub files: Vec<PathBuf>,
    pub errors: Vec<InputError>,
}

/// 收集待分析文件
/// - 显式文件必须是普通文件；
/// - 每个目录只取第一层的普通文件（深度为 1）；
/// - 单个无效输入只记录，不中断收集；
/// - 结果按路径排序并去重，保证输出顺序可复现。
pub fn collect_inputs(files: &[PathBuf], dirs: &[PathBuf]) -> CollectedInputs {
    let mut out = CollectedInputs::default();

    for f in files {
        if f.is_file() {
            out.files.push(f.clone());
        } else {
            warn!(path = %f.display(), "not a valid file");
            out.errors.push(InputError::NotAFile(f.clone()));
        }
    }

    for d in dirs {
        if !d.is_dir() {
            warn!(path = %d.display(), "not a valid directory");
            out.errors.push(InputError::NotADirectory(d.clone()));
            continue;
        }
        let before = out.files.len();
        for entry in WalkDir::new(d).min_depth(1).max_depth(1) {
            match entry {
                // Path::is_file 会跟随符号链接，与显式文件的判定一致
                Ok(e) if e.path().is_file() => out.files.push(e.into_path()),
                Ok(_) => {}
                Err(err) => {
                    warn!(path = %d.display(), error = %err, "failed to list directory entry");
                    out.errors.push(InputError::Unreadable { path: d.clone(), message: err.to_string() });
                }
            }
        }
        if out.files.len() == before {
            warn!(path = %d.display(), "directory does not contain any files");
        }
    }

    out.files.sort();
    out.files.dedup();
    out
}
