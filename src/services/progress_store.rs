//! 进度记录服务 - 业务能力层
//!
//! 只追加的课程 ID 文件：每行一个 ID，没有表头。

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ProgressError;
use crate::models::CourseId;

/// 已处理课程的持久化记录
///
/// 读取时去重，写入时不去重：同一个 ID 可能在多次运行中重复追加。
/// 文件只增不减，没有删除或改写操作。
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取所有已处理的课程 ID
    ///
    /// 文件不存在时返回空集合；空行和无法识别的行直接跳过。
    pub fn read_all(&self) -> Result<HashSet<CourseId>, ProgressError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("进度文件不存在: {}", self.path.display());
                return Ok(HashSet::new());
            }
            Err(source) => {
                return Err(ProgressError::ReadFailed {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let ids: HashSet<CourseId> = content.lines().filter_map(parse_record).collect();
        info!("📄 已读取 {} 个已处理的课程 ID", ids.len());
        Ok(ids)
    }

    /// 追加新处理完成的课程 ID
    ///
    /// 集合为空时不做任何 I/O。只追加，不会改写已提交的记录。
    pub fn append_new(&self, ids: &HashSet<CourseId>) -> Result<(), ProgressError> {
        if ids.is_empty() {
            return Ok(());
        }

        let write_failed = |source: std::io::Error| ProgressError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(write_failed)?;

        // 上一条记录缺少换行时先补上，避免新 ID 接在旧记录后面
        if needs_line_break(&mut file).map_err(write_failed)? {
            file.write_all(b"\n").map_err(write_failed)?;
        }

        let mut sorted: Vec<&CourseId> = ids.iter().collect();
        sorted.sort();
        for id in sorted {
            file.write_all(format!("{}\n", id).as_bytes())
                .map_err(write_failed)?;
        }
        file.sync_all().map_err(write_failed)?;

        debug!("已追加 {} 条记录到 {}", ids.len(), self.path.display());
        Ok(())
    }
}

/// 文件非空且最后一个字节不是换行
fn needs_line_break(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// 取一行的第一列作为课程 ID
fn parse_record(line: &str) -> Option<CourseId> {
    let field = line.split(',').next()?.trim().trim_matches('"').trim();
    if field.is_empty() {
        None
    } else {
        Some(CourseId::from(field))
    }
}
