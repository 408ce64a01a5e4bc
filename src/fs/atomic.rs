//! PixelShield 原子写入工具。
//!
//! 提供「先写临时文件，成功后再替换目标文件」的写出语义，
//! 避免写入失败或进程崩溃时留下一个看起来合法的半截容器 / 图片。

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 原子写文件。
///
/// 流程：
/// 1. 在目标目录创建临时文件；
/// 2. 调用 `write_fn` 写入完整内容；
/// 3. fsync 后使用 rename 替换目标文件。
///
/// 任一步骤失败都会删除临时文件，目标文件保持原状。
pub fn write_atomic<F>(target: &Path, write_fn: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent)?;

    let tmp_path = build_tmp_path(parent, target.file_name());
    let mut tmp_file = File::create(&tmp_path)?;

    let result = write_fn(&mut tmp_file)
        .and_then(|()| tmp_file.flush())
        .and_then(|()| tmp_file.sync_all());

    drop(tmp_file);

    if let Err(err) = result.and_then(|()| fs::rename(&tmp_path, target)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    Ok(())
}

/// 原子写入完整字节缓冲区。
pub fn write_bytes_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    write_atomic(target, |file| file.write_all(bytes))
}

fn build_tmp_path(parent: &Path, file_name: Option<&std::ffi::OsStr>) -> PathBuf {
    let base_name = file_name
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("pixelshield-output");

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);

    parent.join(format!(
        ".{base_name}.tmp-{}-{timestamp}-{counter}",
        std::process::id()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn replaces_existing_target() {
        let dir = tempdir().expect("create temp dir");
        let target = dir.path().join("out.bin");
        fs::write(&target, b"old").expect("seed target");

        write_bytes_atomic(&target, b"new contents").expect("atomic write");

        assert_eq!(fs::read(&target).expect("read target"), b"new contents");
    }

    #[test]
    fn failed_write_leaves_no_files() {
        let dir = tempdir().expect("create temp dir");
        let target = dir.path().join("out.bin");

        let result = write_atomic(&target, |file| {
            file.write_all(b"partial")?;
            Err(io::Error::other("boom"))
        });

        assert!(result.is_err());
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 0);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().expect("create temp dir");
        let target = dir.path().join("a/b/out.bin");

        write_bytes_atomic(&target, b"x").expect("atomic write");

        assert_eq!(fs::read(&target).expect("read target"), b"x");
    }
}
