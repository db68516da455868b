use std::{fs::File, io::{BufWriter, Write}, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;

/// Write-then-rename wrapper for atomic outputs.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temp file next to `target`. Refuses to clobber an existing file
    /// unless `force` is set.
    pub(crate) fn open(target: &Path, force: bool) -> Result<Self> {
        if target == Path::new("-") { bail!("[io::write] stdout is not supported as an output path"); }

        let parent = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent)
            .with_context(|| format!("[io::write] Failed to create directory {}", parent.display()))?;
        if !force && target.exists() {
            bail!("[io::write] Refusing to overwrite existing file: {} (use --force)", target.display());
        }

        let tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("[io::write] Failed to create temp file in {}", parent.display()))?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush, fsync and atomically rename onto the target.
    pub(crate) fn finalize(self) -> Result<()> {
        self.tmp.as_file().sync_all().ok(); // best-effort fsync file
        self.tmp.persist(&self.target)
            .with_context(|| format!("[io::write] Failed to rename onto {}", self.target.display()))?;
        if let Some(dir) = self.target.parent().filter(|p| !p.as_os_str().is_empty()) {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Serialize `value` as JSON to `path` atomically.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T, force: bool) -> Result<()> {
    let mut sink = PendingWrite::open(path, force)?;
    {
        let mut writer = BufWriter::new(&mut sink);
        serde_json::to_writer(&mut writer, value)
            .with_context(|| format!("[io::write] Failed to serialize JSON to {}", path.display()))?;
        writer.flush()
            .with_context(|| format!("[io::write] Failed to write {}", path.display()))?;
    }
    sink.finalize()
}
