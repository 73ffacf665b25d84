use crate::executor::RunOutcome;
use anyhow::{Context, Result};
use chrono::Utc;
use pathbench_core::{ensure_dir, RunSpec};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RunLogger {
    dirs: BTreeSet<PathBuf>,
}

impl RunLogger {
    pub fn prepare(specs: &[RunSpec]) -> Result<Self> {
        let dirs = specs
            .iter()
            .flat_map(|spec| std::iter::once(spec.log_path()).chain(spec.results_path()))
            .filter_map(Path::parent)
            .map(Path::to_path_buf)
            .collect::<BTreeSet<_>>();
        for dir in &dirs {
            ensure_dir(dir).with_context(|| format!("creating output dir {}", dir.display()))?;
        }
        Ok(Self { dirs })
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn write(&self, spec: &RunSpec, outcome: &RunOutcome) -> Result<()> {
        let mut bytes = Vec::with_capacity(outcome.stdout.len() + outcome.diagnostics.len());
        bytes.extend_from_slice(outcome.stdout.as_bytes());
        bytes.extend_from_slice(outcome.diagnostics.as_bytes());
        atomic_write_bytes(spec.log_path(), &bytes)
            .with_context(|| format!("writing log {}", spec.log_path().display()))
    }
}

fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let ts = Utc::now().timestamp_micros();
    let pid = std::process::id();
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("tmpfile");
    let tmp = path.with_file_name(format!(".{}.tmp.{}.{}", name, pid, ts));
    let mut file = fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
