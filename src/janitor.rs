use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;
use log::{debug, warn};
use tracing::debug_span;

use crate::{
    errors::{Error, Result},
    vars::{MAX_AGE_DAYS, PRESERVED_FILE, TEMP_DIRS},
};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A file seen during a scan. Built fresh on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub age_days: f64,
    pub path: PathBuf,
}

impl FileRecord {
    // 文件在列出之后、读取元数据之前被删除时返回 None
    fn inspect(path: PathBuf, now: DateTime<Utc>) -> Result<Option<Self>> {
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("File vanished before inspection: {}", path.display());
                return Ok(None);
            }
            Err(source) => return Err(Error::Stat { path, source }),
        };
        let modified: DateTime<Utc> = match metadata.modified() {
            Ok(time) => time.into(),
            Err(source) => return Err(Error::Stat { path, source }),
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let age_days = (now - modified).num_milliseconds() as f64 / MILLIS_PER_DAY;

        Ok(Some(FileRecord {
            name,
            size: metadata.len(),
            modified,
            age_days,
            path,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    // 试运行，文件保留在磁盘上
    Retained,
    Deleted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Stale(Removal),
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub record: FileRecord,
    pub verdict: Verdict,
}

/// A directory that could not be listed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unreadable {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DirSweep {
    pub dir: PathBuf,
    pub entries: Vec<Entry>,
    pub unreadable: Vec<Unreadable>,
}

/// Running counters for a single sweep.
///
/// `stale_*` counts every file classified as expired, whether or not its
/// deletion succeeded; `failed_files` is the subset whose deletion failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_files: usize,
    pub total_bytes: u64,
    pub stale_files: usize,
    pub stale_bytes: u64,
    pub failed_files: usize,
}

impl Totals {
    fn add(&mut self, entry: &Entry) {
        self.total_files += 1;
        self.total_bytes += entry.record.size;
        if let Verdict::Stale(removal) = &entry.verdict {
            self.stale_files += 1;
            self.stale_bytes += entry.record.size;
            if matches!(removal, Removal::Failed(_)) {
                self.failed_files += 1;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sweep {
    pub dry_run: bool,
    pub expiration: TimeDelta,
    pub dirs: Vec<DirSweep>,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub struct DirListing {
    pub dir: PathBuf,
    // 按年龄降序（最旧的在前）
    pub records: Vec<FileRecord>,
    pub unreadable: Vec<Unreadable>,
}

#[derive(Debug, Clone)]
pub struct Inventory {
    pub dirs: Vec<DirListing>,
    pub total_files: usize,
    pub total_bytes: u64,
}

// 会修改或列出磁盘内容的文件系统调用，测试中可替换
#[derive(Clone, Copy)]
struct FsOps {
    read_dir: fn(&Path) -> io::Result<fs::ReadDir>,
    remove_file: fn(&Path) -> io::Result<()>,
}

impl std::fmt::Debug for FsOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsOps").finish_non_exhaustive()
    }
}

impl Default for FsOps {
    fn default() -> Self {
        FsOps {
            read_dir: |path| fs::read_dir(path),
            remove_file: |path| fs::remove_file(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Janitor {
    // 过期时长
    pub expiration: TimeDelta,
    // 按顺序扫描的目录
    pub dirs: Vec<PathBuf>,
    ops: FsOps,
}

impl Janitor {
    pub fn new(expiration: TimeDelta, dirs: Vec<PathBuf>) -> Self {
        Janitor {
            expiration,
            dirs,
            ops: FsOps::default(),
        }
    }

    /// The project's scratch directories with the default retention.
    pub fn for_project(root: &Path) -> Self {
        let dirs = TEMP_DIRS
            .iter()
            .map(|parts| {
                parts
                    .iter()
                    .fold(root.to_path_buf(), |dir, part| dir.join(part))
            })
            .collect();

        Self::new(TimeDelta::days(MAX_AGE_DAYS), dirs)
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.expiration
    }

    /// Walks every existing directory, classifying each file against the
    /// cutoff. Expired files are deleted as they are found unless `dry_run`
    /// is set. `README.md` files are never visited. Directories that cannot
    /// be listed are logged, recorded and skipped.
    pub fn sweep(&self, dry_run: bool, now: DateTime<Utc>) -> Result<Sweep> {
        let cutoff = self.cutoff(now);
        let mut totals = Totals::default();
        let mut dirs = Vec::new();

        for dir in self.existing_dirs() {
            let _span = debug_span!("sweep", dir = %dir.display()).entered();
            let mut entries = Vec::new();
            let mut unreadable = Vec::new();
            self.walk(dir, now, false, &mut unreadable, &mut |record: FileRecord| {
                let verdict = if record.modified < cutoff {
                    Verdict::Stale(if dry_run {
                        Removal::Retained
                    } else {
                        self.remove(&record.path)
                    })
                } else {
                    Verdict::Keep
                };
                let entry = Entry { record, verdict };
                totals.add(&entry);
                entries.push(entry);
            })?;

            dirs.push(DirSweep {
                dir: dir.clone(),
                entries,
                unreadable,
            });
        }

        Ok(Sweep {
            dry_run,
            expiration: self.expiration,
            dirs,
            totals,
        })
    }

    /// Lists every file in the existing directories, `README.md` included.
    /// Never touches the filesystem beyond reading it.
    pub fn inventory(&self, now: DateTime<Utc>) -> Result<Inventory> {
        let mut dirs = Vec::new();
        let mut total_files = 0;
        let mut total_bytes = 0;

        for dir in self.existing_dirs() {
            let _span = debug_span!("inventory", dir = %dir.display()).entered();
            let mut records = Vec::new();
            let mut unreadable = Vec::new();
            self.walk(dir, now, true, &mut unreadable, &mut |record: FileRecord| {
                records.push(record)
            })?;

            total_files += records.len();
            total_bytes += records.iter().map(|record| record.size).sum::<u64>();
            dirs.push(DirListing {
                dir: dir.clone(),
                records: records
                    .into_iter()
                    .sorted_by_key(|record| record.modified)
                    .collect(),
                unreadable,
            });
        }

        Ok(Inventory {
            dirs,
            total_files,
            total_bytes,
        })
    }

    fn existing_dirs(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter().filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                debug!("Skipping missing directory: {}", dir.display());
            }

            exists
        })
    }

    fn walk<F>(
        &self,
        dir: &Path,
        now: DateTime<Utc>,
        include_preserved: bool,
        unreadable: &mut Vec<Unreadable>,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(FileRecord),
    {
        let mut skip = |e: io::Error| {
            warn!("Skipping unreadable directory {}: {e}", dir.display());
            unreadable.push(Unreadable {
                path: dir.to_path_buf(),
                message: e.to_string(),
            });
        };

        let entries = match (self.ops.read_dir)(dir) {
            Ok(entries) => entries,
            Err(e) => {
                skip(e);
                return Ok(());
            }
        };

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    skip(e);
                    continue;
                }
            };
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| Error::Stat {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                // 不跟随目录符号链接
                subdirs.push(path);
            } else if path.is_file() {
                if !include_preserved && path.file_name() == Some(OsStr::new(PRESERVED_FILE)) {
                    continue;
                }
                if let Some(record) = FileRecord::inspect(path, now)? {
                    visit(record);
                }
            }
        }

        // 递归扫描子目录
        for subdir in subdirs {
            self.walk(&subdir, now, include_preserved, unreadable, visit)?;
        }

        Ok(())
    }

    fn remove(&self, path: &Path) -> Removal {
        match (self.ops.remove_file)(path) {
            Ok(()) => {
                debug!("Deleted expired file: {}", path.display());
                Removal::Deleted
            }
            Err(e) => {
                warn!("Failed to delete file {}: {e}", path.display());
                Removal::Failed(e.to_string())
            }
        }
    }
}
