use crate::{
    collector::{self, FileEntry},
    hasher::Algorithm,
    sumfile::{self, DigestRecord},
    walker::{self, Options, Walker},
    E,
};
use log::{info, warn};
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Outcome of hashing a tree with one algorithm.
#[derive(Debug)]
pub struct HashReport {
    pub algorithm: Algorithm,
    /// Location of the written sum file.
    pub sum_file: PathBuf,
    /// Number of records written.
    pub files: usize,
    /// Files which couldn't be hashed (only possible with a tolerant `Tolerance`).
    pub failed: Vec<(String, walker::E)>,
    pub elapsed: Duration,
}

/// Outcome of verifying a tree against one sum file.
#[derive(Debug)]
pub struct VerifyReport {
    pub algorithm: Algorithm,
    /// Number of records compared.
    pub total: usize,
    /// Relative paths whose current digest differs from the recorded one.
    pub mismatched: Vec<String>,
    /// Files which couldn't be hashed (only possible with a tolerant `Tolerance`).
    pub failed: Vec<(String, walker::E)>,
    pub elapsed: Duration,
}

impl VerifyReport {
    pub fn matched(&self) -> usize {
        self.total - self.mismatched.len() - self.failed.len()
    }
}

/// Per-algorithm reports of one run in the order algorithms were requested.
#[derive(Debug)]
pub struct Summary<R> {
    pub reports: Vec<R>,
    pub elapsed: Duration,
}

impl Summary<HashReport> {
    pub fn failed(&self) -> usize {
        self.reports.iter().map(|r| r.failed.len()).sum()
    }
}

impl Summary<VerifyReport> {
    pub fn failed(&self) -> usize {
        self.reports.iter().map(|r| r.failed.len()).sum()
    }

    pub fn mismatched(&self) -> usize {
        self.reports.iter().map(|r| r.mismatched.len()).sum()
    }
}

/// Hashes every file under `root` with each of `algorithms` and writes `<algorithm>sum.txt`
/// into `root` per algorithm.
///
/// The tree is collected once and shared between algorithms; algorithms are processed one after
/// another and each pass is completed before its sum file is written. Sum files of this tool
/// lying directly in `root` are not recorded.
pub fn hash(root: &Path, algorithms: &[Algorithm], opt: &Options) -> Result<Summary<HashReport>, E> {
    let now = Instant::now();
    let walker = opt.walker()?;
    let files = without_sum_files(collector::collect(
        root,
        &walker.breaker(),
        walker.tolerance(),
        walker.threads(),
    )?);
    hash_entries(root, files, algorithms, &walker, now)
}

/// Hashes already collected `files` and writes a sum file per algorithm. Nothing is written
/// before every relative path has been rendered.
pub(crate) fn hash_entries(
    root: &Path,
    files: Vec<FileEntry>,
    algorithms: &[Algorithm],
    walker: &Walker,
    now: Instant,
) -> Result<Summary<HashReport>, E> {
    let relatives = files
        .iter()
        .map(|file| sumfile::relative_path(root, &file.path))
        .collect::<Result<Vec<String>, sumfile::E>>()?;
    let paths: Vec<PathBuf> = files.into_iter().map(|file| file.path).collect();
    let total = paths.len();
    let mut reports = Vec::new();
    for algorithm in algorithms.iter().copied() {
        let started = Instant::now();
        let results = walker.hash(paths.clone(), algorithm)?;
        let mut records: Vec<DigestRecord> = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for (i, (relative, result)) in relatives.iter().zip(results).enumerate() {
            match result {
                Ok(digest) => {
                    if walker.is_verbose() {
                        info!("{algorithm} [{},{total}]: {relative}, result: {digest}", i + 1);
                    }
                    records.push(DigestRecord::new(digest, relative.as_str()));
                }
                Err(err) => failed.push((relative.clone(), err)),
            }
        }
        let sum_file = root.join(algorithm.sum_file_name());
        sumfile::write(&sum_file, &records)?;
        let elapsed = started.elapsed();
        info!(
            "{algorithm}: {} files, {:.3} seconds",
            records.len(),
            elapsed.as_secs_f64()
        );
        if !failed.is_empty() {
            warn!("{algorithm}: {} files couldn't be hashed", failed.len());
        }
        reports.push(HashReport {
            algorithm,
            sum_file,
            files: records.len(),
            failed,
            elapsed,
        });
    }
    let elapsed = now.elapsed();
    info!("All files hashed, {:.3} seconds", elapsed.as_secs_f64());
    Ok(Summary { reports, elapsed })
}

/// Recomputes digests of the files listed in `<algorithm>sum.txt` of `root` for each of
/// `algorithms` and compares them (case-sensitively) with the recorded ones.
///
/// A mismatch is a finding, not an error: it's logged and counted in the report.
pub fn verify(
    root: &Path,
    algorithms: &[Algorithm],
    opt: &Options,
) -> Result<Summary<VerifyReport>, E> {
    let now = Instant::now();
    let walker = opt.walker()?;
    let mut reports = Vec::new();
    for algorithm in algorithms.iter().copied() {
        let started = Instant::now();
        let records = sumfile::read(&root.join(algorithm.sum_file_name()))?;
        let paths: Vec<PathBuf> = records.iter().map(|r| r.resolve(root)).collect();
        let results = walker.hash(paths, algorithm)?;
        let mut mismatched = Vec::new();
        let mut failed = Vec::new();
        for (i, (record, result)) in records.iter().zip(results).enumerate() {
            match result {
                Ok(digest) if digest == record.digest => {
                    if walker.is_verbose() {
                        info!("[Matched] {algorithm} [{}]: {}", i + 1, record.path);
                    }
                }
                Ok(_) => {
                    warn!("[Not Matched] {algorithm} [{}]: {}", i + 1, record.path);
                    mismatched.push(record.path.clone());
                }
                Err(err) => failed.push((record.path.clone(), err)),
            }
        }
        let elapsed = started.elapsed();
        info!(
            "{algorithm}: {} files, {:.3} seconds, UnMatched count: {}",
            records.len(),
            elapsed.as_secs_f64(),
            mismatched.len()
        );
        if !failed.is_empty() {
            warn!("{algorithm}: {} files couldn't be hashed", failed.len());
        }
        reports.push(VerifyReport {
            algorithm,
            total: records.len(),
            mismatched,
            failed,
            elapsed,
        });
    }
    let elapsed = now.elapsed();
    info!("All files verified, {:.3} seconds", elapsed.as_secs_f64());
    Ok(Summary { reports, elapsed })
}

fn without_sum_files(files: Vec<FileEntry>) -> Vec<FileEntry> {
    let sum_files: Vec<String> = Algorithm::ALL.iter().map(|a| a.sum_file_name()).collect();
    files
        .into_iter()
        .filter(|file| {
            file.depth != 0
                || !file
                    .path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| sum_files.iter().any(|sum_file| sum_file == name))
        })
        .collect()
}
