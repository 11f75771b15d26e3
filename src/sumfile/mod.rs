mod error;

pub use error::E;
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Component, Path, PathBuf},
};

/// One line of a sum file: hex digest and the path relative to the root, always with `/` as
/// separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRecord {
    pub digest: String,
    pub path: String,
}

impl DigestRecord {
    pub fn new<D: Into<String>, P: Into<String>>(digest: D, path: P) -> Self {
        Self {
            digest: digest.into(),
            path: path.into(),
        }
    }

    /// Joins the record's path to `root` segment by segment.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for DigestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.digest, self.path)
    }
}

/// Path of `path` relative to `root`, joined with `/` regardless of the host's separator.
///
/// Fails with `E::NotUnicode` if any component isn't valid UTF-8, since such a name could not be
/// read back from the sum file.
pub fn relative_path(root: &Path, path: &Path) -> Result<String, E> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| E::NotUnderRoot(path.to_path_buf()))?;
    Ok(relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| E::NotUnicode(path.to_path_buf()))
        })
        .collect::<Result<Vec<&str>, E>>()?
        .join("/"))
}

/// Renders records as `"<digest> <path>\n"` lines.
pub fn render(records: &[DigestRecord]) -> String {
    records
        .iter()
        .map(|record| format!("{record}\n"))
        .collect()
}

/// Writes records to `path`, replacing whatever was there.
pub fn write(path: &Path, records: &[DigestRecord]) -> Result<(), E> {
    let bind = |err: io::Error| E::IO(path.to_path_buf(), err);
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(bind)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{record}").map_err(bind)?;
    }
    writer.flush().map_err(bind)
}

/// Reads all records of the sum file at `path`.
pub fn read(path: &Path) -> Result<Vec<DigestRecord>, E> {
    let file = File::open(path).map_err(|err| E::IO(path.to_path_buf(), err))?;
    parse(BufReader::new(file)).map_err(|err| match err {
        E::IO(_, err) => E::IO(path.to_path_buf(), err),
        err => err,
    })
}

/// Parses records line by line. Blank lines are skipped.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<DigestRecord>, E> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| E::IO(PathBuf::new(), err))?;
        if let Some(record) = parse_line(idx + 1, &line)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Parses one line; `line_no` is 1-based and only used in errors. The line is split on the
/// first space and everything after it is the path as written, so paths may contain spaces,
/// including leading and trailing ones. Returns `None` for a blank line.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<DigestRecord>, E> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let line = line.strip_suffix('\r').unwrap_or(line).trim_start();
    let malformed = || E::Parse {
        line: line_no,
        content: line.to_owned(),
    };
    let (digest, path) = line.split_once(' ').ok_or_else(malformed)?;
    if digest.is_empty() || path.is_empty() {
        return Err(malformed());
    }
    if Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(E::OutsideOfRoot {
            line: line_no,
            path: path.to_owned(),
        });
    }
    Ok(Some(DigestRecord::new(digest, path)))
}
