//! Flat-file persistence for a [`RecordStore`].
//!
//! The file is line oriented: three `#` comment lines, then one
//! `key|score|name` line per record in store order. Loading is tolerant:
//! lines that cannot become a valid record are skipped and reported in the
//! [`LoadReport`] instead of failing the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::StoreError;
use crate::record::{check_bounds, Record};
use crate::store::RecordStore;

pub const SEPARATOR: char = '|';
pub const COMMENT_MARKER: char = '#';

const FILE_MARKER: &str = "# Student Record System Data File";
const FORMAT_NOTE: &str = "# Format: roll|marks|name";

// ==============================================================================
// Load Report
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The line is not `key|score|name` with integer key and score.
    Malformed,
    /// The fields parsed but are outside the record bounds.
    InvalidData,
    /// An earlier line in the same file already used this roll number.
    DuplicateKey,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed"),
            Self::InvalidData => write!(f, "invalid data"),
            Self::DuplicateKey => write!(f, "duplicate roll number"),
        }
    }
}

/// A line skipped during load. Line numbers are 1-based and count comment
/// and blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIssue {
    pub line: usize,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<LineIssue>,
}

// ==============================================================================
// File operations
// ==============================================================================

/// Write every record of `store` to `path`, replacing the file.
///
/// On success the path becomes the store's last-used path and the store is
/// marked clean. On failure neither is touched.
pub fn save(store: &mut RecordStore, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, store.records())
        .and_then(|()| writer.flush())
        .map_err(|e| StoreError::io(path, e))?;

    store.mark_persisted(path);
    tracing::debug!(path = %path.display(), records = store.len(), "saved record store");
    Ok(())
}

/// Save to the path the store was last saved to or loaded from.
pub fn quick_save(store: &mut RecordStore) -> Result<(), StoreError> {
    let path = store
        .last_path()
        .map(Path::to_path_buf)
        .ok_or(StoreError::NoLastPath)?;
    save(store, path)
}

/// Replace the contents of `store` with the records read from `path`.
///
/// The file is read into a fresh store that replaces `store` only once the
/// whole file has been read, so any I/O error leaves `store` untouched.
/// On success, unsaved in-memory changes are discarded.
pub fn load(store: &mut RecordStore, path: impl AsRef<Path>) -> Result<LoadReport, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;

    let mut loaded = RecordStore::new();
    let report = read_into(BufReader::new(file), path, &mut loaded)?;
    loaded.mark_persisted(path);
    *store = loaded;

    tracing::debug!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "loaded record store"
    );
    Ok(report)
}

// ==============================================================================
// Encoding
// ==============================================================================

pub fn write_records<W: Write>(mut writer: W, records: &[Record]) -> std::io::Result<()> {
    writeln!(writer, "{FILE_MARKER}")?;
    writeln!(writer, "{FORMAT_NOTE}")?;
    writeln!(writer, "{COMMENT_MARKER} Total records: {}", records.len())?;
    for record in records {
        writeln!(
            writer,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            record.key, record.score, record.name
        )?;
    }
    Ok(())
}

/// Append the records read from `reader` to `store`, skipping and reporting
/// lines that do not yield a new valid record. `source` names the input in
/// errors and log output.
pub fn read_into<R: BufRead>(
    reader: R,
    source: &Path,
    store: &mut RecordStore,
) -> Result<LoadReport, StoreError> {
    let mut report = LoadReport::default();

    for (idx, chunk) in reader.split(b'\n').enumerate() {
        let line_num = idx + 1;
        let raw = chunk.map_err(|e| StoreError::io(source, e))?;
        let bytes = raw.strip_suffix(b"\r").unwrap_or(raw.as_slice());
        let line = String::from_utf8_lossy(bytes);

        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let (key, score, name) = match parse_fields(&line) {
            Ok(fields) => fields,
            Err((kind, message)) => {
                skip(&mut report, source, line_num, kind, message);
                continue;
            }
        };

        match store.insert(Record::new(key, name, score)?) {
            Ok(()) => report.loaded += 1,
            Err(StoreError::DuplicateKey(key)) => skip(
                &mut report,
                source,
                line_num,
                IssueKind::DuplicateKey,
                format!("roll number {key} already loaded"),
            ),
            Err(other) => return Err(other),
        }
    }

    Ok(report)
}

/// Split a data line into bounded key, score and trimmed name. Only the
/// first two separators count; later ones belong to the name.
fn parse_fields(line: &str) -> Result<(u32, u8, &str), (IssueKind, String)> {
    let missing = || (IssueKind::Malformed, "expected key|score|name".to_string());
    let (key_field, rest) = line.split_once(SEPARATOR).ok_or_else(missing)?;
    let (score_field, name_field) = rest.split_once(SEPARATOR).ok_or_else(missing)?;

    let key = parse_int(key_field, "roll number")?;
    let score = parse_int(score_field, "score")?;
    let (key, score) =
        check_bounds(key, score).map_err(|e| (IssueKind::InvalidData, e.to_string()))?;

    Ok((key, score, name_field.trim()))
}

fn parse_int(field: &str, what: &str) -> Result<i64, (IssueKind, String)> {
    let field = field.trim();
    field.parse().map_err(|_| {
        (
            IssueKind::Malformed,
            format!("{what} `{field}` is not an integer"),
        )
    })
}

fn skip(report: &mut LoadReport, source: &Path, line: usize, kind: IssueKind, message: String) {
    tracing::warn!(
        path = %source.display(),
        line,
        %kind,
        "{message}; line skipped"
    );
    report.skipped.push(LineIssue {
        line,
        kind,
        message,
    });
}
