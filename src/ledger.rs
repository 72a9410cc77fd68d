use crate::app_dirs::AppDirs;
use itertools::Itertools;
use log::{debug, warn};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How many entries the leaderboard keeps
pub const LEDGER_CAPACITY: usize = 3;

/// Token between a player's name and their score on each persisted line
pub const SEPARATOR: &str = "       ----------->";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("score ledger i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Backing storage for the leaderboard text
pub trait LedgerStore {
    /// Returns the whole ledger, or an empty string when nothing was written yet.
    fn read(&self) -> io::Result<String>;
    fn write(&self, contents: &str) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::scores_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for FileLedgerStore {
    fn read(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)
    }
}

/// In-memory store, handy for hosts that do not persist and for tests
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    contents: RefCell<String>,
}

impl MemoryLedgerStore {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(contents.into()),
        }
    }

    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn read(&self) -> io::Result<String> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        *self.contents.borrow_mut() = contents.to_string();
        Ok(())
    }
}

/// Removes a leading `"<digits>."` rank and the whitespace after it.
pub fn strip_rank_prefix(name: &str) -> &str {
    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return name;
    }
    match name[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => name,
    }
}

/// Parses `"<rank>. <name><SEPARATOR><score>"`. Returns `None` for malformed lines.
///
/// Splits on the last separator: the score never contains one, a name might.
pub fn parse_line(line: &str) -> Option<ScoreEntry> {
    let (name, score) = line.rsplit_once(SEPARATOR)?;
    let score = score.parse::<u32>().ok()?;
    Some(ScoreEntry::new(strip_rank_prefix(name), score))
}

pub fn format_line(rank: usize, entry: &ScoreEntry) -> String {
    format!("{rank}. {}{SEPARATOR}{}", entry.name, entry.score)
}

pub fn load<S: LedgerStore + ?Sized>(store: &S) -> Result<Vec<ScoreEntry>, LedgerError> {
    let contents = store.read()?;
    let entries = contents
        .lines()
        .filter_map(|line| {
            let entry = parse_line(line);
            if entry.is_none() {
                debug!("skipping malformed ledger line {line:?}");
            }
            entry
        })
        .collect();
    Ok(entries)
}

/// Rewrites the whole ledger with 1-based ranks.
pub fn save<S: LedgerStore + ?Sized>(store: &S, entries: &[ScoreEntry]) -> Result<(), LedgerError> {
    let mut contents = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format_line(i + 1, entry))
        .join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    store.write(&contents).map_err(|e| {
        warn!("could not write score ledger: {e}");
        LedgerError::from(e)
    })
}

/// Merges a new score into the leaderboard and persists the top entries.
pub fn record<S: LedgerStore + ?Sized>(
    store: &S,
    player_name: &str,
    score: u32,
) -> Result<Vec<ScoreEntry>, LedgerError> {
    let mut entries = load(store)?;
    let name = strip_rank_prefix(player_name).replace(['\r', '\n'], " ");
    entries.push(ScoreEntry::new(name, score));

    // stable: earlier entries win ties
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(LEDGER_CAPACITY);

    save(store, &entries)?;
    debug!("ledger now holds {} entries", entries.len());
    Ok(entries)
}
