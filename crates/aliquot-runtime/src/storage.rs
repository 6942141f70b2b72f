//! File-backed implementations of [`MaskStore`] and [`FactorStore`].
//!
//! Formats:
//! - mask file: one `true`/`false` token per line, line `i` (0-based) holding
//!   the primality of `i`; the covered limit is `lines - 1`
//! - factor file: a JSON object `{"n": {"prime": exponent, ...}, ...}`
//!
//! A missing file is a cold start. Anything else that does not parse cleanly
//! is an error: partial state is never returned. A loaded mask must agree
//! with the sieve at every index. Writes go to a sibling temp
//! file that is then renamed over the target.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use aliquot_core::error::StoreError;
use aliquot_core::traits::{FactorStore, MaskStore};
use aliquot_core::types::Factorization;
use aliquot_engine::PrimeSieve;
use tracing::debug;

/// Read `path`, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write through `fill` into a temp file, then rename it over `path`.
fn write_replace(
    path: &Path,
    fill: impl FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    let file = fs::File::create(&tmp).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    fill(&mut writer).map_err(io_err)?;
    writer
        .into_inner()
        .map_err(|e| io_err(e.into_error()))?
        .sync_all()
        .map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

/// Primality mask stored as text, one boolean per line.
#[derive(Debug, Clone)]
pub struct MaskFile {
    path: PathBuf,
}

impl MaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, text: &str) -> Result<Vec<bool>, StoreError> {
        let mut mask = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let token = line.trim();
            let value = if token.eq_ignore_ascii_case("true") {
                true
            } else if token.eq_ignore_ascii_case("false") {
                false
            } else {
                return Err(StoreError::InvalidToken {
                    path: self.path.clone(),
                    line: i + 1,
                    token: token.to_string(),
                });
            };
            mask.push(value);
        }

        if mask.is_empty() {
            return Err(StoreError::CorruptMask {
                path: self.path.clone(),
                reason: "file has no entries".to_string(),
            });
        }
        if mask.iter().take(2).any(|&prime| prime) {
            return Err(StoreError::CorruptMask {
                path: self.path.clone(),
                reason: "0 and 1 are marked prime".to_string(),
            });
        }
        if let Some(i) = PrimeSieve::first_mismatch(&mask) {
            return Err(StoreError::CorruptMask {
                path: self.path.clone(),
                reason: format!("line {} has the wrong primality for {i}", i + 1),
            });
        }
        Ok(mask)
    }
}

impl MaskStore for MaskFile {
    fn load(&self) -> Result<Option<Vec<bool>>, StoreError> {
        let Some(text) = read_optional(&self.path)? else {
            debug!(path = %self.path.display(), "no mask file, starting cold");
            return Ok(None);
        };
        let mask = self.parse(&text)?;
        debug!(path = %self.path.display(), limit = mask.len() - 1, "loaded mask");
        Ok(Some(mask))
    }

    fn save(&self, mask: &[bool]) -> Result<(), StoreError> {
        write_replace(&self.path, |w| {
            for &prime in mask {
                writeln!(w, "{prime}")?;
            }
            Ok(())
        })?;
        debug!(path = %self.path.display(), entries = mask.len(), "saved mask");
        Ok(())
    }
}

/// Factorization cache prefix stored as a JSON object.
#[derive(Debug, Clone)]
pub struct FactorFile {
    path: PathBuf,
}

impl FactorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reject entries that do not describe their key exactly.
    fn check_entry(&self, n: u64, factors: &Factorization) -> Result<(), StoreError> {
        let fail = |reason: String| StoreError::InvalidEntry {
            path: self.path.clone(),
            n,
            reason,
        };
        if let Some((p, e)) = factors.iter().find(|&(p, e)| p < 2 || e == 0) {
            return Err(fail(format!("bad prime power {p}^{e}")));
        }
        match factors.value() {
            Some(v) if v == n as u128 => Ok(()),
            Some(v) => Err(fail(format!("factors multiply to {v}"))),
            None => Err(fail("factors overflow".to_string())),
        }
    }
}

impl FactorStore for FactorFile {
    fn load(&self) -> Result<BTreeMap<u64, Factorization>, StoreError> {
        let Some(text) = read_optional(&self.path)? else {
            debug!(path = %self.path.display(), "no factor cache file, starting cold");
            return Ok(BTreeMap::new());
        };
        let entries: BTreeMap<u64, Factorization> =
            serde_json::from_str(&text).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        for (&n, factors) in &entries {
            self.check_entry(n, factors)?;
        }
        debug!(path = %self.path.display(), entries = entries.len(), "loaded factor cache");
        Ok(entries)
    }

    fn save(&self, entries: &BTreeMap<u64, Factorization>) -> Result<(), StoreError> {
        write_replace(&self.path, |w| {
            serde_json::to_writer(&mut *w, entries).map_err(io::Error::from)?;
            writeln!(w)
        })?;
        debug!(path = %self.path.display(), entries = entries.len(), "saved factor cache");
        Ok(())
    }
}
