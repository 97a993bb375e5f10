// Declarative field-position tables for /proc pseudo-files.
// Kernel layout drift is fixed here and nowhere else.

use super::CollectError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One integer token, taken by whitespace-separated position (0-based).
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub position: usize,
}

/// A pseudo-file below the proc root and the positions decoded from its content line.
#[derive(Debug, Clone, Copy)]
pub struct ProcSource<const N: usize> {
    pub file: &'static str,
    /// Discard one heading line before the content line.
    pub skip_header: bool,
    pub fields: [Field; N],
}

/// `/proc/self/stat`: pid comm state ppid pgrp session tty_nr tpgid flags minflt cminflt
/// majflt cmajflt utime stime cutime cstime ...
pub const PROCESS_STAT: ProcSource<4> = ProcSource {
    file: "self/stat",
    skip_header: false,
    fields: [
        Field { name: "minflt", position: 9 },
        Field { name: "majflt", position: 11 },
        Field { name: "utime", position: 13 },
        Field { name: "stime", position: 14 },
    ],
};

/// `/proc/self/statm`: size resident shared trs drs lrs dt, all in pages.
pub const PROCESS_STATM: ProcSource<4> = ProcSource {
    file: "self/statm",
    skip_header: false,
    fields: [
        Field { name: "resident", position: 1 },
        Field { name: "trs", position: 3 },
        Field { name: "drs", position: 4 },
        Field { name: "lrs", position: 5 },
    ],
};

/// Legacy `/proc/meminfo` table: a heading line, then `Mem: total used free shared buffers cached`
/// in bytes.
pub const MEMINFO: ProcSource<5> = ProcSource {
    file: "meminfo",
    skip_header: true,
    fields: [
        Field { name: "total", position: 1 },
        Field { name: "used", position: 2 },
        Field { name: "free", position: 3 },
        Field { name: "buffers", position: 5 },
        Field { name: "cached", position: 6 },
    ],
};

/// Keys read from the `Key: value kB` meminfo layout of current kernels.
pub const MEMINFO_KEYS: [&str; 4] = ["MemTotal", "MemFree", "Buffers", "Cached"];

impl<const N: usize> ProcSource<N> {
    pub fn path(&self, proc_root: &Path) -> PathBuf {
        proc_root.join(self.file)
    }

    /// Opens the file, reads the content line and decodes every field.
    /// The file is closed before returning, on success and failure alike.
    pub fn read(&self, proc_root: &Path) -> Result<[i64; N], CollectError> {
        let path = self.path(proc_root);
        let line = {
            let file = File::open(&path).map_err(|source| CollectError::Io {
                path: path.clone(),
                source,
            })?;
            let mut reader = BufReader::new(file);
            if self.skip_header {
                read_line(&mut reader, &path)?;
            }
            read_line(&mut reader, &path)?
        };
        self.decode(&path, &line)
    }

    pub fn decode(&self, path: &Path, line: &str) -> Result<[i64; N], CollectError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut values = [0i64; N];
        for (slot, field) in values.iter_mut().zip(self.fields.iter()) {
            let token = tokens
                .get(field.position)
                .ok_or_else(|| CollectError::MissingField {
                    path: path.to_path_buf(),
                    position: field.position,
                })?;
            *slot = token
                .parse::<i64>()
                .map_err(|source| CollectError::InvalidField {
                    path: path.to_path_buf(),
                    position: field.position,
                    token: (*token).to_string(),
                    source,
                })?;
        }
        Ok(values)
    }
}

fn read_line(reader: &mut impl BufRead, path: &Path) -> Result<String, CollectError> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .map_err(|source| CollectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if n == 0 {
        return Err(CollectError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(line)
}

/// Decodes `Key: value kB` lines for `keys`, in bytes. Every key must be present.
pub fn decode_keyed<const N: usize>(
    path: &Path,
    content: &str,
    keys: [&str; N],
) -> Result<[i64; N], CollectError> {
    let mut values = [None; N];
    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(idx) = keys.iter().position(|k| *k == key.trim()) else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        let token = parts.next().unwrap_or_default();
        let value = token
            .parse::<i64>()
            .map_err(|source| CollectError::InvalidField {
                path: path.to_path_buf(),
                position: idx,
                token: token.to_string(),
                source,
            })?;
        let scale = match parts.next() {
            Some("kB") => 1024,
            _ => 1,
        };
        values[idx] = Some(value.saturating_mul(scale));
    }
    let mut out = [0i64; N];
    for (idx, (slot, value)) in out.iter_mut().zip(values).enumerate() {
        *slot = value.ok_or_else(|| CollectError::MissingField {
            path: path.to_path_buf(),
            position: idx,
        })?;
    }
    Ok(out)
}
