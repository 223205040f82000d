//! File-backed persistence for canonical-identifier-keyed tables
//!
//! Tables are stored as JSON objects keyed by the lossless hex encoding of
//! the identifier pair (see [`CanonicalId::encode_key`]), one file per
//! (board size, player symbol) pair under `<root>/<n>x<n>/`.

use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{board::Player, canonical::CanonicalId, config::BoardConfig};

/// Path of a persisted table: `<root>/<n>x<n>/<stem>_<symbol>.json`
pub fn table_path(root: &Path, config: BoardConfig, stem: &str, player: Player) -> PathBuf {
    root.join(format!("{0}x{0}", config.size()))
        .join(format!("{}_{}.json", stem, player.symbol()))
}

/// Save a table, creating parent directories as needed.
///
/// Keys are written in sorted order so output is stable across runs.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_table<V: Serialize>(
    path: &Path,
    table: &HashMap<CanonicalId, V>,
) -> Result<(), crate::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| crate::Error::Io {
            operation: format!("create directory {}", parent.display()),
            source,
        })?;
    }

    let encoded: BTreeMap<String, &V> = table
        .iter()
        .map(|(id, value)| (id.encode_key(), value))
        .collect();

    let file = File::create(path).map_err(|source| crate::Error::Io {
        operation: format!("create file {}", path.display()),
        source,
    })?;
    serde_json::to_writer(BufWriter::new(file), &encoded)?;

    Ok(())
}

/// Load a table saved by [`save_table`].
///
/// # Errors
///
/// Returns [`crate::Error::CacheLoad`] for a missing, unreadable, or
/// corrupt file. Callers recover by starting from an empty table.
pub fn load_table<V: DeserializeOwned>(path: &Path) -> Result<HashMap<CanonicalId, V>, crate::Error> {
    let cache_load = |message: String| crate::Error::CacheLoad {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| cache_load(e.to_string()))?;
    let encoded: BTreeMap<String, V> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| cache_load(e.to_string()))?;

    let mut table = HashMap::with_capacity(encoded.len());
    for (key, value) in encoded {
        let id = CanonicalId::parse_key(&key).map_err(|e| cache_load(e.to_string()))?;
        table.insert(id, value);
    }

    Ok(table)
}
