//! Access-token persistence across restarts.

use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key holding the token.
pub const TOKEN_KEY: &str = "accessToken";

/// Where the session token survives a restart.
pub trait TokenStore: Send + Sync {
    /// The persisted token, if any.
    fn load(&self) -> io::Result<Option<String>>;

    fn save(&self, token: &str) -> io::Result<()>;

    fn clear(&self) -> io::Result<()>;
}

/// Keeps the token for the life of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> io::Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Persists the token as `{"accessToken": "..."}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let map: Map<String, Value> = serde_json::from_reader(reader)?;
        Ok(map
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_owned))
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut map = Map::new();
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(writer, &map)?;
        tracing::debug!(path = ?self.path, "Persisted session token");
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
