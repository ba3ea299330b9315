//! Persistence collaborator. The scheduling and standings logic never touches storage;
//! callers load a tournament, run the pure functions, and save the result.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Load and save whole tournaments by id.
pub trait TournamentRepository: Send + Sync {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError>;
    fn save(&self, tournament: &Tournament) -> Result<(), TournamentError>;
    /// Returns whether something was deleted.
    fn delete(&self, id: TournamentId) -> Result<bool, TournamentError>;
    fn list_ids(&self) -> Result<Vec<TournamentId>, TournamentError>;
}

fn lock_error<T>(_: T) -> TournamentError {
    TournamentError::Storage("lock error".to_string())
}

/// Process-local storage; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentRepository for InMemoryRepository {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        Ok(g.get(&id).cloned())
    }

    fn save(&self, tournament: &Tournament) -> Result<(), TournamentError> {
        let mut g = self.tournaments.write().map_err(lock_error)?;
        g.insert(tournament.id, tournament.clone());
        Ok(())
    }

    fn delete(&self, id: TournamentId) -> Result<bool, TournamentError> {
        let mut g = self.tournaments.write().map_err(lock_error)?;
        Ok(g.remove(&id).is_some())
    }

    fn list_ids(&self) -> Result<Vec<TournamentId>, TournamentError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        Ok(g.keys().copied().collect())
    }
}

/// One pretty-printed `<id>.json` file per tournament under a directory.
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Use `dir` for storage, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, TournamentError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| TournamentError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl TournamentRepository for JsonFileRepository {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError> {
        let content = match fs::read_to_string(self.path_for(id)) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TournamentError::Storage(e.to_string())),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| TournamentError::Storage(e.to_string()))
    }

    fn save(&self, tournament: &Tournament) -> Result<(), TournamentError> {
        let content =
            serde_json::to_string_pretty(tournament).map_err(|e| TournamentError::Storage(e.to_string()))?;
        // Atomic replace via rename.
        let tmp = self.dir.join(format!("{}.json.tmp", tournament.id));
        fs::write(&tmp, content).map_err(|e| TournamentError::Storage(e.to_string()))?;
        fs::rename(&tmp, self.path_for(tournament.id)).map_err(|e| TournamentError::Storage(e.to_string()))
    }

    fn delete(&self, id: TournamentId) -> Result<bool, TournamentError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TournamentError::Storage(e.to_string())),
        }
    }

    fn list_ids(&self) -> Result<Vec<TournamentId>, TournamentError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| TournamentError::Storage(e.to_string()))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TournamentError::Storage(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<TournamentId>().ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
