//! JSON document storage for instructions.
//!
//! Every instruction lives in its own file,
//! `<project-root>/.state/instructions/<id>.json`. Writes go to a temporary
//! sibling first and are renamed over the target, so readers never observe a
//! half-written document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::{
    error::{FsResultExt, Result, WorkflowError},
    models::Instruction,
};

/// Directory, relative to the project root, holding instruction documents.
pub const STATE_DIR: &str = ".state/instructions";

/// Load/save access to instruction documents under one directory.
#[derive(Debug, Clone)]
pub struct InstructionStore {
    dir: PathBuf,
}

impl InstructionStore {
    /// Creates a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store for the default state directory of a project.
    pub fn for_project(root: &Path) -> Self {
        Self::new(root.join(STATE_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn exists(&self, id: &str) -> bool {
        is_valid_id(id) && self.path_for(id).is_file()
    }

    /// Reads an instruction document by id.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` if no document exists and
    /// `WorkflowError::Corrupt` if it cannot be parsed.
    pub fn load(&self, id: &str) -> Result<Instruction> {
        let path = self.path_for(id);
        if !is_valid_id(id) || !path.is_file() {
            return Err(WorkflowError::instruction_not_found(id));
        }
        let text = fs::read_to_string(&path).fs_context(&path)?;
        serde_json::from_str(&text).map_err(|source| WorkflowError::Corrupt { path, source })
    }

    /// Writes the document as-is, replacing any previous version atomically.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` if the id is not a plain file stem.
    pub fn save(&self, instruction: &Instruction) -> Result<()> {
        if !is_valid_id(&instruction.id) {
            return Err(WorkflowError::invalid_input("instruction_id")
                .with_reason(format!("'{}' is not a valid instruction id", instruction.id)));
        }
        fs::create_dir_all(&self.dir).fs_context(&self.dir)?;

        let path = self.path_for(&instruction.id);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", instruction.id));
        let json = serde_json::to_string_pretty(instruction)?;

        let mut file = fs::File::create(&tmp_path).fs_context(&tmp_path)?;
        file.write_all(json.as_bytes()).fs_context(&tmp_path)?;
        file.sync_all().fs_context(&tmp_path)?;
        drop(file);

        fs::rename(&tmp_path, &path).fs_context(&path)?;
        debug!("Saved instruction {} (revision {})", instruction.id, instruction.revision);
        Ok(())
    }

    /// Saves a mutated document if nobody else wrote it since it was loaded.
    ///
    /// On success the document's revision is incremented.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Conflict` when the stored revision differs
    /// from the one the document was loaded with.
    pub fn commit(&self, instruction: &mut Instruction) -> Result<()> {
        if self.exists(&instruction.id) {
            let stored = self.load(&instruction.id)?;
            if stored.revision != instruction.revision {
                return Err(WorkflowError::Conflict {
                    id: instruction.id.clone(),
                    expected: instruction.revision,
                    found: stored.revision,
                });
            }
        }
        instruction.revision += 1;
        self.save(instruction)
    }

    /// Every parsable document in the directory, oldest first.
    ///
    /// Files that fail to read or parse are skipped.
    pub fn list_all(&self) -> Result<Vec<Instruction>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut instructions = Vec::new();
        for entry in fs::read_dir(&self.dir).fs_context(&self.dir)? {
            let path = entry.fs_context(&self.dir)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    serde_json::from_str::<Instruction>(&text).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(instruction) => instructions.push(instruction),
                Err(e) => warn!("Skipping unreadable instruction {}: {e}", path.display()),
            }
        }

        instructions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(instructions)
    }
}

/// Ids name files directly inside the state directory, so they may not carry
/// separators or dots.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::models::{InstructionStatus, Priority, WorkflowStep};

    fn sample(id: &str, created_at: i64) -> Instruction {
        Instruction {
            id: id.to_string(),
            title: "Add dark mode".to_string(),
            description: "Toggle in the header".to_string(),
            goal: "Users can switch themes".to_string(),
            priority: Priority::High,
            status: InstructionStatus::Created,
            workflow_step: WorkflowStep::UserInstruction,
            created_at,
            revision: 0,
            task_plan: None,
            gathered_information: None,
            analysis: None,
            execution_plan: None,
            final_report: None,
        }
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        let err = store.load("deadbeef").unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { .. }));
    }

    #[test]
    fn test_load_garbage_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for("bad00000"), "{ not json").unwrap();
        let err = store.load("bad00000").unwrap_err();
        assert!(matches!(err, WorkflowError::Corrupt { .. }));
    }

    #[test]
    fn test_save_load_round_trip_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        store.save(&sample("a1b2c3d4", 100)).unwrap();

        let first = fs::read(store.path_for("a1b2c3d4")).unwrap();
        let loaded = store.load("a1b2c3d4").unwrap();
        store.save(&loaded).unwrap();
        let second = fs::read(store.path_for("a1b2c3d4")).unwrap();

        assert_eq!(first, second);
        assert!(!store.dir().join(".a1b2c3d4.json.tmp").exists());
    }

    #[test]
    fn test_commit_detects_stale_revision() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        store.save(&sample("a1b2c3d4", 100)).unwrap();

        let mut first = store.load("a1b2c3d4").unwrap();
        let mut second = store.load("a1b2c3d4").unwrap();

        store.commit(&mut first).unwrap();
        assert_eq!(first.revision, 1);

        let err = store.commit(&mut second).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Conflict {
                expected: 0,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_list_all_skips_unparsable_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        store.save(&sample("bbbbbbbb", 200)).unwrap();
        store.save(&sample("aaaaaaaa", 100)).unwrap();
        fs::write(store.path_for("broken00"), "[]").unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let all = store.list_all().unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["aaaaaaaa", "bbbbbbbb"]);
    }

    #[test]
    fn test_ids_cannot_escape_state_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        fs::create_dir_all(store.dir()).unwrap();
        let outside = sample("a1b2c3d4", 100);
        fs::write(
            temp_dir.path().join("escaped.json"),
            serde_json::to_string(&outside).unwrap(),
        )
        .unwrap();

        let err = store.load("../../escaped").unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { .. }));
        assert!(!store.exists("../../escaped"));

        let err = store.save(&sample("../escaped", 100)).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidInput { .. }));
        let err = store.commit(&mut sample("", 100)).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidInput { .. }));
        assert!(!store.dir().join("../escaped.json").exists());
    }

    #[test]
    fn test_list_all_without_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = InstructionStore::for_project(temp_dir.path());
        assert!(store.list_all().unwrap().is_empty());
    }
}
