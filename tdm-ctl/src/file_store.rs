use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tdm_client::Store;

/// Keeps every entry in a single JSON file, rewritten on each change
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// A missing file is an empty store
    pub fn open(path: &Path) -> anyhow::Result<FileStore> {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parsing state file {path:?}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e).with_context(|| format!("reading state file {path:?}")),
        };
        Ok(FileStore {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn flush(&self) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(&self.entries).context("serializing state")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing state file {:?}", self.path))
    }
}

impl Store for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn delete(&mut self, key: &str) -> anyhow::Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdm_client::{api::DisasterId, Db};

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("creating tempdir");
        let store = FileStore::open(&dir.path().join("state.json")).unwrap();
        assert_eq!(store.get_raw("anything"), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("creating tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{").unwrap();
        assert!(FileStore::open(&path).is_err());
    }

    #[test]
    fn state_survives_reopening() {
        let dir = tempfile::tempdir().expect("creating tempdir");
        let path = dir.path().join("state.json");

        let mut db = Db::load(FileStore::open(&path).unwrap());
        db.register(String::from("Alice"), String::from("a"), String::from("p1"))
            .unwrap();
        db.post_comment(
            DisasterId(2),
            "from disk",
            tdm_client::api::CommentTag::Reflection,
            None,
        )
        .unwrap();

        let db = Db::load(FileStore::open(&path).unwrap());
        assert_eq!(db.current_user().map(|u| &u.name as &str), Some("Alice"));
        assert_eq!(db.comments_for(DisasterId(2)).len(), 2);
    }

    #[test]
    fn delete_rewrites_file() {
        let dir = tempfile::tempdir().expect("creating tempdir");
        let path = dir.path().join("state.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set_raw("k", String::from("1")).unwrap();
        store.delete("k").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get_raw("k"), None);
    }
}
