// ---------------- 本地键值存储 ----------------
// 相当于浏览器 localStorage：一个 JSON 对象文件，key -> 字符串值。
// 错题集合存在固定 key 下，值是 JSON 整数数组。

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs, io,
    path::PathBuf,
};

use tracing::{debug, warn};

use crate::error::StoreError;

pub const INCORRECT_IDS_KEY: &str = "gKenteiIncorrectCardIds";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// 文件存储：每次 set 整体覆盖写回。
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // 旧文件内容损坏时从空表开始；读失败则不写，避免丢掉其他 key
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e @ StoreError::Json(_)) => {
                warn!(path = %self.path.display(), error = %e, "存储文件无法解析，将被覆盖");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(io_err)?;
            }
        }
        let s = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, s).map_err(io_err)?;
        debug!(path = %self.path.display(), key, "存储已写入");
        Ok(())
    }
}

/// 内存存储：测试与 --no-save 使用，进程退出即丢弃。
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 读取错题集合。缺失、读失败、解析失败一律退回空集合，只记日志。
pub fn load_incorrect_ids(store: &dyn KeyValueStore) -> BTreeSet<i64> {
    let raw = match store.get(INCORRECT_IDS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            warn!(error = %e, "读取错题记录失败，使用空集合");
            return BTreeSet::new();
        }
    };
    match serde_json::from_str::<Vec<i64>>(&raw) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            warn!(error = %e, "错题记录格式错误，使用空集合");
            BTreeSet::new()
        }
    }
}

pub fn save_incorrect_ids(
    store: &mut dyn KeyValueStore,
    ids: &BTreeSet<i64>,
) -> Result<(), StoreError> {
    let ids: Vec<i64> = ids.iter().copied().collect();
    let s = serde_json::to_string(&ids)?;
    store.set(INCORRECT_IDS_KEY, &s)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io {
                path: PathBuf::from("broken"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            })
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn absent_key_is_empty_set() {
        let store = MemoryStore::default();
        assert!(load_incorrect_ids(&store).is_empty());
    }

    #[test]
    fn malformed_value_is_empty_set() {
        let mut store = MemoryStore::default();
        store.set(INCORRECT_IDS_KEY, "not json").unwrap();
        assert!(load_incorrect_ids(&store).is_empty());
        store.set(INCORRECT_IDS_KEY, r#"{"a":1}"#).unwrap();
        assert!(load_incorrect_ids(&store).is_empty());
    }

    #[test]
    fn read_failure_is_empty_set() {
        assert!(load_incorrect_ids(&BrokenStore).is_empty());
    }

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryStore::default();
        let ids: BTreeSet<i64> = [3, 1, 2].into_iter().collect();
        save_incorrect_ids(&mut store, &ids).unwrap();
        assert_eq!(
            store.get(INCORRECT_IDS_KEY).unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert_eq!(load_incorrect_ids(&store), ids);
    }

    #[test]
    fn file_round_trip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = FileStore::new(path.clone());
        store.set("theme", "dark").unwrap();

        let ids: BTreeSet<i64> = [10, 4].into_iter().collect();
        save_incorrect_ids(&mut store, &ids).unwrap();

        let reopened = FileStore::new(path);
        assert_eq!(load_incorrect_ids(&reopened), ids);
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_reads_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{{{").unwrap();
        let mut store = FileStore::new(path);
        assert!(store.get(INCORRECT_IDS_KEY).is_err());
        assert!(load_incorrect_ids(&store).is_empty());

        let ids: BTreeSet<i64> = [5].into_iter().collect();
        save_incorrect_ids(&mut store, &ids).unwrap();
        assert_eq!(load_incorrect_ids(&store), ids);
    }

    #[test]
    fn unreadable_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        // 非 UTF-8 内容：read_to_string 返回 InvalidData 这一 I/O 错误
        let original = vec![0xff, 0xfe, b'{', b'}'];
        fs::write(&path, &original).unwrap();
        let mut store = FileStore::new(path.clone());

        let err = store.set(INCORRECT_IDS_KEY, "[1]").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(fs::read(&path).unwrap(), original);
    }
}
