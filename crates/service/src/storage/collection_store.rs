use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use models::{codec, Record, RecordId};
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::metrics;

/// JSON-array file holding every record of one entity kind.
///
/// Each operation reloads the whole file. Reads share the collection lock,
/// mutations hold it exclusively across load, mutate and persist. Persisting
/// writes the complete array to a temporary sibling and renames it over the
/// original, so a failed write leaves the previous content in place.
pub struct JsonCollectionStore<T> {
    lock: RwLock<()>,
    file_path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T: Record> JsonCollectionStore<T> {
    /// Open the collection at `path`. Creates the parent directory and an
    /// empty `[]` file if missing; an existing file must hold a valid array.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::storage(parent, "create directory", e))?;
        }

        let store = Self { lock: RwLock::new(()), file_path, _records: PhantomData };
        match fs::metadata(&store.file_path).await {
            Ok(_) => {
                let records = store.load().await?;
                info!(collection = T::KIND, path = %store.file_path.display(), records = records.len(), "collection opened");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                store.persist(&[]).await?;
                info!(collection = T::KIND, path = %store.file_path.display(), "collection file created");
            }
            Err(e) => return Err(ServiceError::storage(&store.file_path, "stat", e)),
        }
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        let _guard = self.lock.read().await;
        metrics::STORE_READS_TOTAL.with_label_values(&[T::KIND]).inc();
        self.observe(self.load().await)
    }

    pub async fn get(&self, key: &RecordId) -> Result<T, ServiceError> {
        let found = self.list().await?.into_iter().find(|r| r.key() == key);
        self.observe(found.ok_or_else(|| ServiceError::not_found(T::KIND, key)))
    }

    /// Append `record`; Conflict if its key is already present.
    pub async fn insert(&self, record: T) -> Result<T, ServiceError> {
        self.insert_with(record, |_, _| Ok(())).await
    }

    /// Append `record` after `check` accepts it against the current records.
    /// The check runs under the write lock, so it can enforce invariants that
    /// span records (unique secondary fields).
    pub async fn insert_with<F>(&self, record: T, check: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&[T], &T) -> Result<(), ServiceError>,
    {
        self.update_collection(move |records| {
            if records.iter().any(|r| r.key() == record.key()) {
                return Err(ServiceError::conflict(T::KIND, record.key()));
            }
            check(records.as_slice(), &record)?;
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    /// Overwrite the record stored under `key`, keeping its position.
    pub async fn replace(&self, key: &RecordId, record: T) -> Result<T, ServiceError> {
        self.modify(key, move |current| {
            *current = record;
            Ok(())
        })
        .await
    }

    /// Mutate the record stored under `key` in place. The key must not change.
    pub async fn modify<F>(&self, key: &RecordId, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<(), ServiceError>,
    {
        self.update_collection(|records| {
            let current = records
                .iter_mut()
                .find(|r| r.key() == key)
                .ok_or_else(|| ServiceError::not_found(T::KIND, key))?;
            f(current)?;
            if current.key() != key {
                return Err(ServiceError::Validation(format!(
                    "{} key is immutable: {key} cannot become {}",
                    T::KIND,
                    current.key()
                )));
            }
            Ok(current.clone())
        })
        .await
    }

    /// Delete the record stored under `key` and return it.
    pub async fn remove(&self, key: &RecordId) -> Result<T, ServiceError> {
        self.update_collection(|records| {
            let pos = records
                .iter()
                .position(|r| r.key() == key)
                .ok_or_else(|| ServiceError::not_found(T::KIND, key))?;
            Ok(records.remove(pos))
        })
        .await
    }

    /// Locked read-mutate-write cycle. The collection is persisted only when
    /// `f` succeeds; on error the file is left untouched.
    pub async fn update_collection<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.write().await;
        let started = Instant::now();
        let result = self.load_mutate_persist(f).await;
        if result.is_ok() {
            metrics::STORE_WRITES_TOTAL.with_label_values(&[T::KIND]).inc();
            metrics::STORE_WRITE_DURATION
                .with_label_values(&[T::KIND])
                .observe(started.elapsed().as_secs_f64());
        }
        self.observe(result)
    }

    // Caller holds the write lock.
    async fn load_mutate_persist<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let mut records = self.load().await?;
        let out = f(&mut records)?;
        self.persist(&records).await?;
        debug!(collection = T::KIND, records = records.len(), "collection rewritten");
        Ok(out)
    }

    fn observe<R>(&self, result: Result<R, ServiceError>) -> Result<R, ServiceError> {
        if let Err(e) = &result {
            metrics::STORE_ERRORS_TOTAL.with_label_values(&[T::KIND, e.label()]).inc();
            if matches!(e, ServiceError::Storage(_)) {
                warn!(collection = T::KIND, path = %self.file_path.display(), error = %e, "store operation failed");
            }
        }
        result
    }

    async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let path = &self.file_path;
        let bytes = fs::read(path).await.map_err(|e| ServiceError::storage(path, "read", e))?;
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| ServiceError::storage(path, "parse", e))?;
        let Value::Array(items) = value else {
            return Err(ServiceError::storage(path, "parse", "collection file is not a JSON array"));
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                codec::decode_unvalidated::<T>(item)
                    .map_err(|e| ServiceError::storage(path, "decode", format!("record {i}: {e}")))
            })
            .collect()
    }

    async fn persist(&self, records: &[T]) -> Result<(), ServiceError> {
        let path = &self.file_path;
        let encoded = records
            .iter()
            .map(|r| codec::encode(r).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::storage(path, "encode", e))?;
        let data =
            serde_json::to_vec_pretty(&encoded).map_err(|e| ServiceError::storage(path, "encode", e))?;

        let tmp = self.temp_path();
        let written = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp, path).await
        }
        .await;

        if let Err(e) = written {
            fs::remove_file(&tmp).await.ok();
            return Err(ServiceError::storage(path, "write", e));
        }
        self.sync_parent_dir().await;
        Ok(())
    }

    // Best effort: makes the rename itself durable where the platform allows
    // opening a directory.
    async fn sync_parent_dir(&self) {
        let parent = match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        match fs::File::open(parent).await {
            Ok(dir) => {
                if let Err(e) = dir.sync_all().await {
                    debug!(collection = T::KIND, dir = %parent.display(), error = %e, "directory sync skipped");
                }
            }
            Err(e) => debug!(collection = T::KIND, dir = %parent.display(), error = %e, "directory sync skipped"),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| T::KIND.to_string());
        self.file_path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{temp_path, user};
    use models::user::UserRegister;

    type Users = JsonCollectionStore<UserRegister>;

    #[tokio::test]
    async fn open_creates_empty_array_file() -> Result<(), anyhow::Error> {
        let path = temp_path("store_open");
        let store = Users::open(&path).await?;
        assert!(store.list().await?.is_empty());
        assert_eq!(tokio::fs::read_to_string(&path).await?.trim(), "[]");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn insert_then_get_returns_equal_record() -> Result<(), anyhow::Error> {
        let path = temp_path("store_insert_get");
        let store = Users::open(&path).await?;
        let u = user("u1", "a@b.com");
        store.insert(u.clone()).await?;
        assert_eq!(store.get(&u.user_id).await?, u);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_key_conflicts_and_leaves_file_unchanged() -> Result<(), anyhow::Error> {
        let path = temp_path("store_conflict");
        let store = Users::open(&path).await?;
        store.insert(user("u1", "a@b.com")).await?;
        let before = tokio::fs::read(&path).await?;

        let err = store.insert(user("u1", "other@b.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(tokio::fs::read(&path).await?, before);
        assert_eq!(store.list().await?.len(), 1);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one() -> Result<(), anyhow::Error> {
        let path = temp_path("store_remove");
        let store = Users::open(&path).await?;
        for (id, email) in [("u1", "a@b.com"), ("u2", "b@b.com"), ("u3", "c@b.com")] {
            store.insert(user(id, email)).await?;
        }
        let key = RecordId::parse("u2")?;
        let removed = store.remove(&key).await?;
        assert_eq!(removed.email, "b@b.com");

        let ids: Vec<String> = store.list().await?.into_iter().map(|u| u.user_id.to_string()).collect();
        assert_eq!(ids, ["u1", "u3"]);
        assert!(matches!(store.get(&key).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.remove(&key).await, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn replace_keeps_position_and_rejects_key_change() -> Result<(), anyhow::Error> {
        let path = temp_path("store_replace");
        let store = Users::open(&path).await?;
        store.insert(user("u1", "a@b.com")).await?;
        store.insert(user("u2", "b@b.com")).await?;

        let key = RecordId::parse("u1")?;
        let mut changed = user("u1", "a@b.com");
        changed.first_name = "Changed".into();
        store.replace(&key, changed.clone()).await?;
        let all = store.list().await?;
        assert_eq!(all[0], changed);
        assert_eq!(all[1].user_id.as_str(), "u2");

        let before = tokio::fs::read(&path).await?;
        let err = store.replace(&key, user("u9", "z@b.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(tokio::fs::read(&path).await?, before);

        let missing = RecordId::parse("nope")?;
        assert!(matches!(store.replace(&missing, user("nope", "n@b.com")).await, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn reload_round_trips_ordered_sequence() -> Result<(), anyhow::Error> {
        let path = temp_path("store_reload");
        let store = Users::open(&path).await?;
        let mut expected = Vec::new();
        for i in 0..5 {
            let u = user(&format!("u{i}"), &format!("user{i}@b.com"));
            store.insert(u.clone()).await?;
            expected.push(u);
        }
        drop(store);

        let reopened = Users::open(&path).await?;
        assert_eq!(reopened.list().await?, expected);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_lose_nothing() -> Result<(), anyhow::Error> {
        let path = temp_path("store_concurrent");
        let store = Users::open(&path).await?;
        let n = 40;

        let mut handles = Vec::new();
        for i in 0..n {
            let writer = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                writer.insert(user(&format!("u{i}"), &format!("user{i}@b.com"))).await
            }));
            if i % 3 == 0 {
                let reader = Arc::clone(&store);
                handles.push(tokio::spawn(async move {
                    reader.list().await.map(|_| user("reader", "r@b.com"))
                }));
            }
        }
        for h in handles {
            h.await??;
        }

        let all = store.list().await?;
        assert_eq!(all.len(), n);
        for i in 0..n {
            let key = RecordId::parse(&format!("u{i}"))?;
            assert!(all.iter().any(|u| u.user_id == key));
        }
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() -> Result<(), anyhow::Error> {
        let path = temp_path("store_corrupt");
        tokio::fs::write(&path, b"{\"not\": \"an array\"}").await?;
        assert!(matches!(Users::open(&path).await, Err(ServiceError::Storage(_))));

        tokio::fs::write(&path, b"[]").await?;
        let store = Users::open(&path).await?;
        tokio::fs::write(&path, b"[{\"user_id\": 5}]").await?;
        assert!(matches!(store.list().await, Err(ServiceError::Storage(_))));
        tokio::fs::write(&path, b"not json").await?;
        assert!(matches!(store.insert(user("u1", "a@b.com")).await, Err(ServiceError::Storage(_))));
        assert_eq!(tokio::fs::read(&path).await?, b"not json");

        tokio::fs::remove_file(&path).await?;
        assert!(matches!(store.list().await, Err(ServiceError::Storage(_))));
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_does_not_persist() -> Result<(), anyhow::Error> {
        let path = temp_path("store_abort");
        let store = Users::open(&path).await?;
        store.insert(user("u1", "a@b.com")).await?;
        let res: Result<(), ServiceError> = store
            .update_collection(|records| {
                records.clear();
                Err(ServiceError::Validation("abort".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.list().await?.len(), 1);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn persist_survives_directory_sync_for_nested_and_bare_paths() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("store_dirsync_{}", Uuid::new_v4()));
        let store = Users::open(dir.join("deep").join("users.json")).await?;
        store.insert(user("u1", "a@b.com")).await?;
        let reopened = Users::open(store.path().to_path_buf()).await?;
        assert_eq!(reopened.list().await?.len(), 1);
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let bare = PathBuf::from(format!("store_dirsync_{}.json", Uuid::new_v4().simple()));
        let store = Users::open(bare.clone()).await?;
        store.insert(user("u1", "a@b.com")).await?;
        assert_eq!(store.list().await?.len(), 1);
        let _ = tokio::fs::remove_file(&bare).await;
        Ok(())
    }

    #[tokio::test]
    async fn no_temp_files_left_behind() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("store_tmp_{}", Uuid::new_v4()));
        let path = dir.join("users.json");
        let store = Users::open(&path).await?;
        store.insert(user("u1", "a@b.com")).await?;
        store.remove(&RecordId::parse("u1")?).await?;

        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, ["users.json"]);
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
