use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::ListCache;

/// Longest URI-derived prefix kept in a snapshot file name
const MAX_STEM_LENGTH: usize = 64;

/// Per-process sequence for temporary file names
static TMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Directory-backed cache: one snapshot file per URI.
///
/// Writes go to a uniquely named temporary file and are renamed into place,
/// so a reader never sees a half-written snapshot. Clones share one write lock.
#[derive(Debug, Clone)]
pub struct DirListCache {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl DirListCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot file for a URI
    pub fn path_for(&self, uri: &str) -> PathBuf {
        let stem: String = uri
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .take(MAX_STEM_LENGTH)
            .collect();
        self.dir
            .join(format!("{}-{:016x}.json", stem, fnv1a(uri.as_bytes())))
    }

    /// Temporary file next to `path`, unique across threads and processes
    fn tmp_path_for(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let seq = TMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        path.with_file_name(format!("{}.{}-{}.tmp", name, process::id(), seq))
    }

    fn write_snapshot(&self, path: &Path, snapshot: &str) -> std::io::Result<()> {
        let _lock = self.write_lock.lock();
        fs::create_dir_all(&self.dir)?;

        let tmp_path = Self::tmp_path_for(path);
        let result = write_file(&tmp_path, snapshot).and_then(|()| fs::rename(&tmp_path, path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

impl ListCache for DirListCache {
    fn fetch_by_uri(&self, uri: &str) -> Option<String> {
        let path = self.path_for(uri);
        match fs::read_to_string(&path) {
            Ok(snapshot) if !snapshot.is_empty() => Some(snapshot),
            Ok(_) => None,
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "snapshot not readable");
                None
            }
        }
    }

    fn store_by_uri(&self, uri: &str, snapshot: &str) -> bool {
        let path = self.path_for(uri);
        match self.write_snapshot(&path, snapshot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to store snapshot");
                false
            }
        }
    }
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

/// 64-bit FNV-1a, stable across runs and platforms
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("psl_engine_test_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_store_and_fetch() {
        let dir = test_dir("dir_cache_store");
        let cache = DirListCache::new(&dir);

        assert!(cache.fetch_by_uri("/etc/psl/list.dat").is_none());
        assert!(cache.store_by_uri("/etc/psl/list.dat", "{\"ICANN_DOMAINS\":{}}"));
        assert_eq!(
            cache.fetch_by_uri("/etc/psl/list.dat").as_deref(),
            Some("{\"ICANN_DOMAINS\":{}}")
        );
        // No temporary file left behind
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_concurrent_stores_never_tear() {
        let dir = test_dir("dir_cache_concurrent");
        let cache = Arc::new(DirListCache::new(&dir));
        let snapshots: Arc<Vec<String>> = Arc::new(
            (0..4)
                .map(|i| char::from(b'a' + i).to_string().repeat(256 * 1024))
                .collect(),
        );

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let snapshots = Arc::clone(&snapshots);
                std::thread::spawn(move || {
                    let mut failed_stores = 0;
                    let mut torn_reads = 0;
                    for _ in 0..10 {
                        if !cache.store_by_uri("shared://list", &snapshots[i]) {
                            failed_stores += 1;
                        }
                        if let Some(read) = cache.fetch_by_uri("shared://list") {
                            if !snapshots.contains(&read) {
                                torn_reads += 1;
                            }
                        }
                    }
                    (failed_stores, torn_reads)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), (0, 0));
        }

        let tmp_files = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .count();
        assert_eq!(tmp_files, 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_tmp_paths_are_unique() {
        let path = PathBuf::from("/cache/list-0000000000000000.json");
        let a = DirListCache::tmp_path_for(&path);
        let b = DirListCache::tmp_path_for(&path);
        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
        assert!(a.to_str().unwrap().ends_with(".tmp"));
    }

    #[test]
    fn test_similar_uris_do_not_collide() {
        let cache = DirListCache::new(test_dir("dir_cache_names"));
        let a = cache.path_for("a/b");
        let b = cache.path_for("a_b");
        assert_ne!(a, b);
        assert_eq!(a, cache.path_for("a/b"));
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with("a_b-"));
    }

    #[test]
    fn test_fnv1a_known_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
