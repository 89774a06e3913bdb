use std::path::{Path, PathBuf};

use spdlog::{debug, info};
use uuid::Uuid;

use crate::config::Storage;
use crate::fs::FileSystem;
use crate::post::{Comment, Post};
use crate::store::post_document::{read_comments, read_post, write_post};

pub use error::{StoreError, StoreResult};

mod error;
mod post_document;
mod xml_tree;

pub const DEFAULT_STORAGE_DIR: &str = "BlogFiles";
pub const DEFAULT_EXTENSION: &str = "xml";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    pub storage_dir: PathBuf,
    pub extension: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl From<&Storage> for StoreOptions {
    fn from(storage: &Storage) -> Self {
        StoreOptions {
            storage_dir: storage.folder.clone(),
            extension: storage.extension.clone().unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        }
    }
}

/// Keeps one XML document per post, named after the post id, inside the
/// storage directory. Nothing is cached, every read goes to the file system.
///
/// There is no locking. Two writers of the same id race and the last one wins.
pub struct PostStore<F: FileSystem> {
    fs: F,
    options: StoreOptions,
}

impl<F: FileSystem> PostStore<F> {
    /// Creates the storage directory if it is not there yet.
    pub fn new(fs: F, options: StoreOptions) -> StoreResult<PostStore<F>> {
        let store = PostStore { fs, options };
        store.init_storage_dir()?;
        Ok(store)
    }

    pub fn with_defaults(fs: F) -> StoreResult<PostStore<F>> {
        Self::new(fs, StoreOptions::default())
    }

    fn init_storage_dir(&self) -> StoreResult<()> {
        let dir = &self.options.storage_dir;
        debug!("Initialising post storage in {}", dir.display());
        self.fs.create_dir(dir).map_err(|e| StoreError::storage(dir, e))
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn storage_dir(&self) -> &Path {
        &self.options.storage_dir
    }

    pub fn post_path(&self, id: i64) -> PathBuf {
        self.options.storage_dir.join(format!("{}.{}", id, self.options.extension))
    }

    /// Creates or fully replaces the document of `post`. A failure half way
    /// can leave a truncated file behind.
    pub fn save(&self, post: &Post) -> StoreResult<()> {
        let path = self.post_path(post.id);
        let xml = write_post(post).map_err(|e| StoreError::Write(e.to_string()))?;

        debug!("Saving post {} to {}", post.id, path.display());
        self.fs.write_file_text(&path, &xml)
            .map_err(|e| StoreError::storage(&path, e))
    }

    /// `None` when no document exists for `id`.
    pub fn get(&self, id: i64) -> StoreResult<Option<Post>> {
        let path = self.post_path(id);
        if !self.fs.file_exists(&path) {
            debug!("Post {} not found in {}", id, path.display());
            return Ok(None);
        }

        self.load_post(&path).map(Some)
    }

    /// Every document of the storage directory, in descending lexical order of
    /// file name. Ids are not compared as numbers: 2.xml comes before 10.xml,
    /// which comes before 1.xml. A single bad document fails the whole call.
    pub fn get_all(&self) -> StoreResult<Vec<Post>> {
        let dir = &self.options.storage_dir;
        let mut files = self.fs.enumerate_files(dir)
            .map_err(|e| StoreError::storage(dir, e))?;
        files.sort_by(|a, b| b.cmp(a));

        let posts = files.iter()
            .map(|path| self.load_post(path))
            .collect::<StoreResult<Vec<Post>>>()?;

        info!("Loaded {} posts from {}", posts.len(), dir.display());
        Ok(posts)
    }

    /// Deletes the document of `old_post` then saves `new_post`. Not atomic: if
    /// the save fails the old document is already gone.
    pub fn update(&self, new_post: &Post, old_post: &Post) -> StoreResult<()> {
        debug!("Updating post {} to {}", old_post.id, new_post.id);
        self.delete(old_post.id)?;
        self.save(new_post)
    }

    /// Removing an id that has no document is not an error.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let path = self.post_path(id);
        debug!("Deleting post {} at {}", id, path.display());
        self.fs.delete_file(&path)
            .map_err(|e| StoreError::storage(&path, e))
    }

    pub fn find_comment<'a>(&self, unique_id: &Uuid, post: &'a Post) -> Option<&'a Comment> {
        debug!("Looking up comment {} in post {} at {}", unique_id, post.id, self.post_path(post.id).display());
        post.find_comment(unique_id)
    }

    /// Comments of a stored post, read without rebuilding the whole post.
    pub fn get_comments(&self, id: i64) -> StoreResult<Option<Vec<Comment>>> {
        let path = self.post_path(id);
        if !self.fs.file_exists(&path) {
            debug!("Post {} not found in {}, no comments to load", id, path.display());
            return Ok(None);
        }

        debug!("Loading comments of post {} from {}", id, path.display());
        let xml = self.read_document(&path)?;
        read_comments(&xml)
            .map(Some)
            .map_err(|reason| StoreError::parse(&path, reason))
    }

    /// Appends `comment` to the stored post and rewrites its document.
    /// Returns false when the post does not exist.
    pub fn add_comment(&self, id: i64, comment: Comment) -> StoreResult<bool> {
        let Some(mut post) = self.get(id)? else {
            return Ok(false);
        };

        debug!("Adding comment {} to post {}", comment.unique_id, id);
        post.comments.push(comment);
        self.save(&post)?;
        Ok(true)
    }

    fn read_document(&self, path: &Path) -> StoreResult<String> {
        self.fs.read_file_text(path)
            .map_err(|e| StoreError::storage(path, e))
    }

    fn load_post(&self, path: &Path) -> StoreResult<Post> {
        let xml = self.read_document(path)?;
        read_post(&xml).map_err(|reason| StoreError::parse(path, reason))
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use crate::fs::{DiskFs, MemoryFs};
    use crate::test_data::{comment, post, LEGACY_POST_XML};

    use super::*;

    fn uid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    fn new_store() -> PostStore<MemoryFs> {
        PostStore::with_defaults(MemoryFs::new()).unwrap()
    }

    #[test]
    fn test_new_creates_storage_dir() -> StoreResult<()> {
        let store = PostStore::new(MemoryFs::new(), StoreOptions {
            storage_dir: PathBuf::from("data/posts"),
            extension: "post".to_string(),
        })?;
        assert!(store.file_system().dir_exists(Path::new("data/posts")));
        assert_eq!(store.post_path(12), PathBuf::from("data/posts/12.post"));

        let store = new_store();
        assert!(store.file_system().dir_exists(Path::new("BlogFiles")));
        assert_eq!(store.post_path(1), PathBuf::from("BlogFiles/1.xml"));
        Ok(())
    }

    #[test]
    fn test_happy_case() -> StoreResult<()> {
        let store = new_store();
        let g1 = uid("a63bd715-a3fe-4788-b0e1-2a3153778544");

        let mut hello = post(1, &["a", "b"]);
        hello.title = "Hello".to_string();
        hello.comments = vec![comment(g1, "first!")];
        store.save(&hello)?;

        let loaded = store.get(1)?.unwrap();
        assert_eq!(loaded.tags, ["a", "b"]);
        assert_eq!(loaded.comments[0].unique_id, g1);
        assert_eq!(loaded, hello);
        Ok(())
    }

    #[test]
    fn test_round_trip_keeps_order() -> StoreResult<()> {
        let store = new_store();
        let mut p = post(4, &["zeta", "alpha", "mid", "alpha"]);
        p.is_public = false;
        p.comments = vec![
            comment(uid("21c1e9ad-4ebb-4168-a543-fbf77cc35a85"), "z"),
            comment(uid("bcfc427f-f9f3-4442-bfc2-deca95db96d5"), "a"),
            comment(uid("dbe35a35-7e40-480f-9e7b-409e8d6d77c7"), "m"),
        ];
        p.comments[1].is_public = false;

        store.save(&p)?;
        assert_eq!(store.get(4)?, Some(p));
        Ok(())
    }

    #[test]
    fn test_save_is_idempotent() -> StoreResult<()> {
        let store = new_store();
        let p = post(2, &["x"]);
        let path = store.post_path(2);

        store.save(&p)?;
        let once = store.file_system().read_file_text(&path).unwrap();
        store.save(&p)?;
        let twice = store.file_system().read_file_text(&path).unwrap();

        assert_eq!(once, twice);
        assert_eq!(store.file_system().file_count(), 1);
        Ok(())
    }

    #[test]
    fn test_save_overwrites() -> StoreResult<()> {
        let store = new_store();
        let mut p = post(2, &["x"]);
        store.save(&p)?;

        p.title = "Second title".to_string();
        p.tags.clear();
        store.save(&p)?;

        assert_eq!(store.get(2)?, Some(p));
        Ok(())
    }

    #[test]
    fn test_get_not_found() -> StoreResult<()> {
        let store = new_store();
        assert_eq!(store.get(42)?, None);
        assert_eq!(store.get_comments(42)?, None);
        Ok(())
    }

    #[test]
    fn test_get_malformed_document() {
        let store = new_store();
        let path = store.post_path(3);
        store.file_system().write_file_text(&path, "<Post><Id>3</Id></Post>").unwrap();

        let err = store.get(3).unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "Error parsing post document - file=BlogFiles/3.xml: Missing element Slug in Post");
    }

    #[test]
    fn test_get_legacy_document() -> StoreResult<()> {
        let store = new_store();
        store.file_system().write_file_text(&store.post_path(1), LEGACY_POST_XML).unwrap();

        let p = store.get(1)?.unwrap();
        assert_eq!(p.title, "Hello");
        assert!(p.comments.is_empty());
        Ok(())
    }

    #[test]
    fn test_get_all_lexical_order() -> StoreResult<()> {
        let store = new_store();
        for id in [1, 2, 10] {
            store.save(&post(id, &["t"]))?;
        }

        let ids: Vec<i64> = store.get_all()?.iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 10, 1]);
        Ok(())
    }

    #[test]
    fn test_get_all_counts_distinct_ids() -> StoreResult<()> {
        let store = new_store();
        assert!(store.get_all()?.is_empty());

        for id in [5, 6, 5, 7, 6] {
            store.save(&post(id, &[]))?;
        }
        let posts = store.get_all()?;
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| !p.body.is_empty()));
        Ok(())
    }

    #[test]
    fn test_get_all_fails_on_bad_document() -> StoreResult<()> {
        let store = new_store();
        store.save(&post(1, &[]))?;
        store.save(&post(2, &[]))?;
        let bad = store.storage_dir().join("notes.txt");
        store.file_system().write_file_text(&bad, "not xml at all").unwrap();

        let err = store.get_all().unwrap_err();
        assert!(err.is_parse());
        Ok(())
    }

    #[test]
    fn test_update_with_new_id() -> StoreResult<()> {
        let store = new_store();
        let old = post(1, &["old"]);
        store.save(&old)?;

        let mut new = post(2, &["new"]);
        new.title = "Moved".to_string();
        store.update(&new, &old)?;

        assert!(!store.file_system().file_exists(&store.post_path(1)));
        assert_eq!(store.get(1)?, None);
        assert_eq!(store.get(2)?, Some(new));
        Ok(())
    }

    #[test]
    fn test_update_same_id() -> StoreResult<()> {
        let store = new_store();
        let old = post(8, &["old"]);
        store.save(&old)?;

        let mut new = old.clone();
        new.body = "Rewritten".to_string();
        store.update(&new, &old)?;

        assert_eq!(store.get(8)?, Some(new));
        assert_eq!(store.get_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_update_propagates_storage_error() -> StoreResult<()> {
        let store = new_store();
        let old = post(1, &[]);
        store.save(&old)?;

        store.file_system().fail_deletes(true);
        let err = store.update(&post(2, &[]), &old).unwrap_err();
        assert!(err.is_storage());
        match err {
            StoreError::Storage { path, source } => {
                assert_eq!(path, PathBuf::from("BlogFiles/1.xml"));
                assert_eq!(source.kind(), ErrorKind::Other);
            }
            other => panic!("unexpected error {}", other),
        }
        Ok(())
    }

    #[test]
    fn test_update_save_failure_loses_old() -> StoreResult<()> {
        let store = new_store();
        let old = post(1, &[]);
        store.save(&old)?;

        store.file_system().fail_writes(true);
        let err = store.update(&post(1, &[]), &old).unwrap_err();
        match err {
            StoreError::Storage { path, source } => {
                assert_eq!(path, PathBuf::from("BlogFiles/1.xml"));
                assert_eq!(source.kind(), ErrorKind::Other);
            }
            other => panic!("unexpected error {}", other),
        }

        store.file_system().fail_writes(false);
        assert_eq!(store.get(1)?, None);
        assert!(store.get_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_into_missing_dir() {
        let store = new_store();
        let store = PostStore {
            fs: MemoryFs::new(),
            options: store.options.clone(),
        };

        let err = store.save(&post(1, &[])).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_delete() -> StoreResult<()> {
        let store = new_store();
        store.save(&post(1, &[]))?;
        store.delete(1)?;
        store.delete(1)?;
        assert_eq!(store.get(1)?, None);
        assert_eq!(store.file_system().file_count(), 0);
        Ok(())
    }

    #[test]
    fn test_find_comment() -> StoreResult<()> {
        let store = new_store();
        let g1 = uid("a63bd715-a3fe-4788-b0e1-2a3153778544");
        let g2 = uid("21c1e9ad-4ebb-4168-a543-fbf77cc35a85");
        let mut p = post(1, &[]);
        p.comments = vec![comment(g1, "one"), comment(g2, "two")];
        store.save(&p)?;

        let loaded = store.get(1)?.unwrap();
        assert_eq!(store.find_comment(&g2, &loaded), Some(&p.comments[1]));
        assert_eq!(store.find_comment(&Uuid::nil(), &loaded), None);
        Ok(())
    }

    #[test]
    fn test_disk_round_trip() -> StoreResult<()> {
        let root = std::env::temp_dir().join(format!("blogstore-store-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);

        let store = PostStore::with_defaults(DiskFs::with_root(&root))?;
        assert!(root.join("BlogFiles").is_dir());

        let mut p = post(10, &["disk"]);
        p.comments = vec![comment(uid("a63bd715-a3fe-4788-b0e1-2a3153778544"), "on disk")];
        store.save(&p)?;
        store.save(&post(9, &[]))?;
        assert!(root.join("BlogFiles").join("10.xml").is_file());

        assert_eq!(store.get(10)?, Some(p));
        let ids: Vec<i64> = store.get_all()?.iter().map(|p| p.id).collect();
        assert_eq!(ids, [9, 10]);

        let _ = std::fs::remove_dir_all(&root);
        Ok(())
    }

    #[test]
    fn test_comments() -> StoreResult<()> {
        let store = new_store();
        store.save(&post(1, &[]))?;
        assert_eq!(store.get_comments(1)?, Some(vec![]));

        let g1 = uid("a63bd715-a3fe-4788-b0e1-2a3153778544");
        let g2 = uid("21c1e9ad-4ebb-4168-a543-fbf77cc35a85");
        assert!(store.add_comment(1, comment(g1, "one"))?);
        assert!(store.add_comment(1, comment(g2, "two"))?);
        assert!(!store.add_comment(99, comment(g1, "nowhere"))?);

        let comments = store.get_comments(1)?.unwrap();
        let ids: Vec<Uuid> = comments.iter().map(|c| c.unique_id).collect();
        assert_eq!(ids, [g1, g2]);
        assert_eq!(store.get(99)?, None);
        Ok(())
    }
}
