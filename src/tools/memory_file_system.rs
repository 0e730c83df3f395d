//! 測試用的記憶體檔案系統

use super::file_scanner::TreeEntry;
use super::file_system::FileSystem;
use anyhow::{Result, bail};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    File(String),
    Dir,
}

#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    failing_renames: RefCell<HashSet<PathBuf>>,
    failing_removals: RefCell<HashSet<PathBuf>>,
    mutations: Cell<usize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        insert_dir_chain(&mut self.nodes.borrow_mut(), path.as_ref());
    }

    pub fn add_file(&self, path: impl AsRef<Path>, contents: &str) {
        let path = path.as_ref();
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = path.parent() {
            insert_dir_chain(&mut nodes, parent);
        }
        nodes.insert(path.to_path_buf(), Node::File(contents.to_string()));
    }

    /// 讓指定來源檔案的移動失敗
    pub fn fail_rename_of(&self, path: impl AsRef<Path>) {
        self.failing_renames
            .borrow_mut()
            .insert(path.as_ref().to_path_buf());
    }

    /// 讓指定檔案或目錄的刪除失敗
    pub fn fail_remove_of(&self, path: impl AsRef<Path>) {
        self.failing_removals
            .borrow_mut()
            .insert(path.as_ref().to_path_buf());
    }

    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(_, node)| matches!(node, Node::File(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// 透過 [`FileSystem`] 介面造成的異動次數
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    fn record_mutation(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    fn has_children(&self, path: &Path) -> bool {
        self.nodes
            .borrow()
            .keys()
            .any(|p| p.parent() == Some(path))
    }
}

fn insert_dir_chain(nodes: &mut BTreeMap<PathBuf, Node>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            bail!("not a directory: {}", path.display());
        }
        Ok(self
            .nodes
            .borrow()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn walk(&self, path: &Path) -> Result<Vec<TreeEntry>> {
        if !self.is_dir(path) {
            bail!("not a directory: {}", path.display());
        }
        Ok(self
            .nodes
            .borrow()
            .iter()
            .filter_map(|(p, node)| {
                let relative = p.strip_prefix(path).ok()?;
                let depth = relative.components().count();
                (depth > 0).then(|| TreeEntry {
                    path: p.clone(),
                    is_dir: *node == Node::Dir,
                    depth,
                })
            })
            .collect())
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        if !self.is_dir(path) {
            bail!("not a directory: {}", path.display());
        }
        Ok(!self.has_children(path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let blocked = path
            .ancestors()
            .any(|a| matches!(self.nodes.borrow().get(a), Some(Node::File(_))));
        if blocked {
            bail!("a file is in the way of {}", path.display());
        }
        insert_dir_chain(&mut self.nodes.borrow_mut(), path);
        self.record_mutation();
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if self.failing_renames.borrow().contains(from) {
            bail!("injected rename failure for {}", from.display());
        }
        let parent_ok = to.parent().is_some_and(|parent| self.is_dir(parent));
        if !parent_ok {
            bail!("missing parent directory for {}", to.display());
        }
        if self.is_dir(to) {
            bail!("target is a directory: {}", to.display());
        }

        let mut nodes = self.nodes.borrow_mut();
        match nodes.remove(from) {
            Some(Node::File(contents)) => {
                nodes.insert(to.to_path_buf(), Node::File(contents));
            }
            Some(Node::Dir) => {
                nodes.insert(from.to_path_buf(), Node::Dir);
                bail!("cannot move a directory: {}", from.display());
            }
            None => bail!("no such file: {}", from.display()),
        }
        drop(nodes);
        self.record_mutation();
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if self.failing_removals.borrow().contains(path) {
            bail!("injected delete failure for {}", path.display());
        }
        match self.nodes.borrow().get(path) {
            Some(Node::File(_)) => {}
            Some(Node::Dir) => bail!("is a directory: {}", path.display()),
            None => bail!("no such file: {}", path.display()),
        }
        self.nodes.borrow_mut().remove(path);
        self.record_mutation();
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        if self.failing_removals.borrow().contains(path) {
            bail!("injected delete failure for {}", path.display());
        }
        if !self.is_dir(path) {
            bail!("not a directory: {}", path.display());
        }
        if self.has_children(path) {
            bail!("directory not empty: {}", path.display());
        }
        self.nodes.borrow_mut().remove(path);
        self.record_mutation();
        Ok(())
    }
}
