//! Lazy depth-first tree walker.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use tracing::{debug, trace, warn};

use dirtree_core::{DirError, Entry, EntryKind, TraversalConfig};

use crate::filter::PathFilter;
use crate::identity::DirIdentity;

/// When a directory is reported relative to its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Directory first, then its contents.
    #[default]
    PreOrder,
    /// Contents first, then the directory.
    PostOrder,
}

/// Depth-first walker yielding the entries of a tree that pass a filter.
///
/// The walk is lazy: directories are listed only when the iterator reaches
/// them. Children are visited in name order. The root directory itself is
/// never yielded; a root that is not a directory is yielded alone, if it
/// passes the filter.
///
/// With `leaves_only`, a directory that was descended into is yielded only
/// when none of its descendants passed the filter, and only once its subtree
/// is exhausted.
#[derive(Debug)]
pub struct TreeWalker {
    root: Entry,
    filter: PathFilter,
    recursive: bool,
    follow_symlinks: bool,
    skip_dots: bool,
    leaves_only: bool,
    order: TraversalOrder,
    started: bool,
    stack: Vec<Frame>,
}

/// A directory currently open on the walk path.
#[derive(Debug)]
struct Frame {
    entry: Entry,
    accepted: bool,
    matched_below: bool,
    identity: Option<DirIdentity>,
    children: std::vec::IntoIter<Entry>,
}

/// Outcome of trying to enter a directory.
enum Descent {
    Enter(Frame),
    Cycle(Entry),
    Vanished,
}

impl TreeWalker {
    /// Prepare a walk of `root`.
    ///
    /// Fails with [`DirError::NotFound`] when `root` does not exist and with
    /// [`DirError::InvalidPattern`] when a glob does not compile.
    pub fn new(root: impl Into<PathBuf>, config: &TraversalConfig) -> Result<Self, DirError> {
        let root = root.into();
        let filter = PathFilter::new(config)?;
        let kind = classify(&root).map_err(|e| DirError::io(&root, e))?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());

        Ok(Self {
            root: Entry::new(root, name, kind, 0),
            filter,
            recursive: config.recursive,
            follow_symlinks: config.follow_symlinks,
            skip_dots: config.skip_dots,
            leaves_only: config.prunes_to_leaves(),
            order: TraversalOrder::default(),
            started: false,
            stack: Vec::new(),
        })
    }

    /// Set the traversal order.
    pub fn order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    /// The walk root as classified when the walker was created.
    pub fn root_entry(&self) -> &Entry {
        &self.root
    }

    /// The compiled filter this walk applies.
    pub fn path_filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Yield paths instead of full entries.
    pub fn paths(self) -> impl Iterator<Item = Result<PathBuf, DirError>> {
        self.map(|entry| entry.map(Entry::into_path))
    }

    fn should_descend(&self, entry: &Entry) -> bool {
        if !self.recursive || !entry.is_dir() || entry.is_dot() {
            return false;
        }
        entry.kind != EntryKind::SymlinkDirectory || self.follow_symlinks
    }

    fn open(&self, entry: Entry, accepted: bool) -> Result<Descent, DirError> {
        let identity = if self.follow_symlinks {
            match DirIdentity::of(&entry.path) {
                Ok(identity) => Some(identity),
                Err(e) if is_vanished(&e) && entry.depth > 0 => {
                    debug!(path = %entry.path.display(), "Directory vanished during walk");
                    return Ok(Descent::Vanished);
                }
                Err(e) => return Err(DirError::io(&entry.path, e)),
            }
        } else {
            None
        };

        if let Some(identity) = &identity {
            if self
                .stack
                .iter()
                .any(|frame| frame.identity.as_ref() == Some(identity))
            {
                warn!(path = %entry.path.display(), "Symlink cycle detected, not descending");
                return Ok(Descent::Cycle(entry));
            }
        }

        let listing = match fs::read_dir(&entry.path) {
            Ok(listing) => listing,
            Err(e) if is_vanished(&e) && entry.depth > 0 => {
                debug!(path = %entry.path.display(), "Directory vanished during walk");
                return Ok(Descent::Vanished);
            }
            Err(e) => return Err(DirError::io(&entry.path, e)),
        };
        let children = self.list_children(&entry, listing)?;
        trace!(path = %entry.path.display(), children = children.len(), "Entered directory");

        Ok(Descent::Enter(Frame {
            entry,
            accepted,
            matched_below: false,
            identity,
            children: children.into_iter(),
        }))
    }

    fn list_children(&self, dir: &Entry, listing: fs::ReadDir) -> Result<Vec<Entry>, DirError> {
        let depth = dir.depth + 1;
        let mut listed = Vec::new();

        for item in listing {
            let item = item.map_err(|e| DirError::io(&dir.path, e))?;
            let path = item.path();
            let link_type = match item.file_type() {
                Ok(file_type) => file_type,
                Err(e) if is_vanished(&e) => {
                    debug!(path = %path.display(), "Entry vanished during walk");
                    continue;
                }
                Err(e) => return Err(DirError::io(&path, e)),
            };
            let resolved = if link_type.is_symlink() {
                fs::metadata(&path).ok().map(|m| m.file_type())
            } else {
                None
            };
            let name = CompactString::new(item.file_name().to_string_lossy());
            listed.push(Entry::new(
                path,
                name,
                EntryKind::classify(link_type, resolved),
                depth,
            ));
        }
        listed.sort_by(|a, b| a.name.cmp(&b.name));

        if self.skip_dots {
            return Ok(listed);
        }
        let mut children = Vec::with_capacity(listed.len() + 2);
        children.push(Entry::dot(&dir.path, ".", depth));
        children.push(Entry::dot(&dir.path, "..", depth));
        children.extend(listed);
        Ok(children)
    }

    /// Record that something below every open directory passed the filter.
    fn mark_ancestors(&mut self) {
        for frame in self.stack.iter_mut().rev() {
            if frame.matched_below {
                break;
            }
            frame.matched_below = true;
        }
    }

    /// Decide whether a directory is reported once its subtree is done.
    fn finish(&self, frame: Frame) -> Option<Entry> {
        if frame.entry.depth == 0 || !frame.accepted {
            return None;
        }
        if self.leaves_only {
            return (!frame.matched_below).then_some(frame.entry);
        }
        (self.order == TraversalOrder::PostOrder).then_some(frame.entry)
    }

    fn start(&mut self) -> Option<Result<Entry, DirError>> {
        self.started = true;
        if !self.root.is_dir() {
            return self
                .filter
                .accepts(&self.root)
                .then(|| Ok(self.root.clone()));
        }

        match self.open(self.root.clone(), false) {
            Ok(Descent::Enter(frame)) => {
                self.stack.push(frame);
                None
            }
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Result<Entry, DirError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            if let Some(item) = self.start() {
                return Some(item);
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some(child) = frame.children.next() else {
                let frame = self.stack.pop()?;
                if let Some(entry) = self.finish(frame) {
                    return Some(Ok(entry));
                }
                continue;
            };

            let accepted = self.filter.accepts(&child);
            // `.` and `..` are not descendants of the open directory.
            if accepted && !child.is_dot() {
                self.mark_ancestors();
            }

            if !self.should_descend(&child) {
                if accepted {
                    return Some(Ok(child));
                }
                continue;
            }

            if child.kind == EntryKind::SymlinkDirectory {
                trace!(path = %child.path.display(), "Following symlinked directory");
            }
            match self.open(child, accepted) {
                Ok(Descent::Enter(frame)) => {
                    let report_now = frame.accepted
                        && !self.leaves_only
                        && self.order == TraversalOrder::PreOrder;
                    let entry = report_now.then(|| frame.entry.clone());
                    self.stack.push(frame);
                    if let Some(entry) = entry {
                        return Some(Ok(entry));
                    }
                }
                Ok(Descent::Cycle(entry)) => {
                    if accepted {
                        return Some(Ok(entry));
                    }
                }
                Ok(Descent::Vanished) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Classify `path`, resolving symlinks to decide whether they lead to a directory.
pub(crate) fn classify(path: &Path) -> io::Result<EntryKind> {
    let link = fs::symlink_metadata(path)?;
    let resolved = if link.file_type().is_symlink() {
        fs::metadata(path).ok().map(|m| m.file_type())
    } else {
        None
    };
    Ok(EntryKind::classify(link.file_type(), resolved))
}

fn is_vanished(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}
