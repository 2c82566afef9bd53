//! DocFile family: typed document containers.
//!
//! One [`RootDocFile`] holds the index. A [`MultiDocFile`] holds one tree per
//! documented entity of a single kind, with the per-kind behaviour supplied by
//! a [`DocKind`] strategy. Parent documents are never owned: the driver
//! resolves a [`ParentLink`] to a tree and lends it for the duration of a call.

pub mod class;
pub mod enumeration;
pub mod members;
pub mod node;
pub mod structure;
pub mod variable;

pub use class::ClassDoc;
pub use enumeration::EnumDoc;
pub use node::NodeDoc;
pub use structure::StructDoc;
pub use variable::VariableDoc;

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::Result;
use crate::facts::Documentable;
use crate::serialize::{serialize_doc_to_file, OutputFormat};
use crate::tree::DocTreeNode;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

pub type ClassDocFile = MultiDocFile<ClassDoc>;
pub type StructDocFile = MultiDocFile<StructDoc>;
pub type EnumDocFile = MultiDocFile<EnumDoc>;
pub type NodeDocFile = MultiDocFile<NodeDoc>;
pub type VariableDocFile = MultiDocFile<VariableDoc>;

/// Where one document is written, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath {
    pub dir: PathBuf,
    /// File name without extension.
    pub stem: String,
}

impl DocPath {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }
}

/// Which document a kind folds its summaries into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    None,
    Index,
    /// The document of the class owning the entity.
    Class,
}

/// Per-kind behaviour plugged into [`MultiDocFile`].
pub trait DocKind {
    type Entity: Documentable;

    /// `doctype` value and log label.
    const KIND: &'static str;

    fn doc_id(entity: &Self::Entity) -> String;
    fn display_name(entity: &Self::Entity) -> String;
    fn doc_path(entity: &Self::Entity) -> DocPath;

    /// Build the full document for `entity`. `parent` is the resolved parent
    /// tree, for kinds that copy facts out of it.
    fn init_doc_tree(
        entity: &Self::Entity,
        docs_name: &str,
        parent: Option<&DocTreeNode>,
    ) -> DocTreeNode;

    /// Append the compact summary of `entity` to the parent document.
    fn update_parent_doc(parent: &mut DocTreeNode, entity: &Self::Entity);

    /// Populate member sections. Returns whether the entity is worth keeping.
    fn generate_type_members(
        tree: &mut DocTreeNode,
        entity: &Self::Entity,
        diag: &mut Diagnostics,
    ) -> bool;
}

/// Result of persisting one doc file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Documents written through every format.
    pub documents: usize,
    /// Documents skipped because their entity expired.
    pub skipped: usize,
    pub files: Vec<PathBuf>,
}

impl SaveOutcome {
    pub fn merge(&mut self, other: SaveOutcome) {
        self.documents += other.documents;
        self.skipped += other.skipped;
        self.files.extend(other.files);
    }
}

/// Anything the driver persists at the end of a run.
pub trait DocFile {
    fn doc_title(&self) -> &str;

    fn save(
        &self,
        out_dir: &Path,
        formats: &[Box<dyn OutputFormat>],
        diag: &mut Diagnostics,
    ) -> Result<SaveOutcome>;
}

// -- Index --------------------------------------------------------------------

/// The single index document of a run.
#[derive(Debug)]
pub struct RootDocFile {
    title: String,
    tree: DocTreeNode,
}

impl RootDocFile {
    pub const FILE_STEM: &'static str = "index";

    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let mut tree = DocTreeNode::root();
        tree.append_child_with_value_escaped("doctype", "index");
        tree.append_child_with_value_escaped("display_name", title.as_str());
        Self { title, tree }
    }

    pub fn tree(&self) -> &DocTreeNode {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocTreeNode {
        &mut self.tree
    }
}

impl DocFile for RootDocFile {
    fn doc_title(&self) -> &str {
        &self.title
    }

    fn save(
        &self,
        out_dir: &Path,
        formats: &[Box<dyn OutputFormat>],
        _diag: &mut Diagnostics,
    ) -> Result<SaveOutcome> {
        let files = serialize_doc_to_file(&self.tree, out_dir, Self::FILE_STEM, formats)?;
        Ok(SaveOutcome {
            documents: 1,
            skipped: 0,
            files,
        })
    }
}

// -- Keyed documents ----------------------------------------------------------

type KeyOf<K> = <<K as DocKind>::Entity as Documentable>::Key;
type WeakOf<K> = <<K as DocKind>::Entity as Documentable>::Weak;

struct DocEntry<K: DocKind> {
    entity: WeakOf<K>,
    doc_id: String,
    tree: DocTreeNode,
    /// Set once member sections have been generated into `tree`.
    members_generated: bool,
}

/// One document per entity of kind `K`, in registration order.
pub struct MultiDocFile<K: DocKind> {
    docs_name: String,
    parent: ParentLink,
    entries: IndexMap<KeyOf<K>, DocEntry<K>>,
    /// DocIds of `entries`.
    doc_ids: HashSet<String>,
    /// Weak handles pin the allocation, so a key cannot be reused by a new
    /// entity while it is listed here.
    discarded: HashMap<KeyOf<K>, WeakOf<K>>,
    _kind: PhantomData<K>,
}

impl<K: DocKind> MultiDocFile<K> {
    pub fn new(docs_name: impl Into<String>, parent: ParentLink) -> Self {
        Self {
            docs_name: docs_name.into(),
            parent,
            entries: IndexMap::new(),
            doc_ids: HashSet::new(),
            discarded: HashMap::new(),
            _kind: PhantomData,
        }
    }

    pub fn parent(&self) -> ParentLink {
        self.parent
    }

    /// Build a fresh tree for `entity` without registering it.
    pub fn create_doc_tree(&self, entity: &K::Entity, parent: Option<&DocTreeNode>) -> DocTreeNode {
        K::init_doc_tree(entity, &self.docs_name, parent)
    }

    pub fn doc_tree(&self, entity: &K::Entity) -> Option<&DocTreeNode> {
        self.entries.get(&entity.key()).map(|e| &e.tree)
    }

    pub fn doc_tree_mut(&mut self, entity: &K::Entity) -> Option<&mut DocTreeNode> {
        self.entries.get_mut(&entity.key()).map(|e| &mut e.tree)
    }

    /// Registered tree for `entity`, created, registered and summarized into
    /// `parent` on first request. The flag is `true` when it was created.
    pub fn get_or_create(
        &mut self,
        entity: &K::Entity,
        parent: Option<&mut DocTreeNode>,
        diag: &mut Diagnostics,
    ) -> (&mut DocTreeNode, bool) {
        let key = entity.key();
        if let Some(idx) = self.entries.get_index_of(&key) {
            debug!(kind = K::KIND, id = %K::doc_id(entity), "doc tree cache hit");
            return (&mut self.entries[idx].tree, false);
        }

        // A discard decision is never re-run, so no member sections follow.
        let members_generated = self.discarded.remove(&key).is_some();
        let tree = self.create_doc_tree(entity, parent.as_deref());
        let entry = self.register(entity, tree, parent, diag);
        entry.members_generated = members_generated;
        (&mut entry.tree, true)
    }

    /// Register a prepared tree and fold its summary into `parent`.
    ///
    /// An entity already registered keeps its first tree. A missing parent
    /// means there is nothing to fold into.
    pub fn add_doc_tree(
        &mut self,
        entity: &K::Entity,
        tree: DocTreeNode,
        parent: Option<&mut DocTreeNode>,
        diag: &mut Diagnostics,
    ) -> &mut DocTreeNode {
        &mut self.register(entity, tree, parent, diag).tree
    }

    fn register(
        &mut self,
        entity: &K::Entity,
        tree: DocTreeNode,
        parent: Option<&mut DocTreeNode>,
        diag: &mut Diagnostics,
    ) -> &mut DocEntry<K> {
        let key = entity.key();
        if let Some(idx) = self.entries.get_index_of(&key) {
            return &mut self.entries[idx];
        }

        let doc_id = K::doc_id(entity);
        if !self.doc_ids.insert(doc_id.clone()) {
            diag.warn(
                WarningKind::DuplicateId,
                format!("Duplicate {} id '{}': its files overwrite an earlier document", K::KIND, doc_id),
            );
        }
        if let Some(parent) = parent {
            K::update_parent_doc(parent, entity);
        }
        debug!(kind = K::KIND, id = %doc_id, "registered doc tree");
        let (idx, _) = self.entries.insert_full(
            key,
            DocEntry {
                entity: entity.downgrade(),
                doc_id,
                tree,
                members_generated: false,
            },
        );
        &mut self.entries[idx]
    }

    /// Generate member sections for `entity` and decide whether to keep it.
    ///
    /// First visit builds a tree and either registers it (summary folded into
    /// `parent`) or records the entity as discarded. An entity registered
    /// earlier without members gets them filled in once. Every later call
    /// returns the recorded outcome.
    pub fn generate_type_members(
        &mut self,
        entity: &K::Entity,
        parent: Option<&mut DocTreeNode>,
        diag: &mut Diagnostics,
    ) -> bool {
        let key = entity.key();
        if self.discard_recorded(&key) {
            return false;
        }
        if let Some(entry) = self.entries.get_mut(&key) {
            if !entry.members_generated {
                entry.members_generated = true;
                K::generate_type_members(&mut entry.tree, entity, diag);
            }
            return true;
        }

        let mut tree = self.create_doc_tree(entity, parent.as_deref());
        let keep = K::generate_type_members(&mut tree, entity, diag);
        if keep {
            self.register(entity, tree, parent, diag).members_generated = true;
        } else {
            debug!(kind = K::KIND, id = %K::doc_id(entity), "discarded");
            self.discarded.insert(key, entity.downgrade());
        }
        keep
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity: &K::Entity) -> bool {
        self.entries.contains_key(&entity.key())
    }

    pub fn is_discarded(&self, entity: &K::Entity) -> bool {
        self.discarded
            .get(&entity.key())
            .is_some_and(|weak| <K::Entity as Documentable>::upgrade(weak).is_some())
    }

    /// Whether a discard decision stands for `key`. Entries whose entity is
    /// gone are dropped.
    fn discard_recorded(&mut self, key: &KeyOf<K>) -> bool {
        let live = self
            .discarded
            .get(key)
            .map(|weak| <K::Entity as Documentable>::upgrade(weak).is_some());
        match live {
            Some(true) => true,
            Some(false) => {
                self.discarded.remove(key);
                false
            }
            None => false,
        }
    }

    /// DocIds of registered entities, in registration order.
    pub fn doc_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.doc_id.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.doc_ids.clear();
        self.discarded.clear();
    }
}

impl<K: DocKind> DocFile for MultiDocFile<K> {
    fn doc_title(&self) -> &str {
        &self.docs_name
    }

    fn save(
        &self,
        out_dir: &Path,
        formats: &[Box<dyn OutputFormat>],
        diag: &mut Diagnostics,
    ) -> Result<SaveOutcome> {
        let mut outcome = SaveOutcome::default();
        for entry in self.entries.values() {
            let Some(entity) = <K::Entity as Documentable>::upgrade(&entry.entity) else {
                diag.warn(
                    WarningKind::StaleEntity,
                    format!("Skipping {} '{}': entity no longer exists", K::KIND, entry.doc_id),
                );
                outcome.skipped += 1;
                continue;
            };
            let path = K::doc_path(&entity);
            let files = serialize_doc_to_file(&entry.tree, &out_dir.join(&path.dir), &path.stem, formats)?;
            outcome.documents += 1;
            outcome.files.extend(files);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{ClassFacts, MemberFacts};
    use crate::serialize::create_formats;
    use std::rc::Rc;

    fn class(name: &str, blueprintable: bool) -> Rc<ClassFacts> {
        Rc::new(ClassFacts {
            name: name.into(),
            blueprintable,
            comment: "Documented.".into(),
            ..Default::default()
        })
    }

    fn summary_count(index: &RootDocFile) -> usize {
        index
            .tree()
            .find_child_by_name("classes")
            .map_or(0, |c| c.children_named("class").count())
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut index = RootDocFile::new("Docs");
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let foo = class("Foo", true);

        let (first, created) = classes.get_or_create(&foo, Some(index.tree_mut()), &mut diag);
        assert!(created);
        let first = first as *const DocTreeNode;
        let (second, created) = classes.get_or_create(&foo, Some(index.tree_mut()), &mut diag);
        assert!(!created);
        assert!(std::ptr::eq(first, second));
        assert_eq!(summary_count(&index), 1);
        assert_eq!(classes.len(), 1);
    }

    #[test]
    fn discarded_entity_is_never_registered() {
        let mut index = RootDocFile::new("Docs");
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let plain = class("Plain", false);

        assert!(!classes.generate_type_members(&plain, Some(index.tree_mut()), &mut diag));
        assert!(classes.is_discarded(&plain));
        assert!(!classes.contains(&plain));
        assert!(!classes.generate_type_members(&plain, Some(index.tree_mut()), &mut diag));
        assert_eq!(summary_count(&index), 0);
    }

    #[test]
    fn discard_does_not_leak_to_later_entities() {
        let mut index = RootDocFile::new("Docs");
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();

        for i in 0..50 {
            let plain = class(&format!("Plain{}", i), false);
            assert!(!classes.generate_type_members(&plain, Some(index.tree_mut()), &mut diag));
            drop(plain);

            let kept = class(&format!("Kept{}", i), true);
            assert!(!classes.is_discarded(&kept));
            assert!(classes.generate_type_members(&kept, Some(index.tree_mut()), &mut diag));
            assert!(classes.contains(&kept));
        }
        assert_eq!(classes.len(), 50);
        assert_eq!(summary_count(&index), 50);
    }

    #[test]
    fn node_registered_class_gets_members_once() {
        let mut index = RootDocFile::new("Docs");
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let foo = Rc::new(ClassFacts {
            fields: vec![MemberFacts {
                name: "Speed".into(),
                blueprint_visible: true,
                comment: "Top speed.".into(),
                ..Default::default()
            }],
            ..(*class("Foo", false)).clone()
        });

        classes.get_or_create(&foo, Some(index.tree_mut()), &mut diag);
        assert!(classes.doc_tree(&foo).unwrap().find_child_by_name("fields").is_none());

        assert!(classes.generate_type_members(&foo, Some(index.tree_mut()), &mut diag));
        assert!(classes.generate_type_members(&foo, Some(index.tree_mut()), &mut diag));
        let fields = classes.doc_tree(&foo).unwrap().find_child_by_name("fields").unwrap();
        assert_eq!(fields.children_named("field").count(), 1);
        assert_eq!(summary_count(&index), 1);
    }

    #[test]
    fn discard_then_node_request_registers_without_members() {
        let mut index = RootDocFile::new("Docs");
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let plain = class("Plain", false);

        assert!(!classes.generate_type_members(&plain, Some(index.tree_mut()), &mut diag));
        let (_, created) = classes.get_or_create(&plain, Some(index.tree_mut()), &mut diag);
        assert!(created);
        assert!(!classes.is_discarded(&plain));
        assert!(classes.generate_type_members(&plain, Some(index.tree_mut()), &mut diag));
        assert!(classes.doc_tree(&plain).unwrap().find_child_by_name("doxygen").is_none());
        assert_eq!(summary_count(&index), 1);
    }

    #[test]
    fn missing_parent_is_nothing_to_do() {
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let foo = class("Foo", true);
        let tree = classes.create_doc_tree(&foo, None);
        classes.add_doc_tree(&foo, tree, None, &mut diag);
        assert!(classes.contains(&foo));
    }

    #[test]
    fn first_tree_is_kept() {
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let foo = class("Foo", true);
        let mut first = DocTreeNode::root();
        first.append_child_with_value_escaped("marker", "first");
        classes.add_doc_tree(&foo, first, None, &mut diag);
        classes.add_doc_tree(&foo, DocTreeNode::root(), None, &mut diag);
        assert_eq!(classes.doc_tree(&foo).unwrap().child_value("marker"), Some("first"));
    }

    #[test]
    fn duplicate_doc_id_warns() {
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let a = class("Foo", true);
        let b = class("Foo", true);
        classes.get_or_create(&a, None, &mut diag);
        classes.get_or_create(&b, None, &mut diag);
        assert_eq!(classes.len(), 2);
        assert_eq!(diag.count(WarningKind::DuplicateId), 1);
        assert_eq!(classes.doc_ids().collect::<Vec<_>>(), ["Foo", "Foo"]);
    }

    #[test]
    fn duplicate_ids_are_tracked_until_clear() {
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let all: Vec<_> = (0..3).map(|_| class("Foo", true)).collect();
        let other = class("Bar", true);
        for entity in &all {
            classes.get_or_create(entity, None, &mut diag);
        }
        classes.get_or_create(&other, None, &mut diag);
        assert_eq!(diag.count(WarningKind::DuplicateId), 2);

        classes.clear();
        let mut diag = Diagnostics::new();
        classes.get_or_create(&all[0], None, &mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn save_skips_expired_entities() {
        let dir = tempfile::TempDir::new().unwrap();
        let formats = create_formats(&["json"]).unwrap();
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let kept = class("Kept", true);
        let gone = class("Gone", true);
        classes.get_or_create(&kept, None, &mut diag);
        classes.get_or_create(&gone, None, &mut diag);
        drop(gone);

        let outcome = classes.save(dir.path(), &formats, &mut diag).unwrap();
        assert_eq!(outcome.documents, 1);
        assert_eq!(outcome.skipped, 1);
        assert!(dir.path().join("Classes/Kept/Kept.json").is_file());
        assert!(!dir.path().join("Classes/Gone").exists());
        assert_eq!(diag.count(WarningKind::StaleEntity), 1);
    }

    #[test]
    fn index_saves_at_output_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let formats = create_formats(&["xml", "json"]).unwrap();
        let index = RootDocFile::new("My Docs");
        assert_eq!(index.doc_title(), "My Docs");
        let outcome = index.save(dir.path(), &formats, &mut Diagnostics::new()).unwrap();
        assert_eq!(outcome.files.len(), 2);
        assert!(dir.path().join("index.xml").is_file());
        assert!(dir.path().join("index.json").is_file());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut classes = ClassDocFile::new("Docs", ParentLink::Index);
        let mut diag = Diagnostics::new();
        let foo = class("Foo", true);
        let bar = class("Bar", false);
        classes.get_or_create(&foo, None, &mut diag);
        classes.generate_type_members(&bar, None, &mut diag);
        classes.clear();
        assert!(classes.is_empty());
        assert!(!classes.is_discarded(&bar));
    }
}
