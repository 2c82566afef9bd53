//! Facts model: what the upstream enumerator knows about each entity.
//!
//! The generator never walks engine reflection itself. It consumes these
//! records, shared as `Rc`s by a [`FactsSource`], and keeps only weak handles
//! to them so an entity unloaded mid-run is detected instead of kept alive.

use serde::Deserialize;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// A scriptable class.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassFacts {
    /// Object name; the class DocId.
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub short_description: String,
    pub source_path: String,
    /// Ancestor display names, outermost first, excluding the class itself.
    pub hierarchy: Vec<String>,
    pub group: String,
    pub native: bool,
    pub blueprintable: bool,
    pub blueprint_type: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub hidden: bool,
    pub interface: bool,
    pub interfaces: Vec<InterfaceRef>,
    pub fields: Vec<MemberFacts>,
    pub events: Vec<MemberFacts>,
    /// Raw doc comment.
    pub comment: String,
}

/// A script-visible value type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StructFacts {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub short_description: String,
    pub source_path: String,
    pub hierarchy: Vec<String>,
    pub native: bool,
    pub blueprintable: bool,
    pub blueprint_type: bool,
    pub fields: Vec<MemberFacts>,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnumFacts {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub short_description: String,
    pub source_path: String,
    pub native: bool,
    pub blueprint_type: bool,
    pub values: Vec<EnumValueFacts>,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnumValueFacts {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub hidden: bool,
    pub spacer: bool,
}

/// An interface implemented by a class.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterfaceRef {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub native: bool,
}

/// The type that declares a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OwnerRef {
    pub id: String,
    pub display_name: String,
}

/// A field or event of a class or struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberFacts {
    pub name: String,
    pub display_name: String,
    /// Declared type, without const/reference qualifiers.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Parameter list of an event signature.
    pub signature: String,
    pub category: String,
    pub description: String,
    pub comment: String,
    pub deprecation_message: String,
    /// Declaring type; `None` means declared on the documented entity.
    pub owner: Option<OwnerRef>,
    pub blueprint_visible: bool,
    pub blueprint_read_only: bool,
    pub editable: bool,
    pub edit_const: bool,
    pub disable_edit_on_template: bool,
    pub disable_edit_on_instance: bool,
    pub deprecated: bool,
    pub public: bool,
    pub const_param: bool,
    pub reference_param: bool,
}

/// How a script node is spawned in the editor palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnerKind {
    Function,
    Event,
    Variable,
    Delegate,
    Bound,
    Component,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinDirection {
    #[default]
    Input,
    Output,
}

/// A visual-script node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeFacts {
    /// Documentation excerpt name; the node DocId.
    pub id: String,
    pub short_title: String,
    pub full_title: String,
    pub description: String,
    pub category: String,
    pub native: bool,
    pub spawner: SpawnerKind,
    pub node_class: String,
    /// Pre-rendered thumbnail, if the renderer produced one.
    pub image: Option<String>,
    pub function: Option<FunctionFacts>,
    pub pins: Vec<PinFacts>,
}

/// The function a call node targets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FunctionFacts {
    pub name: String,
    pub comment: String,
    pub is_static: bool,
    pub is_const: bool,
    pub autocast: bool,
    pub blueprint_event: bool,
    pub access: Access,
    pub return_type: Option<String>,
    pub params: Vec<ParamFacts>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParamFacts {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub const_param: bool,
    pub reference_param: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PinFacts {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    pub direction: PinDirection,
    pub hidden: bool,
    pub exec: bool,
}

// -- Entity identity ----------------------------------------------------------

/// Reference identity of one shared facts record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(usize);

impl EntityKey {
    pub fn of<T>(rc: &Rc<T>) -> Self {
        EntityKey(Rc::as_ptr(rc) as usize)
    }
}

/// An entity the generator can key documents by without owning it.
pub trait Documentable: Sized {
    type Weak;
    type Key: Hash + Eq + Clone + fmt::Debug;

    fn downgrade(&self) -> Self::Weak;
    /// `None` once the upstream producer has dropped the entity.
    fn upgrade(weak: &Self::Weak) -> Option<Self>;
    fn key(&self) -> Self::Key;
}

impl<T> Documentable for Rc<T> {
    type Weak = Weak<T>;
    type Key = EntityKey;

    fn downgrade(&self) -> Weak<T> {
        Rc::downgrade(self)
    }

    fn upgrade(weak: &Weak<T>) -> Option<Self> {
        weak.upgrade()
    }

    fn key(&self) -> EntityKey {
        EntityKey::of(self)
    }
}

/// A script node together with the class it is documented under.
#[derive(Debug, Clone)]
pub struct NodeEntity {
    pub class: Rc<ClassFacts>,
    pub node: Rc<NodeFacts>,
}

impl Documentable for NodeEntity {
    type Weak = (Weak<ClassFacts>, Weak<NodeFacts>);
    type Key = (EntityKey, EntityKey);

    fn downgrade(&self) -> Self::Weak {
        (Rc::downgrade(&self.class), Rc::downgrade(&self.node))
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        Some(NodeEntity {
            class: weak.0.upgrade()?,
            node: weak.1.upgrade()?,
        })
    }

    fn key(&self) -> Self::Key {
        (EntityKey::of(&self.class), EntityKey::of(&self.node))
    }
}

/// A class variable documented on its own page.
#[derive(Debug, Clone)]
pub struct VariableEntity {
    pub class: Rc<ClassFacts>,
    pub member: Rc<MemberFacts>,
}

impl Documentable for VariableEntity {
    type Weak = (Weak<ClassFacts>, Weak<MemberFacts>);
    type Key = (EntityKey, EntityKey);

    fn downgrade(&self) -> Self::Weak {
        (Rc::downgrade(&self.class), Rc::downgrade(&self.member))
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        Some(VariableEntity {
            class: weak.0.upgrade()?,
            member: weak.1.upgrade()?,
        })
    }

    fn key(&self) -> Self::Key {
        (EntityKey::of(&self.class), EntityKey::of(&self.member))
    }
}

/// Entry point for type documentation, one variant per document kind.
#[derive(Debug, Clone)]
pub enum TypeEntity {
    Class(Rc<ClassFacts>),
    Struct(Rc<StructFacts>),
    Enum(Rc<EnumFacts>),
}

impl TypeEntity {
    pub fn name(&self) -> &str {
        match self {
            TypeEntity::Class(c) => &c.name,
            TypeEntity::Struct(s) => &s.name,
            TypeEntity::Enum(e) => &e.name,
        }
    }
}

// -- Sources ------------------------------------------------------------------

/// The enumerator boundary: everything one generation run documents.
pub trait FactsSource {
    fn classes(&self) -> Vec<Rc<ClassFacts>>;
    fn structs(&self) -> Vec<Rc<StructFacts>>;
    fn enums(&self) -> Vec<Rc<EnumFacts>>;
    fn nodes(&self) -> Vec<NodeEntity>;
    fn variables(&self) -> Vec<VariableEntity>;

    fn class_by_id(&self, id: &str) -> Option<Rc<ClassFacts>> {
        self.classes().into_iter().find(|c| c.name == id)
    }
}

/// In-memory [`FactsSource`] filled by a loader.
#[derive(Debug, Default)]
pub struct FactsRegistry {
    classes: Vec<Rc<ClassFacts>>,
    structs: Vec<Rc<StructFacts>>,
    enums: Vec<Rc<EnumFacts>>,
    nodes: Vec<NodeEntity>,
    variables: Vec<VariableEntity>,
}

impl FactsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: ClassFacts) -> Rc<ClassFacts> {
        let rc = Rc::new(class);
        self.classes.push(Rc::clone(&rc));
        rc
    }

    pub fn add_struct(&mut self, facts: StructFacts) -> Rc<StructFacts> {
        let rc = Rc::new(facts);
        self.structs.push(Rc::clone(&rc));
        rc
    }

    pub fn add_enum(&mut self, facts: EnumFacts) -> Rc<EnumFacts> {
        let rc = Rc::new(facts);
        self.enums.push(Rc::clone(&rc));
        rc
    }

    /// Attach a node to the class named `class_id`. Returns `false` when no
    /// such class is registered.
    pub fn add_node(&mut self, class_id: &str, node: NodeFacts) -> bool {
        match self.class_by_id(class_id) {
            Some(class) => {
                self.nodes.push(NodeEntity {
                    class,
                    node: Rc::new(node),
                });
                true
            }
            None => false,
        }
    }

    /// Attach a variable to the class named `class_id`.
    pub fn add_variable(&mut self, class_id: &str, member: MemberFacts) -> bool {
        match self.class_by_id(class_id) {
            Some(class) => {
                self.variables.push(VariableEntity {
                    class,
                    member: Rc::new(member),
                });
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.structs.is_empty() && self.enums.is_empty()
    }
}

impl FactsSource for FactsRegistry {
    fn classes(&self) -> Vec<Rc<ClassFacts>> {
        self.classes.clone()
    }

    fn structs(&self) -> Vec<Rc<StructFacts>> {
        self.structs.clone()
    }

    fn enums(&self) -> Vec<Rc<EnumFacts>> {
        self.enums.clone()
    }

    fn nodes(&self) -> Vec<NodeEntity> {
        self.nodes.clone()
    }

    fn variables(&self) -> Vec<VariableEntity> {
        self.variables.clone()
    }

    fn class_by_id(&self, id: &str) -> Option<Rc<ClassFacts>> {
        self.classes.iter().find(|c| c.name == id).cloned()
    }
}
