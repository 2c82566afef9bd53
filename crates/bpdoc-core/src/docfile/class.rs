//! Class documents: `Classes/<id>/<id>.<ext>`, summarized under the index.

use super::members::{generate_members, MemberHost, MemberSection};
use super::{DocKind, DocPath};
use crate::comment::generate_doxygen_node;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::facts::ClassFacts;
use crate::text::{
    bool_str, description_or_empty, display_name_or, nativeness, short_description, type_hierarchy,
};
use crate::tree::DocTreeNode;
use std::path::Path;
use std::rc::Rc;

pub const CLASSES_DIR: &str = "Classes";

const INTERFACE_DESCRIPTION: &str = "*Interface cannot be documented*";

pub struct ClassDoc;

impl ClassDoc {
    /// Directory holding the class document and its nodes, variables and images.
    pub fn class_dir(id: &str) -> std::path::PathBuf {
        Path::new(CLASSES_DIR).join(id)
    }

    fn description(class: &ClassFacts) -> &str {
        if class.interface {
            INTERFACE_DESCRIPTION
        } else {
            description_or_empty(&class.description, &class.name)
        }
    }
}

impl DocKind for ClassDoc {
    type Entity = Rc<ClassFacts>;

    const KIND: &'static str = "class";

    fn doc_id(class: &Rc<ClassFacts>) -> String {
        class.name.clone()
    }

    fn display_name(class: &Rc<ClassFacts>) -> String {
        display_name_or(&class.display_name, &class.name)
    }

    fn doc_path(class: &Rc<ClassFacts>) -> DocPath {
        DocPath::new(Self::class_dir(&class.name), class.name.as_str())
    }

    fn init_doc_tree(class: &Rc<ClassFacts>, docs_name: &str, _parent: Option<&DocTreeNode>) -> DocTreeNode {
        let mut tree = DocTreeNode::root();
        tree.append_child_with_value_escaped("doctype", Self::KIND);
        tree.append_child_with_value_escaped("docs_name", docs_name);
        tree.append_child_with_value_escaped("id", Self::doc_id(class));
        tree.append_child_with_value_escaped("display_name", Self::display_name(class));
        tree.append_child_with_value_escaped("description", Self::description(class));
        tree.append_child_with_value_escaped("sourcepath", class.source_path.as_str());
        tree.append_child_with_value_escaped(
            "classTree",
            type_hierarchy(&class.hierarchy, &Self::display_name(class)),
        );
        tree.append_child_with_value("blueprint_type", bool_str(class.blueprint_type));
        tree.append_child_with_value("blueprintable", bool_str(class.blueprintable));
        tree.append_child_with_value("abstract", bool_str(class.is_abstract));

        if !class.interfaces.is_empty() {
            let list = tree.append_child("interfaces");
            for interface in &class.interfaces {
                let item = list.append_child("interface");
                item.append_child_with_value_escaped("id", interface.id.as_str());
                item.append_child_with_value_escaped(
                    "display_name",
                    display_name_or(&interface.display_name, &interface.id),
                );
                item.append_child_with_value_escaped(
                    "description",
                    description_or_empty(&interface.description, &interface.id),
                );
                item.append_child_with_value("native", bool_str(interface.native));
            }
        }
        tree
    }

    fn update_parent_doc(index: &mut DocTreeNode, class: &Rc<ClassFacts>) {
        let item = index.child_or_insert("classes").append_child("class");
        item.append_child_with_value_escaped("id", Self::doc_id(class));
        item.append_child_with_value_escaped("display_name", Self::display_name(class));
        item.append_child_with_value_escaped(
            "description",
            short_description(&class.short_description, &class.description, &class.name),
        );
        item.append_child_with_value_escaped("type", nativeness(class.native));
        item.append_child_with_value_escaped("group", class.group.as_str());
        item.append_child_with_value("blueprint_type", bool_str(class.blueprint_type));
        item.append_child_with_value("blueprintable", bool_str(class.blueprintable));
        item.append_child_with_value("abstract", bool_str(class.is_abstract));
    }

    fn generate_type_members(tree: &mut DocTreeNode, class: &Rc<ClassFacts>, diag: &mut Diagnostics) -> bool {
        let host = MemberHost {
            id: &class.name,
            context: "UClass-MemberTag",
        };
        let mut keep = class.blueprintable || class.blueprint_type;
        keep |= generate_members(tree, MemberSection::Fields, &class.fields, host, diag);
        keep |= generate_members(tree, MemberSection::Events, &class.events, host, diag);
        keep &= !class.hidden;

        if !generate_doxygen_node(&class.comment, tree) {
            diag.warn(
                WarningKind::MissingDescription,
                format!("No description for UClass: {}", class.name),
            );
        }
        keep
    }
}
