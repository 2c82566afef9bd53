//! Enum documents: `Enums/<id>.<ext>`, summarized under the index.

use super::{DocKind, DocPath};
use crate::comment::generate_doxygen_node;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::facts::EnumFacts;
use crate::text::{bool_str, description_or_empty, display_name_or, nativeness, short_description};
use crate::tree::DocTreeNode;
use std::rc::Rc;

pub const ENUMS_DIR: &str = "Enums";

pub struct EnumDoc;

impl DocKind for EnumDoc {
    type Entity = Rc<EnumFacts>;

    const KIND: &'static str = "enum";

    fn doc_id(facts: &Rc<EnumFacts>) -> String {
        facts.name.clone()
    }

    fn display_name(facts: &Rc<EnumFacts>) -> String {
        display_name_or(&facts.display_name, &facts.name)
    }

    fn doc_path(facts: &Rc<EnumFacts>) -> DocPath {
        DocPath::new(ENUMS_DIR, facts.name.as_str())
    }

    fn init_doc_tree(facts: &Rc<EnumFacts>, docs_name: &str, _parent: Option<&DocTreeNode>) -> DocTreeNode {
        let mut tree = DocTreeNode::root();
        tree.append_child_with_value_escaped("doctype", Self::KIND);
        tree.append_child_with_value_escaped("docs_name", docs_name);
        tree.append_child_with_value_escaped("id", Self::doc_id(facts));
        tree.append_child_with_value_escaped("display_name", Self::display_name(facts));
        tree.append_child_with_value_escaped(
            "description",
            description_or_empty(&facts.description, &facts.name),
        );
        tree.append_child_with_value_escaped("sourcepath", facts.source_path.as_str());
        tree.append_child_with_value("blueprint_type", bool_str(facts.blueprint_type));
        tree
    }

    fn update_parent_doc(index: &mut DocTreeNode, facts: &Rc<EnumFacts>) {
        let item = index.child_or_insert("enums").append_child("enum");
        item.append_child_with_value_escaped("id", Self::doc_id(facts));
        item.append_child_with_value_escaped("display_name", Self::display_name(facts));
        item.append_child_with_value_escaped(
            "description",
            short_description(&facts.short_description, &facts.description, &facts.name),
        );
        item.append_child_with_value_escaped("type", nativeness(facts.native));
        item.append_child_with_value("blueprint_type", bool_str(facts.blueprint_type));
    }

    fn generate_type_members(tree: &mut DocTreeNode, facts: &Rc<EnumFacts>, diag: &mut Diagnostics) -> bool {
        if !generate_doxygen_node(&facts.comment, tree) {
            diag.warn(
                WarningKind::MissingDescription,
                format!("No description for UEnum: {}", facts.name),
            );
        }

        let values = tree.child_or_insert("values");
        for value in facts.values.iter().filter(|v| !v.hidden && !v.spacer) {
            let item = values.append_child("value");
            item.append_child_with_value_escaped("name", value.name.as_str());
            item.append_child_with_value_escaped(
                "displayname",
                display_name_or(&value.display_name, &value.name),
            );
            item.append_child_with_value_escaped("description", value.description.as_str());
        }

        facts.blueprint_type
    }
}
