//! Struct documents: `Structs/<id>.<ext>`, summarized under the index.

use super::members::{generate_members, MemberHost, MemberSection};
use super::{DocKind, DocPath};
use crate::comment::generate_doxygen_node;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::facts::StructFacts;
use crate::text::{
    bool_str, description_or_empty, display_name_or, nativeness, short_description, type_hierarchy,
};
use crate::tree::DocTreeNode;
use std::rc::Rc;

pub const STRUCTS_DIR: &str = "Structs";

pub struct StructDoc;

impl DocKind for StructDoc {
    type Entity = Rc<StructFacts>;

    const KIND: &'static str = "struct";

    fn doc_id(facts: &Rc<StructFacts>) -> String {
        facts.name.clone()
    }

    fn display_name(facts: &Rc<StructFacts>) -> String {
        display_name_or(&facts.display_name, &facts.name)
    }

    fn doc_path(facts: &Rc<StructFacts>) -> DocPath {
        DocPath::new(STRUCTS_DIR, facts.name.as_str())
    }

    fn init_doc_tree(facts: &Rc<StructFacts>, docs_name: &str, _parent: Option<&DocTreeNode>) -> DocTreeNode {
        let display_name = Self::display_name(facts);
        let mut tree = DocTreeNode::root();
        tree.append_child_with_value_escaped("doctype", Self::KIND);
        tree.append_child_with_value_escaped("docs_name", docs_name);
        tree.append_child_with_value_escaped("id", Self::doc_id(facts));
        tree.append_child_with_value_escaped("display_name", display_name.as_str());
        tree.append_child_with_value_escaped(
            "description",
            description_or_empty(&facts.description, &facts.name),
        );
        tree.append_child_with_value_escaped("sourcepath", facts.source_path.as_str());
        tree.append_child_with_value_escaped("classTree", type_hierarchy(&facts.hierarchy, &display_name));
        tree.append_child_with_value("blueprint_type", bool_str(facts.blueprint_type));
        tree
    }

    fn update_parent_doc(index: &mut DocTreeNode, facts: &Rc<StructFacts>) {
        let item = index.child_or_insert("structs").append_child("struct");
        item.append_child_with_value_escaped("id", Self::doc_id(facts));
        item.append_child_with_value_escaped("display_name", Self::display_name(facts));
        item.append_child_with_value_escaped(
            "description",
            short_description(&facts.short_description, &facts.description, &facts.name),
        );
        item.append_child_with_value_escaped("type", nativeness(facts.native));
        item.append_child_with_value("blueprint_type", bool_str(facts.blueprint_type));
    }

    fn generate_type_members(tree: &mut DocTreeNode, facts: &Rc<StructFacts>, diag: &mut Diagnostics) -> bool {
        if !generate_doxygen_node(&facts.comment, tree) {
            diag.warn(
                WarningKind::MissingDescription,
                format!("No description for UScriptStruct: {}", facts.name),
            );
        }

        let host = MemberHost {
            id: &facts.name,
            context: "UScriptStruct-property",
        };
        let mut keep = facts.blueprintable || facts.blueprint_type;
        keep |= generate_members(tree, MemberSection::Fields, &facts.fields, host, diag);
        keep
    }
}
