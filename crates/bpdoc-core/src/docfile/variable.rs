//! Variable documents: `Classes/<classId>/variables/<id>.<ext>`, keyed by
//! the (class, member) pair and summarized under the owning class document.

use super::class::ClassDoc;
use super::members::{blueprint_access, editor_access, is_member_visible, member_display_name, member_type};
use super::{DocKind, DocPath};
use crate::comment::generate_doxygen_node;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::facts::VariableEntity;
use crate::text::description_or_empty;
use crate::tree::DocTreeNode;

pub const VARIABLES_DIR: &str = "variables";

pub struct VariableDoc;

impl DocKind for VariableDoc {
    type Entity = VariableEntity;

    const KIND: &'static str = "variable";

    fn doc_id(entity: &VariableEntity) -> String {
        entity.member.name.clone()
    }

    fn display_name(entity: &VariableEntity) -> String {
        member_display_name(&entity.member)
    }

    fn doc_path(entity: &VariableEntity) -> DocPath {
        DocPath::new(
            ClassDoc::class_dir(&entity.class.name).join(VARIABLES_DIR),
            entity.member.name.as_str(),
        )
    }

    fn init_doc_tree(entity: &VariableEntity, docs_name: &str, class_doc: Option<&DocTreeNode>) -> DocTreeNode {
        let member = &entity.member;
        let class_id = class_doc
            .and_then(|c| c.child_value("id"))
            .map(str::to_string)
            .unwrap_or_else(|| ClassDoc::doc_id(&entity.class));
        let class_name = class_doc
            .and_then(|c| c.child_value("display_name"))
            .map(str::to_string)
            .unwrap_or_else(|| ClassDoc::display_name(&entity.class));

        let mut tree = DocTreeNode::root();
        tree.append_child_with_value_escaped("doctype", Self::KIND);
        tree.append_child_with_value_escaped("docs_name", docs_name);
        tree.append_child_with_value_escaped("class_id", class_id);
        tree.append_child_with_value_escaped("class_name", class_name);
        tree.append_child_with_value_escaped("id", Self::doc_id(entity));
        tree.append_child_with_value_escaped("display_name", Self::display_name(entity));
        tree.append_child_with_value_escaped("type", member_type(member));
        tree.append_child_with_value_escaped("category", member.category.as_str());
        if let Some(access) = blueprint_access(member) {
            tree.append_child_with_value("blueprint_access", access);
        }
        if let Some(access) = editor_access(member) {
            tree.append_child_with_value("editor_access", access);
        }
        tree.append_child_with_value_escaped(
            "description",
            description_or_empty(&member.description, &member.name),
        );
        tree
    }

    fn update_parent_doc(class_doc: &mut DocTreeNode, entity: &VariableEntity) {
        let item = class_doc.child_or_insert("variables").append_child("variable");
        item.append_child_with_value_escaped("id", Self::doc_id(entity));
        item.append_child_with_value_escaped("display_name", Self::display_name(entity));
        item.append_child_with_value_escaped("type", member_type(&entity.member));
        item.append_child_with_value_escaped(
            "description",
            description_or_empty(&entity.member.description, &entity.member.name),
        );
    }

    fn generate_type_members(tree: &mut DocTreeNode, entity: &VariableEntity, diag: &mut Diagnostics) -> bool {
        if !generate_doxygen_node(&entity.member.comment, tree) {
            diag.warn(
                WarningKind::MissingDescription,
                format!(
                    "No description for variable: {}::{}",
                    entity.class.name, entity.member.name
                ),
            );
        }
        is_member_visible(&entity.member)
    }
}
