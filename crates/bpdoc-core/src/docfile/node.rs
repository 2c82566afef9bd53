//! Node documents: `Classes/<classId>/nodes/<title>.<ext>`, summarized under
//! the owning class document.

use super::class::ClassDoc;
use super::{DocKind, DocPath};
use crate::comment::generate_doxygen_node;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::facts::{FunctionFacts, NodeEntity, NodeFacts, PinDirection, PinFacts, SpawnerKind};
use crate::image::IMG_DIR;
use crate::text::{
    bool_str, description_or_empty, file_stem_for_title, name_to_display_string, nativeness,
    strip_target_line, type_signature,
};
use crate::tree::DocTreeNode;

pub const NODES_DIR: &str = "nodes";

pub struct NodeDoc;

impl NodeDoc {
    /// Link the image a provider placed for the node.
    pub fn set_image(tree: &mut DocTreeNode, file_name: &str) {
        if tree.find_child_by_name("imgpath").is_none() {
            tree.append_child_with_value_escaped("imgpath", format!("../{}/{}", IMG_DIR, file_name));
        }
    }

    pub fn short_title(node: &NodeFacts) -> String {
        let title = node.short_title.trim_end();
        if title.is_empty() {
            name_to_display_string(&node.id, false)
        } else {
            title.to_string()
        }
    }

    pub fn full_title(node: &NodeFacts) -> String {
        let full = strip_target_line(&node.full_title);
        if full.trim().is_empty() {
            Self::short_title(node)
        } else {
            full.to_string()
        }
    }

    pub fn description(node: &NodeFacts) -> String {
        let tooltip = strip_target_line(&node.description);
        description_or_empty(tooltip, &Self::short_title(node)).to_string()
    }

    /// `"<ret> <name>(<params>)[ const]"`.
    pub fn raw_signature(function: &FunctionFacts) -> String {
        let params = function
            .params
            .iter()
            .map(|p| {
                format!(
                    "{} {}",
                    type_signature(&p.type_name, p.const_param, p.reference_param),
                    p.name
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} {}({}){}",
            function.return_type.as_deref().unwrap_or("void"),
            function.name,
            params,
            if function.is_const { " const" } else { "" }
        )
    }

    fn pin_name(pin: &PinFacts) -> &str {
        if pin.name.is_empty() && pin.exec {
            match pin.direction {
                PinDirection::Input => "In",
                PinDirection::Output => "Out",
            }
        } else {
            &pin.name
        }
    }
}

impl DocKind for NodeDoc {
    type Entity = NodeEntity;

    const KIND: &'static str = "node";

    fn doc_id(entity: &NodeEntity) -> String {
        entity.node.id.clone()
    }

    fn display_name(entity: &NodeEntity) -> String {
        Self::short_title(&entity.node)
    }

    fn doc_path(entity: &NodeEntity) -> DocPath {
        let mut stem = file_stem_for_title(&Self::short_title(&entity.node));
        if stem.is_empty() {
            stem = entity.node.id.clone();
        }
        DocPath::new(ClassDoc::class_dir(&entity.class.name).join(NODES_DIR), stem)
    }

    fn init_doc_tree(entity: &NodeEntity, docs_name: &str, class_doc: Option<&DocTreeNode>) -> DocTreeNode {
        let node = &entity.node;
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
        tree.append_child_with_value_escaped("shorttitle", Self::short_title(node));
        tree.append_child_with_value_escaped("fulltitle", Self::full_title(node));
        tree.append_child_with_value_escaped("description", Self::description(node));
        tree.append_child_with_value_escaped("category", node.category.as_str());

        if let Some(function) = &node.function {
            tree.append_child_with_value_escaped("funcname", function.name.as_str());
            tree.append_child_with_value_escaped("rawcomment", function.comment.as_str());
            tree.append_child_with_value("static", bool_str(function.is_static));
            tree.append_child_with_value("autocast", bool_str(function.autocast));
            tree.append_child_with_value_escaped("rawsignature", Self::raw_signature(function));
            generate_doxygen_node(&function.comment, &mut tree);
        }

        for pin in node.pins.iter().filter(|p| !p.hidden) {
            let section = match pin.direction {
                PinDirection::Input => "inputs",
                PinDirection::Output => "outputs",
            };
            let param = tree.child_or_insert(section).append_child("param");
            param.append_child_with_value_escaped("name", Self::pin_name(pin));
            param.append_child_with_value_escaped("type", pin.type_name.as_str());
            param.append_child_with_value_escaped("description", pin.description.as_str());
        }
        tree
    }

    fn update_parent_doc(class_doc: &mut DocTreeNode, entity: &NodeEntity) {
        let item = class_doc.child_or_insert("nodes").append_child("node");
        item.append_child_with_value_escaped("id", Self::doc_id(entity));
        item.append_child_with_value_escaped("shorttitle", Self::short_title(&entity.node));
        item.append_child_with_value_escaped("description", Self::description(&entity.node));
        item.append_child_with_value_escaped("type", nativeness(entity.node.native));
    }

    /// Nodes carry no member sections and are always kept.
    fn generate_type_members(_tree: &mut DocTreeNode, entity: &NodeEntity, diag: &mut Diagnostics) -> bool {
        let node = &entity.node;
        if node.spawner == SpawnerKind::Function && node.function.is_none() {
            diag.warn(
                WarningKind::MissingTarget,
                format!("Failed to get target function for node {}", Self::full_title(node)),
            );
        }
        true
    }
}
