//! Orchestration driver.
//!
//! Owns the index and every keyed doc file of a run, routes incoming entities
//! to the right one, and persists everything through every requested format
//! at the end.

use crate::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::docfile::members::is_member_visible;
use crate::docfile::{
    ClassDoc, ClassDocFile, DocFile, EnumDocFile, NodeDoc, NodeDocFile, ParentLink, RootDocFile, SaveOutcome,
    StructDocFile, VariableDocFile,
};
use crate::error::{DocGenError, Result};
use crate::facts::{ClassFacts, FactsSource, NodeEntity, TypeEntity, VariableEntity};
use crate::filter::rejection_reason;
use crate::image::{ImageProvider, IMG_DIR};
use crate::serialize::{create_formats, OutputFormat};
use crate::tree::DocTreeNode;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};

/// Settings of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Title of the index, repeated as `docs_name` in every document.
    pub docs_title: String,
    pub output_dir: PathBuf,
    /// Output format names, e.g. `["xml", "json"]`.
    pub formats: Vec<String>,
    /// Nodes come from script assets: event nodes are skipped.
    pub in_blueprint_context: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            docs_title: "Blueprint API".to_string(),
            output_dir: PathBuf::from("docs"),
            formats: vec!["xml".to_string()],
            in_blueprint_context: false,
        }
    }
}

/// Counters for the entities offered to a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    pub nodes: usize,
    pub nodes_rejected: usize,
    pub variables: usize,
    pub variables_rejected: usize,
    pub types_kept: usize,
    pub types_discarded: usize,
}

/// Totals of the final save pass.
pub type SaveReport = SaveOutcome;

pub struct Generator {
    options: GeneratorOptions,
    formats: Vec<Box<dyn OutputFormat>>,
    index: RootDocFile,
    classes: ClassDocFile,
    structs: StructDocFile,
    enums: EnumDocFile,
    nodes: NodeDocFile,
    variables: VariableDocFile,
    diagnostics: Diagnostics,
    stats: GenerationStats,
}

/// Tree a doc file of the given link folds its summaries into.
fn resolve_parent<'a>(
    link: ParentLink,
    index: &'a mut RootDocFile,
    classes: Option<&'a mut ClassDocFile>,
    owner: Option<&Rc<ClassFacts>>,
) -> Option<&'a mut DocTreeNode> {
    match link {
        ParentLink::None => None,
        ParentLink::Index => Some(index.tree_mut()),
        ParentLink::Class => match (classes, owner) {
            (Some(classes), Some(owner)) => classes.doc_tree_mut(owner),
            _ => None,
        },
    }
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        if options.formats.is_empty() {
            return Err(DocGenError::Config("at least one output format is required".into()));
        }
        let formats = create_formats(&options.formats)?;
        let title = options.docs_title.clone();
        Ok(Self {
            formats,
            index: RootDocFile::new(title.as_str()),
            classes: ClassDocFile::new(title.as_str(), ParentLink::Index),
            structs: StructDocFile::new(title.as_str(), ParentLink::Index),
            enums: EnumDocFile::new(title.as_str(), ParentLink::Index),
            nodes: NodeDocFile::new(title.as_str(), ParentLink::Class),
            variables: VariableDocFile::new(title.as_str(), ParentLink::Class),
            diagnostics: Diagnostics::new(),
            stats: GenerationStats::default(),
            options,
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Document a class, struct or enum. Returns whether it was kept.
    pub fn document_type(&mut self, entity: TypeEntity) -> bool {
        let kept = match &entity {
            TypeEntity::Class(class) => {
                let parent = resolve_parent(self.classes.parent(), &mut self.index, None, None);
                self.classes.generate_type_members(class, parent, &mut self.diagnostics)
            }
            TypeEntity::Struct(facts) => {
                let parent = resolve_parent(self.structs.parent(), &mut self.index, None, None);
                self.structs.generate_type_members(facts, parent, &mut self.diagnostics)
            }
            TypeEntity::Enum(facts) => {
                let parent = resolve_parent(self.enums.parent(), &mut self.index, None, None);
                self.enums.generate_type_members(facts, parent, &mut self.diagnostics)
            }
        };
        debug!(name = entity.name(), kept, "documented type");
        if kept {
            self.stats.types_kept += 1;
        } else {
            self.stats.types_discarded += 1;
        }
        kept
    }

    /// Document one script node under its owning class.
    ///
    /// Returns `false` when the node is filtered out. Image failures are
    /// warnings; only failing to create the image directory is an error.
    pub fn document_node(&mut self, entity: NodeEntity, images: &dyn ImageProvider) -> Result<bool> {
        let node = &entity.node;
        if let Some(reason) = rejection_reason(node, self.options.in_blueprint_context) {
            let node_class = if node.node_class.is_empty() {
                "None"
            } else {
                node.node_class.as_str()
            };
            self.diagnostics.warn(
                WarningKind::NotDocumentable,
                format!("Not documentable {} with node class {}: {}", node.id, node_class, reason),
            );
            self.stats.nodes_rejected += 1;
            return Ok(false);
        }

        let parent = resolve_parent(self.classes.parent(), &mut self.index, None, None);
        self.classes.get_or_create(&entity.class, parent, &mut self.diagnostics);

        let mut image = None;
        if images.enabled() {
            let img_dir = self
                .options
                .output_dir
                .join(ClassDoc::class_dir(&entity.class.name))
                .join(IMG_DIR);
            fs::create_dir_all(&img_dir).map_err(|e| DocGenError::io(&img_dir, e))?;
            match images.provide(&entity, &img_dir) {
                Ok(Some(file)) => {
                    debug!(node = %node.id, file = %file, "node image placed");
                    image = Some(file);
                }
                Ok(None) => {}
                Err(e) => self.diagnostics.warn(
                    WarningKind::MissingTarget,
                    format!("No image for node {}: {}", node.id, e),
                ),
            }
        }

        let parent = resolve_parent(
            self.nodes.parent(),
            &mut self.index,
            Some(&mut self.classes),
            Some(&entity.class),
        );
        let (tree, created) = self.nodes.get_or_create(&entity, parent, &mut self.diagnostics);
        if let Some(file) = image {
            NodeDoc::set_image(tree, &file);
        }
        self.nodes.generate_type_members(&entity, None, &mut self.diagnostics);
        if created {
            self.stats.nodes += 1;
        }
        Ok(true)
    }

    /// Document one class variable on its own page.
    pub fn document_variable(&mut self, entity: VariableEntity) -> bool {
        if !is_member_visible(&entity.member) {
            debug!(class = %entity.class.name, member = %entity.member.name, "variable not visible");
            self.stats.variables_rejected += 1;
            return false;
        }

        let parent = resolve_parent(self.classes.parent(), &mut self.index, None, None);
        self.classes.get_or_create(&entity.class, parent, &mut self.diagnostics);

        let parent = resolve_parent(
            self.variables.parent(),
            &mut self.index,
            Some(&mut self.classes),
            Some(&entity.class),
        );
        let (_, created) = self.variables.get_or_create(&entity, parent, &mut self.diagnostics);
        self.variables.generate_type_members(&entity, None, &mut self.diagnostics);
        if created {
            self.stats.variables += 1;
        }
        true
    }

    /// Document everything `source` offers: nodes and variables first, then
    /// classes, structs and enums.
    pub fn document_all(&mut self, source: &dyn FactsSource, images: &dyn ImageProvider) -> Result<GenerationStats> {
        for node in source.nodes() {
            self.document_node(node, images)?;
        }
        for variable in source.variables() {
            self.document_variable(variable);
        }
        for class in source.classes() {
            self.document_type(TypeEntity::Class(class));
        }
        for facts in source.structs() {
            self.document_type(TypeEntity::Struct(facts));
        }
        for facts in source.enums() {
            self.document_type(TypeEntity::Enum(facts));
        }
        info!(
            classes = self.classes.len(),
            structs = self.structs.len(),
            enums = self.enums.len(),
            nodes = self.nodes.len(),
            variables = self.variables.len(),
            "documentation generated"
        );
        Ok(self.stats.clone())
    }

    /// Write every document through every format.
    ///
    /// The first failure aborts the pass; files written before it remain.
    pub fn finalize(&mut self) -> Result<SaveReport> {
        let out_dir = &self.options.output_dir;
        let doc_files: [(&str, &dyn DocFile); 6] = [
            ("classes", &self.classes),
            ("enums", &self.enums),
            ("structs", &self.structs),
            ("nodes", &self.nodes),
            ("variables", &self.variables),
            ("index", &self.index),
        ];

        let mut report = SaveReport::default();
        for (label, doc_file) in doc_files {
            let outcome = doc_file.save(out_dir, &self.formats, &mut self.diagnostics)?;
            debug!(
                doc = label,
                documents = outcome.documents,
                skipped = outcome.skipped,
                "saved doc file"
            );
            report.merge(outcome);
        }
        info!(
            documents = report.documents,
            files = report.files.len(),
            skipped = report.skipped,
            out = %out_dir.display(),
            "documentation saved"
        );
        Ok(report)
    }

    pub fn index(&self) -> &RootDocFile {
        &self.index
    }

    pub fn classes(&self) -> &ClassDocFile {
        &self.classes
    }

    pub fn structs(&self) -> &StructDocFile {
        &self.structs
    }

    pub fn enums(&self) -> &EnumDocFile {
        &self.enums
    }

    pub fn nodes(&self) -> &NodeDocFile {
        &self.nodes
    }

    pub fn variables(&self) -> &VariableDocFile {
        &self.variables
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Warning> {
        self.diagnostics.take()
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }
}
