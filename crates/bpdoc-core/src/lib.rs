//! bpdoc-core — document trees, doc files and multi-format serialization for
//! visual-script API documentation.
//!
//! An upstream enumerator supplies entity facts through a
//! [`facts::FactsSource`]. The [`generator::Generator`] turns them into one
//! [`tree::DocTreeNode`] per documented entity, folds summaries into parent
//! documents, and writes every tree through each requested output format.

pub mod comment;
pub mod diagnostics;
pub mod docfile;
pub mod error;
pub mod facts;
pub mod filter;
pub mod generator;
pub mod image;
pub mod serialize;
pub mod text;
pub mod tree;

pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use error::{DocGenError, Result};
pub use facts::{FactsRegistry, FactsSource, NodeEntity, TypeEntity, VariableEntity};
pub use generator::{GenerationStats, Generator, GeneratorOptions, SaveReport};
pub use image::{CopyImageProvider, ImageProvider, NoImages};
pub use serialize::{Format, OutputFormat, Serializer};
pub use tree::{DocTreeNode, DocValue};
