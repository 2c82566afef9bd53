//! Per-run warning collector.
//!
//! Warnings never change what gets generated. They are recorded here, echoed
//! through `tracing`, and handed to the caller when the run ends.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A documented entity or own member has no doc comment.
    MissingDescription,
    /// A node was rejected by the documentability filter.
    NotDocumentable,
    /// A node names no usable target function, or an image could not be provided.
    MissingTarget,
    /// An entity was dropped upstream before its document was saved.
    StaleEntity,
    /// Two entities of one kind share a DocId.
    DuplicateId,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::MissingDescription => "missing-description",
            WarningKind::NotDocumentable => "not-documentable",
            WarningKind::MissingTarget => "missing-target",
            WarningKind::StaleEntity => "stale-entity",
            WarningKind::DuplicateId => "duplicate-id",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = kind.as_str(), "{}", message);
        self.warnings.push(Warning { kind, message });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Drain every recorded warning.
    pub fn take(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
