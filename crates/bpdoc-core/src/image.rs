//! Node thumbnails.
//!
//! Rendering happens upstream. A provider only places an already produced
//! image into a class's `img/` directory and reports its file name.

use crate::error::{DocGenError, Result};
use crate::facts::NodeEntity;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, next to `nodes/`, holding the images of one class.
pub const IMG_DIR: &str = "img";

/// File name of a node's image.
pub fn node_image_file(node_id: &str) -> String {
    format!("nd_img_{}.png", node_id)
}

pub trait ImageProvider {
    /// Whether this provider writes anything; the image directory is only
    /// created for providers that do.
    fn enabled(&self) -> bool {
        true
    }

    /// Place the image of `entity` in `img_dir` and return its file name, or
    /// `None` when the node has no image.
    fn provide(&self, entity: &NodeEntity, img_dir: &Path) -> Result<Option<String>>;
}

/// Provider that never produces an image.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImages;

impl ImageProvider for NoImages {
    fn enabled(&self) -> bool {
        false
    }

    fn provide(&self, _entity: &NodeEntity, _img_dir: &Path) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Copies the pre-rendered PNG named by the node facts.
///
/// Relative image paths resolve against `base_dir`, normally the directory
/// of the manifest that listed the node.
#[derive(Debug, Clone)]
pub struct CopyImageProvider {
    base_dir: PathBuf,
}

impl CopyImageProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl ImageProvider for CopyImageProvider {
    fn provide(&self, entity: &NodeEntity, img_dir: &Path) -> Result<Option<String>> {
        let Some(source) = entity.node.image.as_deref() else {
            return Ok(None);
        };
        let source = self.base_dir.join(source);
        let file_name = node_image_file(&entity.node.id);
        let target = img_dir.join(&file_name);
        fs::copy(&source, &target).map_err(|e| DocGenError::io(&source, e))?;
        Ok(Some(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{ClassFacts, NodeFacts};
    use std::rc::Rc;

    fn entity(image: Option<&str>) -> NodeEntity {
        NodeEntity {
            class: Rc::new(ClassFacts::default()),
            node: Rc::new(NodeFacts {
                id: "Delay".into(),
                image: image.map(str::to_string),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn copies_named_image() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("delay.png"), b"png").unwrap();
        let img_dir = dir.path().join("out");
        fs::create_dir_all(&img_dir).unwrap();

        let provider = CopyImageProvider::new(dir.path());
        let name = provider.provide(&entity(Some("delay.png")), &img_dir).unwrap();
        assert_eq!(name.as_deref(), Some("nd_img_Delay.png"));
        assert_eq!(fs::read(img_dir.join("nd_img_Delay.png")).unwrap(), b"png");
    }

    #[test]
    fn node_without_image_yields_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = CopyImageProvider::new(dir.path());
        assert!(provider.provide(&entity(None), dir.path()).unwrap().is_none());
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = CopyImageProvider::new(dir.path());
        assert!(provider.provide(&entity(Some("nope.png")), dir.path()).is_err());
    }

    #[test]
    fn no_images_is_disabled() {
        assert!(!NoImages.enabled());
        assert!(NoImages.provide(&entity(Some("x.png")), Path::new(".")).unwrap().is_none());
    }
}
