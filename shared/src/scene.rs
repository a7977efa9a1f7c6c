use crate::color::Rgb;
use crate::error::SceneError;
use crate::geometry::{Point, Rect, ViewMapping};

/// Tags that are filled directly when clicked, or when they are the nearest
/// ancestor of the clicked element.
pub const FILLABLE_TAGS: [&str; 6] = ["path", "circle", "ellipse", "rect", "polygon", "g"];

/// Elements considered by the bounding-box scan, in document order.
pub const CANDIDATE_SELECTOR: &str = "[id], path, circle, ellipse, rect, polygon";

pub fn is_fillable_tag(tag: &str) -> bool {
    FILLABLE_TAGS
        .iter()
        .any(|fillable| fillable.eq_ignore_ascii_case(tag))
}

/// Access to the embedded vector document and the page around it.
pub trait VectorScene {
    type Shape: Clone;

    /// Topmost element under a page coordinate.
    fn element_at(&self, screen: Point) -> Option<Self::Shape>;

    fn tag_name(&self, shape: &Self::Shape) -> String;

    fn parent(&self, shape: &Self::Shape) -> Option<Self::Shape>;

    /// Where the document's container sits on the page and the document's
    /// declared view box. Fails with [`SceneError::Inaccessible`] when the
    /// document's contents cannot be read.
    fn mapping(&self) -> Result<ViewMapping, SceneError>;

    /// Elements matching [`CANDIDATE_SELECTOR`], in document order.
    fn candidates(&self) -> Result<Vec<Self::Shape>, SceneError>;

    fn bounding_box(&self, shape: &Self::Shape) -> Result<Rect, SceneError>;

    fn set_fill(&mut self, shape: &Self::Shape, color: Rgb) -> Result<(), SceneError>;

    /// Short label for logs.
    fn describe(&self, shape: &Self::Shape) -> String;
}

/// Resolves a page click to the shape a smart fill should recolor.
pub fn resolve_fill_target<S: VectorScene>(
    scene: &S,
    screen: Point,
) -> Result<Option<S::Shape>, SceneError> {
    if let Some(shape) = closest_fillable(scene, scene.element_at(screen)) {
        log::debug!("Fill target under pointer: {}", scene.describe(&shape));
        return Ok(Some(shape));
    }

    let mapping = match scene.mapping() {
        Ok(mapping) => mapping,
        Err(SceneError::Inaccessible) => {
            log::debug!("Vector document not accessible, skipping bounding box scan");
            return Ok(None);
        }
        Err(error) => return Err(error),
    };
    let Some(point) = mapping.to_document(screen) else {
        return Ok(None);
    };

    let candidates = scene.candidates()?;
    let boxed = candidates
        .into_iter()
        .filter_map(|shape| match scene.bounding_box(&shape) {
            Ok(bounds) => Some((shape, bounds)),
            Err(error) => {
                log::trace!("Skipping {}: {error}", scene.describe(&shape));
                None
            }
        });
    Ok(first_hit(boxed, point))
}

/// First shape, in iteration order, whose bounding box contains `point`.
pub fn first_hit<T>(shapes: impl IntoIterator<Item = (T, Rect)>, point: Point) -> Option<T> {
    shapes
        .into_iter()
        .find(|(_, bounds)| bounds.contains(point))
        .map(|(shape, _)| shape)
}

fn closest_fillable<S: VectorScene>(scene: &S, start: Option<S::Shape>) -> Option<S::Shape> {
    let mut current = start;
    while let Some(shape) = current {
        if is_fillable_tag(&scene.tag_name(&shape)) {
            return Some(shape);
        }
        current = scene.parent(&shape);
    }
    None
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::Cell;

    use super::*;

    pub struct MockElement {
        pub tag: &'static str,
        pub parent: Option<usize>,
        pub bounds: Option<Rect>,
        pub candidate: bool,
        pub fill: Option<Rgb>,
    }

    /// Page elements by index; `hit` is what sits under the pointer.
    pub struct MockScene {
        pub elements: Vec<MockElement>,
        pub hit: Option<usize>,
        pub mapping: Option<ViewMapping>,
        pub bbox_calls: Cell<usize>,
    }

    impl MockScene {
        pub fn new(mapping: Option<ViewMapping>) -> Self {
            Self {
                elements: Vec::new(),
                hit: None,
                mapping,
                bbox_calls: Cell::new(0),
            }
        }

        pub fn add(&mut self, tag: &'static str, bounds: Option<Rect>) -> usize {
            self.elements.push(MockElement {
                tag,
                parent: None,
                bounds,
                candidate: true,
                fill: None,
            });
            self.elements.len() - 1
        }
    }

    impl VectorScene for MockScene {
        type Shape = usize;

        fn element_at(&self, _screen: Point) -> Option<usize> {
            self.hit
        }

        fn tag_name(&self, shape: &usize) -> String {
            self.elements[*shape].tag.to_string()
        }

        fn parent(&self, shape: &usize) -> Option<usize> {
            self.elements[*shape].parent
        }

        fn mapping(&self) -> Result<ViewMapping, SceneError> {
            self.mapping.ok_or(SceneError::Inaccessible)
        }

        fn candidates(&self) -> Result<Vec<usize>, SceneError> {
            Ok((0..self.elements.len())
                .filter(|index| self.elements[*index].candidate)
                .collect())
        }

        fn bounding_box(&self, shape: &usize) -> Result<Rect, SceneError> {
            self.bbox_calls.set(self.bbox_calls.get() + 1);
            self.elements[*shape]
                .bounds
                .ok_or_else(|| SceneError::NoBoundingBox(self.describe(shape)))
        }

        fn set_fill(&mut self, shape: &usize, color: Rgb) -> Result<(), SceneError> {
            self.elements[*shape].fill = Some(color);
            Ok(())
        }

        fn describe(&self, shape: &usize) -> String {
            format!("{}#{shape}", self.elements[*shape].tag)
        }
    }
}
