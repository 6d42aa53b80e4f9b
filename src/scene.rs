//! Fixed-capacity list of annotations the host draws in the 3D scene each frame.

use glam::DVec3;

use crate::Color;

/// Label text keeps at most this many characters, like the host's fixed buffer.
pub const LABEL_CAPACITY: usize = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomKind {
    Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneGeom {
    pub kind: GeomKind,
    pub size: [f64; 3],
    pub pos: DVec3,
    pub rgba: Color,
    pub label: String,
}

impl SceneGeom {
    /// Text label, truncated to [`LABEL_CAPACITY`] characters.
    pub fn label(text: &str, pos: DVec3, size: f64, rgba: Color) -> Self {
        Self {
            kind: GeomKind::Label,
            size: [size; 3],
            pos,
            rgba,
            label: text.chars().take(LABEL_CAPACITY).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    geoms: Vec<SceneGeom>,
    max_geom: usize,
}

impl Scene {
    pub fn with_capacity(max_geom: usize) -> Self {
        Self {
            geoms: Vec::with_capacity(max_geom),
            max_geom,
        }
    }

    pub fn ngeom(&self) -> usize {
        self.geoms.len()
    }

    pub fn max_geom(&self) -> usize {
        self.max_geom
    }

    pub fn has_capacity(&self) -> bool {
        self.geoms.len() < self.max_geom
    }

    pub fn geoms(&self) -> &[SceneGeom] {
        &self.geoms
    }

    /// Appends `geom` if there is room. A full buffer drops it and returns `false`.
    pub fn push(&mut self, geom: SceneGeom) -> bool {
        if !self.has_capacity() {
            return false;
        }
        self.geoms.push(geom);
        true
    }

    /// Empties the buffer for the next frame.
    pub fn clear(&mut self) {
        self.geoms.clear();
    }
}
