use std::fmt;

use crate::Vec3;

/// Axis-aligned bounding box grown point by point.
///
/// An empty box (no point added yet) has no extents; `size` and `center`
/// report zero for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn min(&self) -> Option<Vec3> {
        (!self.is_empty()).then_some(self.min)
    }

    pub fn max(&self) -> Option<Vec3> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Width/height/depth of the box.
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<empty>");
        }
        let size = self.size();
        write!(
            f,
            "width {} [{}, {}], height {} [{}, {}], depth {} [{}, {}]",
            size.x, self.min.x, self.max.x, size.y, self.min.y, self.max.y, size.z, self.min.z,
            self.max.z
        )
    }
}
