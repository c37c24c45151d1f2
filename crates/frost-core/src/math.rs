use serde::{Deserialize, Serialize};

use crate::error::FrostError;

/// A 2-component vector argument value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn components(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Mutable access to component `index` (0 = x, 1 = y).
    pub fn component_mut(&mut self, index: usize) -> Option<&mut f32> {
        match index {
            0 => Some(&mut self.x),
            1 => Some(&mut self.y),
            _ => None,
        }
    }
}

/// A 3-component vector argument value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn components(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Mutable access to component `index` (0 = x, 1 = y, 2 = z).
    pub fn component_mut(&mut self, index: usize) -> Option<&mut f32> {
        match index {
            0 => Some(&mut self.x),
            1 => Some(&mut self.y),
            2 => Some(&mut self.z),
            _ => None,
        }
    }
}

/// Dimensionality of a point space: a subtree is evaluated either on
/// `vec2` or on `vec3` points.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimension {
    Two,
    #[default]
    Three,
}

impl Dimension {
    /// Number of point components.
    pub fn components(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    /// GLSL point type for this dimension.
    pub fn glsl_point_type(self) -> &'static str {
        match self {
            Dimension::Two => "vec2",
            Dimension::Three => "vec3",
        }
    }
}

impl TryFrom<u8> for Dimension {
    type Error = FrostError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            other => Err(FrostError::InvalidArgument(format!(
                "dimension must be 2 or 3, got {}",
                other
            ))),
        }
    }
}

impl From<Dimension> for u8 {
    fn from(dim: Dimension) -> Self {
        dim.components() as u8
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}D", self.components())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_component_mut() {
        let mut v = Vec3::zero();
        *v.component_mut(2).unwrap() = 4.0;
        assert_eq!(v, Vec3::new(0.0, 0.0, 4.0));
        assert!(v.component_mut(3).is_none());
    }

    #[test]
    fn test_vec2_components() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(v.components(), [1.5, -2.0]);
    }

    #[test]
    fn test_dimension_from_u8() {
        assert_eq!(Dimension::try_from(2).unwrap(), Dimension::Two);
        assert_eq!(Dimension::try_from(3).unwrap(), Dimension::Three);
        assert!(Dimension::try_from(4).is_err());
    }

    #[test]
    fn test_dimension_glsl_type() {
        assert_eq!(Dimension::Two.glsl_point_type(), "vec2");
        assert_eq!(Dimension::Three.glsl_point_type(), "vec3");
        assert_eq!(Dimension::Three.to_string(), "3D");
    }
}
