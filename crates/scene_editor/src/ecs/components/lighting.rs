//! Lighting component
//!
//! Pure data: light kind, colour and range. Direction and position come from
//! the owning entity's world matrix.

use crate::foundation::math::Vec3;

/// Types of lights supported by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    /// Parallel rays along the entity's forward axis
    #[default]
    Directional,
    /// Radiates in all directions from the entity's position
    Point,
    /// Cone of light from the entity's position
    Spot,
}

/// Light data for entities carrying [`EntityFlags::LIGHT`](crate::ecs::EntityFlags::LIGHT)
#[derive(Debug, Clone, PartialEq)]
pub struct LightComponent {
    /// The type of light
    pub light_type: LightType,
    /// RGB colour (0.0 to 1.0 range)
    pub color: Vec3,
    /// Attenuation radius for point and spot lights
    pub radius: f32,
    /// Cone falloff for spot lights
    pub spot_falloff: f32,
    /// Whether this light casts shadows
    pub cast_shadows: bool,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            color: Vec3::new(1.0, 1.0, 1.0),
            radius: 1.0,
            spot_falloff: 0.0,
            cast_shadows: false,
        }
    }
}

/// Factory functions for light components
pub struct LightFactory;

impl LightFactory {
    /// Directional light of the given colour
    pub fn directional(color: Vec3) -> LightComponent {
        LightComponent {
            light_type: LightType::Directional,
            color,
            cast_shadows: true,
            ..Default::default()
        }
    }

    /// Point light with an attenuation radius
    pub fn point(color: Vec3, radius: f32) -> LightComponent {
        LightComponent {
            light_type: LightType::Point,
            color,
            radius,
            ..Default::default()
        }
    }
}
