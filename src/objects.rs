//! The scene's objects, built from [`SceneConfig`](crate::config::SceneConfig) sections.

use cgmath::{Quaternion, Rad, Rotation3};
use instant::Duration;

use crate::{
    config::{BackdropConfig, LightRigConfig, SphereConfig},
    data_structures::{
        geometry::Geometry,
        material::{GradientMaterial, PhongMaterial},
        scene_graph::{Backdrop, Light, LightNode, Mesh, NodeBase, SceneNode, delegate_node_base},
        transform::Transform,
    },
};

/// Wireframe Phong sphere. Spins around the y axis when `spin` is non-zero.
pub struct SphereObject {
    base: NodeBase,
    mesh: Mesh,
    spin: f32,
    angle: f32,
}

impl SphereObject {
    pub const NAME: &'static str = "sphere";

    pub fn new(config: &SphereConfig) -> Self {
        let geometry = Geometry::sphere(config.radius, config.width_segments, config.height_segments);
        let material = PhongMaterial {
            color: config.color,
            specular: config.specular,
            shininess: config.shininess,
            wireframe: config.wireframe,
        };
        Self {
            base: NodeBase::new(Self::NAME, Transform::default()),
            mesh: Mesh::new(geometry, material),
            spin: config.spin,
            angle: 0.0,
        }
    }
}

impl SceneNode for SphereObject {
    delegate_node_base!(base);

    fn update(&mut self, dt: Duration) {
        if self.spin != 0.0 {
            self.angle = (self.angle + self.spin * dt.as_secs_f32()) % std::f32::consts::TAU;
            self.base.local.rotation = Quaternion::from_angle_y(Rad(self.angle));
        }
        self.base.update_children(dt);
    }

    fn get_mesh(&self) -> Option<&Mesh> {
        Some(&self.mesh)
    }
}

pub fn background(config: &BackdropConfig) -> Backdrop {
    Backdrop::new(GradientMaterial::new(config.light, config.dark))
}

/// Hemisphere, directional and point light nodes, in that order.
pub fn light_rig(config: &LightRigConfig) -> Vec<LightNode> {
    let hemisphere = &config.hemisphere;
    let directional = &config.directional;
    let point = &config.point;
    vec![
        LightNode::new(
            "hemisphere_light",
            Light::Hemisphere {
                sky: hemisphere.sky,
                ground: hemisphere.ground,
                intensity: hemisphere.intensity,
            },
            hemisphere.position,
        ),
        LightNode::new(
            "directional_light",
            Light::Directional {
                color: directional.color,
                intensity: directional.intensity,
            },
            directional.position,
        ),
        LightNode::new(
            "point_light",
            Light::Point {
                color: point.color,
                intensity: point.intensity,
                decay: point.decay,
            },
            point.position,
        ),
    ]
}
