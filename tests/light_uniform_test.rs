use map_app::{
    MapApp, SceneConfig, Viewport,
    cgmath::{InnerSpace, Vector3},
    color::Color,
    data_structures::{scene_graph::Light, transform::Transform},
    pipelines::light::LightUniform,
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn should_pack_light_rig() {
    let app = MapApp::new(SceneConfig::default(), Viewport::new(800.0, 600.0, 1.0));
    let uniform = LightUniform::from_lights(app.scene().lights());

    assert_eq!(std::mem::size_of::<LightUniform>(), 112);
    assert_eq!(uniform.hemisphere_intensity, 1.0);
    assert_eq!(uniform.hemisphere_direction, [0.0, 1.0, 0.0]);
    assert_eq!(uniform.sky_color, Color::from_hsl(0.6, 1.0, 0.6).to_array());
    assert_eq!(uniform.ground_color, Color::from_hsl(0.095, 1.0, 0.75).to_array());

    let direction = Vector3::new(-1.0f32, 1.75, 1.0).normalize();
    assert_close(uniform.directional_direction[0], direction.x, 1e-6);
    assert_close(uniform.directional_direction[1], direction.y, 1e-6);
    assert_close(uniform.directional_direction[2], direction.z, 1e-6);
    assert_eq!(uniform.directional_intensity, 1.0);

    assert_eq!(uniform.point_position, [2.0, 3.0, 4.0]);
    assert_eq!(uniform.point_intensity, 0.1);
    assert_eq!(uniform.point_decay, 2.0);
}

#[test]
fn should_ignore_extra_lights_of_a_kind() {
    let first = Light::Directional {
        color: Color::WHITE,
        intensity: 0.5,
    };
    let second = Light::Directional {
        color: Color::BLACK,
        intensity: 3.0,
    };
    let at = |x: f32| Transform::from(Vector3::new(x, 1.0, 0.0));
    let uniform = LightUniform::from_lights([(&first, at(1.0)), (&second, at(-1.0))]);

    assert_eq!(uniform.directional_intensity, 0.5);
    assert_eq!(uniform.directional_color, [1.0, 1.0, 1.0]);
    // Kinds absent from the scene stay dark.
    assert_eq!(uniform.hemisphere_intensity, 0.0);
    assert_eq!(uniform.point_intensity, 0.0);
}
