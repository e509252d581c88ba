use map_app::{
    color::{Color, linear_to_srgb, srgb_to_linear},
    data_structures::material::GradientMaterial,
};

use crate::common::test_utils::assert_close;

mod common;

fn assert_srgb(color: Color, expected: [f32; 3]) {
    assert_close(linear_to_srgb(color.r), expected[0], 1e-3);
    assert_close(linear_to_srgb(color.g), expected[1], 1e-3);
    assert_close(linear_to_srgb(color.b), expected[2], 1e-3);
}

#[test]
fn should_decode_hex() {
    assert_srgb(Color::from_hex(0x496c99), [73.0 / 255.0, 108.0 / 255.0, 153.0 / 255.0]);
    assert_srgb(Color::from_hex(0xabb7c7), [171.0 / 255.0, 183.0 / 255.0, 199.0 / 255.0]);
    assert_eq!(Color::from_hex(0x000000), Color::BLACK);
}

#[test]
fn should_convert_hsl() {
    // Pure hues.
    assert_srgb(Color::from_hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]);
    assert_srgb(Color::from_hsl(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]);
    assert_srgb(Color::from_hsl(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]);
    // Sky colour of the hemisphere light.
    assert_srgb(Color::from_hsl(0.6, 1.0, 0.6), [0.2, 0.52, 1.0]);
    // Grey without saturation.
    assert_srgb(Color::from_hsl(0.3, 0.0, 0.25), [0.25, 0.25, 0.25]);
}

#[test]
fn should_wrap_hue() {
    let a = Color::from_hsl(0.25, 0.8, 0.4);
    let b = Color::from_hsl(1.25, 0.8, 0.4);
    assert_close(a.r, b.r, 1e-5);
    assert_close(a.g, b.g, 1e-5);
    assert_close(a.b, b.b, 1e-5);
}

#[test]
fn should_round_trip_transfer_functions() {
    for c in [0.0, 0.01, 0.04045, 0.2, 0.5, 0.8, 1.0] {
        assert_close(linear_to_srgb(srgb_to_linear(c)), c, 1e-4);
    }
    assert!(srgb_to_linear(0.5) < 0.5);
}

#[test]
fn should_sample_gradient_from_centre_to_edge() {
    let light = Color::linear(0.9, 1.0, 1.0);
    let dark = Color::linear(0.1, 0.2, 0.3);
    let gradient = GradientMaterial::new(light, dark);

    assert_eq!(gradient.sample(0.0, 0.0), light);
    let edge = gradient.sample(1.0, 0.0);
    assert_close(edge.r, dark.r, 1e-6);
    assert_close(edge.g, dark.g, 1e-6);
    assert_close(edge.b, dark.b, 1e-6);
    let half = gradient.sample(0.5, 0.5);
    assert_close(half.r, 0.5, 1e-6);
}
