#[cfg(feature = "integration-tests")]
mod gpu {
    use map_app::{
        MapApp, SceneConfig, Viewport,
        color::{Color, linear_to_srgb},
        context::Context,
        render::WgpuRenderer,
    };

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 48;

    fn to_rgba(color: Color) -> [u8; 4] {
        let f_to_u8 = |v: f32| (linear_to_srgb(v).clamp(0.0, 1.0) * 255.0).round() as u8;
        [f_to_u8(color.r), f_to_u8(color.g), f_to_u8(color.b), 255]
    }

    fn assert_pixel(actual: &image::Rgba<u8>, expected: [u8; 4], tolerance: u8) {
        for (a, e) in actual.0.iter().zip(expected) {
            assert!(
                a.abs_diff(e) <= tolerance,
                "pixel {:?} differs from {:?}",
                actual.0,
                expected
            );
        }
    }

    fn render(config: SceneConfig) -> image::RgbaImage {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        let ctx = runtime
            .block_on(Context::headless(WIDTH, HEIGHT))
            .expect("headless GPU context");
        let mut renderer = WgpuRenderer::new(ctx);
        let viewport = Viewport::new(WIDTH as f64, HEIGHT as f64, 1.0);
        let mut app = MapApp::new(config, viewport);
        app.on_resize(viewport, &mut renderer);
        assert_eq!(renderer.drawing_buffer_size(), (WIDTH, HEIGHT));

        renderer
            .render_to_image(app.scene(), app.camera())
            .expect("offscreen render")
    }

    #[test]
    fn should_clear_to_background_colour() {
        let config = SceneConfig::default();
        let background = to_rgba(config.background);
        let image = render(config);

        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        for (x, y) in [(0, 0), (WIDTH - 1, 0), (0, HEIGHT - 1), (WIDTH - 1, HEIGHT - 1)] {
            assert_pixel(image.get_pixel(x, y), background, 2);
        }
    }

    #[test]
    fn should_draw_wireframe_sphere() {
        let config = SceneConfig::default();
        let background = to_rgba(config.background);
        let image = render(config);

        let covered = image
            .pixels()
            .filter(|p| p.0.iter().zip(background).any(|(a, e)| a.abs_diff(e) > 2))
            .count();
        assert!(covered > 0, "no sphere lines were drawn");
        // Lines leave gaps, a filled sphere would cover far more.
        assert!(covered < (WIDTH * HEIGHT) as usize / 2);
    }

    #[test]
    fn should_draw_gradient_backdrop_when_attached() {
        let config = SceneConfig::default().with_gradient_background(true);
        let backdrop = map_app::objects::background(&config.backdrop);
        let image = render(config);

        // Top centre lies outside the sphere.
        let (px, py) = (WIDTH / 2, 0);
        let x = (px as f32 + 0.5) / WIDTH as f32 * 2.0 - 1.0;
        let y = 1.0 - (py as f32 + 0.5) / HEIGHT as f32 * 2.0;
        let expected = to_rgba(backdrop.material.sample(x, y));
        assert_pixel(image.get_pixel(px, py), expected, 3);
    }
}
