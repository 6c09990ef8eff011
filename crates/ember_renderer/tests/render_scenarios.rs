use std::sync::Arc;

use ember_renderer::{
    color_to_rgb, render, Background, Camera, Color, DiffuseLight, HittableList, Lambertian,
    Material, RenderConfig, Sphere, Vec3,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_sphere_world() -> HittableList {
    let gray: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.5)));
    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray.clone()));
    world.push(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, gray));
    world
}

fn small_camera() -> Camera {
    let mut camera = Camera::new().with_resolution(20, 10);
    camera.initialize();
    camera
}

#[test]
fn test_enclosing_light_fills_every_pixel() {
    init_logging();

    // Camera at the center of a glowing sphere: every primary ray hits it
    let emit = Color::new(0.3, 0.6, 0.9);
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(emit));
    let world = Sphere::new(Vec3::ZERO, 5.0, light);
    let camera = small_camera();

    for samples in [1, 7] {
        let config = RenderConfig {
            samples_per_pixel: samples,
            max_depth: 1,
            seed: Some(9),
            ..RenderConfig::default()
        };
        let image = render(&camera, &world, &config);

        let expected = color_to_rgb(emit);
        for pixel in &image.pixels {
            assert!((*pixel - emit).length() < 1e-12);
            assert_eq!(color_to_rgb(*pixel), expected);
        }
    }
}

#[test]
fn test_two_sphere_render_is_stable_across_seeds() {
    init_logging();

    let world = two_sphere_world();
    let camera = small_camera();

    let averages: Vec<Color> = (1..=4)
        .map(|seed| {
            let config = RenderConfig {
                samples_per_pixel: 4,
                max_depth: 5,
                bucket_size: 8,
                seed: Some(seed),
                background: Background::sky(),
            };
            let image = render(&camera, &world, &config);

            assert_eq!(image.pixels.len(), 20 * 10);
            assert_eq!(image.to_rgb8().len(), 20 * 10 * 3);
            for pixel in &image.pixels {
                assert!(pixel.is_finite());
                assert!(pixel.min_element() >= 0.0);
                // Albedo below one under a sky no brighter than one
                assert!(pixel.max_element() <= 1.0 + 1e-9);
            }
            image.average()
        })
        .collect();

    // Diffuse gray under the sky settles in a narrow band regardless of seed
    for pair in averages.windows(2) {
        assert!((pair[0] - pair[1]).abs().max_element() < 0.05, "{averages:?}");
    }
    assert!(averages[0].min_element() > 0.1);
    // Blue dominates the sky
    assert!(averages[0].z > averages[0].x);
}

#[test]
fn test_seed_controls_image() {
    init_logging();

    let world = two_sphere_world();
    let camera = small_camera();
    let config = RenderConfig {
        samples_per_pixel: 2,
        max_depth: 3,
        bucket_size: 4,
        seed: Some(21),
        background: Background::sky(),
    };

    let first = render(&camera, &world, &config);
    let second = render(&camera, &world, &config);
    assert_eq!(first, second);

    let other_seed = RenderConfig {
        seed: Some(22),
        ..config
    };
    assert_ne!(first, render(&camera, &world, &other_seed));
}

#[test]
fn test_black_background_without_lights_renders_black() {
    init_logging();

    let world = two_sphere_world();
    let camera = small_camera();
    let config = RenderConfig {
        samples_per_pixel: 2,
        max_depth: 4,
        seed: Some(5),
        background: Background::Solid(Color::ZERO),
        ..RenderConfig::default()
    };

    let image = render(&camera, &world, &config);
    assert!(image.pixels.iter().all(|p| *p == Color::ZERO));
    assert!(image.to_rgb8().iter().all(|&b| b == 0));
}
