//! Simple path tracer example.
//!
//! Renders a small sphere field under a sky gradient and saves it as PPM.

use std::sync::Arc;
use std::time::Instant;

use ember_renderer::{
    render, Background, BvhNode, Camera, Color, Dielectric, Hittable, Lambertian, Material, Metal,
    RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> ember_renderer::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = Instant::now();
    let world = build_scene(&mut StdRng::seed_from_u64(2024));
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_resolution(800, 450)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 50,
        max_depth: 10,
        seed: Some(7),
        background: Background::sky(),
        ..RenderConfig::default()
    };

    let image = render(&camera, &world, &config);
    image.save("output.ppm")
}

fn build_scene(rng: &mut StdRng) -> BvhNode {
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    // Ground
    objects.push(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_color(Color::splat(0.5))),
    )));

    // Three main spheres
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass.clone())));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_color(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    // Small random spheres
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                );
                Arc::new(Lambertian::from_color(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                Arc::new(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                glass.clone()
            };
            objects.push(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    log::info!("Created {} objects", objects.len());
    BvhNode::new(objects)
}
