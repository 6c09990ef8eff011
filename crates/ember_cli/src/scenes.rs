//! Built-in demo scenes.
//!
//! Each scene pairs a world with the camera preset it was composed for.
//! Random content (sphere fields, box heights, noise tables) is drawn from
//! the caller's generator, so a fixed seed rebuilds the same world.

use std::f64::consts::FRAC_PI_4;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use ember_renderer::{
    cornell_box, make_box, Background, BvhNode, Camera, CheckerTexture, Color, ConstantMedium,
    Dielectric, DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal,
    NoiseTexture, Quad, RenderConfig, Result, RotateY, Sphere, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Pale blue sky used by the daylight presets.
const DAYLIGHT: Color = Color::new(0.7, 0.8, 1.0);

const EARTH_TEXTURE: &str = "earthmap.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    /// Glass, hollow glass and fuzzy metal spheres on a ground sphere
    ThreeSpheres,
    /// Two touching diffuse spheres, wide angle
    RedBlue,
    /// Field of small random spheres around three large ones, in a BVH
    BouncingSpheres,
    /// Two checker-textured spheres
    CheckeredSpheres,
    /// Image-textured globe
    Earth,
    /// Perlin marble sphere on a marble ground
    PerlinSpheres,
    /// Five colored quads around the camera axis
    Quads,
    /// Marble spheres lit by two emissive spheres
    PurpleMarble,
    /// Cornell box holding two smoke-filled blocks
    CornellSmoke,
    /// Everything: box field, volumes, textures, instanced sphere cluster
    FinalScene,
}

/// A world together with the camera that frames it and the quality it
/// was tuned for.
pub struct Scene {
    pub camera: Camera,
    pub world: HittableList,
    pub settings: RenderConfig,
}

impl SceneName {
    /// Build the world and camera preset for this scene.
    ///
    /// Fails only when an image texture cannot be loaded from `texture_dir`.
    pub fn build(self, rng: &mut StdRng, texture_dir: &Path) -> Result<Scene> {
        let scene = match self {
            SceneName::ThreeSpheres => three_spheres(),
            SceneName::RedBlue => red_blue(),
            SceneName::BouncingSpheres => bouncing_spheres(rng),
            SceneName::CheckeredSpheres => checkered_spheres(),
            SceneName::Earth => earth(texture_dir)?,
            SceneName::PerlinSpheres => perlin_spheres(rng),
            SceneName::Quads => quads(),
            SceneName::PurpleMarble => purple_marble(rng),
            SceneName::CornellSmoke => cornell_smoke(),
            SceneName::FinalScene => final_scene(rng, texture_dir)?,
        };

        log::debug!("Built {:?} with {} top-level objects", self, scene.world.len());
        Ok(scene)
    }
}

fn lambertian(r: f64, g: f64, b: f64) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(Color::new(r, g, b)))
}

fn light(r: f64, g: f64, b: f64) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::from_color(Color::new(r, g, b)))
}

fn earth_material(texture_dir: &Path) -> Result<Arc<dyn Material>> {
    let texture = ImageTexture::open(texture_dir.join(EARTH_TEXTURE))?;
    Ok(Arc::new(Lambertian::new(Arc::new(texture))))
}

fn checker_material() -> Arc<dyn Material> {
    let checker = CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    );
    Arc::new(Lambertian::new(Arc::new(checker)))
}

fn marble_material(scale: f64, rng: &mut StdRng) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(scale, rng))))
}

fn framing(aspect_ratio: f64, width: u32) -> Camera {
    Camera::new().with_aspect_ratio(aspect_ratio, width)
}

fn quality(samples: u32, max_depth: u32, background: Color) -> RenderConfig {
    RenderConfig {
        samples_per_pixel: samples,
        max_depth,
        background: Background::Solid(background),
        ..RenderConfig::default()
    }
}

fn looking(from: (f64, f64, f64), at: (f64, f64, f64)) -> (Vec3, Vec3, Vec3) {
    (Vec3::new(from.0, from.1, from.2), Vec3::new(at.0, at.1, at.2), Vec3::Y)
}

fn three_spheres() -> Scene {
    let ground = lambertian(0.8, 0.8, 0.0);
    let center = lambertian(0.1, 0.2, 0.5);
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let bubble: Arc<dyn Material> = Arc::new(Dielectric::new(1.0 / 1.5));
    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0));

    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.push(Sphere::new(Vec3::new(0.0, 0.0, -1.2), 0.5, center));
    world.push(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass));
    world.push(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.4, bubble));
    world.push(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, metal));

    let (from, at, up) = looking((2.0, 2.0, 1.0), (0.0, 0.0, -1.0));
    let camera = framing(16.0 / 9.0, 400)
        .with_position(from, at, up)
        .with_lens(40.0, 0.0, 5.0);

    Scene {
        camera,
        world,
        settings: quality(50, 50, DAYLIGHT),
    }
}

fn red_blue() -> Scene {
    let r = FRAC_PI_4.cos();

    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(-r, 0.0, -1.0), r, lambertian(0.0, 0.0, 1.0)));
    world.push(Sphere::new(Vec3::new(r, 0.0, -1.0), r, lambertian(1.0, 0.0, 0.0)));

    let (from, at, up) = looking((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    let camera = framing(16.0 / 9.0, 400)
        .with_position(from, at, up)
        .with_lens(20.0, 0.6, 10.0);

    Scene {
        camera,
        world,
        settings: quality(50, 50, DAYLIGHT),
    }
}

fn bouncing_spheres(rng: &mut StdRng) -> Scene {
    let mut spheres = HittableList::new();
    spheres.push(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, checker_material()));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            // Keep clear of the large metal sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen())
                    * Color::new(rng.gen(), rng.gen(), rng.gen());
                let center2 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                spheres.push(Sphere::moving(
                    center,
                    center2,
                    0.2,
                    Arc::new(Lambertian::from_color(albedo)),
                ));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                let fuzz = rng.gen_range(0.0..0.5);
                spheres.push(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                spheres.push(Sphere::new(center, 0.2, glass.clone()));
            }
        }
    }

    spheres.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    spheres.push(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(0.4, 0.2, 0.1)));
    spheres.push(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    let mut world = HittableList::new();
    world.push(BvhNode::from_list(spheres));

    let (from, at, up) = looking((13.0, 2.0, 3.0), (0.0, 0.0, 0.0));
    let camera = framing(16.0 / 9.0, 400)
        .with_position(from, at, up)
        .with_lens(20.0, 0.6, 10.0);

    Scene {
        camera,
        world,
        settings: quality(50, 50, DAYLIGHT),
    }
}

fn checkered_spheres() -> Scene {
    let checker = checker_material();

    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker));

    let (from, at, up) = looking((13.0, 2.0, 3.0), (0.0, 0.0, 0.0));
    let camera = framing(16.0 / 9.0, 400)
        .with_position(from, at, up)
        .with_lens(20.0, 0.0, 10.0);

    Scene {
        camera,
        world,
        settings: quality(100, 50, DAYLIGHT),
    }
}

fn earth(texture_dir: &Path) -> Result<Scene> {
    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::ZERO, 2.0, earth_material(texture_dir)?));

    let (from, at, up) = looking((12.0, 0.0, -12.0), (0.0, 0.0, 0.0));
    let camera = framing(16.0 / 9.0, 400)
        .with_position(from, at, up)
        .with_lens(15.0, 0.0, 10.0);

    Ok(Scene {
        camera,
        world,
        settings: quality(100, 50, DAYLIGHT),
    })
}

fn perlin_spheres(rng: &mut StdRng) -> Scene {
    let marble = marble_material(4.0, rng);

    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));

    let (from, at, up) = looking((13.0, 2.0, 3.0), (0.0, 2.0, 0.0));
    let camera = framing(16.0 / 9.0, 400)
        .with_position(from, at, up)
        .with_lens(20.0, 0.0, 10.0);

    Scene {
        camera,
        world,
        settings: quality(100, 50, DAYLIGHT),
    }
}

fn quads() -> Scene {
    let mut world = HittableList::new();
    // left, back, right, upper, lower
    world.push(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        lambertian(1.0, 0.2, 0.2),
    ));
    world.push(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        lambertian(0.2, 1.0, 0.2),
    ));
    world.push(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        lambertian(0.2, 0.2, 1.0),
    ));
    world.push(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        lambertian(1.0, 0.5, 0.0),
    ));
    world.push(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lambertian(0.2, 0.8, 0.8),
    ));

    let (from, at, up) = looking((0.0, 0.0, 9.0), (0.0, 0.0, 0.0));
    let camera = framing(1.0, 400)
        .with_position(from, at, up)
        .with_lens(80.0, 0.0, 10.0);

    Scene {
        camera,
        world,
        settings: quality(50, 10, DAYLIGHT),
    }
}

fn purple_marble(rng: &mut StdRng) -> Scene {
    let marble = marble_material(3.0, rng);

    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 1012.0, 0.0), 1000.0, marble.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 6.0, 0.0), 3.0, marble));
    world.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, light(0.0, 0.0, 255.0)));
    world.push(Sphere::new(Vec3::new(0.0, 11.0, 0.0), 1.0, light(255.0, 0.0, 0.0)));

    let (from, at, up) = looking((10.0, 6.0, 10.0), (0.0, 6.0, 0.0));
    let camera = framing(16.0 / 9.0, 600)
        .with_position(from, at, up)
        .with_lens(25.0, 0.0, 10.0);

    Scene {
        camera,
        world,
        settings: quality(100, 50, Color::ZERO),
    }
}

fn cornell_smoke() -> Scene {
    let red = lambertian(0.65, 0.05, 0.05);
    let white = lambertian(0.73, 0.73, 0.73);
    let green = lambertian(0.12, 0.45, 0.15);

    let mut world = HittableList::new();
    world.push(cornell_box(green, white.clone(), red, light(7.0, 7.0, 7.0)));

    let tall: Arc<dyn Hittable> = Arc::new(make_box(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall: Arc<dyn Hittable> = Arc::new(RotateY::new(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> =
        Arc::new(make_box(Vec3::ZERO, Vec3::splat(165.0), white));
    let short: Arc<dyn Hittable> = Arc::new(RotateY::new(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    world.push(ConstantMedium::from_color(tall, 0.01, Color::ZERO));
    world.push(ConstantMedium::from_color(short, 0.01, Color::ONE));

    let (from, at, up) = looking((278.0, 278.0, -800.0), (278.0, 278.0, 0.0));
    let camera = framing(1.0, 600)
        .with_position(from, at, up)
        .with_lens(40.0, 0.0, 10.0);

    Scene {
        camera,
        world,
        settings: quality(50, 50, Color::ZERO),
    }
}

fn final_scene(rng: &mut StdRng, texture_dir: &Path) -> Result<Scene> {
    const BOXES_PER_SIDE: usize = 20;
    const BOX_WIDTH: f64 = 100.0;

    let ground = lambertian(0.48, 0.83, 0.53);
    let mut boxes = HittableList::new();
    for i in 0..BOXES_PER_SIDE {
        for j in 0..BOXES_PER_SIDE {
            let x0 = -1000.0 + i as f64 * BOX_WIDTH;
            let z0 = -1000.0 + j as f64 * BOX_WIDTH;
            let y1 = rng.gen_range(1.0..101.0);
            boxes.push(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + BOX_WIDTH, y1, z0 + BOX_WIDTH),
                ground.clone(),
            ));
        }
    }

    let mut world = HittableList::new();
    world.push(BvhNode::from_list(boxes));

    world.push(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light(7.0, 7.0, 7.0),
    ));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.push(Sphere::moving(center1, center2, 50.0, lambertian(0.7, 0.3, 0.1)));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.push(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, glass.clone()));
    world.push(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass shell filled with blue fog
    let boundary: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(360.0, 150.0, 145.0), 70.0, glass.clone()));
    world.add(boundary.clone());
    world.push(ConstantMedium::from_color(boundary, 0.2, Color::new(0.2, 0.4, 0.9)));

    // Thin mist over the whole scene
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 5000.0, glass));
    world.push(ConstantMedium::from_color(boundary, 0.0001, Color::ONE));

    world.push(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        earth_material(texture_dir)?,
    ));
    world.push(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        marble_material(0.2, rng),
    ));

    let white = lambertian(0.73, 0.73, 0.73);
    let cluster: HittableList = (0..1000)
        .map(|_| {
            let center = Vec3::new(
                rng.gen_range(0.0..165.0),
                rng.gen_range(0.0..165.0),
                rng.gen_range(0.0..165.0),
            );
            let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(center, 10.0, white.clone()));
            sphere
        })
        .collect();
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(cluster));
    let cluster: Arc<dyn Hittable> = Arc::new(RotateY::new(cluster, 15.0));
    world.push(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0)));

    let (from, at, up) = looking((478.0, 278.0, -600.0), (278.0, 278.0, 0.0));
    let camera = framing(1.0, 200)
        .with_position(from, at, up)
        .with_lens(40.0, 0.0, 10.0);

    Ok(Scene {
        camera,
        world,
        settings: quality(1000, 50, Color::ZERO),
    })
}
