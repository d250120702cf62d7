//! Fly-through demo - a scripted first-person flight over a small room.
//!
//! Runs headless: a logging FrameSink stands in for a renderer and prints a
//! summary of each frame. A desk lamp carries a point light that follows it
//! while it drifts, and a spot light hangs from the ceiling pointing at the
//! table. Run with `RUST_LOG=debug` to see the scene's own logging too.

use vista::{
    AmbientLight, Camera, CameraConfig, Color, FlyConfig, FlyController, FlyInput, FrameSink,
    Geometry, GeometryHandle, Material, Object, PointLight, Scene, SpotLight, Transformable,
    UniformValue, Vec2, Vec3,
};

/// Counts uniform uploads and draw calls for one frame.
#[derive(Default)]
struct FrameLog {
    uniforms: usize,
    draws: usize,
    triangles: usize,
}

impl FrameSink for FrameLog {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        log::trace!("uniform {name} = {value:?}");
        self.uniforms += 1;
    }

    fn draw(&mut self, geometry: &Geometry) {
        self.draws += 1;
        self.triangles += geometry.index_count() / 3;
    }
}

fn main() -> vista::Result<()> {
    env_logger::init();

    let camera = Camera::new(CameraConfig::new().fov(75.0), &(1280, 720))?;
    let mut scene =
        Scene::new(camera).with_ambient(AmbientLight::new(Color::rgb(0.6, 0.6, 0.8), 0.1));

    // Floor and a table made of stretched cubes sharing one mesh
    let cube = GeometryHandle::new(Geometry::cube());
    let wood = Material::phong(Color::rgb(0.55, 0.35, 0.2), Color::rgb(0.3, 0.3, 0.3), 16.0);
    let floor = Material::phong(Color::rgb(0.4, 0.4, 0.45), Color::BLACK, 1.0);
    scene.spawn(Transformable::new(), Object::new(Geometry::plane(20.0), floor));
    let table_top = scene.spawn(
        Transformable::at(Vec3::new(0.0, 0.75, -4.0)).with_scale(Vec3::new(2.0, 0.1, 1.0)),
        Object::new(cube.clone(), wood),
    );
    for (x, z) in [(-0.9, -4.4), (0.9, -4.4), (-0.9, -3.6), (0.9, -3.6)] {
        let leg = scene.duplicate(table_top)?;
        let pose = scene.pose_mut(leg)?;
        pose.set_position(Vec3::new(x, 0.35, z));
        pose.set_scale(Vec3::new(0.1, 0.7, 0.1));
    }

    // A lamp on the table with a point light tracking it
    let lamp = scene.spawn(
        Transformable::at(Vec3::new(0.5, 1.0, -4.0)).with_scale(Vec3::splat(0.15)),
        Object::new(cube, Material::phong(Color::YELLOW, Color::WHITE, 64.0)),
    );
    let bulb = scene.add_point_light(
        PointLight::default().with_colors(Color::rgb(1.0, 0.9, 0.7), Color::WHITE),
    );
    scene.link_point_light(bulb, lamp)?;

    let mut ceiling = SpotLight::new(Vec3::new(0.0, 3.0, -4.0), Vec3::NEG_Y).with_cone(15.0, 22.5)?;
    ceiling.point_at(Vec3::new(0.0, 0.75, -4.0), scene.world());
    scene.add_spot_light(ceiling);

    scene.camera.set_position(Vec3::new(0.0, 1.6, 4.0));
    scene.camera.look_at(Vec3::new(0.0, 0.75, -4.0));

    let fly = FlyController::new(FlyConfig::new().speed(2.0).sensitivity(0.15));
    let dt = 1.0 / 60.0;

    for frame in 0..240 {
        // Walk in, glance around, then rise above the table
        let input = match frame {
            0..=89 => FlyInput::new().forward(1.0),
            90..=149 => FlyInput::new().look(Vec2::new(4.0, -1.0)),
            150..=209 => FlyInput::new().look(Vec2::new(-4.0, 0.0)).upwards(1.0),
            _ => FlyInput::new().sideways(-0.5),
        };
        fly.update(&mut scene.camera, &input, dt);

        if frame < 180 {
            scene.pose_mut(lamp)?.move_xyz(0.002, 0.0, 0.0);
        } else if frame == 180 {
            log::info!("removing the lamp; its light stays where it was");
            scene.despawn(lamp)?;
        }

        let mut sink = FrameLog::default();
        scene.render(&mut sink);

        if frame % 60 == 0 || frame == 239 {
            log::info!(
                "frame {frame:3}: camera at {:.2}, {} draws, {} triangles, {} uniforms, \
                 bulb at {:.2}",
                scene.camera.position(),
                sink.draws,
                sink.triangles,
                sink.uniforms,
                scene.point_light_position(bulb)?,
            );
        }
    }

    Ok(())
}
