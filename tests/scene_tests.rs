//! Scene Integration Tests
//!
//! Tests for:
//! - Object lifecycle: spawn, duplicate, despawn
//! - Light linking through the scene world
//! - Per-frame rendering into a recording FrameSink

use std::collections::HashMap;

use vista::*;

#[derive(Default)]
struct Recorder {
    uniforms: HashMap<String, UniformValue>,
    /// Uniform snapshots taken at each draw call.
    draws: Vec<HashMap<String, UniformValue>>,
    vertex_counts: Vec<usize>,
}

impl FrameSink for Recorder {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_owned(), value);
    }

    fn draw(&mut self, geometry: &Geometry) {
        self.draws.push(self.uniforms.clone());
        self.vertex_counts.push(geometry.vertex_count());
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_scene() -> Scene {
    init_logger();
    let camera = Camera::new(CameraConfig::new(), &(800, 600)).unwrap();
    Scene::new(camera)
}

fn red_cube() -> Object {
    Object::new(
        Geometry::cube(),
        Material::phong(Color::RED, Color::WHITE, 32.0),
    )
}

// ============================================================================
// Objects
// ============================================================================

#[test]
fn scene_spawn_and_duplicate() {
    let mut scene = new_scene();
    let a = scene.spawn(Transformable::at(Vec3::new(1.0, 0.0, 0.0)), red_cube());
    let b = scene.duplicate(a).unwrap();

    assert_ne!(a, b);
    assert_eq!(scene.object_count(), 2);

    scene.pose_mut(a).unwrap().set_uniform_scale(3.0);
    assert_eq!(scene.pose(b).unwrap().scaling(), Vec3::ONE);
}

#[test]
fn scene_despawn_then_lookup_fails() {
    let mut scene = new_scene();
    let a = scene.spawn(Transformable::new(), red_cube());
    scene.despawn(a).unwrap();

    assert!(matches!(scene.pose_mut(a), Err(Error::MissingPose(e)) if e == a));
    assert_eq!(scene.object_count(), 0);
}

// ============================================================================
// Light linking
// ============================================================================

#[test]
fn linked_light_tracks_object_moves() {
    let mut scene = new_scene();
    let lamp = scene.spawn_pose(Transformable::at(Vec3::new(1.0, 2.0, 3.0)));
    let light = scene.add_point_light(PointLight::default());
    scene.link_point_light(light, lamp).unwrap();

    scene.pose_mut(lamp).unwrap().move_xyz(1.0, 0.0, 0.0);
    assert_eq!(scene.point_light_position(light).unwrap(), Vec3::new(2.0, 2.0, 3.0));
}

#[test]
fn unlinked_light_keeps_snapshot() {
    let mut scene = new_scene();
    let lamp = scene.spawn_pose(Transformable::at(Vec3::new(1.0, 2.0, 3.0)));
    let light = scene.add_point_light(PointLight::default());
    scene.link_point_light(light, lamp).unwrap();

    let mut detached = scene.point_light(light).unwrap().clone();
    detached.unlink_position(scene.world());

    scene.pose_mut(lamp).unwrap().move_xyz(4.0, 0.0, 0.0);
    assert_eq!(detached.position(scene.world()), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(scene.point_light_position(light).unwrap(), Vec3::new(5.0, 2.0, 3.0));
}

#[test]
fn despawn_keeps_light_at_final_position() {
    let mut scene = new_scene();
    let lamp = scene.spawn_pose(Transformable::at(Vec3::new(0.0, 2.0, 0.0)));
    let point = scene.add_point_light(PointLight::default());
    let spot = scene.add_spot_light(SpotLight::default());
    scene.link_point_light(point, lamp).unwrap();
    scene.link_spot_light(spot, lamp).unwrap();

    scene.pose_mut(lamp).unwrap().move_xyz(5.0, 0.0, 0.0);
    scene.despawn(lamp).unwrap();

    assert_eq!(scene.point_light_position(point).unwrap(), Vec3::new(5.0, 2.0, 0.0));
    assert_eq!(scene.spot_light_position(spot).unwrap(), Vec3::new(5.0, 2.0, 0.0));
}

#[test]
fn spot_light_follows_camera_rig() {
    let mut scene = new_scene();
    let rig = scene.spawn_pose(Transformable::at(Vec3::new(0.0, 5.0, 0.0)));
    let spot = scene.add_spot_light(SpotLight::default());
    scene.link_spot_light(spot, rig).unwrap();

    scene.pose_mut(rig).unwrap().set_position(Vec3::new(2.0, 5.0, -1.0));
    assert_eq!(scene.spot_light_position(spot).unwrap(), Vec3::new(2.0, 5.0, -1.0));
}

#[test]
fn linking_to_missing_entity_fails() {
    let mut scene = new_scene();
    let lamp = scene.spawn_pose(Transformable::new());
    scene.despawn(lamp).unwrap();

    let light = scene.add_point_light(PointLight::new(Vec3::ONE));
    assert_eq!(scene.link_point_light(light, lamp), Err(Error::MissingPose(lamp)));
    assert_eq!(scene.point_light_position(light).unwrap(), Vec3::ONE);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn render_draws_each_visible_object() {
    let mut scene = new_scene();
    let cube = red_cube();
    scene.spawn(Transformable::at(Vec3::X), cube.clone());
    scene.spawn(Transformable::at(Vec3::NEG_X), cube.clone());

    let mut hidden = Object::from_geometry(Geometry::plane(10.0));
    hidden.visible = false;
    scene.spawn(Transformable::new(), hidden);

    let mut sink = Recorder::default();
    assert_eq!(scene.render(&mut sink), 2);
    assert_eq!(sink.vertex_counts, vec![24, 24]);

    let mut xs: Vec<f32> = sink
        .draws
        .iter()
        .map(|draw| match draw["model"] {
            UniformValue::Mat4(m) => m[12],
            ref other => panic!("model uploaded as {other:?}"),
        })
        .collect();
    xs.sort_by(f32::total_cmp);
    assert_eq!(xs, vec![-1.0, 1.0]);
}

#[test]
fn render_uploads_material_properties() {
    let mut scene = new_scene();
    scene.spawn(Transformable::new(), red_cube());

    let mut sink = Recorder::default();
    scene.render(&mut sink);

    let draw = &sink.draws[0];
    assert_eq!(draw["material.diffuse"], UniformValue::Vec4([1.0, 0.0, 0.0, 1.0]));
    assert_eq!(draw["material.shininess"], UniformValue::Float(32.0));
    assert!(draw.contains_key("normalMatrix"));
}

#[test]
fn render_uploads_camera_and_lights() {
    let mut scene = new_scene();
    scene.camera.set_position(Vec3::new(0.0, 1.0, 5.0));
    scene.ambient = AmbientLight::new(Color::WHITE, 0.25);

    let lamp = scene.spawn_pose(Transformable::at(Vec3::new(0.0, 3.0, 0.0)));
    let light =
        scene.add_point_light(PointLight::default().with_colors(Color::YELLOW, Color::WHITE));
    scene.link_point_light(light, lamp).unwrap();
    scene.add_spot_light(SpotLight::new(Vec3::ZERO, Vec3::NEG_Y).with_cone(10.0, 20.0).unwrap());

    scene.pose_mut(lamp).unwrap().move_xyz(0.0, 1.0, 0.0);

    let mut sink = Recorder::default();
    scene.render(&mut sink);
    let u = &sink.uniforms;

    assert_eq!(u["viewPos"], UniformValue::Vec3([0.0, 1.0, 5.0]));
    assert_eq!(u["ambient.color"], UniformValue::Vec3([0.25, 0.25, 0.25]));
    assert_eq!(
        u["projection"],
        UniformValue::Mat4(scene.camera.projection().to_cols_array())
    );

    assert_eq!(u["pointLightCount"], UniformValue::Int(1));
    assert_eq!(u["pointLights[0].position"], UniformValue::Vec3([0.0, 4.0, 0.0]));
    assert_eq!(u["pointLights[0].diffuse"], UniformValue::Vec3([1.0, 1.0, 0.0]));
    assert_eq!(u["pointLights[0].constant"], UniformValue::Float(1.0));

    assert_eq!(u["spotLightCount"], UniformValue::Int(1));
    assert_eq!(u["spotLights[0].direction"], UniformValue::Vec3([0.0, -1.0, 0.0]));
    assert_eq!(
        u["spotLights[0].cutOff"],
        UniformValue::Float(10.0_f32.to_radians().cos())
    );
}

#[test]
fn render_after_despawn_uses_last_light_position() {
    let mut scene = new_scene();
    let lamp = scene.spawn_pose(Transformable::at(Vec3::new(0.0, 2.0, 0.0)));
    let light = scene.add_point_light(PointLight::default());
    scene.link_point_light(light, lamp).unwrap();

    let mut sink = Recorder::default();
    scene.render(&mut sink);
    scene.despawn(lamp).unwrap();
    scene.render(&mut sink);

    assert_eq!(
        sink.uniforms["pointLights[0].position"],
        UniformValue::Vec3([0.0, 2.0, 0.0])
    );
    assert!(!scene.point_light(light).unwrap().is_linked());
}
