use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use party_scene::{
    data_structures::{
        light::{LightDescriptor, PointLight, SceneLights},
        transform::Transform,
    },
    resources::mesh::Primitive,
    scene::{DrawStep, SceneAssembler},
    uniforms::{self, TEXTURE_SLOT_NONE},
};

use crate::common::test_utils::{FakeCodec, RecordingBackend};

mod common;

fn step_index(scene: &SceneAssembler, label: &str) -> usize {
    scene
        .steps()
        .iter()
        .position(|s| s.label == label)
        .expect("no such step")
}

#[test]
fn should_upload_each_primitive_once() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();

    let mut prepared = scene.prepare(&mut backend, &codec).unwrap();
    prepared.render(&mut backend).unwrap();
    prepared.render(&mut backend).unwrap();

    assert_eq!(backend.mesh_loads.len(), Primitive::ALL.len());
    assert!(backend.mesh_loads.values().all(|&n| n == 1));
    assert_eq!(backend.draws.len(), 2 * scene.steps().len());
}

#[test]
fn should_draw_steps_in_order() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();

    let mut prepared = scene.prepare(&mut backend, &codec).unwrap();
    let drawn = prepared.render(&mut backend).unwrap();

    use Primitive::*;
    let expected = [
        Plane, Cone, Sphere, Box, Box, Box, Box, Box, Box, Box, Sphere, Pyramid4, Cylinder,
        Cylinder, Cylinder, Cylinder, Cylinder,
    ];
    assert_eq!(drawn, expected.len());
    let primitives: Vec<_> = backend.draws.iter().map(|d| d.primitive).collect();
    assert_eq!(primitives, expected);
}

#[test]
fn should_set_up_textures_lights_and_materials() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();

    let prepared = scene.prepare(&mut backend, &codec).unwrap();

    assert_eq!(prepared.textures().len(), 9);
    assert_eq!(backend.bound.len(), 9);
    assert_eq!(prepared.textures().lookup_slot("Floor"), Some(2));
    assert_eq!(prepared.materials().len(), 7);
    assert!(prepared.state().use_lighting);

    let shader = &backend.uniforms;
    assert_eq!(shader.flag(uniforms::USE_LIGHTING), Some(true));
    assert_eq!(
        shader.vec3("pointLights[0].position"),
        Some(Vector3::new(0.0, 8.3, 0.0))
    );
    assert_eq!(
        shader.vec3("pointLights[1].position"),
        Some(Vector3::new(2.5, 6.0, -2.0))
    );
    assert_eq!(
        shader.vec3("directionalLight.direction"),
        Some(Vector3::new(-0.2, -1.0, -0.3))
    );
    assert_eq!(shader.flag("pointLights[2].bActive"), None);
}

#[test]
fn should_carry_state_between_steps() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();
    let mut prepared = scene.prepare(&mut backend, &codec).unwrap();
    prepared.render(&mut backend).unwrap();

    // the napkin sets no material and keeps the party hat's
    let napkin = &backend.draws[step_index(&scene, "napkin")].uniforms;
    assert_eq!(
        napkin.vec3(uniforms::MATERIAL_DIFFUSE),
        Some(Vector3::new(0.8, 0.4, 0.6))
    );
    assert_eq!(napkin.int(uniforms::OBJECT_TEXTURE), Some(1));

    // the string only sets a colour: untextured, still the balloon material
    let string = &backend.draws[step_index(&scene, "balloon string")].uniforms;
    assert_eq!(string.flag(uniforms::USE_TEXTURE), Some(false));
    assert_eq!(
        string.vec4(uniforms::OBJECT_COLOR),
        Some(Vector4::new(0.3, 0.3, 0.3, 1.0))
    );
    assert_eq!(
        string.vec3(uniforms::MATERIAL_DIFFUSE),
        Some(Vector3::new(0.4, 0.1, 0.6))
    );
    assert_eq!(string.vec2(uniforms::UV_SCALE), Some(Vector2::new(1.0, 1.0)));

    // "Cake" is not a texture tag, so the cake samples nothing
    let cake = &backend.draws[step_index(&scene, "cake")].uniforms;
    assert_eq!(cake.flag(uniforms::USE_TEXTURE), Some(true));
    assert_eq!(cake.int(uniforms::OBJECT_TEXTURE), Some(TEXTURE_SLOT_NONE));
    assert_eq!(cake.vec2(uniforms::UV_SCALE), Some(Vector2::new(1.5, 1.5)));
    assert_eq!(
        cake.vec3(uniforms::MATERIAL_DIFFUSE),
        Some(Vector3::new(0.4, 0.1, 0.6))
    );
}

#[test]
fn should_push_each_step_transform() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();
    let mut prepared = scene.prepare(&mut backend, &codec).unwrap();
    prepared.render(&mut backend).unwrap();

    let floor = backend.draws[0].uniforms.mat4(uniforms::MODEL).unwrap();
    assert_eq!(floor, Matrix4::from_nonuniform_scale(20.0, 1.0, 10.0));

    let candle = backend.last_draw().uniforms.mat4(uniforms::MODEL).unwrap();
    assert_eq!(
        candle,
        Transform::from_parts([0.1, 2.0, 0.1], [0.0, 0.0, 0.0], [0.0, 6.33, 0.0]).to_matrix()
    );
}

#[test]
fn should_render_without_missing_textures() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything()
        .with_broken("assets/textures/table.jpg")
        .with_broken("assets/textures/Purple_balloon.png");

    let mut prepared = scene.prepare(&mut backend, &codec).unwrap();
    let drawn = prepared.render(&mut backend).unwrap();

    assert_eq!(drawn, 17);
    assert_eq!(prepared.textures().len(), 7);
    assert_eq!(prepared.textures().lookup_slot("Table"), None);
    let table_top = &backend.draws[step_index(&scene, "table top")].uniforms;
    assert_eq!(table_top.int(uniforms::OBJECT_TEXTURE), Some(TEXTURE_SLOT_NONE));
    // later textures move up into the freed slots
    assert_eq!(prepared.textures().lookup_slot("present"), Some(6));
}

#[test]
fn should_release_textures_on_teardown() {
    let scene = SceneAssembler::party("assets");
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();
    let prepared = scene.prepare(&mut backend, &codec).unwrap();

    prepared.release(&mut backend);

    assert_eq!(backend.released, (1..=9).collect::<Vec<u32>>());
}

#[test]
fn should_only_load_primitives_in_use() {
    let scene = SceneAssembler::new("assets")
        .with_texture("textures/blue_party.jpg", "Blue")
        .with_material("Ceramic", [0.9, 0.9, 0.95], [0.9, 0.9, 0.9], 48.0)
        .with_lights(SceneLights::new().with(LightDescriptor::Point(PointLight {
            position: Vector3::new(0.0, 8.3, 0.0),
            ambient: Vector3::new(0.3, 0.15, 0.05),
            diffuse: Vector3::new(1.0, 0.6, 0.2),
            specular: Vector3::new(1.0, 0.8, 0.5),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            active: true,
        })))
        .with_step(
            DrawStep::new("plate", Primitive::Cylinder, Transform::new())
                .texture("Blue")
                .material("Ceramic"),
        )
        .with_step(DrawStep::new("plate again", Primitive::Cylinder, Transform::new()));
    let mut backend = RecordingBackend::new();
    let codec = FakeCodec::accepting_everything();

    let mut prepared = scene.prepare(&mut backend, &codec).unwrap();
    prepared.render(&mut backend).unwrap();

    assert_eq!(backend.mesh_loads.len(), 1);
    assert_eq!(backend.mesh_loads[&Primitive::Cylinder], 1);
    assert_eq!(backend.draws.len(), 2);
    assert_eq!(backend.draws[1].uniforms.int(uniforms::OBJECT_TEXTURE), Some(0));
}

#[test]
fn should_skip_invalid_materials_during_setup() {
    let scene = SceneAssembler::new("assets")
        .with_material("Wood", [0.4, 0.25, 0.1], [0.05, 0.05, 0.05], 4.0)
        .with_material("Wood", [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], 2.0)
        .with_material("Glass", [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], 0.0)
        .with_step(DrawStep::new("box", Primitive::Box, Transform::new()).material("Wood"));
    let mut backend = RecordingBackend::new();

    let mut prepared = scene.prepare(&mut backend, &FakeCodec::new()).unwrap();
    prepared.render(&mut backend).unwrap();

    assert_eq!(prepared.materials().len(), 1);
    assert_eq!(
        backend.last_draw().uniforms.float(uniforms::MATERIAL_SHININESS),
        Some(4.0)
    );
}

#[test]
fn should_keep_state_across_renders() {
    let scene = SceneAssembler::new("assets")
        .with_step(DrawStep::new("plain", Primitive::Box, Transform::new()))
        .with_step(
            DrawStep::new("red", Primitive::Box, Transform::new()).color(1.0, 0.0, 0.0, 1.0),
        );
    let mut backend = RecordingBackend::new();

    let mut prepared = scene.prepare(&mut backend, &FakeCodec::new()).unwrap();
    assert_eq!(prepared.state().color, None);

    prepared.render(&mut backend).unwrap();
    assert_eq!(backend.draws[0].uniforms.vec4(uniforms::OBJECT_COLOR), None);

    // the second pass starts from where the first one ended
    prepared.render(&mut backend).unwrap();
    let red = Some(Vector4::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(prepared.state().color, red);
    assert_eq!(backend.draws[2].uniforms.vec4(uniforms::OBJECT_COLOR), red);
}
