//! Scene assembly: one-time setup followed by an ordered list of draw steps.
//!
//! A [`SceneAssembler`] is pure description: which textures to load, which
//! materials and lights exist and the ordered [`DrawStep`]s. Calling
//! [`SceneAssembler::prepare`] performs the setup against a
//! [`GraphicsBackend`] and yields a [`PreparedScene`], the only type that can
//! render. Setup therefore always happens before the first draw.
//!
//! # Lifecycle
//!
//! 1. `prepare()` loads and binds textures, configures lights, defines
//!    materials and uploads each primitive used by the steps exactly once
//! 2. `render()` walks the steps in order: transform, state changes, draw
//! 3. `release()` frees the GPU textures
//!
//! Render state is never reset between steps (see [`crate::render`]).

use std::{
    collections::BTreeSet,
    path::PathBuf,
};

use anyhow::Context as _;
use cgmath::Vector3;
use instant::Instant;

use crate::{
    data_structures::{
        light::{DirectionalLight, LightDescriptor, PointLight, SceneLights},
        transform::Transform,
    },
    render::{RenderState, RenderStateDispatcher},
    resources::{
        material::MaterialRegistry,
        mesh::{MeshLibrary, Primitive},
        resolve_asset,
        texture::{ImageCodec, TextureBackend, TextureRegistry},
    },
    uniforms::ShaderInterface,
};

/// Everything a scene needs from the graphics side.
pub trait GraphicsBackend: ShaderInterface + MeshLibrary + TextureBackend {}

impl<T: ShaderInterface + MeshLibrary + TextureBackend> GraphicsBackend for T {}

/// A single render-state change issued by a draw step.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    Color([f32; 4]),
    Texture(String),
    UvScale(f32, f32),
    Material(String),
}

/// Transform, state changes and the primitive to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawStep {
    pub label: String,
    pub transform: Transform,
    pub changes: Vec<StateChange>,
    pub primitive: Primitive,
}

impl DrawStep {
    pub fn new(label: &str, primitive: Primitive, transform: Transform) -> Self {
        Self {
            label: label.to_string(),
            transform,
            changes: Vec::new(),
            primitive,
        }
    }

    pub fn color(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.changes.push(StateChange::Color([r, g, b, a]));
        self
    }

    pub fn texture(mut self, tag: &str) -> Self {
        self.changes.push(StateChange::Texture(tag.to_string()));
        self
    }

    pub fn uv_scale(mut self, u: f32, v: f32) -> Self {
        self.changes.push(StateChange::UvScale(u, v));
        self
    }

    pub fn material(mut self, tag: &str) -> Self {
        self.changes.push(StateChange::Material(tag.to_string()));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureSource {
    pub path: String,
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDefinition {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

#[derive(Clone, Debug, Default)]
pub struct SceneAssembler {
    asset_dir: PathBuf,
    textures: Vec<TextureSource>,
    materials: Vec<MaterialDefinition>,
    lights: SceneLights,
    steps: Vec<DrawStep>,
}

impl SceneAssembler {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, path: &str, tag: &str) -> Self {
        self.textures.push(TextureSource {
            path: path.to_string(),
            tag: tag.to_string(),
        });
        self
    }

    pub fn with_material(
        mut self,
        tag: &str,
        diffuse_color: impl Into<Vector3<f32>>,
        specular_color: impl Into<Vector3<f32>>,
        shininess: f32,
    ) -> Self {
        self.materials.push(MaterialDefinition {
            tag: tag.to_string(),
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        });
        self
    }

    pub fn with_lights(mut self, lights: SceneLights) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_step(mut self, step: DrawStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[DrawStep] {
        &self.steps
    }

    /// Distinct primitives referenced by the steps.
    pub fn primitives(&self) -> BTreeSet<Primitive> {
        self.steps.iter().map(|s| s.primitive).collect()
    }

    /// Runs the one-time setup: textures, lights, materials, meshes.
    ///
    /// Texture and material failures are logged and skipped so the scene
    /// still renders with reduced fidelity. Mesh upload failures abort.
    pub fn prepare<G, C>(&self, gfx: &mut G, codec: &C) -> anyhow::Result<PreparedScene<'_, G::Handle>>
    where
        G: GraphicsBackend,
        C: ImageCodec + ?Sized,
    {
        let start = Instant::now();
        let mut textures = TextureRegistry::new();
        for source in &self.textures {
            let path = resolve_asset(&self.asset_dir, &source.path);
            // failures are already logged by the registry
            let _ = textures.load(gfx, codec, &path, &source.tag);
        }
        textures.bind_all(gfx);

        let mut dispatcher = RenderStateDispatcher::new();
        self.lights.configure(gfx, &mut dispatcher);

        let mut materials = MaterialRegistry::new();
        for def in &self.materials {
            if let Err(e) = materials.define(
                &def.tag,
                def.diffuse_color,
                def.specular_color,
                def.shininess,
            ) {
                log::error!("Skipping material: {e}");
            }
        }

        let meshes = self.primitives();
        for primitive in &meshes {
            gfx.load_mesh(*primitive)
                .with_context(|| format!("failed to upload {primitive:?} mesh"))?;
        }

        log::info!(
            "Prepared scene in {:?}: {}/{} textures, {} materials, {} meshes",
            start.elapsed(),
            textures.len(),
            self.textures.len(),
            materials.len(),
            meshes.len()
        );

        Ok(PreparedScene {
            steps: &self.steps,
            textures,
            materials,
            dispatcher,
            meshes,
        })
    }
}

/// A scene whose resources are resident. Produced only by
/// [`SceneAssembler::prepare`].
#[derive(Debug)]
pub struct PreparedScene<'a, H> {
    steps: &'a [DrawStep],
    textures: TextureRegistry<H>,
    materials: MaterialRegistry,
    dispatcher: RenderStateDispatcher,
    meshes: BTreeSet<Primitive>,
}

impl<'a, H: Clone + std::fmt::Debug> PreparedScene<'a, H> {
    /// Executes every draw step in order and returns the number of draws.
    pub fn render<G>(&mut self, gfx: &mut G) -> anyhow::Result<usize>
    where
        G: GraphicsBackend<Handle = H>,
    {
        let start = Instant::now();
        for step in self.steps {
            self.draw_step(gfx, step)
                .with_context(|| format!("draw step '{}' failed", step.label))?;
        }
        log::info!("Rendered {} draw steps in {:?}", self.steps.len(), start.elapsed());
        Ok(self.steps.len())
    }

    fn draw_step<G>(&mut self, gfx: &mut G, step: &DrawStep) -> anyhow::Result<()>
    where
        G: GraphicsBackend<Handle = H>,
    {
        log::debug!("Draw step '{}' ({:?})", step.label, step.primitive);
        step.transform.apply(gfx);
        for change in &step.changes {
            match change {
                StateChange::Color([r, g, b, a]) => self.dispatcher.set_color(gfx, *r, *g, *b, *a),
                StateChange::Texture(tag) => self.dispatcher.set_texture(gfx, &self.textures, tag),
                StateChange::UvScale(u, v) => self.dispatcher.set_uv_scale(gfx, *u, *v),
                StateChange::Material(tag) => {
                    self.dispatcher.set_material(gfx, &self.materials, tag)
                }
            }
        }
        anyhow::ensure!(
            self.meshes.contains(&step.primitive),
            "{:?} mesh was never uploaded",
            step.primitive
        );
        gfx.draw_mesh(step.primitive)
    }

    pub fn state(&self) -> &RenderState {
        self.dispatcher.state()
    }

    pub fn textures(&self) -> &TextureRegistry<H> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Releases the GPU textures.
    pub fn release<G: TextureBackend<Handle = H>>(mut self, gfx: &mut G) {
        self.textures.release_all(gfx);
    }
}

impl SceneAssembler {
    /// The birthday-party table: a party hat on a napkin, a wrapped present,
    /// a balloon on a string and a cake with a candle, on a wooden table over
    /// a checkered floor.
    pub fn party(asset_dir: impl Into<PathBuf>) -> Self {
        let lights = SceneLights::new()
            // candle flame
            .with(LightDescriptor::Point(PointLight {
                position: Vector3::new(0.0, 8.3, 0.0),
                ambient: Vector3::new(0.3, 0.15, 0.05),
                diffuse: Vector3::new(1.0, 0.6, 0.2),
                specular: Vector3::new(1.0, 0.8, 0.5),
                constant: 1.0,
                linear: 0.09,
                quadratic: 0.032,
                active: true,
            }))
            // soft room fill
            .with(LightDescriptor::Directional(DirectionalLight {
                direction: Vector3::new(-0.2, -1.0, -0.3),
                ambient: Vector3::new(0.1, 0.1, 0.15),
                diffuse: Vector3::new(0.2, 0.2, 0.3),
                specular: Vector3::new(0.1, 0.1, 0.15),
                active: true,
            }))
            // purple accent behind the balloon
            .with(LightDescriptor::Point(PointLight {
                position: Vector3::new(2.5, 6.0, -2.0),
                ambient: Vector3::new(0.05, 0.02, 0.08),
                diffuse: Vector3::new(0.1, 0.05, 0.2),
                specular: Vector3::new(0.1, 0.1, 0.2),
                constant: 1.0,
                linear: 0.14,
                quadratic: 0.044,
                active: true,
            }));

        let mut scene = Self::new(asset_dir)
            .with_texture("textures/Party_hat.jpg", "Party")
            .with_texture("textures/blue_party.jpg", "Blue")
            .with_texture("textures/Check_floor.jpg", "Floor")
            .with_texture("textures/table.jpg", "Table")
            .with_texture("textures/Plate.jpg", "Plate")
            .with_texture("textures/top_frosting.png", "Frost")
            .with_texture("textures/frosting_sides.png", "Frost_sides")
            .with_texture("textures/Purple_balloon.png", "balloon")
            .with_texture("textures/red_present.jpg", "present")
            .with_lights(lights)
            .with_material("Candle", [1.0, 0.85, 0.5], [0.2, 0.2, 0.2], 4.0)
            .with_material("Balloon", [0.4, 0.1, 0.6], [0.3, 0.2, 0.5], 16.0)
            .with_material("WrappingPaper", [0.7, 0.0, 0.0], [1.0, 0.9, 0.3], 64.0)
            .with_material("Wood", [0.4, 0.25, 0.1], [0.05, 0.05, 0.05], 4.0)
            .with_material("PaperHat", [0.8, 0.4, 0.6], [0.1, 0.1, 0.1], 2.0)
            .with_material("Cake", [0.95, 0.8, 0.7], [0.2, 0.15, 0.1], 8.0)
            .with_material("Ceramic", [0.9, 0.9, 0.95], [0.9, 0.9, 0.9], 48.0);

        let none = [0.0, 0.0, 0.0];
        let at = |scale: [f32; 3], rotation: [f32; 3], position: [f32; 3]| {
            Transform::from_parts(scale, rotation, position)
        };

        scene = scene
            .with_step(
                DrawStep::new("floor", Primitive::Plane, at([20.0, 1.0, 10.0], none, none))
                    .texture("Floor")
                    .uv_scale(2.5, 2.5)
                    .material("Ceramic"),
            )
            .with_step(
                DrawStep::new("party hat", Primitive::Cone, at([1.0, 2.25, 1.0], none, [5.0, 4.36, -1.5]))
                    .texture("Party")
                    .uv_scale(1.0, 1.0)
                    .material("PaperHat"),
            )
            .with_step(
                DrawStep::new("hat pompom", Primitive::Sphere, at([0.25, 0.25, 0.25], none, [5.0, 6.8, -1.5]))
                    .texture("Blue")
                    .uv_scale(1.0, 1.0)
                    .material("PaperHat"),
            )
            // keeps the PaperHat material of the previous step
            .with_step(
                DrawStep::new("napkin", Primitive::Box, at([5.0, 0.01, 5.0], [0.0, 35.0, 0.0], [5.0, 4.33, -1.5]))
                    .texture("Blue")
                    .uv_scale(1.0, 1.0),
            )
            .with_step(
                DrawStep::new("table top", Primitive::Box, at([19.0, 0.5, 10.0], none, [0.0, 4.0, 0.0]))
                    .texture("Table")
                    .uv_scale(3.0, 3.0)
                    .material("Wood"),
            );

        let leg_scale = [0.3, 4.0, 0.3];
        let leg_centre_y = leg_scale[1] / 2.0;
        for (x, z) in [(-9.2, -4.7), (9.2, -4.7), (-9.2, 4.7), (9.2, 4.7)] {
            scene = scene.with_step(
                DrawStep::new("table leg", Primitive::Box, at(leg_scale, none, [x, leg_centre_y, z]))
                    .texture("Table")
                    .uv_scale(1.0, 1.0)
                    .material("Wood"),
            );
        }

        scene
            .with_step(
                DrawStep::new("present", Primitive::Box, at([3.0, 3.0, 3.0], [0.0, -35.0, 0.0], [-6.0, 5.76, -2.0]))
                    .color(0.6, 0.1, 0.1, 1.0)
                    .texture("present")
                    .uv_scale(0.2, 0.5)
                    .material("WrappingPaper"),
            )
            .with_step(
                DrawStep::new("balloon", Primitive::Sphere, at([2.0, 2.5, 2.0], none, [4.0, 12.0, -4.0]))
                    .material("Balloon")
                    .texture("balloon")
                    .uv_scale(1.0, 1.0),
            )
            .with_step(
                DrawStep::new("balloon knot", Primitive::Pyramid4, at([0.3, 0.3, 0.3], none, [4.0, 9.45, -4.0]))
                    .texture("balloon")
                    .uv_scale(1.0, 1.0)
                    .material("Balloon"),
            )
            // keeps the Balloon material
            .with_step(
                DrawStep::new("balloon string", Primitive::Cylinder, at([0.025, 10.0, 0.05], none, [4.0, 4.2, -4.0]))
                    .color(0.3, 0.3, 0.3, 1.0),
            )
            // "Cake" names a material, not a texture: the second call wins and
            // selects no texture
            .with_step(
                DrawStep::new("cake", Primitive::Cylinder, at([3.0, 2.0, 3.0], none, [0.0, 4.33, 0.0]))
                    .texture("Frost_sides")
                    .texture("Cake")
                    .uv_scale(1.5, 1.5),
            )
            .with_step(
                DrawStep::new("icing", Primitive::Cylinder, at([3.01, 0.1, 3.01], none, [0.0, 6.18, 0.0]))
                    .texture("Frost")
                    .texture("Cake")
                    .uv_scale(1.0, 1.0),
            )
            .with_step(
                DrawStep::new("plate", Primitive::Cylinder, at([3.5, 0.1, 3.5], none, [0.0, 4.33, 0.0]))
                    .texture("Plate")
                    .uv_scale(1.0, 1.0)
                    .material("Ceramic"),
            )
            .with_step(
                DrawStep::new("candle", Primitive::Cylinder, at([0.1, 2.0, 0.1], none, [0.0, 6.33, 0.0]))
                    .color(0.9, 0.9, 0.4, 1.0)
                    .material("Candle"),
            )
    }
}
