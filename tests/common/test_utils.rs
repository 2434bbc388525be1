#![allow(dead_code)]

use std::{
    cell::Cell,
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
};

use party_scene::{
    resources::{
        mesh::{MeshLibrary, Primitive},
        texture::{DecodedImage, ImageCodec, TextureBackend, TextureError},
    },
    uniforms::{ShaderInterface, UniformStore, UniformValue},
};

/// Uniform state captured at the moment a mesh was drawn.
#[derive(Clone, Debug)]
pub(crate) struct DrawRecord {
    pub primitive: Primitive,
    pub uniforms: UniformStore,
}

/// Graphics backend that records everything it is asked to do.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub uniforms: UniformStore,
    pub draws: Vec<DrawRecord>,
    pub mesh_loads: HashMap<Primitive, usize>,
    pub uploads: Vec<String>,
    pub bound: BTreeMap<usize, u32>,
    pub released: Vec<u32>,
    pub fail_uploads: bool,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_draw(&self) -> &DrawRecord {
        self.draws.last().expect("nothing was drawn")
    }
}

impl ShaderInterface for RecordingBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set_uniform(name, value);
    }
}

impl TextureBackend for RecordingBackend {
    type Handle = u32;

    fn upload_texture(&mut self, tag: &str, _: &DecodedImage) -> Result<u32, TextureError> {
        if self.fail_uploads {
            return Err(TextureError::Upload {
                tag: tag.to_string(),
                reason: "uploads disabled".to_string(),
            });
        }
        self.uploads.push(tag.to_string());
        self.next_handle += 1;
        Ok(self.next_handle)
    }

    fn bind_texture(&mut self, slot: usize, handle: &u32) {
        self.bound.insert(slot, *handle);
    }

    fn release_texture(&mut self, handle: u32) {
        self.released.push(handle);
    }
}

impl MeshLibrary for RecordingBackend {
    fn load_mesh(&mut self, primitive: Primitive) -> anyhow::Result<()> {
        *self.mesh_loads.entry(primitive).or_default() += 1;
        Ok(())
    }

    fn draw_mesh(&mut self, primitive: Primitive) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.mesh_loads.contains_key(&primitive),
            "{primitive:?} drawn before load"
        );
        self.draws.push(DrawRecord {
            primitive,
            uniforms: self.uniforms.clone(),
        });
        Ok(())
    }
}

pub(crate) fn image(width: u32, height: u32, channels: u8) -> DecodedImage {
    DecodedImage {
        pixels: vec![128; (width * height * channels as u32) as usize],
        width,
        height,
        channels,
    }
}

/// In-memory image codec.
///
/// Known paths decode to their registered image. Unknown paths decode to a
/// 2x2 RGB image when `accept_unknown` is set and fail otherwise. Paths in
/// `broken` always fail.
#[derive(Debug, Default)]
pub(crate) struct FakeCodec {
    images: HashMap<PathBuf, DecodedImage>,
    broken: HashSet<PathBuf>,
    accept_unknown: bool,
    pub decode_calls: Cell<usize>,
}

impl FakeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting_everything() -> Self {
        Self {
            accept_unknown: true,
            ..Self::default()
        }
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>, image: DecodedImage) -> Self {
        self.images.insert(path.into(), image);
        self
    }

    pub fn with_broken(mut self, path: impl Into<PathBuf>) -> Self {
        self.broken.insert(path.into());
        self
    }
}

impl ImageCodec for FakeCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, TextureError> {
        self.decode_calls.set(self.decode_calls.get() + 1);
        let fail = || TextureError::Decode {
            path: path.display().to_string(),
            reason: "not an image".to_string(),
        };
        if self.broken.contains(path) {
            return Err(fail());
        }
        match self.images.get(path) {
            Some(image) => Ok(image.clone()),
            None if self.accept_unknown => Ok(image(2, 2, 3)),
            None => Err(fail()),
        }
    }
}
