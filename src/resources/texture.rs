//! Tag-addressed texture slots.
//!
//! [`TextureRegistry`] decodes images through an [`ImageCodec`], hands the
//! pixels to a [`TextureBackend`] for upload and records the result under a
//! caller-chosen tag at the next free slot. Slots are bounded by
//! [`MAX_TEXTURE_SLOTS`]; the registry refuses to grow past it.

use std::{fmt::Debug, path::Path};

use image::{ColorType, DynamicImage};

pub const MAX_TEXTURE_SLOTS: usize = 16;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    #[error("could not decode image {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("image {path} has {channels} channels; only RGB and RGBA are supported")]
    UnsupportedChannels { path: String, channels: u8 },

    #[error("cannot register texture '{tag}': all {capacity} texture slots are in use")]
    CapacityExceeded { tag: String, capacity: usize },

    #[error("texture tag '{0}' is already registered")]
    DuplicateTag(String),

    #[error("failed to upload texture '{tag}': {reason}")]
    Upload { tag: String, reason: String },
}

/// Raw pixels as produced by an [`ImageCodec`].
///
/// Rows are stored bottom-up (flipped on load) so that texture coordinate
/// `v = 0` addresses the bottom of the image.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl DecodedImage {
    /// Expands the pixel buffer to tightly packed RGBA8.
    ///
    /// RGB input gets an opaque alpha channel. Any other channel count is
    /// rejected with [`TextureError::UnsupportedChannels`].
    pub fn to_rgba8(&self, path: &str) -> Result<Vec<u8>, TextureError> {
        match self.channels {
            4 => Ok(self.pixels.clone()),
            3 => Ok(self
                .pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
                .collect()),
            channels => Err(TextureError::UnsupportedChannels {
                path: path.to_string(),
                channels,
            }),
        }
    }
}

/// Decodes an image file into raw pixels.
pub trait ImageCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, TextureError>;
}

/// [`ImageCodec`] backed by the `image` crate. Images are flipped vertically
/// on load and keep their native channel count.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, TextureError> {
        let img = image::open(path).map_err(|e| TextureError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(decode_dynamic(img.flipv()))
    }
}

fn decode_dynamic(img: DynamicImage) -> DecodedImage {
    let (width, height) = (img.width(), img.height());
    match img.color() {
        ColorType::Rgb8 => DecodedImage {
            pixels: img.into_rgb8().into_raw(),
            width,
            height,
            channels: 3,
        },
        ColorType::Rgba8 => DecodedImage {
            pixels: img.into_rgba8().into_raw(),
            width,
            height,
            channels: 4,
        },
        // Wider formats are narrowed to 8 bits but keep their channel count,
        // so greyscale images still report 1 or 2 channels and get rejected.
        other => {
            let channels = other.channel_count();
            let pixels = match channels {
                1 => img.into_luma8().into_raw(),
                2 => img.into_luma_alpha8().into_raw(),
                3 => img.into_rgb8().into_raw(),
                _ => img.into_rgba8().into_raw(),
            };
            DecodedImage {
                pixels,
                width,
                height,
                channels,
            }
        }
    }
}

/// GPU side of texture management.
pub trait TextureBackend {
    type Handle: Clone + Debug;

    /// Uploads RGBA8 pixels (repeat wrapping, linear filtering, full mip chain).
    fn upload_texture(
        &mut self,
        tag: &str,
        image: &DecodedImage,
    ) -> Result<Self::Handle, TextureError>;

    /// Makes `handle` the texture sampled through unit `slot`.
    fn bind_texture(&mut self, slot: usize, handle: &Self::Handle);

    /// Frees the GPU resources behind `handle`.
    fn release_texture(&mut self, handle: Self::Handle);
}

#[derive(Clone, Debug)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub slot: usize,
    pub handle: H,
}

/// Bounded, tag-addressed set of loaded textures.
#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
}

impl<H: Clone + Debug> TextureRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }

    /// Decodes `path`, uploads it and registers it under `tag`.
    ///
    /// Returns the assigned slot. Slots are handed out in call order starting
    /// at 0. On any failure nothing is registered and the error is logged.
    pub fn load<B, C>(
        &mut self,
        backend: &mut B,
        codec: &C,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> Result<usize, TextureError>
    where
        B: TextureBackend<Handle = H>,
        C: ImageCodec + ?Sized,
    {
        let path = path.as_ref();
        let result = self.try_load(backend, codec, path, tag);
        match &result {
            Ok(slot) => log::info!("Loaded texture '{tag}' from {} into slot {slot}", path.display()),
            Err(e) => log::error!("Texture '{tag}' not loaded: {e}"),
        }
        result
    }

    fn try_load<B, C>(
        &mut self,
        backend: &mut B,
        codec: &C,
        path: &Path,
        tag: &str,
    ) -> Result<usize, TextureError>
    where
        B: TextureBackend<Handle = H>,
        C: ImageCodec + ?Sized,
    {
        if self.entries.len() >= MAX_TEXTURE_SLOTS {
            return Err(TextureError::CapacityExceeded {
                tag: tag.to_string(),
                capacity: MAX_TEXTURE_SLOTS,
            });
        }
        if self.entries.iter().any(|e| e.tag == tag) {
            return Err(TextureError::DuplicateTag(tag.to_string()));
        }

        let image = codec.decode(path)?;
        if !matches!(image.channels, 3 | 4) {
            return Err(TextureError::UnsupportedChannels {
                path: path.display().to_string(),
                channels: image.channels,
            });
        }
        log::debug!(
            "Decoded {}: {}x{}, {} channels",
            path.display(),
            image.width,
            image.height,
            image.channels
        );

        let handle = backend.upload_texture(tag, &image)?;
        let slot = self.entries.len();
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            slot,
            handle,
        });
        Ok(slot)
    }

    /// Binds every entry to the texture unit matching its slot.
    pub fn bind_all<B: TextureBackend<Handle = H>>(&self, backend: &mut B) {
        for entry in &self.entries {
            backend.bind_texture(entry.slot, &entry.handle);
        }
        log::debug!("Bound {} textures", self.entries.len());
    }

    pub fn lookup_slot(&self, tag: &str) -> Option<usize> {
        self.find(tag).map(|e| e.slot)
    }

    pub fn lookup_handle(&self, tag: &str) -> Option<&H> {
        self.find(tag).map(|e| &e.handle)
    }

    fn find(&self, tag: &str) -> Option<&TextureEntry<H>> {
        let found = self.entries.iter().find(|e| e.tag == tag);
        match found {
            Some(entry) => log::debug!("Texture '{tag}' found in slot {}", entry.slot),
            None => log::warn!("Texture '{tag}' is not registered"),
        }
        found
    }

    /// Destroys every GPU texture and empties the registry. Calling it again
    /// is a no-op.
    pub fn release_all<B: TextureBackend<Handle = H>>(&mut self, backend: &mut B) {
        let released = self.entries.len();
        for entry in self.entries.drain(..) {
            backend.release_texture(entry.handle);
        }
        if released > 0 {
            log::info!("Released {released} textures");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Clone + Debug> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
