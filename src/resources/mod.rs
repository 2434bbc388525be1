/**
 * This module contains everything the scene loads or defines before the first
 * draw: textures, materials and the primitive meshes.
 */
pub mod material;
pub mod mesh;
pub mod texture;

use std::path::{Path, PathBuf};

/// Resolves a scene-relative asset path against the configured asset root.
/// Absolute paths are returned unchanged.
pub fn resolve_asset(asset_dir: &Path, file_name: &str) -> PathBuf {
    let path = Path::new(file_name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        asset_dir.join(path)
    }
}
