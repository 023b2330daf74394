//! Cache keys derived from the indexing inputs.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex SHA-256 over the toolchain version, project root, build directory
/// and every source path in order. Components are NUL-separated so that
/// shifting characters between neighbours changes the key.
pub fn cache_key<P: AsRef<Path>>(
    toolchain: &str,
    project_root: &Path,
    build_directory: &Path,
    files: &[P],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(toolchain.as_bytes());
    hasher.update([0u8]);
    hasher.update(project_root.to_string_lossy().as_bytes());
    hasher.update([0u8]);
    hasher.update(build_directory.to_string_lossy().as_bytes());
    for file in files {
        hasher.update([0u8]);
        hasher.update(file.as_ref().to_string_lossy().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
