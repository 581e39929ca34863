//! Location and integrity checks for the model artifact.
//!
//! The service depends on a single local artifact directory holding the
//! fitted tokenizer (`tokenizer.json`) and the multi-label classification
//! head (`model.onnx`). Both are read once at startup; if either is
//! missing or fails verification the process must not start.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid artifact manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("hash mismatch: expected {expected}, got {actual} for {file} file")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

/// Optional sidecar listing the expected SHA-256 digests of the artifact
/// files. When present it is enforced at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactManifest {
    pub model_sha256: String,
    pub tokenizer_sha256: String,
}

/// Resolves and verifies the artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    artifact_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(artifact_dir: P) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
        }
    }

    /// Returns the default artifact directory.
    ///
    /// Resolution order: `SYMPTOMSCAN_MODEL_DIR`, a `model/` directory next
    /// to the process, the platform cache directory, the system temp
    /// directory.
    pub fn default_dir() -> PathBuf {
        if let Ok(path) = env::var("SYMPTOMSCAN_MODEL_DIR") {
            return PathBuf::from(path);
        }

        let local = PathBuf::from("model");
        if local.is_dir() {
            return local;
        }

        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("symptomscan").join("model");
        }

        env::temp_dir().join("symptomscan").join("model")
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(MODEL_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.artifact_dir.join(TOKENIZER_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.artifact_dir.join(MANIFEST_FILE)
    }

    /// Checks that both artifact files exist and, when a manifest sidecar
    /// is present, that their digests match it.
    pub fn verify(&self) -> Result<(), ArtifactError> {
        let model_path = self.model_path();
        let tokenizer_path = self.tokenizer_path();

        for path in [&model_path, &tokenizer_path] {
            if !path.is_file() {
                return Err(ArtifactError::NotFound(path.clone()));
            }
        }

        let manifest_path = self.manifest_path();
        if manifest_path.is_file() {
            let manifest: ArtifactManifest =
                serde_json::from_slice(&fs::read(&manifest_path)?)?;
            verify_file(&model_path, &manifest.model_sha256, "model")?;
            verify_file(&tokenizer_path, &manifest.tokenizer_sha256, "tokenizer")?;
            info!(dir = %self.artifact_dir.display(), "model artifact verified against manifest");
        } else {
            debug!(dir = %self.artifact_dir.display(), "no artifact manifest, skipping digest check");
        }

        Ok(())
    }
}

fn verify_file(path: &Path, expected_hash: &str, file_type: &str) -> Result<(), ArtifactError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let hash = format!("{:x}", hasher.finalize());
    debug!(file = file_type, %hash, expected = expected_hash, "verified artifact digest");

    if hash != expected_hash {
        return Err(ArtifactError::HashMismatch {
            file: file_type.to_string(),
            expected: expected_hash.to_string(),
            actual: hash,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join("symptomscan-tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sha256_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    #[test]
    fn test_missing_files_fail_verification() {
        let dir = setup_dir("missing");
        let store = ArtifactStore::new(&dir);
        assert!(matches!(store.verify(), Err(ArtifactError::NotFound(_))));
    }

    #[test]
    fn test_verification_without_manifest() {
        let dir = setup_dir("no-manifest");
        fs::write(dir.join(MODEL_FILE), b"onnx bytes").unwrap();
        fs::write(dir.join(TOKENIZER_FILE), b"{}").unwrap();

        let store = ArtifactStore::new(&dir);
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_manifest_digests_enforced() {
        let dir = setup_dir("manifest");
        fs::write(dir.join(MODEL_FILE), b"onnx bytes").unwrap();
        fs::write(dir.join(TOKENIZER_FILE), b"{}").unwrap();

        let manifest = format!(
            r#"{{"model_sha256": "{}", "tokenizer_sha256": "{}"}}"#,
            sha256_hex(b"onnx bytes"),
            sha256_hex(b"{}"),
        );
        fs::write(dir.join(MANIFEST_FILE), &manifest).unwrap();

        let store = ArtifactStore::new(&dir);
        assert!(store.verify().is_ok());

        // Corrupt the model file; the manifest digest no longer matches.
        fs::write(dir.join(MODEL_FILE), b"corrupted data").unwrap();
        assert!(matches!(
            store.verify(),
            Err(ArtifactError::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_paths_are_rooted_in_artifact_dir() {
        let store = ArtifactStore::new("/opt/symptomscan/model");
        assert_eq!(
            store.model_path(),
            PathBuf::from("/opt/symptomscan/model/model.onnx")
        );
        assert_eq!(
            store.tokenizer_path(),
            PathBuf::from("/opt/symptomscan/model/tokenizer.json")
        );
    }
}
