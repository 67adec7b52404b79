//! Compiled contract artifacts.
//!
//! Both Hardhat (`artifacts/contracts/Foo.sol/Foo.json`, `"bytecode": "0x…"`) and
//! Foundry (`out/Foo.sol/Foo.json`, `"bytecode": {"object": "0x…"}`) layouts are
//! understood. Only the creation bytecode is read; the ABI comes from the
//! [`contracts`](crate::contracts) bindings.

use std::{
    io,
    path::{Path, PathBuf},
};

use alloy_primitives::{Bytes, hex};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors raised while locating or parsing an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifacts root does not exist.
    #[error("artifacts directory {0} does not exist (compile the contracts first)")]
    MissingRoot(PathBuf),
    /// No file matched the contract name.
    #[error("no artifact for {name} under {root}")]
    NotFound {
        /// Contract name.
        name: String,
        /// Directory searched.
        root: PathBuf,
    },
    /// Several files matched the contract name.
    #[error("artifact for {name} is ambiguous: {}", display_paths(.candidates))]
    Ambiguous {
        /// Contract name.
        name: String,
        /// Matching files.
        candidates: Vec<PathBuf>,
    },
    /// The artifact could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The artifact is not valid artifact JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The artifact has no creation code.
    #[error("{path} has no creation bytecode (abstract contract or interface?)")]
    EmptyBytecode {
        /// Artifact path.
        path: PathBuf,
    },
    /// The bytecode references libraries that were never linked.
    #[error("{path} contains unlinked library placeholders")]
    Unlinked {
        /// Artifact path.
        path: PathBuf,
    },
    /// The bytecode is not valid hex.
    #[error("invalid bytecode in {path}: {reason}")]
    InvalidHex {
        /// Artifact path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hardhat(String),
    Foundry { object: String },
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    bytecode: RawBytecode,
}

/// Creation code of one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// Contract name.
    pub name: String,
    /// File the artifact was read from.
    pub path: PathBuf,
    /// Creation bytecode, without constructor arguments.
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parses artifact JSON read from `path`.
    pub fn parse(name: &str, path: &Path, contents: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(contents)
            .map_err(|source| ArtifactError::Parse { path: path.to_path_buf(), source })?;

        let code = match &raw.bytecode {
            RawBytecode::Hardhat(code) => code,
            RawBytecode::Foundry { object } => object,
        };
        let code = code.trim();
        let digits = code.strip_prefix("0x").unwrap_or(code);

        if digits.is_empty() {
            return Err(ArtifactError::EmptyBytecode { path: path.to_path_buf() });
        }
        // Hardhat leaves `__$<hash>$__`, solc `__<name>__`.
        if digits.contains("__") {
            return Err(ArtifactError::Unlinked { path: path.to_path_buf() });
        }

        let bytecode = hex::decode(digits).map_err(|e| ArtifactError::InvalidHex {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self { name: name.to_string(), path: path.to_path_buf(), bytecode: bytecode.into() })
    }
}

/// Finds artifacts below a build output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory searched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the artifact of contract `name`.
    pub fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let path = self.find(name)?;
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ArtifactError::Io { path: path.clone(), source })?;
        let artifact = ContractArtifact::parse(name, &path, &contents)?;

        debug!(
            contract = name,
            path = %path.display(),
            size = artifact.bytecode.len(),
            "Loaded contract artifact"
        );
        Ok(artifact)
    }

    fn find(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        if !self.root.is_dir() {
            return Err(ArtifactError::MissingRoot(self.root.clone()));
        }

        let file_name = format!("{name}.json");
        let mut candidates = Vec::new();
        let mut walk_error = None;

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != "build-info");
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
                        candidates.push(entry.into_path());
                    }
                }
                Err(err) => {
                    debug!(error = %err, root = %self.root.display(), "Skipping unreadable entry");
                    walk_error.get_or_insert(err);
                }
            }
        }
        candidates.sort();

        match candidates.len() {
            // An unreadable subtree may hide the artifact; report that instead.
            0 => match walk_error {
                Some(err) => Err(ArtifactError::Io {
                    path: err.path().unwrap_or(&self.root).to_path_buf(),
                    source: err.into(),
                }),
                None => {
                    Err(ArtifactError::NotFound { name: name.to_string(), root: self.root.clone() })
                }
            },
            1 => Ok(candidates.remove(0)),
            _ => Err(ArtifactError::Ambiguous { name: name.to_string(), candidates }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn hardhat_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "contracts/Timelock.sol/Timelock.json",
            r#"{"contractName":"Timelock","abi":[],"bytecode":"0x6080604052","deployedBytecode":"0x"}"#,
        );
        write(dir.path(), "contracts/Timelock.sol/Timelock.dbg.json", r#"{"buildInfo":"x"}"#);

        let artifact = ArtifactStore::new(dir.path()).load("Timelock").unwrap();
        assert_eq!(artifact.name, "Timelock");
        assert_eq!(artifact.bytecode, Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]));
    }

    #[test]
    fn foundry_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Voting.sol/Voting.json",
            r#"{"abi":[],"bytecode":{"object":"0xdeadbeef","linkReferences":{}}}"#,
        );

        let artifact = ArtifactStore::new(dir.path()).load("Voting").unwrap();
        assert_eq!(artifact.bytecode, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn build_info_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "build-info/Voting.json", r#"{"bytecode":"0x01"}"#);
        write(dir.path(), "contracts/Voting.sol/Voting.json", r#"{"bytecode":"0x02"}"#);

        let artifact = ArtifactStore::new(dir.path()).load("Voting").unwrap();
        assert_eq!(artifact.bytecode, Bytes::from_static(&[0x02]));
    }

    #[test]
    fn missing_root() {
        let store = ArtifactStore::new("/definitely/not/here");
        assert!(matches!(store.load("Voting"), Err(ArtifactError::MissingRoot(_))));
    }

    #[test]
    fn not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = ArtifactStore::new(dir.path()).load("MyGovernor");
        assert!(matches!(result, Err(ArtifactError::NotFound { .. })));
    }

    #[test]
    fn ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/Voting.sol/Voting.json", r#"{"bytecode":"0x01"}"#);
        write(dir.path(), "b/Voting.sol/Voting.json", r#"{"bytecode":"0x02"}"#);

        let err = ArtifactStore::new(dir.path()).load("Voting").unwrap_err();
        match err {
            ArtifactError::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn walk_error_is_not_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("contracts");
        std::fs::create_dir_all(&nested).unwrap();
        std::os::unix::fs::symlink(dir.path(), nested.join("loop")).unwrap();

        let err = ArtifactStore::new(dir.path()).load("Voting").unwrap_err();
        match err {
            ArtifactError::Io { path, .. } => assert!(path.ends_with("loop")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn walk_error_does_not_hide_a_found_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "contracts/Voting.sol/Voting.json", r#"{"bytecode":"0x02"}"#);
        std::os::unix::fs::symlink(dir.path(), dir.path().join("contracts/loop")).unwrap();

        let artifact = ArtifactStore::new(dir.path()).load("Voting").unwrap();
        assert_eq!(artifact.bytecode, Bytes::from_static(&[0x02]));
    }

    #[test]
    fn empty_bytecode() {
        let result = ContractArtifact::parse("IVotes", Path::new("IVotes.json"), r#"{"bytecode":"0x"}"#);
        assert!(matches!(result, Err(ArtifactError::EmptyBytecode { .. })));
    }

    #[test]
    fn unlinked_placeholders() {
        let json = r#"{"bytecode":"0x6080__$1234567890abcdef1234567890abcdef12$__6040"}"#;
        let result = ContractArtifact::parse("Lib", Path::new("Lib.json"), json);
        assert!(matches!(result, Err(ArtifactError::Unlinked { .. })));
    }

    #[test]
    fn invalid_hex() {
        let result = ContractArtifact::parse("Bad", Path::new("Bad.json"), r#"{"bytecode":"0xzz"}"#);
        assert!(matches!(result, Err(ArtifactError::InvalidHex { .. })));
    }

    #[test]
    fn missing_bytecode_field() {
        let result = ContractArtifact::parse("Bad", Path::new("Bad.json"), r#"{"abi":[]}"#);
        assert!(matches!(result, Err(ArtifactError::Parse { .. })));
    }
}
