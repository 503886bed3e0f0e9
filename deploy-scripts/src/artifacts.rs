//! Loading of compiled contract artifacts
//!
//! Artifacts are read from the JSON files emitted by the contract toolchain.
//! Both the Hardhat layout (`"bytecode": "0x..."`) and the Foundry layout
//! (`"bytecode": { "object": "0x..." }`) are accepted.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{hex, keccak256, Bytes, B256};
use serde::Deserialize;
use tracing::debug;

use crate::{constants::JSON_EXTENSION, errors::DeployError};

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// The keccak256 hash of the creation bytecode
    pub fn bytecode_hash(&self) -> B256 {
        keccak256(&self.bytecode)
    }
}

/// The subset of an artifact file the scripts read
#[derive(Deserialize)]
struct ArtifactFile {
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    bytecode: ArtifactBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    Hex(String),
    Object { object: String },
}

impl ArtifactBytecode {
    fn into_hex(self) -> String {
        match self {
            ArtifactBytecode::Hex(s) | ArtifactBytecode::Object { object: s } => s,
        }
    }
}

/// A directory of compiled contract artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The root of the artifacts directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the artifact for `contract`, failing if there is none
    pub fn load(&self, contract: &str) -> Result<Artifact, DeployError> {
        self.find(contract)?.ok_or_else(|| {
            DeployError::ArtifactParsing(format!(
                "no artifact for `{}` under {}",
                contract,
                self.dir.display()
            ))
        })
    }

    /// Load the artifact for `contract`, `None` if no artifact file exists for it.
    ///
    /// Looks for `<dir>/<contract>.json` first, then searches the directory tree,
    /// which covers the `<source>.sol/<contract>.json` nesting Hardhat produces.
    /// A file that exists but does not parse is an error, as is a name found in more
    /// than one place in the tree
    pub fn find(&self, contract: &str) -> Result<Option<Artifact>, DeployError> {
        let file_name = format!("{contract}.{JSON_EXTENSION}");
        let direct = self.dir.join(&file_name);
        let path = if direct.is_file() {
            direct
        } else {
            let mut found = Vec::new();
            find_files(&self.dir, &file_name, &mut found)?;
            found.sort();

            match found.as_slice() {
                [] => return Ok(None),
                [path] => path.clone(),
                paths => {
                    let paths: Vec<String> =
                        paths.iter().map(|p| p.display().to_string()).collect();
                    return Err(DeployError::ArtifactParsing(format!(
                        "{contract}: ambiguous artifact, found {}",
                        paths.join(", ")
                    )));
                }
            }
        };

        debug!("loading artifact for {} from {}", contract, path.display());
        let contents =
            fs::read_to_string(&path).map_err(|e| DeployError::ArtifactParsing(e.to_string()))?;
        parse_artifact(contract, &contents).map(Some)
    }
}

/// Parse the contents of an artifact file for `contract`
pub fn parse_artifact(contract: &str, contents: &str) -> Result<Artifact, DeployError> {
    let file: ArtifactFile = serde_json::from_str(contents)
        .map_err(|e| DeployError::ArtifactParsing(format!("{contract}: {e}")))?;

    let bytecode_hex = file.bytecode.into_hex();
    // Unlinked library references appear as `__$<hash>$__` placeholders
    if bytecode_hex.contains("__") {
        return Err(DeployError::ArtifactParsing(format!(
            "{contract}: bytecode contains unlinked library placeholders"
        )));
    }

    let bytecode = hex::decode(&bytecode_hex)
        .map_err(|e| DeployError::ArtifactParsing(format!("{contract}: {e}")))?;
    if bytecode.is_empty() {
        return Err(DeployError::ArtifactParsing(format!(
            "{contract}: empty bytecode, is it an interface or abstract contract?"
        )));
    }

    Ok(Artifact {
        contract_name: file.contract_name.unwrap_or_else(|| contract.to_string()),
        bytecode: bytecode.into(),
    })
}

/// Collect every file named `file_name` below `dir`
fn find_files(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), DeployError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let entries = fs::read_dir(dir).map_err(|e| DeployError::ArtifactParsing(e.to_string()))?;
    for entry in entries {
        let path = entry
            .map_err(|e| DeployError::ArtifactParsing(e.to_string()))?
            .path();
        if path.is_dir() {
            find_files(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|name| name == file_name) {
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("artifacts-{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_hardhat_artifact() {
        let artifact = parse_artifact(
            "WETH",
            r#"{ "contractName": "WETH9", "abi": [], "bytecode": "0x6080604052" }"#,
        )
        .unwrap();

        assert_eq!(artifact.contract_name, "WETH9");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_parse_foundry_artifact() {
        let artifact = parse_artifact(
            "BonusToken",
            r#"{ "abi": [], "bytecode": { "object": "0x6080", "linkReferences": {} } }"#,
        )
        .unwrap();

        assert_eq!(artifact.contract_name, "BonusToken");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_reject_unusable_bytecode() {
        let empty = parse_artifact("IERC20", r#"{ "bytecode": "0x" }"#);
        assert!(matches!(empty, Err(DeployError::ArtifactParsing(_))));

        let unlinked = parse_artifact(
            "Router",
            r#"{ "bytecode": "0x6080__$3f2a1b7c9d$__6080" }"#,
        );
        assert!(matches!(unlinked, Err(DeployError::ArtifactParsing(_))));
    }

    #[test]
    fn test_load_nested_artifact() {
        let dir = temp_dir();
        let nested = dir.join("contracts").join("core").join("UniswapV2Factory.sol");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            nested.join("UniswapV2Factory.json"),
            r#"{ "contractName": "UniswapV2Factory", "bytecode": "0x60806040" }"#,
        )
        .unwrap();

        let store = ArtifactStore::new(&dir);
        let artifact = store.load("UniswapV2Factory").unwrap();
        assert_eq!(artifact.bytecode_hash(), keccak256([0x60u8, 0x80, 0x60, 0x40]));

        assert!(store.load("UniswapV2Pair").is_err());
        assert!(store.find("UniswapV2Pair").unwrap().is_none());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_malformed_artifact_is_an_error() {
        let dir = temp_dir();
        fs::write(dir.join("UniswapV2Pair.json"), "{ not json").unwrap();

        let store = ArtifactStore::new(&dir);
        let res = store.find("UniswapV2Pair");
        assert!(matches!(res, Err(DeployError::ArtifactParsing(_))));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_duplicate_nested_artifact_is_an_error() {
        let dir = temp_dir();
        for source in ["contracts/ERC20.sol", "@openzeppelin/token/ERC20.sol"] {
            let nested = dir.join(source);
            fs::create_dir_all(&nested).unwrap();
            fs::write(nested.join("ERC20.json"), r#"{ "bytecode": "0x6080" }"#).unwrap();
        }

        let store = ArtifactStore::new(&dir);
        let res = store.load("ERC20");
        assert!(matches!(res, Err(DeployError::ArtifactParsing(msg)) if msg.contains("ambiguous")));

        // A top-level artifact takes precedence over nested ones
        fs::write(dir.join("ERC20.json"), r#"{ "bytecode": "0x60806040" }"#).unwrap();
        assert_eq!(store.load("ERC20").unwrap().bytecode.len(), 4);

        fs::remove_dir_all(dir).unwrap();
    }
}
