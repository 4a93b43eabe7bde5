use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoaderError;

pub const MANIFEST_FILE: &str = "nytrix.toml";

/// `nytrix.toml` — the package manifest analogue. Optional: a bare `.ny`
/// file or directory with no manifest compiles fine with defaulted values
/// (`SPEC_FULL.md` §0 "Config").
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub package: Package,
    #[serde(default)]
    pub link: LinkOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub authors: Vec<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Extra linker flags a package manifest can contribute to AOT builds
/// (`spec.md` §4.5.7).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LinkOptions {
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default)]
    pub lib_dirs: Vec<String>,
}

impl Manifest {
    pub fn new(name: impl Into<String>) -> Manifest {
        Manifest {
            package: Package { name: name.into(), version: default_version(), authors: Vec::new() },
            link: LinkOptions::default(),
        }
    }

    /// Parses `package.version` as semver, matching `passerine-aspen`'s use
    /// of the same crate for manifest version fields.
    pub fn semver(&self) -> Result<semver::Version, semver::SemVerError> {
        semver::Version::parse(&self.package.version)
    }

    pub fn parse(source: &str) -> Result<Manifest, LoaderError> {
        toml::from_str(source).map_err(|e| LoaderError::BadManifest(PathBuf::from(MANIFEST_FILE), e.to_string()))
    }

    /// Searches `start` and its ancestors for `nytrix.toml`, mirroring the
    /// teacher's package-manifest upward search.
    pub fn discover(start: &Path) -> Option<(Manifest, PathBuf)> {
        let mut dir = Some(start);
        while let Some(d) = dir {
            let candidate = d.join(MANIFEST_FILE);
            if candidate.is_file() {
                let text = fs::read_to_string(&candidate).ok()?;
                return Manifest::parse(&text).ok().map(|m| (m, d.to_path_buf()));
            }
            dir = d.parent();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let manifest = Manifest::parse("[package]\nname = \"demo\"\n").unwrap();
        assert_eq!(manifest.package.name, "demo");
        assert_eq!(manifest.package.version, "0.0.0");
    }

    #[test]
    fn parses_link_options() {
        let manifest = Manifest::parse(
            "[package]\nname = \"demo\"\n[link]\nlibs = [\"m\"]\nlib_dirs = [\"/opt/lib\"]\n",
        )
        .unwrap();
        assert_eq!(manifest.link.libs, vec!["m".to_string()]);
    }
}
