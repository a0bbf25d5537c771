//! Source-build recipes for packages that can be fetched and compiled locally.
//!
//! A recipe says where the release tarball lives, what directory it unpacks
//! into, and which versioned shared object an autotools build installs, so the
//! builder can copy it into the package-local library directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::platform::OsKind;

/// How to fetch and build one package from source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecipe {
    /// Logical package name (also the pkg-config name)
    #[serde(default)]
    pub name: String,

    /// Upstream release version
    pub version: String,

    /// Release tarball URL (`.tar.gz`)
    pub url: String,

    /// Directory the tarball unpacks into
    pub source_dir: String,

    /// Library base name without the `lib` prefix (e.g. `hunspell-1.6`)
    pub library: String,

    /// Libtool ABI version of the installed shared object (e.g. `0.0.1`)
    pub abi_version: String,

    /// Header directory relative to the unpacked source tree
    #[serde(default)]
    pub include_subdir: Option<String>,

    /// Expected SHA-256 of the tarball, if pinned
    #[serde(default)]
    pub sha256: Option<String>,

    /// Platforms where an automated source build is supported
    #[serde(default = "default_build_platforms")]
    pub build_platforms: Vec<OsKind>,
}

fn default_build_platforms() -> Vec<OsKind> {
    vec![OsKind::Linux, OsKind::MacOs]
}

/// Artifact names produced by a source build on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// File installed by `make install` under `<prefix>/lib`
    pub versioned: String,
    /// Links created next to the copied artifact, unversioned last
    pub links: Vec<String>,
}

impl PackageRecipe {
    /// Built-in recipe for hunspell.
    pub fn hunspell() -> Self {
        PackageRecipe {
            name: "hunspell".to_string(),
            version: "1.6.2".to_string(),
            url: "https://github.com/hunspell/hunspell/archive/v1.6.2.tar.gz".to_string(),
            source_dir: "hunspell-1.6.2".to_string(),
            library: "hunspell-1.6".to_string(),
            abi_version: "0.0.1".to_string(),
            include_subdir: Some("src".to_string()),
            sha256: None,
            build_platforms: default_build_platforms(),
        }
    }

    pub fn supports_build_on(&self, os: OsKind) -> bool {
        self.build_platforms.contains(&os)
    }

    fn abi_major(&self) -> &str {
        self.abi_version.split('.').next().unwrap_or("0")
    }

    /// Names of the installed artifact and its unversioned links, or `None`
    /// where the autotools build produces no shared object we know how to name.
    pub fn artifact_names(&self, os: OsKind) -> Option<ArtifactNames> {
        let lib = &self.library;
        match os {
            OsKind::Linux | OsKind::Other => Some(ArtifactNames {
                versioned: format!("lib{}.so.{}", lib, self.abi_version),
                links: vec![
                    format!("lib{}.so.{}", lib, self.abi_major()),
                    format!("lib{}.so", lib),
                ],
            }),
            OsKind::MacOs => Some(ArtifactNames {
                versioned: format!("lib{}.{}.dylib", lib, self.abi_major()),
                links: vec![format!("lib{}.dylib", lib)],
            }),
            OsKind::Windows => None,
        }
    }
}

/// The set of recipes known to the resolver.
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    recipes: BTreeMap<String, PackageRecipe>,
}

impl PackageCatalog {
    /// Catalog with only the built-in recipes.
    pub fn builtin() -> Self {
        let mut catalog = PackageCatalog {
            recipes: BTreeMap::new(),
        };
        catalog.insert(PackageRecipe::hunspell());
        catalog
    }

    /// Catalog with no recipes at all.
    pub fn empty() -> Self {
        PackageCatalog {
            recipes: BTreeMap::new(),
        }
    }

    /// Add or replace a recipe.
    pub fn insert(&mut self, recipe: PackageRecipe) {
        self.recipes.insert(recipe.name.clone(), recipe);
    }

    /// Add recipes from configuration; the table key names the package.
    pub fn extend_from_config(&mut self, recipes: &BTreeMap<String, PackageRecipe>) {
        for (name, recipe) in recipes {
            let mut recipe = recipe.clone();
            recipe.name = name.clone();
            self.insert(recipe);
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecipe> {
        self.recipes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }
}

impl Default for PackageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
