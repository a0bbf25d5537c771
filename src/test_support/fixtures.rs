//! Fixtures shared by unit tests: fake source trees, fake build tools and
//! fake installed libraries.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use flate2::write::GzEncoder;
use flate2::Compression;

use super::{CommandPattern, MockExecutor, MockProcessOutput};
use crate::core::{OsKind, PackageRecipe};

/// Build an in-memory `.tar.gz` from `(path, contents)` pairs.
pub fn tarball(entries: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Script a successful autotools build whose `make install` drops
/// `<prefix>/lib/<versioned>`, with the prefix taken from the configure call.
pub fn fake_autotools(exec: &MockExecutor, versioned: &str) {
    let versioned = versioned.to_string();
    let prefix: Arc<Mutex<Option<PathBuf>>> = Arc::default();
    let seen = Arc::clone(&prefix);

    exec.expect("autoreconf -vfi", MockProcessOutput::success(""));
    exec.expect_with(
        CommandPattern::Contains("configure --prefix=".to_string()),
        MockProcessOutput::success(""),
        move |cmd| {
            let arg = cmd
                .get_args()
                .iter()
                .find_map(|a| a.strip_prefix("--prefix="))
                .map(PathBuf::from);
            *seen.lock().unwrap() = arg;
        },
    );
    exec.expect_prefix("make -j", MockProcessOutput::success(""));
    exec.expect_with(
        CommandPattern::Exact("make install".to_string()),
        MockProcessOutput::success(""),
        move |_| {
            let prefix = prefix.lock().unwrap().clone().expect("configure ran first");
            let lib_dir = prefix.join("lib");
            std::fs::create_dir_all(&lib_dir).unwrap();
            std::fs::write(lib_dir.join(&versioned), "ELF").unwrap();
        },
    );
}

/// Write an empty file standing in for an installed library.
pub fn fake_library(dir: &Path, file_name: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    std::fs::write(&path, "").unwrap();
    path
}

/// A small recipe pointing at a fake URL.
pub fn demo_recipe() -> PackageRecipe {
    PackageRecipe {
        name: "demo".to_string(),
        version: "1.0.0".to_string(),
        url: "https://example.com/releases/demo-1.0.0.tar.gz".to_string(),
        source_dir: "demo-1.0.0".to_string(),
        library: "demo-1.0".to_string(),
        abi_version: "0.0.1".to_string(),
        include_subdir: Some("src".to_string()),
        sha256: None,
        build_platforms: vec![OsKind::Linux, OsKind::MacOs],
    }
}

/// Release tarball for [`demo_recipe`].
pub fn demo_tarball() -> Vec<u8> {
    tarball(&[
        ("demo-1.0.0/configure.ac", "AC_INIT([demo], [1.0.0])"),
        ("demo-1.0.0/src/demo.h", "int demo(void);"),
    ])
}
