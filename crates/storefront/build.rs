//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so the layout can link an immutable,
//! cache-busted copy.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    if let Err(e) = hash_css() {
        println!("cargo:warning=Could not fingerprint main.css: {e}");
        println!("cargo:rustc-env=CSS_HASH=");
    }
}

/// Hash main.css and copy it to `static/css/derived/main.<hash>.css`.
///
/// Sets `CSS_HASH` for `env!("CSS_HASH")`. An empty hash makes the layout
/// fall back to the unhashed file.
fn hash_css() -> io::Result<()> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(io::Error::other)?;
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = fs::read(&css_path)?;
    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = &digest[..8];

    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir)?;
    fs::copy(&css_path, derived_dir.join(format!("main.{short_hash}.css")))?;

    println!("cargo:rustc-env=CSS_HASH={short_hash}");
    Ok(())
}
