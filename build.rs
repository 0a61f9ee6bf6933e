//! Build script for the actuator controller firmware
//!
//! Handles:
//! - Linker scripts for the embedded binary (cortex-m-rt, defmt)

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (tests) link normally
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    if let Ok(dir) = env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
