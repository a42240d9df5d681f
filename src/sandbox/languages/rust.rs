//! Rust language adapter
//!
//! `cargo new` must run from the parent directory before `/rust_space`
//! exists, so its setup workdir differs from its run workdir.

use super::LanguageAdapter;
use crate::constants::{container_images, container_paths};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "rust".to_string(),
        image: container_images::RUST.to_string(),
        source_path: format!("{}/src/code.rs", container_paths::RUST_WORKDIR),
        workdir: container_paths::RUST_WORKDIR.to_string(),
        setup_workdir: "/".to_string(),
        setup_commands: vec!["cargo new rust_space".to_string()],
        install_command_template: "cargo add {lib}".to_string(),
        run_commands: vec![
            "mv src/code.rs src/main.rs".to_string(),
            "cargo run".to_string(),
        ],
        supports_library_install: true,
    }
}
