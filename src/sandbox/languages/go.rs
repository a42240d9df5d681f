//! Go language adapter
//!
//! Go needs its own module, so setup initializes one under `/go_space`
//! before the source file is staged into it.

use super::LanguageAdapter;
use crate::constants::{container_images, container_paths, file_extensions};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "go".to_string(),
        image: container_images::GO.to_string(),
        source_path: format!("{}/code.{}", container_paths::GO_WORKDIR, file_extensions::GO),
        workdir: container_paths::GO_WORKDIR.to_string(),
        setup_workdir: container_paths::GO_WORKDIR.to_string(),
        setup_commands: vec![
            "go mod init go_space".to_string(),
            "go mod tidy".to_string(),
        ],
        install_command_template: "go get -u {lib}".to_string(),
        run_commands: vec!["go run code.go".to_string()],
        supports_library_install: true,
    }
}
