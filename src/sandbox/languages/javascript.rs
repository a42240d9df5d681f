//! JavaScript (Node.js) language adapter

use super::LanguageAdapter;
use crate::constants::{container_images, file_extensions};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "javascript".to_string(),
        image: container_images::JAVASCRIPT.to_string(),
        source_path: format!("/tmp/code.{}", file_extensions::JAVASCRIPT),
        workdir: "/tmp".to_string(),
        setup_workdir: "/tmp".to_string(),
        setup_commands: vec![],
        install_command_template: "yarn add {lib}".to_string(),
        run_commands: vec!["node code.js".to_string()],
        supports_library_install: true,
    }
}
