//! C++ language adapter

use super::LanguageAdapter;
use crate::constants::{container_images, file_extensions};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "cpp".to_string(),
        image: container_images::CPP.to_string(),
        source_path: format!("/tmp/code.{}", file_extensions::CPP),
        workdir: "/tmp".to_string(),
        setup_workdir: "/tmp".to_string(),
        setup_commands: vec![],
        install_command_template: "apt-get install {lib}".to_string(),
        run_commands: vec!["g++ -o a.out code.cpp".to_string(), "./a.out".to_string()],
        supports_library_install: true,
    }
}
