//! Python language adapter

use super::LanguageAdapter;
use crate::constants::{container_images, file_extensions};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "python".to_string(),
        image: container_images::PYTHON.to_string(),
        source_path: format!("/tmp/code.{}", file_extensions::PYTHON),
        workdir: "/tmp".to_string(),
        setup_workdir: "/tmp".to_string(),
        setup_commands: vec![],
        install_command_template: "pip install {lib}".to_string(),
        run_commands: vec!["python code.py".to_string()],
        supports_library_install: true,
    }
}
