//! Java language adapter
//!
//! Relies on single-file source-code launching (`java Code.java`), so no
//! separate compile step is needed.

use super::LanguageAdapter;
use crate::constants::{container_images, file_extensions};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "java".to_string(),
        image: container_images::JAVA.to_string(),
        source_path: format!("/tmp/code.{}", file_extensions::JAVA),
        workdir: "/tmp".to_string(),
        setup_workdir: "/tmp".to_string(),
        setup_commands: vec![],
        install_command_template: "mvn install:install-file -Dfile={lib}".to_string(),
        run_commands: vec!["java code.java".to_string()],
        supports_library_install: true,
    }
}
