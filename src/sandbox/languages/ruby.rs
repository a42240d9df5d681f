//! Ruby language adapter

use super::LanguageAdapter;
use crate::constants::{container_images, file_extensions};

pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "ruby".to_string(),
        image: container_images::RUBY.to_string(),
        source_path: format!("/tmp/code.{}", file_extensions::RUBY),
        workdir: "/tmp".to_string(),
        setup_workdir: "/tmp".to_string(),
        setup_commands: vec![],
        install_command_template: "gem install {lib}".to_string(),
        run_commands: vec!["ruby code.rb".to_string()],
        supports_library_install: true,
    }
}
