//! Per-language adapters: image, extension, install/run commands, workdir.

pub mod cpp;
pub mod go;
pub mod java;
pub mod javascript;
pub mod python;
pub mod ruby;
pub mod rust;

use crate::{constants, error::AppError, error::AppResult};

/// Maps a language tag to everything a sandbox session needs to stage,
/// compile (where applicable) and run a submission in that language.
#[derive(Debug, Clone)]
pub struct LanguageAdapter {
    pub language: String,
    pub image: String,
    /// Absolute in-container path the source file is staged to.
    pub source_path: String,
    /// Working directory the run command chain executes from.
    pub workdir: String,
    /// Working directory setup commands run from (differs for rust, which
    /// must `cargo new` from the parent directory before the workdir exists).
    pub setup_workdir: String,
    /// Commands run once before library installation (init a module/workspace).
    pub setup_commands: Vec<String>,
    /// Template producing the install command for one library name.
    install_command_template: String,
    /// Ordered commands producing (compile +) run. All but the last are
    /// joined with `&&` ahead of the final command, which is the only one
    /// wrapped by the active profiler/`time -v`; a failed compile step still
    /// short-circuits the `&&` chain before the measured command ever runs.
    pub run_commands: Vec<String>,
    /// Whether installing libraries is permitted for this language. The
    /// hook exists for future languages; none of the seven supported today
    /// forbid it.
    pub supports_library_install: bool,
}

impl LanguageAdapter {
    pub fn for_language(language: &str) -> AppResult<Self> {
        match language {
            constants::languages::PYTHON => Ok(python::adapter()),
            constants::languages::JAVA => Ok(java::adapter()),
            constants::languages::JAVASCRIPT => Ok(javascript::adapter()),
            constants::languages::CPP => Ok(cpp::adapter()),
            constants::languages::GO => Ok(go::adapter()),
            constants::languages::RUBY => Ok(ruby::adapter()),
            constants::languages::RUST => Ok(rust::adapter()),
            other => Err(AppError::Validation(format!(
                "unsupported language '{other}', expected one of {:?}",
                constants::languages::ALL
            ))),
        }
    }

    pub fn install_command(&self, library: &str) -> String {
        self.install_command_template.replace("{lib}", library)
    }

    /// Split the run command sequence into the unmeasured setup/compile
    /// prefix and the single final command that the active profiler wraps.
    /// Panics if a language adapter is built with no run commands, which
    /// would be a programming error, not a runtime condition.
    pub fn split_final_command(&self) -> (&[String], &str) {
        let (last, prefix) = self
            .run_commands
            .split_last()
            .expect("language adapter must have at least one run command");
        (prefix, last.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_every_supported_language() {
        for &lang in constants::languages::ALL {
            assert!(LanguageAdapter::for_language(lang).is_ok(), "{lang} should resolve");
        }
    }

    #[test]
    fn rejects_unknown_language() {
        let err = LanguageAdapter::for_language("brainfuck").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn split_final_command_isolates_the_last_step_for_measurement() {
        let adapter = cpp::adapter();
        let (prefix, last) = adapter.split_final_command();
        assert_eq!(prefix, ["g++ -o a.out code.cpp".to_string()]);
        assert_eq!(last, "./a.out");
    }

    #[test]
    fn split_final_command_has_empty_prefix_for_single_step_languages() {
        let adapter = python::adapter();
        let (prefix, last) = adapter.split_final_command();
        assert!(prefix.is_empty());
        assert_eq!(last, "python code.py");
    }

    #[test]
    fn install_command_substitutes_library_name() {
        let adapter = python::adapter();
        assert_eq!(adapter.install_command("numpy"), "pip install numpy");
    }
}
