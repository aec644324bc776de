//! Config loading, validation, and course-data lookups.

use super::model::Config;
use crate::error::{IntakeError, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path};

impl Config {
    /// Load config from a YAML file.
    ///
    /// Relative directories in the file are resolved against the directory
    /// the file lives in, so a config can be moved together with its tree.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(IntakeError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            IntakeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_yaml(&content)?;
        let base = path.parent().unwrap_or(Path::new("."));
        config.resolve_relative_to(base);
        Ok(config)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| IntakeError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Make every relative directory absolute with respect to `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for dir in [
            &mut self.temp_dir,
            &mut self.repo_root,
            &mut self.template_dir,
            &mut self.state_dir,
            &mut self.upload.code_review_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_stale_minutes` must be positive
    /// - `unpack_command` must name a program
    /// - important files must be non-empty relative paths that stay inside the repository
    pub fn validate(&self) -> Result<()> {
        if self.lock_stale_minutes == 0 {
            return Err(IntakeError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        match shell_words::split(&self.unpack_command) {
            Ok(words) if !words.is_empty() => {}
            Ok(_) => {
                return Err(IntakeError::UserError(
                    "config validation failed: unpack_command must not be empty".to_string(),
                ));
            }
            Err(e) => {
                return Err(IntakeError::UserError(format!(
                    "config validation failed: unpack_command '{}' cannot be parsed: {}",
                    self.unpack_command, e
                )));
            }
        }

        for (assignment, files) in &self.important_files {
            for file in files {
                validate_important_file(assignment, file)?;
            }
        }

        Ok(())
    }

    /// Normalize an assignment name for lookups.
    ///
    /// An explicit alias wins; otherwise the name is trimmed and lowercased.
    pub fn clean_assignment(&self, assignment: &str) -> String {
        match self.assignment_aliases.get(assignment) {
            Some(clean) => clean.clone(),
            None => assignment.trim().to_lowercase(),
        }
    }

    /// Files the course tracks for an assignment (without the student-local files).
    pub fn important_files_for(&self, assignment: &str) -> Vec<String> {
        self.important_files
            .get(&self.clean_assignment(assignment))
            .cloned()
            .unwrap_or_default()
    }

    /// Union of the reviewers registered for each of `sections`.
    pub fn reviewers_for_sections(&self, sections: &[String]) -> BTreeSet<String> {
        sections
            .iter()
            .filter_map(|section| self.section_reviewers.get(section))
            .flatten()
            .cloned()
            .collect()
    }
}

fn validate_important_file(assignment: &str, file: &str) -> Result<()> {
    let path = Path::new(file);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if file.trim().is_empty() || path.is_absolute() || escapes {
        return Err(IntakeError::UserError(format!(
            "config validation failed: important file '{}' for '{}' must be a relative path inside the repository",
            file, assignment
        )));
    }
    Ok(())
}
