use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUCCESS_EXIT_CODE: i32 = 0;

/// Bind checker configuration, loaded from a TOML case file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Per-case limit covering spawn, output collection and exit
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Exit code a child must report for its case to pass
    #[serde(default = "default_success_exit_code")]
    pub success_exit_code: i32,
    #[serde(default, rename = "case")]
    pub cases: Vec<TestCase>,
}

/// One child process to launch and the assembly it must bind exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// Program to launch; the running rt-testkit binary when absent
    #[serde(default)]
    pub program: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
    pub expected_assembly: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_success_exit_code() -> i32 {
    DEFAULT_SUCCESS_EXIT_CODE
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            success_exit_code: DEFAULT_SUCCESS_EXIT_CODE,
            cases: Vec::new(),
        }
    }
}

impl RunnerConfig {
    /// Load and validate a case file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid case file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RunnerConfig =
            toml::from_str(content).context("Failed to parse case file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.cases.is_empty() {
            bail!("at least one [[case]] is required");
        }

        let mut names = HashSet::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                bail!("case names must not be empty");
            }
            if case.expected_assembly.trim().is_empty() {
                bail!("case '{}' has an empty expected_assembly", case.name);
            }
            if !names.insert(case.name.as_str()) {
                bail!("duplicate case name '{}'", case.name);
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cases whose name contains `filter`, in file order
    pub fn selected<'a>(&'a self, filter: Option<&'a str>) -> impl Iterator<Item = &'a TestCase> + 'a {
        self.cases
            .iter()
            .filter(move |case| match filter {
                Some(f) => case.name.contains(f),
                None => true,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
timeout_secs = 5

[[case]]
name = "plugin_binds_once"
args = ["emit-bind", "--assembly", "Plugin"]
expected_assembly = "Plugin"

[[case]]
name = "core_binds_once"
program = "/usr/bin/env"
expected_assembly = "Core"
"#;

    #[test]
    fn test_parse_applies_defaults() {
        let config = RunnerConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.success_exit_code, DEFAULT_SUCCESS_EXIT_CODE);
        assert_eq!(config.cases.len(), 2);
        assert_eq!(config.cases[0].program, None);
        assert_eq!(config.cases[1].program, Some(PathBuf::from("/usr/bin/env")));
        assert!(config.cases[1].args.is_empty());
    }

    #[test]
    fn test_rejects_empty_case_list() {
        let error = RunnerConfig::from_toml_str("timeout_secs = 1").unwrap_err();
        assert!(format!("{:#}", error).contains("at least one"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let content = r#"
[[case]]
name = "same"
expected_assembly = "A"

[[case]]
name = "same"
expected_assembly = "B"
"#;
        let error = RunnerConfig::from_toml_str(content).unwrap_err();
        assert!(format!("{:#}", error).contains("duplicate case name 'same'"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let content = r#"
timeout_secs = 0

[[case]]
name = "a"
expected_assembly = "A"
"#;
        assert!(RunnerConfig::from_toml_str(content).is_err());
    }

    #[test]
    fn test_selected_filters_by_substring() {
        let config = RunnerConfig::from_toml_str(SAMPLE).unwrap();
        let names: Vec<_> = config.selected(Some("plugin")).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["plugin_binds_once"]);
        assert_eq!(config.selected(None).count(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = RunnerConfig::load(file.path()).unwrap();
        assert_eq!(config.cases[0].expected_assembly, "Plugin");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let error = RunnerConfig::load(Path::new("/nonexistent/cases.toml")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/cases.toml"));
    }
}
