use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Runs the CLI against a calendar file inside a temporary directory
pub struct CliTestHarness {
    temp_dir: TempDir,
    calendar_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let calendar_path = temp_dir.path().join("calendar.json");
        Self {
            temp_dir,
            calendar_path,
        }
    }

    /// A harness whose calendar already exists, with the clock pinned at `now`
    pub fn initialized(now: &str) -> Self {
        let harness = Self::new();
        harness.run_success(&["init", "Test", "--now", now]);
        harness
    }

    /// A command running in the temp directory, so no stray `almanac.toml` is picked up
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("almanac").expect("Failed to find almanac binary");
        cmd.current_dir(self.temp_dir.path())
            .env("ALMANAC_CALENDAR_FILE", &self.calendar_path)
            .env_remove("ALMANAC_LOG");
        cmd
    }

    pub fn calendar_path(&self) -> &Path {
        &self.calendar_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a command that should succeed and returns its stdout
    pub fn stdout_of(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        String::from_utf8(output).expect("stdout was not UTF-8")
    }

    /// Runs a creating command and returns the id it printed
    pub fn create(&self, args: &[&str]) -> String {
        let stdout = self.stdout_of(args);
        first_id(&stdout).unwrap_or_else(|| panic!("no id in output:\n{stdout}"))
    }
}

/// The first uuid in `text`
pub fn first_id(text: &str) -> Option<String> {
    text.split(|c: char| !(c.is_ascii_hexdigit() || c == '-'))
        .find(|token| Uuid::parse_str(token).is_ok())
        .map(str::to_string)
}
