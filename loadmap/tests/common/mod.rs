//! Shared integration-test harness for running the `loadmap` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

/// Helpers for invoking the compiled `loadmap` binary.
pub struct LoadmapProcess;

impl LoadmapProcess {
    /// Runs `loadmap` with `args` and waits for it to exit.
    ///
    /// `LOADMAP_*` variables from the outer environment are cleared so
    /// tests do not pick up a developer's settings.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::spawn_with_env(args, &[])
    }

    /// Like [`spawn_command`](Self::spawn_command) with extra environment
    /// variables.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
        let bin = env!("CARGO_BIN_EXE_loadmap");
        let mut command = Command::new(bin);
        command.args(args);
        for var in [
            "LOADMAP_CONFIG",
            "LOADMAP_COLOR",
            "LOADMAP_LOG_LEVEL",
            "LOADMAP_LOG_FORMAT",
        ] {
            command.env_remove(var);
        }
        command.envs(env.iter().copied());
        command.output().expect("failed to run loadmap")
    }

    /// Parses stdout as JSON.
    #[allow(clippy::missing_panics_doc)]
    pub fn stdout_json(output: &Output) -> Value {
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("stdout is not valid JSON: {e}\n{stdout}"))
    }

    /// Returns the path to a test fixture file.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Returns a fixture path as a `String` for use in argument lists.
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name).display().to_string()
    }
}
