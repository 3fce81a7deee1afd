#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

pub mod fixtures;

pub fn issuedesk_binary() -> &'static str {
    env!("CARGO_BIN_EXE_issuedesk")
}

/// Runs issuedesk commands against an isolated home directory.
pub struct DeskTest {
    pub home: TempDir,
    api_url: Option<String>,
}

impl DeskTest {
    pub fn new() -> Self {
        DeskTest {
            home: TempDir::new().expect("Failed to create temp directory"),
            api_url: None,
        }
    }

    /// Point every command at `api_url`, usually a wiremock server.
    pub fn with_api(api_url: &str) -> Self {
        DeskTest {
            api_url: Some(api_url.to_string()),
            ..Self::new()
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(issuedesk_binary());
        command
            .args(args)
            .current_dir(self.home.path())
            .env("ISSUEDESK_HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env_remove("ISSUEDESK_LOG");
        match &self.api_url {
            Some(url) => command.env("ISSUEDESK_API_URL", url),
            None => command.env_remove("ISSUEDESK_API_URL"),
        };
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute issuedesk command")
    }

    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn issuedesk command");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child
            .wait_with_output()
            .expect("Failed to wait for issuedesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout).expect("Command did not print valid JSON")
    }

    pub fn session_path(&self) -> PathBuf {
        self.home.path().join("session.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.path().join("config.yaml")
    }

    /// Store a signed-in session for `user` with `token`.
    pub fn sign_in(&self, token: &str, user: Value) {
        let session = json!({ "token": token, "user": user });
        fs::write(
            self.session_path(),
            serde_json::to_string_pretty(&session).unwrap(),
        )
        .expect("Failed to write session file");
    }

    pub fn read_session(&self) -> Option<Value> {
        let content = fs::read_to_string(self.session_path()).ok()?;
        Some(serde_json::from_str(&content).expect("Session file is not valid JSON"))
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.config_path()).ok()
    }
}
