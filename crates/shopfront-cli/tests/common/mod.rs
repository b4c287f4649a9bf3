use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Isolated home and store directories for one test.
pub struct Sandbox {
    pub home: PathBuf,
    pub store: PathBuf,
}

impl Sandbox {
    pub fn new(root: &Path) -> Self {
        let home = root.join("home");
        std::fs::create_dir_all(&home).unwrap();
        Self {
            home,
            store: root.join("store"),
        }
    }
}

/// Run the CLI binary with an isolated HOME and store.
pub fn run_cli_with_env(args: &[&str], sandbox: &Sandbox) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shopfront"));
    cmd.args(args);
    cmd.env("HOME", &sandbox.home);
    cmd.env("XDG_DATA_HOME", sandbox.home.join("data"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    if !args.contains(&"--store") {
        cmd.env("SHOPFRONT_STORE", &sandbox.store);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_with_env_success(args: &[&str], sandbox: &Sandbox) -> String {
    let output = run_cli_with_env(args, sandbox);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Parse each non-empty stdout line as JSON.
pub fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|line| line.trim_start().starts_with('{'))
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect()
}
