#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;

/// One isolated invocation environment per test.
///
/// Every path the binary would resolve under the real home directory is
/// redirected into a temp dir through the global flags, so tests never touch
/// the invoking user's node state.
pub struct TestContext {
    pub home: TempDir,
}

impl TestContext {
    pub fn cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_nodeward");
        let mut cmd = Command::new(bin_path);
        cmd.timeout(Duration::from_secs(30));
        let home = self.home.path();
        cmd.arg("--config").arg(home.join("config.yml"));
        cmd.arg("--settings").arg(home.join("settings.yml"));
        cmd.arg("--password-path").arg(home.join("password"));
        cmd.arg("--keystore-path").arg(home.join("node-keys"));
        cmd.arg("--validator-keystore-path")
            .arg(home.join("validator-keys"));
        cmd.arg("--datastore-path").arg(home.join("data.db"));
        cmd
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    pub fn write_config(&self, yaml: &str) {
        std::fs::write(self.path().join("config.yml"), yaml).unwrap();
    }

    pub fn write_settings(&self, yaml: &str) {
        std::fs::write(self.path().join("settings.yml"), yaml).unwrap();
    }
}

pub fn nodeward() -> TestContext {
    TestContext {
        home: TempDir::new().unwrap(),
    }
}
