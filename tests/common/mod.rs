use std::{fs, path::Path};

use assert_cmd::Command;

/// CLI invocation rooted at `home` with "today" pinned to `today`.
pub fn cli(home: &Path, today: &str) -> Command {
    let mut cmd = Command::cargo_bin("plannercell_cli").expect("binary built");
    cmd.env("PLANNERCELL_HOME", home)
        .env("PLANNERCELL_TODAY", today)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a config with an `anual` plan valid until 2099.
pub fn write_paid_profile(home: &Path) {
    let dir = home.join("config");
    fs::create_dir_all(&dir).expect("config dir");
    fs::write(
        dir.join("config.json"),
        r#"{
  "ui_color_enabled": false,
  "profile": { "plan": "anual", "expiration": "2099-01-01T00:00:00Z" }
}"#,
    )
    .expect("write config");
}
