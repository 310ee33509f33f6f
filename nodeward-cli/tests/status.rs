use predicates::prelude::*;

mod common;

#[test]
fn test_status_unprovisioned() {
    let ctx = common::nodeward();
    ctx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not set"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_status_after_init() {
    let ctx = common::nodeward();
    ctx.cmd()
        .args(["init", "--password", "correct horse battery"])
        .assert()
        .success();

    ctx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("0x"));
}

#[test]
fn test_status_shows_configured_endpoints() {
    let ctx = common::nodeward();
    ctx.write_settings("chains:\n  eth1:\n    provider: http://localhost:8545\n");

    ctx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8545"));
}
