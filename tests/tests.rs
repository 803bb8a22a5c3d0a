#[test]
fn check_namegen_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("namegen").unwrap();
    cmd.arg("--help").assert();
}

#[test]
fn check_upqa_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("upqa").unwrap();
    cmd.arg("--help").assert();
}
