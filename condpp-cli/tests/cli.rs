use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (name, content) in files {
        write(dir.path(), name, content);
    }
    dir
}

#[test]
fn blanks_inactive_branch() {
    let dir = workspace(&[("main.glsl", "#if EDITOR\ngrid();\n#endif\ndraw();\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl");

    cmd.assert()
        .success()
        .stdout("          \n       \n      \ndraw();\n")
        .stderr("");
}

#[test]
fn defines_from_command_line() {
    let dir = workspace(&[(
        "main.glsl",
        "#if EDITOR && DEBUG\ngrid();\n#endif\ndraw();\n",
    )]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("-D")
        .arg("EDITOR,DEBUG");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("grid();").and(predicate::str::contains("draw();")));
}

#[test]
fn reads_stdin() {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("-")
        .arg("-D")
        .arg("A")
        .write_stdin("#if A\nyes\n#else\nno\n#endif\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("yes").and(predicate::str::contains("no").not()));
}

#[test]
fn error_directive_fails_the_run() {
    let dir = workspace(&[("main.glsl", "#error unsupported target\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl");

    cmd.assert().code(1).stderr(predicate::str::contains(
        "error [error-directive]: unsupported target (main.glsl:1)",
    ));
}

#[test]
fn warnings_pass_unless_denied() {
    let dir = workspace(&[("main.glsl", "text\n#endif\n")]);

    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("warning [unexpected-endif]"));

    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("--deny-warnings");
    cmd.assert().code(1);
}

#[test]
fn resolves_includes_next_to_the_input() {
    let dir = workspace(&[
        ("main.glsl", "#include \"common.glsl\"\nmain();\n"),
        ("common.glsl", "helper();\n"),
    ]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl").arg("--deps");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("main();"))
        .stderr(predicate::str::contains("include: ").and(predicate::str::contains("common.glsl")));
}

#[test]
fn resolves_includes_from_search_paths() {
    let dir = workspace(&[("main.glsl", "#include \"lib.glsl\"\n")]);
    fs::create_dir(dir.path().join("shared")).expect("create dir");
    write(&dir.path().join("shared"), "lib.glsl", "lib();\n");

    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("-I")
        .arg("shared");
    cmd.assert().success().stderr("");

    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("[include-failed]"));
}

#[test]
fn config_file_supplies_defines_and_commands() {
    let dir = workspace(&[
        ("main.glsl", "#pragma optimize\n#if EDITOR\ngrid();\n#endif\n"),
        (
            "custom.toml",
            "[preprocess]\ndefines = [\"EDITOR\"]\nknown_commands = [\"pragma\"]\n",
        ),
    ]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("-c")
        .arg("custom.toml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("grid();"))
        .stderr("");
}

#[test]
fn local_config_is_picked_up() {
    let dir = workspace(&[
        ("main.glsl", "#if EDITOR\ngrid();\n#endif\n"),
        ("condpp.toml", "[preprocess]\ndefines = [\"EDITOR\"]\n"),
    ]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("grid();"));
}

#[test]
fn unknown_command_is_reported() {
    let dir = workspace(&[("main.glsl", "#pragma optimize\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("main.glsl");

    cmd.assert().success().stderr(predicate::str::contains(
        "Unrecognized preprocessor command \"pragma\" on line 1",
    ));
}

#[test]
fn json_diagnostics() {
    let dir = workspace(&[("main.glsl", "#else\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("--format")
        .arg("json");

    let output = cmd.output().expect("run condpp");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr is json");
    assert_eq!(value[0]["code"], "unexpected-else");
    assert_eq!(value[0]["source"], "main.glsl");
}

#[test]
fn yaml_diagnostics() {
    let dir = workspace(&[("main.glsl", "#if A\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("--format")
        .arg("yaml");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("code: unclosed-scope"));
}

#[test]
fn writes_output_file() {
    let dir = workspace(&[("main.glsl", "#define A\nbody\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("-o")
        .arg("out.glsl");

    cmd.assert().success().stdout("");
    let written = fs::read_to_string(dir.path().join("out.glsl")).expect("output written");
    assert_eq!(written, "         \nbody\n");
}

#[test]
fn invalid_define_name_is_a_driver_failure() {
    let dir = workspace(&[("main.glsl", "text\n")]);
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path())
        .arg("main.glsl")
        .arg("-D")
        .arg("NOT-A-NAME");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("invalid define name \"NOT-A-NAME\""));
}

#[test]
fn missing_input_is_a_driver_failure() {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = cargo_bin_cmd!("condpp");
    cmd.current_dir(dir.path()).arg("missing.glsl");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read missing.glsl"));
}
