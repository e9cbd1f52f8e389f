use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn lexa() -> Command {
    let mut cmd = Command::cargo_bin("lexa").unwrap();
    cmd.env_remove("LEXA_FORMAT").env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn valid_sample_succeeds() {
    let root = workspace_root();
    lexa()
        .arg(root.join("samples/valid.lx"))
        .assert()
        .success()
        .stdout(predicate::str::contains("syntax: valid"))
        .stdout(predicate::str::contains("semantic: valid"));
}

#[test]
fn undeclared_variable_is_reported_with_hint() {
    let root = workspace_root();
    lexa()
        .arg(root.join("samples/undeclared.lx"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("undeclared variable 'y'"))
        .stderr(predicate::str::contains("Example: int y = 0;"))
        .stdout(predicate::str::contains("syntax: valid"));
}

#[test]
fn unclosed_block_fails_syntax() {
    let root = workspace_root();
    lexa()
        .arg(root.join("samples/unclosed.lx"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unclosed delimiter '{'"))
        .stdout(predicate::str::contains("syntax: 1 error(s)"));
}

#[test]
fn json_from_stdin() {
    let value = json_output(
        lexa()
            .args(["--format", "json", "-"])
            .write_stdin("int main() { int x; x = \"a\"; return 0; }"),
    );
    assert_eq!(value["syntaxValid"], Value::Bool(true));
    assert_eq!(value["semanticValid"], Value::Bool(false));
    assert_eq!(value["semanticErrors"].as_array().unwrap().len(), 1);
    assert_eq!(value["tokens"][0]["type"], "TYPE_INT");
}

#[test]
fn piped_stdin_without_file_argument() {
    let value = json_output(
        lexa()
            .args(["--format", "json"])
            .write_stdin("int main() { return 0; }"),
    );
    assert_eq!(value["tokens"].as_array().unwrap().len(), 9);
    assert_eq!(value["tokenStats"]["RESERVED_WORD"], 2);
}

#[test]
fn format_from_environment() {
    let value = json_output(
        lexa()
            .env("LEXA_FORMAT", "pretty-json")
            .arg("-")
            .write_stdin("int main() { int a = 1; }"),
    );
    assert_eq!(value["semanticValid"], Value::Bool(false));

    // an explicit flag still wins
    lexa()
        .env("LEXA_FORMAT", "json")
        .args(["--format", "text", "-"])
        .write_stdin("int main() { return 0; }")
        .assert()
        .success()
        .stdout(predicate::str::contains("syntax: valid"));
}

#[test]
fn token_listing() {
    lexa()
        .args(["--tokens", "-"])
        .write_stdin("int main() { return 0; }")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokens:"))
        .stdout(predicate::str::contains("TYPE_INT"))
        .stdout(predicate::str::contains("Token stats:"));
}

#[test]
fn max_depth_flag() {
    lexa()
        .args(["--max-depth", "2", "-"])
        .write_stdin("int main() { { { } } return 0; }")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nesting deeper than 2 levels"));
}

#[test]
fn missing_file_is_io_failure() {
    let tmp_dir = tempfile::tempdir().unwrap();
    lexa()
        .arg(tmp_dir.path().join("nope.lx"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn file_with_unknown_characters() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("bad.lx");
    std::fs::write(&path, "int main() {\n    int x = 1 @ 2;\n    return x;\n}\n").unwrap();

    lexa()
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unrecognized token '@'"))
        .stderr(predicate::str::contains(":2:15"));
}

#[test]
fn invalid_utf8_points_at_the_bad_byte() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("latin1.lx");
    std::fs::write(&path, b"int main() {\n  \xff\n}\n").unwrap();

    lexa()
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not valid UTF-8 at 2:3"));
}

#[test]
fn operand_mismatch_from_stdin() {
    lexa()
        .arg("-")
        .write_stdin("int main() { int x = \"a\" - 1; return 0; }")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("operator '-' cannot be applied to 'string' and 'int'"))
        .stdout(predicate::str::contains("syntax: valid"));
}
