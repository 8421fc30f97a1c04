use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_tsref")));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- highlight --

#[test]
fn highlight_links_known_types() {
    cmd()
        .args(["highlight", fixture_path("wallet.ts").as_str()])
        .args(["--page", "api/wallet", "--symbols", fixture_path("symbols.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<span class=\"kt\"><a style=\"color:inherit;text-decoration:underline\" href=\"common.html#tsref-type-Amount\">Amount</a></span>",
        ))
        .stdout(predicate::str::contains(
            "<span style=\"font-weight: bolder\">negative</span>",
        ))
        .stdout(predicate::str::contains("<span class=\"kt\">null</span>"))
        .stderr(predicate::str::contains("warning").not());
}

#[test]
fn highlight_keeps_one_unit_per_line() {
    let assert = cmd()
        .args(["highlight", fixture_path("wallet.ts").as_str()])
        .args(["--symbols", fixture_path("symbols.json").as_str()])
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output.lines().count(), 5);
}

#[test]
fn highlight_stdin_warns_on_unknown_type() {
    cmd()
        .args(["highlight", "--page", "api/wallet", "--line", "30"])
        .write_stdin("let x: Foo;")
        .assert()
        .success()
        .stdout(predicate::str::contains("<span class=\"kt\">Foo</span>"))
        .stderr(predicate::str::contains(
            "code block contains unresolved xref 'Foo'",
        ))
        .stderr(predicate::str::contains("line=30"))
        .stderr(predicate::str::contains("1 warning(s)"));
}

#[test]
fn highlight_resolves_labels() {
    cmd()
        .args(["highlight", "--labels", fixture_path("labels.json").as_str()])
        .args(["--page", "api/wallet", "--link-suffix", ""])
        .write_stdin("// see `setup <wallet-setup>`\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "href=\"../guide/setup#wallet-setup\">setup</a>",
        ));
}

#[test]
fn highlight_token_dump() {
    let assert = cmd()
        .args(["highlight", "--format", "tokens"])
        .write_stdin("x: Coin")
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let tokens: serde_json::Value = serde_json::from_str(&output).unwrap();
    let last = tokens.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["class"], "TypeKeyword");
    assert_eq!(last["annotation"]["xref"], "Coin");
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["highlight", "--format", "pdf"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn missing_input_file_fails() {
    cmd()
        .args(["highlight", "/nonexistent/sample.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// -- build --

#[test]
fn build_writes_linked_pages() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("site");

    cmd()
        .args(["build", fixture_path("manifest.json").as_str(), "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 page(s), 2 sample(s), 1 definition(s)"));

    let wallet = std::fs::read_to_string(out.join("api/wallet.html")).unwrap();
    assert!(wallet.contains("<title>Wallet API</title>"));
    assert!(wallet.contains("href=\"common.html#tsref-type-Amount\""));
    assert!(wallet.contains("<span class=\"linenos\">2</span><span class=\"hll\">"));

    let common = std::fs::read_to_string(out.join("api/common.html")).unwrap();
    assert!(common.contains("<pre id=\"tsref-type-Amount\">"));
    assert!(common.contains("<span class=\"caption-text\">Amount type</span>"));
}

#[test]
fn build_dumps_symbols() {
    let dir = TempDir::new().unwrap();
    let dump = dir.path().join("symbols.json");

    cmd()
        .args(["build", fixture_path("manifest.json").as_str(), "-o"])
        .arg(dir.path().join("site"))
        .arg("--dump-symbols")
        .arg(&dump)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dump).unwrap()).unwrap();
    assert_eq!(json["types"]["Amount"]["page"], "api/common");
    assert_eq!(json["types"]["Amount"]["anchor"], "tsref-type-Amount");
}

#[test]
fn build_reports_warnings_without_failing() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    std::fs::write(
        &manifest,
        r#"{"pages": [{"page": "index", "samples": [{"line": 2, "source": "a\nb", "emphasize_lines": [7]}]}]}"#,
    )
    .unwrap();

    cmd()
        .args(["build"])
        .arg(&manifest)
        .arg("-o")
        .arg(dir.path().join("site"))
        .assert()
        .success()
        .stderr(predicate::str::contains("line number spec is out of range(1-2): 7"))
        .stderr(predicate::str::contains("1 warning(s)"));
}

#[test]
fn build_rejects_invalid_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    std::fs::write(&manifest, "{\"pages\": 3}").unwrap();

    cmd()
        .args(["build"])
        .arg(&manifest)
        .arg("-o")
        .arg(dir.path().join("site"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid manifest"));
}

// -- resolve --

#[test]
fn resolve_known_type() {
    cmd()
        .args(["resolve", "Amount", "--from", "api/wallet"])
        .args(["--symbols", fixture_path("symbols.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<a class=\"reference internal\" href=\"common.html#tsref-type-Amount\" title=\"TYPE Amount\">Amount</a>",
        ));
}

#[test]
fn resolve_any_lists_roles() {
    cmd()
        .args(["resolve", "Amount", "--any"])
        .args(["--symbols", fixture_path("symbols.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ts:type\t"));
}

#[test]
fn resolve_dangling_type_fails() {
    cmd()
        .args(["resolve", "Nope", "--from", "index"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined TypeScript type: Nope"));
}
