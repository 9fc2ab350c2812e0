use std::{fs, path::Path, process::Command};

use tempfile::TempDir;

const MANIFEST: &str = r#"
[types."com.example.Person"]
kind = "record"
params = [
    { name = "name", type = "java.lang.String" },
    { name = "tags", type = "java.util.List<java.lang.String>" },
    { name = "age", type = "java.util.Optional<java.lang.Integer>" },
]

[types."com.example.Shape"]
kind = "interface"
params = [{ name = "width", type = "double" }]
"#;

fn chained(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_chained"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn project(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("chained.toml"), manifest).unwrap();
    dir
}

#[test]
fn test_generate_writes_builders() {
    let dir = project(MANIFEST);
    let output = chained(dir.path(), &["generate", "-o", "src"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let builder = dir.path().join("src/com/example/builder/PersonBuilder.java");
    let content = fs::read_to_string(&builder).unwrap();
    assert!(content.contains("public final class PersonBuilder {"));
    assert!(dir.path().join("src/com/example/builder/ShapeImpl.java").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated: 3 files for 2 types in src"));

    // regenerating leaves every file untouched
    let again = chained(dir.path(), &["generate", "-o", "src"]);
    assert!(String::from_utf8_lossy(&again.stdout).contains("3 files unchanged"));
    assert_eq!(fs::read_to_string(&builder).unwrap(), content);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = project(MANIFEST);
    let output = chained(dir.path(), &["generate", "--dry-run", "-o", "src"]);
    assert!(output.status.success());
    assert!(!dir.path().join("src").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("public final class ShapeBuilder {"));
    assert!(stdout.contains("3 files would be generated"));
}

#[test]
fn test_check_reports_types() {
    let dir = project(MANIFEST);
    let output = chained(dir.path(), &["check"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chained.toml is valid"));
    assert!(stdout.contains("com.example.Shape (interface, implementation-delegate)"));
}

#[test]
fn test_check_fails_on_ambiguous_constructors() {
    let dir = project(
        r#"
        [[types."com.example.Account".constructors]]
        params = [{ name = "id", type = "long" }]

        [[types."com.example.Account".constructors]]
        params = [{ name = "owner", type = "java.lang.String" }]
        "#,
    );
    let output = chained(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ambiguous constructor"));
}

#[test]
fn test_invalid_manifest_exits_with_diagnostic() {
    let dir = project(
        r#"
        [types."com.example.Person"]
        kind = "record"
        params = [{ name = "class", type = "int" }]
        "#,
    );
    let output = chained(dir.path(), &["generate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("class"));
}

#[test]
fn test_explain_json() {
    let dir = project(MANIFEST);
    let output = chained(dir.path(), &["explain", "--type", "com.example.Person", "--json"]);
    assert!(output.status.success());

    let plans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let person = &plans[0];
    assert_eq!(person["shape"], "staged");
    assert_eq!(person["mandatory"], serde_json::json!(["name", "tags"]));
    assert_eq!(person["sub_builders"], serde_json::json!(["tags"]));
    assert_eq!(
        person["stages"],
        serde_json::json!(["BuilderWithName", "BuilderWithTags"])
    );
}

#[test]
fn test_explain_unknown_type_fails() {
    let dir = project(MANIFEST);
    let output = chained(dir.path(), &["explain", "--type", "com.example.Missing"]);
    assert!(!output.status.success());
}

const SHARED_BUILDER: &str = r#"
[defaults]
builder = "me.builder.ThingBuilder"

[types."me.Thing"]
kind = "record"
params = [{ name = "a", type = "int" }]

[types."me.Other"]
kind = "record"
params = [{ name = "b", type = "int" }]
"#;

#[test]
fn test_check_fails_on_shared_builder_name() {
    let dir = project(SHARED_BUILDER);
    let output = chained(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("me.Other"), "{stderr}");
    assert!(stderr.contains("would be generated for both"), "{stderr}");
}

#[test]
fn test_generate_refuses_shared_builder_name() {
    let dir = project(SHARED_BUILDER);
    let output = chained(dir.path(), &["generate", "-o", "src"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("me.builder.ThingBuilder"));
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_generate_follows_manifest_order() {
    let dir = project(
        r#"
        [types."me.Thing"]
        kind = "record"
        params = [{ name = "a", type = "int" }]

        [types."me.Other"]
        kind = "record"
        params = [{ name = "b", type = "int" }]
        "#,
    );
    let output = chained(dir.path(), &["generate", "--dry-run"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let thing = stdout.find("class ThingBuilder").unwrap();
    let other = stdout.find("class OtherBuilder").unwrap();
    assert!(thing < other);
}
