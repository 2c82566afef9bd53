use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd(cwd: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_bpdoc")));
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
    serde_json::from_str(&content).unwrap()
}

// -- generation --

#[test]
fn writes_every_document_kind() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");

    cmd(dir.path())
        .args(["-f", "json", "-o"])
        .arg(&out)
        .arg(fixture_path("character.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 6 documents (6 files)"));

    let index = read_json(&out.join("index.json"));
    assert_eq!(index["doctype"], "index");
    assert_eq!(index["display_name"], "Blueprint API");
    assert_eq!(index["classes"]["class"]["id"], "Character");
    assert_eq!(index["structs"]["struct"]["id"], "HitResult");
    assert_eq!(index["enums"]["enum"]["id"], "EMovementMode");

    let class = read_json(&out.join("Classes/Character/Character.json"));
    assert_eq!(class["blueprintable"], "true");
    assert_eq!(class["fields"]["field"]["display_name"], "Max Health");
    assert_eq!(class["nodes"]["node"]["shorttitle"], "Jump");
    assert_eq!(class["variables"]["variable"]["id"], "MaxHealth");

    let node = read_json(&out.join("Classes/Character/nodes/Jump.json"));
    assert_eq!(node["doctype"], "node");
    assert_eq!(node["class_id"], "Character");
    assert!(node.get("imgpath").is_none());

    let variable = read_json(&out.join("Classes/Character/variables/MaxHealth.json"));
    assert_eq!(variable["type"], "float");

    let values = read_json(&out.join("Enums/EMovementMode.json"));
    let values = values["values"]["value"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[1]["displayname"], "Flying");

    assert!(out.join("Structs/HitResult.json").is_file());
}

#[test]
fn rejected_node_is_reported_and_not_written() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");

    cmd(dir.path())
        .args(["-f", "xml", "-o"])
        .arg(&out)
        .arg(fixture_path("character.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning[not-documentable]: Not documentable Character_Cast with node class K2Node_DynamicCast",
        ))
        .stderr(predicate::str::contains("1 warning(s): 1 not-documentable"));

    assert!(out.join("Classes/Character/nodes/Jump.xml").is_file());
    assert!(!out.join("Classes/Character/nodes/Cast-To-Character.xml").exists());
}

#[test]
fn several_formats_share_one_layout() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");

    cmd(dir.path())
        .args(["-f", "xml,json", "-f", "html", "-o"])
        .arg(&out)
        .arg(fixture_path("character.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 6 documents (18 files)"));

    for ext in ["xml", "json", "html"] {
        assert!(out.join(format!("index.{}", ext)).is_file(), "index.{}", ext);
        assert!(out.join(format!("Enums/EMovementMode.{}", ext)).is_file());
    }
    let xml = fs::read_to_string(out.join("index.xml")).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
}

#[test]
fn node_images_are_copied() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("renders")).unwrap();
    fs::write(dir.path().join("renders/jump.png"), b"\x89PNG").unwrap();
    let manifest = dir.path().join("m.json");
    fs::write(
        &manifest,
        r#"{
            "classes": [{ "name": "Character", "blueprintable": true, "comment": "c" }],
            "nodes": [{ "class": "Character", "id": "Jump", "short_title": "Jump",
                        "spawner": "function", "image": "renders/jump.png",
                        "function": { "name": "Jump" } }]
        }"#,
    )
    .unwrap();
    let out = dir.path().join("docs");

    cmd(dir.path()).args(["-f", "json", "-o"]).arg(&out).arg(&manifest).assert().success();
    assert_eq!(fs::read(out.join("Classes/Character/img/nd_img_Jump.png")).unwrap(), b"\x89PNG");
    let node = read_json(&out.join("Classes/Character/nodes/Jump.json"));
    assert_eq!(node["imgpath"], "../img/nd_img_Jump.png");

    let plain = dir.path().join("plain");
    cmd(dir.path())
        .args(["--no-images", "-f", "json", "-o"])
        .arg(&plain)
        .arg(&manifest)
        .assert()
        .success();
    assert!(!plain.join("Classes/Character/img").exists());
    let node = read_json(&plain.join("Classes/Character/nodes/Jump.json"));
    assert!(node.get("imgpath").is_none());
}

// -- warnings --

#[test]
fn teamcity_messages() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["--teamcity", "-o", "docs"])
        .arg(fixture_path("undocumented.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "##teamcity[message status='WARNING' text='No description for UClass: Pickup']",
        ))
        .stderr(predicate::str::contains("node Ghost_Haunt names unknown class Ghost"));
}

#[test]
fn fail_on_warnings_sets_exit_status() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["--fail-on-warnings", "-o", "docs"])
        .arg(fixture_path("undocumented.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 warning(s) recorded"));

    // Documents are still written.
    assert!(dir.path().join("docs/Classes/Pickup/Pickup.xml").is_file());
}

#[test]
fn quiet_prints_only_the_count() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["-q", "-o", "docs"])
        .arg(fixture_path("undocumented.json"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::diff("2 warning(s)\n"));
}

#[test]
fn warnings_are_printed_when_saving_fails() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/Classes"), "").unwrap();

    cmd(dir.path())
        .args(["-o", "docs"])
        .arg(fixture_path("undocumented.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No description for UClass: Pickup"))
        .stderr(predicate::str::contains("failed to save documentation to docs"));
}

// -- configuration --

#[test]
fn config_file_sets_title_and_formats() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["--config", &fixture_path("bpdoc.toml"), "-o", "docs"])
        .arg(fixture_path("character.json"))
        .assert()
        .success();

    let index = read_json(&dir.path().join("docs/index.json"));
    assert_eq!(index["display_name"], "Game API");
    assert!(dir.path().join("docs/index.xml").is_file());
    assert!(!dir.path().join("docs/index.html").exists());
}

#[test]
fn flags_override_config_and_environment() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bpdoc.toml"), "title = \"From File\"\nformats = [\"xml\"]\n").unwrap();

    cmd(dir.path())
        .env("BPDOC_TITLE", "From Env")
        .args(["-f", "json", "-o", "docs"])
        .arg(fixture_path("character.json"))
        .assert()
        .success();
    let index = read_json(&dir.path().join("docs/index.json"));
    assert_eq!(index["display_name"], "From Env");
    assert!(!dir.path().join("docs/index.xml").exists());

    cmd(dir.path())
        .env("BPDOC_TITLE", "From Env")
        .args(["-t", "From Flag", "-f", "json", "-o", "docs"])
        .arg(fixture_path("character.json"))
        .assert()
        .success();
    let index = read_json(&dir.path().join("docs/index.json"));
    assert_eq!(index["display_name"], "From Flag");
}

#[test]
fn formats_from_environment() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .env("BPDOC_FORMATS", "json,html")
        .args(["-o", "docs"])
        .arg(fixture_path("character.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 6 documents (12 files)"));

    assert!(dir.path().join("docs/index.json").is_file());
    assert!(dir.path().join("docs/index.html").is_file());
    assert!(!dir.path().join("docs/index.xml").exists());
}

// -- errors --

#[test]
fn unknown_format_fails() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["-f", "pdf"])
        .arg(fixture_path("character.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: pdf"));
}

#[test]
fn invalid_manifest_fails() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .arg(fixture_path("broken.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid manifest"));
}

#[test]
fn no_matching_manifests_fails() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .arg("missing/*.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("warning: no files matched: missing/*.json"))
        .stderr(predicate::str::contains("no manifests found"));
}

#[test]
fn manifests_are_required() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path()).assert().failure();
}
