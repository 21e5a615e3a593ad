use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn hsearch() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hsearch"))
}

#[test]
fn resolve_prefers_earlier_directory() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("first/config.h"), "");
    write_file(&temp.path().join("second/config.h"), "");

    let assert = hsearch()
        .arg("-I")
        .arg(temp.path().join("first"))
        .arg("--isystem")
        .arg(temp.path().join("second"))
        .arg("resolve")
        .arg("config.h")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "header");
    assert_eq!(items[0]["characteristic"], "user");
    assert_eq!(items[0]["relative_path"], "config.h");
    assert!(items[0]["path"].as_str().unwrap().ends_with("first/config.h"));
}

#[test]
fn resolve_reports_not_found() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("inc")).unwrap();

    let assert = hsearch()
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("resolve")
        .arg("<missing.h>")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["kind"], "not-found");
    assert_eq!(items[0]["include_kind"], "angled");
    assert_eq!(items[0]["errors"][0]["code"], "HEADER_NOT_FOUND");
}

#[test]
fn quoted_resolve_checks_includer_directory_first() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("src/main.c"), "");
    write_file(&temp.path().join("src/util.h"), "");
    write_file(&temp.path().join("inc/util.h"), "");

    let assert = hsearch()
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("resolve")
        .arg("--quoted")
        .arg("--from")
        .arg(temp.path().join("src/main.c"))
        .arg("util.h")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert!(items[0]["path"].as_str().unwrap().ends_with("src/util.h"));
    assert!(items[0].get("data").is_none());
}

#[test]
fn angled_resolve_skips_iquote_directories() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("quote/only.h"), "");

    let assert = hsearch()
        .arg("--iquote")
        .arg(temp.path().join("quote"))
        .arg("resolve")
        .arg("<only.h>")
        .arg("\"only.h\"")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["kind"], "not-found");
    assert_eq!(items[1]["kind"], "header");
}

#[test]
fn resolve_through_header_map() {
    let temp = tempdir().unwrap();
    let target = temp.path().join("src/ui/Button.h");
    write_file(&target, "");
    let hmap = temp.path().join("app.hmap.json");
    write_file(
        &hmap,
        &serde_json::json!({ "App/Button.h": target.to_string_lossy() }).to_string(),
    );

    let assert = hsearch()
        .arg("--hmap")
        .arg(&hmap)
        .arg("resolve")
        .arg("app/button.h")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["kind"], "header");
    assert!(items[0]["search_path"].as_str().unwrap().ends_with("app.hmap.json"));
}

#[test]
fn resolve_framework_header() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("sdk/Widgets.framework/Headers/Widgets.h"), "");

    let assert = hsearch()
        .arg("--iframework")
        .arg(temp.path().join("sdk"))
        .arg("--system-framework")
        .arg("Widgets")
        .arg("resolve")
        .arg("Widgets/Widgets.h")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["characteristic"], "system");
    assert_eq!(items[0]["system_framework"], true);
    assert_eq!(items[0]["relative_path"], "Widgets.h");
}

#[test]
fn duplicate_config_entry_is_fatal() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("inc")).unwrap();

    hsearch()
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate search path entry"));
}

#[test]
fn malformed_header_map_is_fatal() {
    let temp = tempdir().unwrap();
    let hmap = temp.path().join("bad.json");
    write_file(&hmap, "{ not json");

    hsearch()
        .arg("--hmap")
        .arg(&hmap)
        .arg("resolve")
        .arg("a.h")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed header map"));
}

#[test]
fn list_marks_quote_only_and_drops_missing_directories() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("quote")).unwrap();
    fs::create_dir(temp.path().join("inc")).unwrap();

    let assert = hsearch()
        .arg("--iquote")
        .arg(temp.path().join("quote"))
        .arg("-I")
        .arg(temp.path().join("missing"))
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring nonexistent directory"));
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["data"]["quote_only"], true);
    assert!(items[1]["name"].as_str().unwrap().ends_with("inc"));
    assert_eq!(items[2]["kind"], "stats");
    assert_eq!(items[2]["data"]["angled_start"], 1);
}

#[test]
fn config_file_entries_come_before_flags() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("from-config/a.h"), "");
    write_file(&temp.path().join("from-flag/a.h"), "");
    let config = temp.path().join("search.json");
    write_file(
        &config,
        &serde_json::json!({
            "entries": [
                { "directory": temp.path().join("from-config").to_string_lossy(), "characteristic": "extern-c-system" }
            ]
        })
        .to_string(),
    );

    let assert = hsearch()
        .arg("--config")
        .arg(&config)
        .arg("-I")
        .arg(temp.path().join("from-flag"))
        .arg("resolve")
        .arg("a.h")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["characteristic"], "extern-c-system");
    assert!(items[0]["path"].as_str().unwrap().contains("from-config"));
}

#[test]
fn deps_resolves_directives_and_prints_stats() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("src/local.h"), "");
    write_file(&temp.path().join("inc/lib.h"), "");
    write_file(
        &temp.path().join("src/main.c"),
        "#include \"local.h\"\n#include <lib.h>\n#include <nowhere.h>\nint main(void) { return 0; }\n",
    );

    let assert = hsearch()
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("--no-color")
        .arg("deps")
        .arg(temp.path().join("src/main.c"))
        .arg("--stats")
        .assert()
        .success()
        .stderr(predicate::str::contains("Lookups: 3"));
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["line"], 1);
    assert_eq!(items[1]["kind"], "header");
    assert_eq!(items[2]["kind"], "not-found");
    assert_eq!(items[2]["line"], 3);
}

#[test]
fn markdown_output_lists_search_order() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("inc")).unwrap();

    hsearch()
        .arg("-I")
        .arg(temp.path().join("inc"))
        .arg("--format")
        .arg("md")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Search List"))
        .stdout(predicate::str::contains("## Statistics"));
}
