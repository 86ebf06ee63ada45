use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn research_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("research");
    path
}

fn words(n: usize, seed: &str) -> String {
    (0..n)
        .map(|i| format!("{}{}", seed, i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn setup_test_env() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let web_body = "Widgets are great for home use. ".repeat(5);
    let web = serde_json::json!([
        {
            "id": "web-a",
            "source_type": "web",
            "source_title": "Widget review",
            "source_url": "https://example.com/widgets",
            "source_content": web_body,
            "relevance": 0.8
        },
        {
            "id": "web-b",
            "source_type": "web",
            "source_title": "Gadget history",
            "source_content": words(300, "gadget"),
        },
        {
            "id": "synth",
            "source_type": "synthesis",
            "source_title": "Research synthesis",
            "source_content": words(400, "summary"),
        }
    ]);
    let docs = serde_json::json!([
        {
            "id": "doc-b",
            "source_title": "Internal testing notes",
            "source_content": "Widgets are great for home use, and widgets stay great at home."
        }
    ]);

    let web_path = root.join("web.json");
    let docs_path = root.join("docs.json");
    fs::write(&web_path, web.to_string()).unwrap();
    fs::write(&docs_path, docs.to_string()).unwrap();

    (tmp, web_path, docs_path)
}

fn run_research(args: &[&str]) -> (String, String, Option<i32>) {
    let binary = research_binary();
    let output = Command::new(&binary)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run research binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_merge_summary() {
    let (_tmp, web, docs) = setup_test_env();
    let (stdout, stderr, code) =
        run_research(&["merge", "--web", path_str(&web), "--docs", path_str(&docs)]);
    assert_eq!(code, Some(0), "merge failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("input: 3 web, 1 documents"));
    assert!(stdout.contains("1 removed"));
    assert!(stdout.contains("output: 3 sources"));
}

#[test]
fn test_merge_json_keeps_document_over_web() {
    let (_tmp, web, docs) = setup_test_env();
    let (stdout, stderr, code) = run_research(&[
        "merge",
        "--web",
        path_str(&web),
        "--docs",
        path_str(&docs),
        "--json",
    ]);
    assert_eq!(code, Some(0), "merge failed: stderr={}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = json["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["doc-b", "synth", "web-b"]);
    assert_eq!(json["duplicates_removed"], 1);
    assert_eq!(json["findings"][0]["type"], "high");
}

#[test]
fn test_merge_keep_duplicates_flag() {
    let (_tmp, web, docs) = setup_test_env();
    let (stdout, _, code) = run_research(&[
        "merge",
        "--web",
        path_str(&web),
        "--docs",
        path_str(&docs),
        "--keep-duplicates",
        "--json",
    ]);
    assert_eq!(code, Some(0));
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["sources"].as_array().unwrap().len(), 4);
}

#[test]
fn test_merge_without_inputs() {
    let (stdout, _, code) = run_research(&["merge", "--json"]);
    assert_eq!(code, Some(0));
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["stats"]["output"]["total_sources"], 0);
}

#[test]
fn test_validate_merged_output() {
    let (tmp, web, docs) = setup_test_env();
    let (stdout, _, code) = run_research(&[
        "merge",
        "--web",
        path_str(&web),
        "--docs",
        path_str(&docs),
        "--json",
    ]);
    assert_eq!(code, Some(0));
    let merged = tmp.path().join("merged.json");
    fs::write(&merged, stdout).unwrap();

    let (stdout, stderr, code) = run_research(&[
        "validate",
        "--input",
        path_str(&merged),
        "--duration",
        "45",
        "--json",
    ]);
    assert_eq!(code, Some(0), "validate failed: stderr={}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["validation"]["is_adequate"], false);
    assert_eq!(json["validation"]["current"]["source_count"], 3);
    assert_eq!(json["validation"]["requirement"]["min_words"], 10000);
}

#[test]
fn test_check_exits_nonzero_when_inadequate() {
    let (_tmp, web, docs) = setup_test_env();
    let (stdout, _, code) = run_research(&[
        "check",
        "--web",
        path_str(&web),
        "--docs",
        path_str(&docs),
        "--duration",
        "60",
    ]);
    assert_eq!(code, Some(2));
    assert!(stdout.contains("inadequate"));
    assert!(stdout.contains("[CRITICAL]"));
}

#[test]
fn test_check_respects_config_default_duration() {
    let (tmp, web, docs) = setup_test_env();
    let config = tmp.path().join("research.toml");
    fs::write(&config, "[validation]\ndefault_duration_minutes = 30\n").unwrap();

    let (stdout, _, _) = run_research(&[
        "--config",
        path_str(&config),
        "check",
        "--web",
        path_str(&web),
        "--docs",
        path_str(&docs),
        "--json",
    ]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["validation"]["duration_minutes"], 30);
    assert_eq!(json["validation"]["requirement"]["min_words"], 3000);
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("research.toml");
    fs::write(&config, "[merge]\nmax_sources = 0\n").unwrap();
    let (_, stderr, code) = run_research(&["--config", path_str(&config), "requirements"]);
    assert_ne!(code, Some(0));
    assert!(stderr.contains("max_sources"));
}

#[test]
fn test_invalid_sources_file_rejected() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "not json").unwrap();
    let (_, stderr, code) = run_research(&["validate", "--input", path_str(&bad)]);
    assert_ne!(code, Some(0));
    assert!(stderr.contains("Invalid sources file"));
}

#[test]
fn test_zero_duration_rejected() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("sources.json");
    fs::write(&input, "[]").unwrap();
    let (_, _, code) = run_research(&["validate", "--input", path_str(&input), "--duration", "0"]);
    assert_ne!(code, Some(0));
}

#[test]
fn test_overlap_report() {
    let tmp = TempDir::new().unwrap();
    let body = "Photosynthesis converts light energy into chemical energy inside chloroplasts. "
        .repeat(3);
    let input = tmp.path().join("sources.json");
    fs::write(
        &input,
        serde_json::json!({ "sources": [
            { "id": "a", "source_content": body },
            { "id": "b", "source_content": body }
        ]})
        .to_string(),
    )
    .unwrap();
    let (stdout, _, code) = run_research(&["overlap", "--input", path_str(&input)]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("1 overlapping pair"));
    assert!(stdout.contains("a ~ b"));
}

#[test]
fn test_requirements_table() {
    let (stdout, _, code) = run_research(&["requirements"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("<= 60"));
    assert!(stdout.contains("13000"));
}

#[test]
fn test_completions() {
    let (stdout, _, code) = run_research(&["completions", "bash"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("research"));
}
