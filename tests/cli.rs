//! Command-line tests: run the built binary against the fixture content.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_agl-site"))
        .args(args)
        .env_remove("SITE_BASE_URL")
        .env_remove("AGL_SITE_LOG")
        .output()
        .expect("failed to run agl-site")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn build_writes_site_and_reports_pages() {
    let dist = TempDir::new().unwrap();
    let source = fixtures();
    let out = run(&[
        "build",
        "--source",
        source.to_str().unwrap(),
        "--output",
        dist.path().to_str().unwrap(),
        "--base-url",
        "https://cli.example.test/",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert!(text.contains("Blog: My First Post \u{2192} blog/my-first-post/index.html"));
    assert!(text.contains("==> Build complete"));

    let robots = std::fs::read_to_string(dist.path().join("robots.txt")).unwrap();
    assert!(robots.contains("Sitemap: https://cli.example.test/sitemap.xml"));
}

#[test]
fn base_url_from_environment() {
    let source = fixtures();
    let out = Command::new(env!("CARGO_BIN_EXE_agl-site"))
        .args(["sitemap", "--source", source.to_str().unwrap()])
        .env("SITE_BASE_URL", "https://env.example.test")
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.lines().all(|l| l.contains("https://env.example.test")));
    assert!(text.contains("https://env.example.test/blog/my-first-post (2025-01-15)"));
}

#[test]
fn flag_beats_environment() {
    let source = fixtures();
    let out = Command::new(env!("CARGO_BIN_EXE_agl-site"))
        .args([
            "sitemap",
            "--source",
            source.to_str().unwrap(),
            "--base-url",
            "https://flag.example.test",
        ])
        .env("SITE_BASE_URL", "https://env.example.test")
        .output()
        .unwrap();
    let text = stdout(&out);
    assert!(text.contains("https://flag.example.test/projects"));
    assert!(!text.contains("env.example.test"));
}

#[test]
fn check_lists_content() {
    let source = fixtures();
    let out = run(&["check", "--source", source.to_str().unwrap()]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Blog (3 posts)"));
    assert!(text.contains("Source: products/everything-else.md"));
    assert!(text.contains("==> Content is valid"));
}

#[test]
fn validate_passes_on_fixtures() {
    let source = fixtures();
    let out = run(&["validate", "--source", source.to_str().unwrap()]);
    assert!(out.status.success(), "{}", stdout(&out));
    assert!(stdout(&out).contains("all valid"));
}

#[test]
fn validate_fails_on_bad_content() {
    let src = TempDir::new().unwrap();
    std::fs::write(
        src.path().join("config.toml"),
        "[identity]\nauthor_name = \"\"\n",
    )
    .unwrap();
    let out = run(&["validate", "--source", src.path().to_str().unwrap()]);
    assert!(!out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Root Person (Person)"));
    assert!(text.contains("Checked 3 objects (0 posts, 0 projects)"));
}

#[test]
fn broken_front_matter_is_an_error() {
    let src = TempDir::new().unwrap();
    std::fs::create_dir_all(src.path().join("projects")).unwrap();
    std::fs::write(src.path().join("projects/bad.md"), "---\ntitle: [\n---\n").unwrap();
    let out = run(&["check", "--source", src.path().to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("bad.md"));
}

#[test]
fn invalid_base_url_rejected() {
    let source = fixtures();
    let out = run(&["check", "--source", source.to_str().unwrap(), "--base-url", "not a url"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("base_url"));
}

#[test]
fn gen_config_prints_stock_toml() {
    let out = run(&["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("base_url"));
    assert!(text.contains("[contact]"));
}
