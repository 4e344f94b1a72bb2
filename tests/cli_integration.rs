//! CLI integration tests for Mythic Chronicles
//!
//! Each test runs the binary against a site document in a temporary
//! directory, with HOME and the preference file pointed inside it.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SITE: &str = r##"{
  "config": {
    "siteTitle": "Mythic Chronicles",
    "primaryColor": "#8B5CF6",
    "themes": ["light", "dark", "forest"],
    "header": {"logo": "/logo.svg", "title": "Mythic Chronicles", "showSearch": true},
    "genres": ["Fantasy", "Horror", "Mystery"]
  },
  "stories": [
    {
      "id": "dragon",
      "title": "The Dragon's Lair",
      "author": "Jane Smith",
      "genre": "Fantasy",
      "publishDate": "2024-01-15",
      "excerpt": "A knight seeks the ancient beast.",
      "coverImage": "/dragon.jpg",
      "pages": [
        {"id": 1, "content": [
          {"type": "heading", "value": "Chapter One", "placement": "center"},
          {"type": "text", "value": "The mountain was silent.", "placement": "left"}
        ]},
        {"id": 2, "content": [
          {"type": "image", "src": "/cave.jpg", "alt": "The cave mouth", "caption": "Where it sleeps", "placement": "center"}
        ]}
      ]
    },
    {
      "id": "hollow",
      "title": "Haunted Hollow",
      "author": "Tom Reed",
      "genre": "Horror",
      "publishDate": "2023-10-31",
      "excerpt": "Nobody returns from the hollow.",
      "pages": []
    }
  ],
  "poetries": [
    {
      "id": "wings",
      "title": "Wings of Fire",
      "author": "Ana Lee",
      "genre": "Fantasy",
      "publishDate": "2024-03-01",
      "lines": ["Over the ridge the DRAGON flies,", "", "embers falling from the skies."]
    },
    {
      "id": "fog",
      "title": "Fog",
      "author": "Tom Reed",
      "genre": "Mystery",
      "publishDate": "2022-05-05",
      "lines": ["Grey on grey"]
    }
  ]
}"##;

/// Get a command instance for the mythic binary, isolated from the user's
/// real configuration and preferences
fn mythic_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("mythic"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg-config"))
        .env("XDG_DATA_HOME", dir.join("xdg-data"))
        .env("MYTHIC_PREFERENCES", dir.join("preferences.json"))
        .env_remove("MYTHIC_SOURCE")
        .env_remove("MYTHIC_LOG");
    cmd
}

/// Temporary directory holding `config.json`
fn setup_site(site: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.json"), site).unwrap();
    dir
}

fn prefs_path(dir: &TempDir) -> PathBuf {
    dir.path().join("preferences.json")
}

// =============================================================================
// Listing and filtering
// =============================================================================

#[test]
fn test_stories_lists_all_in_order() {
    let dir = setup_site(SITE);

    let output = mythic_cmd(dir.path()).arg("stories").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();

    let dragon = stdout.find("The Dragon's Lair").unwrap();
    let hollow = stdout.find("Haunted Hollow").unwrap();
    assert!(dragon < hollow);
    assert!(stdout.contains("January 15, 2024"));
}

#[test]
fn test_genre_filter_is_exact() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["stories", "--genre", "Horror"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Haunted Hollow"))
        .stdout(predicate::str::contains("The Dragon's Lair").not());

    mythic_cmd(dir.path())
        .args(["stories", "--genre", "horror"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No stories found for the selected filters.",
        ));
}

#[test]
fn test_poems_search_matches_lines_case_insensitively() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["poems", "--search", "dragon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wings of Fire"))
        .stdout(predicate::str::contains("Fog").not());
}

#[test]
fn test_search_covers_both_collections() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["search", "dragon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Search results for: \"dragon\""))
        .stdout(predicate::str::contains("Stories (1):"))
        .stdout(predicate::str::contains("The Dragon's Lair"))
        .stdout(predicate::str::contains("Poetry (1):"))
        .stdout(predicate::str::contains("Wings of Fire"));
}

#[test]
fn test_search_combines_with_genre() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["search", "reed", "--genre", "Mystery"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No stories found for the selected filters.",
        ))
        .stdout(predicate::str::contains("Fog"));
}

#[test]
fn test_stories_json_output() {
    let dir = setup_site(SITE);

    let output = mythic_cmd(dir.path())
        .args(["stories", "--genre", "Fantasy", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "dragon");
    assert_eq!(items[0]["pages"], 2);
}

#[test]
fn test_genres_counts() {
    let dir = setup_site(SITE);

    let output = mythic_cmd(dir.path())
        .args(["genres", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["genre"], "Fantasy");
    assert_eq!(rows[0]["stories"], 1);
    assert_eq!(rows[0]["poetries"], 1);
    assert_eq!(rows[2]["genre"], "Mystery");
    assert_eq!(rows[2]["stories"], 0);
}

// =============================================================================
// Load failures
// =============================================================================

#[test]
fn test_missing_document_fails() {
    let dir = TempDir::new().unwrap();

    mythic_cmd(dir.path())
        .arg("stories")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_malformed_document_fails() {
    let dir = setup_site("{ not json");

    mythic_cmd(dir.path())
        .arg("poems")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration"));
}

#[test]
fn test_source_flag_overrides_default() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site.json");
    fs::write(&site, SITE).unwrap();

    mythic_cmd(dir.path())
        .args(["stories", "--source", site.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Haunted Hollow"));
}

#[test]
fn test_source_env_is_used() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("elsewhere.json");
    fs::write(&site, SITE).unwrap();

    mythic_cmd(dir.path())
        .env("MYTHIC_SOURCE", &site)
        .arg("poems")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wings of Fire"));
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_read_story() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["read", "story", "dragon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by Jane Smith"))
        .stdout(predicate::str::contains("~ Page 1 of 2 ~"))
        .stdout(predicate::str::contains("CHAPTER ONE"))
        .stdout(predicate::str::contains("[Image: The cave mouth]"))
        .stdout(predicate::str::contains("Where it sleeps"));
}

#[test]
fn test_read_single_page() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["read", "story", "dragon", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~ Page 2 of 2 ~"))
        .stdout(predicate::str::contains("CHAPTER ONE").not());

    mythic_cmd(dir.path())
        .args(["read", "story", "dragon", "--page", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_read_poem_keeps_stanza_break() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["read", "poem", "wings"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Over the ridge the DRAGON flies,\n\nembers falling from the skies.",
        ));
}

#[test]
fn test_read_unknown_story_fails() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["read", "story", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Story not found: nope"));
}

// =============================================================================
// Theme
// =============================================================================

#[test]
fn test_first_run_theme_is_dark() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"))
        .stdout(predicate::str::contains("#0F172A"));
}

#[test]
fn test_theme_set_persists_across_runs() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "set", "forest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to forest"));

    let saved = fs::read_to_string(prefs_path(&dir)).unwrap();
    assert!(saved.contains("\"mythic-chronicles-theme\""));
    assert!(saved.contains("\"forest\""));

    mythic_cmd(dir.path())
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: forest"))
        .stdout(predicate::str::contains("#10B981"));
}

#[test]
fn test_saved_theme_not_enabled_falls_back_to_dark() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "set", "forest"])
        .assert()
        .success();

    // The site stops enabling forest
    let narrowed = SITE.replace(r#"["light", "dark", "forest"]"#, r#"["light", "dark"]"#);
    fs::write(dir.path().join("config.json"), narrowed).unwrap();

    mythic_cmd(dir.path())
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    // Restoring does not overwrite the saved choice
    let saved = fs::read_to_string(prefs_path(&dir)).unwrap();
    assert!(saved.contains("\"forest\""));
}

#[test]
fn test_theme_set_accepts_theme_the_site_does_not_list() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "set", "galaxy", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\":\"galaxy\""))
        .stdout(predicate::str::contains("#A855F7"));
}

#[test]
fn test_theme_set_rejects_unknown_name() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "set", "neon"])
        .assert()
        .failure();

    assert!(!prefs_path(&dir).exists());
}

#[test]
fn test_theme_list_marks_current() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* dark"))
        .stdout(predicate::str::contains("  light"))
        .stdout(predicate::str::contains("galaxy").not());
}

#[test]
fn test_theme_show_css() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .args(["theme", "show", "--css"])
        .assert()
        .success()
        .stdout(predicate::str::contains(":root {"))
        .stdout(predicate::str::contains("--theme-bg-primary: #0F172A;"));
}

// =============================================================================
// Check
// =============================================================================

#[test]
fn test_check_clean_document() {
    let dir = setup_site(SITE);

    mythic_cmd(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 stories, 2 poems, 3 genres"))
        .stdout(predicate::str::contains("No issues found."));
}

#[test]
fn test_check_reports_warnings_but_succeeds() {
    let dir = setup_site(
        r#"{
            "config": {"themes": ["dark", "neon"], "genres": ["Fantasy"]},
            "stories": [
                {"id": "a", "genre": "Fantasy"},
                {"id": "a", "genre": "Western"}
            ]
        }"#,
    );

    mythic_cmd(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate story id 'a'"))
        .stdout(predicate::str::contains("genre 'Western'"))
        .stdout(predicate::str::contains("unknown theme 'neon'"));
}
