//! Sutra Audit
//!
//! Build-time sanity check for the content tree: every chapter
//! directory is expected to carry a `chapter.json` configuration and at
//! least one `scene-*.json` descriptor. Emits a tabular report file and
//! fails the build when something is missing.

use anyhow::Result;
use std::fs;
use std::path::Path;
use sutra_content::Chapter;
use sutra_scene::SceneDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChapterRow {
    directory: String,
    has_config: bool,
    config_parses: bool,
    scene_files: usize,
    scenes_valid: usize,
}

impl ChapterRow {
    fn complete(&self) -> bool {
        self.has_config && self.config_parses && self.scenes_valid > 0
    }

    fn status(&self) -> &'static str {
        if self.complete() {
            "OK"
        } else {
            "INCOMPLETE"
        }
    }
}

/// Scan each immediate subdirectory of the content root.
fn audit_tree(root: &Path) -> Result<Vec<ChapterRow>> {
    let mut rows = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let directory = entry.file_name().to_string_lossy().into_owned();
        rows.push(audit_chapter_dir(&path, directory));
    }
    rows.sort_by(|a, b| a.directory.cmp(&b.directory));
    Ok(rows)
}

fn audit_chapter_dir(dir: &Path, directory: String) -> ChapterRow {
    let config_path = dir.join("chapter.json");
    let has_config = config_path.is_file();
    let config_parses = has_config
        && fs::read_to_string(&config_path)
            .ok()
            .and_then(|json| serde_json::from_str::<Chapter>(&json).ok())
            .is_some();

    let mut scene_files = 0;
    let mut scenes_valid = 0;
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with("scene-") || !name.ends_with(".json") {
                continue;
            }
            scene_files += 1;
            match SceneDescriptor::load(&entry.path()) {
                Ok(_) => scenes_valid += 1,
                Err(err) => {
                    tracing::warn!(file = %entry.path().display(), %err, "invalid scene descriptor");
                }
            }
        }
    }

    ChapterRow {
        directory,
        has_config,
        config_parses,
        scene_files,
        scenes_valid,
    }
}

fn format_report(rows: &[ChapterRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:>8} {:>8} {:>8} {:>8}  {}\n",
        "DIRECTORY", "CONFIG", "PARSES", "SCENES", "VALID", "STATUS"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<24} {:>8} {:>8} {:>8} {:>8}  {}\n",
            row.directory,
            if row.has_config { "yes" } else { "no" },
            if row.config_parses { "yes" } else { "no" },
            row.scene_files,
            row.scenes_valid,
            row.status()
        ));
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "content".to_string());
    let out_path = args.next().unwrap_or_else(|| "audit_report.txt".to_string());

    let rows = audit_tree(Path::new(&root))?;
    let report = format_report(&rows);
    fs::write(&out_path, &report)?;
    print!("{report}");

    let incomplete = rows.iter().filter(|r| !r.complete()).count();
    tracing::info!(
        chapters = rows.len(),
        incomplete,
        report = out_path.as_str(),
        "audit finished"
    );
    if incomplete > 0 {
        anyhow::bail!("{incomplete} chapter directories are incomplete");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sutra-audit-{tag}-{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const CHAPTER_JSON: &str = r#"{
        "number": 1,
        "title": "Test",
        "verses": [
            {"number": 1, "title": "One", "text": "..."}
        ]
    }"#;

    const SCENE_JSON: &str = r#"{
        "name": "t",
        "cloud": {
            "count": 4,
            "center": [0.0, 0.0, 0.0],
            "spawn_radius": 1.0,
            "policy": {"oscillate": {"amplitude": 0.5, "frequency": 1.0}},
            "seed": 1
        },
        "interaction": "none"
    }"#;

    #[test]
    fn test_complete_chapter_passes() {
        let root = temp_root("complete");
        let chapter = root.join("chapter-01");
        fs::create_dir_all(&chapter).unwrap();
        fs::write(chapter.join("chapter.json"), CHAPTER_JSON).unwrap();
        fs::write(chapter.join("scene-verse-1-1.json"), SCENE_JSON).unwrap();

        let rows = audit_tree(&root).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].complete());
        assert_eq!(rows[0].scenes_valid, 1);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_pieces_are_reported() {
        let root = temp_root("missing");
        // No config at all.
        fs::create_dir_all(root.join("chapter-01")).unwrap();
        fs::write(root.join("chapter-01/scene-a.json"), SCENE_JSON).unwrap();
        // Config present but no scenes.
        fs::create_dir_all(root.join("chapter-02")).unwrap();
        fs::write(root.join("chapter-02/chapter.json"), CHAPTER_JSON).unwrap();
        // Config present, scene broken.
        fs::create_dir_all(root.join("chapter-03")).unwrap();
        fs::write(root.join("chapter-03/chapter.json"), CHAPTER_JSON).unwrap();
        fs::write(root.join("chapter-03/scene-bad.json"), "{broken").unwrap();

        let rows = audit_tree(&root).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| !r.complete()));
        let third = &rows[2];
        assert_eq!(third.scene_files, 1);
        assert_eq!(third.scenes_valid, 0);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_report_is_tabular_and_ordered() {
        let rows = vec![
            ChapterRow {
                directory: "chapter-02".to_string(),
                has_config: true,
                config_parses: true,
                scene_files: 2,
                scenes_valid: 2,
            },
            ChapterRow {
                directory: "chapter-10".to_string(),
                has_config: false,
                config_parses: false,
                scene_files: 0,
                scenes_valid: 0,
            },
        ];
        let report = format_report(&rows);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("DIRECTORY"));
        assert!(lines[1].contains("OK"));
        assert!(lines[2].contains("INCOMPLETE"));
    }

    #[test]
    fn test_repo_content_tree_is_complete() {
        // The tree shipped in this repository must pass its own audit.
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../content");
        if !root.is_dir() {
            return;
        }
        let rows = audit_tree(&root).unwrap();
        assert!(!rows.is_empty());
        for row in &rows {
            assert!(row.complete(), "{} is incomplete", row.directory);
        }
    }
}
