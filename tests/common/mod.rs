//! Shared helpers for the command line tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Identity and config isolation so commits work on any machine.
pub const GIT_ENV: &[(&str, &str)] = &[
    ("GIT_AUTHOR_NAME", "Sprout Test"),
    ("GIT_AUTHOR_EMAIL", "sprout@example.com"),
    ("GIT_COMMITTER_NAME", "Sprout Test"),
    ("GIT_COMMITTER_EMAIL", "sprout@example.com"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
];

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(GIT_ENV.iter().copied())
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A local template repository with two commits of history.
pub struct TemplateRepo {
    temp_dir: TempDir,
}

impl TemplateRepo {
    pub fn new() -> Self {
        Self::with_files(&[
            ("package.json", "{\n  \"name\": \"template\"\n}\n"),
            ("index.js", "console.log('hello');\n"),
            (".gitignore", "node_modules\n"),
        ])
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        git(root, &["init", "--quiet"]);
        fs::write(root.join("README.md"), "# template\n").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "--quiet", "-m", "first"]);

        for (name, contents) in files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, contents).unwrap();
        }
        git(root, &["add", "."]);
        git(root, &["commit", "--quiet", "-m", "second"]);

        TemplateRepo { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }
}

/// Sorted names of the entries directly under `dir`.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

pub fn workspace() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().to_path_buf();
    (tmp, path)
}
