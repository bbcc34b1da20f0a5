use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

#[allow(dead_code)]
pub fn setup(input: &str) -> Result<(TempDir, PathBuf, PathBuf), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let input_path = dir.path().join("employee.csv");
    let output_dir = dir.path().join("post");
    fs::write(&input_path, input)?;
    Ok((dir, input_path, output_dir))
}

#[allow(dead_code)]
pub fn read_lines(path: &Path) -> Result<Vec<String>, anyhow::Error> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(|line| line.to_string()).collect())
}

#[allow(dead_code)]
pub fn output_files(output_dir: &Path) -> Result<Vec<String>, anyhow::Error> {
    let mut names = Vec::new();
    if output_dir.exists() {
        for entry in fs::read_dir(output_dir)? {
            names.push(entry?.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[allow(dead_code)]
pub fn key(line: &str) -> i64 {
    line.split(',').nth(1).unwrap().trim().parse().unwrap()
}
