
use std::fs;
use std::path::{Path, PathBuf};

pub fn write_db(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("fortunes");
    fs::write(&path, contents).unwrap();
    path
}
