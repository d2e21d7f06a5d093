use std::{
    cmp::Ordering,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::error::{FlipbookError, FlipbookResult};

const FRAME_EXTENSIONS: &[&str] = &["png"];

/// Collect the `*.png` frames under `dir` in natural order.
pub fn collect_frames(dir: &Path, recursive: bool) -> FlipbookResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FlipbookError::config(format!(
            "input folder not found: '{}'",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    visit_dir(dir, recursive, &mut paths)?;
    sort_natural(&mut paths);
    Ok(paths)
}

fn visit_dir(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> FlipbookResult<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read input folder '{}'", dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("read input folder '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                visit_dir(&path, recursive, out)?;
            }
        } else if has_frame_extension(&path) {
            out.push(path);
        }
    }

    Ok(())
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Sort paths by file name so digit runs compare as integers:
/// `frame2.png` sorts before `frame10.png`.
pub fn sort_natural(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&file_name_of(a), &file_name_of(b)));
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    // Digit runs compare by (length sans leading zeros, digits), which equals
    // integer comparison for runs of any length.
    Number(usize, String),
    Text(String),
}

fn natural_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut rest = name;

    while let Some(first) = rest.chars().next() {
        let digits = first.is_ascii_digit();
        let run_len = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(run_len);

        if digits {
            let stripped = run.trim_start_matches('0');
            chunks.push(Chunk::Number(stripped.len(), stripped.to_string()));
        } else {
            chunks.push(Chunk::Text(run.to_lowercase()));
        }
        rest = tail;
    }

    chunks
}
