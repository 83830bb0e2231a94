use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

const CROP_ROWS: u32 = 32;

fn main() -> anyhow::Result<()> {
    let mut args: Vec<_> = std::env::args().skip(1).collect();
    let verbosity = if args.first().map(String::as_str) == Some("-v") {
        args.remove(0);
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();
    if args.is_empty() {
        anyhow::bail!("usage: crop-bottom [-v] <file.png>...");
    }

    let mut failures = 0;
    for file_name in &args {
        match crop_file(Path::new(file_name)) {
            Ok(()) => println!("Cropped {file_name}"),
            Err(e) => {
                log::error!("{e:#}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {} files could not be cropped", args.len());
    }
    Ok(())
}

fn crop_file(path: &Path) -> anyhow::Result<()> {
    let input = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let output = png_crop::crop_bottom(&input, CROP_ROWS)
        .with_context(|| format!("Failed to crop {}", path.display()))?;
    replace_file(path, &output)
}

/// Writes next to `path` first and renames over it, so the original stays intact on failure.
fn replace_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let temp_path = temp_path_for(path)?;
    let result = fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write {}", temp_path.display()))
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("Failed to replace {}", path.display()))
        });
    if result.is_err() {
        // A failed write may have left a partial file behind.
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> anyhow::Result<PathBuf> {
    let mut file_name: OsString = path
        .file_name()
        .with_context(|| format!("{} is not a file path", path.display()))?
        .to_owned();
    file_name.push(".crop-tmp");
    Ok(path.with_file_name(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crop-bottom-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn replace_file_swaps_contents() {
        let dir = scratch_dir("swap");
        let target = dir.join("image.png");
        fs::write(&target, b"old").unwrap();

        replace_file(&target, b"new").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(!temp_path_for(&target).unwrap().exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = scratch_dir("rename");
        // A file can't be renamed over a directory.
        let target = dir.join("image.png");
        fs::create_dir(&target).unwrap();

        assert!(replace_file(&target, b"new").is_err());
        assert!(!temp_path_for(&target).unwrap().exists());
        assert!(target.is_dir());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = scratch_dir("write");
        let target = dir.join("missing").join("image.png");

        assert!(replace_file(&target, b"new").is_err());
        assert!(!temp_path_for(&target).unwrap().exists());
        assert!(!target.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let temp = temp_path_for(Path::new("sprites/cat.png")).unwrap();
        assert_eq!(temp, Path::new("sprites/cat.png.crop-tmp"));
        assert!(temp_path_for(Path::new("/")).is_err());
    }
}
