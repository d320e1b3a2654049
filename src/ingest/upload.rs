use std::fs;
use std::path::{Path, PathBuf};

use crate::error::NicheError;

pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];
pub const UPLOAD_BASENAME: &str = "niche_file";

/// Lower-cased extension after the last dot, when it is one we accept.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn allowed_file(filename: &str) -> bool {
    allowed_extension(filename).is_some()
}

pub fn upload_path(upload_dir: &Path, ext: &str) -> PathBuf {
    upload_dir.join(format!("{UPLOAD_BASENAME}.{ext}"))
}

/// The stored raw upload, if one exists.
pub fn find_upload(upload_dir: &Path) -> Option<PathBuf> {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| upload_path(upload_dir, ext))
        .find(|p| p.is_file())
}

/// Validate and copy a user's spreadsheet into the upload folder as `niche_file.<ext>`.
///
/// Any previous upload with the other accepted extension is removed so that exactly one raw
/// upload remains.
pub fn store_upload(source: &Path, upload_dir: &Path, max_bytes: u64) -> Result<PathBuf, NicheError> {
    let filename = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let ext = allowed_extension(filename).ok_or_else(|| {
        NicheError::InvalidInput(format!(
            "unsupported file '{filename}': only .xlsx and .xls are accepted"
        ))
    })?;

    let meta = fs::metadata(source).map_err(|err| {
        NicheError::ReadFailure(format!("unable to read {}: {err}", source.display()))
    })?;
    if !meta.is_file() {
        return Err(NicheError::InvalidInput(format!(
            "{} is not a regular file",
            source.display()
        )));
    }
    if meta.len() > max_bytes {
        return Err(NicheError::InvalidInput(format!(
            "file is {} bytes, limit is {} bytes",
            meta.len(),
            max_bytes
        )));
    }

    fs::create_dir_all(upload_dir).map_err(|err| {
        NicheError::WriteFailure(format!(
            "unable to create upload folder {}: {err}",
            upload_dir.display()
        ))
    })?;
    let dest = upload_path(upload_dir, &ext);
    let same_file = dest.exists() && source.canonicalize().ok() == dest.canonicalize().ok();
    if same_file {
        log::info!("{} is already the stored upload", dest.display());
    } else {
        fs::copy(source, &dest).map_err(|err| {
            NicheError::WriteFailure(format!("unable to store upload at {}: {err}", dest.display()))
        })?;
    }

    for other in ALLOWED_EXTENSIONS.iter().filter(|e| **e != ext) {
        let stale = upload_path(upload_dir, other);
        if stale.exists() {
            if let Err(err) = fs::remove_file(&stale) {
                log::warn!("could not remove stale upload {}: {}", stale.display(), err);
            }
        }
    }
    log::info!("Stored upload {} ({} bytes)", dest.display(), meta.len());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rules() {
        assert!(allowed_file("niche.xlsx"));
        assert!(allowed_file("NICHE.XLS"));
        assert!(allowed_file("report.2024.xlsx"));
        assert!(!allowed_file("niche.csv"));
        assert!(!allowed_file("xlsx"));
        assert!(!allowed_file("niche.xlsx.bak"));
    }

    #[test]
    fn rejects_wrong_extension_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_upload(Path::new("listing.csv"), dir.path(), 1024).unwrap_err();
        assert!(matches!(err, NicheError::InvalidInput(_)));
    }

    #[test]
    fn rejects_oversized_upload() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("big.xlsx");
        fs::write(&src, vec![0u8; 64]).unwrap();
        let err = store_upload(&src, &dir.path().join("uploads"), 32).unwrap_err();
        assert!(matches!(err, NicheError::InvalidInput(_)));
    }

    #[test]
    fn stores_under_fixed_name_and_clears_stale_variant() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        fs::write(upload_path(&uploads, "xls"), b"old").unwrap();

        let src = dir.path().join("Dryer Niche.XLSX");
        fs::write(&src, b"new").unwrap();
        let dest = store_upload(&src, &uploads, 1024).unwrap();

        assert_eq!(dest, uploads.join("niche_file.xlsx"));
        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert!(!upload_path(&uploads, "xls").exists());
        assert_eq!(find_upload(&uploads), Some(dest));
    }

    #[test]
    fn restoring_the_stored_upload_keeps_its_contents() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        let stored = upload_path(&uploads, "xlsx");
        fs::write(&stored, b"0123456789").unwrap();
        fs::write(upload_path(&uploads, "xls"), b"old").unwrap();

        let dest = store_upload(&stored, &uploads, 1024).unwrap();
        assert_eq!(dest, stored);
        assert_eq!(fs::read(&stored).unwrap(), b"0123456789");
        assert!(!upload_path(&uploads, "xls").exists());
    }

    #[test]
    fn find_upload_none_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_upload(dir.path()), None);
    }
}
