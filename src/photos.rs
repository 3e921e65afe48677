/// Photo discovery on the local disk
///
/// Used for bulk imports: a folder is walked recursively and every file
/// that looks like a supported image is collected, in file-name order.

use image::ImageFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Formats the server can process
const SUPPORTED: [ImageFormat; 6] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Gif,
];

/// Extensions offered in the native file picker
pub const PICKER_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff", "gif"];

/// Whether the file extension names a supported image format
pub fn is_photo(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| SUPPORTED.contains(&format))
}

/// All photos below `folder`, sorted by path
pub fn collect_photos(folder: &Path) -> Vec<PathBuf> {
    let photos: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_photo(path))
        .collect();

    tracing::info!("found {} photos in {}", photos.len(), folder.display());
    photos
}

/// [`collect_photos`] on the blocking pool
pub async fn collect_photos_async(folder: PathBuf) -> Vec<PathBuf> {
    tokio::task::spawn_blocking(move || collect_photos(&folder))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("photo scan failed: {e}");
            Vec::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_photo() {
        assert!(is_photo(Path::new("site/IMG_0001.JPG")));
        assert!(is_photo(Path::new("a.jpeg")));
        assert!(is_photo(Path::new("b.png")));
        assert!(!is_photo(Path::new("report.docx")));
        assert!(!is_photo(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_photos_sorted_and_filtered() {
        let dir = std::env::temp_dir().join(format!("photo-report-scan-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("day2")).unwrap();
        for name in ["b.jpg", "a.png", "notes.txt", "day2/c.jpeg"] {
            fs::write(dir.join(name), b"x").unwrap();
        }

        let found: Vec<PathBuf> = collect_photos(&dir)
            .into_iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            [
                PathBuf::from("a.png"),
                PathBuf::from("b.jpg"),
                PathBuf::from("day2").join("c.jpeg"),
            ]
        );
        fs::remove_dir_all(&dir).unwrap();
    }
}
