use serde::{Deserialize, Serialize};

/// One file as reported by the archive scanner.
///
/// Separators are normalised to `/` and a leading drive prefix (`Z:`) is
/// dropped, so `Z:\WSOP\2003\WSOP_2003-01.mxf` and `WSOP/2003/WSOP_2003-01.mxf`
/// produce identical records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPathRecord {
    pub full_path: String,
    pub filename: String,
    pub directory_parts: Vec<String>,
    pub size_bytes: u64,
    pub extension: Option<String>,
}

impl RawPathRecord {
    pub fn new(path: &str, size_bytes: u64) -> Self {
        let normalized = path.replace('\\', "/");
        let without_drive = strip_drive_prefix(&normalized);

        let mut segments: Vec<String> = without_drive
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let filename = segments.pop().unwrap_or_default();
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty());

        let full_path = if segments.is_empty() {
            filename.clone()
        } else {
            format!("{}/{}", segments.join("/"), filename)
        };

        Self {
            full_path,
            filename,
            directory_parts: segments,
            size_bytes,
            extension,
        }
    }

    /// Filename without its extension.
    pub fn stem(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.filename,
        }
    }
}

fn strip_drive_prefix(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        &path[2..]
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_path_is_normalized() {
        let record = RawPathRecord::new(r"Z:\WSOP\WSOP 2003\Main Event\WSOP_2003-01.mxf", 10);
        assert_eq!(record.full_path, "WSOP/WSOP 2003/Main Event/WSOP_2003-01.mxf");
        assert_eq!(record.filename, "WSOP_2003-01.mxf");
        assert_eq!(
            record.directory_parts,
            vec!["WSOP", "WSOP 2003", "Main Event"]
        );
        assert_eq!(record.extension.as_deref(), Some("mxf"));
        assert_eq!(record.stem(), "WSOP_2003-01");
    }

    #[test]
    fn test_bare_filename_has_no_directories() {
        let record = RawPathRecord::new("IMG_0001.MP4", 0);
        assert!(record.directory_parts.is_empty());
        assert_eq!(record.full_path, "IMG_0001.MP4");
        assert_eq!(record.extension.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_empty_path() {
        let record = RawPathRecord::new("", 0);
        assert_eq!(record.full_path, "");
        assert_eq!(record.filename, "");
        assert!(record.extension.is_none());
    }
}
