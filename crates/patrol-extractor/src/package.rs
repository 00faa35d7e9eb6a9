//! ZIP-based document packages (OOXML and OpenDocument)

use crate::error::ExtractError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// Magic bytes of an OLE compound file
///
/// Password protected OOXML documents are stored inside an OLE container
/// rather than a ZIP archive.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// An opened document package
pub(crate) struct Package {
    archive: ZipArchive<BufReader<File>>,
}

impl Package {
    /// Open a package, reporting OLE-wrapped files as encrypted
    pub(crate) fn open(path: &Path) -> Result<Self, ExtractError> {
        let mut file = File::open(path)?;
        let mut magic = [0u8; 8];
        let read = file.read(&mut magic)?;
        if read == magic.len() && magic == OLE_MAGIC {
            return Err(ExtractError::Encrypted(path.display().to_string()));
        }
        drop(file);

        let archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
        Ok(Self { archive })
    }

    /// Names of all entries in the package
    pub(crate) fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Whether the package contains `name`
    pub(crate) fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read an entry fully into memory
    pub(crate) fn read(&mut self, name: &str) -> Result<Vec<u8>, ExtractError> {
        let mut entry = self.archive.by_name(name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ole_container_is_encrypted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.docx");
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(Package::open(&path), Err(ExtractError::Encrypted(_))));
    }

    #[test]
    fn test_not_a_zip_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        assert!(matches!(Package::open(&path), Err(ExtractError::Archive(_))));
    }

    #[test]
    fn test_missing_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_package(dir.path(), "a.zip", &[("one.xml", "<a/>")]);
        let mut package = Package::open(&path).unwrap();

        assert!(package.has_part("one.xml"));
        assert!(!package.has_part("two.xml"));
        assert!(matches!(package.read("two.xml"), Err(ExtractError::MissingPart(_))));
        assert_eq!(package.read("one.xml").unwrap(), b"<a/>");
    }
}
