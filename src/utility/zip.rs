use std::io::{self, Read};

use anyhow::{ensure, Context, Result};
use zip::ZipArchive;

/// 日本郵便が配布している ken_all.zip
pub struct KenAllArchive<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + io::Seek> KenAllArchive<R> {
    pub fn new(reader: R) -> Result<KenAllArchive<R>> {
        let archive = ZipArchive::new(reader).context("Failed to open")?;
        Ok(KenAllArchive { archive })
    }

    /// 中に 1 つだけ入っている .csv を読む
    pub fn read_csv_bytes(&mut self) -> Result<Vec<u8>> {
        let mut csv_bytes = None;

        for i in 0..self.archive.len() {
            let mut entry = self
                .archive
                .by_index(i)
                .with_context(|| format!("Failed to open at {}", i))?;

            if !entry.name().to_lowercase().ends_with(".csv") {
                continue;
            }

            ensure!(csv_bytes.is_none(), ".csv file exists more than 1");

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .with_context(|| format!("Failed to read {}", entry.name()))?;
            csv_bytes = Some(data);
        }

        csv_bytes.context(".csv file is not found")
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::FileOptions;

    use super::*;

    fn archive(files: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_read_csv_bytes() {
        let mut archive =
            KenAllArchive::new(archive(&[("readme.txt", "x"), ("KEN_ALL.CSV", "a,b")])).unwrap();
        assert_eq!(archive.read_csv_bytes().unwrap(), b"a,b");
    }

    #[test]
    fn test_no_csv() {
        let mut archive = KenAllArchive::new(archive(&[("readme.txt", "x")])).unwrap();
        assert!(archive.read_csv_bytes().is_err());
    }

    #[test]
    fn test_two_csv() {
        let mut archive =
            KenAllArchive::new(archive(&[("a.csv", "a"), ("b.csv", "b")])).unwrap();
        assert!(archive.read_csv_bytes().is_err());
    }
}
