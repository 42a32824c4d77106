use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use crate::disk::error::{DiskError, Result};

/// 把整个镜像文件读入内存
pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| DiskError::io(path, e))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// 写出镜像文件：不存在则创建，存在则截断后覆盖
pub fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| DiskError::io(path, e))?;

    file.write_all(bytes).map_err(|e| DiskError::io(path, e))?;
    file.flush().map_err(|e| DiskError::io(path, e))?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.img");
        fs::write(&path, vec![0xFF; 4096]).unwrap();

        write_image(&path, &[1, 2, 3]).unwrap();

        assert_eq!(read_image(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.img");

        match read_image(&path) {
            Err(DiskError::Io { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/disk.img");
        assert!(matches!(
            write_image(&path, &[0; 512]),
            Err(DiskError::Io { .. })
        ));
    }
}
