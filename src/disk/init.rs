use std::{path::PathBuf, sync::mpsc::Sender};

use crate::disk::{error::DiskError, virtual_disk::VirtualDisk};

/// 启动过程中发给界面的进度消息
#[derive(Debug)]
pub enum BootProgress {
    Step(&'static str),
    Progress(u64),
    Finished(Result<VirtualDisk, DiskError>),
}

/// 打开或新建软盘镜像。
///
/// 镜像存在则加载；不存在则新建一张空盘并立即写出，保证之后 `load` 总能成功。
/// 接收端已经关闭时静默结束。
pub fn perform_disk_initialization(path: PathBuf, tx: Sender<BootProgress>) {
    let _ = tx.send(BootProgress::Step("🧠 Initializing virtual disk..."));
    let _ = tx.send(BootProgress::Progress(0));

    let result = if path.exists() {
        let _ = tx.send(BootProgress::Step("💾 Loading floppy image..."));
        VirtualDisk::open(&path)
    } else {
        let _ = tx.send(BootProgress::Step(
            "🪶 No image found, creating a blank floppy...",
        ));
        let mut disk = VirtualDisk::new();
        disk.save(&path).map(|_| disk)
    };

    if result.is_ok() {
        let _ = tx.send(BootProgress::Progress(100));
    }
    let _ = tx.send(BootProgress::Finished(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::types::{DISK_SIZE, SECTOR_SIZE};
    use std::sync::mpsc;

    fn run(path: PathBuf) -> Vec<BootProgress> {
        let (tx, rx) = mpsc::channel();
        perform_disk_initialization(path, tx);
        rx.into_iter().collect()
    }

    #[test]
    fn creates_blank_image_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floppy.img");

        let messages = run(path.clone());

        match messages.last() {
            Some(BootProgress::Finished(Ok(disk))) => assert_eq!(disk.used_sectors(), 0),
            other => panic!("unexpected final message: {other:?}"),
        }
        assert_eq!(std::fs::metadata(&path).unwrap().len(), DISK_SIZE);
    }

    #[test]
    fn loads_existing_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floppy.img");
        std::fs::write(&path, vec![0x5A; SECTOR_SIZE]).unwrap();

        let messages = run(path);

        assert!(messages
            .iter()
            .any(|m| matches!(m, BootProgress::Progress(100))));
        match messages.last() {
            Some(BootProgress::Finished(Ok(disk))) => assert_eq!(disk.used_sectors(), 1),
            other => panic!("unexpected final message: {other:?}"),
        }
    }

    #[test]
    fn reports_failure_when_image_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir/floppy.img");

        let messages = run(path);

        assert!(matches!(
            messages.last(),
            Some(BootProgress::Finished(Err(DiskError::Io { .. })))
        ));
    }
}
