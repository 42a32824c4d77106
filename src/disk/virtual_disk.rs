use std::{fmt, path::Path};

use crate::disk::{
    block_device::BlockDevice,
    chs::Chs,
    error::{DiskError, Result},
    image::{read_image, write_image},
    types::{Sector, DISK_SIZE, SECTOR_SIZE, SECTOR_TOTAL},
};

/// 扇区只被写入一部分时，剩余字节的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailFill {
    /// 保留扇区尾部原有字节
    #[default]
    Preserve,
    /// 尾部清零
    Zero,
}

/// 内存中的 1.44MB 虚拟软盘。
///
/// 镜像按规范顺序平铺存放：第 n 个槽位就是从原点开始推进 n 次到达的扇区，
/// 因此保存时的文件布局与内存布局一致。
///
/// 设备没有内部同步，修改都需要 `&mut self`；需要共享访问时由调用方自己加锁。
#[derive(Clone)]
pub struct VirtualDisk {
    sectors: Vec<Sector>,
    cursor: Chs,
    tail_fill: TailFill,
}

impl VirtualDisk {
    pub fn new() -> Self {
        Self {
            sectors: vec![[0u8; SECTOR_SIZE]; SECTOR_TOTAL],
            cursor: Chs::ORIGIN,
            tail_fill: TailFill::default(),
        }
    }

    /// 新建一张空盘并从镜像文件加载
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut disk = Self::new();
        disk.load(path)?;
        Ok(disk)
    }

    pub fn with_tail_fill(mut self, tail_fill: TailFill) -> Self {
        self.tail_fill = tail_fill;
        self
    }

    pub fn tail_fill(&self) -> TailFill {
        self.tail_fill
    }

    pub fn cursor(&self) -> Chs {
        self.cursor
    }

    pub fn sector(&self, pos: Chs) -> &Sector {
        &self.sectors[pos.index()]
    }

    /// 含有非零字节的扇区个数
    pub fn used_sectors(&self) -> usize {
        self.sectors
            .iter()
            .filter(|s| s.iter().any(|&b| b != 0))
            .count()
    }

    /// 整盘清零，游标回到原点
    pub fn reset(&mut self) {
        for sector in &mut self.sectors {
            sector.fill(0);
        }
        self.cursor = Chs::ORIGIN;
        log::debug!("virtual disk reset");
    }

    pub fn seek_cylinder(&mut self, cylinder: i64) -> Chs {
        self.cursor = self.cursor.with_cylinder(cylinder);
        self.cursor
    }

    pub fn seek_track(&mut self, track: i64) -> Chs {
        self.cursor = self.cursor.with_track(track);
        self.cursor
    }

    pub fn seek_sector(&mut self, sector: i64) -> Chs {
        self.cursor = self.cursor.with_sector(sector);
        self.cursor
    }

    /// 依次截断柱面、磁道、扇区，返回最终位置
    pub fn seek(&mut self, sector: i64, track: i64, cylinder: i64) -> Chs {
        self.seek_cylinder(cylinder);
        self.seek_track(track);
        self.seek_sector(sector)
    }

    /// 从指定位置连续读取 `count` 个扇区（至少 1 个），游标停在最后一个扇区之后。
    ///
    /// `count` 超过整盘扇区数时会绕回原点继续读。
    pub fn read(&mut self, sector: i64, track: i64, cylinder: i64, count: usize) -> Vec<u8> {
        let start = self.seek(sector, track, cylinder);
        self.read_at(start, count)
    }

    /// 与 `read` 相同，但起点是已经截断好的 `Chs`
    pub fn read_at(&mut self, start: Chs, count: usize) -> Vec<u8> {
        let (buf, next) = self.read_from(start, count);
        self.cursor = next;
        buf
    }

    /// 从 `start` 读取 `count` 个扇区（至少 1 个），返回数据和最后一个扇区之后的位置，不改动游标。
    ///
    /// # Panics
    ///
    /// `count * SECTOR_SIZE` 超出 `usize` 时 panic。
    pub fn read_from(&self, start: Chs, count: usize) -> (Vec<u8>, Chs) {
        let count = count.max(1);
        let len = count
            .checked_mul(SECTOR_SIZE)
            .unwrap_or_else(|| panic!("reading {count} sectors overflows usize"));
        let mut buf = Vec::with_capacity(len);
        let mut pos = start;
        for _ in 0..count {
            buf.extend_from_slice(&self.sectors[pos.index()]);
            pos = pos.advance();
        }
        (buf, pos)
    }

    /// 从指定位置写入数据。
    ///
    /// 整扇区依次写入；不足一个扇区的尾部写进下一个扇区的开头，
    /// 该扇区剩余字节按 `TailFill` 处理，游标停在这个扇区上。
    pub fn write(&mut self, data: &[u8], sector: i64, track: i64, cylinder: i64) {
        let start = self.seek(sector, track, cylinder);
        self.write_at(start, data);
    }

    /// 与 `write` 相同，但起点是已经截断好的 `Chs`
    pub fn write_at(&mut self, start: Chs, data: &[u8]) {
        self.cursor = self.write_from(start, data);
    }

    /// 从 `start` 写入 `data`，返回写完后的位置（最后一个整扇区之后，或停在尾部扇区上），不改动游标。
    pub fn write_from(&mut self, start: Chs, data: &[u8]) -> Chs {
        let mut pos = start;
        let mut chunks = data.chunks_exact(SECTOR_SIZE);
        for chunk in &mut chunks {
            self.sectors[pos.index()].copy_from_slice(chunk);
            pos = pos.advance();
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            let sector = &mut self.sectors[pos.index()];
            sector[..tail.len()].copy_from_slice(tail);
            if self.tail_fill == TailFill::Zero {
                sector[tail.len()..].fill(0);
            }
        }
        pos
    }

    /// 清空整盘后从原点开始装入 `bytes`
    pub fn load_bytes(&mut self, bytes: &[u8]) {
        self.reset();
        self.cursor = self.write_from(Chs::ORIGIN, bytes);
    }

    /// 从镜像文件加载。文件读取失败时返回错误，内存中的镜像保持不变。
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = read_image(path)?;
        if bytes.len() as u64 != DISK_SIZE {
            log::warn!(
                "{} is {} bytes, expected {}",
                path.display(),
                bytes.len(),
                DISK_SIZE
            );
        }
        self.load_bytes(&bytes);
        log::debug!("loaded {}", path.display());
        Ok(())
    }

    /// 按规范顺序把整盘写到文件，游标绕一圈回到原点。
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DiskError::InvalidArgument(
                "save path must not be empty".to_string(),
            ));
        }
        let bytes = self.read(1, 0, 0, SECTOR_TOTAL);
        write_image(path, &bytes)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    fn slot(&self, block_id: u64) -> Result<usize> {
        if block_id >= self.block_count() {
            return Err(DiskError::BlockOutOfRange {
                block: block_id,
                total: self.block_count(),
            });
        }
        Ok(block_id as usize)
    }
}

impl Default for VirtualDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VirtualDisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualDisk")
            .field("cursor", &self.cursor)
            .field("tail_fill", &self.tail_fill)
            .field("used_sectors", &self.used_sectors())
            .finish()
    }
}

impl BlockDevice for VirtualDisk {
    fn block_count(&self) -> u64 {
        SECTOR_TOTAL as u64
    }

    fn read_block(&self, block_id: u64, buf: &mut Sector) -> Result<()> {
        let slot = self.slot(block_id)?;
        buf.copy_from_slice(&self.sectors[slot]);
        Ok(())
    }

    fn write_block(&mut self, block_id: u64, buf: &Sector) -> Result<()> {
        let slot = self.slot(block_id)?;
        self.sectors[slot].copy_from_slice(buf);
        Ok(())
    }
}
