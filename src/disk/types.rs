/// 每个扇区（Sector）的大小：512 字节
/// 软盘以扇区为最小读写单位。
pub const SECTOR_SIZE: usize = 512;

/// 每个磁道包含的扇区数
pub const SECTORS_PER_TRACK: usize = 18;

/// 每个柱面包含的磁道数
pub const TRACKS_PER_CYLINDER: usize = 80;

/// 柱面数
pub const CYLINDER_COUNT: usize = 2;

/// 整张软盘的扇区总数：2 * 80 * 18 = 2880
pub const SECTOR_TOTAL: usize = CYLINDER_COUNT * TRACKS_PER_CYLINDER * SECTORS_PER_TRACK;

/// 虚拟软盘总大小（单位：字节），即 1.44MB 镜像文件的长度。
pub const DISK_SIZE: u64 = (SECTOR_SIZE * SECTOR_TOTAL) as u64;

/// 一个扇区的数据
pub type Sector = [u8; SECTOR_SIZE];
