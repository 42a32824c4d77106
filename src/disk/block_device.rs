use crate::disk::{error::Result, types::Sector};

/// 按线性块号读写的块设备接口，供上层文件系统使用。
///
/// 块号按规范顺序编号（见 `Chs::index`），不经过游标。
pub trait BlockDevice {
    fn block_count(&self) -> u64;
    fn read_block(&self, block_id: u64, buf: &mut Sector) -> Result<()>;
    fn write_block(&mut self, block_id: u64, buf: &Sector) -> Result<()>;
}
