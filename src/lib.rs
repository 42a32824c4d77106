//! 内存中的 1.44MB 虚拟软盘：按扇区/磁道/柱面寻址，可与平铺的镜像文件互相转换。

pub mod config;
pub mod disk;
