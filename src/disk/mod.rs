pub mod block_device;
pub mod chs;
pub mod error;
pub mod image;
pub mod init;
pub mod types;
pub mod virtual_disk;

pub use block_device::BlockDevice;
pub use chs::Chs;
pub use error::{DiskError, Result};
pub use types::*;
pub use virtual_disk::{TailFill, VirtualDisk};
