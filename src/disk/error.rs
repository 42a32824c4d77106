use std::path::PathBuf;

use thiserror::Error;

/// 虚拟软盘错误类型
#[derive(Debug, Error)]
pub enum DiskError {
    /// 镜像文件读写失败，带路径
    #[error("disk image I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 线性块号越界（CHS 地址只做截断，不会报这个错）
    #[error("block {block} out of range (device has {total} blocks)")]
    BlockOutOfRange { block: u64, total: u64 },
}

impl DiskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// 虚拟软盘统一结果类型
pub type Result<T> = std::result::Result<T, DiskError>;
