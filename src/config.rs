/// 未指定镜像路径时使用的软盘镜像文件
pub const DEFAULT_IMAGE_PATH: &str = "floppy.img";

/// 历史记录文件名（放在用户主目录下）
pub const HISTORY_FILE: &str = ".vfloppy_history";

/// 保留的历史命令条数
pub const HISTORY_SIZE: usize = 100;

/// 未设置 RUST_LOG 时的日志级别
pub const DEFAULT_LOG_FILTER: &str = "warn";
