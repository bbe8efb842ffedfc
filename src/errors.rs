use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

// 文件删除失败和无法读取的目录不会走到这里，它们记录在清理结果中
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // 无法读取文件元数据（文件消失除外）
    #[error("failed to inspect file {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
    // 内部通用错误
    #[error("internal error: {0}")]
    Internal(String),
    // 包装 std::io::Error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[macro_export]
macro_rules! fail {
    ($msg:expr) => {
        $crate::errors::Error::Internal(format!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::Error::Internal(format!($fmt, $($arg)*))
    };
}
