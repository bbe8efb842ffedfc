use tracing_subscriber::EnvFilter;

use crate::vars::TEMPSWEEP_LOG;

// 诊断日志写入 stderr，stdout 只留给报告
pub fn init() {
    let filter = EnvFilter::try_new(*TEMPSWEEP_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
