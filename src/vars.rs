macro_rules! env_config {
    ($name:ident, $env_key:expr, $default:expr) => {
        paste::paste! {
            pub static [<TEMPSWEEP_ $name>]: ::std::sync::LazyLock<&'static str> = ::std::sync::LazyLock::new(|| {
                ::std::boxed::Box::leak(
                    ::std::env::var($env_key)
                        .unwrap_or_else(|_| $default.to_string())
                        .into_boxed_str()
                )
            });
        }
    };
    ($name:ident, $default:expr) => {
        env_config!($name, stringify!([<TEMPSWEEP_ $name>]), $default);
    };
}

// 为空时由可执行文件位置推导项目根目录
env_config!(PROJECT_ROOT, "");
env_config!(LOG, "warn");

/// Files older than this many days are swept.
pub const MAX_AGE_DAYS: i64 = 30;

/// Scratch directories, relative to the project root, in scan order.
pub const TEMP_DIRS: [&[&str]; 2] = [&["scripts", "temp"], &["api", "scripts", "temp"]];

// 清理时始终保留
pub const PRESERVED_FILE: &str = "README.md";

pub const PROGRAM: &str = env!("CARGO_PKG_NAME");
