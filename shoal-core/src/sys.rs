//! Platform abstraction facilities.

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        pub(crate) mod fs;
        pub(crate) mod pipes;
        pub(crate) mod process;
        pub(crate) mod signal;
    } else {
        compile_error!("shoal requires a POSIX platform");
    }
}
