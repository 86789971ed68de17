//! End-to-end runs of the `droidsweep` binary against a fake `adb` backed by a temp directory.

#[cfg(unix)]
mod operations;
#[cfg(unix)]
mod utils;

#[cfg(unix)]
pub use libtest_mimic::Trial;
#[cfg(unix)]
pub use utils::*;

#[cfg(unix)]
fn main() {
    use libtest_mimic::Arguments;

    let args = Arguments::from_args();

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut tests = Vec::new();
    operations::backup::tests(&mut tests);
    operations::delete::tests(&mut tests);
    operations::restore::tests(&mut tests);
    operations::sessions::tests(&mut tests);

    libtest_mimic::run(&args, tests).exit();
}

#[cfg(not(unix))]
fn main() {
    println!("droidsweep behavior tests need a POSIX shell; skipped");
}
