//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `liftlog_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("liftlog_core version={}", liftlog_core::core_version());

    match liftlog_core::db::open_db_in_memory() {
        Ok(_conn) => println!(
            "liftlog_core schema_version={}",
            liftlog_core::db::migrations::latest_version()
        ),
        Err(err) => eprintln!("liftlog_core db_open failed: {err}"),
    }
}
