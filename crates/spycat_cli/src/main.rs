//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `spycat_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("spycat_core ping={}", spycat_core::ping());
    println!("spycat_core version={}", spycat_core::core_version());
}
