//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! `embassy-time` resolves its monotonic clock through the
//! `_embassy_time_now` symbol.  On device it is the ESP-IDF high-resolution
//! timer (µs since boot, matching the default 1 MHz tick rate).  Host
//! builds never read the global clock: tests construct `Instant`s directly.

#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    // SAFETY: read-only query of the monotonic system timer.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}
