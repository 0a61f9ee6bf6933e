//! Logging macros
//!
//! - `embedded`: forwards to `defmt`
//! - host unit tests: `println!`
//! - host otherwise: no-op
//!
//! Keep arguments to integers and string slices so both back ends accept
//! the same format string.

/// Log at info level
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[INFO] {}", format!($($arg)*));
    }};
}

/// Log at warn level
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[WARN] {}", format!($($arg)*));
    }};
}

/// Log at debug level
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[DEBUG] {}", format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_shared_format() {
        let frames: u32 = 3;
        crate::log_info!("Sent (frames={}, joins={})", frames, 1u8);
        crate::log_warn!("Outbound queue full, {} frames dropped", frames);
        crate::log_debug!("Key {}", "A");
    }
}
