//! Compile-time defaults, generated by build.rs.
//!
//! Override at build time with `RINGPOOL_CONFIG_RS=/path/to/defaults.rs`.

include!(concat!(env!("OUT_DIR"), "/ringpool_defaults.rs"));
