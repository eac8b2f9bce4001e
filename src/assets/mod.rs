//! Untrusted artwork intake: sniffing, SVG sanitizing, decoding, validation, and the
//! single-owner handles that keep validated artwork alive.

pub mod decode;
pub mod handle;
pub mod sanitize;
pub mod sniff;
pub mod validate;
