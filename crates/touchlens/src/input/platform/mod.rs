//! Platform adapters feeding touch notifications into the overlay.

pub mod winit;
