//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it holds the layered config loader and a
//! prelude of the types nearly every slice touches.
//!
//! ## Config loading
//! ```rust,no_run
//! use hearth_kernel::config::load_config;
//! use hearth_kernel::domain::HubConfig;
//!
//! let cfg: HubConfig = load_config(None::<&str>).unwrap();
//! ```

pub mod config;
pub mod prelude;

pub use hearth_domain as domain;
