// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Color-encoded 3D point picking and two-point measurement.
//!
//! A pick recovers the world position under the cursor from color buffers
//! only: three off-screen passes write the visible surface's X, Y and Z as
//! 24-bit fixed-point micrometers, and the pixel under the cursor is decoded
//! on each of them. Two picks make a measurement.
//!
//! # Key entry points
//!
//! - [`measure::MeasureTool`] - the pick orchestrator and measurement state
//! - [`renderer::RenderBackend`] - the seam the passes draw through, with
//!   [`gpu::WgpuBackend`] and [`renderer::software::SoftwareBackend`]
//! - [`scene::Scene`] - the pickable nodes and active camera
//! - [`options::Options`] - picking, build plate and camera configuration
//!
//! # Encoding
//!
//! See [`codec`]: values are biased by 2^23 and split across R, G and B;
//! `0x000000` and `0xFFFFFF` mean "no surface" and decode to `None`.

pub mod camera;
pub mod codec;
pub mod error;
pub mod gpu;
pub mod input;
pub mod measure;
pub mod options;
pub mod renderer;
pub mod scene;
