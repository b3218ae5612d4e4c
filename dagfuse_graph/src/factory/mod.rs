//! Constructors for the dataflow CDAGs of common numerical kernels.
//!
//! These are conveniences for tests, demos and benchmark inputs; the MCIS
//! engines only ever see the resulting [`Graph`](crate::Graph)s.

mod dwt;
mod fft;
mod mvm;

pub use dwt::haar_wavelet_from_dimensions;
pub use fft::fft_from_dimensions;
pub use mvm::{mvm_from_dimensions, mvm_from_mat_vec};
