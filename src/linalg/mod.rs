//! Dense numerical routines used by the recovery stage.
//!
//! Matrices are `nalgebra::DMatrix<f64>`; the systems solved here are small
//! (patch-sized), so the direct Gauss-Jordan solver and the Jacobi-based
//! SVD favour robustness and determinism over asymptotic speed. Neither
//! routine spawns work of its own; callers own the parallelism.

pub mod solve;
pub mod svd;

pub use solve::solve_linear_system;
pub use svd::{decompose_svd, low_rank_approximation, Svd};
