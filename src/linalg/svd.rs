//! Singular value decomposition via Jacobi eigen-iteration.
//!
//! The decomposition is computed from the symmetric eigen-problem of the
//! smaller Gram matrix (`AᵗA` when the input is tall, `AAᵗ` when it is
//! wide): eigenvalues are the squared singular values and eigenvectors one
//! orthogonal factor; the other factor follows as `A v / σ` (resp.
//! `Aᵗ u / σ`). The inputs here are small fixed-size patches, where cyclic
//! Jacobi sweeps are simple, accurate and deterministic.
//!
//! Singular values below [`RANK_TOL`] relative to the largest one are
//! stored as exact zeros and their derived vectors replaced by a
//! Gram-Schmidt orthogonal completion, so both factors always remain full
//! orthonormal bases.
//!
//! Sign convention: the largest-magnitude component of every right singular
//! vector is forced positive (lowest index wins ties), with the paired left
//! vector flipped alongside. SVD signs are otherwise arbitrary; pinning
//! them keeps results reproducible across runs and platforms.

use crate::error::{Result, TamperError};
use nalgebra::{DMatrix, DVector};

/// Maximum number of cyclic Jacobi sweeps before giving up.
pub const MAX_SWEEPS: usize = 64;
/// Relative off-diagonal norm at which the eigen-iteration is converged.
pub const CONV_TOL: f64 = 1e-14;
/// Singular values below this fraction of the largest one are zeroed.
pub const RANK_TOL: f64 = 1e-6;

/// Thin SVD of an `n × m` matrix: `a ≈ u * diag(s) * v_t` with `u` of size
/// `n × k`, `s` of length `k = min(n, m)` sorted descending, and `v_t` of
/// size `k × m`.
#[derive(Clone, Debug, PartialEq)]
pub struct Svd {
    pub u: DMatrix<f64>,
    pub s: DVector<f64>,
    pub v_t: DMatrix<f64>,
}

impl Svd {
    /// Reconstruct `u * diag(s) * v_t`.
    pub fn reconstruct(&self) -> DMatrix<f64> {
        let mut scaled = self.v_t.clone();
        for i in 0..self.s.len() {
            let mut row = scaled.row_mut(i);
            row *= self.s[i];
        }
        &self.u * scaled
    }
}

/// Decompose a matrix into its thin SVD.
///
/// Fails with `InvalidDimensions` on empty input and `ConvergenceFailure`
/// when the Jacobi iteration does not reach tolerance within
/// [`MAX_SWEEPS`] sweeps.
pub fn decompose_svd(a: &DMatrix<f64>) -> Result<Svd> {
    let (n, m) = (a.nrows(), a.ncols());
    if n == 0 || m == 0 {
        return Err(TamperError::InvalidDimensions(format!(
            "cannot decompose empty {n} x {m} matrix"
        )));
    }

    if m <= n {
        // Gram matrix AᵗA gives the right singular vectors directly.
        let gram = a.transpose() * a;
        let (eigvals, eigvecs) = jacobi_eigen(&gram)?;
        let order = descending_order(&eigvals);
        let cutoff = zero_cutoff(&eigvals, &order);

        let k = m;
        let mut s = DVector::zeros(k);
        let mut v = DMatrix::zeros(m, k);
        let mut u = DMatrix::zeros(n, k);
        for (col, &src) in order.iter().enumerate() {
            let sigma = eigvals[src].max(0.0).sqrt();
            let mut vi = eigvecs.column(src).clone_owned();
            canonicalize_sign(&mut vi);
            v.set_column(col, &vi);
            if sigma > cutoff {
                s[col] = sigma;
                u.set_column(col, &((a * vi) / sigma));
            }
        }
        complete_zero_columns(&mut u, &s);
        Ok(Svd {
            u,
            s,
            v_t: v.transpose(),
        })
    } else {
        // Wide matrix: AAᵗ is smaller, yielding the left factor first.
        let gram = a * a.transpose();
        let (eigvals, eigvecs) = jacobi_eigen(&gram)?;
        let order = descending_order(&eigvals);
        let cutoff = zero_cutoff(&eigvals, &order);

        let k = n;
        let mut s = DVector::zeros(k);
        let mut u = DMatrix::zeros(n, k);
        let mut v = DMatrix::zeros(m, k);
        for (col, &src) in order.iter().enumerate() {
            let sigma = eigvals[src].max(0.0).sqrt();
            let ui = eigvecs.column(src).clone_owned();
            u.set_column(col, &ui);
            if sigma > cutoff {
                s[col] = sigma;
                let mut vi = (a.transpose() * u.column(col)) / sigma;
                if canonicalize_sign(&mut vi) {
                    u.column_mut(col).neg_mut();
                }
                v.set_column(col, &vi);
            } else {
                let mut ui = u.column(col).clone_owned();
                canonicalize_sign(&mut ui);
                u.set_column(col, &ui);
            }
        }
        complete_zero_columns(&mut v, &s);
        Ok(Svd {
            u,
            s,
            v_t: v.transpose(),
        })
    }
}

/// Absolute threshold below which a singular value counts as zero, derived
/// from the largest eigenvalue of the Gram matrix.
fn zero_cutoff(eigvals: &DVector<f64>, order: &[usize]) -> f64 {
    let largest = eigvals[order[0]].max(0.0).sqrt();
    RANK_TOL * largest
}

/// Truncated reconstruction from the `rank` leading singular triplets.
pub fn low_rank_approximation(a: &DMatrix<f64>, rank: usize) -> Result<DMatrix<f64>> {
    let svd = decompose_svd(a)?;
    let k = rank.min(svd.s.len());
    let mut out = DMatrix::zeros(a.nrows(), a.ncols());
    for i in 0..k {
        let outer = svd.u.column(i).clone_owned() * svd.v_t.row(i).clone_owned();
        out += outer * svd.s[i];
    }
    Ok(out)
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix. Returns the
/// eigenvalues (diagonal after convergence) and the accumulated rotation
/// matrix whose columns are the eigenvectors.
fn jacobi_eigen(sym: &DMatrix<f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
    let p = sym.nrows();
    let mut a = sym.clone();
    let mut v = DMatrix::identity(p, p);
    let scale = sym.norm().max(1.0);

    for _ in 0..MAX_SWEEPS {
        if off_diagonal_norm(&a) <= CONV_TOL * scale {
            return Ok((a.diagonal(), v));
        }
        for col in 0..p {
            for row in col + 1..p {
                rotate(&mut a, &mut v, col, row);
            }
        }
    }

    if off_diagonal_norm(&a) <= CONV_TOL * scale {
        return Ok((a.diagonal(), v));
    }
    Err(TamperError::ConvergenceFailure { sweeps: MAX_SWEEPS })
}

fn off_diagonal_norm(a: &DMatrix<f64>) -> f64 {
    let p = a.nrows();
    let mut acc = 0.0;
    for i in 0..p {
        for j in 0..p {
            if i != j {
                acc += a[(i, j)] * a[(i, j)];
            }
        }
    }
    acc.sqrt()
}

/// Annihilate `a[(p, q)]` with a two-sided rotation in the (p, q) plane,
/// accumulating the rotation into `v`.
fn rotate(a: &mut DMatrix<f64>, v: &mut DMatrix<f64>, p: usize, q: usize) {
    let apq = a[(p, q)];
    if apq == 0.0 {
        return;
    }
    let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;
    let n = a.nrows();

    // Column update: A ← A·G.
    for k in 0..n {
        let akp = a[(k, p)];
        let akq = a[(k, q)];
        a[(k, p)] = c * akp - s * akq;
        a[(k, q)] = s * akp + c * akq;
    }
    // Row update: A ← Gᵗ·A.
    for k in 0..n {
        let apk = a[(p, k)];
        let aqk = a[(q, k)];
        a[(p, k)] = c * apk - s * aqk;
        a[(q, k)] = s * apk + c * aqk;
    }
    // Eigenvector accumulation: V ← V·G.
    for k in 0..n {
        let vkp = v[(k, p)];
        let vkq = v[(k, q)];
        v[(k, p)] = c * vkp - s * vkq;
        v[(k, q)] = s * vkp + c * vkq;
    }
}

fn descending_order(eigvals: &DVector<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..eigvals.len()).collect();
    order.sort_by(|&a, &b| eigvals[b].partial_cmp(&eigvals[a]).expect("finite eigenvalues"));
    order
}

/// Force the largest-magnitude component positive; lowest index wins ties.
/// Returns true when the vector was flipped.
fn canonicalize_sign(vec: &mut DVector<f64>) -> bool {
    let mut lead = 0;
    let mut lead_mag = 0.0;
    for (i, &x) in vec.iter().enumerate() {
        if x.abs() > lead_mag {
            lead_mag = x.abs();
            lead = i;
        }
    }
    if vec[lead] < 0.0 {
        vec.neg_mut();
        true
    } else {
        false
    }
}

/// Replace the columns paired with zero singular values by unit vectors
/// orthogonal to everything already placed, so the factor stays a full
/// orthonormal basis.
fn complete_zero_columns(factor: &mut DMatrix<f64>, s: &DVector<f64>) {
    let dim = factor.nrows();
    for col in 0..s.len() {
        if s[col] > 0.0 {
            continue;
        }
        let mut candidate = None;
        for basis in 0..dim {
            let mut e = DVector::zeros(dim);
            e[basis] = 1.0;
            // Project out every column fixed so far.
            for prior in 0..col {
                let proj = factor.column(prior).dot(&e);
                e -= factor.column(prior) * proj;
            }
            let norm = e.norm();
            if norm > 1e-6 {
                e /= norm;
                canonicalize_sign(&mut e);
                candidate = Some(e);
                break;
            }
        }
        if let Some(e) = candidate {
            factor.set_column(col, &e);
        }
    }
}
