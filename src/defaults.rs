//! Default constants for lag-order selection and fitting.

pub const DEFAULT_MAX_AR: usize = 4;
pub const DEFAULT_MAX_DL: usize = 4;
pub const DEFAULT_CANDIDATE_CAP: usize = 100_000;
pub const COEFF_EPS: f64 = 1e-12;
