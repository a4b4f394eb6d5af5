//! # ardl
//!
//! A Rust library for autoregressive distributed lag (ARDL) modelling:
//! lag-design construction, information-criterion order selection, the
//! error-correction reparameterization, and the bounds test for a long-run
//! level relationship.
//!
//! The workflow has four steps, each usable on its own:
//!
//! * **Design**: stack deterministic terms and lagged regressors into an
//!   OLS-ready matrix with [`build_design`], fit it with [`fit_design`]
//! * **Select**: sweep lag orders and rank them by AIC or BIC with
//!   [`select_order`]
//! * **Reparameterize**: refit the chosen model in error-correction form
//!   with [`fit_uecm`] or [`uecm_from_model`]
//! * **Test**: check for a long-run level relationship with [`bounds_test`]
//!
//! ## Example
//!
//! ```
//! use ardl::{
//!     bounds_test, select_order, uecm_from_model, BoundsCase, ExogSeries,
//!     SelectConfig,
//! };
//!
//! // y follows x with one period of memory
//! let x: Vec<f64> = (0..60)
//!     .map(|i| (i as f64 * 0.9).sin() * 3.0 + 0.1 * i as f64)
//!     .collect();
//! let mut y = vec![20.0];
//! for t in 1..60 {
//!     y.push(10.0 + 0.5 * y[t - 1] + 0.8 * x[t] + 0.3 * x[t - 1] + (t as f64 * 7.3).sin() * 0.3);
//! }
//! let exog = vec![ExogSeries::new("x", x)];
//!
//! // Pick lag orders by BIC, up to 3 lags each
//! let selection = select_order(&y, &exog, &SelectConfig::new(3, vec![3])).unwrap();
//! println!("best: AR {:?}, score {:.3}", selection.best.ar_lags, selection.best.score);
//!
//! // Error-correction form of the winner, then the bounds test
//! let uecm = uecm_from_model(&y, &exog, &selection.model).unwrap();
//! let test = bounds_test(&uecm, BoundsCase::III).unwrap();
//! println!("F = {:.2}, long run: {:?}", test.f_stat, uecm.long_run);
//! ```

// Module declarations
pub mod bounds;
pub mod data;
mod defaults;
pub mod design;
mod ic;
pub mod ols;
mod select;
mod types;
pub mod uecm;

// Re-export public types
pub use types::{
    AdlSpec, ArdlError, BoundsCase, BoundsOutcome, BoundsTest, Candidate, Design, ExogSeries,
    FittedModel, IcKind, LagSpec, SelectConfig, Selection, Trend, UecmFit,
};

// Re-export main public functions
pub use bounds::{bounds_test, critical_values};
pub use design::build_design;
pub use ols::fit_design;
pub use select::select_order;
pub use uecm::{fit_uecm, uecm_from_model};
