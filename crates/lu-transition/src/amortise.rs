//! Annuity amortisation of upfront costs.
//!
//!   payment = principal · rate / (1 − (1 + rate)^−n)
//!
//! A zero rate degenerates to straight-line `principal / n`.  The
//! settings-aware helpers leave costs as one-off payments when
//! `economics.amortise_upfront_costs` is off.

use ndarray::{ArrayBase, DataMut, Dimension};

use lu_core::EconomicSettings;

/// Annual payment per unit of principal.
pub fn annuity_factor(rate: f64, period: u32) -> f64 {
    let n = f64::from(period.max(1));
    if rate == 0.0 {
        return 1.0 / n;
    }
    rate / (1.0 - (1.0 + rate).powf(-n))
}

/// Annual payment that repays `principal` over `period` years at `rate`.
#[inline]
pub fn amortise(principal: f64, rate: f64, period: u32) -> f64 {
    principal * annuity_factor(rate, period)
}

/// Per-unit payment factor under the run's economics: the annuity factor,
/// or 1 when upfront costs are charged as one-off payments.
pub fn payment_factor(economics: &EconomicSettings) -> f64 {
    if economics.amortise_upfront_costs {
        annuity_factor(economics.discount_rate, economics.amortisation_period)
    } else {
        1.0
    }
}

/// Amortise with the run's discount rate and period.
#[inline]
pub fn amortise_with(principal: f64, economics: &EconomicSettings) -> f64 {
    principal * payment_factor(economics)
}

/// [`amortise_with`] on every element in place.  NaN stays NaN.
pub fn amortise_inplace<S, D>(a: &mut ArrayBase<S, D>, economics: &EconomicSettings)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    let f = payment_factor(economics);
    a.mapv_inplace(|p| p * f);
}
