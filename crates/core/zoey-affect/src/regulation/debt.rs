//! Emotion debt model
//!
//! Two independent non-linear mappings over the debt scalar:
//! - [`DebtModel::accumulate`] grows raw debt with a saturating law
//! - [`DebtModel::display`] re-expresses raw debt on a breakdown curve for
//!   comparison against burst tiers

use crate::types::clamp_feedback;

/// Saturation point of debt growth
pub const DEBT_SATURATION: f64 = 5.0;

/// Base growth rate per turn
pub const DEBT_GROWTH_RATE: f64 = 0.5;

/// Stateless debt mappings
#[derive(Debug, Clone, Copy, Default)]
pub struct DebtModel;

impl DebtModel {
    /// Accumulate one turn of feedback into raw debt.
    ///
    /// `d + (1 - d/θ) · α · (0.5 + |f|)`. Growth depends on feedback
    /// magnitude only, so a strongly positive turn raises debt as much as a
    /// strongly negative one.
    pub fn accumulate(current_debt: f64, feedback: f64) -> f64 {
        let debt = sanitize_debt(current_debt);
        let intensity = 0.5 + clamp_feedback(feedback).abs();
        let next = debt + (1.0 - debt / DEBT_SATURATION) * DEBT_GROWTH_RATE * intensity;
        next.max(0.0)
    }

    /// Map raw debt onto the breakdown curve.
    ///
    /// Identity up to 1.0, a 20% steeper slope up to 3.0, quadratic growth
    /// beyond. Never below the raw value. Each segment is anchored on the
    /// raw value, so the curve is not continuous at 3.0.
    pub fn display(raw_debt: f64) -> f64 {
        let debt = sanitize_debt(raw_debt);
        if debt <= 1.0 {
            debt
        } else if debt <= 3.0 {
            debt + 0.2 * (debt - 1.0)
        } else {
            debt + 0.5 * (debt - 3.0).powi(2)
        }
    }
}

fn sanitize_debt(debt: f64) -> f64 {
    if debt.is_nan() {
        0.0
    } else {
        debt.max(0.0)
    }
}
