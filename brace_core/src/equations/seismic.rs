//! NZS 1170.5 equivalent static method factors.
//!
//! ## Notation
//!
//! - `Z` = hazard factor, `Ru` = return period factor, `N` = near-fault factor
//! - `Rs` = SLS return period factor
//! - `μ` = structural ductility factor, `ζ` = damping ratio
//! - `T1` = fundamental period (s)

use crate::tables::seismic::SubsoilClass;

/// Upper limit on Z·Ru (NZS 1170.5 §3.1.1)
pub const Z_RU_MAX: f64 = 0.7;

/// Fraction of the base shear applied at the top level (NZS 1170.5 §6.2.1.3)
pub const TOP_FORCE_FRACTION: f64 = 0.08;

/// Fraction of the base shear distributed over the height
pub const DISTRIBUTED_FRACTION: f64 = 0.92;

/// `min(0.7, Z·Ru)`
#[inline]
pub fn capped_z_ru(z: f64, ru: f64) -> f64 {
    (z * ru).min(Z_RU_MAX)
}

/// Damping modification factor `Mζ = √(7 / (2 + 100ζ))`.
///
/// Equals 1.0 at 5 % damping.
#[inline]
pub fn damping_factor(zeta: f64) -> f64 {
    (7.0 / (2.0 + 100.0 * zeta)).sqrt()
}

/// Structural performance factor `Sp = 1.3 − 0.3μ` for `μ ≤ 2`, else 0.7.
#[inline]
pub fn performance_factor(mu: f64) -> f64 {
    if mu <= 2.0 {
        1.3 - 0.3 * mu
    } else {
        0.7
    }
}

/// Inelastic spectrum scaling factor `kμ`.
///
/// - `kμ = μ` for class E with `T1 ≥ 1.0`, or for `μ < 1.5`
/// - class E otherwise: `(μ − 1.5)·T1/0.7 + 1.5`
/// - classes A-D: `μ` for `T1 ≥ 0.7`, else `(μ − 1)·T1/0.7 + 1`
pub fn ductility_factor(mu: f64, t1: f64, class: SubsoilClass) -> f64 {
    let class_e = class == SubsoilClass::E;
    if (class_e && t1 >= 1.0) || mu < 1.5 {
        mu
    } else if class_e {
        (mu - 1.5) * t1 / 0.7 + 1.5
    } else if t1 >= 0.7 {
        mu
    } else {
        (mu - 1.0) * t1 / 0.7 + 1.0
    }
}

/// Horizontal design action coefficient `Cd(T1) = Mζ·C(T1)·Sp / kμ`, zero
/// when `kμ` is not positive.
#[inline]
pub fn design_coefficient(m_zeta: f64, ct: f64, sp: f64, k_mu: f64) -> f64 {
    if k_mu <= 0.0 {
        return 0.0;
    }
    m_zeta * ct * sp / k_mu
}

/// Live load area reduction `ψa = 0.3 + 3/√A`, 1.0 when `A` is not positive.
///
/// Not clamped to 1.0 for small areas.
#[inline]
pub fn area_reduction_factor(floor_area_m2: f64) -> f64 {
    if floor_area_m2 > 0.0 {
        0.3 + 3.0 / floor_area_m2.sqrt()
    } else {
        1.0
    }
}

/// Distributed part of the lateral force at one level,
/// `0.92·V·Wi·hi / Σ Wj·hj`, zero when the sum is zero.
#[inline]
pub fn distributed_force(base_shear: f64, wi_hi: f64, sum_wj_hj: f64) -> f64 {
    if sum_wj_hj > 0.0 {
        DISTRIBUTED_FRACTION * base_shear * wi_hi / sum_wj_hj
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_capped_z_ru() {
        assert_relative_eq!(capped_z_ru(0.13, 1.0), 0.13);
        assert_eq!(capped_z_ru(0.4, 1.8), 0.7);
    }

    #[test]
    fn test_damping_factor_at_five_percent() {
        assert_relative_eq!(damping_factor(0.05), 1.0, epsilon = 1e-12);
        assert!(damping_factor(0.02) > 1.0);
    }

    #[test]
    fn test_performance_factor() {
        assert_relative_eq!(performance_factor(1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(performance_factor(2.0), 0.7, epsilon = 1e-12);
        assert_eq!(performance_factor(4.0), 0.7);
    }

    #[test]
    fn test_ductility_factor_branches() {
        // short period ramp for A-D
        assert_relative_eq!(ductility_factor(2.0, 0.4, SubsoilClass::D), 1.0 + 0.4 / 0.7, epsilon = 1e-12);
        assert_eq!(ductility_factor(2.0, 0.7, SubsoilClass::C), 2.0);
        // low ductility always uses μ
        assert_eq!(ductility_factor(1.25, 0.1, SubsoilClass::A), 1.25);
        // class E ramps from 1.5, long period uses μ
        assert_relative_eq!(ductility_factor(3.0, 0.7, SubsoilClass::E), 3.0, epsilon = 1e-12);
        assert_relative_eq!(ductility_factor(3.0, 0.35, SubsoilClass::E), 2.25, epsilon = 1e-12);
        assert_eq!(ductility_factor(3.0, 1.2, SubsoilClass::E), 3.0);
    }

    #[test]
    fn test_design_coefficient_guard() {
        assert_eq!(design_coefficient(1.0, 0.39, 0.7, 0.0), 0.0);
        assert_relative_eq!(design_coefficient(1.0, 0.39, 0.7, 1.5), 0.182, epsilon = 1e-12);
    }

    #[test]
    fn test_area_reduction() {
        assert_relative_eq!(area_reduction_factor(100.0), 0.6, epsilon = 1e-12);
        assert_eq!(area_reduction_factor(0.0), 1.0);
        // small areas are not clamped
        assert!(area_reduction_factor(4.0) > 1.0);
    }

    #[test]
    fn test_distributed_force() {
        assert_eq!(distributed_force(100.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(distributed_force(100.0, 1.0, 4.0), 23.0, epsilon = 1e-12);
    }
}
