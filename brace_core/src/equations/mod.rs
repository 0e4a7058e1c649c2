//! # Code Equations
//!
//! The NZS 1170 / NZS 3604 formulas used by the analysis stages, kept as
//! small pure functions so each can be checked against its clause.
//!
//! ## Modules
//!
//! - [`seismic`] - NZS 1170.5 spectrum, ductility and distribution factors
//! - [`wind`] - NZS 3604 zone pressures and NZS 1170.2 detailed pressures
//!
//! Every [`Equation`] carries its [`CodeReference`] and a plain-text formula
//! so reports can cite what was used.
//!
//! ## References
//!
//! - NZS 1170.0:2002 Structural design actions, Part 0: General principles
//! - NZS 1170.2:2021 Part 2: Wind actions
//! - NZS 1170.5:2004 Part 5: Earthquake actions
//! - NZS 3604:2011 Timber-framed buildings

pub mod seismic;
pub mod wind;

use serde::{Deserialize, Serialize};

/// A clause or table in one of the loading standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    Nzs1170_0 { clause: &'static str },
    Nzs1170_2 { clause: &'static str },
    Nzs1170_5 { clause: &'static str },
    Nzs3604 { clause: &'static str },
}

impl CodeReference {
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Nzs1170_0 { clause } => format!("NZS 1170.0 {clause}"),
            CodeReference::Nzs1170_2 { clause } => format!("NZS 1170.2 {clause}"),
            CodeReference::Nzs1170_5 { clause } => format!("NZS 1170.5 {clause}"),
            CodeReference::Nzs3604 { clause } => format!("NZS 3604 {clause}"),
        }
    }
}

/// The equations applied by the calculation stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    SpectralShape,
    HazardReturnPeriod,
    UlsSpectrum,
    SlsSpectrum,
    DampingFactor,
    PerformanceFactor,
    DuctilityFactor,
    DesignCoefficient,
    AreaReduction,
    LateralForceDistribution,
    ZoneRoofPressure,
    ZoneWallPressure,
    DetailedWallPressure,
    DetailedRoofPressure,
    BracingDemand,
    LineMinimumDemand,
}

/// Citation and formula for one equation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquationMetadata {
    pub name: &'static str,
    pub formula: &'static str,
    pub reference: CodeReference,
}

impl Equation {
    pub const ALL: [Equation; 16] = [
        Equation::SpectralShape,
        Equation::HazardReturnPeriod,
        Equation::UlsSpectrum,
        Equation::SlsSpectrum,
        Equation::DampingFactor,
        Equation::PerformanceFactor,
        Equation::DuctilityFactor,
        Equation::DesignCoefficient,
        Equation::AreaReduction,
        Equation::LateralForceDistribution,
        Equation::ZoneRoofPressure,
        Equation::ZoneWallPressure,
        Equation::DetailedWallPressure,
        Equation::DetailedRoofPressure,
        Equation::BracingDemand,
        Equation::LineMinimumDemand,
    ];

    pub fn metadata(&self) -> EquationMetadata {
        use CodeReference::*;
        let (name, formula, reference) = match self {
            Equation::SpectralShape => ("Spectral shape factor", "Ch(T1) interpolated by subsoil class", Nzs1170_5 { clause: "Table 3.1" }),
            Equation::HazardReturnPeriod => ("Return period factor", "Ru(design life, importance level)", Nzs1170_0 { clause: "Table 3.3" }),
            Equation::UlsSpectrum => ("ULS spectrum", "C(T) = Ch(T) min(0.7, Z Ru) N", Nzs1170_5 { clause: "3.1.1" }),
            Equation::SlsSpectrum => ("SLS spectrum", "Cs(T) = Ch(T) Z Rs N", Nzs1170_5 { clause: "3.1.1" }),
            Equation::DampingFactor => ("Damping factor", "Mζ = √(7 / (2 + 100ζ))", Nzs1170_5 { clause: "C3.1.1" }),
            Equation::PerformanceFactor => ("Structural performance factor", "Sp = 1.3 - 0.3μ (μ ≤ 2), else 0.7", Nzs1170_5 { clause: "4.4.2" }),
            Equation::DuctilityFactor => ("Inelastic spectrum scaling factor", "kμ = (μ - 1) T1 / 0.7 + 1 for T1 < 0.7", Nzs1170_5 { clause: "5.2.1.1" }),
            Equation::DesignCoefficient => ("Horizontal design action coefficient", "Cd(T1) = Mζ C(T1) Sp / kμ", Nzs1170_5 { clause: "5.2.1.1" }),
            Equation::AreaReduction => ("Live load area reduction", "ψa = 0.3 + 3 / √A", Nzs1170_0 { clause: "3.4.2" }),
            Equation::LateralForceDistribution => ("Equivalent static forces", "Fi = Ft + 0.92 V Wi hi / Σ Wj hj", Nzs1170_5 { clause: "6.2.1.3" }),
            Equation::ZoneRoofPressure => ("Zone roof pressure", "pr = p Cpe,r,h(2 h_roof)", Nzs3604 { clause: "5.2" }),
            Equation::ZoneWallPressure => ("Zone wall pressure", "pw = 1.2 p", Nzs3604 { clause: "5.2" }),
            Equation::DetailedWallPressure => ("Windward + leeward wall pressure", "pw = 0.6 V² (0.7 - Cp,w,L) / 1000", Nzs1170_2 { clause: "Table 5.2" }),
            Equation::DetailedRoofPressure => ("Roof pressure", "pr = -0.6 V² cos α Cp,r / 1000", Nzs1170_2 { clause: "Table 5.3" }),
            Equation::BracingDemand => ("Bracing demand", "BU = 20 V (kN)", Nzs3604 { clause: "5.1" }),
            Equation::LineMinimumDemand => ("Line minimum demand", "max(100, 15 Lext, 0.5 D / n)", Nzs3604 { clause: "5.4.4" }),
        };
        EquationMetadata { name, formula, reference }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citations() {
        let meta = Equation::DesignCoefficient.metadata();
        assert_eq!(meta.reference.citation(), "NZS 1170.5 5.2.1.1");
        assert!(meta.formula.contains("Cd(T1)"));
    }

    #[test]
    fn test_every_equation_has_metadata() {
        for eq in Equation::ALL {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula.is_empty());
        }
    }
}
