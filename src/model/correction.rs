use serde::Serialize;

/// Metered band bounds at rated RPM, in PSI.
pub const METERED_LOW_PSI: f64 = 19.0;
pub const METERED_HIGH_PSI: f64 = 21.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectionFactor {
    pub label: &'static str,
    pub rpm_drop: u32,
    pub multiplier: f64,
}

pub const CORRECTIONS: &[CorrectionFactor] = &[
    CorrectionFactor {
        label: "Rated RPM (1.000)",
        rpm_drop: 0,
        multiplier: 1.0,
    },
    CorrectionFactor {
        label: "-20 RPM (.991)",
        rpm_drop: 20,
        multiplier: 0.991,
    },
    CorrectionFactor {
        label: "-40 RPM (.982)",
        rpm_drop: 40,
        multiplier: 0.982,
    },
    CorrectionFactor {
        label: "-60 RPM (.973)",
        rpm_drop: 60,
        multiplier: 0.973,
    },
    CorrectionFactor {
        label: "-80 RPM (.964)",
        rpm_drop: 80,
        multiplier: 0.964,
    },
    CorrectionFactor {
        label: "-100 RPM (.955)",
        rpm_drop: 100,
        multiplier: 0.955,
    },
    CorrectionFactor {
        label: "-120 RPM (.946)",
        rpm_drop: 120,
        multiplier: 0.946,
    },
];

impl CorrectionFactor {
    pub fn rated() -> &'static CorrectionFactor {
        &CORRECTIONS[0]
    }

    /// Resolves a selection by exact label or by RPM drop (`"40"`, `"-40"`).
    pub fn lookup(selection: &str) -> Option<&'static CorrectionFactor> {
        if let Some(found) = CORRECTIONS.iter().find(|c| c.label == selection) {
            return Some(found);
        }
        let trimmed = selection.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let drop = digits.parse::<u32>().ok()?;
        CORRECTIONS.iter().find(|c| c.rpm_drop == drop)
    }

    pub fn is_rated(&self) -> bool {
        (self.multiplier - 1.0).abs() < f64::EPSILON
    }

    /// Metered band `(low, high)` scaled by this factor.
    pub fn metered_bounds(&self) -> (f64, f64) {
        (
            METERED_LOW_PSI * self.multiplier,
            METERED_HIGH_PSI * self.multiplier,
        )
    }
}
