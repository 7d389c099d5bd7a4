use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::chart::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    TurboUnmetered,
    NonTurboUnmetered,
    Metered,
    NonTurboIdle,
    TurboIdle,
}

/// User-facing switch for one band, as accepted on the CLI and in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandToggle {
    NonTurboUnmetered,
    TurboUnmetered,
    Metered,
    NonTurboIdle,
    TurboIdle,
}

impl BandToggle {
    pub fn name(self) -> &'static str {
        match self {
            BandToggle::NonTurboUnmetered => "non-turbo-unmetered",
            BandToggle::TurboUnmetered => "turbo-unmetered",
            BandToggle::Metered => "metered",
            BandToggle::NonTurboIdle => "non-turbo-idle",
            BandToggle::TurboIdle => "turbo-idle",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BandDef {
    pub kind: BandKind,
    pub low: f64,
    pub high: f64,
    pub label: &'static str,
    pub fill: Rgb,
    pub label_color: Rgb,
}

pub const BAND_OPACITY: f64 = 0.3;

pub const GOLD: Rgb = Rgb(0xFF, 0xD7, 0x00);
pub const SADDLE_BROWN: Rgb = Rgb(0x8B, 0x45, 0x13);
pub const LIME_GREEN: Rgb = Rgb(0x32, 0xCD, 0x32);
pub const DARK_GREEN: Rgb = Rgb(0x00, 0x64, 0x00);
pub const DEEP_SKY_BLUE: Rgb = Rgb(0x00, 0xBF, 0xFF);
pub const NAVY: Rgb = Rgb(0x00, 0x00, 0x8B);

// Fixed bands, in drawing order. The metered band is scaled per correction
// and built separately.
const FIXED_BANDS: &[BandDef] = &[
    BandDef {
        kind: BandKind::TurboUnmetered,
        low: 21.0,
        high: 24.0,
        label: "Turbo UNMETERED (21-24)",
        fill: GOLD,
        label_color: SADDLE_BROWN,
    },
    BandDef {
        kind: BandKind::NonTurboUnmetered,
        low: 28.0,
        high: 30.0,
        label: "Non-Turbo UNMETERED (28-30)",
        fill: LIME_GREEN,
        label_color: DARK_GREEN,
    },
    BandDef {
        kind: BandKind::NonTurboIdle,
        low: 8.0,
        high: 10.0,
        label: "Non-Turbo Idle (8-10)",
        fill: LIME_GREEN,
        label_color: DARK_GREEN,
    },
];

pub fn fixed_band(kind: BandKind) -> Option<&'static BandDef> {
    FIXED_BANDS.iter().find(|b| b.kind == kind)
}

/// Reference range of the turbo idle toggle. It has no drawn band.
pub const TURBO_IDLE_RANGE: (f64, f64) = (7.0, 9.0);
