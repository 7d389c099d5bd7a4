use serde::Serialize;

use crate::model::bands::BandToggle;

/// Which reference bands are drawn. Every combination is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayOptions {
    pub non_turbo_unmetered: bool,
    pub turbo_unmetered: bool,
    pub metered: bool,
    pub non_turbo_idle: bool,
    pub turbo_idle: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            non_turbo_unmetered: true,
            turbo_unmetered: false,
            metered: true,
            non_turbo_idle: true,
            turbo_idle: false,
        }
    }
}

impl DisplayOptions {
    pub fn all_off() -> Self {
        Self {
            non_turbo_unmetered: false,
            turbo_unmetered: false,
            metered: false,
            non_turbo_idle: false,
            turbo_idle: false,
        }
    }

    pub fn from_toggles(toggles: &[BandToggle]) -> Self {
        let mut out = Self::all_off();
        for toggle in toggles {
            out.set(*toggle, true);
        }
        out
    }

    pub fn set(&mut self, toggle: BandToggle, on: bool) {
        match toggle {
            BandToggle::NonTurboUnmetered => self.non_turbo_unmetered = on,
            BandToggle::TurboUnmetered => self.turbo_unmetered = on,
            BandToggle::Metered => self.metered = on,
            BandToggle::NonTurboIdle => self.non_turbo_idle = on,
            BandToggle::TurboIdle => self.turbo_idle = on,
        }
    }

    pub fn is_enabled(&self, toggle: BandToggle) -> bool {
        match toggle {
            BandToggle::NonTurboUnmetered => self.non_turbo_unmetered,
            BandToggle::TurboUnmetered => self.turbo_unmetered,
            BandToggle::Metered => self.metered,
            BandToggle::NonTurboIdle => self.non_turbo_idle,
            BandToggle::TurboIdle => self.turbo_idle,
        }
    }

    pub fn enabled(&self) -> Vec<BandToggle> {
        [
            BandToggle::NonTurboUnmetered,
            BandToggle::TurboUnmetered,
            BandToggle::Metered,
            BandToggle::NonTurboIdle,
            BandToggle::TurboIdle,
        ]
        .into_iter()
        .filter(|t| self.is_enabled(*t))
        .collect()
    }
}
