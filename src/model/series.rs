use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    MaxRpm,
    IdleRpm,
}

impl RunKind {
    pub fn label(self) -> &'static str {
        match self {
            RunKind::MaxRpm => "max RPM",
            RunKind::IdleRpm => "idle RPM",
        }
    }

    /// Page heading used in the exported report.
    pub fn page_title(self) -> &'static str {
        match self {
            RunKind::MaxRpm => "Max RPM",
            RunKind::IdleRpm => "Idle RPM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Unmetered,
    Metered,
}

impl Channel {
    pub fn column(self) -> &'static str {
        match self {
            Channel::Unmetered => "UNMETERED [PSI]",
            Channel::Metered => "METERED [PSI]",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Channel::Unmetered => "UNM",
            Channel::Metered => "MET",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    pub channel: Channel,
    pub values: Vec<f64>,
}

impl SampleSeries {
    pub fn new(channel: Channel, values: Vec<f64>) -> Self {
        Self { channel, values }
    }
}

/// One operating condition: a shared time column plus the pressure channels
/// recorded against it. `metered` is only present for max RPM runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunDataset {
    pub kind: RunKind,
    pub source: String,
    pub time: Vec<f64>,
    pub unmetered: SampleSeries,
    pub metered: Option<SampleSeries>,
}

impl RunDataset {
    pub fn n_samples(&self) -> usize {
        self.time.len()
    }

    /// First and last sample time. `None` for an empty run.
    pub fn time_extent(&self) -> Option<(f64, f64)> {
        match (self.time.first(), self.time.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }

    pub fn series(&self, channel: Channel) -> Option<&SampleSeries> {
        match channel {
            Channel::Unmetered => Some(&self.unmetered),
            Channel::Metered => self.metered.as_ref(),
        }
    }

    /// Channels present on this run, in chart order.
    pub fn channels(&self) -> Vec<Channel> {
        let mut out = vec![Channel::Unmetered];
        if self.metered.is_some() {
            out.push(Channel::Metered);
        }
        out
    }
}
