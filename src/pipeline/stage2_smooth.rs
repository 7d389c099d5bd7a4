use crate::model::series::{Channel, RunDataset};

pub const SMOOTHING_WINDOW: usize = 9;
pub const SMOOTHING_ORDER: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum SmoothingError {
    #[error(
        "{run} {channel} series has {len} samples; smoothing needs at least {window}"
    )]
    TooFewSamples {
        run: &'static str,
        channel: &'static str,
        len: usize,
        window: usize,
    },
    #[error("invalid smoothing window {window} for polynomial order {order}")]
    InvalidWindow { window: usize, order: usize },
    #[error("singular normal matrix for window {window}, order {order}")]
    Singular { window: usize, order: usize },
}

/// Savitzky-Golay filter. Interior samples use the centred least-squares
/// projection; the first and last `window / 2` samples are evaluated from the
/// polynomial fitted to the first or last full window.
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window: usize,
    order: usize,
    // hat[p][j]: weight of window sample j for the fitted value at position p
    hat: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    pub fn new(window: usize, order: usize) -> Result<Self, SmoothingError> {
        if window % 2 == 0 || window <= order {
            return Err(SmoothingError::InvalidWindow { window, order });
        }
        let half = (window / 2) as f64;
        let n_coef = order + 1;

        let vander: Vec<Vec<f64>> = (0..window)
            .map(|i| {
                let t = i as f64 - half;
                (0..n_coef).map(|k| t.powi(k as i32)).collect()
            })
            .collect();

        let mut normal = vec![vec![0.0f64; n_coef]; n_coef];
        for row in &vander {
            for a in 0..n_coef {
                for b in 0..n_coef {
                    normal[a][b] += row[a] * row[b];
                }
            }
        }
        let inv = invert(normal).ok_or(SmoothingError::Singular { window, order })?;

        let mut hat = vec![vec![0.0f64; window]; window];
        for p in 0..window {
            for j in 0..window {
                let mut acc = 0.0;
                for a in 0..n_coef {
                    for b in 0..n_coef {
                        acc += vander[p][a] * inv[a][b] * vander[j][b];
                    }
                }
                hat[p][j] = acc;
            }
        }

        Ok(Self { window, order, hat })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn apply(&self, values: &[f64]) -> Option<Vec<f64>> {
        let n = values.len();
        if n < self.window {
            return None;
        }
        let half = self.window / 2;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let start = if i < half {
                0
            } else if i + half >= n {
                n - self.window
            } else {
                i - half
            };
            let weights = &self.hat[i - start];
            let window = &values[start..start + self.window];
            out.push(weights.iter().zip(window).map(|(w, v)| w * v).sum());
        }
        Some(out)
    }
}

fn invert(mut m: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = m.len();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| {
            m[a][col]
                .abs()
                .partial_cmp(&m[b][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        inv.swap(col, pivot);

        let d = m[col][col];
        for j in 0..n {
            m[col][j] /= d;
            inv[col][j] /= d;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = m[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                m[row][j] -= factor * m[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedRun {
    pub unmetered: Vec<f64>,
    pub metered: Option<Vec<f64>>,
}

impl SmoothedRun {
    pub fn series(&self, channel: Channel) -> Option<&[f64]> {
        match channel {
            Channel::Unmetered => Some(&self.unmetered),
            Channel::Metered => self.metered.as_deref(),
        }
    }
}

pub fn smooth_run(filter: &SavitzkyGolay, run: &RunDataset) -> Result<SmoothedRun, SmoothingError> {
    let smooth = |channel: Channel, values: &[f64]| {
        filter
            .apply(values)
            .ok_or_else(|| SmoothingError::TooFewSamples {
                run: run.kind.label(),
                channel: channel.column(),
                len: values.len(),
                window: filter.window(),
            })
    };

    let unmetered = smooth(Channel::Unmetered, &run.unmetered.values)?;
    let metered = match &run.metered {
        Some(series) => Some(smooth(Channel::Metered, &series.values)?),
        None => None,
    };
    tracing::debug!(
        "smoothed {} run: samples={}, window={}, order={}",
        run.kind.label(),
        run.n_samples(),
        filter.window(),
        filter.order()
    );

    Ok(SmoothedRun {
        unmetered,
        metered,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_smooth.rs"]
mod tests;
