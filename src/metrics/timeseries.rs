use serde::{Deserialize, Serialize};

//a point in the drawdown curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub growth: f64,
    pub peak: f64,
    pub drawdown: f64,
}

impl DrawdownPoint {
    pub fn new(growth: f64, peak: f64, drawdown: f64) -> Self {
        DrawdownPoint {
            growth,
            peak,
            drawdown,
        }
    }
}

//calculates the drawdown curve of a growth factor series
//the running peak starts at the first growth factor
pub fn drawdown_curve(growth_factors: &[f64]) -> Vec<DrawdownPoint> {
    let mut curve = Vec::with_capacity(growth_factors.len());
    let mut peak = f64::NEG_INFINITY;

    for &growth in growth_factors {
        //update peak
        if growth > peak {
            peak = growth;
        }

        //calculate drawdown
        let drawdown = if peak > 0.0 {
            (peak - growth) / peak
        } else {
            0.0
        };

        curve.push(DrawdownPoint::new(growth, peak, drawdown));
    }

    curve
}

//calculates maximum drawdown from a growth factor series
pub fn max_drawdown(growth_factors: &[f64]) -> f64 {
    drawdown_curve(growth_factors)
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}
