//! Derived "feels like" indices computed from a current observation.

use std::fmt;

use crate::error::IndexError;

/// Outcome of the wind chill formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindChill {
    /// Wind chill in Fahrenheit, rounded to one decimal place.
    Value(f64),
    /// Temperature above 50F or wind at or below 3 mph.
    NotApplicable,
}

impl fmt::Display for WindChill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindChill::Value(v) => write!(f, "{v:.1}"),
            WindChill::NotApplicable => f.write_str("NA"),
        }
    }
}

/// NWS wind chill for `temp_f` (Fahrenheit) and `wind_mph`.
pub fn compute_wind_chill(temp_f: f64, wind_mph: f64) -> WindChill {
    if temp_f > 50.0 || wind_mph <= 3.0 {
        return WindChill::NotApplicable;
    }

    let v = wind_mph.powf(0.16);
    let chill = 35.74 + 0.6215 * temp_f - 35.75 * v + 0.4275 * temp_f * v;
    WindChill::Value(round_to(chill, 1))
}

/// Humidex for `temp_c` (Celsius) at `rel_humidity` percent.
///
/// The dew point is recovered with the Magnus approximation
/// (a = 17.27, b = 237.7) and fed into the Environment Canada vapour
/// pressure formula. The result is truncated to a whole degree and then
/// rounded to one decimal, which leaves it integral.
///
/// Always computed, even in cool or dry air where humidex carries little
/// meaning. Fails with [`IndexError::HumidityOutOfDomain`] when
/// `rel_humidity <= 0`, since the logarithm is undefined there.
pub fn compute_humidex(temp_c: f64, rel_humidity: f64) -> Result<f64, IndexError> {
    if rel_humidity <= 0.0 || rel_humidity.is_nan() {
        return Err(IndexError::HumidityOutOfDomain(rel_humidity));
    }

    const A: f64 = 17.27;
    const B: f64 = 237.7;

    let alpha = (A * temp_c) / (B + temp_c) + (rel_humidity / 100.0).ln();
    let dewpoint = (B * alpha) / (A - alpha);

    let e = 6.11 * (5417.7530 * ((1.0 / 273.16) - (1.0 / (dewpoint + 273.15)))).exp();
    let humidex = temp_c + 0.5555 * (e - 10.0);

    if !humidex.is_finite() {
        return Err(IndexError::Undefined { temp_c, rel_humidity });
    }

    // `+ 0.0` folds -0.0 into 0.0 so it renders as "0".
    Ok(round_to(humidex.trunc(), 1) + 0.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
