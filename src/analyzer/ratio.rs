use crate::model::{DomainError, Series};

/// Element-wise ratio of two index-aligned series, keeping the first
/// series' timestamps. A zero denominator is bad domain data and fails
/// with the offending index rather than producing inf or NaN.
pub fn ratio_series(numerator: &Series, denominator: &Series) -> Result<Series, DomainError> {
    if numerator.len() != denominator.len() {
        return Err(DomainError::LengthMismatch {
            left: numerator.len(),
            right: denominator.len(),
        });
    }

    let mut values = Vec::with_capacity(numerator.len());
    for (i, (num, den)) in numerator.values.iter().zip(&denominator.values).enumerate() {
        if *den == 0.0 {
            return Err(DomainError::DivisionByZero(i));
        }
        values.push(num / den);
    }

    Ok(Series::new(numerator.timestamps.clone(), values))
}
