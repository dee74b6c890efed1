use crate::error::RatingError;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Check that a user-supplied rating is within `[0, 5]`.
pub fn validate_rating(rating: f64) -> Result<f64, RatingError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(RatingError::OutOfRange(rating));
    }
    Ok(rating)
}

/// Mean of the given ratings, or 0.0 when there are none.
pub fn average_rating(ratings: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0u32), |(sum, count), r| (sum + r, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Map a 0-100 popularity score onto the rating scale.
pub fn rating_from_score(score: f64) -> f64 {
    if !score.is_finite() {
        return MIN_RATING;
    }
    (score / 20.0).clamp(MIN_RATING, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rating_bounds() {
        assert_eq!(validate_rating(0.0), Ok(0.0));
        assert_eq!(validate_rating(5.0), Ok(5.0));
        assert_eq!(validate_rating(3.5), Ok(3.5));
        assert_eq!(validate_rating(5.5), Err(RatingError::OutOfRange(5.5)));
        assert_eq!(validate_rating(-1.0), Err(RatingError::OutOfRange(-1.0)));
        assert!(validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating([4.0, 5.0, 3.0]), 4.0);
        assert_eq!(average_rating(vec![2.5]), 2.5);
    }

    #[test]
    fn test_average_rating_empty() {
        assert_eq!(average_rating(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_rating_from_score() {
        assert_eq!(rating_from_score(100.0), 5.0);
        assert_eq!(rating_from_score(50.0), 2.5);
        assert_eq!(rating_from_score(0.0), 0.0);
        assert_eq!(rating_from_score(250.0), 5.0);
        assert_eq!(rating_from_score(-10.0), 0.0);
        assert_eq!(rating_from_score(f64::NAN), 0.0);
    }
}
