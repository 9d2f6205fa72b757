//! Aggregation and ranking over grades.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::model::{Grade, GradeRank, GradeValue};

/// Arithmetic mean, or `None` for an empty slice (or a sum that overflows).
pub fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;

    if sum.is_zero() {
        Some(Decimal::ZERO)
    } else {
        sum.checked_div(Decimal::from(values.len()))
    }
}

pub fn average_or(values: &[Decimal], default: Decimal) -> Decimal {
    average(values).unwrap_or(default)
}

/// Mean of the numeric parts of grade values.
pub fn grade_average<V: AsRef<GradeValue>>(values: &[V]) -> Option<Decimal> {
    let numbers: Vec<Decimal> = values.iter().map(|v| v.as_ref().numeric_value()).collect();
    average(&numbers)
}

pub fn grade_average_or<V: AsRef<GradeValue>>(values: &[V], default: Decimal) -> Decimal {
    grade_average(values).unwrap_or(default)
}

/// `Σ(weight · value) / Σ(weight)`.
///
/// Empty input gives `None`. A zero total on either side gives zero rather
/// than a division error.
pub fn weighted_average(grades: &[Grade]) -> Option<Decimal> {
    if grades.is_empty() {
        return None;
    }

    let (points, weights) = grades.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(points, weights), grade| {
            let product = grade.numeric_value().checked_mul(grade.weight())?;
            Some((points.checked_add(product)?, weights.checked_add(grade.weight())?))
        },
    )?;

    if points.is_zero() || weights.is_zero() {
        Some(Decimal::ZERO)
    } else {
        points.checked_div(weights)
    }
}

pub fn weighted_average_or(grades: &[Grade], default: Decimal) -> Decimal {
    weighted_average(grades).unwrap_or(default)
}

/// Count of each label, highest-scoring label first.
///
/// Values are sorted by numeric value descending (stable), then labels are
/// counted in first-seen order.
pub fn distribution<V: AsRef<GradeValue>>(values: &[V]) -> Vec<(String, usize)> {
    let mut sorted: Vec<&GradeValue> = values.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| b.compare_numeric(a));

    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in sorted {
        match counts.iter_mut().find(|(label, _)| label == value.text_value()) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.text_value().to_string(), 1)),
        }
    }
    counts
}

/// Highest numeric value first, earlier timestamp first on ties.
pub fn hi_to_low(a: &Grade, b: &Grade) -> Ordering {
    b.numeric_value()
        .cmp(&a.numeric_value())
        .then_with(|| a.timestamp().cmp(&b.timestamp()))
}

/// Lowest numeric value first, earlier timestamp first on ties.
pub fn low_to_high(a: &Grade, b: &Grade) -> Ordering {
    a.numeric_value()
        .cmp(&b.numeric_value())
        .then_with(|| a.timestamp().cmp(&b.timestamp()))
}

/// Dense ranks in input order.
pub fn rank(grades: &[Grade]) -> Vec<GradeRank> {
    assign_dense_ranks(grades.to_vec())
}

/// Sorts a copy with `compare` and assigns dense ranks: equal numeric values
/// share a rank and the next distinct value gets the previous rank plus one.
pub fn rank_by<F>(grades: &[Grade], compare: F) -> Vec<GradeRank>
where
    F: FnMut(&Grade, &Grade) -> Ordering,
{
    let mut sorted = grades.to_vec();
    sorted.sort_by(compare);
    assign_dense_ranks(sorted)
}

pub fn rank_hi_to_low(grades: &[Grade]) -> Vec<GradeRank> {
    rank_by(grades, hi_to_low)
}

pub fn rank_low_to_high(grades: &[Grade]) -> Vec<GradeRank> {
    rank_by(grades, low_to_high)
}

fn assign_dense_ranks(grades: Vec<Grade>) -> Vec<GradeRank> {
    let mut ranked: Vec<GradeRank> = Vec::with_capacity(grades.len());
    for grade in grades {
        let rank = match ranked.last() {
            None => 1,
            Some(prev) if prev.grade.numeric_value() == grade.numeric_value() => prev.rank,
            Some(prev) => prev.rank + 1,
        };
        ranked.push(GradeRank { rank, grade });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn grade(id: &str, numeric: Decimal, text: &str) -> Grade {
        Grade::builder()
            .id(id)
            .numeric_value(numeric)
            .text_value(text)
            .grading_system("test")
            .build()
            .unwrap()
    }

    fn weighted(numeric: Decimal, weight: Decimal) -> Grade {
        Grade::builder()
            .id("w")
            .numeric_value(numeric)
            .grading_system("test")
            .weight(weight)
            .build()
            .unwrap()
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(average(&[]), None);
        assert_eq!(average_or(&[], dec!(-1)), dec!(-1));
    }

    #[test]
    fn test_average_one_to_ninety_nine() {
        let values: Vec<Decimal> = (1..=99).map(Decimal::from).collect();
        assert_eq!(average(&values), Some(dec!(50)));
    }

    #[test]
    fn test_average_repeated_value() {
        assert_eq!(average(&[dec!(83.75)]), Some(dec!(83.75)));
        assert_eq!(average(&[dec!(7.1); 6]), Some(dec!(7.1)));
    }

    #[test]
    fn test_average_zero_sum() {
        assert_eq!(average(&[dec!(5), dec!(-5)]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_grade_average() {
        let values = [
            GradeValue::new(dec!(92.5), "A-", "s"),
            GradeValue::new(dec!(75), "C", "s"),
        ];
        assert_eq!(grade_average(&values), Some(dec!(83.75)));
        assert_eq!(grade_average_or::<GradeValue>(&[], dec!(0)), dec!(0));
    }

    #[test]
    fn test_weighted_average() {
        let grades = [
            weighted(dec!(95), dec!(0.6)),
            weighted(dec!(85), dec!(0.3)),
            weighted(dec!(75), dec!(0.1)),
        ];
        assert_eq!(weighted_average(&grades), Some(dec!(90)));
    }

    #[test]
    fn test_weighted_average_zero_weights() {
        let grades = [weighted(dec!(95), dec!(0)), weighted(dec!(85), dec!(0))];
        assert_eq!(weighted_average(&grades), Some(Decimal::ZERO));
        assert_eq!(weighted_average(&[]), None);
        assert_eq!(weighted_average_or(&[], dec!(1)), dec!(1));
    }

    #[test]
    fn test_distribution_is_highest_first() {
        let values = [
            GradeValue::new(dec!(75), "B", "s"),
            GradeValue::new(dec!(100), "A", "s"),
            GradeValue::new(dec!(40), "C", "s"),
            GradeValue::new(dec!(95), "A", "s"),
            GradeValue::new(dec!(78), "B", "s"),
            GradeValue::new(dec!(98), "A", "s"),
        ];
        let expected = vec![
            ("A".to_string(), 3),
            ("B".to_string(), 2),
            ("C".to_string(), 1),
        ];
        assert_eq!(distribution(&values), expected);
    }

    #[test]
    fn test_dense_rank_hi_to_low() {
        let grades = [
            grade("a", dec!(80), "B"),
            grade("b", dec!(90), "A"),
            grade("c", dec!(70), "C"),
            grade("d", dec!(80), "B"),
        ];
        let ranked = rank_hi_to_low(&grades);
        let ranks: Vec<u64> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 3]);
        assert_eq!(ranked[0].grade.id(), "b");
    }

    #[test]
    fn test_rank_ties_break_on_timestamp() {
        let now = Utc::now();
        let later = Grade::builder()
            .id("later")
            .numeric_value(dec!(80))
            .grading_system("test")
            .timestamp(now)
            .build()
            .unwrap();
        let earlier = Grade::builder()
            .id("earlier")
            .numeric_value(dec!(80))
            .grading_system("test")
            .timestamp(now - Duration::seconds(60))
            .build()
            .unwrap();

        let ranked = rank_low_to_high(&[later, earlier]);
        assert_eq!(ranked[0].grade.id(), "earlier");
        assert_eq!(ranked[1].grade.id(), "later");
        assert_eq!(ranked[1].rank, 1);
    }

    #[test]
    fn test_rank_in_input_order() {
        let grades = [
            grade("a", dec!(70), "C"),
            grade("b", dec!(70), "C"),
            grade("c", dec!(90), "A"),
        ];
        let ranks: Vec<u64> = rank(&grades).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 2]);
        assert!(rank(&[]).is_empty());
    }
}
