//! The fixed loan-applicant dataset used by the teaching tool.

use crate::sample::{ClassLabel, Sample};

const APPLICANTS: [(f64, f64, ClassLabel); 18] = [
    // Approve: high income, good score
    (95.0, 780.0, ClassLabel::APPROVE),
    (85.0, 750.0, ClassLabel::APPROVE),
    (110.0, 800.0, ClassLabel::APPROVE),
    (70.0, 720.0, ClassLabel::APPROVE),
    (60.0, 710.0, ClassLabel::APPROVE),
    (50.0, 700.0, ClassLabel::APPROVE),
    // Review: medium income or mid score
    (45.0, 640.0, ClassLabel::REVIEW),
    (40.0, 680.0, ClassLabel::REVIEW),
    (55.0, 620.0, ClassLabel::REVIEW),
    (30.0, 700.0, ClassLabel::REVIEW),
    (65.0, 600.0, ClassLabel::REVIEW),
    (75.0, 650.0, ClassLabel::REVIEW),
    // Deny: low income or poor score
    (20.0, 450.0, ClassLabel::DENY),
    (15.0, 520.0, ClassLabel::DENY),
    (28.0, 490.0, ClassLabel::DENY),
    (25.0, 560.0, ClassLabel::DENY),
    (18.0, 420.0, ClassLabel::DENY),
    (35.0, 480.0, ClassLabel::DENY),
];

/// Return the 18 labeled applicants (six per class) in their canonical order.
#[must_use]
pub fn loan_applicants() -> Vec<Sample> {
    APPLICANTS
        .iter()
        .map(|&(income, score, label)| Sample::new(income, score, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::class_counts;

    #[test]
    fn six_per_class() {
        let data = loan_applicants();
        assert_eq!(data.len(), 18);
        let counts = class_counts(&data);
        for class in [ClassLabel::APPROVE, ClassLabel::REVIEW, ClassLabel::DENY] {
            assert_eq!(counts.get(class), 6);
        }
    }

    #[test]
    fn first_applicant_is_strong_approve() {
        let first = loan_applicants()[0];
        assert_eq!((first.point.income, first.point.score), (95.0, 780.0));
        assert_eq!(first.label, ClassLabel::APPROVE);
    }
}
