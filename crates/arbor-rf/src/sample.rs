//! Applicant records: query points, labeled samples, classes, and features.

use std::fmt;

/// Display names for the three applicant classes, indexed by class.
pub const CLASS_NAMES: [&str; 3] = ["Approve", "Review", "Deny"];

/// Zero-based class index assigned to an applicant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ClassLabel(usize);

impl ClassLabel {
    /// Applicant should be approved.
    pub const APPROVE: Self = Self(0);
    /// Applicant needs manual review.
    pub const REVIEW: Self = Self(1);
    /// Applicant should be denied.
    pub const DENY: Self = Self(2);

    /// Create a class label from a zero-based index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based class index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// Return the display name, or `None` for indices outside the known classes.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        CLASS_NAMES.get(self.0).copied()
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two numeric applicant features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Annual income, in thousands.
    Income,
    /// Credit score.
    Score,
}

impl Feature {
    /// Both features in search order.
    pub const ALL: [Feature; 2] = [Feature::Income, Feature::Score];

    /// Read this feature's value from a point.
    #[must_use]
    pub fn value(self, point: &Point) -> f64 {
        match self {
            Feature::Income => point.income,
            Feature::Score => point.score,
        }
    }

    /// Human-readable label used in extracted rules.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Feature::Income => "Income",
            Feature::Score => "Score",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Income => f.write_str("income"),
            Feature::Score => f.write_str("score"),
        }
    }
}

/// An unlabeled query point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Annual income, in thousands.
    pub income: f64,
    /// Credit score.
    pub score: f64,
}

impl Point {
    /// Create a query point.
    #[must_use]
    pub fn new(income: f64, score: f64) -> Self {
        Self { income, score }
    }
}

/// A labeled training sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    /// Feature values.
    #[serde(flatten)]
    pub point: Point,
    /// Ground-truth class.
    pub label: ClassLabel,
}

impl Sample {
    /// Create a labeled sample.
    #[must_use]
    pub fn new(income: f64, score: f64, label: ClassLabel) -> Self {
        Self {
            point: Point::new(income, score),
            label,
        }
    }

    /// Return a copy carrying a different label.
    #[must_use]
    pub fn relabeled(self, label: ClassLabel) -> Self {
        Self { label, ..self }
    }
}

/// Check that every feature value in `data` is finite.
pub(crate) fn validate_finite(data: &[Sample]) -> Result<(), crate::RfError> {
    for (sample_index, sample) in data.iter().enumerate() {
        for feature in Feature::ALL {
            if !feature.value(&sample.point).is_finite() {
                return Err(crate::RfError::NonFiniteValue {
                    sample_index,
                    feature,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_label_display_is_bare_index() {
        assert_eq!(format!("{}", ClassLabel::DENY), "2");
    }

    #[test]
    fn class_label_names() {
        assert_eq!(ClassLabel::APPROVE.name(), Some("Approve"));
        assert_eq!(ClassLabel::REVIEW.name(), Some("Review"));
        assert_eq!(ClassLabel::new(7).name(), None);
    }

    #[test]
    fn feature_reads_matching_field() {
        let p = Point::new(95.0, 780.0);
        assert_eq!(Feature::Income.value(&p), 95.0);
        assert_eq!(Feature::Score.value(&p), 780.0);
    }

    #[test]
    fn relabel_keeps_point() {
        let s = Sample::new(10.0, 500.0, ClassLabel::DENY).relabeled(ClassLabel::APPROVE);
        assert_eq!(s.point, Point::new(10.0, 500.0));
        assert_eq!(s.label, ClassLabel::APPROVE);
    }

    #[test]
    fn non_finite_rejected() {
        let data = [
            Sample::new(1.0, 2.0, ClassLabel::APPROVE),
            Sample::new(1.0, f64::INFINITY, ClassLabel::APPROVE),
        ];
        let err = validate_finite(&data).unwrap_err();
        assert!(matches!(
            err,
            crate::RfError::NonFiniteValue { sample_index: 1, feature: Feature::Score }
        ));
    }

    #[test]
    fn sample_serializes_flat() {
        let s = Sample::new(95.0, 780.0, ClassLabel::APPROVE);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["income"], 95.0);
        assert_eq!(json["label"], 0);
    }
}
