// Registry of the predefined analysis views
use serde::Serialize;

use super::error::{DashboardError, Result};
use super::pipeline::{Aggregate, KeySource, PipelineSpec, SortRule};
use super::trip::TripField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    PeakPickupHours,
    AvgDistanceByPassengers,
    PaymentTypeDistribution,
    BusiestDays,
    FareByPaymentType,
    AvgDistanceByHour,
    TripsByPassengers,
}

/// How grouping keys are cleaned up before display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDomain {
    Any,
    /// Null keys are dropped and numeric keys become integers
    Integral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSpec {
    pub view: View,
    pub name: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub pipeline: PipelineSpec,
    pub key_label: &'static str,
    pub metric_label: &'static str,
    pub key_domain: KeyDomain,
}

static VIEW_SPECS: [ViewSpec; 7] = [
    ViewSpec {
        view: View::PeakPickupHours,
        name: "Peak pickup hours",
        slug: "peak-pickup-hours",
        title: "Trips by Hour of Day",
        pipeline: PipelineSpec::new(
            KeySource::HourOf(TripField::PickupTime),
            Aggregate::Count,
            "trips",
            SortRule::KeyAscending,
        ),
        key_label: "Hour",
        metric_label: "Trips",
        key_domain: KeyDomain::Any,
    },
    ViewSpec {
        view: View::AvgDistanceByPassengers,
        name: "Average trip distance by passenger count",
        slug: "avg-distance-by-passengers",
        title: "Avg Distance by Passenger Count",
        pipeline: PipelineSpec::new(
            KeySource::Field(TripField::PassengerCount),
            Aggregate::Avg(TripField::TripDistance),
            "avg_distance",
            SortRule::KeyAscending,
        ),
        key_label: "Passengers",
        metric_label: "Avg Distance",
        key_domain: KeyDomain::Integral,
    },
    ViewSpec {
        view: View::PaymentTypeDistribution,
        name: "Payment type distribution",
        slug: "payment-type-distribution",
        title: "Payment Type Usage",
        pipeline: PipelineSpec::new(
            KeySource::Field(TripField::PaymentType),
            Aggregate::Count,
            "trips",
            SortRule::KeyAscending,
        ),
        key_label: "Payment Method",
        metric_label: "Trips",
        key_domain: KeyDomain::Any,
    },
    ViewSpec {
        view: View::BusiestDays,
        name: "Top 10 days with highest trips",
        slug: "busiest-days",
        title: "Busiest Days of Month",
        pipeline: PipelineSpec::new(
            KeySource::DayOfMonthOf(TripField::PickupTime),
            Aggregate::Count,
            "trips",
            SortRule::MetricDescending { limit: 10 },
        ),
        key_label: "Day",
        metric_label: "Trips",
        key_domain: KeyDomain::Any,
    },
    ViewSpec {
        view: View::FareByPaymentType,
        name: "Total fare collected by payment type",
        slug: "fare-by-payment-type",
        title: "Revenue by Payment Method",
        pipeline: PipelineSpec::new(
            KeySource::Field(TripField::PaymentType),
            Aggregate::Sum(TripField::TotalAmount),
            "total_fare",
            SortRule::KeyAscending,
        ),
        key_label: "Payment Method",
        metric_label: "Total Fare",
        key_domain: KeyDomain::Any,
    },
    ViewSpec {
        view: View::AvgDistanceByHour,
        name: "Average trip distance by hour",
        slug: "avg-distance-by-hour",
        title: "Avg Distance by Hour of Day",
        pipeline: PipelineSpec::new(
            KeySource::HourOf(TripField::DropoffTime),
            Aggregate::Avg(TripField::TripDistance),
            "avg_distance",
            SortRule::KeyAscending,
        ),
        key_label: "Hour",
        metric_label: "Avg Distance",
        key_domain: KeyDomain::Any,
    },
    ViewSpec {
        view: View::TripsByPassengers,
        name: "Trip distribution by passenger count",
        slug: "trips-by-passengers",
        title: "Trip Counts by Passenger Number",
        pipeline: PipelineSpec::new(
            KeySource::Field(TripField::PassengerCount),
            Aggregate::Count,
            "trips",
            SortRule::KeyAscending,
        ),
        key_label: "Passengers",
        metric_label: "Trips",
        key_domain: KeyDomain::Integral,
    },
];

impl View {
    /// All views in selection-control order
    pub const ALL: [View; 7] = [
        View::PeakPickupHours,
        View::AvgDistanceByPassengers,
        View::PaymentTypeDistribution,
        View::BusiestDays,
        View::FareByPaymentType,
        View::AvgDistanceByHour,
        View::TripsByPassengers,
    ];

    pub fn spec(&self) -> &'static ViewSpec {
        // VIEW_SPECS is laid out in declaration order
        &VIEW_SPECS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Resolve a display name (case-insensitive) or slug
    pub fn resolve(name: &str) -> Result<View> {
        let wanted = name.trim();
        VIEW_SPECS
            .iter()
            .find(|s| s.slug == wanted || s.name.eq_ignore_ascii_case(wanted))
            .map(|s| s.view)
            .ok_or_else(|| DashboardError::UnknownView(name.to_string()))
    }
}

/// Entry of the selection control
#[derive(Debug, Clone, Serialize)]
pub struct ViewEntry {
    pub slug: &'static str,
    pub name: &'static str,
    pub title: &'static str,
}

impl From<&ViewSpec> for ViewEntry {
    fn from(spec: &ViewSpec) -> Self {
        Self {
            slug: spec.slug,
            name: spec.name,
            title: spec.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_specs_line_up_with_views() {
        for (view, spec) in View::ALL.iter().zip(VIEW_SPECS.iter()) {
            assert_eq!(*view, spec.view);
            assert_eq!(view.spec().view, *view);
        }
    }

    #[test]
    fn test_names_and_slugs_are_unique() {
        let names: HashSet<_> = VIEW_SPECS.iter().map(|s| s.name).collect();
        let slugs: HashSet<_> = VIEW_SPECS.iter().map(|s| s.slug).collect();
        assert_eq!(names.len(), 7);
        assert_eq!(slugs.len(), 7);
    }

    #[test]
    fn test_resolve_by_name_and_slug() {
        assert_eq!(View::resolve("Peak pickup hours").unwrap(), View::PeakPickupHours);
        assert_eq!(View::resolve("peak PICKUP hours").unwrap(), View::PeakPickupHours);
        assert_eq!(View::resolve("busiest-days").unwrap(), View::BusiestDays);
    }

    #[test]
    fn test_resolve_unknown_view() {
        let err = View::resolve("Fastest drivers").unwrap_err();
        assert!(matches!(err, DashboardError::UnknownView(name) if name == "Fastest drivers"));
    }

    #[test]
    fn test_only_passenger_views_are_integral() {
        let integral: Vec<View> = View::ALL
            .iter()
            .copied()
            .filter(|v| v.spec().key_domain == KeyDomain::Integral)
            .collect();
        assert_eq!(integral, vec![View::AvgDistanceByPassengers, View::TripsByPassengers]);
    }
}
