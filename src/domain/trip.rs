// Trip record domain model
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::scalar::Scalar;

/// Fields of a trip document that pipelines can group or aggregate on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripField {
    PickupTime,
    DropoffTime,
    TripDistance,
    PassengerCount,
    PaymentType,
    TotalAmount,
}

impl TripField {
    /// Field name as stored in the trip collection
    pub fn document_key(&self) -> &'static str {
        match self {
            TripField::PickupTime => "tpep_pickup_datetime",
            TripField::DropoffTime => "tpep_dropoff_datetime",
            TripField::TripDistance => "trip_distance",
            TripField::PassengerCount => "passenger_count",
            TripField::PaymentType => "payment_type",
            TripField::TotalAmount => "total_amount",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripRecord {
    #[serde(default, rename = "tpep_pickup_datetime")]
    pub pickup_time: Option<DateTime<Utc>>,
    #[serde(default, rename = "tpep_dropoff_datetime")]
    pub dropoff_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trip_distance: Option<f64>,
    #[serde(default)]
    pub passenger_count: Option<f64>,
    #[serde(default)]
    pub payment_type: Option<i64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

impl TripRecord {
    pub fn timestamp(&self, field: TripField) -> Option<DateTime<Utc>> {
        match field {
            TripField::PickupTime => self.pickup_time,
            TripField::DropoffTime => self.dropoff_time,
            _ => None,
        }
    }

    /// Numeric value of a field; timestamps and missing values yield None
    pub fn numeric(&self, field: TripField) -> Option<f64> {
        match field {
            TripField::TripDistance => self.trip_distance,
            TripField::PassengerCount => self.passenger_count,
            TripField::PaymentType => self.payment_type.map(|p| p as f64),
            TripField::TotalAmount => self.total_amount,
            TripField::PickupTime | TripField::DropoffTime => None,
        }
    }

    /// Raw field value as it would appear as a grouping key
    pub fn scalar(&self, field: TripField) -> Scalar {
        match field {
            TripField::PaymentType => self.payment_type.map(Scalar::Int).unwrap_or(Scalar::Null),
            TripField::PickupTime | TripField::DropoffTime => self
                .timestamp(field)
                .map(|t| Scalar::Text(t.to_rfc3339()))
                .unwrap_or(Scalar::Null),
            _ => self.numeric(field).map(Scalar::Float).unwrap_or(Scalar::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let json = r#"{"tpep_pickup_datetime": "2024-01-03T14:05:00Z", "trip_distance": 1.5}"#;
        let trip: TripRecord = serde_json::from_str(json).unwrap();

        assert!(trip.pickup_time.is_some());
        assert_eq!(trip.numeric(TripField::TripDistance), Some(1.5));
        assert_eq!(trip.scalar(TripField::PassengerCount), Scalar::Null);
        assert_eq!(trip.timestamp(TripField::DropoffTime), None);
    }

    #[test]
    fn test_payment_type_is_integral_key() {
        let trip = TripRecord {
            payment_type: Some(2),
            ..Default::default()
        };
        assert_eq!(trip.scalar(TripField::PaymentType), Scalar::Int(2));
    }
}
