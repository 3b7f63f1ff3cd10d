//! Admin API Entity Types
//!
//! Wire shapes for every resource the console reads or mutates. Field names
//! match the backend's snake_case JSON exactly; optional fields mirror what
//! the API actually omits rather than what would be convenient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform user (rider or driver)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub id_verified: bool,
    pub banned: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Identity-verification submission awaiting review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingVerification {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub id_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
}

/// Ride lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Active,
    Full,
    Ongoing,
    Completed,
    Cancelled,
    Disputed,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Active => "active",
            RideStatus::Full => "full",
            RideStatus::Ongoing => "ongoing",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
            RideStatus::Disputed => "disputed",
        }
    }
}

/// Passenger or driver attached to a ride
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideParticipant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_driver: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: u64,
    pub driver_id: u64,
    pub from_address: String,
    pub to_address: String,
    pub total_seats: u32,
    pub seats_available: u32,
    pub departure_time: Option<DateTime<Utc>>,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
    pub plate_number: String,
    pub color: String,
    pub brand_name: String,
    pub price_per_seat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<RideParticipant>>,
}

/// In-ride chat message (read-only to operators)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideMessage {
    pub id: u64,
    pub ride_id: u64,
    pub sender_id: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideStats {
    #[serde(rename = "totalRides")]
    pub total_rides: u64,
    #[serde(rename = "activeRides")]
    pub active_rides: u64,
    #[serde(rename = "completedRides")]
    pub completed_rides: u64,
    #[serde(rename = "cancelledRides")]
    pub cancelled_rides: u64,
    #[serde(rename = "disputedRides")]
    pub disputed_rides: u64,
    #[serde(rename = "averageSeats")]
    pub average_seats: f64,
}

/// Abuse report filed against a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: u64,
    pub reporter_id: u64,
    pub reported_user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_id: Option<u64>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

/// Escrowed payment for a ride
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub ride_id: u64,
    pub driver_id: u64,
    pub driver_email: String,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
}

/// Partner company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// SOS alert record (historic list; live alerts arrive over the realtime channel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosAlert {
    pub id: u64,
    pub ride_id: u64,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Tunable global platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub id: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "maxRideDistance")]
    pub max_ride_distance: f64,
    #[serde(rename = "commissionRate")]
    pub commission_rate: f64,
    #[serde(rename = "supportEmail")]
    pub support_email: String,
}

/// Patch body for config updates; only set fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlatformConfigUpdate {
    #[serde(rename = "maxRideDistance", skip_serializing_if = "Option::is_none")]
    pub max_ride_distance: Option<f64>,
    #[serde(rename = "commissionRate", skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
    #[serde(rename = "supportEmail", skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalUsers")]
    pub total_users: u64,
    #[serde(rename = "activeRides")]
    pub active_rides: u64,
    #[serde(rename = "pendingVerifications")]
    pub pending_verifications: u64,
    pub reports: u64,
    #[serde(rename = "rideStats")]
    pub ride_stats: RideStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStats {
    pub period: String,
    #[serde(rename = "totalPayments")]
    pub total_payments: u64,
    #[serde(rename = "successfulPayments")]
    pub successful_payments: u64,
    #[serde(rename = "pendingPayments")]
    pub pending_payments: u64,
    #[serde(rename = "failedPayments")]
    pub failed_payments: u64,
    #[serde(rename = "refundedPayments")]
    pub refunded_payments: u64,
    #[serde(rename = "expiredPayments")]
    pub expired_payments: u64,
    #[serde(rename = "totalRevenue")]
    pub total_revenue: f64,
    #[serde(rename = "totalPaidOut")]
    pub total_paid_out: f64,
    #[serde(rename = "platformRevenue")]
    pub platform_revenue: f64,
    #[serde(rename = "averagePaymentAmount")]
    pub average_payment_amount: f64,
}

/// Upstream dependency health probe results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    pub database: String,
    pub maps_api: String,
    pub payment_gateway: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_with_optional_fields_absent() {
        let json = r#"{
            "id": 7, "first_name": "Abel", "last_name": "Tesfaye",
            "email": "abel@example.com", "phone_number": null,
            "created_at": "2025-03-01T08:00:00Z",
            "email_verified": true, "phone_verified": false,
            "id_verified": false, "banned": false, "is_admin": false
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "Abel Tesfaye");
        assert!(user.age.is_none());
        assert!(user.phone_number.is_none());
    }

    #[test]
    fn test_ride_status_round_trip() {
        let ride_json = r#""disputed""#;
        let status: RideStatus = serde_json::from_str(ride_json).unwrap();
        assert_eq!(status, RideStatus::Disputed);
        assert_eq!(status.as_str(), "disputed");
        assert_eq!(serde_json::to_string(&status).unwrap(), ride_json);
    }

    #[test]
    fn test_config_update_sends_only_set_fields() {
        let patch = PlatformConfigUpdate {
            commission_rate: Some(0.12),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "commissionRate": 0.12 }));
    }
}
