pub mod booking;
pub mod lab;
pub mod notification;
pub mod timetable;
pub mod user;
pub mod weekend;

pub use booking::{BookRequest, Booking, BookingWithUser, ReleaseRequest};
pub use lab::{Lab, LabRequest};
pub use notification::{NewNotificationRequest, Notification, NotificationQuery};
pub use timetable::{AdminSlotView, BlockRequest, SlotStatus, SlotView, TemplateSlot};
pub use user::{
    ChangePasswordRequest, LoginRequest, LoginResponse, NewUserRequest, RequesterBody,
    UpdateUserRequest, User, UserSummary,
};
pub use weekend::{
    OverrideType, WeekendConfigResponse, WeekendDayConfig, WeekendDefault,
    WeekendDefaultRequest, WeekendGlobalResponse, WeekendOverride, WeekendOverrideRequest,
    WeekendOverrideSummary,
};

use serde_json::Value;

/// The front end sends ids either as JSON numbers or numeric strings.
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_from_value() {
        assert_eq!(int_from_value(&json!(12)), Some(12));
        assert_eq!(int_from_value(&json!(" 7 ")), Some(7));
        assert_eq!(int_from_value(&json!("abc")), None);
        assert_eq!(int_from_value(&json!(1.5)), None);
        assert_eq!(int_from_value(&Value::Null), None);
    }
}
