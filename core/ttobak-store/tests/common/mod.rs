#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use ttobak_types::UserId;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
}

pub fn user(n: u8) -> UserId {
    UserId::parse(&format!("00000000-0000-4000-8000-0000000000{n:02}")).unwrap()
}
