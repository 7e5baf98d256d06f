//! Attendance decision logic.
//!
//! Pure functions: the handlers load today's record and the office policy,
//! call in here, then persist whatever was decided. Nothing in this module
//! touches the database or the clock, which is what makes the invariants
//! testable without either.

use chrono::NaiveTime;

use crate::attendance::geo::{self, Coordinates};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, PermissionKind};
use crate::model::office_policy::OfficePolicy;

/// Everything that can make a check-in/check-out attempt invalid. All of
/// these are caller mistakes and map to 4xx at the HTTP layer; none are
/// retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttendanceError {
    #[error("invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("check-in location is {distance_m:.0} m from the office, allowed radius is {allowed_m:.0} m")]
    OutOfRange { distance_m: f64, allowed_m: f64 },

    #[error("already checked in today")]
    AlreadyCheckedIn,

    #[error("already checked out today")]
    AlreadyCheckedOut,

    #[error("no check-in found for today")]
    NoCheckIn,
}

/// Outcome of a valid check-in, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInDecision {
    pub status: AttendanceStatus,
    pub distance_m: f64,
}

/// Decide a check-in attempt.
///
/// Order matters: a duplicate attempt fails with [`AttendanceError::AlreadyCheckedIn`]
/// regardless of coordinates, so that check runs before any geometry. A
/// record that exists without a check-in (permission submitted earlier,
/// admin pre-entry) does not count as checked in.
///
/// Status: at or before the late-tolerance cutoff is `present`, after it is
/// `late`. Exactly at the cutoff counts as on time.
pub fn evaluate_check_in(
    at: NaiveTime,
    coords: Coordinates,
    policy: &OfficePolicy,
    existing: Option<&AttendanceRecord>,
) -> Result<CheckInDecision, AttendanceError> {
    if let Some(record) = existing {
        if record.check_in.is_some() {
            return Err(AttendanceError::AlreadyCheckedIn);
        }
    }

    if !coords.is_valid() {
        return Err(AttendanceError::InvalidCoordinates {
            lat: coords.lat,
            lng: coords.lng,
        });
    }

    let distance_m = geo::distance_meters(coords, policy.office());
    if distance_m > policy.max_distance_m {
        return Err(AttendanceError::OutOfRange {
            distance_m,
            allowed_m: policy.max_distance_m,
        });
    }

    let status = if at <= policy.late_after {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    };

    Ok(CheckInDecision { status, distance_m })
}

/// Decide a check-out attempt. Returns the recorded check-in time so the
/// caller can report the worked duration.
///
/// Deliberately permissive otherwise: no geofence and no time window on the
/// way out — a late checkout from anywhere is still a valid checkout. The
/// status stays whatever check-in fixed it to.
pub fn evaluate_check_out(
    existing: Option<&AttendanceRecord>,
) -> Result<NaiveTime, AttendanceError> {
    let record = existing.ok_or(AttendanceError::NoCheckIn)?;
    let check_in = record.check_in.ok_or(AttendanceError::NoCheckIn)?;

    if record.check_out.is_some() {
        return Err(AttendanceError::AlreadyCheckedOut);
    }

    Ok(check_in)
}

/// Map a self-service absence kind to its status. No coordinates involved;
/// the handler is responsible for demanding the proof file.
pub fn classify_permission(kind: PermissionKind) -> AttendanceStatus {
    match kind {
        PermissionKind::Sick => AttendanceStatus::Sick,
        PermissionKind::Permission => AttendanceStatus::Permission,
    }
}

/// Worked duration in hours, rounded to two decimals. A check-out stamped
/// before the check-in (clock skew) clamps to zero rather than going
/// negative.
pub fn working_hours(check_in: NaiveTime, check_out: NaiveTime) -> f64 {
    let secs = (check_out - check_in).num_seconds().max(0) as f64;
    (secs / 3600.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    /// The reference policy: office in Semarang, 100 m radius, work starts
    /// at 08:00 with a 15-minute late tolerance.
    fn policy() -> OfficePolicy {
        OfficePolicy {
            office_lat: -7.052683,
            office_lng: 110.469375,
            max_distance_m: 100.0,
            work_start: t(8, 0, 0),
            late_after: t(8, 15, 0),
            work_end: t(17, 0, 0),
        }
    }

    fn record(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            intern_id: 42,
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            check_in,
            check_out,
            check_in_lat: check_in.map(|_| -7.052233),
            check_in_lng: check_in.map(|_| 110.469375),
            distance_m: check_in.map(|_| 50.0),
            status: "present".into(),
            notes: None,
            proof_file: None,
        }
    }

    // ~50 m and ~150 m due north of the office.
    const NEAR: Coordinates = Coordinates {
        lat: -7.052233,
        lng: 110.469375,
    };
    const FAR: Coordinates = Coordinates {
        lat: -7.051333,
        lng: 110.469375,
    };

    #[test]
    fn on_time_checkin_within_radius_is_present() {
        let decision = evaluate_check_in(t(8, 10, 0), NEAR, &policy(), None).unwrap();
        assert_eq!(decision.status, AttendanceStatus::Present);
        assert!((decision.distance_m - 50.04).abs() < 0.1);
    }

    #[test]
    fn checkin_after_tolerance_is_late() {
        let decision = evaluate_check_in(t(8, 20, 0), NEAR, &policy(), None).unwrap();
        assert_eq!(decision.status, AttendanceStatus::Late);
    }

    #[test]
    fn exactly_at_cutoff_counts_as_on_time() {
        let decision = evaluate_check_in(t(8, 15, 0), NEAR, &policy(), None).unwrap();
        assert_eq!(decision.status, AttendanceStatus::Present);

        let decision = evaluate_check_in(t(8, 15, 1), NEAR, &policy(), None).unwrap();
        assert_eq!(decision.status, AttendanceStatus::Late);
    }

    #[test]
    fn early_birds_are_present() {
        let decision = evaluate_check_in(t(6, 30, 0), NEAR, &policy(), None).unwrap();
        assert_eq!(decision.status, AttendanceStatus::Present);
    }

    #[test]
    fn outside_radius_fails_at_any_time() {
        for at in [t(8, 0, 0), t(8, 10, 0), t(11, 45, 0)] {
            let err = evaluate_check_in(at, FAR, &policy(), None).unwrap_err();
            match err {
                AttendanceError::OutOfRange {
                    distance_m,
                    allowed_m,
                } => {
                    assert!((distance_m - 150.11).abs() < 0.1);
                    assert_eq!(allowed_m, 100.0);
                }
                other => panic!("expected OutOfRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn far_away_point_is_rejected() {
        let km_away = Coordinates::new(-7.032683, 110.469375);
        let err = evaluate_check_in(t(8, 0, 0), km_away, &policy(), None).unwrap_err();
        assert!(matches!(err, AttendanceError::OutOfRange { .. }));
    }

    #[test]
    fn second_checkin_fails_regardless_of_coordinates() {
        let existing = record(Some(t(8, 1, 0)), None);

        // Good coordinates, garbage coordinates, far coordinates: the
        // duplicate guard wins every time.
        for coords in [NEAR, FAR, Coordinates::new(f64::NAN, 10.0)] {
            let err = evaluate_check_in(t(9, 0, 0), coords, &policy(), Some(&existing));
            assert_eq!(err.unwrap_err(), AttendanceError::AlreadyCheckedIn);
        }
    }

    #[test]
    fn checkin_fills_a_record_that_has_no_checkin_yet() {
        // e.g. a permission was submitted in the morning, then the intern
        // showed up anyway.
        let mut existing = record(None, None);
        existing.status = "permission".into();
        existing.proof_file = Some("uploads/letter.pdf".into());

        let decision =
            evaluate_check_in(t(9, 0, 0), NEAR, &policy(), Some(&existing)).unwrap();
        assert_eq!(decision.status, AttendanceStatus::Late);
    }

    #[test]
    fn invalid_coordinates_are_rejected_before_any_distance_math() {
        for (lat, lng) in [
            (91.0, 0.0),
            (-90.5, 0.0),
            (0.0, 181.0),
            (0.0, -180.001),
            (f64::NAN, 110.0),
            (-7.05, f64::NEG_INFINITY),
        ] {
            let err =
                evaluate_check_in(t(8, 0, 0), Coordinates::new(lat, lng), &policy(), None)
                    .unwrap_err();
            assert!(
                matches!(err, AttendanceError::InvalidCoordinates { .. }),
                "({lat}, {lng}) gave {err:?}"
            );
        }
    }

    #[test]
    fn checkout_without_any_record_fails() {
        assert_eq!(
            evaluate_check_out(None).unwrap_err(),
            AttendanceError::NoCheckIn
        );
    }

    #[test]
    fn checkout_against_a_checkinless_record_fails() {
        // Permission records have no check-in; nothing to check out from.
        let existing = record(None, None);
        assert_eq!(
            evaluate_check_out(Some(&existing)).unwrap_err(),
            AttendanceError::NoCheckIn
        );
    }

    #[test]
    fn double_checkout_fails() {
        let existing = record(Some(t(8, 0, 0)), Some(t(17, 30, 0)));
        assert_eq!(
            evaluate_check_out(Some(&existing)).unwrap_err(),
            AttendanceError::AlreadyCheckedOut
        );
    }

    #[test]
    fn checkout_returns_the_checkin_time() {
        let existing = record(Some(t(8, 3, 20)), None);
        assert_eq!(evaluate_check_out(Some(&existing)).unwrap(), t(8, 3, 20));
    }

    #[test]
    fn permission_kinds_map_to_their_statuses() {
        assert_eq!(
            classify_permission(PermissionKind::Sick),
            AttendanceStatus::Sick
        );
        assert_eq!(
            classify_permission(PermissionKind::Permission),
            AttendanceStatus::Permission
        );
    }

    #[test]
    fn working_hours_are_rounded_to_two_decimals() {
        assert_eq!(working_hours(t(8, 0, 0), t(17, 30, 0)), 9.5);
        assert_eq!(working_hours(t(8, 12, 34), t(16, 47, 11)), 8.58);
        assert_eq!(working_hours(t(9, 0, 0), t(9, 0, 0)), 0.0);
    }

    #[test]
    fn working_hours_clamp_instead_of_going_negative() {
        assert_eq!(working_hours(t(17, 0, 0), t(8, 0, 0)), 0.0);
    }
}
