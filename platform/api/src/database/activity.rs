use chrono::{DateTime, Duration, Utc};

/// How far back the activity feed looks.
pub fn activity_window() -> Duration {
	Duration::days(30)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
	Create,
	Update,
}

/// Buckets a collection for the activity feed.
///
/// A collection created inside the window is an update when it changed after
/// it was created, otherwise a create. An older collection only shows up as an
/// update, and only if it changed inside the window. A collection created
/// exactly at the window edge is skipped.
pub fn classify_activity(created_at: DateTime<Utc>, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Activity> {
	let window = activity_window();
	let since_created = now - created_at;
	let since_updated = now - updated_at;

	if since_created < window {
		if since_updated < since_created {
			Some(Activity::Update)
		} else {
			Some(Activity::Create)
		}
	} else if since_created > window && since_updated < window {
		Some(Activity::Update)
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(days_ago: i64, now: DateTime<Utc>) -> DateTime<Utc> {
		now - Duration::days(days_ago)
	}

	#[test]
	fn test_recent_collections() {
		let now = Utc::now();

		assert_eq!(classify_activity(at(3, now), at(3, now), now), Some(Activity::Create));
		assert_eq!(classify_activity(at(3, now), at(1, now), now), Some(Activity::Update));
	}

	#[test]
	fn test_old_collections() {
		let now = Utc::now();

		assert_eq!(classify_activity(at(45, now), at(2, now), now), Some(Activity::Update));
		assert_eq!(classify_activity(at(45, now), at(40, now), now), None);
		assert_eq!(classify_activity(at(45, now), at(45, now), now), None);
	}

	#[test]
	fn test_window_edge() {
		let now = Utc::now();

		assert_eq!(classify_activity(now - activity_window(), now, now), None);
	}
}
