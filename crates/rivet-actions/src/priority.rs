/// Well-known listener priorities. Higher values are notified first.
pub struct ListenerPriority;

impl ListenerPriority {
	pub const LOWEST: i32 = 0;
	pub const LOW: i32 = 250;
	pub const MEDIUM: i32 = 500;
	pub const HIGH: i32 = 750;
	pub const HIGHEST: i32 = 1000;
}

/// Name of a well-known priority, or `"UNKNOWN"` for any other value.
pub fn priority_name(priority: i32) -> &'static str {
	match priority {
		ListenerPriority::LOWEST => "LOWEST",
		ListenerPriority::LOW => "LOW",
		ListenerPriority::MEDIUM => "MEDIUM",
		ListenerPriority::HIGH => "HIGH",
		ListenerPriority::HIGHEST => "HIGHEST",
		_ => "UNKNOWN",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, "LOWEST")]
	#[case(250, "LOW")]
	#[case(500, "MEDIUM")]
	#[case(750, "HIGH")]
	#[case(1000, "HIGHEST")]
	#[case(501, "UNKNOWN")]
	#[case(-1, "UNKNOWN")]
	fn names_known_priorities(#[case] priority: i32, #[case] expected: &str) {
		assert_eq!(priority_name(priority), expected);
	}
}
