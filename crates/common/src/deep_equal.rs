use serde_json::Value;


/// Structural equality over JSON values.
///
/// Objects compare by own keys regardless of order; a differing key count
/// short-circuits to unequal before any member is visited. Arrays compare
/// element-wise. Numbers compare by numeric value, so `1` equals `1.0`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Object(a), Value::Object(b)) => {
			if a.len() != b.len() {
				return false;
			}
			a.iter()
				.all(|(key, left)| b.get(key).is_some_and(|right| deep_equal(left, right)))
		}
		(Value::Array(a), Value::Array(b)) => {
			a.len() == b.len() && a.iter().zip(b).all(|(left, right)| deep_equal(left, right))
		}
		(Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
			(Some(x), Some(y)) => x == y,
			_ => a == b,
		},
		_ => a == b,
	}
}
