use serde_json::Value;

/// 以 `.` 分隔的路徑取出巢狀值，例如 `address.city`
///
/// Objects are indexed by key and arrays by numeric segment. A miss anywhere
/// along the path returns `None`; a path ending on an explicit `null` returns
/// `Some(&Value::Null)`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if root.is_null() || path.is_empty() {
        return None;
    }

    path.split('.').try_fold(root, |acc, key| match acc {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
