use crate::adapters::dom::Document;
use crate::core::path::resolve;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{Node, Selector};
use serde_json::Value;
use std::borrow::Cow;

// ASCII 字元類別，不使用 Unicode \w
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_\-.$]+)\}").expect("placeholder pattern is valid")
});

/// Elements whose text children are never rewritten.
const SKIPPED_PARENTS: &[&str] = &["script", "style"];

/// 將 `data` 綁定到 `root` 底下所有文字節點的 `{path}` 佔位符
///
/// `root = None` binds against `<body>`. When the root cannot be found the
/// call does nothing. Only text content changes; elements and attributes are
/// left as they are.
pub fn bind_data(data: &Value, document: &mut Document, root: Option<&Selector>) {
    let Some(root_element) = document.root(root) else {
        tracing::warn!("bind_data: root element not found, nothing to bind");
        return;
    };

    // 先收集所有文字節點，再逐一修改
    let text_nodes: Vec<_> = root_element
        .descendants()
        .filter(|node| match node.value() {
            Node::Text(text) => text.contains('{'),
            _ => false,
        })
        .filter(|node| {
            node.parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .map_or(true, |name| !SKIPPED_PARENTS.contains(&name))
        })
        .map(|node| node.id())
        .collect();

    let mut replaced = 0usize;
    let tree = &mut document.tree_mut().tree;

    for id in text_nodes {
        let Some(mut node) = tree.get_mut(id) else {
            continue;
        };
        let Node::Text(text) = node.value() else {
            continue;
        };
        let bound = match substitute(&text.text, data) {
            Cow::Owned(bound) => bound,
            Cow::Borrowed(_) => continue,
        };
        text.text = bound.into();
        replaced += 1;
    }

    tracing::debug!("bind_data: rewrote {} text node(s)", replaced);
}

/// 單次全域替換；沒有任何佔位符時回傳 `Cow::Borrowed`
pub fn substitute<'t>(text: &'t str, data: &Value) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures| {
        let path = &caps[1];
        let path = path.strip_prefix("v.").unwrap_or(path);
        render(resolve(data, path))
    })
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(value @ (Value::Object(_) | Value::Array(_))) => {
            serde_json::to_string(value).unwrap_or_default()
        }
        Some(other) => other.to_string(),
    }
}
