//! Key/value attributes carried by a logger.
//!
//! While a logger emits, its attributes are published for the current thread
//! so the event formatter can write them as record fields.

use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

thread_local! {
    static CURRENT: RefCell<Option<Arc<Attrs>>> = const { RefCell::new(None) };
}

/// A single key/value pair attached to every record of a logger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// Build an attribute from any serializable value. Values that fail to
    /// serialize are recorded as null.
    pub fn new(key: impl Into<String>, value: impl Serialize) -> Self {
        Self {
            key: key.into(),
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }
}

impl<K: Into<String>, V: Serialize> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}

/// Ordered attribute set with unique keys, rendered once as `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<Attr>,
    rendered: String,
}

impl Attrs {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    /// Returns a new set with `attrs` merged in order. A key that is already
    /// present keeps its position and takes the newer value.
    pub fn merged<I>(&self, attrs: I) -> Attrs
    where
        I: IntoIterator<Item = Attr>,
    {
        let mut entries = self.entries.clone();
        for attr in attrs {
            match entries.iter_mut().find(|e| e.key == attr.key) {
                Some(existing) => existing.value = attr.value,
                None => entries.push(attr),
            }
        }
        let rendered = render(&entries);
        Attrs { entries, rendered }
    }
}

/// Run `f` with `attrs` as the current thread's attributes, restoring the
/// previous ones afterwards.
pub(crate) fn scoped<T>(attrs: &Arc<Attrs>, f: impl FnOnce() -> T) -> T {
    let previous = CURRENT.with(|current| current.replace(Some(Arc::clone(attrs))));
    let _restore = Restore(previous);
    f()
}

/// The attributes of the logger emitting on this thread, if any.
pub(crate) fn current() -> Option<Arc<Attrs>> {
    CURRENT
        .try_with(|current| current.borrow().clone())
        .ok()
        .flatten()
}

struct Restore(Option<Arc<Attrs>>);

impl Drop for Restore {
    fn drop(&mut self) {
        let previous = self.0.take();
        let _ = CURRENT.try_with(|current| *current.borrow_mut() = previous);
    }
}

fn render(entries: &[Attr]) -> String {
    let mut out = String::new();
    for (i, attr) in entries.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        push_token(&mut out, &attr.key);
        out.push('=');
        match &attr.value {
            Value::String(s) => push_token(&mut out, s),
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

/// Bare when unambiguous, otherwise a JSON string literal.
fn push_token(out: &mut String, token: &str) {
    if is_bare(token) {
        out.push_str(token);
    } else {
        out.push_str(&Value::from(token).to_string());
    }
}

fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control())
}

impl fmt::Display for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_appends_in_order() {
        let attrs = Attrs::default().merged([
            Attr::new("request_id", "abc"),
            Attr::new("attempt", 2),
        ]);
        let keys: Vec<_> = attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["request_id", "attempt"]);
        assert_eq!(attrs.to_string(), "request_id=abc attempt=2");
    }

    #[test]
    fn later_duplicate_keys_override() {
        let attrs = Attrs::default().merged([
            Attr::new("user", "alice"),
            Attr::new("tenant", 7),
            Attr::new("user", "bob"),
        ]);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("user"), Some(&json!("bob")));
        assert_eq!(attrs.to_string(), "user=bob tenant=7");
    }

    #[test]
    fn merge_leaves_source_untouched() {
        let base = Attrs::default().merged([Attr::new("service", "api")]);
        let derived = base.merged([Attr::new("service", "worker"), Attr::new("id", 1)]);
        assert_eq!(base.len(), 1);
        assert_eq!(base.get("service"), Some(&json!("api")));
        assert_eq!(derived.get("service"), Some(&json!("worker")));
    }

    #[test]
    fn renders_non_bare_values_as_json() {
        let attrs = Attrs::default().merged([
            Attr::new("msg", "two words"),
            Attr::new("empty", ""),
            Attr::new("tags", vec!["a", "b"]),
            ("ok", true).into(),
        ]);
        assert_eq!(
            attrs.to_string(),
            r#"msg="two words" empty="" tags=["a","b"] ok=true"#
        );
    }

    #[test]
    fn ambiguous_keys_are_quoted() {
        let attrs = Attrs::default().merged([
            Attr::new("a=b", "x y"),
            Attr::new("", 1),
            Attr::new("plain", "v"),
        ]);
        assert_eq!(attrs.to_string(), r#""a=b"="x y" ""=1 plain=v"#);
    }

    #[test]
    fn scoped_attrs_are_restored() {
        let outer = Arc::new(Attrs::default().merged([Attr::new("scope", "outer")]));
        let inner = Arc::new(Attrs::default().merged([Attr::new("scope", "inner")]));
        assert!(current().is_none());

        scoped(&outer, || {
            scoped(&inner, || {
                assert_eq!(current().unwrap().get("scope"), Some(&json!("inner")));
            });
            assert_eq!(current().unwrap().get("scope"), Some(&json!("outer")));
        });
        assert!(current().is_none());
    }
}
