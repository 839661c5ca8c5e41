//! Event formatting with logger attributes.
//!
//! [`AttrsFormat`] wraps one of `tracing-subscriber`'s stock formatters. The
//! record is formatted into a buffer first, then the emitting logger's
//! attributes are added: as typed top-level keys of the JSON object, or as
//! trailing `key=value` pairs on a text line.

use crate::attrs::{self, Attrs};
use crate::handler::Format;
use serde_json::{Map, Value};
use std::fmt::{self, Write as _};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::registry::LookupSpan;

pub(crate) struct AttrsFormat<F> {
    inner: F,
    format: Format,
}

impl<F> AttrsFormat<F> {
    pub(crate) fn new(inner: F, format: Format) -> Self {
        Self { inner, format }
    }
}

impl<S, N, F> FormatEvent<S, N> for AttrsFormat<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let attrs = match attrs::current() {
            Some(attrs) if !attrs.is_empty() => attrs,
            _ => return self.inner.format_event(ctx, writer, event),
        };

        // colours, if any, are configured on the inner format
        let mut buffer = String::new();
        self.inner.format_event(ctx, Writer::new(&mut buffer), event)?;

        let line = match self.format {
            Format::Json => merge_json(&buffer, &attrs),
            Format::Text => append_text(&buffer, &attrs),
        };
        writer.write_str(&line)
    }
}

/// Adds each attribute as a top-level key. Fields of the event itself win
/// over logger attributes with the same key.
fn merge_json(record: &str, attrs: &Attrs) -> String {
    let mut object: Map<String, Value> = match serde_json::from_str(record.trim_end()) {
        Ok(object) => object,
        Err(_) => return record.to_string(),
    };
    for attr in attrs.iter() {
        if !object.contains_key(&attr.key) {
            object.insert(attr.key.clone(), attr.value.clone());
        }
    }
    match serde_json::to_string(&object) {
        Ok(mut line) => {
            line.push('\n');
            line
        }
        Err(_) => record.to_string(),
    }
}

fn append_text(record: &str, attrs: &Attrs) -> String {
    let body = record.strip_suffix('\n').unwrap_or(record);
    format!("{body} {attrs}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Attr;
    use serde_json::json;

    fn sample() -> Attrs {
        Attrs::default().merged([
            Attr::new("user", 9),
            Attr::new("a=b", "x y"),
            Attr::new("tags", vec![1, 2]),
        ])
    }

    #[test]
    fn json_attrs_become_typed_fields() {
        let line = merge_json("{\"level\":\"INFO\",\"message\":\"hi\"}\n", &sample());
        assert!(line.ends_with('\n'));

        let record: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(record["message"], "hi");
        assert_eq!(record["user"], 9);
        assert_eq!(record["a=b"], "x y");
        assert_eq!(record["tags"], json!([1, 2]));
        assert!(record.get("attrs").is_none());
    }

    #[test]
    fn event_fields_win_over_attrs() {
        let line = merge_json("{\"user\":1}\n", &sample());
        let record: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(record["user"], 1);
    }

    #[test]
    fn unparseable_record_is_left_alone() {
        assert_eq!(merge_json("not json\n", &sample()), "not json\n");
    }

    #[test]
    fn text_attrs_trail_the_line() {
        let line = append_text("INFO app: hi\n", &sample());
        assert_eq!(line, "INFO app: hi user=9 \"a=b\"=\"x y\" tags=[1,2]\n");
    }
}
