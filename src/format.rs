//! Record layout for sink output
//!
//! Every sink renders a record as a timestamp, a level, the message and the
//! record's [`Fields`](crate::Fields) as first-class keys:
//!
//! ```text
//! 2026-10-15T08:30:00.000000Z  WARN slow login user=a attempt=3
//! {"timestamp":"2026-10-15T08:30:00.000000Z","level":"WARN","message":"slow login","attempt":3,"user":"a"}
//! ```
//!
//! A field whose key collides with `timestamp`, `level` or `message` is kept
//! under `fields.<key>`.

use std::fmt::{self, Write as FmtWrite};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::level::Format;

/// Event field carrying a record's annotations as a compact JSON object
pub(crate) const FIELDS_KEY: &str = "fields";

const RESERVED_KEYS: [&str; 3] = ["timestamp", "level", "message"];

/// Event formatter for one sink
#[derive(Debug, Clone, Copy)]
pub struct RecordFormat {
    format: Format,
}

impl RecordFormat {
    pub fn new(format: Format) -> Self {
        Self { format }
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let level = *event.metadata().level();
        let fields = visitor.fields();

        match self.format {
            Format::Json => {
                let mut record = Map::new();
                record.insert("timestamp".into(), Value::String(timestamp));
                record.insert("level".into(), Value::String(level.as_str().into()));
                record.insert("message".into(), Value::String(visitor.message));
                for (key, value) in fields {
                    record.insert(field_key(key), value);
                }
                let line = serde_json::to_string(&record).map_err(|_| fmt::Error)?;
                writeln!(writer, "{}", line)
            }
            Format::Text => {
                write!(writer, "{} ", timestamp)?;
                if writer.has_ansi_escapes() {
                    write!(writer, "\x1b[{}m{:>5}\x1b[0m", level_colour(level), level)?;
                } else {
                    write!(writer, "{:>5}", level)?;
                }
                write!(writer, " {}", visitor.message)?;
                for (key, value) in fields {
                    write!(writer, " {}={}", field_key(key), text_value(&value))?;
                }
                writeln!(writer)
            }
        }
    }
}

fn field_key(key: String) -> String {
    if RESERVED_KEYS.contains(&key.as_str()) {
        format!("{}.{}", FIELDS_KEY, key)
    } else {
        key
    }
}

fn level_colour(level: Level) -> &'static str {
    match level {
        Level::ERROR => "31",
        Level::WARN => "33",
        Level::INFO => "32",
        Level::DEBUG => "34",
        _ => "35",
    }
}

/// Render a field value for text output, quoting strings only when needed
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() && s.chars().all(is_bare_char) => s.clone(),
        other => other.to_string(),
    }
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._/@^+:".contains(c)
}

/// Collects the message and field payload of an event
#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Option<String>,
    other: Map<String, Value>,
}

impl RecordVisitor {
    /// Annotations in key order followed by any other event fields
    fn fields(&mut self) -> Map<String, Value> {
        let mut fields = match self.fields.take() {
            Some(raw) => match serde_json::from_str::<Map<String, Value>>(&raw) {
                Ok(map) => map,
                Err(_) => {
                    let mut map = Map::new();
                    map.insert(FIELDS_KEY.into(), Value::String(raw));
                    map
                }
            },
            None => Map::new(),
        };
        fields.append(&mut self.other);
        fields
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);
        self.record_str(field, &buf);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            FIELDS_KEY => self.fields = Some(value.to_string()),
            name => {
                self.other
                    .insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.other
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.other
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.other
            .insert(field.name().to_string(), Value::Bool(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key_prefixes_reserved_names() {
        assert_eq!(field_key("user".into()), "user");
        assert_eq!(field_key("level".into()), "fields.level");
        assert_eq!(field_key("message".into()), "fields.message");
    }

    #[test]
    fn test_text_value_quotes_when_needed() {
        assert_eq!(text_value(&Value::from("a")), "a");
        assert_eq!(text_value(&Value::from("10.0.0.1:80")), "10.0.0.1:80");
        assert_eq!(text_value(&Value::from("two words")), r#""two words""#);
        assert_eq!(text_value(&Value::from("")), r#""""#);
        assert_eq!(text_value(&Value::from(3)), "3");
        assert_eq!(text_value(&Value::from(true)), "true");
    }
}
