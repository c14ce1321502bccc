//! JSON line record format

use serde_json::{Map, Number, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Timestamp layout of every record (local time)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field carrying the facade's severity name (`fatal` has no engine level)
pub const SEVERITY_FIELD: &str = "severity";
/// Field carrying the `file:line` of the logging call
pub const CALLER_FIELD: &str = "caller";

/// One JSON object per line:
/// `timestamp`, `level`, `message`, `caller`, then the event's other fields
/// in the order they were recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRecordFormat;

impl<S, N> FormatEvent<S, N> for JsonRecordFormat
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

        let metadata = event.metadata();
        let level = visitor
            .severity
            .take()
            .unwrap_or_else(|| metadata.level().as_str().to_lowercase());
        let caller = visitor.caller.take().unwrap_or_else(|| {
            format!(
                "{}:{}",
                metadata.file().unwrap_or("<unknown>"),
                metadata.line().unwrap_or(0)
            )
        });

        let mut record = Map::new();
        record.insert(
            "timestamp".to_string(),
            Value::String(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
        );
        record.insert("level".to_string(), Value::String(level));
        record.insert(
            "message".to_string(),
            Value::String(visitor.message.take().unwrap_or_default()),
        );
        record.insert("caller".to_string(), Value::String(caller));
        for (name, value) in visitor.fields {
            record.entry(name).or_insert(value);
        }

        let json = serde_json::to_string(&Value::Object(record)).map_err(|_| fmt::Error)?;
        writeln!(writer, "{}", json)
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    severity: Option<String>,
    caller: Option<String>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            SEVERITY_FIELD => self.severity = Some(value.to_string()),
            CALLER_FIELD => self.caller = Some(value.to_string()),
            _ => self.insert(field, Value::String(value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match Number::from_f64(value) {
            Some(number) => self.insert(field, Value::Number(number)),
            None => self.insert(field, Value::String(value.to_string())),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }
}
