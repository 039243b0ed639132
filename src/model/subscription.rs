use std::sync::LazyLock;

use super::{record_entity, HEX_ID};
use crate::data::{FieldSpec, Record, Schema};

/// Time-of-day format for the active window, `HHMM`
const TIME_OF_DAY: &str = "(2[0-4]|[0-1][0-9])[0-5][0-9]";

pub static SUBSCRIPTION_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let time = || {
        FieldSpec::string()
            .with_format(TIME_OF_DAY)
            .expect("valid time-of-day regex")
    };

    Schema::builder("subscription")
        .field(
            "id",
            FieldSpec::string().with_format(HEX_ID).expect("valid id regex"),
        )
        .field("target", FieldSpec::string())
        .field("type", FieldSpec::string())
        .field("ignoreWarn", FieldSpec::boolean())
        .field("ignoreError", FieldSpec::boolean())
        .field("ignoreOk", FieldSpec::boolean())
        .field("notifyOnWarn", FieldSpec::boolean())
        .field("notifyOnError", FieldSpec::boolean())
        .field("notifyOnOk", FieldSpec::boolean())
        .field("fromTime", time())
        .field("toTime", time())
        .field("su", FieldSpec::boolean())
        .field("mo", FieldSpec::boolean())
        .field("tu", FieldSpec::boolean())
        .field("we", FieldSpec::boolean())
        .field("th", FieldSpec::boolean())
        .field("fr", FieldSpec::boolean())
        .field("sa", FieldSpec::boolean())
        .field("enabled", FieldSpec::boolean())
        .build()
});

/// Notification rule attached to a check
#[derive(Debug, Clone)]
pub struct Subscription {
    record: Record,
}

record_entity!(Subscription, SUBSCRIPTION_SCHEMA);

impl Subscription {
    pub fn id(&self) -> Option<&str> {
        self.record.get_str("id")
    }
}
