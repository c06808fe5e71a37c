use crate::transform::token::TokenSource;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Days, NaiveDate, Utc};
use model::core::{mask_type::MaskType, value::Value};

pub const DATE_OFFSET_DAYS: u64 = 200;
pub const PHONE_PLACEHOLDER: &str = "12345";
pub const INTEGER_PLACEHOLDER: i64 = 5;
pub const EMAIL_DOMAIN: &str = "dummy.com";
pub const TEXT_PREFIX: &str = "test";

/// The masking policy: one replacement per value type, evaluated against a
/// single clock reading so a chunk gets consistent dates.
#[derive(Debug, Clone, Copy)]
pub struct MaskRules {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl MaskRules {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.date_naive(),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn masked_date(&self) -> NaiveDate {
        self.today
            .checked_sub_days(Days::new(DATE_OFFSET_DAYS))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn masked_decimal() -> BigDecimal {
        BigDecimal::from(5).with_scale(2)
    }

    pub fn value_for(&self, value_type: MaskType, tokens: &dyn TokenSource) -> Value {
        match value_type {
            MaskType::Date => Value::Date(self.masked_date()),
            MaskType::Email => Value::String(format!(
                "{TEXT_PREFIX}{}@{EMAIL_DOMAIN}",
                tokens.next_token()
            )),
            MaskType::Boolean => Value::Boolean(false),
            MaskType::Phone => Value::String(PHONE_PLACEHOLDER.to_string()),
            MaskType::Decimal => Value::Decimal(Self::masked_decimal()),
            MaskType::DateTime => Value::Timestamp(self.now),
            MaskType::Integer => Value::Int(INTEGER_PLACEHOLDER),
            MaskType::Text => Value::String(format!("{TEXT_PREFIX}{}", tokens.next_token())),
        }
    }
}
