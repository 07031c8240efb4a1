use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::get_field;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static PASSPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9]{6,9}$").expect("passport pattern compiles"));
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("card number pattern compiles"));
static EXPIRY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("expiry date pattern compiles")
});
static CVV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("cvv pattern compiles"));
static BOLETO_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{11}$|^\d{14}$").expect("document pattern compiles"));
static BOLETO_ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("zip code pattern compiles"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Named formats a text field can be required to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// 6 to 9 letters or digits, any case.
    Passport,
    CardNumber,
    /// `MM/YY`
    ExpiryDate,
    Cvv,
    /// CPF (11 digits) or CNPJ (14 digits).
    BoletoDocument,
    /// `00000-000`, dash optional.
    BoletoZipCode,
}

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Passport => &PASSPORT,
            Pattern::CardNumber => &CARD_NUMBER,
            Pattern::ExpiryDate => &EXPIRY_DATE,
            Pattern::Cvv => &CVV,
            Pattern::BoletoDocument => &BOLETO_DOCUMENT,
            Pattern::BoletoZipCode => &BOLETO_ZIP_CODE,
        }
    }

    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        self.regex().is_match(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Min(i64),
    Max(i64),
    Pattern(Pattern),
    Email,
    /// An ISO 8601 calendar date.
    Date,
    /// A date that is not before the evaluation day.
    NotInPast,
    /// A date strictly after the given one; passes when there is nothing to
    /// compare against.
    After(Option<NaiveDate>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub check: Check,
    pub message: String,
}

/// Everything a rule may depend on besides the booking itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub today: NaiveDate,
}

impl Check {
    fn passes(&self, value: &Value, context: &ValidationContext) -> bool {
        if *self == Check::Required {
            return !is_empty(value);
        }
        // Only `Required` reports a missing value.
        if is_empty(value) {
            return true;
        }

        match self {
            Check::Required => true,
            Check::MinLength(min) => length(value).is_none_or(|len| len >= *min),
            Check::MaxLength(max) => length(value).is_none_or(|len| len <= *max),
            Check::Min(min) => value.as_f64().is_none_or(|n| n >= *min as f64),
            Check::Max(max) => value.as_f64().is_none_or(|n| n <= *max as f64),
            Check::Pattern(pattern) => value.as_str().is_none_or(|s| pattern.matches(s)),
            Check::Email => value.as_str().is_none_or(is_email),
            Check::Date => value.as_str().is_none_or(|s| parse_date(s).is_some()),
            Check::NotInPast => date_of(value).is_none_or(|date| date >= context.today),
            Check::After(earliest) => match (date_of(value), earliest) {
                (Some(date), Some(earliest)) => date > *earliest,
                _ => true,
            },
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn date_of(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(parse_date)
}

#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn is_email(value: &str) -> bool {
    let local_len = value.split('@').next().map_or(0, str::len);
    value.len() <= 254 && local_len <= 64 && EMAIL.is_match(value)
}

/// Ordered rules for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    pub path: String,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    fn push(&mut self, check: Check, message: &str) -> &mut Self {
        self.rules.push(Rule {
            check,
            message: message.to_string(),
        });
        self
    }

    pub fn required(&mut self, message: &str) -> &mut Self {
        self.push(Check::Required, message)
    }

    pub fn min_length(&mut self, min: usize, message: &str) -> &mut Self {
        self.push(Check::MinLength(min), message)
    }

    pub fn max_length(&mut self, max: usize, message: &str) -> &mut Self {
        self.push(Check::MaxLength(max), message)
    }

    pub fn min(&mut self, min: i64, message: &str) -> &mut Self {
        self.push(Check::Min(min), message)
    }

    pub fn max(&mut self, max: i64, message: &str) -> &mut Self {
        self.push(Check::Max(max), message)
    }

    pub fn pattern(&mut self, pattern: Pattern, message: &str) -> &mut Self {
        self.push(Check::Pattern(pattern), message)
    }

    pub fn email(&mut self, message: &str) -> &mut Self {
        self.push(Check::Email, message)
    }

    pub fn date(&mut self, message: &str) -> &mut Self {
        self.push(Check::Date, message)
    }

    pub fn not_in_past(&mut self, message: &str) -> &mut Self {
        self.push(Check::NotInPast, message)
    }

    pub fn after(&mut self, earliest: Option<NaiveDate>, message: &str) -> &mut Self {
        self.push(Check::After(earliest), message)
    }

    fn first_error(&self, value: &Value, context: &ValidationContext) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| !rule.check.passes(value, context))
            .map(|rule| rule.message.as_str())
    }
}

/// Declarative rule set over a serialized booking.
///
/// Fields keep the order they were first declared in, and rules keep the
/// order they were added in; the first failing rule names a field's error.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for `path`, declared on first use.
    pub fn field(&mut self, path: impl Into<String>) -> &mut FieldRules {
        let path = path.into();
        let index = match self.fields.iter().position(|field| field.path == path) {
            Some(index) => index,
            None => {
                self.fields.push(FieldRules {
                    path,
                    rules: Vec::new(),
                });
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Paths of every declared field under `group`.
    pub fn paths_in<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .map(|field| field.path.as_str())
            .filter(move |path| in_group(path, group))
    }

    #[must_use]
    pub fn evaluate(&self, data: &Value, context: &ValidationContext) -> ValidationReport {
        let results = self
            .fields
            .iter()
            .map(|field| {
                let value = get_field(data, &field.path).unwrap_or(&Value::Null);
                FieldResult {
                    path: field.path.clone(),
                    error: field.first_error(value, context).map(str::to_string),
                }
            })
            .collect();
        ValidationReport { results }
    }
}

fn in_group(path: &str, group: &str) -> bool {
    path == group
        || path
            .strip_prefix(group)
            .is_some_and(|rest| rest.starts_with('.'))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldResult {
    pub path: String,
    pub error: Option<String>,
}

/// Outcome of evaluating a schema, field by field.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    results: Vec<FieldResult>,
}

impl ValidationReport {
    #[must_use]
    pub fn error(&self, path: &str) -> Option<&str> {
        self.results
            .iter()
            .find(|result| result.path == path)
            .and_then(|result| result.error.as_deref())
    }

    #[must_use]
    pub fn invalid(&self, path: &str) -> bool {
        self.error(path).is_some()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|result| result.error.is_none())
    }

    #[must_use]
    pub fn group_valid(&self, group: &str) -> bool {
        self.results
            .iter()
            .filter(|result| in_group(&result.path, group))
            .all(|result| result.error.is_none())
    }

    /// Failing fields with their messages, in declaration order.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|result| {
            result
                .error
                .as_deref()
                .map(|error| (result.path.as_str(), error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> ValidationContext {
        ValidationContext {
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let mut schema = Schema::new();
        schema
            .field("code")
            .min_length(3, "too short")
            .pattern(Pattern::Cvv, "not a cvv");

        let report = schema.evaluate(&json!({ "code": "a" }), &context());
        assert_eq!(report.error("code"), Some("too short"));
    }

    #[test]
    fn test_only_required_reports_empty_values() {
        let mut schema = Schema::new();
        schema
            .field("name")
            .min_length(3, "too short")
            .pattern(Pattern::Passport, "bad");
        schema.field("email").required("needed").email("bad email");

        let report = schema.evaluate(&json!({ "name": "", "email": "" }), &context());
        assert!(!report.invalid("name"));
        assert_eq!(report.error("email"), Some("needed"));
    }

    #[test]
    fn test_missing_field_is_empty() {
        let mut schema = Schema::new();
        schema.field("a.b").required("needed");

        let report = schema.evaluate(&json!({}), &context());
        assert_eq!(report.error("a.b"), Some("needed"));
    }

    #[test]
    fn test_numeric_ranges() {
        let mut schema = Schema::new();
        schema.field("bags").min(0, "negative").max(5, "too many");

        let check = |bags: i64| {
            schema
                .evaluate(&json!({ "bags": bags }), &context())
                .error("bags")
                .map(str::to_string)
        };
        assert_eq!(check(-1), Some("negative".to_string()));
        assert_eq!(check(0), None);
        assert_eq!(check(5), None);
        assert_eq!(check(6), Some("too many".to_string()));
    }

    #[test]
    fn test_patterns() {
        assert!(Pattern::Passport.matches("AB1234"));
        assert!(!Pattern::Passport.matches("AB123"));
        assert!(Pattern::Passport.matches("ab123456"));
        assert!(!Pattern::Passport.matches("AB12345678"));
        assert!(Pattern::CardNumber.matches("4111111111111111"));
        assert!(!Pattern::CardNumber.matches("4111 1111 1111 1111"));
        assert!(Pattern::ExpiryDate.matches("12/29"));
        assert!(!Pattern::ExpiryDate.matches("13/29"));
        assert!(!Pattern::ExpiryDate.matches("00/29"));
        assert!(Pattern::Cvv.matches("1234"));
        assert!(!Pattern::Cvv.matches("12"));
        assert!(Pattern::BoletoDocument.matches("12345678901"));
        assert!(Pattern::BoletoDocument.matches("12345678000199"));
        assert!(!Pattern::BoletoDocument.matches("123456789012"));
        assert!(Pattern::BoletoZipCode.matches("01001-000"));
        assert!(Pattern::BoletoZipCode.matches("01001000"));
        assert!(!Pattern::BoletoZipCode.matches("0100-1000"));
    }

    #[test]
    fn test_email() {
        assert!(is_email("maria@example.com.br"));
        assert!(is_email("first.last+tag@sub.example.org"));
        assert!(!is_email("maria@"));
        assert!(!is_email("maria.example.com"));
        assert!(!is_email("maria@-example.com"));
    }

    #[test]
    fn test_dates() {
        let mut schema = Schema::new();
        schema
            .field("departure")
            .date("not a date")
            .not_in_past("in the past");
        schema.field("back").after(
            NaiveDate::from_ymd_opt(2025, 6, 10),
            "before departure",
        );

        let evaluate = |data: Value| schema.evaluate(&data, &context());

        let report = evaluate(json!({ "departure": "2025-13-01", "back": "2025-06-10" }));
        assert_eq!(report.error("departure"), Some("not a date"));
        assert_eq!(report.error("back"), Some("before departure"));

        let report = evaluate(json!({ "departure": "2025-05-31", "back": "2025-06-11" }));
        assert_eq!(report.error("departure"), Some("in the past"));
        assert!(!report.invalid("back"));

        let report = evaluate(json!({ "departure": "2025-06-01" }));
        assert!(report.is_valid());
    }

    #[test]
    fn test_group_queries() {
        let mut schema = Schema::new();
        schema.field("payment.method").required("needed");
        schema.field("payment.cardNumber").required("needed");
        schema.field("paymentNotes").required("needed");
        schema.field("services.insurance");

        let paths: Vec<_> = schema.paths_in("payment").collect();
        assert_eq!(paths, vec!["payment.method", "payment.cardNumber"]);

        let report = schema.evaluate(
            &json!({ "payment": { "method": "pix", "cardNumber": "" }, "paymentNotes": "x" }),
            &context(),
        );
        assert!(!report.group_valid("payment"));
        assert!(report.group_valid("services"));
        assert_eq!(
            report.errors().collect::<Vec<_>>(),
            vec![("payment.cardNumber", "needed")]
        );
    }
}
