//! Domain models for ledger transactions, drafts, and partial updates.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::errors::{LedgerError, LedgerResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;
const DRAFT_FIELDS: [&str; 4] = ["amount", "date", "description", "type"];
const STORE_MANAGED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Direction of a ledger entry; income adds to totals, expense subtracts.
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(LedgerError::Validation(format!(
                "type must be `income` or `expense`, got `{other}`"
            ))),
        }
    }
}

/// A persisted ledger entry. Identity and timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Materializes a draft with the supplied identity and creation timestamp.
    pub fn from_draft(id: Uuid, draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: draft.amount,
            date: draft.date,
            description: draft.description,
            kind: draft.kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Signed contribution of this record: positive for income, negative for expense.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Merges the fields present in `patch`; timestamps are left to the caller.
    pub fn apply(&mut self, patch: &TransactionPatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description.as_ref() {
            self.description = description.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
    }

    /// Checks the record invariants enforced for anything read from or written to storage.
    pub fn validate(&self) -> LedgerResult<()> {
        validate_amount(self.amount)?;
        validate_date(self.date)?;
        validate_description(&self.description)?;
        if self.updated_at < self.created_at {
            return Err(LedgerError::Validation(format!(
                "transaction {} was updated before it was created",
                self.id
            )));
        }
        Ok(())
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} {}]", self.id, self.kind, self.date)
    }
}

/// Caller-supplied fields for a new transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl TransactionDraft {
    pub fn new(
        amount: f64,
        date: NaiveDate,
        description: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            amount,
            date,
            description: description.into(),
            kind,
        }
    }

    pub fn income(amount: f64, date: NaiveDate, description: impl Into<String>) -> Self {
        Self::new(amount, date, description, TransactionKind::Income)
    }

    pub fn expense(amount: f64, date: NaiveDate, description: impl Into<String>) -> Self {
        Self::new(amount, date, description, TransactionKind::Expense)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        validate_amount(self.amount)?;
        validate_date(self.date)?;
        validate_description(&self.description)
    }

    /// Converts an untyped form payload into a draft.
    ///
    /// All four fields are required and no other keys are accepted.
    pub fn from_json(payload: &Value) -> LedgerResult<Self> {
        let object = payload_object(payload)?;
        if let Some(key) = object
            .keys()
            .find(|key| !DRAFT_FIELDS.contains(&key.as_str()))
        {
            return Err(LedgerError::Validation(format!(
                "unexpected field `{key}` in transaction draft"
            )));
        }
        let draft = Self {
            amount: parse_amount(required(object, "amount")?)?,
            date: parse_date(required(object, "date")?)?,
            description: parse_description(required(object, "description")?)?,
            kind: parse_kind(required(object, "type")?)?,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Partial update; absent fields retain their stored value.
///
/// `id` and `createdAt` are not representable here, so they can never be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl TransactionPatch {
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.kind.is_none()
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(date) = self.date {
            validate_date(date)?;
        }
        if let Some(description) = self.description.as_deref() {
            validate_description(description)?;
        }
        Ok(())
    }

    /// Converts an untyped edit payload into a patch.
    ///
    /// Store-managed keys (`id`, `createdAt`, `updatedAt`) are dropped; any other
    /// key outside the draft shape is rejected. `null` is treated as absent.
    pub fn from_json(payload: &Value) -> LedgerResult<Self> {
        let object = payload_object(payload)?;
        let mut patch = Self::default();
        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "amount" => patch.amount = Some(parse_amount(value)?),
                "date" => patch.date = Some(parse_date(value)?),
                "description" => patch.description = Some(parse_description(value)?),
                "type" => patch.kind = Some(parse_kind(value)?),
                managed if STORE_MANAGED_FIELDS.contains(&managed) => {
                    tracing::debug!(field = managed, "ignoring store-managed field in patch");
                }
                other => {
                    return Err(LedgerError::Validation(format!(
                        "unexpected field `{other}` in transaction patch"
                    )))
                }
            }
        }
        patch.validate()?;
        Ok(patch)
    }
}

pub(crate) fn validate_amount(amount: f64) -> LedgerResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::Validation(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

/// Dates must render as a four-digit `YYYY-MM-DD` so month keys stay sortable as text.
pub(crate) fn validate_date(date: NaiveDate) -> LedgerResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(LedgerError::Validation(format!(
            "date {date} is outside years {MIN_YEAR:04}..={MAX_YEAR}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_description(description: &str) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::Validation(
            "description must not be empty".into(),
        ));
    }
    Ok(())
}

fn payload_object(payload: &Value) -> LedgerResult<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| LedgerError::Validation("transaction payload must be an object".into()))
}

fn required<'a>(object: &'a Map<String, Value>, key: &str) -> LedgerResult<&'a Value> {
    object
        .get(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| LedgerError::Validation(format!("missing field `{key}`")))
}

fn parse_amount(value: &Value) -> LedgerResult<f64> {
    let amount = value
        .as_f64()
        .ok_or_else(|| LedgerError::Validation(format!("amount must be a number, got {value}")))?;
    validate_amount(amount)?;
    Ok(amount)
}

fn parse_date(value: &Value) -> LedgerResult<NaiveDate> {
    let raw = value
        .as_str()
        .ok_or_else(|| LedgerError::Validation(format!("date must be a string, got {value}")))?;
    let invalid =
        || LedgerError::Validation(format!("date `{raw}` is not a valid YYYY-MM-DD date"));
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())?;
    validate_date(date)?;
    if date.format(DATE_FORMAT).to_string() != raw {
        return Err(invalid());
    }
    Ok(date)
}

fn parse_description(value: &Value) -> LedgerResult<String> {
    let text = value.as_str().ok_or_else(|| {
        LedgerError::Validation(format!("description must be a string, got {value}"))
    })?;
    validate_description(text)?;
    Ok(text.to_string())
}

fn parse_kind(value: &Value) -> LedgerResult<TransactionKind> {
    value
        .as_str()
        .ok_or_else(|| LedgerError::Validation(format!("type must be a string, got {value}")))?
        .parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample() -> Transaction {
        let now = DateTime::parse_from_rfc3339("2024-01-05T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Transaction::from_draft(
            Uuid::new_v4(),
            TransactionDraft::income(100.0, jan(5), "Salary"),
            now,
        )
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let txn = sample();
        let value = serde_json::to_value(&txn).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["amount", "createdAt", "date", "description", "id", "type", "updatedAt"]
        );
        assert_eq!(object["type"], json!("income"));
        assert_eq!(object["date"], json!("2024-01-05"));
        assert_eq!(object["amount"], json!(100.0));
    }

    #[test]
    fn deserializes_browser_style_timestamps() {
        let raw = json!({
            "id": "5f2b1a8e-3c1d-4e2f-9a7b-6c5d4e3f2a1b",
            "amount": 12.5,
            "date": "2024-03-09",
            "description": "Lunch",
            "type": "expense",
            "createdAt": "2024-03-09T12:00:00.000Z",
            "updatedAt": "2024-03-09T12:00:00.000Z"
        });
        let txn: Transaction = serde_json::from_value(raw).unwrap();
        assert!(txn.is_expense());
        assert_eq!(txn.signed_amount(), -12.5);
        txn.validate().unwrap();
    }

    #[test]
    fn draft_validation_rejects_bad_amounts_and_blank_descriptions() {
        for amount in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let draft = TransactionDraft::expense(amount, jan(1), "Coffee");
            assert!(
                matches!(draft.validate(), Err(LedgerError::Validation(_))),
                "amount {amount} should be rejected"
            );
        }
        let blank = TransactionDraft::expense(3.0, jan(1), "   ");
        assert!(matches!(blank.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn draft_from_json_requires_closed_shape() {
        let draft = TransactionDraft::from_json(&json!({
            "amount": 40,
            "date": "2024-01-10",
            "description": "Groceries",
            "type": "expense"
        }))
        .unwrap();
        assert_eq!(draft.amount, 40.0);
        assert_eq!(draft.kind, TransactionKind::Expense);

        let cases = [
            json!({"amount": "40", "date": "2024-01-10", "description": "x", "type": "expense"}),
            json!({"amount": 40, "date": "2024-02-30", "description": "x", "type": "expense"}),
            json!({"amount": 40, "date": "2024-01-10", "description": "x", "type": "refund"}),
            json!({"amount": 40, "date": "2024-01-10", "description": "x"}),
            json!({
                "amount": 40,
                "date": "2024-01-10",
                "description": "x",
                "type": "expense",
                "tag": 1
            }),
            json!([1, 2, 3]),
        ];
        for payload in cases {
            let err = TransactionDraft::from_json(&payload).expect_err("payload must be rejected");
            assert!(matches!(err, LedgerError::Validation(_)), "{payload}: {err:?}");
        }
    }

    #[test]
    fn patch_from_json_ignores_store_managed_fields() {
        let patch = TransactionPatch::from_json(&json!({
            "id": "other",
            "createdAt": "2000-01-01",
            "description": "x"
        }))
        .unwrap();
        assert_eq!(patch, TransactionPatch::default().description("x"));
    }

    #[test]
    fn patch_from_json_rejects_unknown_fields_and_bad_values() {
        assert!(TransactionPatch::from_json(&json!({"category": "food"})).is_err());
        assert!(TransactionPatch::from_json(&json!({"amount": -1})).is_err());
        assert!(TransactionPatch::from_json(&json!({"type": "transfer"})).is_err());
        let empty = TransactionPatch::from_json(&json!({"amount": null})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn dates_outside_four_digit_years_are_rejected() {
        for raw in ["+12345-01-01", "-0001-03-01", "2024-1-5"] {
            let draft = json!({
                "amount": 10,
                "date": raw,
                "description": "Rent",
                "type": "expense"
            });
            let err = TransactionDraft::from_json(&draft).expect_err(raw);
            assert!(matches!(err, LedgerError::Validation(_)), "{raw}: {err:?}");
            assert!(TransactionPatch::from_json(&json!({ "date": raw })).is_err());
        }

        let far = NaiveDate::from_ymd_opt(12345, 1, 1).unwrap();
        assert!(TransactionDraft::expense(10.0, far, "Rent").validate().is_err());
        assert!(TransactionPatch::default().date(far).validate().is_err());

        let mut stored = sample();
        stored.date = NaiveDate::from_ymd_opt(-1, 3, 1).unwrap();
        assert!(matches!(stored.validate(), Err(LedgerError::Validation(_))));

        let edge = json!({
            "amount": 1,
            "date": "9999-12-31",
            "description": "Edge",
            "type": "income"
        });
        assert!(TransactionDraft::from_json(&edge).is_ok());
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut txn = sample();
        let before = txn.clone();
        txn.apply(&TransactionPatch::default().description("Bonus"));
        assert_eq!(txn.description, "Bonus");
        assert_eq!(txn.amount, before.amount);
        assert_eq!(txn.date, before.date);
        assert_eq!(txn.kind, before.kind);
        assert_eq!(txn.id, before.id);
        assert_eq!(txn.created_at, before.created_at);
    }
}
