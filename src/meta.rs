use serde_json::{Map, Value};
use thiserror::Error;

use crate::address::AddressError;

/// How a ledger entry was affected by the transaction, resolved from the
/// wrapper key of its diff (`CreatedNode`, `ModifiedNode` or `DeletedNode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl ChangeKind {
    const WRAPPERS: [(&'static str, ChangeKind); 3] = [
        ("CreatedNode", ChangeKind::Created),
        ("ModifiedNode", ChangeKind::Modified),
        ("DeletedNode", ChangeKind::Deleted),
    ];
}

/// The ledger entry types the balance-change engine understands. Everything
/// else normalizes to [`EntryType::Other`] and is skipped by the dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    AccountRoot,
    RippleState,
    MPToken,
    MPTokenIssuance,
    Other,
}

impl EntryType {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "AccountRoot" => EntryType::AccountRoot,
            "RippleState" => EntryType::RippleState,
            "MPToken" => EntryType::MPToken,
            "MPTokenIssuance" => EntryType::MPTokenIssuance,
            _ => EntryType::Other,
        }
    }
}

/// One normalized ledger-entry diff. All optional wire fields are resolved
/// to `Option` here, once, so downstream logic never re-checks existence.
///
/// For a created entry only `new_fields` is meaningful; for modified and
/// deleted entries `final_fields` holds the post-state and `previous_fields`
/// (possibly absent) the pre-state of the changed fields only.
#[derive(Debug, Clone)]
pub struct AffectedNode {
    pub change_kind: ChangeKind,
    pub entry_type: EntryType,
    pub ledger_index: String,
    pub new_fields: Option<Map<String, Value>>,
    pub final_fields: Option<Map<String, Value>>,
    pub previous_fields: Option<Map<String, Value>>,
    pub previous_txn_id: Option<String>,
    pub previous_txn_lgr_seq: Option<u64>,
}

impl AffectedNode {
    /// The field bag describing the entry itself: `new_fields` for created
    /// entries, otherwise `final_fields`.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.new_fields.as_ref().or(self.final_fields.as_ref())
    }

    /// Looks up a string field identifying the entry's owner, preferring the
    /// post-state over the creation bag.
    pub fn owner(&self, field: &str) -> Option<&str> {
        self.final_fields
            .as_ref()
            .and_then(|bag| bag.get(field))
            .or_else(|| self.new_fields.as_ref().and_then(|bag| bag.get(field)))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("transaction metadata has no AffectedNodes array")]
    MissingAffectedNodes,
    #[error("affected node #{index} has no recognizable change-kind wrapper")]
    UnrecognizedChangeKind { index: usize },
    #[error("affected node #{index}: {wrapper} does not wrap an object")]
    MalformedNode { index: usize, wrapper: &'static str },
    #[error("entry {ledger_index}: field {field} is not a decimal amount")]
    BadAmount {
        ledger_index: String,
        field: &'static str,
    },
    #[error("entry {ledger_index}: cannot derive MPT issuance id: {source}")]
    MptIssuanceId {
        ledger_index: String,
        #[source]
        source: AddressError,
    },
}

/// Normalizes a transaction metadata object into one [`AffectedNode`] per
/// diff entry, in wire order.
///
/// Metadata without an `AffectedNodes` array, or a diff entry without a
/// recognizable change-kind wrapper, is rejected outright rather than
/// skipped.
pub fn normalize_nodes(meta: &Value) -> Result<Vec<AffectedNode>, MetaError> {
    let affected = meta
        .get("AffectedNodes")
        .and_then(Value::as_array)
        .ok_or(MetaError::MissingAffectedNodes)?;

    let mut nodes = Vec::with_capacity(affected.len());
    for (index, entry) in affected.iter().enumerate() {
        let (wrapper, change_kind) = ChangeKind::WRAPPERS
            .iter()
            .copied()
            .find(|(wrapper, _)| entry.get(*wrapper).is_some())
            .ok_or(MetaError::UnrecognizedChangeKind { index })?;
        let inner = entry
            .get(wrapper)
            .and_then(Value::as_object)
            .ok_or(MetaError::MalformedNode { index, wrapper })?;

        nodes.push(AffectedNode {
            change_kind,
            entry_type: inner
                .get("LedgerEntryType")
                .and_then(Value::as_str)
                .map(EntryType::from_tag)
                .unwrap_or(EntryType::Other),
            ledger_index: inner
                .get("LedgerIndex")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            new_fields: field_bag(inner, "NewFields"),
            final_fields: field_bag(inner, "FinalFields"),
            previous_fields: field_bag(inner, "PreviousFields"),
            previous_txn_id: inner
                .get("PreviousTxnID")
                .and_then(Value::as_str)
                .map(str::to_string),
            previous_txn_lgr_seq: inner.get("PreviousTxnLgrSeq").and_then(Value::as_u64),
        });
    }
    Ok(nodes)
}

fn field_bag(node: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    node.get(key).and_then(Value::as_object).cloned()
}

/// Finds the metadata object inside a transaction as delivered over
/// JSON-RPC: either at the top level or nested under `result`, named `meta`
/// or `metadata` depending on the serving endpoint.
pub fn extract_metadata(tx: &Value) -> Option<&Value> {
    const KEYS: [&str; 2] = ["meta", "metadata"];
    for key in KEYS {
        if let Some(meta) = tx.get(key).filter(|value| value.is_object()) {
            return Some(meta);
        }
    }
    let result = tx.get("result")?;
    for key in KEYS {
        if let Some(meta) = result.get(key).filter(|value| value.is_object()) {
            return Some(meta);
        }
    }
    None
}
