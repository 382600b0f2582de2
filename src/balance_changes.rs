use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::meta::{AffectedNode, EntryType, MetaError, normalize_nodes};
use crate::mpt::make_mpt_id;

const DROPS_PER_XRP: u32 = 1_000_000;

/// One signed balance movement on a single account.
///
/// Exactly one of the three shapes occurs:
/// native funds (`currency` is `"XRP"`, nothing else set), a trust line
/// (`currency` plus `counterparty`) or a tokenized balance
/// (`mpt_issuance_id` only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpt_issuance_id: Option<String>,
}

/// Every balance movement one account experienced in a single transaction,
/// in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalances {
    pub account: String,
    pub balances: Vec<BalanceChange>,
    /// Per-currency fee leaked by multi-hop conversions. `Some` (possibly
    /// empty) whenever fee computation was requested, `None` otherwise.
    #[serde(rename = "tradingfees", skip_serializing_if = "Option::is_none")]
    pub trading_fees: Option<BTreeMap<String, Decimal>>,
}

/// Interprets one transaction's metadata as per-account balance changes.
///
/// Accounts appear in the order they were first seen while walking the
/// diff entries, and within an account the changes keep diff order too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BalanceChanges {
    accounts: Vec<AccountBalances>,
}

impl BalanceChanges {
    pub fn from_metadata(meta: &Value, compute_fees: bool) -> Result<Self, MetaError> {
        let nodes = normalize_nodes(meta)?;
        let mut accumulator = Accumulator::default();

        for node in &nodes {
            match node.entry_type {
                EntryType::AccountRoot => {
                    if let Some((account, change)) = xrp_quantity(node)? {
                        trace!(%account, value = %change.value, "native balance change");
                        accumulator.push(account, change);
                    }
                }
                EntryType::RippleState => {
                    if let Some(pair) = trustline_quantity(node)? {
                        for (account, change) in pair {
                            trace!(%account, value = %change.value, "trust line balance change");
                            accumulator.push(account, change);
                        }
                    }
                }
                EntryType::MPToken => {
                    if let Some((account, change)) = mpt_quantity(node)? {
                        trace!(%account, value = %change.value, "mpt balance change");
                        accumulator.push(account, change);
                    }
                }
                EntryType::MPTokenIssuance => {
                    if let Some((account, change)) = mpt_outstanding_quantity(node)? {
                        trace!(%account, value = %change.value, "mpt outstanding change");
                        accumulator.push(account, change);
                    }
                }
                EntryType::Other => {}
            }
        }

        let mut accounts = accumulator.accounts;
        if compute_fees {
            for entry in &mut accounts {
                entry.trading_fees = Some(trading_fees(&entry.balances));
            }
        }
        debug!(
            nodes = nodes.len(),
            accounts = accounts.len(),
            "interpreted transaction metadata"
        );
        Ok(BalanceChanges { accounts })
    }

    pub fn accounts(&self) -> &[AccountBalances] {
        &self.accounts
    }

    pub fn into_accounts(self) -> Vec<AccountBalances> {
        self.accounts
    }

    /// The same result keyed by account, for callers doing lookups instead
    /// of iteration.
    pub fn keyed(&self) -> HashMap<&str, &AccountBalances> {
        self.accounts
            .iter()
            .map(|entry| (entry.account.as_str(), entry))
            .collect()
    }
}

/// Groups emitted changes per account while preserving first-seen order.
#[derive(Debug, Default)]
struct Accumulator {
    accounts: Vec<AccountBalances>,
    index: HashMap<String, usize>,
}

impl Accumulator {
    fn push(&mut self, account: String, change: BalanceChange) {
        let slot = match self.index.get(&account) {
            Some(&slot) => slot,
            None => {
                let slot = self.accounts.len();
                self.index.insert(account.clone(), slot);
                self.accounts.push(AccountBalances {
                    account,
                    balances: Vec::new(),
                    trading_fees: None,
                });
                slot
            }
        };
        self.accounts[slot].balances.push(change);
    }
}

fn xrp_quantity(node: &AffectedNode) -> Result<Option<(String, BalanceChange)>, MetaError> {
    let Some(delta) = simple_delta(node, "Balance")? else {
        return Ok(None);
    };
    let Some(account) = node.owner("Account") else {
        return Ok(None);
    };
    // AccountRoot balances are integer drops of the native currency
    let value = (delta / Decimal::from(DROPS_PER_XRP)).normalize();
    Ok(Some((
        account.to_string(),
        BalanceChange {
            currency: Some("XRP".to_string()),
            value,
            counterparty: None,
            mpt_issuance_id: None,
        },
    )))
}

/// A trust line stores one signed balance from the low party's perspective,
/// so a single diff yields two changes: the encoded one for the low party
/// and its negation for the high party.
fn trustline_quantity(
    node: &AffectedNode,
) -> Result<Option<[(String, BalanceChange); 2]>, MetaError> {
    let Some(delta) = simple_delta(node, "Balance")? else {
        return Ok(None);
    };

    // A trust line can be created with a non-zero starting balance, e.g.
    // when taking an offer creates the line, so the creation bag wins.
    let low = limit_issuer(node, "LowLimit");
    let high = limit_issuer(node, "HighLimit");
    let currency = node
        .fields()
        .and_then(|bag| bag.get("Balance"))
        .and_then(|balance| balance.get("currency"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let for_low = BalanceChange {
        currency: Some(currency.clone()),
        value: delta.normalize(),
        counterparty: Some(high.clone()),
        mpt_issuance_id: None,
    };
    let for_high = BalanceChange {
        currency: Some(currency),
        value: (-delta).normalize(),
        counterparty: Some(low.clone()),
        mpt_issuance_id: None,
    };
    Ok(Some([(low, for_low), (high, for_high)]))
}

fn mpt_quantity(node: &AffectedNode) -> Result<Option<(String, BalanceChange)>, MetaError> {
    let Some(delta) = funded_delta(node, "MPTAmount")? else {
        return Ok(None);
    };
    let Some(account) = node.owner("Account") else {
        return Ok(None);
    };
    let Some(issuance_id) = node
        .fields()
        .and_then(|bag| bag.get("MPTokenIssuanceID"))
        .and_then(Value::as_str)
    else {
        return Ok(None);
    };
    Ok(Some((
        account.to_string(),
        BalanceChange {
            currency: None,
            value: delta.normalize(),
            counterparty: None,
            mpt_issuance_id: Some(issuance_id.to_string()),
        },
    )))
}

/// `OutstandingAmount` tracks the issuer's aggregate supply, so the
/// holder-equivalent change is its inverse. The issuance entry carries no
/// precomputed id; it is derived from `Sequence` and `Issuer`.
fn mpt_outstanding_quantity(
    node: &AffectedNode,
) -> Result<Option<(String, BalanceChange)>, MetaError> {
    let Some(delta) = funded_delta(node, "OutstandingAmount")? else {
        return Ok(None);
    };
    let Some(account) = node.owner("Issuer") else {
        return Ok(None);
    };
    let Some(bag) = node.fields() else {
        return Ok(None);
    };
    let Some(sequence) = bag
        .get("Sequence")
        .and_then(Value::as_u64)
        .and_then(|sequence| u32::try_from(sequence).ok())
    else {
        return Ok(None);
    };
    let Some(issuer) = bag.get("Issuer").and_then(Value::as_str) else {
        return Ok(None);
    };
    let issuance_id = make_mpt_id(sequence, issuer).map_err(|source| MetaError::MptIssuanceId {
        ledger_index: node.ledger_index.clone(),
        source,
    })?;
    Ok(Some((
        account.to_string(),
        BalanceChange {
            currency: None,
            value: (-delta).normalize(),
            counterparty: None,
            mpt_issuance_id: Some(issuance_id),
        },
    )))
}

/// Change of a plain balance field: the full value for a created entry,
/// otherwise final minus previous when both sides recorded it. Zero deltas
/// and entries not touching the field resolve to `None`.
fn simple_delta(node: &AffectedNode, field: &'static str) -> Result<Option<Decimal>, MetaError> {
    if let Some(raw) = bag_field(node.new_fields.as_ref(), field) {
        return Ok(non_zero(parse_amount(node, field, raw)?));
    }
    let previous = bag_field(node.previous_fields.as_ref(), field);
    let last = bag_field(node.final_fields.as_ref(), field);
    if let (Some(previous), Some(last)) = (previous, last) {
        let delta = parse_amount(node, field, last)? - parse_amount(node, field, previous)?;
        return Ok(non_zero(delta));
    }
    Ok(None)
}

/// Like [`simple_delta`], plus the funded-box rule: when the previous bag
/// exists but lacks the field, an empty bag means the balance started at
/// an implicit zero (the full final value is the change), while a bag with
/// other fields means something unrelated changed (no balance change).
fn funded_delta(node: &AffectedNode, field: &'static str) -> Result<Option<Decimal>, MetaError> {
    if let Some(raw) = bag_field(node.new_fields.as_ref(), field) {
        return Ok(non_zero(parse_amount(node, field, raw)?));
    }
    let Some(last) = bag_field(node.final_fields.as_ref(), field) else {
        return Ok(None);
    };
    let Some(previous_bag) = node.previous_fields.as_ref() else {
        return Ok(None);
    };
    match previous_bag.get(field) {
        Some(previous) => {
            let delta = parse_amount(node, field, last)? - parse_amount(node, field, previous)?;
            Ok(non_zero(delta))
        }
        None if previous_bag.is_empty() => Ok(non_zero(parse_amount(node, field, last)?)),
        None => Ok(None),
    }
}

fn non_zero(delta: Decimal) -> Option<Decimal> {
    if delta.is_zero() { None } else { Some(delta) }
}

fn bag_field<'a>(
    bag: Option<&'a serde_json::Map<String, Value>>,
    field: &str,
) -> Option<&'a Value> {
    bag.and_then(|bag| bag.get(field))
}

fn limit_issuer(node: &AffectedNode, side: &str) -> String {
    node.fields()
        .and_then(|bag| bag.get(side))
        .and_then(|limit| limit.get("issuer"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parses an on-ledger amount: a plain decimal string, a bare number, or
/// the compound issued-currency object whose `value` member holds the
/// decimal. Exponent notation occurs in the wild for tiny trust line
/// balances and is accepted.
fn parse_amount(
    node: &AffectedNode,
    field: &'static str,
    raw: &Value,
) -> Result<Decimal, MetaError> {
    let text = match raw {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Object(amount) => match amount.get("value") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => return Err(bad_amount(node, field)),
        },
        _ => return Err(bad_amount(node, field)),
    };
    Decimal::from_str_exact(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| bad_amount(node, field))
}

fn bad_amount(node: &AffectedNode, field: &'static str) -> MetaError {
    MetaError::BadAmount {
        ledger_index: node.ledger_index.clone(),
        field,
    }
}

/// Buckets an account's counterparty changes by currency; a currency hit
/// through two or more counterparties in one transaction is a conversion,
/// and whatever its values fail to cancel out is the fee paid.
fn trading_fees(balances: &[BalanceChange]) -> BTreeMap<String, Decimal> {
    let mut buckets: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for change in balances {
        if change.counterparty.is_none() {
            continue;
        }
        let currency = change.currency.as_deref().unwrap_or_default();
        buckets.entry(currency).or_default().push(change.value);
    }

    let mut fees = BTreeMap::new();
    for (currency, amounts) in buckets {
        if amounts.len() < 2 {
            continue;
        }
        let total = amounts
            .iter()
            .fold(Decimal::ZERO, |total, amount| total + amount);
        if !total.is_zero() {
            fees.insert(currency.to_string(), total.normalize());
        }
    }
    fees
}
