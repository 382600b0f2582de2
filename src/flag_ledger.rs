use thiserror::Error;

/// Every `FLAG_INTERVAL`-th ledger in the chain is a flag ledger.
pub const FLAG_INTERVAL: u32 = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagLedgerError {
    #[error("reference ledger index must be positive")]
    ZeroIndex,
    #[error("no flag ledger after {reference} fits the index space")]
    Overflow { reference: u32 },
}

pub fn is_flag(ledger_index: u32) -> bool {
    ledger_index % FLAG_INTERVAL == 0
}

/// The closest flag ledger strictly before the reference. Genesis-side
/// references resolve to index 0.
pub fn prev(reference: u32) -> Result<u32, FlagLedgerError> {
    check_reference(reference)?;
    Ok((reference - 1) / FLAG_INTERVAL * FLAG_INTERVAL)
}

/// The closest flag ledger strictly after the reference.
pub fn next(reference: u32) -> Result<u32, FlagLedgerError> {
    check_reference(reference)?;
    after(reference)
}

/// The reference itself when it is a flag ledger, otherwise [`prev`].
pub fn prev_or_current(reference: u32) -> Result<u32, FlagLedgerError> {
    check_reference(reference)?;
    Ok(reference / FLAG_INTERVAL * FLAG_INTERVAL)
}

/// The reference itself when it is a flag ledger, otherwise [`next`].
pub fn next_or_current(reference: u32) -> Result<u32, FlagLedgerError> {
    check_reference(reference)?;
    if is_flag(reference) {
        return Ok(reference);
    }
    after(reference)
}

fn check_reference(reference: u32) -> Result<(), FlagLedgerError> {
    if reference == 0 {
        return Err(FlagLedgerError::ZeroIndex);
    }
    Ok(())
}

fn after(reference: u32) -> Result<u32, FlagLedgerError> {
    let interval = u64::from(FLAG_INTERVAL);
    let candidate = (u64::from(reference) / interval + 1) * interval;
    u32::try_from(candidate).map_err(|_| FlagLedgerError::Overflow { reference })
}
