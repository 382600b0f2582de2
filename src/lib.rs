/// Normalization of raw transaction metadata into typed ledger-entry
/// diffs. Everything downstream consumes [`meta::AffectedNode`] instead of
/// re-checking optional wire fields.
pub mod meta;

/// The interpretation core: walks normalized diffs and produces per-account
/// signed balance changes, plus optional trading-fee figures.
pub mod balance_changes;

/// Rendering of 160-bit currency codes as display strings, including the
/// demurrage variant with its packed interest rate.
pub mod currency;

/// Manual IEEE-754 reconstruction from big-endian bytes, used by [`currency`]
/// for the demurrage rate. Kept separate so the bit-level rules are testable
/// on their own.
pub mod float;

/// Classic-address codec (ripple-alphabet base58 with checksum).
pub mod address;

/// Deterministic MPT issuance-id derivation from sequence and issuer.
pub mod mpt;

/// Named transaction-flag extraction from a raw `Flags` bit field.
pub mod flags;

/// Flag-ledger arithmetic: every 256th ledger index.
pub mod flag_ledger;

/// Bootstraps the core for the binary. Lives in the library so the
/// integration tests can exercise the same code path.
pub mod bin_utils;
