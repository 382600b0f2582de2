/// Flags valid on every transaction type.
const GLOBAL_FLAGS: &[(&str, u32)] = &[("tfFullyCanonicalSig", 0x8000_0000)];

/// Named flag bits per transaction type, in display order.
const TYPE_FLAGS: &[(&str, &[(&str, u32)])] = &[
    ("EnableAmendment", &[("tfGotMajority", 0x0001_0000), ("tfLostMajority", 0x0002_0000)]),
    ("NFTokenCreateOffer", &[("tfSellNFToken", 0x0000_0001)]),
    (
        "NFTokenMint",
        &[
            ("tfBurnable", 0x0000_0001),
            ("tfOnlyXRP", 0x0000_0002),
            ("tfTrustLine", 0x0000_0004),
            ("tfTransferable", 0x0000_0008),
        ],
    ),
    (
        "OfferCreate",
        &[
            ("tfPassive", 0x0001_0000),
            ("tfImmediateOrCancel", 0x0002_0000),
            ("tfFillOrKill", 0x0004_0000),
            ("tfSell", 0x0008_0000),
        ],
    ),
    ("PaymentChannelClaim", &[("tfRenew", 0x0001_0000), ("tfClose", 0x0002_0000)]),
    (
        "Payment",
        &[
            ("tfNoDirectRipple", 0x0001_0000),
            ("tfPartialPayment", 0x0002_0000),
            ("tfLimitQuality", 0x0004_0000),
        ],
    ),
    (
        "TrustSet",
        &[
            ("tfSetfAuth", 0x0001_0000),
            ("tfSetNoRipple", 0x0002_0000),
            ("tfClearNoRipple", 0x0004_0000),
            ("tfSetFreeze", 0x0010_0000),
            ("tfClearFreeze", 0x0020_0000),
        ],
    ),
    (
        "AccountSet",
        &[
            ("tfRequireDestTag", 0x0001_0000),
            ("tfOptionalDestTag", 0x0002_0000),
            ("tfRequireAuth", 0x0004_0000),
            ("tfOptionalAuth", 0x0008_0000),
            ("tfDisallowXRP", 0x0010_0000),
            ("tfAllowXRP", 0x0020_0000),
        ],
    ),
];

/// Names of all flags set in `flags` for the given transaction type,
/// global flags first, then the type's own in table order. A transaction
/// type without a table still resolves the global flags.
pub fn extract(flags: u32, transaction_type: &str) -> Vec<&'static str> {
    let type_specific: &[(&'static str, u32)] = TYPE_FLAGS
        .iter()
        .find(|(name, _)| *name == transaction_type)
        .map_or(&[], |(_, table)| *table);

    GLOBAL_FLAGS
        .iter()
        .chain(type_specific)
        .filter(|(_, bit)| has_flag(flags, *bit))
        .map(|(name, _)| *name)
        .collect()
}

pub fn has_flag(flags: u32, check: u32) -> bool {
    flags & check != 0
}
