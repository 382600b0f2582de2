use std::str::from_utf8;

use serde_json::{Value, json};
use xrpl_meta::bin_utils::Service;

const XRP_PAYMENT: &str = include_str!("payment_xrp.json");
const IOU_PAYMENT: &str = include_str!("payment_iou.json");
const OFFER_CROSSING: &str = include_str!("offer_crossing.json");
const MPT_PAYMENT: &str = include_str!("payment_mpt.json");

fn interpret(transaction: &str, compute_fees: bool) -> Value {
    let mut output = Vec::new();
    let service = Service {
        input: transaction.as_bytes(),
        output: &mut output,
        compute_fees,
    };
    service.run().unwrap();
    serde_json::from_str(from_utf8(&output).unwrap()).unwrap()
}

#[test]
fn account_creating_payment() {
    let result = interpret(XRP_PAYMENT, false);
    assert_eq!(
        result,
        json!([
            {
                "account": "rLDYrujdKUfVx28T9vRDAbyJ7G2WVXKo4K",
                "balances": [ { "currency": "XRP", "value": "100" } ]
            },
            {
                "account": "rKmBGxocj9Abgy25J51Mk1iqFzW9aVF9Tc",
                "balances": [ { "currency": "XRP", "value": "-100.012" } ]
            }
        ])
    );
}

#[test]
fn account_creating_payment_with_fees_requested() {
    let result = interpret(XRP_PAYMENT, true);
    // no conversion anywhere, so both accounts carry an empty fee map
    assert_eq!(result[0]["tradingfees"], json!({}));
    assert_eq!(result[1]["tradingfees"], json!({}));
}

#[test]
fn issued_currency_payment_through_gateway() {
    let result = interpret(IOU_PAYMENT, false);
    assert_eq!(
        result,
        json!([
            {
                "account": "rKmBGxocj9Abgy25J51Mk1iqFzW9aVF9Tc",
                "balances": [
                    {
                        "currency": "USD",
                        "value": "-0.01",
                        "counterparty": "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q"
                    },
                    { "currency": "XRP", "value": "-0.012" }
                ]
            },
            {
                "account": "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q",
                "balances": [
                    {
                        "currency": "USD",
                        "value": "0.01",
                        "counterparty": "rKmBGxocj9Abgy25J51Mk1iqFzW9aVF9Tc"
                    },
                    {
                        "currency": "USD",
                        "value": "-0.01",
                        "counterparty": "rLDYrujdKUfVx28T9vRDAbyJ7G2WVXKo4K"
                    }
                ]
            },
            {
                "account": "rLDYrujdKUfVx28T9vRDAbyJ7G2WVXKo4K",
                "balances": [
                    {
                        "currency": "USD",
                        "value": "0.01",
                        "counterparty": "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q"
                    }
                ]
            }
        ])
    );
}

#[test]
fn offer_crossing_reports_trading_fees() {
    let result = interpret(OFFER_CROSSING, true);
    assert_eq!(
        result,
        json!([
            {
                "account": "rKmBGxocj9Abgy25J51Mk1iqFzW9aVF9Tc",
                "balances": [
                    {
                        "currency": "USD",
                        "value": "1.1",
                        "counterparty": "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q"
                    },
                    {
                        "currency": "USD",
                        "value": "-1.0975",
                        "counterparty": "rLDYrujdKUfVx28T9vRDAbyJ7G2WVXKo4K"
                    },
                    { "currency": "XRP", "value": "-0.000012" }
                ],
                "tradingfees": { "USD": "0.0025" }
            },
            {
                "account": "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q",
                "balances": [
                    {
                        "currency": "USD",
                        "value": "-1.1",
                        "counterparty": "rKmBGxocj9Abgy25J51Mk1iqFzW9aVF9Tc"
                    }
                ],
                "tradingfees": {}
            },
            {
                "account": "rLDYrujdKUfVx28T9vRDAbyJ7G2WVXKo4K",
                "balances": [
                    {
                        "currency": "USD",
                        "value": "1.0975",
                        "counterparty": "rKmBGxocj9Abgy25J51Mk1iqFzW9aVF9Tc"
                    }
                ],
                "tradingfees": {}
            }
        ])
    );
}

#[test]
fn mpt_issuance_payment() {
    let result = interpret(MPT_PAYMENT, false);
    assert_eq!(
        result,
        json!([
            {
                "account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                "balances": [
                    {
                        "value": "-250",
                        "mpt_issuance_id": "0000000CB5F762798A53D543A014CAF8B297CFF8F2F937E8"
                    },
                    { "currency": "XRP", "value": "-0.000012" }
                ]
            },
            {
                "account": "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH",
                "balances": [
                    {
                        "value": "250",
                        "mpt_issuance_id": "0000000CB5F762798A53D543A014CAF8B297CFF8F2F937E8"
                    }
                ]
            }
        ])
    );
}

#[test]
fn transaction_without_metadata_is_rejected() {
    let mut output = Vec::new();
    let service = Service {
        input: br#"{ "result": { "validated": true } }"#.as_slice(),
        output: &mut output,
        compute_fees: false,
    };
    let err = service.run().unwrap_err();
    assert!(err.to_string().contains("no metadata"));
    assert!(output.is_empty());
}
