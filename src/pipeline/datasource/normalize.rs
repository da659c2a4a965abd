//! Ingestion boundary: every accepted upstream JSON shape is turned into the
//! canonical `TransferRecord` / `AddressInfo` here, so the builder never sees
//! alternate field names.

use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::error::DataSourceError;
use crate::model::AddressInfo;
use crate::model::TransferOutput;
use crate::model::TransferRecord;

const TRANSACTION_ID_KEYS: [&str; 2] = ["transaction_id", "txid"];
const OUTPUT_ADDRESS_KEYS: [&str; 2] = ["address", "script_public_key_address"];
const AMOUNT_KEYS: [&str; 2] = ["amount", "value"];
const TIMESTAMP_KEYS: [&str; 2] = ["block_time", "timestamp"];
const TRANSACTION_COUNT_KEYS: [&str; 5] = ["transaction_count", "transactionsCount", "count", "transactions", "total"];

/// Unwrap a full-transactions response: a bare list, or an object carrying
/// `transactions`. An object with `error` is an upstream failure.
pub fn transfer_list(response: Value) -> Result<Vec<Value>, DataSourceError> {
    match response {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => {
            if let Some(Value::Array(records)) = object.remove("transactions") {
                return Ok(records);
            }
            if let Some(error) = object.get("error") {
                return Err(DataSourceError::Upstream(value_to_string(error)));
            }
            debug!("unexpected_transfer_response::keys::{:?}", object.keys().collect::<Vec<_>>());
            Ok(Vec::new())
        },
        other => {
            debug!("unexpected_transfer_response::type::{}", json_type(&other));
            Ok(Vec::new())
        },
    }
}

/// Normalize every record, dropping the ones that yield no destinations.
pub fn normalize_transfers(
    address: &str,
    records: &[Value],
) -> Vec<TransferRecord> {
    let transfers: Vec<TransferRecord> = records.iter().filter_map(normalize_transfer).collect();
    if transfers.len() < records.len() {
        debug!(
            "malformed_transfers_skipped::address::{}::skipped::{}::kept::{}",
            address,
            records.len() - transfers.len(),
            transfers.len()
        );
    }
    transfers
}

pub fn normalize_transfer(record: &Value) -> Option<TransferRecord> {
    let Some(object) = record.as_object() else {
        warn!("malformed_transfer_record::type::{}", json_type(record));
        return None;
    };

    let transaction_id = first_of(object, &TRANSACTION_ID_KEYS).map(value_to_string).unwrap_or_default();
    let timestamp = first_of(object, &TIMESTAMP_KEYS).and_then(as_i64).unwrap_or(0);

    let Some(raw_outputs) = output_list(object) else {
        debug!(
            "transfer_without_outputs::tx::{}::keys::{:?}",
            transaction_id,
            object.keys().collect::<Vec<_>>()
        );
        return None;
    };

    let outputs: Vec<TransferOutput> = raw_outputs.iter().filter_map(|output| normalize_output(&transaction_id, output)).collect();
    if outputs.is_empty() {
        debug!("transfer_without_destinations::tx::{}", transaction_id);
        return None;
    }

    Some(TransferRecord {
        transaction_id,
        timestamp,
        outputs,
    })
}

/// `outputs` when present; otherwise the first list-of-object field whose
/// elements look like outputs.
fn output_list(object: &Map<String, Value>) -> Option<&Vec<Value>> {
    if let Some(outputs) = object.get("outputs") {
        return match outputs.as_array() {
            Some(list) if !list.is_empty() => Some(list),
            _ => {
                debug!("unexpected_outputs_format::{}", outputs);
                None
            },
        };
    }

    object.iter().find_map(|(key, value)| {
        let list = value.as_array()?;
        let first = list.first()?.as_object()?;
        let looks_like_output =
            OUTPUT_ADDRESS_KEYS[..1].iter().chain(AMOUNT_KEYS.iter()).any(|k| first.contains_key(*k));
        if looks_like_output {
            debug!("using_field_as_outputs::{}", key);
            Some(list)
        } else {
            None
        }
    })
}

fn normalize_output(
    transaction_id: &str,
    output: &Value,
) -> Option<TransferOutput> {
    let object = output.as_object()?;
    let address = first_of(object, &OUTPUT_ADDRESS_KEYS).and_then(Value::as_str).unwrap_or_default();
    if address.is_empty() {
        debug!("output_without_address::tx::{}", transaction_id);
        return None;
    }

    let amount = match first_of(object, &AMOUNT_KEYS) {
        None => 0,
        Some(value) => match as_sompi(value) {
            Some(amount) => amount,
            None => {
                debug!("output_invalid_amount::tx::{}::amount::{}", transaction_id, value);
                return None;
            },
        },
    };

    Some(TransferOutput::new(address, amount))
}

/// Combine the balance and transactions-count payloads. Missing fields are zero.
pub fn normalize_address_info(
    address: &str,
    balance: &Value,
    transaction_count: &Value,
) -> AddressInfo {
    let balance = match balance.get("balance") {
        Some(value) => as_sompi(value).unwrap_or(0),
        None => {
            warn!("unexpected_balance_format::address::{}::payload::{}", address, balance);
            0
        },
    };

    let transaction_count = match transaction_count.as_object().and_then(|o| first_of(o, &TRANSACTION_COUNT_KEYS)) {
        Some(value) => as_u64(value).unwrap_or(0),
        None => {
            warn!("unexpected_transaction_count_format::address::{}::payload::{}", address, transaction_count);
            0
        },
    };

    AddressInfo {
        balance,
        transaction_count,
        is_exchange: false,
    }
}

/// Single-object address info, as stored in snapshots.
pub fn address_info_from_value(value: &Value) -> Option<AddressInfo> {
    let object = value.as_object()?;
    Some(AddressInfo {
        balance: object.get("balance").and_then(as_sompi).unwrap_or(0),
        transaction_count: first_of(object, &TRANSACTION_COUNT_KEYS).and_then(as_u64).unwrap_or(0),
        is_exchange: object.get("is_exchange").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn first_of<'a>(
    object: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key).filter(|v| !v.is_null()))
}

/// Non-negative amount in sompi. Fractional sompi are truncated.
fn as_sompi(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            let float = number.as_f64()?;
            (float.is_finite() && float >= 0.0).then_some(float as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    as_sompi(value)
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
