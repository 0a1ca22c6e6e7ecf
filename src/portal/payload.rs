// ABOUTME: Decodes a Lambda invoke Payload as it arrives through the portal.
// ABOUTME: Accepts byte-index objects, byte arrays, and base64 strings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Turn the JSON rendering of a byte buffer back into bytes.
///
/// A `Uint8Array` serialises as `{"0": 123, "1": 34, ...}`; some proxies send
/// a plain array or a base64 string instead. `null` is an empty payload.
pub fn decode_payload(value: &Value) -> Result<Vec<u8>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(encoded) => STANDARD
            .decode(encoded)
            .map_err(|e| format!("payload is not base64: {e}")),
        Value::Array(items) => items.iter().map(byte).collect(),
        Value::Object(map) => {
            let mut indexed = map
                .iter()
                .map(|(key, item)| {
                    let index = key
                        .parse::<usize>()
                        .map_err(|_| format!("payload key '{key}' is not a byte index"))?;
                    Ok((index, byte(item)?))
                })
                .collect::<Result<Vec<_>, String>>()?;
            indexed.sort_unstable_by_key(|(index, _)| *index);
            if indexed.iter().enumerate().any(|(pos, (index, _))| pos != *index) {
                return Err("payload byte indices are not contiguous".to_string());
            }
            Ok(indexed.into_iter().map(|(_, b)| b).collect())
        }
        other => Err(format!("unexpected payload {other}")),
    }
}

fn byte(value: &Value) -> Result<u8, String> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| format!("payload element {value} is not a byte"))
}
