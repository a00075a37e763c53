//! Deterministic fixture payloads, one per service.

use serde_json::{Value, json};

use matome_core::ServiceName;

/// Canned payload for a service, shaped like the real upstream response.
#[must_use]
pub fn payload(service: ServiceName) -> Value {
    match service {
        ServiceName::Ken2 => json!({
            "zipcode": "1000001",
            "address": "東京都千代田区千代田",
        }),
        ServiceName::Surname => json!({
            "query": "sato",
            "result": [
                { "name": "佐藤", "yomi": "さとう" },
                { "name": "佐島", "yomi": "さとう" },
            ],
        }),
        ServiceName::Givenname => json!({
            "query": "taro",
            "result": [
                { "name": "太郎", "yomi": "たろう" },
            ],
        }),
        ServiceName::Tenki => json!({
            "zipcode": "1000001",
            "weather": "晴れ",
            "date": "2016-01-30 12:00:00",
        }),
        ServiceName::Perfectsec => json!({
            "tokens": ["deadbeef", "cafebabe"],
        }),
        ServiceName::PerfectsecAttacked => json!({
            "attacked_list": [],
            "updated_at": 1_454_125_200,
        }),
    }
}
