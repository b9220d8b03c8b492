//! Ordered accessor lists for every field pulled out of a raw order.
//!
//! Each list is evaluated front to back and the first accessor that yields
//! a non-null value wins. Accessors only read through `Value::get` and
//! `Value::pointer`, so a surprising shape falls through to the next entry
//! instead of failing.

use rust_decimal::Decimal;
use serde_json::Value;

/// Borrows a sub-document out of a value.
pub type Path = for<'a> fn(&'a Value) -> Option<&'a Value>;

/// Produces an owned field from a value.
pub type Extractor<T> = fn(&Value) -> Option<T>;

pub fn first_present<'a>(v: &'a Value, chain: &[Path]) -> Option<&'a Value> {
    chain.iter().find_map(|path| path(v))
}

pub fn first_match<T>(v: &Value, chain: &[Extractor<T>]) -> Option<T> {
    chain.iter().find_map(|f| f(v))
}

/// Token metadata location on a raw order.
pub const NFT_META: &[Path] = &[criteria_metadata, asset, first_asset, item, first_item];

/// Token identifier on the token metadata.
pub const TOKEN_ID: &[Extractor<String>] = &[identifier, token_id_snake, token_id_camel, id];

/// Image URL on the token metadata.
pub const IMAGE: &[Extractor<String>] = &[image_url, image, thumbnail, metadata_image];

/// Protocol-specific order data on a raw order.
pub const ORDER_PAYLOAD: &[Path] = &[
    protocol_data_snake,
    protocol_data_camel,
    nested_protocol_data_snake,
    nested_protocol_data_camel,
];

/// Seller address on a raw order, not yet lowercased.
pub const MAKER: &[Extractor<String>] = &[
    maker_address,
    maker_plain,
    offerer_snake,
    offerer_camel,
    seller_address,
    seller_plain,
];

pub const ORDER_HASH: &[Extractor<String>] = &[
    order_hash_snake,
    order_hash_camel,
    hash,
    nested_order_hash_snake,
    nested_order_hash_camel,
];

/// Listing price in whole currency units.
pub const PRICE: &[Extractor<Decimal>] = &[price_current, current_price_wei, price_value, price_plain];

const WEI_DECIMALS: u32 = 18;

fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|x| !x.is_null())
}

/// Non-empty string, or an integer rendered with all of its digits.
fn as_id(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => as_non_empty(s),
        Value::Number(n) => {
            // Numbers keep their source text, so uint256 ids survive intact.
            let digits = n.to_string();
            let unsigned = digits.strip_prefix('-').unwrap_or(&digits);
            (!unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
        }
        _ => None,
    }
}

fn as_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => as_non_empty(s),
        _ => None,
    }
}

fn as_non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

fn as_decimal(v: Option<&Value>) -> Option<Decimal> {
    match v? {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(s).ok())
        }
        Value::Number(n) => {
            let text = n.to_string();
            text.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&text).ok())
                .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
        }
        _ => None,
    }
}

/// Converts an integer amount of base units (e.g. wei) into whole units.
fn from_base_units(value: Decimal, decimals: u32) -> Option<Decimal> {
    let mut out = value;
    out.set_scale(value.scale().checked_add(decimals)?).ok()?;
    Some(out.normalize())
}

// NftMeta

fn criteria_metadata(o: &Value) -> Option<&Value> {
    present(o.pointer("/criteria/metadata"))
}

fn asset(o: &Value) -> Option<&Value> {
    present(o.get("asset"))
}

fn first_asset(o: &Value) -> Option<&Value> {
    present(o.pointer("/assets/0"))
}

fn item(o: &Value) -> Option<&Value> {
    present(o.get("item"))
}

fn first_item(o: &Value) -> Option<&Value> {
    present(o.pointer("/items/0"))
}

// tokenId

fn identifier(m: &Value) -> Option<String> {
    as_id(m.get("identifier"))
}

fn token_id_snake(m: &Value) -> Option<String> {
    as_id(m.get("token_id"))
}

fn token_id_camel(m: &Value) -> Option<String> {
    as_id(m.get("tokenId"))
}

fn id(m: &Value) -> Option<String> {
    as_id(m.get("id"))
}

// image

fn image_url(m: &Value) -> Option<String> {
    as_text(m.get("image_url"))
}

fn image(m: &Value) -> Option<String> {
    as_text(m.get("image"))
}

fn thumbnail(m: &Value) -> Option<String> {
    as_text(m.get("thumbnail"))
}

fn metadata_image(m: &Value) -> Option<String> {
    as_text(m.pointer("/metadata/image"))
}

// order payload

fn protocol_data_snake(o: &Value) -> Option<&Value> {
    present(o.get("protocol_data"))
}

fn protocol_data_camel(o: &Value) -> Option<&Value> {
    present(o.get("protocolData"))
}

fn nested_protocol_data_snake(o: &Value) -> Option<&Value> {
    present(o.pointer("/order/protocol_data"))
}

fn nested_protocol_data_camel(o: &Value) -> Option<&Value> {
    present(o.pointer("/order/protocolData"))
}

// maker

fn maker_address(o: &Value) -> Option<String> {
    as_text(o.pointer("/maker/address"))
}

fn maker_plain(o: &Value) -> Option<String> {
    as_text(o.get("maker"))
}

fn offerer_snake(o: &Value) -> Option<String> {
    as_text(o.pointer("/protocol_data/parameters/offerer"))
}

fn offerer_camel(o: &Value) -> Option<String> {
    as_text(o.pointer("/protocolData/parameters/offerer"))
}

fn seller_address(o: &Value) -> Option<String> {
    as_text(o.pointer("/seller/address"))
}

fn seller_plain(o: &Value) -> Option<String> {
    as_text(o.get("seller"))
}

// order hash

fn order_hash_snake(o: &Value) -> Option<String> {
    as_text(o.get("order_hash"))
}

fn order_hash_camel(o: &Value) -> Option<String> {
    as_text(o.get("orderHash"))
}

fn hash(o: &Value) -> Option<String> {
    as_text(o.get("hash"))
}

fn nested_order_hash_snake(o: &Value) -> Option<String> {
    as_text(o.pointer("/order/order_hash"))
}

fn nested_order_hash_camel(o: &Value) -> Option<String> {
    as_text(o.pointer("/order/orderHash"))
}

// price

fn price_current(o: &Value) -> Option<Decimal> {
    let value = as_decimal(o.pointer("/price/current/value"))?;
    match o.pointer("/price/current/decimals").and_then(Value::as_u64) {
        Some(d) => from_base_units(value, u32::try_from(d).ok()?),
        None => Some(value),
    }
}

fn current_price_wei(o: &Value) -> Option<Decimal> {
    from_base_units(as_decimal(o.get("current_price"))?, WEI_DECIMALS)
}

fn price_value(o: &Value) -> Option<Decimal> {
    as_decimal(o.pointer("/price/value"))
}

fn price_plain(o: &Value) -> Option<Decimal> {
    as_decimal(o.get("price"))
}
