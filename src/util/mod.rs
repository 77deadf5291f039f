use crate::models::NoteId;

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

pub(crate) fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// `note_{ms}_{seq}`; `seq` comes from the engine context, never reused.
pub(crate) fn make_note_id(now_ms: i64, seq: u64) -> NoteId {
    format!("note_{now_ms}_{seq}")
}

/// 32-bit string hash over UTF-16 code units (`h = h * 31 + unit`), made
/// non-negative. Widened to i64 so `i32::MIN` has an absolute value.
pub(crate) fn hash_code(s: &str) -> i64 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    (hash as i64).abs()
}

pub(crate) fn generate_page_id(href: &str, markup: &str, now_ms: i64) -> String {
    let seed = format!("{href}{markup}{now_ms}");
    format!("page_{}", hash_code(&seed))
}

/// Uniform value in `[0, 1)`. Falls back to the middle of the range when the
/// platform source is unavailable.
pub(crate) fn random_unit() -> f64 {
    let mut buf = [0u8; 8];
    if getrandom::getrandom(&mut buf).is_err() {
        return 0.5;
    }
    // 53 random mantissa bits.
    (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64
}

pub(crate) fn px(v: f64) -> String {
    format!("{v}px")
}
