//! Raw text spans with addressable numeric fields.
//!
//! Descriptor files are kept as an ordered list of source spans. A span
//! is either fully opaque or carries numeric slots that can be
//! rewritten in place; everything around a slot replays verbatim, so an
//! untouched document serializes back byte-for-byte.

/// A numeric field inside a span: its byte range in the original text
/// and its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumSlot {
    pub start: usize,
    pub end: usize,
    pub value: i64,
}

/// Source text whose numeric fields can be rewritten while the
/// surrounding bytes replay verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SplicedSpan {
    raw: String,
    slots: Vec<NumSlot>,
    dirty: bool,
}

impl SplicedSpan {
    pub fn new(raw: String, slots: Vec<NumSlot>) -> Self {
        Self {
            raw,
            slots,
            dirty: false,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn value(&self, slot: usize) -> i64 {
        self.slots[slot].value
    }

    pub fn set(&mut self, slot: usize, value: i64) {
        if self.slots[slot].value != value {
            self.slots[slot].value = value;
            self.dirty = true;
        }
    }

    pub fn render_into(&self, out: &mut String) {
        if !self.dirty {
            out.push_str(&self.raw);
            return;
        }
        let mut pos = 0;
        for slot in &self.slots {
            out.push_str(&self.raw[pos..slot.start]);
            out.push_str(&slot.value.to_string());
            pos = slot.end;
        }
        out.push_str(&self.raw[pos..]);
    }
}

/// Incrementally build a span and its slot table at the same time.
/// Used when synthesizing canonical text for fresh documents.
pub(crate) struct SpanBuilder {
    raw: String,
    slots: Vec<NumSlot>,
}

impl SpanBuilder {
    pub fn new() -> Self {
        Self {
            raw: String::new(),
            slots: Vec::new(),
        }
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.raw.push_str(text);
        self
    }

    pub fn slot(&mut self, value: i64) -> &mut Self {
        let start = self.raw.len();
        self.raw.push_str(&value.to_string());
        self.slots.push(NumSlot {
            start,
            end: self.raw.len(),
            value,
        });
        self
    }

    pub fn build(self) -> SplicedSpan {
        SplicedSpan::new(self.raw, self.slots)
    }
}

/// Case-insensitive ASCII substring search.
pub(crate) fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || from > hay.len() || hay.len() - from < pat.len() {
        return None;
    }
    (from..=hay.len() - pat.len()).find(|&at| hay[at..at + pat.len()].eq_ignore_ascii_case(pat))
}

/// Capture the next integer at or after `from`, skipping whitespace and
/// a single `:` separator. Returns `None` when no digits follow.
pub(crate) fn next_int(raw: &str, from: usize) -> Option<NumSlot> {
    let bytes = raw.as_bytes();
    let mut idx = from;
    while idx < bytes.len() && (bytes[idx] == b':' || bytes[idx].is_ascii_whitespace()) {
        idx += 1;
    }
    let start = idx;
    if idx < bytes.len() && bytes[idx] == b'-' {
        idx += 1;
    }
    let digits_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == digits_start {
        return None;
    }
    let value = raw[start..idx].parse().ok()?;
    Some(NumSlot {
        start,
        end: idx,
        value,
    })
}

/// Capture the first integer following `keyword`.
pub(crate) fn int_after(raw: &str, keyword: &str, from: usize) -> Option<NumSlot> {
    let at = find_ci(raw, keyword, from)?;
    next_int(raw, at + keyword.len())
}
