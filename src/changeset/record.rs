//! The decoded changeset record

/// One `<changeset>` element
///
/// Numeric fields are zero and text fields empty when the source omits them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    pub id: i64,
    /// `YYYY-MM-DD`, the first 10 bytes of `created_at`
    pub date: String,
    pub user: String,
    pub uid: i64,
    /// `num_changes`
    pub edit_count: i64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    /// Verbatim `created_by` tag
    pub application_raw: String,
    /// Editor family derived from `application_raw`
    pub application: String,
    pub comment: String,
    pub locale: String,
    /// `StreetComplete:quest_type` tag
    pub quest_type: String,
}

impl Changeset {
    /// Return to the empty state, keeping string capacity
    pub fn reset(&mut self) {
        self.id = 0;
        self.uid = 0;
        self.edit_count = 0;
        self.min_lat = 0.0;
        self.max_lat = 0.0;
        self.min_lon = 0.0;
        self.max_lon = 0.0;
        self.date.clear();
        self.user.clear();
        self.application_raw.clear();
        self.application.clear();
        self.comment.clear();
        self.locale.clear();
        self.quest_type.clear();
    }
}

/// Leading-prefix integer parse; zero when no digits lead
pub(crate) fn parse_int(bytes: &[u8]) -> i64 {
    let text = trim_start(bytes);
    let (negative, digits) = match text.first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let mut value: i64 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        value = value.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
    }
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Leading-prefix float parse; zero when no number leads
pub(crate) fn parse_float(bytes: &[u8]) -> f64 {
    let text = trim_start(bytes);
    let mut end = 0;
    if matches!(text.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut valid = 0;
    while end < text.len() {
        match text[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                valid = end + 1;
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                if matches!(text.get(end + 1), Some(b'-' | b'+')) {
                    end += 1;
                }
            }
            _ => break,
        }
        end += 1;
    }
    std::str::from_utf8(&text[..valid])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}
