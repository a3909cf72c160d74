//! Distance formatting: thousands grouping and optional k/M abbreviation.
//!
//! Abbreviation only kicks in at 10 000 ls and above; below that (or with
//! abbreviation disabled) the full integer is shown with digit grouping. The
//! exact value stays available alongside any abbreviated rendering so a
//! display layer can expose it on demand.

/// Insert `,` thousands separators into a rendered number.
///
/// Only the integer part is grouped; any fractional part is carried through
/// untouched.
fn group_digits(rendered: &str) -> String {
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// Render a number with the given number of decimals and digit grouping.
fn format_grouped(value: f64, decimals: usize) -> String {
    group_digits(&format!("{value:.decimals$}"))
}

/// Format a whole-light-second distance for display.
///
/// With `abbreviate` set, values ≥ 1 000 000 collapse to two decimals plus
/// `M` and values ≥ 10 000 to one decimal plus `k`; everything else is the
/// grouped integer.
pub fn format_distance(value: u64, abbreviate: bool) -> String {
    if abbreviate && value >= 10_000 {
        if value >= 1_000_000 {
            return format!("{}M", format_grouped(value as f64 / 1_000_000.0, 2));
        }
        return format!("{}k", format_grouped(value as f64 / 1_000.0, 1));
    }
    format_grouped(value as f64, 0)
}

/// Full-precision companion text for an abbreviated distance.
pub fn exact_distance(value: u64) -> String {
    format!("Exact distance: {} ls", format_grouped(value as f64, 0))
}
