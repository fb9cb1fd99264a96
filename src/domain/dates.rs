//! Indonesian date labels (`id-ID` locale).

use chrono::{Datelike, NaiveDate};

const MONTHS_LONG: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// `2 Januari 2025`
pub fn format_long(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS_LONG[date.month0() as usize], date.year())
}

/// `2 Jan`
pub fn format_short(date: NaiveDate) -> String {
    format!("{} {}", date.day(), MONTHS_SHORT[date.month0() as usize])
}
