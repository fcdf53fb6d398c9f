//! Message formatting for the notification channel.

use chrono::{DateTime, Utc};
use seatwatch_core::SectionRecord;

fn ts_str(t: DateTime<Utc>) -> String {
    t.format("%H:%M:%S").to_string()
}

pub fn format_monitoring_started(course: &str, count: usize) -> String {
    let mut out = String::new();
    out.push_str("📋 MONITORING STARTED\n");
    out.push_str(&format!("{course}\n"));
    out.push_str(&format!("monitoring {count} sections\n"));
    out.push_str(&format!("ts={}", ts_str(Utc::now())));
    out
}

pub fn format_new_sections(course: &str, added: usize) -> String {
    let mut out = String::new();
    out.push_str("🆕 SECTIONS ADDED\n");
    out.push_str(&format!("{course}\n"));
    out.push_str(&format!("{added} new sections added\n"));
    out.push_str(&format!("ts={}", ts_str(Utc::now())));
    out
}

pub fn format_open_seats(course: &str, record: &SectionRecord) -> String {
    let mut out = String::new();
    out.push_str("🟢 OPEN SEATS\n");
    out.push_str(&format!("{course}\n"));
    out.push_str(&format!(
        "section {} (class #{})\n",
        record.section, record.class_number
    ));
    out.push_str(&format!("instructor: {}\n", record.instructor));
    out.push_str(&format!("open={}\n", record.open_seats));
    out.push_str(&format!("ts={}", ts_str(Utc::now())));
    out
}

pub fn format_no_seats(course: &str, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("🔴 NO SEATS\n");
    out.push_str(&format!("{course}\n"));
    out.push_str("no open seats in any section\n");
    out.push_str(&format!(
        "at {} on {}",
        at.format("%H:%M:%S"),
        at.format("%d/%m/%Y")
    ));
    out
}

pub fn format_extract_error(course: &str, detail: &str) -> String {
    let mut out = String::new();
    out.push_str("⚠️ EXTRACTION ERROR\n");
    out.push_str(&format!("{course}\n"));
    out.push_str(&format!("{detail}\n"));
    out.push_str(&format!("ts={}", ts_str(Utc::now())));
    out
}
