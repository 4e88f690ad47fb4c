// Domain records, organized by the tab that owns them

pub mod info;
pub mod networking;
pub mod profile;

pub use info::{InfoContact, NewInfoContact, ResponseGrade};
pub use networking::{NetworkingContact, NewNetworkingContact};
pub use profile::UserProfile;

use chrono::NaiveDate;

/// Calendar date format used by every record's `date` field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Records listed newest-first by their calendar date
pub trait Dated {
    fn date(&self) -> &str;
}

/// Sort by parsed date, newest first. Unparseable dates go last; ties keep
/// their incoming order.
pub fn sort_by_date_desc<T: Dated>(records: &mut [T]) {
    records.sort_by(|a, b| {
        let a = parse_date(a.date());
        let b = parse_date(b.date());
        // None < Some, so reversing puts unparseable dates last
        b.cmp(&a)
    });
}
