//! `created_at` parsing. Tweets carry e.g. `Wed Oct 10 20:19:24 +0000 2018`.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

const CREATED_AT: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] +0000 [year]"
);

/// Convert a tweet creation time to Unix epoch seconds (UTC).
pub fn parse_created_at(raw: &str) -> Result<i64, time::error::Parse> {
    let dt = PrimitiveDateTime::parse(raw.trim(), CREATED_AT)?;
    Ok(dt.assume_utc().unix_timestamp())
}
