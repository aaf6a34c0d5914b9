use time::{
    format_description::well_known::Rfc3339,
    macros::{format_description, offset},
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

/// Display offset for lesson schedules. Asia/Bishkek has used a fixed +06:00
/// since 2005, so a constant offset is sufficient.
pub(crate) const LOCAL_OFFSET: UtcOffset = offset!(+6);

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Reinterpret a stored naive timestamp as local wall-clock time and render it
/// with the local offset attached. This is a display convention: the stored
/// value is taken as entered, not converted between zones.
pub(crate) fn format_local_wallclock(value: PrimitiveDateTime) -> String {
    let local = value.assume_offset(LOCAL_OFFSET);
    local.format(&Rfc3339).unwrap_or_else(|_| local.to_string())
}

/// Parse a schedule timestamp from client input. Offset-carrying RFC 3339
/// values are shifted to local wall-clock time before the offset is dropped;
/// naive values are stored exactly as entered.
pub(crate) fn parse_wallclock(value: &str) -> Result<PrimitiveDateTime, String> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        let local = parsed.to_offset(LOCAL_OFFSET);
        return Ok(PrimitiveDateTime::new(local.date(), local.time()));
    }

    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(value, naive).map_err(|_| format!("invalid datetime: {value}"))
}
