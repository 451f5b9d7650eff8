use chrono::{TimeZone, Utc};
use propkit::data::user::{mutable_user, user};
use propkit::timestamp::parse_zone;
use propkit::{Error, Fields, Json, Timestamp, TimestampKind, Value, normalize};

fn fields(created_at: Value) -> Fields {
    [
        ("userId", Value::from(1)),
        ("userName", Value::from("test")),
        ("createdAt", created_at),
    ]
    .into_iter()
    .collect()
}

fn epoch() -> i64 {
    Utc.with_ymd_and_hms(2013, 12, 1, 0, 0, 0).unwrap().timestamp()
}

#[test]
fn created_at_text_becomes_immutable_timestamp() -> Result<(), Box<dyn std::error::Error>> {
    let record = user(fields(Value::from("2013-12-01 00:00:00")), None, None)?;
    let created = record.get("createdAt")?;
    let ts = created.as_timestamp().copied();
    assert_eq!(ts.map(|t| t.kind()), Some(TimestampKind::Immutable));
    assert_eq!(ts.map(|t| t.unix()), Some(epoch()));
    Ok(())
}

#[test]
fn created_at_getter_applies_zone() -> Result<(), Box<dyn std::error::Error>> {
    let tokyo = parse_zone("Asia/Tokyo")?;
    let record = user(fields(Value::from(epoch())), Some(tokyo), None)?;
    assert_eq!(
        record.get("createdAtAsString")?.as_str(),
        Some("2013-12-01 09:00:00")
    );
    let created = record.get("createdAt")?;
    assert_eq!(
        created.as_timestamp().map(Timestamp::to_rfc3339).as_deref(),
        Some("2013-12-01T09:00:00+09:00")
    );
    Ok(())
}

#[test]
fn user_json_form_formats_created_at() -> Result<(), Box<dyn std::error::Error>> {
    let record = user(fields(Value::from(epoch())), None, Some("%Y/%m/%d"))?;
    assert_eq!(
        normalize(&Value::from(record))?,
        Json::Object(vec![
            ("userId".into(), Json::from(1i64)),
            ("userName".into(), Json::from("test")),
            ("createdAt".into(), Json::from("2013/12/01")),
        ])
    );
    Ok(())
}

#[test]
fn immutable_user_refuses_writes() -> Result<(), Box<dyn std::error::Error>> {
    let mut record = user(fields(Value::from(epoch())), None, None)?;
    assert!(matches!(
        record.set("userName", "other"),
        Err(Error::ImmutableWrite { .. })
    ));
    Ok(())
}

#[test]
fn mutable_user_keeps_seconds_and_formats_on_read() -> Result<(), Box<dyn std::error::Error>> {
    let mut record = mutable_user(fields(Value::from("2013-12-01 00:00:00")), None, None)?;
    assert_eq!(record.raw("createdAt").and_then(Value::as_i64), Some(epoch()));
    assert_eq!(
        record.get("createdAt")?.as_str(),
        Some("2013-12-01 00:00:00")
    );

    let later = Timestamp::from_unix(epoch() + 60, TimestampKind::Mutable)?;
    record.set("createdAt", later)?;
    assert_eq!(record.raw("createdAt").and_then(Value::as_i64), Some(epoch() + 60));

    record.set("timezone", "Asia/Tokyo")?;
    assert_eq!(
        record.get("createdAt")?.as_str(),
        Some("2013-12-01 09:01:00")
    );
    Ok(())
}

#[test]
fn mutable_user_rejects_bad_created_at() -> Result<(), Box<dyn std::error::Error>> {
    let mut record = mutable_user(Fields::new(), None, None)?;
    assert!(matches!(
        record.set("createdAt", true),
        Err(Error::InvalidFieldValue { .. })
    ));
    Ok(())
}
