//! Tests for the line formatter.

use super::*;
use anyhow::{Result, ensure};
use rstest::rstest;
use test_helpers::capture::SharedBuffer;

#[rstest]
#[case(0, 'Z')]
#[case(3600, 'A')]
#[case(9 * 3600, 'I')]
#[case(10 * 3600, 'K')]
#[case(12 * 3600, 'M')]
#[case(-3600, 'N')]
#[case(-12 * 3600, 'Y')]
#[case(5 * 3600 + 1800, 'J')]
#[case(13 * 3600, 'J')]
#[case(-14 * 3600, 'J')]
fn maps_offsets_to_military_zones(#[case] offset: i32, #[case] expected: char) {
    assert_eq!(zone_letter(offset), expected);
}

fn capture(format: LineFormat, emit: impl FnOnce()) -> Result<String> {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .event_format(format)
        .finish();
    tracing::subscriber::with_default(subscriber, emit);
    buffer.contents()
}

#[rstest]
fn lines_carry_tag_target_and_fields() -> Result<()> {
    let text = capture(LineFormat::new().with_time(false), || {
        tracing::warn!(target: "demo", attempts = 3, "retrying");
    })?;
    ensure!(text.contains("WRN"), "missing tag in {text:?}");
    ensure!(text.contains("demo "), "missing target in {text:?}");
    ensure!(text.contains("retrying attempts=3"), "missing fields in {text:?}");
    ensure!(text.ends_with('\n'));
    Ok(())
}

#[rstest]
fn origin_names_the_call_site() -> Result<()> {
    let text = capture(LineFormat::new().with_time(false).with_origin(true), || {
        tracing::info!("located");
    })?;
    ensure!(text.contains("tests.rs"), "missing origin in {text:?}");
    Ok(())
}

#[rstest]
fn timestamps_end_in_a_zone_letter() -> Result<()> {
    let text = capture(LineFormat::new(), || tracing::debug!("stamped"))?;
    ensure!(text.contains("DBG"));
    let zone = zone_letter(Local::now().offset().fix().local_minus_utc());
    ensure!(text.contains(zone), "missing zone {zone} in {text:?}");
    Ok(())
}
