//! The exported demonstration handlers.
//!
//! Every handler follows the same protocol: validate arity, convert each
//! required argument, perform one trivial action, convert the result back.
//! Failures are recovered here and reported as "no result"; the dispatcher
//! never sees an error. The single exception is the error-handling
//! demonstration, which deliberately surfaces one caught failure as a
//! foreign error object.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::convert::{FromFre, IntoFre};
use crate::error::FreError;
use crate::geom::{Point, Rectangle};
use crate::host::{FreContext, sepia_tone};
use crate::value::{FreHandle, FreType, FreValue};

const SEPIA_INTENSITY: f64 = 0.8;

/// String round-trip: read the incoming string, hand back a fixed one.
pub(crate) fn run_string_tests(_ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("string demonstration");
    let incoming = String::from_fre(args.first()?).ok()?;
    debug!(value = %incoming, "string passed from the host");
    Some("I am a string from Rust".into_fre())
}

/// Number round-trip: the slot must convert both as f64 and as f32.
pub(crate) fn run_number_tests(_ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("number demonstration");
    let slot = args.first()?;
    let as_double = f64::from_fre(slot).ok()?;
    let as_float = f32::from_fre(slot).ok()?;
    debug!(as_double, as_float = %as_float, "number passed from the host");
    Some(34343.31f64.into_fre())
}

/// Signed/unsigned integer round-trip.
pub(crate) fn run_int_tests(_ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("int and uint demonstration");
    if args.len() < 2 {
        return None;
    }
    let signed = i32::from_fre(&args[0]).ok()?;
    let unsigned = u32::from_fre(&args[1]).ok()?;
    debug!(signed, unsigned, "integers passed from the host");
    Some((-666i32).into_fre())
}

/// Array mutation: replace element 0 in place and return the same handle.
pub(crate) fn run_array_tests(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("array demonstration");
    let [FreValue::Object(handle)] = args else {
        return None;
    };
    match replace_first_element(ctx, *handle) {
        Ok(()) => Some(FreValue::Object(*handle)),
        Err(err) => {
            warn!(error = %err, "array demonstration failed");
            None
        }
    }
}

fn replace_first_element(ctx: &mut FreContext, array: FreHandle) -> Result<(), FreError> {
    let length = ctx.array_length(array)?;
    debug!(length, "array passed from the host");
    let current = i32::from_fre(&ctx.array_get(array, 0)?)?;
    trace!(current, "element 0 before replacement");
    ctx.array_set(array, 0, FreValue::Int(56))
}

/// Object mutation: bump a property, call a method, inspect as a map,
/// return the same handle.
pub(crate) fn run_object_tests(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("object demonstration");
    let [FreValue::Object(handle)] = args else {
        return None;
    };
    match bump_age(ctx, *handle) {
        Ok(()) => Some(FreValue::Object(*handle)),
        Err(err) => {
            warn!(error = %err, "object demonstration failed");
            None
        }
    }
}

fn bump_age(ctx: &mut FreContext, person: FreHandle) -> Result<(), FreError> {
    let age = i32::from_fre(&ctx.object_property(person, "age")?)?;
    debug!(age, "current person age");
    ctx.set_object_property(person, "age", FreValue::Int(age + 10))?;

    let sum = ctx.call_object_method(person, "add", &[FreValue::Int(100), FreValue::Int(31)])?;
    if let Ok(total) = i32::from_fre(&sum) {
        debug!(total, "addition result");
    }

    let map = ctx.object_to_map(person)?;
    debug!(?map, "object converted to a key/value map");
    Ok(())
}

/// Bitmap filter: acquire the pixels under a scoped lock, run the sepia
/// filter, attach a preview through the UI capability.
pub(crate) fn run_bitmap_tests(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("bitmap demonstration");
    let [FreValue::Object(handle)] = args else {
        return None;
    };
    if let Err(err) = filter_and_attach(ctx, *handle) {
        warn!(error = %err, "bitmap demonstration failed");
    }
    trace!("bitmap demonstration finished");
    None
}

fn filter_and_attach(ctx: &mut FreContext, bitmap: FreHandle) -> Result<(), FreError> {
    let preview = {
        // The lock releases the buffer when it drops, on every path below.
        let mut lock = ctx.acquire_bitmap(bitmap)?;
        if lock.is_empty() {
            return Ok(());
        }
        sepia_tone(lock.pixels_mut(), SEPIA_INTENSITY);
        lock.snapshot()
    };
    ctx.attach_preview(preview);
    Ok(())
}

/// Byte buffer digest: acquire the bytes, base64-encode, release.
pub(crate) fn run_byte_array_tests(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("byte array demonstration");
    let [FreValue::Object(handle)] = args else {
        return None;
    };
    match encode_bytes(ctx, *handle) {
        Ok(encoded) => debug!(encoded = %encoded, "encoded to base64"),
        Err(err) => warn!(error = %err, "byte array demonstration failed"),
    }
    None
}

fn encode_bytes(ctx: &mut FreContext, buffer: FreHandle) -> Result<String, FreError> {
    // The lock releases the buffer when it drops.
    let lock = ctx.acquire_bytes(buffer)?;
    Ok(STANDARD.encode(lock.bytes()))
}

/// Shared data slot: store the incoming value on the context and read it
/// back out.
pub(crate) fn run_data_tests(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("shared data demonstration");
    let slot = args.first()?;
    if slot.is_null() {
        return None;
    }
    ctx.set_shared_data(slot.clone());
    Some(ctx.shared_data())
}

/// Error handling, two tiers: a short method call is caught and only
/// traced; a missing property is surfaced as a foreign error object.
pub(crate) fn run_error_tests(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("error handling demonstration");
    let [FreValue::Object(handle)] = args else {
        return None;
    };

    // Deliberately short call: stays local, never reaches the caller.
    if let Err(err) = ctx.call_object_method(*handle, "add", &[FreValue::Int(2)]) {
        debug!(error = %err, "short method call failed locally");
    }

    // Deliberate missing property: this one goes back as an error object.
    match ctx.object_property(*handle, "doNotExist") {
        Ok(_) => None,
        Err(err) => Some(ctx.error_object(&err)),
    }
}

/// Checked narrowing: inspect the declared type tag before trusting the
/// value's shape.
pub(crate) fn run_error_tests_2(ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("checked narrowing demonstration");
    let slot = args.first()?;
    let tag = ctx.type_of(slot);
    if tag != FreType::Int {
        debug!(actual = ?tag, "expected the foreign value to carry an int");
        return None;
    }
    // The tag is known to be Int, so this narrowing cannot fail.
    let FreValue::Int(value) = slot else {
        return None;
    };
    trace!(value, "narrowing succeeded");
    None
}

/// Point/rectangle round-trip: inspect both, hand back a fixed point.
pub(crate) fn run_rect_tests(_ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("rectangle and point demonstration");
    let [first, second, ..] = args else {
        trace!("rectangle demonstration returning early");
        return None;
    };
    if first.is_null() || second.is_null() {
        trace!("rectangle demonstration returning early");
        return None;
    }
    if let Ok(point) = Point::from_fre(first) {
        debug!(?point, "point passed from the host");
    }
    if let Ok(rect) = Rectangle::from_fre(second) {
        debug!(?rect, "rectangle passed from the host");
    }
    Some(Point::new(10.2, 99.9).into_fre())
}

/// Date round-trip, millisecond precision.
pub(crate) fn run_date_tests(_ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
    trace!("date demonstration");
    let date = DateTime::<Utc>::from_fre(args.first()?).ok()?;
    debug!(epoch_millis = date.timestamp_millis(), "date passed from the host");
    Some(date.into_fre())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BitmapData, HostMethod, ScriptObject};

    fn object_handle(value: FreValue) -> FreHandle {
        match value {
            FreValue::Object(handle) => handle,
            other => panic!("expected an object handle, got {}", other.type_name()),
        }
    }

    #[test]
    fn encode_bytes_matches_standard_base64() {
        let mut ctx = FreContext::new();
        let buffer = object_handle(ctx.new_byte_array(vec![0, 1, 2]));
        assert_eq!(encode_bytes(&mut ctx, buffer).unwrap(), "AAEC");
    }

    #[test]
    fn replace_first_element_requires_an_integer() {
        let mut ctx = FreContext::new();
        let array = object_handle(ctx.new_array(vec![FreValue::String("seven".into())]));
        assert!(replace_first_element(&mut ctx, array).is_err());
        assert_eq!(
            ctx.array_get(array, 0).unwrap(),
            FreValue::String("seven".into())
        );
    }

    #[test]
    fn bump_age_needs_the_add_method() {
        let mut ctx = FreContext::new();
        let person = object_handle(
            ctx.new_object(ScriptObject::new("Person").with_property("age", FreValue::Int(5))),
        );
        assert!(matches!(
            bump_age(&mut ctx, person),
            Err(FreError::NoSuchName { .. })
        ));
    }

    #[test]
    fn filter_and_attach_releases_on_the_empty_path() {
        let mut ctx = FreContext::new();
        let bitmap = object_handle(ctx.new_bitmap(BitmapData::new(0, 0)));
        filter_and_attach(&mut ctx, bitmap).unwrap();
        match ctx.heap().get(bitmap).unwrap() {
            crate::host::HostObject::Bitmap(data) => {
                assert_eq!(data.release_count(), 1);
                assert!(!data.is_acquired());
            }
            other => panic!("expected bitmap, got {}", other.type_name()),
        }
    }

    #[test]
    fn run_error_tests_keeps_short_calls_local() {
        let mut ctx = FreContext::new();
        let called = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let seen = called.clone();
        let person = ctx.new_object(
            ScriptObject::new("Person")
                .with_property("age", FreValue::Int(5))
                .with_method(
                    "add",
                    HostMethod::new(2, move |_args| {
                        seen.store(true, std::sync::atomic::Ordering::SeqCst);
                        Ok(FreValue::Int(0))
                    }),
                ),
        );
        let result = run_error_tests(&mut ctx, &[person]);
        // The short call never reached the method body, and the missing
        // property came back as an error object, not a silent failure.
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
        let handle = object_handle(result.unwrap());
        assert_eq!(ctx.type_of(&FreValue::Object(handle)), FreType::Error);
    }
}
