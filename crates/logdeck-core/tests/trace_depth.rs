//! Call-site capture through the public logger API

use std::hint::black_box;
use std::sync::Arc;

use parking_lot::Mutex;

use logdeck_core::driver::MemoryDriver;
use logdeck_core::formatter::{formatter_fn, Entry};
use logdeck_core::{Factory, LevelSet, LevelUpdate, Logger};

/// What the formatter saw for each call.
type Seen = Arc<Mutex<Vec<Option<Vec<String>>>>>;

fn traced_logger(level: &str, depth: i64) -> (Logger<str>, Seen) {
    let seen: Seen = Arc::default();
    let sink = seen.clone();
    let formatter = formatter_fn(move |e: &Entry<'_, str>| {
        sink.lock().push(e.traces.map(|t| t.to_vec()));
        Ok(e.log.to_string())
    });

    let factory = Factory::<str>::with_defaults(LevelSet::default(), formatter, Arc::new(MemoryDriver::new()));
    let mut logger = factory.create_logger("trace");
    logger.set_level_options(LevelUpdate::new().level(level).trace_depth(depth));
    (logger, seen)
}

#[inline(never)]
fn nest(remaining: usize, logger: &Logger<str>) {
    if remaining == 0 {
        logger.info("deep").unwrap();
    } else {
        nest(remaining - 1, logger);
    }
    black_box(remaining);
}

#[inline(never)]
fn helper(logger: &Logger<str>) {
    logger.info("x").unwrap();
    black_box(());
}

#[inline(never)]
fn outer(logger: &Logger<str>) {
    helper(logger);
    black_box(());
}

#[test]
fn depth_bounds_the_number_of_frames() {
    for depth in [1usize, 3, 6] {
        let (logger, seen) = traced_logger("info", depth as i64);
        nest(depth + 5, &logger);

        let seen = seen.lock();
        let traces = seen[0].as_ref().expect("traces present when depth > 0");
        assert_eq!(traces.len(), depth);
        // innermost first: every captured frame is inside the recursion
        assert!(traces.iter().all(|frame| frame.contains("nest")), "{:?}", traces);
    }
}

#[test]
fn first_frames_are_caller_then_its_caller() {
    let (logger, seen) = traced_logger("info", 2);
    outer(&logger);

    let seen = seen.lock();
    let traces = seen[0].as_ref().expect("traces present");
    assert_eq!(traces.len(), 2);
    assert!(traces[0].contains("helper"), "{:?}", traces);
    assert!(traces[1].contains("outer"), "{:?}", traces);
}

#[test]
fn zero_depth_passes_no_traces() {
    let (logger, seen) = traced_logger("info", 0);
    outer(&logger);

    assert_eq!(seen.lock().as_slice(), &[None]);
}

#[test]
fn trace_depth_is_per_level() {
    let (logger, seen) = traced_logger("error", 2);
    logger.info("plain").unwrap();
    logger.error("traced").unwrap();

    let seen = seen.lock();
    assert!(seen[0].is_none());
    assert!(seen[1].as_ref().is_some_and(|t| !t.is_empty()));
}

#[test]
fn frames_are_deterministic_for_the_same_call_site() {
    let (logger, seen) = traced_logger("info", 3);
    for _ in 0..2 {
        outer(&logger);
    }

    let seen = seen.lock();
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn negative_depth_disables_tracing() {
    let (logger, seen) = traced_logger("info", -2);
    assert_eq!(logger.get_level("info").unwrap().trace_depth, 0);
    helper(&logger);
    assert_eq!(seen.lock().as_slice(), &[None]);
}
