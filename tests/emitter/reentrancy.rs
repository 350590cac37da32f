//! Snapshot semantics when handlers modify the emitter during `trigger`.

use named_emitter::{EventEmitter, Unsubscribe};
use std::sync::{Arc, Mutex};

fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn handler_added_during_trigger_is_not_called_in_current_pass() {
    let emitter: Arc<EventEmitter<i32>> = Arc::new(EventEmitter::new());
    let log = make_log();

    // First handler: during its call, it registers a second handler.
    {
        let emitter_clone = Arc::clone(&emitter);
        let log_clone = Arc::clone(&log);

        emitter.on("ping", move |_| {
            log_clone.lock().unwrap().push("first".to_string());
            let log2 = Arc::clone(&log_clone);
            emitter_clone.on("ping", move |_| log2.lock().unwrap().push("second".to_string()));
        });
    }

    emitter.trigger("ping", &1);
    assert_eq!(*log.lock().unwrap(), vec!["first"]);

    // The late registration fires from the next pass on.
    log.lock().unwrap().clear();
    emitter.trigger("ping", &2);
    let log_guard = log.lock().unwrap();
    assert_eq!(log_guard[0], "first");
    assert!(log_guard.contains(&"second".to_string()));
}

#[test]
fn handler_removed_during_trigger_is_still_called_in_current_pass() {
    let emitter: Arc<EventEmitter<i32>> = Arc::new(EventEmitter::new());
    let log = make_log();
    let slot: Arc<Mutex<Option<Unsubscribe>>> = Arc::new(Mutex::new(None));

    // First handler removes the second mid-delivery.
    {
        let log = Arc::clone(&log);
        let slot = Arc::clone(&slot);
        emitter.on("ping", move |d| {
            log.lock().unwrap().push(format!("first:{d}"));
            if let Some(off) = slot.lock().unwrap().as_ref() {
                off.unsubscribe();
            }
        });
    }
    let off_second = {
        let log = Arc::clone(&log);
        emitter.on("ping", move |d| log.lock().unwrap().push(format!("second:{d}")))
    };
    *slot.lock().unwrap() = Some(off_second);

    emitter.trigger("ping", &1);
    emitter.trigger("ping", &2);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:1", "second:1", "first:2"]
    );
}

#[test]
fn handler_can_unsubscribe_itself() {
    let emitter: Arc<EventEmitter<i32>> = Arc::new(EventEmitter::new());
    let calls = Arc::new(Mutex::new(0));
    let slot: Arc<Mutex<Option<Unsubscribe>>> = Arc::new(Mutex::new(None));

    let off = {
        let calls = Arc::clone(&calls);
        let slot = Arc::clone(&slot);
        emitter.on("ping", move |_| {
            *calls.lock().unwrap() += 1;
            if let Some(off) = slot.lock().unwrap().as_ref() {
                off.unsubscribe();
            }
        })
    };
    *slot.lock().unwrap() = Some(off);

    emitter.trigger("ping", &1);
    emitter.trigger("ping", &2);

    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn handler_can_trigger_another_event() {
    let emitter: Arc<EventEmitter<i32>> = Arc::new(EventEmitter::new());
    let log = make_log();

    {
        let emitter_clone = Arc::clone(&emitter);
        let log = Arc::clone(&log);
        emitter.on("outer", move |d| {
            log.lock().unwrap().push(format!("outer:{d}"));
            emitter_clone.trigger("inner", &(d + 1));
        });
    }
    {
        let log = Arc::clone(&log);
        emitter.on("inner", move |d| log.lock().unwrap().push(format!("inner:{d}")));
    }

    emitter.trigger("outer", &1);

    assert_eq!(*log.lock().unwrap(), vec!["outer:1", "inner:2"]);
}
