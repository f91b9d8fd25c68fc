use ncl_model::{
    ChangeEvent, ElementTag, ListenerError, NclDocument, Notification, Notifier, Region,
    RegionBase,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn collector() -> (
    Arc<Mutex<Vec<Notification>>>,
    impl Fn(&Notification) -> Result<(), ListenerError> + Send + Sync,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = move |notification: &Notification| -> Result<(), ListenerError> {
        sink.lock().unwrap().push(notification.clone());
        Ok(())
    };
    (seen, listener)
}

#[test]
fn test_notifications_arrive_in_order() {
    let notifier = Notifier::start().unwrap();
    let handle = notifier.handle();
    let (seen, listener) = collector();
    handle.add_listener(listener);

    let mut doc = NclDocument::new("doc").unwrap();
    let region = doc.create("r", Region::new()).unwrap();
    let mut sequences = Vec::new();
    for _ in 0..50 {
        sequences.push(
            handle
                .add_notification(ChangeEvent::Modified {
                    element: region,
                    tag: ElementTag::Region,
                })
                .unwrap(),
        );
    }
    handle.wait_idle();

    let delivered: Vec<u64> = seen.lock().unwrap().iter().map(|n| n.sequence).collect();
    assert_eq!(delivered, sequences);
    assert_eq!(handle.pending(), 0);
    notifier.finish();
}

#[test]
fn test_document_mutations_emit_events() {
    let notifier = Notifier::start().unwrap();
    let handle = notifier.handle();
    let (seen, listener) = collector();
    handle.add_listener(listener);

    let mut doc = NclDocument::new("doc").unwrap();
    let base = doc.insert(RegionBase::new()).unwrap();
    let region = doc.create("r", Region::new()).unwrap();
    doc.set_notifier(handle.clone());

    doc.append(base, region).unwrap();
    doc.set_id(region, "screen").unwrap();
    doc.modify::<Region, _>(region, |r| r.z_index = Some(3)).unwrap();
    doc.remove(base, region).unwrap();
    // Not a child any more: nothing to report.
    assert!(!doc.remove(base, region).unwrap());
    handle.wait_idle();

    let events: Vec<ChangeEvent> = seen.lock().unwrap().iter().map(|n| n.event.clone()).collect();
    assert_eq!(
        events,
        vec![
            ChangeEvent::ElementAdded {
                parent: base,
                child: region,
                tag: ElementTag::Region,
            },
            ChangeEvent::IdChanged {
                element: region,
                old: Some("r".to_string()),
                new: "screen".to_string(),
            },
            ChangeEvent::Modified {
                element: region,
                tag: ElementTag::Region,
            },
            ChangeEvent::ElementRemoved {
                parent: base,
                child: region,
                tag: ElementTag::Region,
            },
        ]
    );
    notifier.finish();
}

#[test]
fn test_failing_listener_does_not_block_others() {
    let notifier = Notifier::start().unwrap();
    let handle = notifier.handle();
    handle.add_listener(|_: &Notification| -> Result<(), ListenerError> {
        panic!("listener bug");
    });
    handle.add_listener(|_: &Notification| -> Result<(), ListenerError> {
        Err("rejected".into())
    });
    let (seen, listener) = collector();
    handle.add_listener(listener);

    let mut doc = NclDocument::new("doc").unwrap();
    let region = doc.create("r", Region::new()).unwrap();
    for _ in 0..3 {
        handle
            .add_notification(ChangeEvent::Modified {
                element: region,
                tag: ElementTag::Region,
            })
            .unwrap();
    }
    handle.wait_idle();

    assert_eq!(seen.lock().unwrap().len(), 3);
    notifier.finish();
}

#[test]
fn test_finish_delivers_queued_events() {
    let notifier = Notifier::start().unwrap();
    let handle = notifier.handle();
    let (seen, listener) = collector();
    handle.add_listener(listener);

    let mut doc = NclDocument::new("doc").unwrap();
    let region = doc.create("r", Region::new()).unwrap();
    doc.set_notifier(handle.clone());
    for z in 0..10 {
        doc.modify::<Region, _>(region, |r| r.z_index = Some(z)).unwrap();
    }
    notifier.finish();

    assert_eq!(seen.lock().unwrap().len(), 10);
    // The document keeps working after the notifier is gone.
    doc.modify::<Region, _>(region, |r| r.z_index = None).unwrap();
}
