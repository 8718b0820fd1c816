#![cfg(feature = "polling")]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use screenshot_annotator::label::{Direction, Label, Point};
use screenshot_annotator::observe::{Measurement, PollingObserver, ResizeEvent, ResizeHub};
use screenshot_annotator::{Annotator, ImageSource, LayoutConfig, Viewport};

fn annotator(viewport_height: u32) -> Annotator {
    let point = Point::new(85.0, 75.0).unwrap();
    let labels =
        vec![Label::new("debug", "Debug", point, Direction::Bottom).bend(Direction::Right)];
    Annotator::new(
        ImageSource::new("/demo.png"),
        labels,
        LayoutConfig::default(),
        Viewport { width: 1280, height: viewport_height },
    )
    .expect("annotator")
}

#[test]
fn hub_events_recompose_with_new_scale() {
    let a = annotator(1000);
    let hub = ResizeHub::new();
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    a.resolver().on_reserved_height(move |h| sink.lock().unwrap().push(h));

    let mounted = a.resolver().mount(&hub);
    hub.emit(ResizeEvent::Content { height: 1000.0 });
    assert_eq!(a.compose().labels[0].geometry.text.counter_scale, 1.25);

    hub.emit(ResizeEvent::Viewport { height: 500.0 });
    let c = a.compose();
    assert_eq!(c.scale, 0.4);
    assert_eq!(c.labels[0].geometry.text.counter_scale, 2.5);

    drop(mounted);
    hub.emit(ResizeEvent::Viewport { height: 5000.0 });
    assert_eq!(a.compose().scale, 0.4);
    assert_eq!(*reported.lock().unwrap(), vec![Some(800.0), Some(400.0)]);
}

#[tokio::test]
async fn polling_observer_picks_up_size_changes() {
    let a = annotator(1000);
    let hub = ResizeHub::new();
    let _mounted = a.resolver().mount(&hub);

    // heights stored as f64 bits so the sampler can read them lock-free
    let content = Arc::new(AtomicU64::new(1000f64.to_bits()));
    let sampled = content.clone();
    let poller = PollingObserver::spawn(hub.clone(), Duration::from_millis(1), move || Measurement {
        content_height: Some(f64::from_bits(sampled.load(Ordering::SeqCst))),
        viewport_height: Some(1000.0),
    });

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(a.resolver().scale(), 0.8);

    content.store(400f64.to_bits(), Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(a.resolver().scale(), 1.0);

    drop(poller);
    content.store(4000f64.to_bits(), Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(a.resolver().scale(), 1.0);
}
