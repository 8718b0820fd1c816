//! Resize notifications driving the scale resolver.
//!
//! A host (browser shell, native window, test harness) reports content-box
//! and viewport size changes into a [`ResizeHub`]. Interested parties
//! subscribe and get a [`Subscription`] back; dropping it unsubscribes, so
//! observers are released on every exit path. Hosts with no notification
//! primitive can use a [`PollingObserver`] instead.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::debug;

use crate::ScaleResolver;

/// A size change reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeEvent {
    /// The unscaled annotated block changed height (image load, responsive swap)
    Content { height: f64 },
    /// The viewport changed height
    Viewport { height: f64 },
}

pub type ResizeHandler = Arc<dyn Fn(ResizeEvent) + Send + Sync>;

/// Something that delivers resize events to subscribers.
pub trait ResizeSource: Send + Sync {
    /// Register a handler; it stays registered while the subscription lives.
    fn subscribe(&self, handler: ResizeHandler) -> Subscription;
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, ResizeHandler)>,
}

fn lock(m: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle for a registered handler; dropping it removes the handler.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Host-driven event source. Cloning shares the same subscriber list.
#[derive(Clone, Default)]
pub struct ResizeHub {
    registry: Arc<Mutex<Registry>>,
}

impl ResizeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event synchronously to every current subscriber.
    pub fn emit(&self, event: ResizeEvent) {
        let handlers: Vec<ResizeHandler> = lock(&self.registry)
            .handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

impl ResizeSource for ResizeHub {
    fn subscribe(&self, handler: ResizeHandler) -> Subscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, handler));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }
}

/// A resolver bound to a resize source for as long as this value lives.
pub struct MountedResolver {
    resolver: Arc<ScaleResolver>,
    _subscription: Subscription,
}

impl MountedResolver {
    pub fn resolver(&self) -> &Arc<ScaleResolver> {
        &self.resolver
    }
}

impl ScaleResolver {
    /// Feed resize events from `source` into this resolver until the returned
    /// handle is dropped.
    pub fn mount(self: &Arc<Self>, source: &dyn ResizeSource) -> MountedResolver {
        let weak = Arc::downgrade(self);
        let subscription = source.subscribe(Arc::new(move |event: ResizeEvent| {
            let Some(resolver) = weak.upgrade() else {
                return;
            };
            match event {
                ResizeEvent::Content { height } => resolver.observe_content_height(height),
                ResizeEvent::Viewport { height } => resolver.observe_viewport_height(height),
            };
        }));
        debug!("Scale resolver mounted");
        MountedResolver {
            resolver: self.clone(),
            _subscription: subscription,
        }
    }
}

#[cfg(feature = "polling")]
pub use polling::{Measurement, PollingObserver};

#[cfg(feature = "polling")]
mod polling {
    use std::time::Duration;

    use tokio::task::JoinHandle;
    use tokio::time::MissedTickBehavior;

    use super::{ResizeEvent, ResizeHub};

    const MIN_INTERVAL: Duration = Duration::from_millis(16);
    const MAX_INTERVAL: Duration = Duration::from_secs(1);

    /// One sample of the sizes the resolver cares about
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Measurement {
        pub content_height: Option<f64>,
        pub viewport_height: Option<f64>,
    }

    /// Periodically samples sizes and emits an event whenever one changes.
    ///
    /// Must be created inside a tokio runtime. The sampling task is aborted
    /// when the observer is dropped.
    pub struct PollingObserver {
        handle: JoinHandle<()>,
    }

    impl PollingObserver {
        /// Start polling. `interval` is clamped to 16ms..=1s.
        pub fn spawn<F>(hub: ResizeHub, interval: Duration, measure: F) -> Self
        where
            F: Fn() -> Measurement + Send + 'static,
        {
            let period = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
            let handle = tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                let mut last = Measurement::default();
                loop {
                    ticker.tick().await;
                    let now = measure();
                    if now.viewport_height != last.viewport_height {
                        if let Some(height) = now.viewport_height {
                            hub.emit(ResizeEvent::Viewport { height });
                        }
                    }
                    if now.content_height != last.content_height {
                        if let Some(height) = now.content_height {
                            hub.emit(ResizeEvent::Content { height });
                        }
                    }
                    last = now;
                }
            });
            Self { handle }
        }
    }

    impl Drop for PollingObserver {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = ResizeHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let sub = hub.subscribe(Arc::new(move |_: ResizeEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        hub.emit(ResizeEvent::Viewport { height: 100.0 });
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        hub.emit(ResizeEvent::Viewport { height: 200.0 });
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mounted_resolver_follows_events_until_unmounted() {
        let hub = ResizeHub::new();
        let resolver = Arc::new(ScaleResolver::new(1000.0));
        let mounted = resolver.mount(&hub);

        hub.emit(ResizeEvent::Content { height: 1000.0 });
        assert_eq!(mounted.resolver().scale(), 0.8);
        hub.emit(ResizeEvent::Viewport { height: 2000.0 });
        assert_eq!(resolver.scale(), 1.0);

        drop(mounted);
        assert_eq!(hub.subscriber_count(), 0);
        hub.emit(ResizeEvent::Viewport { height: 500.0 });
        assert_eq!(resolver.scale(), 1.0);
    }
}
