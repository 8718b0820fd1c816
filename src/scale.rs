//! Scale resolution: fit the annotated block into the viewport height.
//!
//! The resolver keeps the last measured natural (unscaled) height of the
//! block and the last viewport height, and recomputes the scale whenever
//! either changes. Each recomputation replaces the previous value outright.

use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use serde::Serialize;

/// Share of the viewport height the scaled block may occupy
pub const VIEWPORT_BUDGET: f64 = 0.8;

/// Scale factor that fits `natural_height` into 80% of `viewport_height`.
///
/// Never scales up. Returns `1.0` until a usable measurement exists, so a
/// zero, negative or non-finite input never yields a division by zero or NaN.
/// The result stays strictly positive even for extreme ratios.
///
/// ```
/// use screenshot_annotator::resolve;
/// assert_eq!(resolve(1000.0, 1000.0), 0.8);
/// assert_eq!(resolve(500.0, 1000.0), 1.0);
/// assert_eq!(resolve(0.0, 1000.0), 1.0);
/// ```
pub fn resolve(natural_height: f64, viewport_height: f64) -> f64 {
    let budget = VIEWPORT_BUDGET * viewport_height;
    let measurable = |v: f64| v.is_finite() && v > 0.0;
    if !measurable(natural_height) || !measurable(budget) {
        return 1.0;
    }
    (budget / natural_height).min(1.0).max(f64::MIN_POSITIVE)
}

/// Current outcome of scale resolution for one rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleState {
    /// Last measured unscaled height, `None` until the first measurement
    pub natural_height: Option<f64>,
    /// Always in `(0, 1]`
    pub scale: f64,
}

impl ScaleState {
    /// Height the container must reserve for the scaled block.
    pub fn reserved_height(&self) -> Option<f64> {
        self.natural_height.map(|h| h * self.scale)
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self { natural_height: None, scale: 1.0 }
    }
}

type ReservedHeightHandler = Arc<dyn Fn(Option<f64>) + Send + Sync>;

struct Inner {
    state: ScaleState,
    viewport_height: f64,
}

/// Owns the [`ScaleState`] of one rendering.
///
/// Measurements may arrive from observer callbacks, so the state lives behind
/// a mutex; the resolver is the only writer.
pub struct ScaleResolver {
    inner: Mutex<Inner>,
    on_reserved_height: Mutex<Option<ReservedHeightHandler>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScaleResolver {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ScaleState::default(),
                viewport_height,
            }),
            on_reserved_height: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ScaleState {
        lock(&self.inner).state
    }

    pub fn scale(&self) -> f64 {
        self.state().scale
    }

    pub fn reserved_height(&self) -> Option<f64> {
        self.state().reserved_height()
    }

    pub fn viewport_height(&self) -> f64 {
        lock(&self.inner).viewport_height
    }

    /// Register a callback receiving the reserved height each time it changes.
    ///
    /// `None` means the content is no longer measured and the container
    /// should go back to its natural height.
    pub fn on_reserved_height<F>(&self, cb: F)
    where
        F: Fn(Option<f64>) + Send + Sync + 'static,
    {
        *lock(&self.on_reserved_height) = Some(Arc::new(cb));
    }

    /// Remove a previously registered reserved-height callback, if any
    pub fn clear_on_reserved_height(&self) {
        *lock(&self.on_reserved_height) = None;
    }

    /// Record a new unscaled content height and re-resolve.
    ///
    /// A non-positive height means the content has not been measured yet.
    pub fn observe_content_height(&self, height: f64) -> f64 {
        self.update(|inner| {
            inner.state.natural_height = (height.is_finite() && height > 0.0).then_some(height);
        })
    }

    /// Record a new viewport height and re-resolve.
    ///
    /// An unusable viewport height keeps the current scale.
    pub fn observe_viewport_height(&self, height: f64) -> f64 {
        if !(height.is_finite() && height > 0.0) {
            return self.scale();
        }
        self.update(|inner| inner.viewport_height = height)
    }

    fn update(&self, apply: impl FnOnce(&mut Inner)) -> f64 {
        let (before, after) = {
            let mut inner = lock(&self.inner);
            let before = inner.state;
            apply(&mut inner);
            inner.state.scale = match inner.state.natural_height {
                Some(h) => resolve(h, inner.viewport_height),
                None => 1.0,
            };
            (before, inner.state)
        };

        if after.scale != before.scale {
            debug!(
                "Scale changed {} -> {} (natural height {:?})",
                before.scale, after.scale, after.natural_height
            );
        }

        if after.reserved_height() != before.reserved_height() {
            let cb = lock(&self.on_reserved_height).clone();
            if let Some(cb) = cb {
                cb(after.reserved_height());
            }
        }
        after.scale
    }
}
