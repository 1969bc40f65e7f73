use std::fmt::{Debug, Formatter};

/// Sink for completion percentages of a running request.
///
/// Reported values are clamped to `0..=100` and never decrease, even when a
/// strategy reports a lower fraction than before.
/// Nested work (a container of a multi-container run, a strategy of a comparison)
/// is mapped into a sub-range of its parent with [`Progress::enter`] and [`Progress::leave`].
pub struct Progress {
    sink: Option<Box<dyn FnMut(u8) + Send>>,
    /// Active sub-ranges, innermost last, as absolute percentages
    scopes: Vec<(f64, f64)>,
    last: Option<u8>,
}

impl Progress {
    pub fn new(sink: impl FnMut(u8) + Send + 'static) -> Self {
        Progress {
            sink: Some(Box::new(sink)),
            scopes: vec![],
            last: None,
        }
    }

    /// Progress which is tracked but not reported anywhere
    pub fn silent() -> Self {
        Progress {
            sink: None,
            scopes: vec![],
            last: None,
        }
    }

    fn range(&self) -> (f64, f64) {
        self.scopes.last().copied().unwrap_or((0.0, 100.0))
    }

    /// Reports completion of the current scope, `fraction` in `[0, 1]`.
    pub fn report(&mut self, fraction: f64) {
        let (start, end) = self.range();
        let fraction = match fraction.is_nan() {
            true => 0.0,
            false => fraction.clamp(0.0, 1.0),
        };
        let pct = (start + fraction * (end - start)).round().clamp(0.0, 100.0) as u8;
        if self.last.is_some_and(|last| pct <= last) {
            return;
        }
        self.last = Some(pct);
        if let Some(sink) = self.sink.as_mut() {
            sink(pct);
        }
    }

    /// Narrows reporting to the part `[from, to]` (fractions) of the current scope.
    pub fn enter(&mut self, from: f64, to: f64) {
        let (start, end) = self.range();
        let span = end - start;
        self.scopes
            .push((start + from.clamp(0.0, 1.0) * span, start + to.clamp(0.0, 1.0) * span));
    }

    pub fn leave(&mut self) {
        self.scopes.pop();
    }

    /// Reports 100%, regardless of the active scopes.
    pub fn finish(&mut self) {
        self.scopes.clear();
        self.report(1.0);
    }

    /// Last reported percentage
    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::silent()
    }
}

impl Debug for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("scopes", &self.scopes)
            .field("last", &self.last)
            .finish()
    }
}
