use serde::Serialize;
use tracing::debug;

/// Axis-aligned rectangle in world units
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Square of side `size` centred on `(x, y)`
    pub fn square(x: f32, y: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            min_x: x - half,
            min_y: y - half,
            max_x: x + half,
            max_y: y + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grow to also cover `other`
    pub fn encapsulate(&mut self, other: &Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grow the total width by `amount`, half on each side
    pub fn expand_x(&mut self, amount: f32) {
        self.min_x -= amount / 2.0;
        self.max_x += amount / 2.0;
    }
}

/// Orthographic view that shows a set of bounds
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewFit {
    pub center_x: f32,
    pub center_y: f32,
    /// Half the view height in world units
    pub ortho_size: f32,
}

/// Fit an orthographic view to `bounds`, sized by width.
///
/// ```
/// use floorwatch::scene::{fit_view, Bounds};
///
/// let bounds = Bounds { min_x: -4.0, min_y: -1.0, max_x: 4.0, max_y: 1.0 };
/// let fit = fit_view(bounds, 2.0, 1.0);
/// assert_eq!((fit.center_x, fit.center_y), (0.0, 0.0));
/// assert_eq!(fit.ortho_size, 3.25);
/// ```
pub fn fit_view(bounds: Bounds, aspect_ratio: f32, padding: f32) -> ViewFit {
    let mut padded = bounds;
    padded.expand_x(padding);

    let (center_x, center_y) = padded.center();
    ViewFit {
        center_x,
        center_y,
        ortho_size: padded.width() / 2.0 / aspect_ratio + padding,
    }
}

/// Keeps a view fitted to a changing scene.
///
/// An empty scene has nothing to fit, so the previous fit is kept.
#[derive(Clone, Debug)]
pub struct ViewFramer {
    aspect_ratio: f32,
    padding: f32,
    last: Option<ViewFit>,
}

impl ViewFramer {
    pub fn new(aspect_ratio: f32, padding: f32) -> Self {
        Self {
            aspect_ratio,
            padding,
            last: None,
        }
    }

    /// Refit to `bounds` and return the current view
    pub fn refit(&mut self, bounds: Option<Bounds>) -> Option<ViewFit> {
        match bounds {
            Some(bounds) => self.last = Some(fit_view(bounds, self.aspect_ratio, self.padding)),
            None => debug!("No sprites in scene, keeping previous view"),
        }
        self.last
    }

    pub fn current(&self) -> Option<ViewFit> {
        self.last
    }
}
