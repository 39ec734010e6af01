//! Damage tracking for partial composition.
//!
//! Dirty regions are accumulated into a single bounding area. The window
//! composes only the pixels inside that area and hands it to the host as the
//! region to present.

use trellis_core::Area;

/// Accumulates damaged (dirty) regions that need recomposition.
///
/// ```
/// use trellis_core::Area;
/// use trellis_render::DamageTracker;
///
/// let mut tracker = DamageTracker::with_viewport(Area::new(0.0, 0.0, 200.0, 200.0));
/// tracker.add_damage(Area::new(10.0, 10.0, 50.0, 30.0));
/// tracker.add_damage(Area::new(100.0, 100.0, 20.0, 20.0));
/// assert_eq!(tracker.damage_region(), Some(Area::new(10.0, 10.0, 110.0, 110.0)));
///
/// tracker.clear();
/// assert!(!tracker.has_damage());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    damage: Option<Area>,
    damage_count: u32,
    full_repaint: bool,
    viewport: Option<Area>,
}

impl DamageTracker {
    /// Past this many fragments the whole viewport is recomposed.
    const MAX_DAMAGE_COUNT: u32 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    /// Create a damage tracker clipped to `viewport`.
    pub fn with_viewport(viewport: Area) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }

    /// Set the viewport bounds. Called when the window is resized.
    pub fn set_viewport(&mut self, viewport: Area) {
        self.viewport = Some(viewport);
        if let Some(damage) = self.damage {
            let clipped = damage.intersection(&viewport);
            self.damage = (clipped.width() > 0.0 && clipped.height() > 0.0).then_some(clipped);
        }
    }

    /// Add a damaged region, unioned with any existing damage.
    ///
    /// Regions with no area, or entirely outside the viewport, are ignored.
    pub fn add_damage(&mut self, area: Area) {
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return;
        }

        let area = match &self.viewport {
            Some(viewport) => {
                let clipped = area.intersection(viewport);
                if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
                    return;
                }
                clipped
            }
            None => area,
        };

        self.damage_count += 1;
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(&area),
            None => area,
        });

        if self.damage_count > Self::MAX_DAMAGE_COUNT && self.viewport.is_some() {
            self.full_repaint = true;
        }
    }

    /// Mark the entire viewport as damaged.
    pub fn invalidate_all(&mut self) {
        self.full_repaint = true;
        self.damage = self.viewport;
        self.damage_count = 1;
    }

    /// The current damage region, or the viewport on full repaint.
    pub fn damage_region(&self) -> Option<Area> {
        if self.full_repaint {
            self.viewport
        } else {
            self.damage
        }
    }

    #[inline]
    pub fn has_damage(&self) -> bool {
        self.damage.is_some() || (self.full_repaint && self.viewport.is_some())
    }

    #[inline]
    pub fn needs_full_repaint(&self) -> bool {
        self.full_repaint
    }

    #[inline]
    pub fn damage_count(&self) -> u32 {
        self.damage_count
    }

    /// Take the damage region and reset the tracker.
    pub fn take(&mut self) -> Option<Area> {
        let region = self.damage_region();
        self.clear();
        region
    }

    pub fn clear(&mut self) {
        self.damage = None;
        self.damage_count = 0;
        self.full_repaint = false;
    }

    pub fn viewport(&self) -> Option<Area> {
        self.viewport
    }
}
