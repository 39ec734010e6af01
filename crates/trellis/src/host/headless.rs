use std::any::Any;
use std::collections::VecDeque;
use std::time::Duration;

use trellis_core::logging::targets;
use trellis_core::Area;
use trellis_render::{ImageSurface, RenderResult};

use super::{HostEvent, HostView, ViewConfig, WorldType};

/// A host view without a window system.
///
/// Input is fed with [`push_event`](Self::push_event); redisplay requests
/// come back as [`HostEvent::Expose`] on the next `update`, just like a real
/// host would deliver them. Like a freshly mapped window, a new view starts
/// with one pending expose of its whole area.
#[derive(Debug)]
pub struct HeadlessHost {
    config: ViewConfig,
    surface: Option<ImageSurface>,
    pending: VecDeque<HostEvent>,
    redisplays: Vec<Area>,
    closed: bool,
}

impl HeadlessHost {
    pub fn new(config: &ViewConfig) -> RenderResult<Self> {
        let surface = ImageSurface::new(config.width.max(1), config.height.max(1))?;
        let mapped = Area::new(0.0, 0.0, f64::from(config.width), f64::from(config.height));
        Ok(Self {
            config: config.clone(),
            surface: Some(surface),
            pending: VecDeque::from([HostEvent::Expose { area: mapped }]),
            redisplays: Vec::new(),
            closed: false,
        })
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Queue a raw event for the next `update`.
    pub fn push_event(&mut self, event: HostEvent) {
        self.pending.push_back(event);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Every area passed to `post_redisplay` so far.
    pub fn redisplay_requests(&self) -> &[Area] {
        &self.redisplays
    }

    pub fn clear_redisplay_requests(&mut self) {
        self.redisplays.clear();
    }

    /// The composed output.
    pub fn surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    /// Drop the surface, as a host without a drawing context would.
    pub fn detach_surface(&mut self) -> Option<ImageSurface> {
        self.surface.take()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl HostView for HeadlessHost {
    fn update(&mut self, _timeout: Duration) -> Vec<HostEvent> {
        self.pending.drain(..).collect()
    }

    fn post_redisplay(&mut self, area: Area) {
        self.redisplays.push(area);
        // Coalesce with an expose that has not been delivered yet.
        for event in self.pending.iter_mut().rev() {
            if let HostEvent::Expose { area: pending } = event {
                *pending = pending.union(&area);
                return;
            }
        }
        self.pending.push_back(HostEvent::Expose { area });
    }

    fn surface_mut(&mut self) -> Option<&mut ImageSurface> {
        self.surface.as_mut()
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let same = self
            .surface
            .as_ref()
            .is_some_and(|s| s.width() == width && s.height() == height);
        if !same {
            self.surface = Some(ImageSurface::new(width.max(1), height.max(1))?);
            tracing::debug!(target: targets::HOST, width, height, "headless surface resized");
        }
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }

    fn world_type(&self) -> WorldType {
        self.config.world_type
    }

    fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
