//! Value access for valueable widgets.

use trellis_core::logging::targets;

use super::Window;
use crate::capability::value::{Numeric, RangeValidator, ValueState, ValueTransfer, Validatable};
use crate::capability::Capability;
use crate::error::{WidgetError, WidgetResult};
use crate::event::Event;
use crate::widget::{state_capabilities, WidgetId};

impl Window {
    /// The widget's value state, checked for type `T`.
    fn value_state_mut<T: Clone + PartialEq + 'static>(
        &mut self,
        id: WidgetId,
    ) -> WidgetResult<&mut ValueState<T>> {
        let widget = self.tree.get_mut(id).ok_or(WidgetError::InvalidWidget(id))?;
        let model = widget.value.as_deref_mut().ok_or(WidgetError::NotValueable(id))?;
        let got = model.value_type();
        model
            .downcast_mut::<T>()
            .ok_or(WidgetError::ValueTypeMismatch {
                expected: std::any::type_name::<T>(),
                got,
            })
    }

    fn value_state<T: Clone + PartialEq + 'static>(&self, id: WidgetId) -> WidgetResult<&ValueState<T>> {
        let widget = self.tree.get(id).ok_or(WidgetError::InvalidWidget(id))?;
        let model = widget.value.as_deref().ok_or(WidgetError::NotValueable(id))?;
        let got = model.value_type();
        model
            .downcast_ref::<T>()
            .ok_or(WidgetError::ValueTypeMismatch {
                expected: std::any::type_name::<T>(),
                got,
            })
    }

    /// The widget's current value.
    pub fn value<T: Clone + PartialEq + 'static>(&self, id: WidgetId) -> WidgetResult<T> {
        self.value_state::<T>(id).map(|s| s.value().clone())
    }

    /// Validate and store a value.
    ///
    /// When the stored value changes, a value-changed event is enqueued and
    /// the widget is scheduled for redraw. Returns whether it changed.
    ///
    /// The application may always write a value, even with
    /// [`Capability::VALUEABLE`] disabled. The capability gates the
    /// value-changed handlers, so a disabled widget stores the value
    /// silently.
    pub fn set_value<T: Clone + PartialEq + 'static>(&mut self, id: WidgetId, value: T) -> WidgetResult<bool> {
        let state = self.value_state_mut::<T>(id)?;
        if !state.set(value) {
            return Ok(false);
        }
        let current = state.value().clone();
        self.value_changed(id, current);
        Ok(true)
    }

    fn value_changed<T: Clone + PartialEq + 'static>(&mut self, id: WidgetId, value: T) {
        tracing::trace!(target: targets::DISPATCH, ?id, "value changed");
        self.add_event(Event::value_changed(id, value));
        self.update(id);
    }

    /// Install a validator; the current value is revalidated.
    pub fn set_validator<T: Clone + PartialEq + 'static>(
        &mut self,
        id: WidgetId,
        validator: impl Validatable<T> + 'static,
    ) -> WidgetResult<()> {
        let state = self.value_state_mut::<T>(id)?;
        let changed = state.set_validator(validator);
        let current = state.value().clone();
        self.sync_value_capabilities(id);
        if changed {
            self.value_changed(id, current);
        }
        Ok(())
    }

    /// Clamp the value to `[min, max]` and quantize it to `step` (0 for a
    /// continuous range).
    pub fn set_range<T: Numeric + PartialEq>(&mut self, id: WidgetId, min: T, max: T, step: T) -> WidgetResult<()> {
        let Some(range) = RangeValidator::new(min, max, step) else {
            tracing::warn!(target: targets::DISPATCH, ?id, ?min, ?max, ?step, "invalid range");
            return Err(WidgetError::InvalidRange);
        };
        self.apply_range(id, range)
    }

    /// Change the step of the installed range.
    pub fn set_step<T: Numeric + PartialEq>(&mut self, id: WidgetId, step: T) -> WidgetResult<()> {
        let (min, max, _) = self.range::<T>(id)?.ok_or(WidgetError::InvalidRange)?;
        self.set_range(id, min, max, step)
    }

    fn apply_range<T: Numeric + PartialEq>(&mut self, id: WidgetId, range: RangeValidator<T>) -> WidgetResult<()> {
        let state = self.value_state_mut::<T>(id)?;
        let changed = state.set_range(range);
        let current = *state.value();
        self.sync_value_capabilities(id);
        if changed {
            self.value_changed(id, current);
        }
        Ok(())
    }

    /// The installed range as `(min, max, step)`.
    pub fn range<T: Numeric + PartialEq>(&self, id: WidgetId) -> WidgetResult<Option<(T, T, T)>> {
        self.value_state::<T>(id).map(ValueState::range)
    }

    /// Install a pair of inverse functions between the external value and
    /// the widget's internal domain (e.g. a logarithmic fader).
    pub fn set_transfer_function<T: Clone + PartialEq + 'static>(
        &mut self,
        id: WidgetId,
        transfer: ValueTransfer<T>,
    ) -> WidgetResult<()> {
        self.value_state_mut::<T>(id)?.set_transfer(transfer);
        self.sync_value_capabilities(id);
        self.update(id);
        Ok(())
    }

    /// The current value mapped into the internal domain.
    pub fn transferred_value<T: Clone + PartialEq + 'static>(&self, id: WidgetId) -> WidgetResult<T> {
        self.value_state::<T>(id).map(ValueState::transferred)
    }

    /// Map an internal-domain value back and store it.
    pub fn set_transferred_value<T: Clone + PartialEq + 'static>(
        &mut self,
        id: WidgetId,
        internal: T,
    ) -> WidgetResult<bool> {
        let value = self.value_state::<T>(id)?.re_transfer(&internal);
        self.set_value(id, value)
    }

    fn sync_value_capabilities(&mut self, id: WidgetId) {
        let Some(widget) = self.tree.get_mut(id) else {
            return;
        };
        let Some(model) = widget.value.as_deref() else {
            return;
        };
        let caps = state_capabilities(model);
        for cap in [Capability::VALIDATABLE, Capability::VALUE_TRANSFERABLE] {
            if caps.contains(cap) {
                widget.capabilities.support(cap);
            } else {
                widget.capabilities.withdraw(cap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::widget::WidgetBuilder;
    use crate::window::WindowConfig;

    fn window_with_value(value: f64) -> (Window, WidgetId) {
        let mut w = Window::headless(WindowConfig::new("values")).unwrap();
        let id = w.create(WidgetBuilder::new("dial").with_value(value));
        let root = w.root();
        w.add(root, id).unwrap();
        (w, id)
    }

    fn value_events(w: &Window) -> usize {
        w.queue().iter().filter(|e| e.event_type() == EventType::VALUE_CHANGED).count()
    }

    #[test]
    fn test_set_value_enqueues_once() {
        let (mut w, id) = window_with_value(0.0);
        assert!(w.set_value(id, 0.5).unwrap());
        assert!(!w.set_value(id, 0.5).unwrap());
        assert_eq!(value_events(&w), 1);
        assert_eq!(w.value::<f64>(id).unwrap(), 0.5);
    }

    #[test]
    fn test_disabled_valueable_stores_without_notifying() {
        let (mut w, id) = window_with_value(0.0);
        w.handle_events();
        let fired = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = fired.clone();
        w.set_callback(id, EventType::VALUE_CHANGED, move |_, _| counter.set(counter.get() + 1))
            .unwrap();
        w.set_capability_enabled(id, Capability::VALUEABLE, false).unwrap();

        assert!(w.set_value(id, 0.25).unwrap());
        w.handle_events();
        assert_eq!(w.value::<f64>(id).unwrap(), 0.25);
        assert_eq!(fired.get(), 0);

        w.set_capability_enabled(id, Capability::VALUEABLE, true).unwrap();
        w.set_value(id, 0.75).unwrap();
        w.handle_events();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_type_mismatch() {
        let (mut w, id) = window_with_value(0.0);
        assert!(matches!(w.set_value(id, 1_i32), Err(WidgetError::ValueTypeMismatch { .. })));
        let root = w.root();
        assert!(matches!(w.value::<f64>(root), Err(WidgetError::NotValueable(_))));
    }

    #[test]
    fn test_range_revalidates_and_marks_validatable() {
        let (mut w, id) = window_with_value(3.0);
        w.set_range(id, 0.0, 1.0, 0.1).unwrap();
        assert_eq!(w.value::<f64>(id).unwrap(), 1.0);
        assert!(w.widget(id).unwrap().has(Capability::VALIDATABLE));
        assert!(matches!(w.set_range(id, 1.0, 0.0, 0.1), Err(WidgetError::InvalidRange)));
        w.set_step(id, 0.25).unwrap();
        assert_eq!(w.range::<f64>(id).unwrap(), Some((0.0, 1.0, 0.25)));
    }

    #[test]
    fn test_transfer_round_trip() {
        let (mut w, id) = window_with_value(100.0);
        w.set_transfer_function(id, ValueTransfer::log10()).unwrap();
        assert!(w.widget(id).unwrap().has(Capability::VALUE_TRANSFERABLE));
        assert!((w.transferred_value::<f64>(id).unwrap() - 2.0).abs() < 1e-12);
        w.set_transferred_value(id, 3.0).unwrap();
        assert!((w.value::<f64>(id).unwrap() - 1000.0).abs() < 1e-9);
    }
}
