use crate::{
    assets::validate::DesignAsset,
    foundation::core::{ColorValue, Panel},
    render::composite::CompositeInputs,
};

/// The single session state. Only [`DesignerStore`] mutates it.
#[derive(Debug)]
pub struct DesignerState {
    pub base_color: ColorValue,
    pub design: Option<DesignAsset>,
    pub active_view: Panel,
    pub is_loading: bool,
}

impl Default for DesignerState {
    fn default() -> Self {
        Self {
            base_color: ColorValue::WHITE,
            design: None,
            active_view: Panel::Front,
            is_loading: true,
        }
    }
}

impl DesignerState {
    /// The (colour, design, view) tuple a composite pass is computed from.
    pub fn composite_inputs(&self) -> CompositeInputs {
        CompositeInputs {
            color: self.base_color,
            design: self.design.as_ref().map(DesignAsset::id),
            view: self.active_view,
        }
    }
}

/// Which field a mutation touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    BaseColor,
    Design,
    ActiveView,
    Loading,
}

impl StateChange {
    pub fn touches_texture(self) -> bool {
        !matches!(self, StateChange::Loading)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(StateChange, &DesignerState)>;

/// Explicitly owned state container with a closed set of mutations.
///
/// Mutations only update state and notify observers synchronously; they never do I/O or
/// paint. Observers get a shared view and cannot mutate the store from inside a callback.
#[derive(Default)]
pub struct DesignerStore {
    state: DesignerState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl DesignerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DesignerState {
        &self.state
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(StateChange, &DesignerState) + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn set_base_color(&mut self, color: ColorValue) {
        self.state.base_color = color;
        self.notify(StateChange::BaseColor);
    }

    /// Install a new design. The previous handle is released right after the swap.
    pub fn set_design(&mut self, design: DesignAsset) {
        tracing::debug!(
            handle = design.id().as_u64(),
            name = design.display_name(),
            "set design"
        );
        if let Some(previous) = self.state.design.replace(design) {
            previous.release();
        }
        self.notify(StateChange::Design);
    }

    /// Remove the current design. Without one this does nothing.
    pub fn clear_design(&mut self) {
        let Some(previous) = self.state.design.take() else {
            return;
        };
        tracing::debug!(handle = previous.id().as_u64(), "clear design");
        previous.release();
        self.notify(StateChange::Design);
    }

    pub fn set_active_view(&mut self, view: Panel) {
        self.state.active_view = view;
        self.notify(StateChange::ActiveView);
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.state.is_loading = is_loading;
        self.notify(StateChange::Loading);
    }

    fn notify(&mut self, change: StateChange) {
        let state = &self.state;
        for (_, observer) in &mut self.observers {
            observer(change, state);
        }
    }
}

impl std::fmt::Debug for DesignerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignerStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
