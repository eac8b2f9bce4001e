use std::rc::Rc;

use crate::{
    assets::handle::DesignSource,
    foundation::error::{StitchError, StitchResult},
    lifecycle::scheduler::{PassScheduler, SchedulerStats},
    render::{
        composite::{CompositeInputs, Compositor, DesignLayer, PreparedPass},
        raster::RasterBuffer,
        texture::TextureHandle,
    },
    state::store::{DesignerState, StateChange},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Ready,
    Terminated,
}

/// What one frame tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameReport {
    /// Nothing was pending (or the controller is not ready).
    Idle,
    /// A pass landed in the buffer and the texture version moved.
    Committed {
        generation: u64,
        inputs: CompositeInputs,
        layer: DesignLayer,
    },
    /// A pass finished loading after a newer schedule; the buffer was left untouched.
    Superseded { generation: u64 },
}

/// A pass between its load phase and its commit.
#[derive(Debug)]
pub struct InFlightPass {
    generation: u64,
    prepared: PreparedPass,
}

impl InFlightPass {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn inputs(&self) -> CompositeInputs {
        self.prepared.inputs
    }
}

#[derive(Debug)]
struct Surface {
    buffer: RasterBuffer,
    texture: TextureHandle,
}

/// Owns the raster buffer and its texture handle and turns state changes into composite
/// passes.
///
/// `Uninitialized -> Ready` on [`mount`](Self::mount), `Ready -> Terminated` on
/// [`teardown`](Self::teardown). While ready, at most one pass is pending; see
/// [`PassScheduler`] for the coalescing and staleness rules.
#[derive(Debug)]
pub struct TextureController {
    compositor: Compositor,
    scheduler: Rc<PassScheduler>,
    state: ControllerState,
    surface: Option<Surface>,
}

impl TextureController {
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            scheduler: Rc::new(PassScheduler::new()),
            state: ControllerState::Uninitialized,
            surface: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn scheduler(&self) -> &PassScheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Allocate the buffer and the one texture handle and schedule the first paint.
    ///
    /// Mounting twice is a no-op; mounting after teardown is an error.
    pub fn mount(&mut self, initial: CompositeInputs) -> StitchResult<()> {
        match self.state {
            ControllerState::Ready => return Ok(()),
            ControllerState::Terminated => {
                return Err(StitchError::render(
                    "texture controller cannot be mounted after teardown",
                ));
            }
            ControllerState::Uninitialized => {}
        }

        let buffer = self.compositor.new_buffer()?;
        let texture = TextureHandle::allocate();
        tracing::debug!(
            texture = texture.id().as_u64(),
            size = buffer.width(),
            "texture controller mounted"
        );
        self.surface = Some(Surface { buffer, texture });
        self.state = ControllerState::Ready;
        self.scheduler.schedule_always(initial);
        Ok(())
    }

    /// Store observer that schedules a pass whenever colour, design or view changed.
    pub fn observer(&self) -> impl FnMut(StateChange, &DesignerState) + 'static {
        let scheduler = Rc::clone(&self.scheduler);
        move |change: StateChange, state: &DesignerState| {
            if change.touches_texture() {
                scheduler.schedule(state.composite_inputs());
            }
        }
    }

    /// Start the pending pass: take it and run its load phase.
    pub fn begin_pass(&mut self, source: &dyn DesignSource) -> Option<InFlightPass> {
        if self.state != ControllerState::Ready {
            return None;
        }
        let due = self.scheduler.take_due()?;
        let prepared = self.compositor.prepare(due.inputs, source);
        Some(InFlightPass {
            generation: due.generation,
            prepared,
        })
    }

    /// Paint `pass` if it is still the latest schedule; otherwise drop it untouched.
    pub fn finish_pass(&mut self, pass: InFlightPass) -> FrameReport {
        if !self.scheduler.is_current(pass.generation) {
            self.scheduler.note_superseded(pass.generation);
            return FrameReport::Superseded {
                generation: pass.generation,
            };
        }
        let Some(surface) = self.surface.as_mut() else {
            return FrameReport::Idle;
        };

        self.compositor.paint(&mut surface.buffer, &pass.prepared);
        surface.texture.mark_updated();
        self.scheduler.note_committed();
        tracing::debug!(
            generation = pass.generation,
            version = surface.texture.version(),
            "composite committed"
        );
        FrameReport::Committed {
            generation: pass.generation,
            inputs: pass.prepared.inputs,
            layer: pass.prepared.layer().clone(),
        }
    }

    /// One scheduling point: run the pending pass, if any, to completion.
    pub fn run_frame(&mut self, source: &dyn DesignSource) -> FrameReport {
        match self.begin_pass(source) {
            Some(pass) => self.finish_pass(pass),
            None => FrameReport::Idle,
        }
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.surface.as_ref().map(|s| &s.texture)
    }

    pub fn buffer(&self) -> Option<&RasterBuffer> {
        self.surface.as_ref().map(|s| &s.buffer)
    }

    /// Cancel outstanding work and release the texture and buffer. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == ControllerState::Terminated {
            return;
        }
        self.scheduler.close();
        if let Some(mut surface) = self.surface.take() {
            surface.texture.release();
        }
        self.state = ControllerState::Terminated;
        tracing::debug!("texture controller torn down");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/controller.rs"]
mod tests;
