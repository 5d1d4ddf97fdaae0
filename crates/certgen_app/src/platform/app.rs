use std::path::Path;
use std::time::Duration;

use certgen_core::{update, AppState, AppViewModel, Msg};
use certgen_engine::FailureKind;

use crate::platform::effects::EffectRunner;

/// Owns the form state for the lifetime of the page and routes messages
/// through `update`, feeding resulting effects to the engine.
pub struct Controller {
    state: AppState,
    runner: EffectRunner,
}

impl Controller {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    /// Applies every pending engine event.
    pub fn pump(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch(msg);
        }
    }

    /// Waits up to `timeout` for the engine, then applies whatever arrived.
    pub fn wait_and_pump(&mut self, timeout: Duration) {
        if let Some(msg) = self.runner.wait(timeout) {
            self.dispatch(msg);
        }
        self.pump();
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn last_outcome(&self) -> Option<Result<&Path, &FailureKind>> {
        self.runner.last_outcome()
    }

    pub fn engine_running(&self) -> bool {
        self.runner.engine_running()
    }

    /// Unmount: stops the poller and any pending dialog timer.
    pub fn shutdown(mut self) {
        self.runner.shutdown();
    }
}
