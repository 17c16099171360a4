//! Recording mock device.
//!
//! [`MockDevice`] implements [`Device`] entirely in memory: it hands out
//! sequential handles, records every call, and renders a solid-color
//! framebuffer. Tests assert against the recorded call log and can script
//! failures or slow renders to exercise cancellation.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use crate::cancel::CancelToken;
use crate::device::{Device, Framebuffer, Handle};
use crate::error::DeviceError;
use crate::params::ParamMap;
use crate::settings::RenderSettings;

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    /// `create(kind)` returned the given handle.
    Create { kind: String, handle: Handle },
    /// `set_params(handle, params)`.
    SetParams { handle: Handle, params: ParamMap },
    /// `commit(handle)`.
    Commit { handle: Handle },
    /// `release(handle)`.
    Release { handle: Handle },
    /// `commit_world()`.
    CommitWorld,
    /// `render()` with the frame size that was requested.
    Render { width: u32, height: u32 },
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<DeviceCall>,
    next_handle: u64,
    live: HashSet<Handle>,
    /// Object kinds `create` should reject.
    reject_kinds: HashSet<String>,
    /// Number of cancellation poll rounds `render` spins through.
    render_rounds: u32,
}

type RenderHook = Box<dyn Fn(&CancelToken) + Send>;

/// An in-memory [`Device`] that records every call.
#[derive(Default)]
pub struct MockDevice {
    state: Mutex<MockState>,
    render_hook: Mutex<Option<RenderHook>>,
}

impl MockDevice {
    /// Create a mock device that accepts every object kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` fail for the given kind with
    /// [`DeviceError::UnknownKind`].
    pub fn reject_kind(&self, kind: &str) {
        self.state.lock().unwrap().reject_kinds.insert(kind.to_string());
    }

    /// Make `render` poll the cancel token the given number of rounds before
    /// finishing, so tests can cancel mid-render.
    pub fn set_render_rounds(&self, rounds: u32) {
        self.state.lock().unwrap().render_rounds = rounds;
    }

    /// Run a hook at the start of every `render` call, after the call is
    /// recorded. Tests use this to cancel a render deterministically.
    pub fn on_render(&self, hook: impl Fn(&CancelToken) + Send + 'static) {
        *self.render_hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Snapshot of the recorded call log.
    #[must_use]
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of calls of any kind recorded so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Handles that have been created and not yet released.
    #[must_use]
    pub fn live_handles(&self) -> Vec<Handle> {
        let mut live: Vec<Handle> = self.state.lock().unwrap().live.iter().copied().collect();
        live.sort();
        live
    }
}

impl Device for MockDevice {
    fn create(&self, kind: &str) -> Result<Handle, DeviceError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_kinds.contains(kind) {
            return Err(DeviceError::UnknownKind(kind.to_string()));
        }
        let handle = Handle(state.next_handle);
        state.next_handle += 1;
        state.live.insert(handle);
        state.calls.push(DeviceCall::Create {
            kind: kind.to_string(),
            handle,
        });
        debug!(kind, %handle, "mock create");
        Ok(handle)
    }

    fn set_params(&self, handle: Handle, params: ParamMap) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.live.contains(&handle) {
            return Err(DeviceError::InvalidHandle(handle));
        }
        state.calls.push(DeviceCall::SetParams { handle, params });
        Ok(())
    }

    fn commit(&self, handle: Handle) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.live.contains(&handle) {
            return Err(DeviceError::InvalidHandle(handle));
        }
        state.calls.push(DeviceCall::Commit { handle });
        Ok(())
    }

    fn release(&self, handle: Handle) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.live.remove(&handle) {
            return Err(DeviceError::InvalidHandle(handle));
        }
        state.calls.push(DeviceCall::Release { handle });
        debug!(%handle, "mock release");
        Ok(())
    }

    fn commit_world(&self) -> Result<(), DeviceError> {
        self.state.lock().unwrap().calls.push(DeviceCall::CommitWorld);
        Ok(())
    }

    fn render(
        &self,
        settings: &RenderSettings,
        cancel: &CancelToken,
    ) -> Result<Framebuffer, DeviceError> {
        let rounds = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(DeviceCall::Render {
                width: settings.width,
                height: settings.height,
            });
            state.render_rounds
        };

        if let Some(hook) = self.render_hook.lock().unwrap().as_ref() {
            hook(cancel);
        }

        // Poll the token between "work" rounds like a real backend would
        // between sample batches.
        for _ in 0..=rounds {
            if cancel.is_cancelled() {
                return Err(DeviceError::Cancelled);
            }
            std::thread::yield_now();
        }

        let size = settings.width as usize * settings.height as usize * 4;
        Ok(Framebuffer {
            width: settings.width,
            height: settings.height,
            pixels: vec![0u8; size],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_returns_sequential_handles() {
        let device = MockDevice::new();
        let a = device.create("sphere").unwrap();
        let b = device.create("distant").unwrap();
        assert_ne!(a, b);
        assert_eq!(device.live_handles(), vec![a, b]);
    }

    #[test]
    fn test_release_removes_live_handle() {
        let device = MockDevice::new();
        let h = device.create("sphere").unwrap();
        device.release(h).unwrap();
        assert!(device.live_handles().is_empty());
        // Double release is an invalid-handle error.
        assert!(matches!(
            device.release(h),
            Err(DeviceError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_reject_kind() {
        let device = MockDevice::new();
        device.reject_kind("torus");
        assert!(matches!(
            device.create("torus"),
            Err(DeviceError::UnknownKind(_))
        ));
        // Other kinds still work.
        assert!(device.create("sphere").is_ok());
    }

    #[test]
    fn test_set_params_on_stale_handle_fails() {
        let device = MockDevice::new();
        let h = device.create("sphere").unwrap();
        device.release(h).unwrap();
        assert!(matches!(
            device.set_params(h, ParamMap::new()),
            Err(DeviceError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_render_produces_framebuffer() {
        let device = MockDevice::new();
        let settings = RenderSettings {
            width: 4,
            height: 2,
            ..RenderSettings::default()
        };
        let fb = device.render(&settings, &CancelToken::new()).unwrap();
        assert_eq!(fb.width, 4);
        assert_eq!(fb.height, 2);
        assert_eq!(fb.pixels.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_render_observes_cancellation() {
        let device = MockDevice::new();
        let token = CancelToken::new();
        token.cancel();
        let result = device.render(&RenderSettings::default(), &token);
        assert!(matches!(result, Err(DeviceError::Cancelled)));
    }

    #[test]
    fn test_call_log_records_in_order() {
        let device = MockDevice::new();
        let h = device.create("sphere").unwrap();
        device.commit(h).unwrap();
        device.commit_world().unwrap();
        let calls = device.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], DeviceCall::Create { .. }));
        assert!(matches!(calls[1], DeviceCall::Commit { .. }));
        assert!(matches!(calls[2], DeviceCall::CommitWorld));
    }
}
