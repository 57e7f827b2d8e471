//! Redraw-on-change frame driver
//!
//! Parameter changes only mark the scene dirty; the actual redraw runs on
//! the platform's next-frame callback. Bursts of changes inside one frame
//! collapse into a single redraw.
use log::{trace, warn};

use crate::scene::{Frame, Scene, Uniform};

/// Platform hook for "call me back on the next display refresh"
pub trait FrameScheduler {
    type Handle: Copy;

    fn request_frame(&mut self) -> Self::Handle;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Where composed transforms end up
pub trait RenderSurface {
    /// `false` when the surface has no usable shader program
    fn is_ready(&self) -> bool {
        true
    }

    fn set_transform_uniform(&mut self, uniform: &Uniform);

    fn draw_frame(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState<H> {
    Idle,
    RedrawPending(H),
}

/// Counters for observing coalescing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub requests: u64,
    pub cancelled: u64,
    pub redraws: u64,
    pub skipped: u64,
}

pub struct FrameDriver<S: FrameScheduler> {
    scheduler: S,
    state: DriverState<S::Handle>,
    stats: DriverStats,
}

impl<S: FrameScheduler> FrameDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: DriverState::Idle,
            stats: DriverStats::default(),
        }
    }

    /// Schedule the initial redraw for the default parameters
    pub fn start(&mut self) {
        self.notify_change();
    }

    /// A parameter changed: replace any pending redraw with a fresh one
    pub fn notify_change(&mut self) {
        self.cancel();
        let handle = self.scheduler.request_frame();
        self.state = DriverState::RedrawPending(handle);
        self.stats.requests += 1;
        trace!("redraw scheduled ({} pending cancelled so far)", self.stats.cancelled);
    }

    /// Drop a pending redraw without drawing, e.g. when tearing down
    pub fn cancel(&mut self) {
        if let DriverState::RedrawPending(handle) = self.state {
            self.scheduler.cancel_frame(handle);
            self.stats.cancelled += 1;
        }
        self.state = DriverState::Idle;
    }

    /// The scheduled frame callback fired
    ///
    /// Returns the composed frame when something was drawn, so callers can
    /// refresh their matrix displays.
    pub fn on_frame<R>(&mut self, scene: &dyn Scene, surface: &mut R) -> Option<Frame>
    where
        R: RenderSurface + ?Sized,
    {
        self.state = DriverState::Idle;

        if !surface.is_ready() {
            self.stats.skipped += 1;
            warn!("skipping redraw of {} scene: no usable shader program", scene.name());
            return None;
        }

        let frame = scene.frame();
        surface.set_transform_uniform(&frame.uniform);
        surface.draw_frame();
        self.stats.redraws += 1;
        Some(frame)
    }

    pub fn state(&self) -> DriverState<S::Handle> {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DriverState::RedrawPending(_))
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamKey, ParamValue};
    use crate::scene::{FlatScene, SpatialScene};
    use nalgebra::Matrix4;

    #[derive(Default)]
    struct RecordingScheduler {
        next: u32,
        live: Vec<u32>,
        cancelled: Vec<u32>,
    }

    impl FrameScheduler for RecordingScheduler {
        type Handle = u32;

        fn request_frame(&mut self) -> u32 {
            self.next += 1;
            self.live.push(self.next);
            self.next
        }

        fn cancel_frame(&mut self, handle: u32) {
            self.live.retain(|&h| h != handle);
            self.cancelled.push(handle);
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        broken: bool,
        uniforms: Vec<Uniform>,
        draws: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn is_ready(&self) -> bool {
            !self.broken
        }

        fn set_transform_uniform(&mut self, uniform: &Uniform) {
            self.uniforms.push(uniform.clone());
        }

        fn draw_frame(&mut self) {
            self.draws += 1;
        }
    }

    #[test]
    fn test_start_schedules_one_redraw() {
        let mut driver = FrameDriver::new(RecordingScheduler::default());
        assert_eq!(driver.state(), DriverState::Idle);

        driver.start();
        assert_eq!(driver.state(), DriverState::RedrawPending(1));
        assert_eq!(driver.scheduler().live, vec![1]);
    }

    #[test]
    fn test_burst_coalesces() {
        let mut driver = FrameDriver::new(RecordingScheduler::default());
        for _ in 0..5 {
            driver.notify_change();
        }

        assert_eq!(driver.scheduler().live, vec![5]);
        assert_eq!(driver.scheduler().cancelled, vec![1, 2, 3, 4]);

        let scene = FlatScene::new();
        let mut surface = RecordingSurface::default();
        assert!(driver.on_frame(&scene, &mut surface).is_some());

        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(surface.draws, 1);
        assert_eq!(
            driver.stats(),
            DriverStats {
                requests: 5,
                cancelled: 4,
                redraws: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_no_cancel_after_frame_ran() {
        let mut driver = FrameDriver::new(RecordingScheduler::default());
        let scene = FlatScene::new();
        let mut surface = RecordingSurface::default();

        driver.notify_change();
        driver.on_frame(&scene, &mut surface);
        driver.notify_change();

        assert!(driver.scheduler().cancelled.is_empty());
        assert!(driver.is_pending());
    }

    #[test]
    fn test_redraw_uses_current_params() {
        let mut driver = FrameDriver::new(RecordingScheduler::default());
        let mut scene = SpatialScene::new();
        let mut surface = RecordingSurface::default();

        driver.start();
        scene.set(ParamKey::TranslateX, ParamValue::Scalar(0.2)).unwrap();
        driver.notify_change();
        scene.set(ParamKey::TranslateY, ParamValue::Scalar(-0.1)).unwrap();
        driver.notify_change();
        driver.on_frame(&scene, &mut surface);

        let mut expected = Matrix4::identity();
        expected[(0, 3)] = 0.2;
        expected[(1, 3)] = -0.1;
        assert_eq!(surface.uniforms.len(), 1);
        match &surface.uniforms[0] {
            Uniform::Mat4(m) => assert!((m - expected).norm() < 1e-6),
            other => panic!("unexpected uniform {other:?}"),
        }
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut driver = FrameDriver::new(RecordingScheduler::default());
        driver.cancel();
        assert!(driver.scheduler().cancelled.is_empty());

        driver.start();
        driver.cancel();
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.scheduler().cancelled, vec![1]);
        assert!(driver.scheduler().live.is_empty());
    }

    #[test]
    fn test_not_ready_surface_is_skipped() {
        let mut driver = FrameDriver::new(RecordingScheduler::default());
        let scene = FlatScene::new();
        let mut surface = RecordingSurface {
            broken: true,
            ..Default::default()
        };

        driver.start();
        assert!(driver.on_frame(&scene, &mut surface).is_none());
        assert!(surface.uniforms.is_empty());
        assert_eq!(surface.draws, 0);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.stats().skipped, 1);
    }
}
