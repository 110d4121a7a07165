// view.rs - Mount/unmount lifecycle for a scene
//
// A SceneView owns the renderer, its frame loop and every listener wired
// to it. Mounting into a container that is not ready yields an inert view;
// unmounting any view, inert or live, is always safe and happens once.

use std::cell::RefCell;
use std::rc::Rc;

use super::SceneRenderer;
use super::device::Device;
use crate::error::Result;
use crate::scene::SceneGraph;
use crate::task::{Scheduler, TaskHandle};
use crate::viewport::Viewport;

/// The DOM node a view renders into
pub trait Container {
    /// Client size in CSS pixels, None while the node is not mounted.
    fn client_size(&self) -> Option<(u32, u32)>;

    fn device_pixel_ratio(&self) -> f64;

    /// Call `on_resize` with the new client size whenever it changes.
    fn watch_resize(&self, on_resize: Box<dyn FnMut(u32, u32)>) -> Result<TaskHandle>;
}

pub struct SceneView<D: Device + 'static> {
    renderer: Option<Rc<RefCell<SceneRenderer<D>>>>,
    tasks: Vec<TaskHandle>,
}

impl<D: Device + 'static> SceneView<D> {
    pub fn inert() -> Self {
        Self { renderer: None, tasks: Vec::new() }
    }

    /// Build the scene into `container` and start animating it.
    /// `make_device` creates and inserts the rendering surface.
    pub fn mount<C, F>(
        container: &C,
        scheduler: &dyn Scheduler,
        graph: SceneGraph,
        max_pixel_ratio: f64,
        make_device: F,
    ) -> Self
    where
        C: Container + ?Sized,
        F: FnOnce(&Viewport) -> Result<D>,
    {
        let Some((width, height)) = container.client_size() else {
            log::debug!("container not mounted, scene skipped");
            return Self::inert();
        };
        let Some(viewport) = Viewport::new(width, height, container.device_pixel_ratio(), max_pixel_ratio)
        else {
            log::debug!("container has no area, scene skipped");
            return Self::inert();
        };

        let device = match make_device(&viewport) {
            Ok(device) => device,
            Err(e) => {
                log::warn!("rendering surface unavailable: {e}");
                return Self::inert();
            }
        };

        let renderer = match SceneRenderer::build(device, graph, viewport) {
            Ok(renderer) => Rc::new(RefCell::new(renderer)),
            Err(_) => return Self::inert(),
        };

        let mut view = Self { renderer: Some(renderer.clone()), tasks: Vec::new() };

        let animated = renderer.clone();
        match scheduler.every_frame(Box::new(move |_| animated.borrow_mut().frame())) {
            Ok(task) => view.tasks.push(task),
            Err(e) => log::warn!("animation loop not started: {e}"),
        }

        let resized = renderer;
        match container.watch_resize(Box::new(move |w, h| resized.borrow_mut().resize(w, h))) {
            Ok(task) => view.tasks.push(task),
            Err(e) => log::warn!("resize listener not attached: {e}"),
        }

        log::debug!("scene mounted at {width}x{height}");
        view
    }

    pub fn is_live(&self) -> bool {
        self.renderer.is_some()
    }

    /// Tie an extra listener to this view's lifetime.
    pub fn retain(&mut self, task: TaskHandle) {
        if self.renderer.is_some() {
            self.tasks.push(task);
        }
    }

    pub fn drag(&self, dx: f32, dy: f32) {
        if let Some(renderer) = &self.renderer {
            renderer.borrow_mut().drag(dx, dy);
        }
    }

    /// Shared access to the live renderer, if any
    pub fn with_renderer<R>(&self, f: impl FnOnce(&SceneRenderer<D>) -> R) -> Option<R> {
        self.renderer.as_ref().map(|r| f(&r.borrow()))
    }

    /// Stop the loop, detach listeners, then release the scene.
    pub fn unmount(&mut self) {
        for mut task in self.tasks.drain(..) {
            task.cancel();
        }
        if let Some(renderer) = self.renderer.take() {
            renderer.borrow_mut().teardown();
        }
    }
}

impl<D: Device + 'static> Drop for SceneView<D> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobeConfig, StarfieldConfig};
    use crate::error::EngineError;
    use crate::testing::{FakeContainer, ManualScheduler, RecordingDevice};

    fn globe() -> SceneGraph {
        SceneGraph::globe(&GlobeConfig::default())
    }

    #[test]
    fn unmounted_container_is_a_noop() {
        let container = FakeContainer::detached();
        let scheduler = ManualScheduler::new();
        let mut created = false;
        let mut view: SceneView<RecordingDevice> = SceneView::mount(&container, &scheduler, globe(), 1.75, |_| {
            created = true;
            Ok(RecordingDevice::new())
        });

        assert!(!view.is_live());
        assert!(!created);
        assert_eq!(scheduler.active_tasks(), 0);
        view.unmount();
        view.unmount();
    }

    #[test]
    fn unmount_after_failed_surface_is_safe() {
        let container = FakeContainer::new(640, 480);
        let scheduler = ManualScheduler::new();
        let mut view: SceneView<RecordingDevice> =
            SceneView::mount(&container, &scheduler, globe(), 1.75, |_| {
                Err(EngineError::ContextUnavailable("webgl2".into()))
            });
        assert!(!view.is_live());
        view.unmount();
        assert_eq!(container.resize_listeners(), 0);
    }

    #[test]
    fn unmount_after_failed_build_never_detaches_twice() {
        let container = FakeContainer::new(640, 480);
        let scheduler = ManualScheduler::new();
        let device = RecordingDevice::failing_material_after(0);
        let log = device.log();
        let mut view = SceneView::mount(&container, &scheduler, globe(), 1.75, move |_| Ok(device));
        assert!(!view.is_live());
        view.unmount();

        let log = log.borrow();
        assert!(log.all_released());
        assert_eq!(log.surface_detaches, 1);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn animates_until_unmounted() {
        let container = FakeContainer::new(640, 480);
        let scheduler = ManualScheduler::new();
        let device = RecordingDevice::new();
        let log = device.log();
        let mut view = SceneView::mount(&container, &scheduler, globe(), 1.75, move |_| Ok(device));
        assert!(view.is_live());

        for _ in 0..3 {
            scheduler.advance_frame(16.7);
        }
        assert_eq!(log.borrow().draws, 3);

        view.unmount();
        scheduler.advance_frame(16.7);
        assert_eq!(log.borrow().draws, 3);
        assert_eq!(scheduler.active_tasks(), 0);
        assert_eq!(container.resize_listeners(), 0);
        assert!(log.borrow().all_released());
    }

    #[test]
    fn container_resize_reaches_renderer() {
        let container = FakeContainer::new(640, 480);
        let scheduler = ManualScheduler::new();
        let device = RecordingDevice::new();
        let log = device.log();
        let view = SceneView::mount(&container, &scheduler, globe(), 1.75, move |_| Ok(device));

        container.resize(1000, 500);
        let aspect = view.with_renderer(|r| r.camera().aspect).unwrap();
        assert!((aspect - 2.0).abs() < 1e-6);
        assert_eq!(log.borrow().viewport.unwrap().width, 1000);
    }

    #[test]
    fn remount_resets_animation() {
        let container = FakeContainer::new(640, 480);
        let scheduler = ManualScheduler::new();
        let graph = SceneGraph::starfield(&StarfieldConfig { count: 10, ..Default::default() });

        let mut first = SceneView::mount(&container, &scheduler, graph.clone(), 1.75, |_| Ok(RecordingDevice::new()));
        scheduler.advance_frame(16.0);
        scheduler.advance_frame(16.0);
        assert!(first.with_renderer(|r| r.graph().layers[0].spin.angle).unwrap() < 0.0);
        first.unmount();

        let second = SceneView::mount(&container, &scheduler, graph, 1.75, |_| Ok(RecordingDevice::new()));
        assert_eq!(second.with_renderer(|r| r.graph().layers[0].spin.angle), Some(0.0));
    }

    #[test]
    fn drop_unmounts() {
        let container = FakeContainer::new(640, 480);
        let scheduler = ManualScheduler::new();
        let device = RecordingDevice::new();
        let log = device.log();
        {
            let _view = SceneView::mount(&container, &scheduler, globe(), 1.75, move |_| Ok(device));
            scheduler.advance_frame(16.0);
        }
        assert_eq!(scheduler.active_tasks(), 0);
        assert!(log.borrow().all_released());
    }
}
