// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views that show attachment content, and the provider that owns them.

use std::sync::Arc;

use crate::arena::{Arena, Key};
use crate::{AttachmentKind, AttachmentResource, Frame, ResumePolicy, TimerId, UiLoop};

/// Identifies a view created by a [`ContentProvider`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewHandle(Key);

/// What a view currently shows.
#[derive(Clone, Debug)]
pub enum ViewContent {
    /// A frame of the attachment's resource.
    Image {
        /// The frame to paint.
        frame: Frame,
        /// Its position in the resource's frame list.
        index: usize,
    },
    /// Nothing; the attachment's space is left blank.
    Empty,
}

impl ViewContent {
    /// The frame index shown, if any.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            Self::Image { index, .. } => Some(*index),
            Self::Empty => None,
        }
    }
}

/// A view moving to a new frame after its timer fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameAdvance {
    /// The view that advanced.
    pub handle: ViewHandle,
    /// The frame index it now shows.
    pub frame: usize,
}

/// Error returned when a view cannot be created for a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MountError {
    /// The resource has no frames to show.
    NoFrames,
    /// The provider declined to create a view.
    Rejected(String),
}

impl core::fmt::Display for MountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoFrames => f.write_str("attachment resource has no frames"),
            Self::Rejected(reason) => write!(f, "view creation rejected: {reason}"),
        }
    }
}

impl core::error::Error for MountError {}

/// Creates and drives the views that display attachments.
///
/// The renderer calls these on the UI thread as attachments enter and leave the viewport.
/// Timers a provider registers with `ui` deliver their handle back through
/// [`on_tick`](Self::on_tick).
pub trait ContentProvider {
    /// Creates a view for `resource`.
    fn create_view(
        &mut self,
        resource: &Arc<AttachmentResource>,
        ui: &mut UiLoop<ViewHandle>,
    ) -> Result<ViewHandle, MountError>;

    /// Destroys the view, cancelling any timer it owns. Unknown handles are ignored.
    fn dispose(&mut self, handle: ViewHandle, ui: &mut UiLoop<ViewHandle>);

    /// Tells the view whether its surface is visible.
    fn on_visibility_changed(
        &mut self,
        handle: ViewHandle,
        visible: bool,
        ui: &mut UiLoop<ViewHandle>,
    );

    /// Handles a timer registered for `handle` firing.
    fn on_tick(&mut self, handle: ViewHandle) -> Option<FrameAdvance>;

    /// What the view shows now, or `None` for an unknown handle.
    fn content(&self, handle: ViewHandle) -> Option<ViewContent>;
}

/// A view that paints one frame.
#[derive(Clone, Debug)]
pub struct StaticImageView {
    resource: Arc<AttachmentResource>,
}

impl StaticImageView {
    /// The resource shown.
    pub fn resource(&self) -> &Arc<AttachmentResource> {
        &self.resource
    }

    fn content(&self) -> ViewContent {
        match self.resource.frames().first() {
            Some(frame) => ViewContent::Image {
                frame: frame.clone(),
                index: 0,
            },
            None => ViewContent::Empty,
        }
    }
}

/// A view that loops through frames, one per timer tick.
///
/// The timer runs only while the view is mounted and visible.
#[derive(Clone, Debug)]
pub struct AnimatedView {
    resource: Arc<AttachmentResource>,
    frame_index: usize,
    timer: Option<TimerId>,
    visible: bool,
}

impl AnimatedView {
    /// The resource shown.
    pub fn resource(&self) -> &Arc<AttachmentResource> {
        &self.resource
    }

    /// The frame shown now.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Returns `true` while the view owns a running timer.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Starts the timer. Does nothing if it is already running.
    fn start(&mut self, handle: ViewHandle, ui: &mut UiLoop<ViewHandle>) {
        if self.timer.is_some() {
            return;
        }
        let Some(interval) = self.resource.frame_duration() else {
            return;
        };
        self.timer = Some(ui.schedule_repeating(interval, handle));
    }

    fn stop(&mut self, ui: &mut UiLoop<ViewHandle>) {
        if let Some(timer) = self.timer.take() {
            ui.cancel(timer);
        }
    }

    fn tick(&mut self) -> usize {
        let count = self.resource.frame_count();
        if count > 0 {
            self.frame_index = (self.frame_index + 1) % count;
        }
        self.frame_index
    }

    fn content(&self) -> ViewContent {
        match self.resource.frames().get(self.frame_index) {
            Some(frame) => ViewContent::Image {
                frame: frame.clone(),
                index: self.frame_index,
            },
            None => ViewContent::Empty,
        }
    }
}

/// A view created by [`FrameContentProvider`], chosen by resource kind.
#[derive(Clone, Debug)]
pub enum ContentView {
    /// For [`AttachmentKind::Static`] resources.
    Static(StaticImageView),
    /// For [`AttachmentKind::Animated`] resources.
    Animated(AnimatedView),
}

impl ContentView {
    fn content(&self) -> ViewContent {
        match self {
            Self::Static(view) => view.content(),
            Self::Animated(view) => view.content(),
        }
    }
}

/// The default provider: paints resource frames directly.
#[derive(Debug, Default)]
pub struct FrameContentProvider {
    views: Arena<ContentView>,
    resume_policy: ResumePolicy,
}

impl FrameContentProvider {
    /// Creates a provider whose animated views resume according to `resume_policy`.
    pub fn new(resume_policy: ResumePolicy) -> Self {
        Self {
            views: Arena::default(),
            resume_policy,
        }
    }

    /// The view behind `handle`.
    pub fn view(&self, handle: ViewHandle) -> Option<&ContentView> {
        self.views.get(handle.0)
    }

    /// The number of live views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if there are no live views.
    pub fn is_empty(&self) -> bool {
        self.views.len() == 0
    }
}

impl ContentProvider for FrameContentProvider {
    fn create_view(
        &mut self,
        resource: &Arc<AttachmentResource>,
        ui: &mut UiLoop<ViewHandle>,
    ) -> Result<ViewHandle, MountError> {
        if resource.is_placeholder() {
            return Err(MountError::NoFrames);
        }
        let resource = Arc::clone(resource);
        let view = match resource.kind() {
            AttachmentKind::Static => ContentView::Static(StaticImageView { resource }),
            AttachmentKind::Animated { .. } => ContentView::Animated(AnimatedView {
                resource,
                frame_index: 0,
                timer: None,
                visible: true,
            }),
        };
        let handle = ViewHandle(self.views.insert(view));
        if let Some(ContentView::Animated(view)) = self.views.get_mut(handle.0) {
            view.start(handle, ui);
        }
        Ok(handle)
    }

    fn dispose(&mut self, handle: ViewHandle, ui: &mut UiLoop<ViewHandle>) {
        if let Some(ContentView::Animated(mut view)) = self.views.remove(handle.0) {
            view.stop(ui);
        }
    }

    fn on_visibility_changed(
        &mut self,
        handle: ViewHandle,
        visible: bool,
        ui: &mut UiLoop<ViewHandle>,
    ) {
        let Some(ContentView::Animated(view)) = self.views.get_mut(handle.0) else {
            return;
        };
        if view.visible == visible {
            return;
        }
        view.visible = visible;
        if visible {
            if self.resume_policy == ResumePolicy::Restart {
                view.frame_index = 0;
            }
            view.start(handle, ui);
        } else {
            view.stop(ui);
        }
    }

    fn on_tick(&mut self, handle: ViewHandle) -> Option<FrameAdvance> {
        match self.views.get_mut(handle.0)? {
            ContentView::Animated(view) if view.is_running() => Some(FrameAdvance {
                handle,
                frame: view.tick(),
            }),
            _ => None,
        }
    }

    fn content(&self, handle: ViewHandle) -> Option<ViewContent> {
        self.views.get(handle.0).map(ContentView::content)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentProvider, ContentView, FrameContentProvider, MountError, ViewContent};
    use crate::{AttachmentResource, Frame, ResumePolicy, UiLoop};
    use core::time::Duration;
    use std::sync::Arc;

    const FRAME: Duration = Duration::from_millis(40);

    fn animated(count: u32) -> Arc<AttachmentResource> {
        let frames = (1..=count).map(|n| Frame::solid(n, n, [0; 4])).collect();
        Arc::new(AttachmentResource::animated(frames, FRAME))
    }

    fn run(
        provider: &mut FrameContentProvider,
        ui: &mut UiLoop<super::ViewHandle>,
        dt: Duration,
    ) -> Vec<usize> {
        let mut frames = Vec::new();
        ui.advance(dt, |event| {
            if let Some(advance) = provider.on_tick(event.target) {
                frames.push(advance.frame);
            }
        });
        frames
    }

    #[test]
    fn animation_loops_through_frames() {
        let mut provider = FrameContentProvider::default();
        let mut ui = UiLoop::new();
        let handle = provider.create_view(&animated(3), &mut ui).unwrap();
        assert_eq!(provider.content(handle).unwrap().frame_index(), Some(0));
        assert_eq!(run(&mut provider, &mut ui, FRAME * 4), [1, 2, 0, 1]);
        assert_eq!(provider.content(handle).unwrap().frame_index(), Some(1));
    }

    #[test]
    fn start_is_idempotent() {
        let mut provider = FrameContentProvider::default();
        let mut ui = UiLoop::new();
        let handle = provider.create_view(&animated(2), &mut ui).unwrap();
        provider.on_visibility_changed(handle, true, &mut ui);
        if let Some(ContentView::Animated(view)) = provider.views.get_mut(handle.0) {
            view.start(handle, &mut ui);
            view.start(handle, &mut ui);
        }
        assert_eq!(ui.active_timers(), 1);
    }

    #[test]
    fn dispose_cancels_timer() {
        let mut provider = FrameContentProvider::default();
        let mut ui = UiLoop::new();
        let handle = provider.create_view(&animated(2), &mut ui).unwrap();
        provider.dispose(handle, &mut ui);
        assert_eq!(ui.active_timers(), 0);
        assert!(provider.is_empty());
        assert!(run(&mut provider, &mut ui, FRAME * 10).is_empty());
        assert!(provider.content(handle).is_none());
        // A second dispose is a no-op.
        provider.dispose(handle, &mut ui);
    }

    #[test]
    fn hidden_view_pauses_and_continues() {
        let mut provider = FrameContentProvider::default();
        let mut ui = UiLoop::new();
        let handle = provider.create_view(&animated(4), &mut ui).unwrap();
        assert_eq!(run(&mut provider, &mut ui, FRAME * 2), [1, 2]);
        provider.on_visibility_changed(handle, false, &mut ui);
        assert!(run(&mut provider, &mut ui, FRAME * 5).is_empty());
        provider.on_visibility_changed(handle, true, &mut ui);
        assert_eq!(run(&mut provider, &mut ui, FRAME), [3]);
    }

    #[test]
    fn restart_policy_resets_on_resume() {
        let mut provider = FrameContentProvider::new(ResumePolicy::Restart);
        let mut ui = UiLoop::new();
        let handle = provider.create_view(&animated(4), &mut ui).unwrap();
        run(&mut provider, &mut ui, FRAME * 2);
        provider.on_visibility_changed(handle, false, &mut ui);
        provider.on_visibility_changed(handle, true, &mut ui);
        assert_eq!(provider.content(handle).unwrap().frame_index(), Some(0));
        assert_eq!(run(&mut provider, &mut ui, FRAME), [1]);
    }

    #[test]
    fn static_view_has_no_timer() {
        let mut provider = FrameContentProvider::default();
        let mut ui = UiLoop::new();
        let resource = Arc::new(AttachmentResource::static_image(Frame::solid(3, 3, [9; 4])));
        let handle = provider.create_view(&resource, &mut ui).unwrap();
        assert_eq!(ui.active_timers(), 0);
        assert!(matches!(
            provider.content(handle),
            Some(ViewContent::Image { index: 0, .. })
        ));
        assert_eq!(provider.on_tick(handle), None);
    }

    #[test]
    fn placeholder_cannot_mount() {
        let mut provider = FrameContentProvider::default();
        let mut ui = UiLoop::new();
        let err = provider
            .create_view(&Arc::new(AttachmentResource::placeholder()), &mut ui)
            .unwrap_err();
        assert_eq!(err, MountError::NoFrames);
        assert!(provider.is_empty());
    }
}
