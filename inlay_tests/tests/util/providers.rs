// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use inlay::{
    AttachmentResource, ContentProvider, FrameAdvance, FrameContentProvider, MountError, UiLoop,
    ViewContent, ViewHandle,
};

/// Wraps [`FrameContentProvider`] and records every call the renderer makes.
#[derive(Debug, Default)]
pub(crate) struct CountingProvider {
    pub(crate) inner: FrameContentProvider,
    pub(crate) created: Vec<ViewHandle>,
    pub(crate) disposed: Vec<ViewHandle>,
    pub(crate) visibility: Vec<(ViewHandle, bool)>,
}

impl CountingProvider {
    /// Returns `true` if every created view was disposed exactly once.
    pub(crate) fn balanced(&self) -> bool {
        self.created.len() == self.disposed.len()
            && self
                .created
                .iter()
                .all(|h| self.disposed.iter().filter(|d| *d == h).count() == 1)
    }
}

impl ContentProvider for CountingProvider {
    fn create_view(
        &mut self,
        resource: &Arc<AttachmentResource>,
        ui: &mut UiLoop<ViewHandle>,
    ) -> Result<ViewHandle, MountError> {
        let handle = self.inner.create_view(resource, ui)?;
        self.created.push(handle);
        Ok(handle)
    }

    fn dispose(&mut self, handle: ViewHandle, ui: &mut UiLoop<ViewHandle>) {
        self.disposed.push(handle);
        self.inner.dispose(handle, ui);
    }

    fn on_visibility_changed(
        &mut self,
        handle: ViewHandle,
        visible: bool,
        ui: &mut UiLoop<ViewHandle>,
    ) {
        self.visibility.push((handle, visible));
        self.inner.on_visibility_changed(handle, visible, ui);
    }

    fn on_tick(&mut self, handle: ViewHandle) -> Option<FrameAdvance> {
        self.inner.on_tick(handle)
    }

    fn content(&self, handle: ViewHandle) -> Option<ViewContent> {
        self.inner.content(handle)
    }
}

/// A provider that refuses to create any view.
#[derive(Debug, Default)]
pub(crate) struct RejectingProvider {
    pub(crate) attempts: usize,
}

impl ContentProvider for RejectingProvider {
    fn create_view(
        &mut self,
        _resource: &Arc<AttachmentResource>,
        _ui: &mut UiLoop<ViewHandle>,
    ) -> Result<ViewHandle, MountError> {
        self.attempts += 1;
        Err(MountError::Rejected("no views in this host".into()))
    }

    fn dispose(&mut self, _handle: ViewHandle, _ui: &mut UiLoop<ViewHandle>) {
        panic!("nothing was ever mounted");
    }

    fn on_visibility_changed(
        &mut self,
        _handle: ViewHandle,
        _visible: bool,
        _ui: &mut UiLoop<ViewHandle>,
    ) {
    }

    fn on_tick(&mut self, _handle: ViewHandle) -> Option<FrameAdvance> {
        None
    }

    fn content(&self, _handle: ViewHandle) -> Option<ViewContent> {
        None
    }
}
