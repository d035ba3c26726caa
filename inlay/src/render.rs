// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;
use core::time::Duration;
use std::sync::Arc;

use attributed_document::AttachmentId;
use hashbrown::{HashMap, HashSet};

use crate::geometry::Rect;
use crate::layout::{DocumentLayout, LineItemKind};
use crate::{
    AttachmentBounds, AttachmentBoundsResolver, AttachmentResource, ContentProvider, Document,
    Font, FrameAdvance, FrameContentProvider, RendererOptions, UiLoop, ViewContent, ViewHandle,
};

/// Where an attachment placeholder is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaceholderState {
    /// Not laid out since it was created or unmounted; no view.
    Detached,
    /// Bounds resolved; no view.
    Measuring,
    /// Inside the viewport with a view, or with no view when mounting failed.
    Mounted {
        /// The provider's view, or `None` if mounting failed and the placeholder is blank.
        view: Option<ViewHandle>,
    },
}

#[derive(Clone, Debug)]
struct Placeholder {
    state: PlaceholderState,
    resource: Arc<AttachmentResource>,
    bounds: Option<AttachmentBounds>,
    rect: Rect,
}

/// A positioned piece of a [`Composition`].
#[derive(Clone, Debug)]
pub enum CompositeItem {
    /// Text to draw.
    Text {
        /// Units covered, in document coordinates.
        range: Range<usize>,
        /// The text, including trailing whitespace.
        text: Arc<str>,
        /// Area covered.
        rect: Rect,
        /// Baseline to draw the text on.
        baseline: f64,
        /// Point size.
        font_size: f64,
    },
    /// An attachment.
    Attachment {
        /// The attachment's identity.
        id: AttachmentId,
        /// Area covered.
        rect: Rect,
        /// What to paint, or `None` if the attachment is not mounted.
        content: Option<ViewContent>,
    },
}

impl CompositeItem {
    /// Area covered.
    pub fn rect(&self) -> Rect {
        match self {
            Self::Text { rect, .. } | Self::Attachment { rect, .. } => *rect,
        }
    }
}

/// A line of a [`Composition`].
#[derive(Clone, Debug)]
pub struct CompositeLine {
    /// Units covered, in document coordinates.
    pub range: Range<usize>,
    /// Area covered by the line's content, from its top to its bottom.
    pub rect: Rect,
    /// The baseline.
    pub baseline: f64,
    /// The items, in visual order.
    pub items: Vec<CompositeItem>,
}

/// The output of [`DocumentRenderer::render`]: what to paint, and where.
#[derive(Clone, Debug, Default)]
pub struct Composition {
    lines: Vec<CompositeLine>,
    width: f64,
    height: f64,
}

impl Composition {
    /// The lines, top to bottom.
    pub fn lines(&self) -> &[CompositeLine] {
        &self.lines
    }

    /// The width of the widest line.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The height of all lines.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// All items, line by line.
    pub fn items(&self) -> impl Iterator<Item = &CompositeItem> + '_ {
        self.lines.iter().flat_map(|line| &line.items)
    }

    /// The attachment item for `id`.
    pub fn attachment(&self, id: AttachmentId) -> Option<&CompositeItem> {
        self.items().find(|item| {
            matches!(item, CompositeItem::Attachment { id: found, .. } if *found == id)
        })
    }
}

/// Lays out documents, manages attachment views, and composites the result.
///
/// Attachments move through [`PlaceholderState`]s as documents are rendered: they are
/// measured when laid out, mounted through the [`ContentProvider`] while inside the viewport
/// (grown by [`RendererOptions::overscan`]), and detached again, with their view disposed,
/// when they leave it or their run is removed.
///
/// Renders of successive revisions of one document reuse lines ahead of the edit.
#[derive(Debug)]
pub struct DocumentRenderer<P: ContentProvider = FrameContentProvider> {
    provider: P,
    ui: UiLoop<ViewHandle>,
    resolver: AttachmentBoundsResolver,
    options: RendererOptions,
    placeholders: HashMap<AttachmentId, Placeholder>,
    layout: Option<(Document, DocumentLayout)>,
    surface_visible: bool,
}

impl DocumentRenderer {
    /// Creates a renderer with the built-in [`FrameContentProvider`].
    pub fn new(options: RendererOptions) -> Self {
        Self::with_provider(FrameContentProvider::new(options.resume_policy), options)
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(RendererOptions::default())
    }
}

impl<P: ContentProvider> DocumentRenderer<P> {
    /// Creates a renderer that mounts views through `provider`.
    pub fn with_provider(provider: P, options: RendererOptions) -> Self {
        Self {
            provider,
            ui: UiLoop::new(),
            resolver: AttachmentBoundsResolver::new(Font::system(options.default_font_size)),
            options,
            placeholders: HashMap::new(),
            layout: None,
            surface_visible: true,
        }
    }

    /// The configuration.
    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// The resolver used for attachment bounds.
    pub fn resolver(&self) -> &AttachmentBoundsResolver {
        &self.resolver
    }

    /// The content provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The timer loop driving animated views.
    pub fn ui(&self) -> &UiLoop<ViewHandle> {
        &self.ui
    }

    /// The layout of the last rendered document.
    pub fn layout(&self) -> Option<&DocumentLayout> {
        self.layout.as_ref().map(|(_, layout)| layout)
    }

    /// The state of the placeholder for `id`, if the last rendered document contains it.
    pub fn placeholder_state(&self, id: AttachmentId) -> Option<PlaceholderState> {
        self.placeholders.get(&id).map(|p| p.state)
    }

    /// The bounds resolved for `id` by the last render.
    pub fn attachment_bounds(&self, id: AttachmentId) -> Option<AttachmentBounds> {
        self.placeholders.get(&id).and_then(|p| p.bounds)
    }

    /// The number of placeholders with a live view.
    pub fn mounted_views(&self) -> usize {
        self.placeholders
            .values()
            .filter(|p| matches!(p.state, PlaceholderState::Mounted { view: Some(_) }))
            .count()
    }

    /// Lays out `doc` at `width`, updates attachment views for `viewport`, and returns what
    /// to paint.
    pub fn render(&mut self, doc: &Document, width: f64, viewport: Rect) -> Composition {
        let spacing = self.options.line_spacing;
        let layout = match self.layout.take() {
            Some((prev_doc, prev)) => prev.update(&prev_doc, doc, width, spacing, &self.resolver),
            None => DocumentLayout::new(doc, width, spacing, &self.resolver),
        };
        self.measure(doc, &layout);
        self.update_mounts(viewport.inflate(self.options.overscan.max(0.0)));
        let composition = self.composite(doc, &layout);
        self.layout = Some((doc.clone(), layout));
        composition
    }

    /// Advances animation time by `dt`, returning every frame change in order.
    pub fn advance(&mut self, dt: Duration) -> Vec<FrameAdvance> {
        let deadline = self.ui.now() + dt;
        let mut advances = Vec::new();
        while let Some(event) = self.ui.poll_until(deadline) {
            if let Some(advance) = self.provider.on_tick(event.target) {
                advances.push(advance);
            }
        }
        advances
    }

    /// Tells every mounted view whether the surface it is drawn on is visible.
    ///
    /// Views mounted while the surface is hidden start hidden.
    pub fn set_surface_visible(&mut self, visible: bool) {
        if self.surface_visible == visible {
            return;
        }
        self.surface_visible = visible;
        for placeholder in self.placeholders.values() {
            if let PlaceholderState::Mounted { view: Some(view) } = placeholder.state {
                self.provider.on_visibility_changed(view, visible, &mut self.ui);
            }
        }
    }

    /// Disposes every view and forgets the last layout.
    pub fn clear(&mut self) {
        for (_, placeholder) in self.placeholders.drain() {
            if let PlaceholderState::Mounted { view: Some(view) } = placeholder.state {
                self.provider.dispose(view, &mut self.ui);
            }
        }
        self.layout = None;
    }

    /// Records the bounds of every attachment in `layout`, and drops placeholders whose runs
    /// are gone.
    fn measure(&mut self, doc: &Document, layout: &DocumentLayout) {
        let mut present = HashSet::new();
        for line in layout.lines() {
            for item in line.items() {
                let LineItemKind::Attachment { id, bounds } = item.kind else {
                    continue;
                };
                let Some(attachment) = doc.runs().get(item.run).and_then(|run| run.as_attachment())
                else {
                    continue;
                };
                present.insert(id);
                let placeholder = self.placeholders.entry(id).or_insert_with(|| Placeholder {
                    state: PlaceholderState::Detached,
                    resource: Arc::clone(attachment.resource()),
                    bounds: None,
                    rect: item.rect,
                });
                if !Arc::ptr_eq(&placeholder.resource, attachment.resource()) {
                    // Another document branch reused the id for different content.
                    if let PlaceholderState::Mounted { view: Some(view) } = placeholder.state {
                        self.provider.dispose(view, &mut self.ui);
                    }
                    placeholder.resource = Arc::clone(attachment.resource());
                    placeholder.state = PlaceholderState::Detached;
                }
                placeholder.bounds = Some(bounds);
                placeholder.rect = item.rect;
                if placeholder.state == PlaceholderState::Detached {
                    log::debug!("attachment {} measured at {:?}", id.get(), item.rect);
                    placeholder.state = PlaceholderState::Measuring;
                }
            }
        }
        let (provider, ui) = (&mut self.provider, &mut self.ui);
        self.placeholders.retain(|id, placeholder| {
            if present.contains(id) {
                return true;
            }
            log::debug!("attachment {} removed from the document", id.get());
            if let PlaceholderState::Mounted { view: Some(view) } = placeholder.state {
                provider.dispose(view, ui);
            }
            false
        });
    }

    /// Mounts placeholders inside `area` and detaches mounted ones outside it.
    fn update_mounts(&mut self, area: Rect) {
        for (id, placeholder) in &mut self.placeholders {
            let inside = placeholder.rect.intersects(&area);
            match placeholder.state {
                PlaceholderState::Measuring if inside => {
                    let created = self.provider.create_view(&placeholder.resource, &mut self.ui);
                    let view = match created {
                        Ok(view) => {
                            if !self.surface_visible {
                                self.provider.on_visibility_changed(view, false, &mut self.ui);
                            }
                            Some(view)
                        }
                        Err(err) => {
                            log::warn!("failed to mount attachment {}: {err}", id.get());
                            None
                        }
                    };
                    log::debug!("attachment {} mounted", id.get());
                    placeholder.state = PlaceholderState::Mounted { view };
                }
                PlaceholderState::Mounted { view } if !inside => {
                    if let Some(view) = view {
                        self.provider.dispose(view, &mut self.ui);
                    }
                    log::debug!("attachment {} detached", id.get());
                    placeholder.state = PlaceholderState::Detached;
                }
                _ => {}
            }
        }
    }

    fn composite(&self, doc: &Document, layout: &DocumentLayout) -> Composition {
        let lines = layout
            .lines()
            .iter()
            .map(|line| {
                let items = line
                    .items()
                    .iter()
                    .filter_map(|item| match item.kind {
                        LineItemKind::Text { font_size } => {
                            let text = doc.runs().get(item.run)?.as_text()?;
                            Some(CompositeItem::Text {
                                range: item.range.clone(),
                                text: text.slice_str(item.run_range()).into(),
                                rect: item.rect,
                                baseline: line.baseline(),
                                font_size,
                            })
                        }
                        LineItemKind::Attachment { id, .. } => Some(CompositeItem::Attachment {
                            id,
                            rect: item.rect,
                            content: self.content(id),
                        }),
                    })
                    .collect();
                CompositeLine {
                    range: line.range(),
                    rect: line.bounds(),
                    baseline: line.baseline(),
                    items,
                }
            })
            .collect();
        Composition {
            lines,
            width: layout.width(),
            height: layout.height(),
        }
    }

    fn content(&self, id: AttachmentId) -> Option<ViewContent> {
        match self.placeholders.get(&id)?.state {
            PlaceholderState::Mounted { view: Some(view) } => self.provider.content(view),
            PlaceholderState::Mounted { view: None } => Some(ViewContent::Empty),
            _ => None,
        }
    }
}
