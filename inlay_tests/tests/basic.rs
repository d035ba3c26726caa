// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walkthroughs of the public API.

use core::time::Duration;

use inlay::geometry::{Rect, Size};
use inlay::{
    AttachmentResource, AttachmentStyle, CompositeItem, ContentProvider, Document,
    DocumentRenderer, ErrorKind, Frame, FrameContentProvider, NamedFrames, Run, UiLoop,
    ViewContent,
};
use std::sync::Arc;

use crate::util::{
    CAT_FRAME_DURATION, CAT_FRAMES, CAT_TEMPLATE, cat_frames, demo_attrs, font_attrs,
};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

#[test]
fn basic_append_text_counts_characters() {
    let doc = Document::new();
    let doc = doc.append(Run::text("Hi", font_attrs(17.0)));
    assert_eq!(doc.total_length(), 2);
    assert_eq!(doc.recompute_length(), 2);
}

#[test]
fn basic_static_attachment_keeps_aspect_ratio() {
    let image = AttachmentResource::static_image(Frame::solid(100, 50, [0, 0, 0, 255]))
        .with_size_hint(Size::new(100.0, 50.0));
    let doc = Document::new().append(Run::attachment(image, font_attrs(17.0)));
    let id = doc.attachments().find_map(|(_, run)| run.id()).unwrap();

    let mut renderer = DocumentRenderer::default();
    renderer.render(&doc, 400.0, VIEWPORT);
    let bounds = renderer.attachment_bounds(id).unwrap();
    let ratio = bounds.size.width / bounds.size.height;
    assert!((ratio - 2.0).abs() < 1e-6, "ratio was {ratio}");
}

#[test]
fn basic_animation_wraps_frame_index() {
    let frames = (0..3).map(|n| Frame::solid(4, 4, [n, n, n, 255])).collect();
    let resource = AttachmentResource::animated(frames, Duration::from_millis(100));
    let doc = Document::new().append(Run::attachment(resource, font_attrs(17.0)));
    let id = doc.attachments().find_map(|(_, run)| run.id()).unwrap();

    let mut renderer = DocumentRenderer::default();
    renderer.render(&doc, 400.0, VIEWPORT);
    let advances = renderer.advance(Duration::from_millis(250));
    assert_eq!(advances.len(), 2, "ticks at 100ms and 200ms");

    let composition = renderer.render(&doc, 400.0, VIEWPORT);
    let Some(CompositeItem::Attachment {
        content: Some(content),
        ..
    }) = composition.attachment(id)
    else {
        panic!("animated attachment should be mounted");
    };
    assert_eq!(content.frame_index(), Some(2));
}

#[test]
fn basic_replace_past_end_is_rejected() {
    let doc = Document::new().append(Run::text("Hello", font_attrs(17.0)));
    let before = doc.total_length();
    let err = doc
        .replace_range(3..9, [Run::text("p!", font_attrs(17.0))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBounds);
    assert_eq!(doc.total_length(), before);
    assert_eq!(doc.plain_text(), "Hello");
}

#[test]
fn basic_dispose_before_first_tick_is_silent() {
    let frames = (0..3).map(|n| Frame::solid(4, 4, [n, 0, 0, 255])).collect();
    let resource = Arc::new(AttachmentResource::animated(frames, Duration::from_millis(100)));

    let mut provider = FrameContentProvider::default();
    let mut ui = UiLoop::new();
    let handle = provider.create_view(&resource, &mut ui).unwrap();
    provider.dispose(handle, &mut ui);

    let mut advances = 0;
    ui.advance(Duration::from_secs(5), |event| {
        if provider.on_tick(event.target).is_some() {
            advances += 1;
        }
    });
    assert_eq!(advances, 0);
}

#[test]
fn basic_renderer_dispose_before_first_tick_is_silent() {
    let frames = vec![Frame::solid(1, 1, [0; 4]); 3];
    let resource = AttachmentResource::animated(frames, CAT_FRAME_DURATION);
    let text = Document::new().append(Run::text("cat: ", demo_attrs()));
    let with_cat = text.append(Run::attachment(resource, demo_attrs()));

    let mut renderer = DocumentRenderer::default();
    renderer.render(&with_cat, 400.0, VIEWPORT);
    assert_eq!(renderer.mounted_views(), 1);
    renderer.advance(CAT_FRAME_DURATION / 2);
    renderer.render(&text, 400.0, VIEWPORT);
    assert!(renderer.advance(CAT_FRAME_DURATION * 100).is_empty());
}

#[test]
fn basic_demo_toggle_between_styles() {
    let source = cat_frames();
    let mut renderer = DocumentRenderer::default();
    let text = Document::new().append(Run::text("Hello World! ", demo_attrs()));

    for style in [AttachmentStyle::Static, AttachmentStyle::Animated] {
        let cat = AttachmentResource::for_style(
            style,
            &source,
            CAT_TEMPLATE,
            CAT_FRAMES,
            CAT_FRAME_DURATION,
        );
        let doc = text.append(Run::attachment(cat, demo_attrs()));
        renderer.render(&doc, 400.0, VIEWPORT);
        let advances = renderer.advance(CAT_FRAME_DURATION * 3);
        match style {
            AttachmentStyle::Static => assert!(advances.is_empty(), "still image never ticks"),
            AttachmentStyle::Animated => assert_eq!(advances.len(), 3),
        }
    }
    // The text snapshot the attachments were appended to is untouched.
    assert_eq!(text.total_length(), 13);
}

#[test]
fn basic_missing_frames_degrade_to_blank() {
    let empty = NamedFrames::new();
    let cat = AttachmentResource::for_style(
        AttachmentStyle::Animated,
        &empty,
        CAT_TEMPLATE,
        CAT_FRAMES,
        CAT_FRAME_DURATION,
    );
    assert!(cat.is_placeholder());
    let doc = Document::new()
        .append(Run::text("Hello ", demo_attrs()))
        .append(Run::attachment(cat, demo_attrs()));
    let mut renderer = DocumentRenderer::default();
    let composition = renderer.render(&doc, 400.0, VIEWPORT);
    let id = doc.attachments().find_map(|(_, run)| run.id()).unwrap();
    let item = composition.attachment(id).unwrap();
    assert!(item.rect().width() >= 1.0);
    assert!(matches!(
        item,
        CompositeItem::Attachment {
            content: Some(ViewContent::Empty),
            ..
        }
    ));
}
