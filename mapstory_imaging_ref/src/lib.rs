// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory Imaging Reference Backend.
//!
//! This crate provides a small, stateful implementation of
//! [`ImagingBackend`] and [`ResourceBackend`] for **op recording and state
//! tracing**.
//!
//! It is not a renderer:
//! - It does **not** rasterize to pixels.
//! - Text measurement is deterministic rather than font-accurate: every
//!   character advances by half the font size and a line is one font size
//!   tall.
//! - It is intended for tests that assert on emitted ops and on the imaging
//!   state at the time each op is applied.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use mapstory_imaging::{
    Affine, DrawOp, FillRule, FontDesc, ImageDesc, ImageId, ImagingBackend, ImagingOp, LayerOp,
    PaintDesc, PaintId, PathDesc, PathId, ResourceBackend, StateOp, StrokeStyle, TextMetrics,
};
use peniko::Brush;

/// Snapshot of the current imaging state inside the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Affine,
    /// Number of active layers on the layer stack.
    pub layer_stack_depth: u32,
    /// The most recently pushed layer op, if any.
    pub layer_top: Option<LayerOp>,
    /// Current paint, if set.
    pub paint: Option<PaintId>,
    /// Current stroke style, if set.
    pub stroke: Option<StrokeStyle>,
    /// Current fill rule.
    pub fill_rule: FillRule,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            layer_stack_depth: 0,
            layer_top: None,
            paint: None,
            stroke: None,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl StateSnapshot {
    /// Opacity of the most recently pushed layer, or `1.0`.
    ///
    /// Only the top layer is kept in the snapshot; use
    /// [`RefBackend::effective_opacity`] for the product over all layers.
    pub fn top_opacity(&self) -> f32 {
        self.layer_top
            .as_ref()
            .and_then(|l| l.opacity)
            .unwrap_or(1.0)
    }
}

/// Event recorded by the reference backend.
#[derive(Clone, Debug)]
pub enum Event {
    /// State operation and the resulting state snapshot.
    State {
        /// State operation that was applied.
        op: StateOp,
        /// Snapshot after applying the state operation.
        state: StateSnapshot,
    },
    /// Draw operation and the state snapshot used for drawing.
    Draw {
        /// Draw operation that was applied.
        op: DrawOp,
        /// Snapshot at the time of drawing.
        state: StateSnapshot,
        /// Product of all active layer opacities at the time of drawing.
        opacity: f32,
        /// Descriptor of the path drawn by `FillPath`/`StrokePath`, resolved
        /// at draw time so it survives the resource being destroyed.
        path: Option<PathDesc>,
        /// Brush of the current paint at draw time.
        brush: Option<Brush>,
    },
}

/// A draw event with its resources resolved, see [`RefBackend::draw_records`].
#[derive(Copy, Clone, Debug)]
pub struct DrawRecord<'a> {
    /// Draw operation.
    pub op: &'a DrawOp,
    /// Imaging state at the time of drawing.
    pub state: &'a StateSnapshot,
    /// Product of all active layer opacities.
    pub opacity: f32,
    /// Path drawn, for path ops.
    pub path: Option<&'a PathDesc>,
    /// Brush of the current paint.
    pub brush: Option<&'a Brush>,
}

/// Reference implementation of the imaging backend.
///
/// This backend:
/// - Stores resource descriptors in vectors keyed by their IDs,
/// - Tracks the current imaging state,
/// - Records [`Event`]s as state and draw operations are applied.
#[derive(Default, Debug)]
pub struct RefBackend {
    paths: Vec<Option<PathDesc>>,
    images: Vec<Option<(ImageDesc, Vec<u8>)>>,
    paints: Vec<Option<PaintDesc>>,

    events: Vec<Event>,
    ops: Vec<ImagingOp>,
    state: StateSnapshot,
    layer_stack: Vec<LayerOp>,
}

impl RefBackend {
    /// Creates an empty backend with an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slice of recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns a slice of raw imaging operations.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Iterates over draw events only, with their state snapshot.
    pub fn draws(&self) -> impl Iterator<Item = (&DrawOp, &StateSnapshot)> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Draw { op, state, .. } => Some((op, state)),
            Event::State { .. } => None,
        })
    }

    /// Iterates over draw events with their resolved path and brush.
    pub fn draw_records(&self) -> impl Iterator<Item = DrawRecord<'_>> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Draw {
                op,
                state,
                opacity,
                path,
                brush,
            } => Some(DrawRecord {
                op,
                state,
                opacity: *opacity,
                path: path.as_ref(),
                brush: brush.as_ref(),
            }),
            Event::State { .. } => None,
        })
    }

    /// Clears all recorded events and ops but keeps resources and state.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.ops.clear();
    }

    /// Current imaging state.
    pub fn state_snapshot(&self) -> &StateSnapshot {
        &self.state
    }

    /// Product of the opacities of every active layer.
    pub fn effective_opacity(&self) -> f32 {
        self.layer_stack
            .iter()
            .filter_map(|l| l.opacity)
            .product()
    }

    /// Looks up a live path resource.
    pub fn path(&self, id: PathId) -> Option<&PathDesc> {
        self.paths.get(id.0 as usize)?.as_ref()
    }

    /// Looks up a live image resource and its pixels.
    pub fn image(&self, id: ImageId) -> Option<(&ImageDesc, &[u8])> {
        self.images
            .get(id.0 as usize)?
            .as_ref()
            .map(|(desc, pixels)| (desc, pixels.as_slice()))
    }

    /// Looks up a live paint resource.
    pub fn paint(&self, id: PaintId) -> Option<&PaintDesc> {
        self.paints.get(id.0 as usize)?.as_ref()
    }

    /// Number of images that have been created and not destroyed.
    pub fn live_image_count(&self) -> usize {
        self.images.iter().filter(|slot| slot.is_some()).count()
    }

    fn sync_layers(&mut self) {
        self.state.layer_stack_depth = u32::try_from(self.layer_stack.len())
            .expect("RefBackend: too many layer stack entries for u32");
        self.state.layer_top = self.layer_stack.last().cloned();
    }
}

impl ResourceBackend for RefBackend {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let id =
            u32::try_from(self.paths.len()).expect("RefBackend: too many paths for u32 PathId");
        self.paths.push(Some(desc));
        PathId(id)
    }

    fn destroy_path(&mut self, id: PathId) {
        if let Some(slot) = self.paths.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId {
        let id =
            u32::try_from(self.images.len()).expect("RefBackend: too many images for u32 ImageId");
        self.images.push(Some((desc, pixels.to_vec())));
        ImageId(id)
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id =
            u32::try_from(self.paints.len()).expect("RefBackend: too many paints for u32 PaintId");
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for RefBackend {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::SetTransform(tx) => self.state.transform = *tx,
            StateOp::PushLayer(layer) => {
                self.layer_stack.push(layer.clone());
                self.sync_layers();
            }
            StateOp::PopLayer => {
                self.layer_stack.pop();
                self.sync_layers();
            }
            StateOp::SetPaint(id) => self.state.paint = Some(*id),
            StateOp::SetStroke(style) => self.state.stroke = Some(style.clone()),
            StateOp::SetFillRule(rule) => self.state.fill_rule = *rule,
        }

        self.ops.push(ImagingOp::State(op.clone()));
        self.events.push(Event::State {
            op,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(ImagingOp::Draw(op.clone()));
        let opacity = self.effective_opacity();
        let path = match &op {
            DrawOp::FillPath(id) | DrawOp::StrokePath(id) => self.path(*id).cloned(),
            _ => None,
        };
        let brush = self
            .state
            .paint
            .and_then(|id| self.paint(id))
            .map(|desc| desc.brush.clone());
        self.events.push(Event::Draw {
            op,
            state: self.state.clone(),
            opacity,
            path,
            brush,
        });
    }

    fn transform(&self) -> Affine {
        self.state.transform
    }

    fn measure_text(&self, text: &str, font: &FontDesc) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f32 * font.size * 0.5,
            height: font.size,
        }
    }
}
