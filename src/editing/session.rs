//! Edit session: routes pointer and key events to the editing engines
//!
//! The session owns the glyph store, history, tool state and the single
//! gesture lock. Hit testing happens outside; each pointer-down names what
//! was hit with a [`HitTarget`]. Pointer coordinates are converted from
//! client to glyph space here, once per event.

use super::deletion::{delete_points, DeleteOutcome};
use super::drag::{DragSession, GestureKind, GestureLock};
use super::insertion::insert_point;
use super::movement::{nudge_selection, PointDrag};
use super::snapping::{Guideline, Ruler, SnapHandler, SnapRequest};
use super::transform::{TransformEngine, TransformOp};
use crate::core::settings::EditorSettings;
use crate::core::state::{CommandId, FontStore, HistoryEntry, HistoryStack};
use crate::font_source::metrics::MetricLine;
use crate::geometry::quadrant::{FlipAxis, Quadrant};
use crate::io::input::{track_modifiers, KeyCode, KeyEvent, ModifierState, PointerEvent, ViewTransform};
use crate::tools::freehand::FreehandStroke;
use crate::tools::tool_state::{ToolId, ToolState};
use kurbo::{Point, Vec2};
use std::collections::HashSet;
use tracing::{debug, info};

/// What a pointer-down landed on
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// A point command
    Point(CommandId),
    /// The segment ending at this command, with the curve parameter if known
    Segment { id: CommandId, t: Option<f64> },
    /// A transform handle
    Handle(TransformOp),
    Canvas,
}

#[derive(Debug, Default)]
enum ActiveGesture {
    #[default]
    Idle,
    Points(PointDrag),
    Transform(DragSession),
}

/// Everything needed to edit one glyph
#[derive(Debug)]
pub struct EditSession<S: FontStore> {
    pub store: S,
    pub history: HistoryStack,
    pub tools: ToolState,
    pub transform: TransformEngine,
    pub view: ViewTransform,
    pub settings: EditorSettings,
    pub metrics: Vec<MetricLine>,
    pub rulers: Vec<Ruler>,
    pub selection: HashSet<CommandId>,
    guidelines: Vec<Guideline>,
    snapper: SnapHandler,
    freehand: FreehandStroke,
    lock: GestureLock,
    gesture: ActiveGesture,
    modifiers: ModifierState,
}

impl<S: FontStore> EditSession<S> {
    pub fn new(store: S, settings: EditorSettings, metrics: Vec<MetricLine>) -> Self {
        Self {
            store,
            history: HistoryStack::default(),
            tools: ToolState::default(),
            transform: TransformEngine::new(settings.rotation_step_degrees),
            view: ViewTransform::default(),
            snapper: SnapHandler::new(&settings),
            freehand: FreehandStroke::new(settings.simplify_tolerance),
            settings,
            metrics,
            rulers: Vec::new(),
            selection: HashSet::new(),
            guidelines: Vec::new(),
            lock: GestureLock::new(),
            gesture: ActiveGesture::Idle,
            modifiers: ModifierState::NONE,
        }
    }

    /// Guidelines for the current drag tick
    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    pub fn is_busy(&self) -> bool {
        self.lock.is_held()
    }

    pub fn freehand_points(&self) -> &[Point] {
        self.freehand.points()
    }

    /// Switch tools. A real switch ends any gesture, drops a freehand
    /// stroke and leaves transform mode; switching to the transform tool
    /// re-enters it on the current selection.
    pub fn activate_tool(&mut self, tool: ToolId) {
        if !self.tools.activate(tool) {
            return;
        }
        self.cancel_gesture();
        self.freehand.cancel();
        self.transform.disable();
        if tool == ToolId::Transform {
            self.transform.enable(&self.store, &self.selection);
        }
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = CommandId>) {
        self.selection = ids.into_iter().collect();
    }

    pub fn pointer_down(&mut self, event: &PointerEvent, target: HitTarget) {
        self.modifiers = event.modifiers;
        if self.lock.is_held() {
            debug!("Pointer down ignored, a gesture is live");
            return;
        }
        let position = self.view.event_position(event);

        match (self.tools.active, target) {
            (ToolId::Freehand, _) => {
                self.freehand.begin(&self.lock, position);
            }
            (ToolId::Transform, HitTarget::Handle(op)) => {
                let Some(session) = DragSession::begin(&self.lock, GestureKind::Transform, position) else {
                    return;
                };
                if self.transform.begin_drag(&self.store, op, position) {
                    self.gesture = ActiveGesture::Transform(session);
                }
            }
            (ToolId::Select | ToolId::Pen, HitTarget::Segment { id, t }) => {
                if let Some(inserted) = insert_point(&mut self.store, &mut self.history, &id, position, t) {
                    self.selection = HashSet::from([inserted]);
                }
            }
            (ToolId::Select, HitTarget::Point(id)) => {
                if !self.selection.contains(&id) {
                    if !event.modifiers.shift {
                        self.selection.clear();
                    }
                    self.selection.insert(id.clone());
                }
                self.begin_point_drag(&id, position);
            }
            (ToolId::Select, HitTarget::Canvas) => {
                if !event.modifiers.shift {
                    self.selection.clear();
                }
            }
            _ => {}
        }
    }

    fn begin_point_drag(&mut self, primary: &CommandId, position: Point) {
        let Some(drag) = PointDrag::begin(&self.lock, &self.store, &self.selection, primary, position) else {
            return;
        };
        let table = self.store.get_commands();
        if let Some(index) = table.position(primary) {
            let contour = table.contour_range(index);
            debug!("Snapping against contour {:?}", contour);
            self.snapper
                .start_snap(&self.metrics, &self.rulers, &table, contour, &drag.moving());
        }
        self.gesture = ActiveGesture::Points(drag);
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.modifiers = event.modifiers;
        let position = self.view.event_position(event);
        let request = SnapRequest {
            proposed: position,
            scale: self.view.zoom,
            zoom: self.view.zoom,
            grid: self.settings.grid_size,
            snap_points: self.settings.snap_to_points,
        };

        match &mut self.gesture {
            ActiveGesture::Points(drag) => {
                let snapper = &self.snapper;
                let result = drag.update(&mut self.store, position, event.modifiers, |proposed| {
                    snapper.snap_position(&SnapRequest { proposed, ..request })
                });
                if let Some(result) = result {
                    self.guidelines = result.guidelines;
                }
            }
            ActiveGesture::Transform(session) => {
                if session.update(position).is_some() {
                    self.transform.drag_move(&mut self.store, position, event.modifiers);
                }
            }
            ActiveGesture::Idle => {
                if self.freehand.is_drawing() {
                    self.freehand.add_point(position);
                }
            }
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        self.modifiers = event.modifiers;
        match std::mem::take(&mut self.gesture) {
            ActiveGesture::Points(drag) => {
                drag.end(&mut self.history);
            }
            ActiveGesture::Transform(_session) => {
                self.transform.end_drag(&mut self.history);
            }
            ActiveGesture::Idle => {
                if self.freehand.is_drawing() {
                    let ids = self.freehand.finish(&mut self.store, &mut self.history, self.view.zoom);
                    self.selection = ids.into_iter().collect();
                }
            }
        }
        self.end_snapping();
    }

    pub fn key_down(&mut self, event: &KeyEvent) {
        track_modifiers(&mut self.modifiers, event);
        if !event.down {
            return;
        }
        match event.code {
            KeyCode::Escape => self.escape(),
            KeyCode::Delete | KeyCode::Backspace => {
                self.delete_selection();
            }
            KeyCode::ArrowUp | KeyCode::ArrowDown | KeyCode::ArrowLeft | KeyCode::ArrowRight => {
                self.nudge(event.code);
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, event: &KeyEvent) {
        track_modifiers(&mut self.modifiers, event);
    }

    /// Cancel everything in flight: the drag rolls back, guidelines go,
    /// drawing and transform mode end. No move of the cancelled gesture is
    /// processed afterwards.
    pub fn escape(&mut self) {
        self.cancel_gesture();
        self.freehand.cancel();
        self.transform.disable();
        self.tools.activate(ToolId::Select);
        info!("Editing cancelled");
    }

    fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            ActiveGesture::Points(mut drag) => drag.cancel(&mut self.store),
            ActiveGesture::Transform(mut session) => {
                session.cancel();
                self.transform.cancel_drag(&mut self.store);
            }
            ActiveGesture::Idle => {}
        }
        self.end_snapping();
    }

    fn end_snapping(&mut self) {
        self.snapper.clear();
        self.guidelines.clear();
    }

    pub fn delete_selection(&mut self) -> DeleteOutcome {
        if self.lock.is_held() {
            return DeleteOutcome::default();
        }
        let outcome = delete_points(&mut self.store, &mut self.history, &self.selection);
        if outcome.changed() {
            self.selection.clear();
            self.transform.rebase(&self.store, &self.selection);
        }
        outcome
    }

    fn nudge(&mut self, code: KeyCode) {
        if self.lock.is_held() {
            return;
        }
        let amount = self.settings.nudge_amount(self.modifiers.shift);
        let delta = match code {
            KeyCode::ArrowUp => Vec2::new(0.0, amount),
            KeyCode::ArrowDown => Vec2::new(0.0, -amount),
            KeyCode::ArrowLeft => Vec2::new(-amount, 0.0),
            KeyCode::ArrowRight => Vec2::new(amount, 0.0),
            _ => return,
        };
        if nudge_selection(&mut self.store, &mut self.history, &self.selection, delta) {
            self.transform.rebase(&self.store, &self.selection);
        }
    }

    /// Flip the transform selection about one of its nine anchors
    pub fn flip(&mut self, anchor: Quadrant, axis: FlipAxis) -> bool {
        if self.lock.is_held() {
            return false;
        }
        self.transform.flip(&mut self.store, &mut self.history, anchor, axis)
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(entry) = self.history.undo(&mut self.store) else {
            return false;
        };
        match &entry {
            HistoryEntry::Transform(change) => self.transform.restore(&change.old),
            _ => {
                self.transform.rebase(&self.store, &self.selection);
            }
        }
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(entry) = self.history.redo(&mut self.store) else {
            return false;
        };
        match &entry {
            HistoryEntry::Transform(change) => self.transform.restore(&change.new),
            _ => {
                self.transform.rebase(&self.store, &self.selection);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Command, CommandKind, CommandTable, GlyphStore};
    use crate::io::input::PointerPhase;
    use crate::font_source::metrics::FontMetrics;
    use crate::geometry::quadrant::Quadrant;

    fn square() -> GlyphStore {
        GlyphStore::new(CommandTable::normalize(vec![
            Command::move_to("a", 0.0, 0.0),
            Command::line_to("b", 100.0, 0.0),
            Command::line_to("c", 100.0, 100.0),
            Command::line_to("d", 0.0, 100.0),
            Command::close_path("z"),
        ]))
    }

    fn session() -> EditSession<GlyphStore> {
        let metrics = FontMetrics::with_units_per_em(1000.0).metric_lines(500.0);
        EditSession::new(square(), EditorSettings::default(), metrics)
    }

    /// Client coordinates for a glyph point with the default view (y flipped)
    fn at(phase: PointerPhase, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(phase, x, -y, ModifierState::NONE)
    }

    #[test]
    fn test_drag_point_snaps_and_commits() {
        let mut session = session();
        let c = CommandId::from("c");
        session.pointer_down(&at(PointerPhase::Down, 100.0, 100.0), HitTarget::Point(c.clone()));
        assert!(session.is_busy());

        // y lands 2 units above point "d" and snaps to it
        session.pointer_move(&at(PointerPhase::Move, 120.0, 102.0));
        assert_eq!(session.store.table.point(&c), Some(Point::new(120.0, 100.0)));
        assert!(!session.guidelines().is_empty());

        session.pointer_up(&at(PointerPhase::Up, 120.0, 102.0));
        assert!(!session.is_busy());
        assert!(session.guidelines().is_empty());
        assert_eq!(session.history.last().map(HistoryEntry::label), Some("commands.update"));

        assert!(session.undo());
        assert_eq!(session.store.table.point(&c), Some(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_escape_rolls_back_and_blocks_moves() {
        let mut session = session();
        let before = session.store.table.clone();
        session.pointer_down(&at(PointerPhase::Down, 100.0, 100.0), HitTarget::Point(CommandId::from("c")));
        session.pointer_move(&at(PointerPhase::Move, 150.0, 150.0));
        session.key_down(&KeyEvent::down(KeyCode::Escape));

        assert_eq!(session.store.table, before);
        assert!(session.guidelines().is_empty());
        assert!(!session.is_busy());
        session.pointer_move(&at(PointerPhase::Move, 170.0, 170.0));
        assert_eq!(session.store.table, before);
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_click_on_segment_inserts() {
        let mut session = session();
        session.pointer_down(
            &at(PointerPhase::Down, 50.0, 0.0),
            HitTarget::Segment {
                id: CommandId::from("b"),
                t: None,
            },
        );
        assert_eq!(session.store.table.len(), 6);
        assert_eq!(session.selection.len(), 1);
        assert_eq!(session.store.table.kind_at(1), Some(CommandKind::LineTo));
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let mut session = session();
        session.select([CommandId::from("b")]);
        session.key_down(&KeyEvent::down(KeyCode::Delete));
        assert!(!session.store.table.contains(&CommandId::from("b")));
        assert!(session.selection.is_empty());
    }

    #[test]
    fn test_tool_switch_cancels_freehand_and_transform() {
        let mut session = session();
        session.activate_tool(ToolId::Freehand);
        session.pointer_down(&at(PointerPhase::Down, 0.0, 0.0), HitTarget::Canvas);
        session.pointer_move(&at(PointerPhase::Move, 10.0, 10.0));
        assert!(session.is_busy());

        session.activate_tool(ToolId::Transform);
        assert!(!session.is_busy());
        assert!(session.freehand_points().is_empty());
        assert!(session.transform.is_enabled());

        session.activate_tool(ToolId::Select);
        assert!(!session.transform.is_enabled());
    }

    #[test]
    fn test_transform_drag_and_undo_restores_matrices() {
        let mut session = session();
        session.activate_tool(ToolId::Transform);
        session.pointer_down(
            &at(PointerPhase::Down, 100.0, 100.0),
            HitTarget::Handle(TransformOp::Scale(Quadrant::TopRight)),
        );
        session.pointer_move(&at(PointerPhase::Move, 200.0, 200.0));
        session.pointer_up(&at(PointerPhase::Up, 200.0, 200.0));
        assert_eq!(session.store.table.point(&CommandId::from("c")), Some(Point::new(200.0, 200.0)));
        assert_eq!(session.history.last().map(HistoryEntry::label), Some("transform"));

        assert!(session.undo());
        assert_eq!(session.store.table.point(&CommandId::from("c")), Some(Point::new(100.0, 100.0)));
        assert_eq!(session.transform.affine(), kurbo::Affine::IDENTITY);
        assert!(session.redo());
        assert_eq!(session.store.table.point(&CommandId::from("c")), Some(Point::new(200.0, 200.0)));
    }

    #[test]
    fn test_transform_after_undo_uses_current_outline() {
        let mut session = session();
        let a = CommandId::from("a");
        session.select([a.clone()]);
        session.key_down(&KeyEvent::down(KeyCode::ArrowRight));
        assert_eq!(session.store.table.point(&a), Some(Point::new(1.0, 0.0)));

        session.select(Vec::<CommandId>::new());
        session.activate_tool(ToolId::Transform);
        assert!(session.undo());
        assert_eq!(session.store.table.point(&a), Some(Point::new(0.0, 0.0)));

        // A drag that goes nowhere must leave the undone nudge undone
        session.pointer_down(
            &at(PointerPhase::Down, 100.0, 100.0),
            HitTarget::Handle(TransformOp::Scale(Quadrant::TopRight)),
        );
        session.pointer_move(&at(PointerPhase::Move, 100.0, 100.0));
        session.pointer_up(&at(PointerPhase::Up, 100.0, 100.0));
        assert_eq!(session.store.table.point(&a), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_transform_after_delete_does_not_restore_points() {
        let mut session = session();
        session.activate_tool(ToolId::Transform);
        session.select([CommandId::from("b")]);
        session.delete_selection();
        assert!(!session.store.table.contains(&CommandId::from("b")));

        session.pointer_down(
            &at(PointerPhase::Down, 100.0, 100.0),
            HitTarget::Handle(TransformOp::Scale(Quadrant::TopRight)),
        );
        session.pointer_move(&at(PointerPhase::Move, 200.0, 200.0));
        session.pointer_up(&at(PointerPhase::Up, 200.0, 200.0));
        assert!(!session.store.table.contains(&CommandId::from("b")));
        assert_eq!(session.store.table.point(&CommandId::from("c")), Some(Point::new(200.0, 200.0)));
    }

    #[test]
    fn test_arrow_nudge() {
        let mut session = session();
        session.select([CommandId::from("a")]);
        session.key_down(&KeyEvent::down(KeyCode::ShiftLeft));
        session.key_down(&KeyEvent::down(KeyCode::ArrowRight));
        assert_eq!(session.store.table.point(&CommandId::from("a")), Some(Point::new(10.0, 0.0)));
    }
}
