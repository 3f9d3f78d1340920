use std::{collections::BTreeSet, time::Duration};

use jigsaw_core::{GridPos, GridSize, Rotation, Vec2, Viewport};
use jigsaw_generator::{
    GeneratedPieces, Partition, PartitionConfig, PieceMode, ScatterConfig, ShapeSeed, TextureKey,
    scatter,
};

use crate::{
    Board, ChallengeLevel, ChallengeRules, GroupId, PieceRef, PieceSave, RestoreError,
    SAVE_VERSION, SaveData, SceneSave, SessionError, SessionTimer, SnapTolerance, TimerTick,
};

/// The image a puzzle is cut from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
    /// Identifier used to look the image up.
    pub key: String,
    /// Display name.
    pub name: String,
}

/// Settings of one puzzle session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Source image.
    pub image: ImageRef,
    /// Width of the assembled puzzle in pixels.
    pub puzzle_width: u32,
    /// Height of the assembled puzzle in pixels.
    pub puzzle_height: u32,
    /// Grid the image is cut into.
    pub grid: GridSize,
    /// Cut style.
    pub mode: PieceMode,
    /// Table bounds for dragging and scattering.
    pub viewport: Viewport,
    /// Snap tolerances.
    pub snap: SnapTolerance,
    /// Initial placement parameters.
    pub scatter: ScatterConfig,
    /// Challenge policy; `None` for a normal, untimed puzzle.
    pub challenge: Option<ChallengeRules>,
}

impl SessionConfig {
    /// A normal-mode puzzle with default table, snap and scatter settings.
    #[must_use]
    pub fn new(
        image: ImageRef,
        puzzle_width: u32,
        puzzle_height: u32,
        grid: GridSize,
        mode: PieceMode,
    ) -> Self {
        Self {
            image,
            puzzle_width,
            puzzle_height,
            grid,
            mode,
            viewport: Viewport::default(),
            snap: SnapTolerance::default(),
            scatter: ScatterConfig::default(),
            challenge: None,
        }
    }

    /// A challenge puzzle for `level`, cut from the level's image.
    #[must_use]
    pub fn challenge(
        level: &ChallengeLevel,
        name: String,
        puzzle_width: u32,
        puzzle_height: u32,
    ) -> Self {
        let rules = level.rules();
        let image = ImageRef {
            key: level.image_key.to_owned(),
            name,
        };
        let mut config = Self::new(image, puzzle_width, puzzle_height, level.grid, level.mode);
        config.scatter.rotate_initially = rules.rotate_initially;
        config.challenge = Some(rules);
        config
    }

    /// Whether groups may be rotated.
    #[must_use]
    pub fn rotation_enabled(&self) -> bool {
        self.challenge.is_none_or(|rules| rules.rotation_enabled)
    }

    /// Partitioner input for this session.
    #[must_use]
    pub fn partition_config(&self) -> PartitionConfig {
        PartitionConfig::new(self.puzzle_width, self.puzzle_height, self.grid, self.mode)
    }

    fn timer(&self) -> SessionTimer {
        match self.challenge {
            Some(rules) => SessionTimer::countdown(rules.time_limit),
            None => SessionTimer::elapsed(),
        }
    }
}

/// Lifecycle of a session. `Solved` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum SessionStatus {
    /// The puzzle is being put together.
    #[display("assembling")]
    Assembling,
    /// Every piece is joined and upright.
    #[display("solved")]
    Solved,
    /// A challenge countdown ran out.
    #[display("failed")]
    Failed,
}

/// Presentation cues produced by session commands.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum SessionEvent {
    /// A group was picked up.
    Picked {
        /// The dragged group.
        group: GroupId,
    },
    /// A group was released without joining anything.
    Dropped {
        /// The released group.
        group: GroupId,
    },
    /// A released group joined its neighbors.
    Merged {
        /// The group after merging.
        group: GroupId,
        /// Number of groups merged into it.
        merges: usize,
    },
    /// A group turned.
    Rotated {
        /// The turned group.
        group: GroupId,
        /// Its new rotation.
        rotation: Rotation,
    },
    /// The puzzle was completed.
    Solved {
        /// Seconds spent on the puzzle.
        elapsed: f64,
    },
    /// The challenge countdown ran out.
    Failed,
}

/// One puzzle being played.
///
/// A session owns the [`Board`] and is the only way to mutate it during
/// play: drags go through [`begin_drag`](Self::begin_drag),
/// [`apply_drag`](Self::apply_drag) and [`end_drag`](Self::end_drag), one at a
/// time; rotation goes through [`rotate_hovered_group`](Self::rotate_hovered_group).
/// Every command returns the [`SessionEvent`]s it produced.
///
/// # Examples
///
/// ```
/// use jigsaw_core::GridSize;
/// use jigsaw_game::{ImageRef, Session, SessionConfig, SessionStatus};
/// use jigsaw_generator::{PieceMode, ShapeSeed};
///
/// let grid = GridSize::new(2, 2);
/// let config = SessionConfig::new(ImageRef::default(), 400, 300, grid, PieceMode::Rect);
/// let mut session = Session::new(config, ShapeSeed::new(5));
/// assert_eq!(session.status(), SessionStatus::Assembling);
///
/// let piece = session.board().stack()[0];
/// session.begin_drag(piece)?;
/// session.apply_drag((10.0, 0.0).into())?;
/// session.end_drag()?;
/// # Ok::<(), jigsaw_game::SessionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    seed: ShapeSeed,
    board: Board,
    timer: SessionTimer,
    status: SessionStatus,
    drag: Option<GroupId>,
    hovered: Option<GridPos>,
}

impl Session {
    /// Cuts and scatters a new puzzle from `seed`.
    #[must_use]
    pub fn new(config: SessionConfig, seed: ShapeSeed) -> Self {
        let partition = Partition::generate(&config.partition_config(), seed);
        Self::with_partition(config, partition, Vec::new(), seed)
    }

    /// Builds a session from pieces produced by a
    /// [`PieceGenerator`](jigsaw_generator::PieceGenerator), keeping their
    /// texture keys.
    #[must_use]
    pub fn from_generated(config: SessionConfig, generated: GeneratedPieces) -> Self {
        let GeneratedPieces {
            partition,
            keys,
            seed,
        } = generated;
        Self::with_partition(config, partition, keys, seed)
    }

    fn with_partition(
        config: SessionConfig,
        partition: Partition,
        keys: Vec<TextureKey>,
        seed: ShapeSeed,
    ) -> Self {
        let placements = scatter(partition.pieces(), &config.viewport, &config.scatter, seed);
        let mut board = Board::with_textures(partition, keys);
        board.place(&placements);
        log::debug!(
            "new session: {}x{} {:?}, seed {seed}",
            config.grid.cols(),
            config.grid.rows(),
            config.mode,
        );
        Self {
            timer: config.timer(),
            config,
            seed,
            board,
            status: SessionStatus::Assembling,
            drag: None,
            hovered: None,
        }
    }

    /// Recreates a saved puzzle.
    ///
    /// The grid, cut style and image come from the save; everything else
    /// from `base`. The saved shape seed is replayed so outlines match.
    ///
    /// # Errors
    ///
    /// Returns a [`RestoreError`] if the save is incomplete or inconsistent.
    /// A grid outside the supported size range is rejected before anything
    /// is cut.
    pub fn from_save(save: &SaveData, base: SessionConfig) -> Result<Self, RestoreError> {
        let scene = save.scene.as_ref().ok_or(RestoreError::MissingScene)?;
        if !GridSize::is_valid(scene.cols, scene.rows) {
            return Err(RestoreError::GridOutOfRange {
                cols: scene.cols,
                rows: scene.rows,
            });
        }
        let seed = scene.shape_seed.unwrap_or_else(|| {
            log::warn!("save has no shape seed; piece outlines may differ");
            ShapeSeed::random()
        });
        let config = SessionConfig {
            image: ImageRef {
                key: scene.image_key.clone(),
                name: scene.image_name.clone(),
            },
            grid: GridSize::new(scene.cols, scene.rows),
            mode: scene.piece_mode,
            ..base
        };
        let mut session = Self::new(config, seed);
        session.restore_state(save)?;
        Ok(session)
    }

    /// Starts over with the same settings and a fresh seed.
    pub fn restart(&mut self) {
        self.restart_with_seed(ShapeSeed::random());
    }

    /// Starts over with the same settings and `seed`.
    pub fn restart_with_seed(&mut self, seed: ShapeSeed) {
        log::info!("restarting with seed {seed}");
        *self = Self::new(self.config.clone(), seed);
    }

    /// Session settings.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Seed the pieces were cut and scattered with.
    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.seed
    }

    /// The pieces and their groups.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The puzzle clock.
    #[must_use]
    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns `true` once the puzzle has been completed.
    ///
    /// The state is latched: polling repeatedly never produces another
    /// [`SessionEvent::Solved`].
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.status.is_solved()
    }

    /// The group being dragged.
    #[must_use]
    pub fn dragging(&self) -> Option<GroupId> {
        self.drag
    }

    /// The piece under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<GridPos> {
        self.hovered
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        if self.status.is_assembling() {
            Ok(())
        } else {
            Err(SessionError::Finished)
        }
    }

    /// Advances the clock. A challenge fails when its countdown reaches zero.
    pub fn tick(&mut self, delta: Duration) -> Vec<SessionEvent> {
        if !self.status.is_assembling() {
            return Vec::new();
        }
        match self.timer.tick(delta) {
            TimerTick::Expired => {
                self.status = SessionStatus::Failed;
                self.drag = None;
                log::info!("time is up");
                vec![SessionEvent::Failed]
            }
            TimerTick::Idle | TimerTick::Running => Vec::new(),
        }
    }

    /// Picks up the group containing `pos` and brings it to the top.
    ///
    /// # Errors
    ///
    /// Fails if the session is finished, a drag is already active, or `pos`
    /// is not a piece of this puzzle.
    pub fn begin_drag(&mut self, pos: GridPos) -> Result<SessionEvent, SessionError> {
        self.ensure_playing()?;
        if self.drag.is_some() {
            return Err(SessionError::DragInProgress);
        }
        let group = self
            .board
            .group_of(pos)
            .ok_or(SessionError::UnknownPiece { pos })?;
        self.board.raise_group(group);
        self.drag = Some(group);
        Ok(SessionEvent::Picked { group })
    }

    /// Moves the dragged group by `delta`, clamped to the table, and returns
    /// the movement actually applied.
    ///
    /// # Errors
    ///
    /// Fails if the session is finished or no drag is active.
    pub fn apply_drag(&mut self, delta: Vec2) -> Result<Vec2, SessionError> {
        self.ensure_playing()?;
        let group = self.drag.ok_or(SessionError::NoActiveDrag)?;
        Ok(self.board.drag_group(group, delta, &self.config.viewport))
    }

    /// Releases the dragged group, snapping it to matching neighbors.
    ///
    /// # Errors
    ///
    /// Fails if the session is finished or no drag is active.
    pub fn end_drag(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_playing()?;
        let group = self.drag.take().ok_or(SessionError::NoActiveDrag)?;
        let outcome = self.board.try_snap(group, &self.config.snap);
        let mut events = vec![if outcome.merged() {
            SessionEvent::Merged {
                group: outcome.group,
                merges: outcome.merges,
            }
        } else {
            SessionEvent::Dropped { group }
        }];
        if outcome.merged() {
            self.check_win(&mut events);
        }
        Ok(events)
    }

    /// Sets the piece under the pointer.
    pub fn set_hover(&mut self, pos: Option<GridPos>) {
        self.hovered = pos.filter(|pos| self.board.grid().contains(*pos));
    }

    /// Hit-tests `point` and hovers the topmost piece under it.
    pub fn hover_at(&mut self, point: Vec2) -> Option<GridPos> {
        self.hovered = self.board.piece_at(point);
        self.hovered
    }

    /// Turns the hovered piece's group a quarter turn clockwise.
    ///
    /// Does nothing when no piece is hovered or rotation is disabled.
    ///
    /// # Errors
    ///
    /// Fails if the session is finished.
    pub fn rotate_hovered_group(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_playing()?;
        if !self.config.rotation_enabled() {
            return Ok(Vec::new());
        }
        let Some(group) = self.hovered.and_then(|pos| self.board.group(self.board.group_of(pos)?))
        else {
            return Ok(Vec::new());
        };
        let (id, rotation) = (group.id(), group.rotation().next());
        if !self.board.rotate_group(id, rotation) {
            return Ok(Vec::new());
        }
        let mut events = vec![SessionEvent::Rotated {
            group: id,
            rotation,
        }];
        self.check_win(&mut events);
        Ok(events)
    }

    fn check_win(&mut self, events: &mut Vec<SessionEvent>) {
        if !self.status.is_assembling() || !self.board.is_solved() {
            return;
        }
        self.status = SessionStatus::Solved;
        self.timer.stop();
        self.board.lock_solved();
        self.drag = None;
        let elapsed = self.timer.elapsed_seconds();
        log::info!("puzzle solved in {elapsed:.2}s");
        events.push(SessionEvent::Solved { elapsed });
    }

    /// Captures the full layout.
    ///
    /// The timer is stored as elapsed seconds in both modes.
    #[must_use]
    pub fn export_state(&self) -> SaveData {
        let pieces = self
            .board
            .pieces()
            .iter()
            .map(|piece| {
                let pos = piece.grid_pos();
                PieceSave {
                    id: Some(pos.to_string()),
                    gx: pos.x,
                    gy: pos.y,
                    x: piece.position().x,
                    y: piece.position().y,
                    rot: piece.rotation().steps(),
                    group_id: self.board.group_of(pos).map(GroupId::value),
                }
            })
            .collect();
        let groups = self
            .board
            .groups()
            .iter()
            .map(|group| {
                let members = group
                    .members()
                    .iter()
                    .map(|pos| PieceRef::Id(pos.to_string()))
                    .collect();
                (group.id().to_string(), members)
            })
            .collect();
        SaveData {
            version: SAVE_VERSION,
            scene: Some(SceneSave {
                rows: self.config.grid.rows(),
                cols: self.config.grid.cols(),
                image_key: self.config.image.key.clone(),
                image_name: self.config.image.name.clone(),
                piece_mode: self.config.mode,
                timer: self.timer.elapsed_seconds(),
                shape_seed: Some(self.seed),
            }),
            pieces: Some(pieces),
            groups: Some(groups),
        }
    }

    /// Replaces the layout with a saved one.
    ///
    /// Piece poses and group membership are taken verbatim from the save;
    /// pieces missing from every group list become singletons. Group ids are
    /// reassigned. An elapsed timer resumes from the saved time, a countdown
    /// restarts from its limit.
    ///
    /// # Errors
    ///
    /// Returns a [`RestoreError`] if the save does not describe this puzzle.
    /// The session is left unchanged in that case.
    pub fn restore_state(&mut self, save: &SaveData) -> Result<(), RestoreError> {
        let scene = save.scene.as_ref().ok_or(RestoreError::MissingScene)?;
        let saved_pieces = save.pieces.as_ref().ok_or(RestoreError::MissingPieces)?;
        self.check_scene(scene)?;

        let grid = self.board.grid();
        let legacy = save.is_legacy();
        if legacy && saved_pieces.len() > grid.len() {
            return Err(RestoreError::PieceCountMismatch {
                saved: saved_pieces.len(),
                expected: grid.len(),
            });
        }

        let mut staged = self.board.clone();
        staged.reset_layout();
        let mut posed = BTreeSet::new();
        for (index, saved) in saved_pieces.iter().enumerate() {
            let pos = if legacy {
                grid.pos_at(index)
            } else {
                resolve_id(grid, &saved.reference())?
            };
            if !posed.insert(pos) {
                return Err(RestoreError::DuplicateMember { pos });
            }
            let rotation = Rotation::try_from(saved.rot)
                .map_err(|source| RestoreError::InvalidRotation { pos, source })?;
            staged.set_pose(pos, Vec2::new(saved.x, saved.y), rotation);
        }

        let mut grouped = BTreeSet::new();
        for (key, refs) in save.groups.iter().flatten() {
            let mut members = Vec::with_capacity(refs.len());
            for reference in refs {
                let pos = resolve_ref(grid, reference, legacy)?;
                if !grouped.insert(pos) {
                    return Err(RestoreError::DuplicateMember { pos });
                }
                members.push(pos);
            }
            let mut rotations = members
                .iter()
                .filter_map(|pos| staged.piece(*pos))
                .map(|piece| piece.rotation());
            if let Some(first) = rotations.next()
                && rotations.any(|rotation| rotation != first)
            {
                return Err(RestoreError::InconsistentGroupRotation { group: key.clone() });
            }
            if !members.is_empty() {
                staged.create_group(members);
            }
        }
        debug_assert!(staged.groups().is_consistent());
        debug_assert!(staged.groups_share_rotation());

        self.board = staged;
        self.timer = self.config.timer();
        self.timer.resume_from(scene.timer);
        self.status = SessionStatus::Assembling;
        self.drag = None;
        self.hovered = None;
        log::debug!(
            "restored {} pieces into {} groups",
            saved_pieces.len(),
            self.board.groups().len()
        );
        if self.board.is_solved() {
            self.status = SessionStatus::Solved;
            self.timer.stop();
            self.board.lock_solved();
        }
        Ok(())
    }

    fn check_scene(&self, scene: &SceneSave) -> Result<(), RestoreError> {
        let grid = self.board.grid();
        if (scene.cols, scene.rows) != (grid.cols(), grid.rows()) {
            return Err(RestoreError::GridMismatch {
                saved_cols: scene.cols,
                saved_rows: scene.rows,
                cols: grid.cols(),
                rows: grid.rows(),
            });
        }
        if scene.piece_mode != self.config.mode {
            return Err(RestoreError::ModeMismatch {
                saved: scene.piece_mode,
                current: self.config.mode,
            });
        }
        if let Some(saved) = scene.shape_seed
            && saved != self.seed
        {
            return Err(RestoreError::SeedMismatch {
                saved,
                current: self.seed,
            });
        }
        Ok(())
    }
}

fn resolve_id(grid: GridSize, reference: &str) -> Result<GridPos, RestoreError> {
    reference
        .parse::<GridPos>()
        .ok()
        .filter(|pos| grid.contains(*pos))
        .ok_or_else(|| RestoreError::UnknownPiece {
            reference: reference.to_owned(),
        })
}

fn resolve_ref(
    grid: GridSize,
    reference: &PieceRef,
    legacy: bool,
) -> Result<GridPos, RestoreError> {
    match (reference, legacy) {
        (PieceRef::Id(id), false) => resolve_id(grid, id),
        (PieceRef::Index(index), true) if *index < grid.len() => Ok(grid.pos_at(*index)),
        _ => Err(RestoreError::UnknownPiece {
            reference: reference.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn config(cols: u16, rows: u16) -> SessionConfig {
        SessionConfig::new(
            ImageRef {
                key: "cat".into(),
                name: "Cat".into(),
            },
            u32::from(cols) * 100,
            u32::from(rows) * 100,
            GridSize::new(cols, rows),
            PieceMode::Rect,
        )
    }

    #[test]
    fn test_new_session_scatters_inside_table() {
        let session = Session::new(config(4, 3), ShapeSeed::new(11));
        let area = session.config().viewport.play_area();
        assert_eq!(session.board().groups().len(), 12);
        for piece in session.board().pieces() {
            let bounds = piece.world_bounds();
            assert!(bounds.min.x >= area.min.x && bounds.max.x <= area.max.x);
            assert!(bounds.min.y >= area.min.y && bounds.max.y <= area.max.y);
            assert_eq!(piece.rotation(), Rotation::R0);
        }
    }

    #[test]
    fn test_drag_protocol_is_enforced() {
        let mut session = Session::new(config(2, 2), ShapeSeed::new(3));
        assert_eq!(session.apply_drag(Vec2::ZERO), Err(SessionError::NoActiveDrag));
        assert_eq!(session.end_drag(), Err(SessionError::NoActiveDrag));

        let outside = GridPos::new(5, 5);
        assert_eq!(
            session.begin_drag(outside),
            Err(SessionError::UnknownPiece { pos: outside })
        );

        let piece = session.board().stack()[0];
        assert!(session.begin_drag(piece).unwrap().is_picked());
        assert_eq!(session.board().stack().last(), Some(&piece));
        assert_eq!(session.dragging(), session.board().group_of(piece));
        assert_eq!(session.begin_drag(piece), Err(SessionError::DragInProgress));
        assert!(!session.end_drag().unwrap().is_empty());
        assert_eq!(session.dragging(), None);
    }

    #[test]
    fn test_rotation_disabled_on_first_challenge_level() {
        let level = ChallengeLevel::get(1).unwrap();
        let config = SessionConfig::challenge(&level, "One".into(), 300, 300);
        let mut session = Session::new(config, ShapeSeed::new(1));
        session.set_hover(Some(GridPos::new(0, 0)));
        assert_eq!(session.rotate_hovered_group(), Ok(Vec::new()));
        assert!(session.board().pieces().iter().all(|p| p.rotation() == Rotation::R0));
    }

    #[test]
    fn test_rotate_hovered_group_turns_one_step() {
        let mut session = Session::new(config(2, 2), ShapeSeed::new(8));
        assert_eq!(session.rotate_hovered_group(), Ok(Vec::new()));

        let pos = GridPos::new(1, 0);
        session.set_hover(Some(pos));
        let events = session.rotate_hovered_group().unwrap();
        assert!(matches!(
            events[..],
            [SessionEvent::Rotated {
                rotation: Rotation::R90,
                ..
            }]
        ));
        assert_eq!(session.board().piece(pos).unwrap().rotation(), Rotation::R90);
    }

    #[test]
    fn test_countdown_expiry_fails_session() {
        let level = ChallengeLevel::get(2).unwrap();
        let config = SessionConfig::challenge(&level, "Two".into(), 400, 400);
        let mut session = Session::new(config, ShapeSeed::new(2));
        assert!(session.tick(Duration::from_secs(89)).is_empty());
        assert_eq!(session.tick(Duration::from_secs(5)), [SessionEvent::Failed]);
        assert!(session.status().is_failed());
        assert!(session.tick(Duration::from_secs(5)).is_empty());
        let piece = GridPos::new(0, 0);
        assert_eq!(session.begin_drag(piece), Err(SessionError::Finished));
    }

    #[test]
    fn test_export_then_restore_reproduces_layout() {
        let mut session = Session::new(config(3, 2), ShapeSeed::new(21));
        session.set_hover(Some(GridPos::new(2, 1)));
        session.rotate_hovered_group().unwrap();
        session.tick(Duration::from_secs(7));
        let save = session.export_state();

        let mut restored = Session::new(config(3, 2), ShapeSeed::new(21));
        restored.restore_state(&save).unwrap();
        for (a, b) in session.board().pieces().iter().zip(restored.board().pieces()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.rotation(), b.rotation());
        }
        assert_eq!(restored.timer().seconds(), 7.0);
        assert_eq!(restored.board().groups().len(), 6);
    }

    #[test]
    fn test_rejected_restore_leaves_session_untouched() {
        let mut session = Session::new(config(2, 2), ShapeSeed::new(4));
        let before = session.board().clone();

        let mut save = session.export_state();
        save.scene.as_mut().unwrap().cols = 3;
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::GridMismatch { saved_cols: 3, .. })
        ));

        let mut save = session.export_state();
        save.pieces.as_mut().unwrap()[1].rot = 4;
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::InvalidRotation { .. })
        ));

        let mut save = session.export_state();
        save.pieces.as_mut().unwrap()[0].id = Some("9_9".into());
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::UnknownPiece { .. })
        ));

        let save = SaveData {
            version: SAVE_VERSION,
            scene: None,
            pieces: Some(Vec::new()),
            groups: None,
        };
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::MissingScene)
        ));

        let mut save = session.export_state();
        save.pieces = None;
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::MissingPieces)
        ));

        let mut save = session.export_state();
        save.scene.as_mut().unwrap().piece_mode = PieceMode::Quad;
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::ModeMismatch {
                saved: PieceMode::Quad,
                current: PieceMode::Rect,
            })
        ));

        let mut save = session.export_state();
        save.scene.as_mut().unwrap().shape_seed = Some(ShapeSeed::new(5));
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::SeedMismatch { .. })
        ));
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_restore_rejects_inconsistent_groups() {
        let mut session = Session::new(config(2, 2), ShapeSeed::new(4));
        let before = session.board().clone();
        let id = |x, y| PieceRef::Id(GridPos::new(x, y).to_string());

        let mut save = session.export_state();
        save.groups = Some(BTreeMap::from([
            ("0".to_owned(), vec![id(0, 0), id(1, 0)]),
            ("1".to_owned(), vec![id(1, 0)]),
        ]));
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::DuplicateMember { pos }) if pos == GridPos::new(1, 0)
        ));

        let mut save = session.export_state();
        let pieces = save.pieces.as_mut().unwrap();
        for piece in pieces.iter_mut() {
            if piece.id.as_deref() == Some("1_0") {
                piece.rot = 1;
            }
        }
        save.groups = Some(BTreeMap::from([("7".to_owned(), vec![id(0, 0), id(1, 0)])]));
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::InconsistentGroupRotation { group }) if group == "7"
        ));

        let mut save = session.export_state();
        let pieces = save.pieces.as_mut().unwrap();
        let first = pieces[0].clone();
        pieces[1] = first;
        assert!(matches!(
            session.restore_state(&save),
            Err(RestoreError::DuplicateMember { .. })
        ));
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_from_save_rejects_oversized_grid() {
        let session = Session::new(config(2, 2), ShapeSeed::new(4));
        let mut save = session.export_state();
        let scene = save.scene.as_mut().unwrap();
        scene.cols = 80;
        scene.rows = 80;
        assert!(matches!(
            Session::from_save(&save, config(2, 2)),
            Err(RestoreError::GridOutOfRange { cols: 80, rows: 80 })
        ));

        save.scene.as_mut().unwrap().cols = 1;
        assert!(matches!(
            Session::from_save(&save, config(2, 2)),
            Err(RestoreError::GridOutOfRange { cols: 1, .. })
        ));
    }
}
