use std::time::Duration;

use jigsaw_core::{GridPos, GridSize, Vec2};
use jigsaw_game::{
    ChallengeLevel, ImageRef, PieceRef, RestoreError, SaveData, Session, SessionConfig,
    SessionError, SessionEvent,
};
use jigsaw_generator::{PieceMode, ShapeSeed};

const ORIGIN: Vec2 = Vec2::new(300.0, 200.0);

fn config(cols: u16, rows: u16, mode: PieceMode) -> SessionConfig {
    SessionConfig::new(
        ImageRef {
            key: "harbor".into(),
            name: "Harbor".into(),
        },
        u32::from(cols) * 120,
        u32::from(rows) * 90,
        GridSize::new(cols, rows),
        mode,
    )
}

/// Drags the group of `pos` so that the piece sits at its assembled spot.
fn place(session: &mut Session, pos: GridPos) -> Vec<SessionEvent> {
    let piece = session.board().piece(pos).unwrap();
    let delta = ORIGIN + piece.anchor() - piece.position();
    session.begin_drag(pos).unwrap();
    let applied = session.apply_drag(delta).unwrap();
    assert!(applied.approx_eq(delta, 1e-3));
    session.end_drag().unwrap()
}

fn solve(session: &mut Session) -> Vec<SessionEvent> {
    let positions: Vec<_> = session.board().grid().positions().collect();
    let mut events = Vec::new();
    for pos in positions {
        if session.is_solved() {
            break;
        }
        events.extend(place(session, pos));
    }
    events
}

fn group_sizes(session: &Session) -> Vec<usize> {
    let mut sizes: Vec<_> = session.board().groups().iter().map(|g| g.len()).collect();
    sizes.sort_unstable();
    sizes
}

#[test]
fn test_two_by_two_solves_once() {
    let mut session = Session::new(config(2, 2, PieceMode::Quad), ShapeSeed::new(42));
    session.tick(Duration::from_secs(3));

    let events = solve(&mut session);
    let solved: Vec<_> = events.iter().filter(|e| e.is_solved()).collect();
    assert_eq!(solved.len(), 1);
    assert!(matches!(solved[0], SessionEvent::Solved { elapsed } if *elapsed == 3.0));
    assert!(events.iter().any(SessionEvent::is_merged));

    assert!(session.is_solved());
    assert_eq!(session.board().groups().len(), 1);
    assert!(session.board().pieces().iter().all(|p| p.is_solved()));

    // The latch holds: nothing fires again and nothing moves.
    assert!(session.is_solved());
    assert!(session.tick(Duration::from_secs(1)).is_empty());
    assert_eq!(session.timer().seconds(), 3.0);
    assert_eq!(
        session.begin_drag(GridPos::new(0, 0)),
        Err(SessionError::Finished)
    );
    assert_eq!(session.rotate_hovered_group(), Err(SessionError::Finished));
}

#[test]
fn test_rotated_group_only_wins_upright() {
    let mut session = Session::new(config(2, 2, PieceMode::Rect), ShapeSeed::new(7));
    session.set_hover(Some(GridPos::new(1, 1)));
    session.rotate_hovered_group().unwrap();

    // The turned piece cannot join its upright neighbors.
    let events = solve(&mut session);
    assert!(!events.iter().any(SessionEvent::is_solved));
    assert!(!session.is_solved());
    assert_eq!(group_sizes(&session), [1, 3]);

    for _ in 0..3 {
        session.rotate_hovered_group().unwrap();
    }
    let events = place(&mut session, GridPos::new(1, 1));
    assert!(events.iter().any(SessionEvent::is_solved));
}

#[test]
fn test_save_round_trip_preserves_groups() {
    let mut session = Session::new(config(3, 2, PieceMode::Quad), ShapeSeed::new(1234));
    place(&mut session, GridPos::new(0, 0));
    place(&mut session, GridPos::new(1, 0));
    session.set_hover(Some(GridPos::new(2, 1)));
    session.rotate_hovered_group().unwrap();
    session.tick(Duration::from_millis(2500));

    let json = session.export_state().to_json().unwrap();
    let save = SaveData::from_json(&json).unwrap();
    let mut base = config(3, 2, PieceMode::Rect);
    base.image = ImageRef::default();
    let restored = Session::from_save(&save, base).unwrap();

    assert_eq!(restored.config().grid, GridSize::new(3, 2));
    assert_eq!(restored.config().mode, PieceMode::Quad);
    assert_eq!(restored.config().image.name, "Harbor");
    assert_eq!(restored.seed(), session.seed());
    assert_eq!(restored.timer().seconds(), 2.5);
    assert_eq!(group_sizes(&restored), group_sizes(&session));
    for (a, b) in session.board().pieces().iter().zip(restored.board().pieces()) {
        assert_eq!(a.outline(), b.outline());
        assert!(a.position().approx_eq(b.position(), 1e-3));
        assert_eq!(a.rotation(), b.rotation());
        let origin = GridPos::new(0, 0);
        assert_eq!(
            session.board().group_of(a.grid_pos()) == session.board().group_of(origin),
            restored.board().group_of(b.grid_pos()) == restored.board().group_of(origin),
        );
    }
}

#[test]
fn test_legacy_save_matches_by_index() {
    let session = Session::new(config(2, 2, PieceMode::Rect), ShapeSeed::new(5));
    let mut save = session.export_state();
    save.version = 1;
    for piece in save.pieces.iter_mut().flatten() {
        piece.id = None;
    }
    let mut groups = std::collections::BTreeMap::new();
    groups.insert("1".to_owned(), vec![PieceRef::Index(0), PieceRef::Index(1)]);
    save.groups = Some(groups);
    let pieces = save.pieces.as_mut().unwrap();
    pieces[1].x = pieces[0].x + 120.0;
    pieces[1].y = pieces[0].y;

    let mut restored = Session::new(config(2, 2, PieceMode::Rect), ShapeSeed::new(5));
    restored.restore_state(&save).unwrap();
    assert_eq!(group_sizes(&restored), [1, 1, 2]);
    assert_eq!(
        restored.board().group_of(GridPos::new(0, 0)),
        restored.board().group_of(GridPos::new(1, 0)),
    );

    let pieces = save.pieces.as_mut().unwrap();
    let extra = pieces[0].clone();
    pieces.push(extra);
    let before = restored.board().clone();
    assert!(matches!(
        restored.restore_state(&save),
        Err(RestoreError::PieceCountMismatch {
            saved: 5,
            expected: 4
        })
    ));
    assert_eq!(restored.board(), &before);
}

#[test]
fn test_restoring_solved_layout_latches() {
    let mut session = Session::new(config(2, 2, PieceMode::Rect), ShapeSeed::new(99));
    solve(&mut session);
    let save = session.export_state();

    let mut fresh = Session::new(config(2, 2, PieceMode::Rect), ShapeSeed::new(99));
    fresh.restore_state(&save).unwrap();
    assert!(fresh.is_solved());
    assert!(fresh.board().pieces().iter().all(|p| p.is_solved()));
}

#[test]
fn test_challenge_times_out() {
    let level = ChallengeLevel::get(1).unwrap();
    let config = SessionConfig::challenge(&level, "Level 1".into(), 360, 360);
    let mut session = Session::new(config, ShapeSeed::new(3));
    assert_eq!(session.timer().seconds(), 40.0);

    let mut events = Vec::new();
    for _ in 0..50 {
        events.extend(session.tick(Duration::from_secs(1)));
    }
    assert_eq!(events, [SessionEvent::Failed]);
    assert!(session.status().is_failed());
    assert!(!session.is_solved());
    assert_eq!(session.timer().seconds(), 0.0);
    assert_eq!(session.export_state().scene.unwrap().timer, 40.0);
}
