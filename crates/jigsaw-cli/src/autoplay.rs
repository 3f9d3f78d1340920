//! A scripted player that assembles a puzzle through the session commands.

use std::time::Duration;

use jigsaw_core::{GridPos, Rotation, Vec2};
use jigsaw_game::{Session, SessionError, SessionEvent};

/// What a scripted run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoplayReport {
    /// Drags performed.
    pub drags: usize,
    /// Quarter turns performed.
    pub turns: usize,
    /// Every event the session reported, in order.
    pub events: Vec<SessionEvent>,
}

impl AutoplayReport {
    /// Seconds reported by the win, if the puzzle was completed.
    #[must_use]
    pub fn solved_in(&self) -> Option<f64> {
        self.events.iter().find_map(|event| match event {
            SessionEvent::Solved { elapsed } => Some(*elapsed),
            _ => None,
        })
    }
}

/// Where the assembled puzzle's top-left corner goes: centered in the play area.
fn assembly_origin(session: &Session) -> Vec2 {
    let config = session.config();
    let area = config.viewport.play_area();
    let center = Vec2::new(
        (area.min.x + area.max.x) / 2.0,
        (area.min.y + area.max.y) / 2.0,
    );
    #[expect(clippy::cast_precision_loss)]
    let half = Vec2::new(config.puzzle_width as f32, config.puzzle_height as f32).scale(0.5);
    center - half
}

/// Assembles the puzzle piece by piece, spending `step` on the clock for
/// every command.
///
/// Each piece in row-major order is turned upright and dragged to its
/// assembled spot, where it snaps to the neighbors already placed. The run
/// stops early when the session finishes, so a countdown may fail it.
///
/// # Errors
///
/// Returns an error if the session rejects a command, which only happens
/// when it was already finished before the call.
pub fn autoplay(session: &mut Session, step: Duration) -> Result<AutoplayReport, SessionError> {
    let origin = assembly_origin(session);
    let positions: Vec<GridPos> = session.board().grid().positions().collect();
    let mut report = AutoplayReport::default();

    for pos in positions {
        if !session.status().is_assembling() {
            break;
        }
        if !turn_upright(session, pos, step, &mut report)? {
            log::warn!("cannot turn {pos} upright; skipping");
            continue;
        }
        if !session.status().is_assembling() {
            break;
        }
        let Some(piece) = session.board().piece(pos) else {
            continue;
        };
        let delta = origin + piece.anchor() - piece.position();
        report.events.push(session.begin_drag(pos)?);
        session.apply_drag(delta)?;
        report.events.extend(session.end_drag()?);
        report.drags += 1;
        report.events.extend(session.tick(step));
    }
    log::debug!(
        "autoplay finished: {} drags, {} turns, status {}",
        report.drags,
        report.turns,
        session.status()
    );
    Ok(report)
}

fn turn_upright(
    session: &mut Session,
    pos: GridPos,
    step: Duration,
    report: &mut AutoplayReport,
) -> Result<bool, SessionError> {
    let rotation_of = |session: &Session| session.board().piece(pos).map(|p| p.rotation());
    if rotation_of(session) == Some(Rotation::R0) {
        return Ok(true);
    }
    if !session.config().rotation_enabled() {
        return Ok(false);
    }
    session.set_hover(Some(pos));
    for _ in 0..Rotation::ALL.len() {
        if rotation_of(session) == Some(Rotation::R0) || !session.status().is_assembling() {
            break;
        }
        report.events.extend(session.rotate_hovered_group()?);
        report.turns += 1;
        report.events.extend(session.tick(step));
    }
    session.set_hover(None);
    Ok(rotation_of(session) == Some(Rotation::R0))
}
