//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.

use std::collections::HashSet;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use crate::compute::visible_entities;
use crate::entities::{ColorTag, EndReason, Entity, GameState, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

fn color_of(tag: ColorTag) -> Color {
    match tag {
        ColorTag::White => Color::White,
        ColorTag::Red => Color::DarkRed,
        ColorTag::Yellow => Color::Yellow,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  The field occupies rows/cols `1..=size`
/// inside a one-cell border; the HUD sits underneath.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, state)?;

    // First entity in collection order owns its cell; later ones are hidden
    let mut painted: HashSet<(i32, i32)> = HashSet::new();
    for entity in visible_entities(state) {
        if painted.insert(entity.position()) {
            draw_entity(out, entity)?;
        }
    }
    draw_hud(out, state)?;

    if state.status == GameStatus::Over {
        draw_game_over(out, state)?;
    }

    // Park cursor below the HUD and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.settings.height + 4))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let w = state.settings.width;
    let h = state.settings.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w as usize))))?;

    out.queue(cursor::MoveTo(0, h + 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w as usize))))?;

    for row in 1..=h {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(w + 1, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(out: &mut W, entity: &Entity) -> std::io::Result<()> {
    // visible_entities only yields in-field cells, so the casts are safe
    let (x, y) = entity.position();
    out.queue(cursor::MoveTo(x as u16 + 1, y as u16 + 1))?;
    out.queue(style::SetForegroundColor(color_of(entity.color())))?;
    out.queue(Print(entity.glyph()))?;
    Ok(())
}

// ── HUD (below the field) ─────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let row = state.settings.height + 2;
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>4}", state.score)))?;

    out.queue(cursor::MoveTo(1, row + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W A S D / arrows : Move   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let cause = match state.end_reason {
        Some(EndReason::EnemyCollision) => "Hit by an enemy",
        Some(EndReason::ItemEscaped) => "An item got away",
        Some(EndReason::NoPlayer) | None => "",
    };
    let score_line = format!("Final Score: {}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════╗", Color::Red),
        ("║  GAME  OVER  ║", Color::Red),
        ("╚══════════════╝", Color::Red),
        (cause, Color::White),
        (&score_line, Color::Yellow),
    ];

    // Centre of the field, offset by the border
    let cx = state.settings.width / 2 + 1;
    let start_row = (state.settings.height / 2 + 1).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
