//! Pure game-logic functions.
//!
//! Every public function takes immutable references to the current data
//! (and, where needed, an RNG handle) and returns a brand-new value.
//! Side effects are limited to the injected RNG and `tracing` events.

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

use crate::config::Settings;
use crate::entities::{
    Direction, EndReason, Enemy, Entity, GameState, GameStatus, Item, Player, PlayerHandle,
};

// ── Per-entity motion ────────────────────────────────────────────────────────

/// Step the player one cell in `input`, unless it already sits on that edge.
pub fn advance_player(player: &Player, input: Option<Direction>, settings: &Settings) -> Player {
    let max_x = settings.width as i32 - 1;
    let max_y = settings.height as i32 - 1;
    let (x, y) = match input {
        Some(Direction::Up) if player.y > 0 => (player.x, player.y - 1),
        Some(Direction::Down) if player.y < max_y => (player.x, player.y + 1),
        Some(Direction::Left) if player.x > 0 => (player.x - 1, player.y),
        Some(Direction::Right) if player.x < max_x => (player.x + 1, player.y),
        _ => (player.x, player.y),
    };
    Player { x, y }
}

/// Enemies fall one row per tick and re-enter at the top in a random column.
pub fn advance_enemy(enemy: &Enemy, settings: &Settings, rng: &mut impl Rng) -> Enemy {
    let y = enemy.y + 1;
    if y >= settings.height as i32 {
        Enemy {
            x: random_column(settings, rng),
            y: 0,
        }
    } else {
        Enemy { y, ..enemy.clone() }
    }
}

/// Items fall one row every `fall_interval` ticks and stop at the height.
pub fn advance_item(item: &Item, settings: &Settings) -> Item {
    if !item.active {
        return item.clone();
    }
    let counter = item.fall_counter + 1;
    if counter >= item.fall_interval {
        Item {
            y: (item.y + 1).min(settings.height as i32),
            fall_counter: 0,
            ..item.clone()
        }
    } else {
        Item {
            fall_counter: counter,
            ..item.clone()
        }
    }
}

/// Collected items stay inactive for good.
pub fn deactivate(item: &Item) -> Item {
    Item {
        active: false,
        ..item.clone()
    }
}

pub fn is_off_screen(item: &Item, settings: &Settings) -> bool {
    item.y >= settings.height as i32
}

pub fn advance_entity(
    entity: &Entity,
    input: Option<Direction>,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Entity {
    match entity {
        Entity::Player(p) => Entity::Player(advance_player(p, input, settings)),
        Entity::Enemy(e) => Entity::Enemy(advance_enemy(e, settings, rng)),
        Entity::Item(i) => Entity::Item(advance_item(i, settings)),
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a running state with `player` in the first slot followed by `others`.
pub fn from_parts(settings: Settings, player: Player, others: Vec<Entity>) -> GameState {
    let mut entities = Vec::with_capacity(others.len() + 1);
    entities.push(Entity::Player(player));
    entities.extend(others);
    GameState {
        entities,
        player: PlayerHandle(0),
        spawn_counter: 0,
        score: 0,
        status: GameStatus::Running,
        end_reason: None,
        frame: 0,
        settings,
    }
}

/// Seed a new session: the player at the bottom centre, enemies anywhere on
/// the field and one item on the top row.
pub fn init_state(settings: Settings, rng: &mut impl Rng) -> Result<GameState> {
    settings.validate()?;
    let player = Player {
        x: settings.width as i32 / 2,
        y: settings.height as i32 - 1,
    };
    let mut others: Vec<Entity> = (0..settings.enemy_count)
        .map(|_| {
            Entity::Enemy(Enemy {
                x: random_column(&settings, rng),
                y: rng.gen_range(0..(settings.height as i32).max(1)),
            })
        })
        .collect();
    others.push(Entity::Item(spawn_item(&settings, rng)));
    Ok(from_parts(settings, player, others))
}

/// A new item in a random column of the top row.
pub fn spawn_item(settings: &Settings, rng: &mut impl Rng) -> Item {
    Item::new(random_column(settings, rng), 0, settings.item_fall_interval)
}

/// Uniform column in `[0, width)`.  A zero-width field yields column 0
/// rather than an empty range.
fn random_column(settings: &Settings, rng: &mut impl Rng) -> i32 {
    rng.gen_range(0..(settings.width as i32).max(1))
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(state: &GameState, input: Option<Direction>, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::Over {
        return state.clone();
    }
    let settings = &state.settings;
    let frame = state.frame + 1;

    // ── 1. Move everything ───────────────────────────────────────────────────
    let entities: Vec<Entity> = state
        .entities
        .iter()
        .map(|e| advance_entity(e, input, settings, rng))
        .collect();

    // ── 2. Collision: player ↔ items ─────────────────────────────────────────
    let moved = GameState {
        entities,
        player: state.player,
        spawn_counter: state.spawn_counter,
        score: state.score,
        status: state.status,
        end_reason: state.end_reason,
        frame,
        settings: state.settings.clone(),
    };
    let (mut entities, collected) = collect_items(&moved);
    let score = state.score + collected;
    if collected > 0 {
        info!(frame, score, "item collected");
    }

    // ── 3. Spawn a new item on cadence ───────────────────────────────────────
    let mut spawn_counter = state.spawn_counter + 1;
    if spawn_counter >= settings.item_spawn_interval {
        spawn_counter = 0;
        let item = spawn_item(settings, rng);
        debug!(frame, x = item.x, "item spawned");
        entities.push(Entity::Item(item));
    }

    let next = GameState {
        entities,
        spawn_counter,
        score,
        ..moved
    };

    // ── 4. Termination ───────────────────────────────────────────────────────
    let next = match evaluate(&next) {
        Some(reason) => {
            info!(frame, score, ?reason, "game over");
            GameState {
                status: GameStatus::Over,
                end_reason: Some(reason),
                ..next
            }
        }
        None => next,
    };

    match settings.compact_every {
        Some(n) if n > 0 && frame % n == 0 => compact(&next),
        _ => next,
    }
}

/// Deactivate every active item on the player's cell.
///
/// Returns the updated entities and the number of items collected.
/// Only exact cell equality counts: an item and a player that swap rows
/// within one tick pass through each other.
pub fn collect_items(state: &GameState) -> (Vec<Entity>, u32) {
    let Some(player) = state.player() else {
        return (state.entities.clone(), 0);
    };
    let (px, py) = (player.x, player.y);
    let mut collected = 0;
    let entities = state
        .entities
        .iter()
        .map(|e| match e {
            Entity::Item(item) if item.active && item.x == px && item.y == py => {
                collected += 1;
                Entity::Item(deactivate(item))
            }
            other => other.clone(),
        })
        .collect();
    (entities, collected)
}

/// Decide whether the session is over.  Enemy contact wins over an escaped
/// item when both happen on the same tick.
pub fn evaluate(state: &GameState) -> Option<EndReason> {
    if state.status == GameStatus::Over {
        return Some(state.end_reason.unwrap_or(EndReason::NoPlayer));
    }
    let Some(player) = state.player() else {
        return Some(EndReason::NoPlayer);
    };

    let mut item_escaped = false;
    for entity in state.entities.iter().filter(|e| e.is_active()) {
        match entity {
            Entity::Enemy(e) if e.x == player.x && e.y == player.y => {
                return Some(EndReason::EnemyCollision);
            }
            Entity::Item(i) if is_off_screen(i, &state.settings) => item_escaped = true,
            _ => {}
        }
    }
    item_escaped.then_some(EndReason::ItemEscaped)
}

// ── Views & housekeeping ─────────────────────────────────────────────────────

/// Active entities inside the field, in collection order.
pub fn visible_entities(state: &GameState) -> impl Iterator<Item = &Entity> {
    let (w, h) = (state.settings.width as i32, state.settings.height as i32);
    state.entities.iter().filter(move |e| {
        let (x, y) = e.position();
        e.is_active() && (0..w).contains(&x) && (0..h).contains(&y)
    })
}

/// Drop collected items and re-point the player handle.
pub fn compact(state: &GameState) -> GameState {
    let entities: Vec<Entity> = state
        .entities
        .iter()
        .filter(|e| !matches!(e, Entity::Item(i) if !i.active))
        .cloned()
        .collect();
    let dropped = state.entities.len() - entities.len();
    if dropped > 0 {
        debug!(frame = state.frame, dropped, "compacted inactive items");
    }
    // A missing player lands on an out-of-range slot so `evaluate` sees it.
    let slot = entities
        .iter()
        .position(|e| matches!(e, Entity::Player(_)))
        .unwrap_or(entities.len());
    GameState {
        entities,
        player: PlayerHandle(slot),
        spawn_counter: state.spawn_counter,
        score: state.score,
        status: state.status,
        end_reason: state.end_reason,
        frame: state.frame,
        settings: state.settings.clone(),
    }
}
