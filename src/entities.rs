//! All game entity types — plain data with a few read-only accessors.

use crate::config::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cosmetic colour of an entity.  The display decides what it maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTag {
    White,
    Red,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over,
}

/// Why a session reached `GameStatus::Over`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The player shares a cell with an enemy.
    EnemyCollision,
    /// An uncollected item fell past the bottom row.
    ItemEscaped,
    /// The entity collection no longer holds the player.
    NoPlayer,
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub x: i32,
    /// May equal the field height, which marks the item as off-screen.
    pub y: i32,
    pub active: bool,
    /// Ticks between moves down.
    pub fall_interval: u32,
    /// Ticks elapsed since the last move.
    pub fall_counter: u32,
}

impl Item {
    /// A fresh, active item with its counter at zero.
    pub fn new(x: i32, y: i32, fall_interval: u32) -> Self {
        Item {
            x,
            y,
            active: true,
            fall_interval,
            fall_counter: 0,
        }
    }
}

/// The closed set of things that live on the field.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Player(Player),
    Enemy(Enemy),
    Item(Item),
}

impl Entity {
    pub fn position(&self) -> (i32, i32) {
        match self {
            Entity::Player(p) => (p.x, p.y),
            Entity::Enemy(e) => (e.x, e.y),
            Entity::Item(i) => (i.x, i.y),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Entity::Player(_) => 'A',
            Entity::Enemy(_) => 'E',
            Entity::Item(_) => 'I',
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            Entity::Player(_) => ColorTag::White,
            Entity::Enemy(_) => ColorTag::Red,
            Entity::Item(_) => ColorTag::Yellow,
        }
    }

    /// Players and enemies are always active; items until collected.
    pub fn is_active(&self) -> bool {
        match self {
            Entity::Item(i) => i.active,
            Entity::Player(_) | Entity::Enemy(_) => true,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Slot of the player inside `GameState::entities`.
///
/// Only the constructors in `compute` hand these out, so a handle always
/// pointed at the player when it was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerHandle(pub(crate) usize);

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Every entity of the session, in spawn order.
    pub entities: Vec<Entity>,
    pub player: PlayerHandle,
    /// Ticks since the last item spawn.
    pub spawn_counter: u32,
    /// Items collected so far.
    pub score: u32,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    pub frame: u64,
    pub settings: Settings,
}

impl GameState {
    /// The player, or `None` if the handle no longer resolves.
    pub fn player(&self) -> Option<&Player> {
        match self.entities.get(self.player.0) {
            Some(Entity::Player(p)) => Some(p),
            _ => None,
        }
    }

    /// Items of any activity state.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Item(i) => Some(i),
            _ => None,
        })
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Enemy(en) => Some(en),
            _ => None,
        })
    }
}
